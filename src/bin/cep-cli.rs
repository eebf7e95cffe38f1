use clap::Parser;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};

use cep_weather::observability::tracing::{inject, Tracer};

#[derive(Parser)]
#[command(name = "cep-cli")]
#[command(about = "Query the edge service for the temperature at a postal code", long_about = None)]
struct Cli {
    /// Edge service base URL
    #[arg(short, long, default_value = "http://localhost:8082")]
    url: String,

    /// Send a traceparent header so the request starts a trace
    #[arg(long)]
    trace: bool,

    /// Postal code (8 digits)
    cep: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    let tracer = Tracer::logging("cep-cli");
    let span = cli.trace.then(|| tracer.start("cep-cli request", None));
    if let Some(span) = &span {
        inject(&span.context(), &mut headers);
        eprintln!("trace id: {}", span.context().trace_id);
    }
    headers.insert("accept", HeaderValue::from_static("application/json"));

    let res = client
        .post(&cli.url)
        .headers(headers)
        .json(&json!({ "cep": cli.cep }))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: edge service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
