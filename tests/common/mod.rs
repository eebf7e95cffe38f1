//! Shared utilities for integration testing.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cep_weather::config::AppConfig;
use cep_weather::lifecycle::{downstream_server, edge_server, Shutdown};
use cep_weather::observability::{RecordingSink, Tracer};
use cep_weather::HttpServer;

pub const API_KEY: &str = "test-key";

/// Both services running against mocked providers.
pub struct Stack {
    pub edge_url: String,
    pub downstream_url: String,
    pub address: MockServer,
    pub weather: MockServer,
    pub edge_spans: RecordingSink,
    pub downstream_spans: RecordingSink,
    shutdown: Shutdown,
}

impl Drop for Stack {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

impl Stack {
    pub async fn address_calls(&self) -> usize {
        self.address.received_requests().await.unwrap_or_default().len()
    }

    pub async fn weather_calls(&self) -> usize {
        self.weather.received_requests().await.unwrap_or_default().len()
    }
}

/// Start mocked providers, the downstream service and the edge service.
pub async fn start_stack() -> Stack {
    start_stack_with(|_| {}).await
}

/// Like `start_stack`, letting the caller adjust the config before startup.
pub async fn start_stack_with<F>(adjust: F) -> Stack
where
    F: FnOnce(&mut AppConfig),
{
    let address = MockServer::start().await;
    let weather = MockServer::start().await;
    let shutdown = Shutdown::new();

    let mut config = AppConfig::default();
    config.providers.address_base_url = address.uri();
    config.providers.weather_base_url = weather.uri();
    config.providers.weather_api_key = API_KEY.to_string();
    adjust(&mut config);

    let downstream_spans = RecordingSink::new();
    let downstream = downstream_server(
        &config,
        Tracer::new("downstream-service", Arc::new(downstream_spans.clone())),
    )
    .unwrap();
    let downstream_url = serve(downstream, &shutdown).await;

    config.edge.downstream_url = downstream_url.clone();
    let edge_spans = RecordingSink::new();
    let edge = edge_server(
        &config,
        Tracer::new("edge-service", Arc::new(edge_spans.clone())),
    )
    .unwrap();
    let edge_url = serve(edge, &shutdown).await;

    Stack {
        edge_url,
        downstream_url,
        address,
        weather,
        edge_spans,
        downstream_spans,
        shutdown,
    }
}

/// Start only the edge service, pointed at `downstream_url`.
pub async fn start_edge(downstream_url: &str, shutdown: &Shutdown) -> (String, RecordingSink) {
    let mut config = AppConfig::default();
    config.edge.downstream_url = downstream_url.to_string();

    let spans = RecordingSink::new();
    let server = edge_server(&config, Tracer::new("edge-service", Arc::new(spans.clone()))).unwrap();
    (serve(server, shutdown).await, spans)
}

/// Serve on an ephemeral local port; returns the base URL.
pub async fn serve(server: HttpServer, shutdown: &Shutdown) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    format!("http://{}", addr)
}

/// A local URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn viacep_found(cep: &str, locality: &str) -> Value {
    json!({
        "cep": format!("{}-{}", &cep[..5], &cep[5..]),
        "logradouro": "Praça da Sé",
        "complemento": "lado ímpar",
        "bairro": "Sé",
        "localidade": locality,
        "uf": "SP",
        "ibge": "3550308",
        "gia": "1004",
        "ddd": "11",
        "siafi": "7107"
    })
}

/// Mount an address response for `cep`, expected `times` times.
pub async fn mock_address(server: &MockServer, cep: &str, status: u16, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/ws/{}/json/", cep)))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Mount a weather response for `locality`, expected `times` times.
pub async fn mock_weather(server: &MockServer, locality: &str, temp_c: f64, temp_f: f64, times: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", locality))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "location": {"name": locality, "region": "", "country": "Brazil"},
            "current": {"temp_c": temp_c, "temp_f": temp_f, "is_day": 1,
                        "condition": {"text": "Sunny", "icon": "", "code": 1000}}
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Mount a weather failure with `status` for any query.
pub async fn mock_weather_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": {"code": 2006, "message": "API key is invalid."}
        })))
        .mount(server)
        .await;
}
