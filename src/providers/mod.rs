//! External provider clients.
//!
//! # Data Flow
//! ```text
//! PostalCode
//!     → address.rs (ViaCEP lookup → Found(Address) / NotFound)
//!     → weather.rs (WeatherAPI current conditions → WeatherReading)
//! ```
//!
//! # Design Decisions
//! - Each call runs inside its own span, child of the request span
//! - Transport, status and payload failures all surface as `UpstreamError`
//! - No retries and no timeouts beyond the transport defaults

pub mod address;
pub mod weather;

pub use address::AddressClient;
pub use weather::WeatherClient;

const USER_AGENT: &str = concat!("cep-weather/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the provider clients.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().user_agent(USER_AGENT).build()
}
