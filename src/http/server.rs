//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap a service's routes with the shared middleware stack
//! - Wire up middleware (request ID, tracing, body limit)
//! - Serve on a bound listener until shutdown

use axum::http::HeaderName;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::LimitsConfig;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::signals::shutdown_signal;

/// HTTP server for one of the two services.
pub struct HttpServer {
    name: String,
    router: Router,
}

impl HttpServer {
    /// Create a server around `routes`.
    pub fn new(name: impl Into<String>, routes: Router, limits: &LimitsConfig) -> Self {
        Self {
            name: name.into(),
            router: Self::build_router(routes, limits),
        }
    }

    /// Layer the middleware stack over the service routes.
    fn build_router(routes: Router, limits: &LimitsConfig) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);
        routes.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuidV4))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(RequestBodyLimitLayer::new(limits.max_body_size)),
        )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            service = %self.name,
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!(service = %self.name, "HTTP server stopped");
        Ok(())
    }
}
