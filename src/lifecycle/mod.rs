//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Tracer + HTTP client → Service → Router → Bind → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGINT/SIGTERM or Shutdown::trigger → stop accepting → drain → exit
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{downstream_server, edge_server, run_downstream, run_edge, StartupError};
