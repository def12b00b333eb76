//! Infrastructure layer - external adapters (filesystem, HTTP).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod graph_client;
pub mod output;

pub use config::ConfigFile;
pub use graph_client::{GraphClient, DEFAULT_GRAPH_URL};
pub use output::open_output;
