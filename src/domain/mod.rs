//! Domain layer - core types and the ports to the outside world.
//!
//! This layer contains domain models, configuration and error types
//! without any I/O of its own.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use config::PageConfig;
pub use error::{AppError, Result};
pub use models::{
    Batch, Conversation, ExportStats, LongLivedToken, Message, MessagePage, PageIdentity,
    Participants, Sender, User, UserPage,
};
pub use ports::{GraphApi, TokenExchange};
