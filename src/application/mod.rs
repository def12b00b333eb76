//! Application layer - use cases and orchestration.
//!
//! This layer resolves access tokens, walks the paged API, normalizes
//! records and renders them through user templates.

pub mod message_export;
pub mod normalizer;
pub mod pager;
pub mod renderer;
pub mod token;
pub mod user_export;

#[cfg(test)]
mod stub;

pub use message_export::export_messages;
pub use normalizer::EscapeMode;
pub use renderer::TemplateRenderer;
pub use token::resolve_access_token;
pub use user_export::export_users;
