//! HTTP front end for Quill.
//!
//! # Responsibility
//! - Load process configuration from the environment.
//! - Expose the article service over a JSON REST interface.

pub mod config;
pub mod http;

pub use config::{ConfigError, ServerConfig};
pub use http::{build_router, AppState, NOT_FOUND_MESSAGE, WELCOME_TEXT};
