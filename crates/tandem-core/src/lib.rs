//! Tandem Core Library
//!
//! Shared functionality for Tandem components:
//! - Startup configuration resolution (URL flags, environment, home layout)
//! - Web-auth pairing URL construction
//! - Tracing initialization
//! - Common error types

pub mod args;
pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod tracing_init;
pub mod web_auth;

pub use config::{Configuration, Resolved, Resolver};
pub use env::EnvSnapshot;
pub use error::{Error, Result};
pub use paths::HomeLayout;
pub use web_auth::web_auth_url;
