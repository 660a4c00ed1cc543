//! Common utilities and shared types for cinevote.
//!
//! This crate provides foundational components used across all cinevote crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//!
//! # Example
//!
//! ```no_run
//! use cinevote_common::{Config, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Binding to port {}", config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;

pub use config::{CatalogConfig, Config, DatabaseConfig, ServerConfig};
pub use error::{AppError, AppResult};
