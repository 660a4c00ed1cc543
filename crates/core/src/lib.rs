//! Core business logic for cinevote.

pub mod services;

pub use services::*;
