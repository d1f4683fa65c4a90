//! # Cardfuse Common Library
//!
//! Shared code for the cardfuse tools including:
//! - Error types and the common `Result` alias
//! - TOML bootstrap configuration and root folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
