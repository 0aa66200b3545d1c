//! Shared types, errors, and configuration for the verificador dashboards.
//!
//! This crate provides common types used across all other crates:
//! - Money and currency types with decimal precision
//! - Typed string IDs for clients and invoices
//! - Pagination types for the detailed invoice list
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
