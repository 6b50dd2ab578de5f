// ABOUTME: Library root for dockfix - disposable container fixtures for tests.
// ABOUTME: The CLI binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fixture;
pub mod output;
pub mod runtime;
pub mod types;
