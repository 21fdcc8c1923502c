//! Gyre API Service Library
//!
//! This crate provides the HTTP server implementation wrapping the
//! baroclinic gyre simulation behind a small process-execution API.

pub mod process;
pub mod server;
pub mod state;
pub mod tracker;
