//! Factotum - AI business assistant
//!
//! Library surface for the server binary and the HTTP integration tests.

#![forbid(unsafe_code)]

pub mod api;
pub mod cli;
pub mod server;
