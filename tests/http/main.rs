//! Integration tests for the HTTP client engine

mod config;
mod mock;
mod serialize;
mod stream;
