//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - Ollama chat, streaming and embedding client
//! - In-memory vector store, hashing embedder and document splitter
//! - HTTP API
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod http;
pub mod logging;
pub mod ollama;
pub mod vector;
