//! HTTP handlers, one module per route group.

pub mod ai_services;
pub mod chat;
pub mod health;
pub mod rag;
pub mod streaming;
pub mod tools;
