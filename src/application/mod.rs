//! Application layer: service wiring and the feature walkthrough.

pub mod context;
pub mod demo;

pub use context::{AppContext, Providers};
pub use demo::{run_all as run_demos, DemoEntry, DemoReport, DemoSection};
