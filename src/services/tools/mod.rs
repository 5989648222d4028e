//! Built-in tools the model can call.

pub mod calculator;
pub mod data_store;
pub mod registry;
pub mod weather;

use std::sync::Arc;

pub use data_store::KeyValueStore;
pub use registry::{bind_arguments, ToolHandler, ToolRegistry};

/// Registry with the calculator, weather, clock and key-value tools.
pub fn default_registry(kv: &Arc<KeyValueStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    calculator::register(&mut registry);
    weather::register(&mut registry);
    data_store::register(&mut registry, kv);
    registry
}
