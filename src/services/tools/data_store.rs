//! Key-value store tools: store, retrieve, list_keys.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::models::{ParamType, ToolError, ToolParameter, ToolSpec, ToolValue};

use super::registry::ToolRegistry;

/// Shared string map backing the data-store tools. Keys iterate sorted.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value.
    pub fn store(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    pub fn retrieve(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn text<'a>(args: &'a [ToolValue], pos: usize, name: &str) -> Result<&'a str, ToolError> {
    args.get(pos)
        .and_then(ToolValue::as_text)
        .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
}

/// Register `store`, `retrieve` and `list_keys` over `kv`.
pub fn register(registry: &mut ToolRegistry, kv: &Arc<KeyValueStore>) {
    let store = Arc::clone(kv);
    registry.register(
        ToolSpec {
            name: "store".to_string(),
            description: "Stores a value with a key".to_string(),
            parameters: vec![
                ToolParameter::string("key", "Key to store under"),
                ToolParameter::string("value", "Value to store"),
            ],
            returns: ParamType::String,
        },
        Arc::new(move |args: &[ToolValue]| {
            let key = text(args, 0, "key")?;
            let value = text(args, 1, "value")?;
            debug!(key, "storing value");
            store.store(key, value);
            Ok(ToolValue::Text(format!("Stored successfully: {key}")))
        }),
    );

    let store = Arc::clone(kv);
    registry.register(
        ToolSpec {
            name: "retrieve".to_string(),
            description: "Retrieves a value by key".to_string(),
            parameters: vec![ToolParameter::string("key", "Key to look up")],
            returns: ParamType::String,
        },
        Arc::new(move |args: &[ToolValue]| {
            let key = text(args, 0, "key")?;
            let value = store
                .retrieve(key)
                .unwrap_or_else(|| format!("Key not found: {key}"));
            Ok(ToolValue::Text(value))
        }),
    );

    let store = Arc::clone(kv);
    registry.register(
        ToolSpec {
            name: "list_keys".to_string(),
            description: "Lists all stored keys".to_string(),
            parameters: Vec::new(),
            returns: ParamType::String,
        },
        Arc::new(move |_: &[ToolValue]| {
            Ok(ToolValue::Text(format!("Stored keys: {}", store.keys().join(", "))))
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ToolOutcome, ToolRequest};
    use serde_json::json;

    fn registry() -> (ToolRegistry, Arc<KeyValueStore>) {
        let kv = Arc::new(KeyValueStore::new());
        let mut registry = ToolRegistry::new();
        register(&mut registry, &kv);
        (registry, kv)
    }

    fn run(registry: &ToolRegistry, name: &str, args: serde_json::Value) -> String {
        registry.execute(&ToolRequest::new(name, args)).outcome.to_message_text()
    }

    #[test]
    fn test_store_then_retrieve() {
        let (registry, kv) = registry();
        assert_eq!(
            run(&registry, "store", json!({"key": "color", "value": "blue"})),
            "Stored successfully: color"
        );
        assert_eq!(run(&registry, "retrieve", json!({"key": "color"})), "blue");
        assert_eq!(kv.retrieve("color").as_deref(), Some("blue"));
    }

    #[test]
    fn test_retrieve_missing_key() {
        let (registry, _) = registry();
        assert_eq!(run(&registry, "retrieve", json!({"key": "nope"})), "Key not found: nope");
    }

    #[test]
    fn test_list_keys_sorted() {
        let (registry, kv) = registry();
        kv.store("zeta", "1");
        kv.store("alpha", "2");
        assert_eq!(run(&registry, "list_keys", json!({})), "Stored keys: alpha, zeta");
    }

    #[test]
    fn test_store_overwrites() {
        let (registry, kv) = registry();
        run(&registry, "store", json!({"key": "k", "value": "1"}));
        run(&registry, "store", json!({"key": "k", "value": "2"}));
        assert_eq!(kv.len(), 1);
        assert_eq!(kv.retrieve("k").as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_argument_is_tool_error() {
        let (registry, _) = registry();
        let call = registry.execute(&ToolRequest::new("store", json!({"key": "k"})));
        assert_eq!(call.outcome, ToolOutcome::Error("Missing argument: value".into()));
    }
}
