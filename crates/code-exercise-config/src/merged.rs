//! Layered configuration merging.
//!
//! Configuration comes from several tiers: built-in defaults, host-supplied
//! plugin options, per-slide declarations. `MergedConfig` holds borrowed
//! references to the tiers in priority order (first = lowest) and
//! materializes them into a fresh owned value.
//!
//! # Semantics
//!
//! - Object against object merges key by key, recursively
//! - Anything else is replaced wholesale by the higher-priority value
//!   (arrays are never concatenated or merged element-wise)
//! - Layers are only ever read; the result never shares storage with them,
//!   so a defaults template can be reused for any number of merges
//!
//! # Example
//!
//! ```rust
//! use code_exercise_config::MergedConfig;
//! use serde_json::json;
//!
//! let defaults = json!({"fontSize": 12, "rulers": [80]});
//! let host = json!({"rulers": [100, 120]});
//! let slide = json!({"fontSize": 16});
//!
//! let merged = MergedConfig::new(vec![&defaults, &host, &slide])
//!     .materialize()
//!     .unwrap();
//! assert_eq!(merged, json!({"fontSize": 16, "rulers": [100, 120]}));
//! ```

use serde_json::Value;

use crate::types::{ConfigError, ConfigMap};

/// Options for materialization.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    /// Maximum nesting depth (default: 256).
    ///
    /// Materialization will fail with `ConfigError::NestingTooDeep` if
    /// any layer exceeds this depth.
    pub max_depth: usize,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

/// An ordered set of configuration layers.
#[derive(Debug, Clone)]
pub struct MergedConfig<'a> {
    /// Ordered list of config layers (first = lowest priority, last = highest)
    layers: Vec<&'a Value>,
}

impl<'a> MergedConfig<'a> {
    /// Create a merged config from multiple layers.
    ///
    /// Layers are ordered by priority: first = lowest priority, last = highest.
    pub fn new(layers: Vec<&'a Value>) -> Self {
        MergedConfig { layers }
    }

    /// Create an empty merged config.
    pub fn empty() -> Self {
        MergedConfig { layers: Vec::new() }
    }

    /// Add a new layer (returns new MergedConfig, doesn't mutate).
    ///
    /// The new layer has higher priority than existing layers.
    pub fn with_layer(&self, layer: &'a Value) -> MergedConfig<'a> {
        let mut new_layers = self.layers.clone();
        new_layers.push(layer);
        MergedConfig { layers: new_layers }
    }

    /// Get the number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Materialize with default options.
    ///
    /// An empty layer list materializes to `{}`.
    pub fn materialize(&self) -> Result<Value, ConfigError> {
        self.materialize_with_options(&MaterializeOptions::default())
    }

    /// Materialize with custom options.
    pub fn materialize_with_options(
        &self,
        options: &MaterializeOptions,
    ) -> Result<Value, ConfigError> {
        let mut result = Value::Object(ConfigMap::new());
        for layer in &self.layers {
            check_depth(layer, 0, options.max_depth, &mut Vec::new())?;
            merge_into(&mut result, layer);
        }
        Ok(result)
    }
}

/// Deep-merge `source` into `target` (source wins).
///
/// `source` is cloned where it is taken over, never referenced.
pub fn merge_into(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                let both_objects =
                    value.is_object() && target_map.get(key).is_some_and(Value::is_object);
                if !both_objects {
                    target_map.insert(key.clone(), value.clone());
                } else if let Some(existing) = target_map.get_mut(key) {
                    merge_into(existing, value);
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

fn check_depth(
    value: &Value,
    depth: usize,
    max_depth: usize,
    path: &mut Vec<String>,
) -> Result<(), ConfigError> {
    if depth > max_depth {
        return Err(ConfigError::NestingTooDeep {
            max_depth,
            path: path.clone(),
        });
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(key.clone());
                check_depth(child, depth + 1, max_depth, path)?;
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(index.to_string());
                check_depth(child, depth + 1, max_depth, path)?;
                path.pop();
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_right_bias_per_leaf() {
        let a = json!({"x": "a", "y": "a", "z": "a", "nested": {"p": 1, "q": 1}});
        let b = json!({"y": "b", "z": "b", "nested": {"q": 2}});
        let c = json!({"z": "c", "nested": {"r": 3}});

        let merged = MergedConfig::new(vec![&a, &b, &c]).materialize().unwrap();

        assert_eq!(
            merged,
            json!({"x": "a", "y": "b", "z": "c", "nested": {"p": 1, "q": 2, "r": 3}})
        );
    }

    #[test]
    fn test_arrays_are_replaced() {
        let a = json!({"list": [1, 2, 3]});
        let b = json!({"list": [4]});
        let merged = MergedConfig::new(vec![&a, &b]).materialize().unwrap();
        assert_eq!(merged, json!({"list": [4]}));
    }

    #[test]
    fn test_scalar_replaces_object_and_back() {
        let a = json!({"k": {"deep": true}});
        let b = json!({"k": "flat"});
        let c = json!({"k": {"other": 1}});

        let ab = MergedConfig::new(vec![&a, &b]).materialize().unwrap();
        assert_eq!(ab, json!({"k": "flat"}));

        let abc = MergedConfig::new(vec![&a, &b, &c]).materialize().unwrap();
        assert_eq!(abc, json!({"k": {"other": 1}}));
    }

    #[test]
    fn test_merge_never_mutates_layers() {
        let defaults = json!({"editor": {"fontSize": 12, "theme": "vs"}});
        let snapshot = defaults.clone();
        let first = json!({"editor": {"fontSize": 20}});
        let second = json!({"editor": {"theme": "dark"}});

        let one = MergedConfig::new(vec![&defaults, &first]).materialize().unwrap();
        let two = MergedConfig::new(vec![&defaults, &second]).materialize().unwrap();

        assert_eq!(defaults, snapshot);
        assert_eq!(one, json!({"editor": {"fontSize": 20, "theme": "vs"}}));
        assert_eq!(two, json!({"editor": {"fontSize": 12, "theme": "dark"}}));
    }

    #[test]
    fn test_materialized_values_are_independent() {
        let defaults = json!({"editor": {"fontSize": 12}});
        let merged = MergedConfig::new(vec![&defaults]);

        let mut one = merged.materialize().unwrap();
        let two = merged.materialize().unwrap();
        one["editor"]["fontSize"] = json!(99);

        assert_eq!(two["editor"]["fontSize"], json!(12));
        assert_eq!(defaults["editor"]["fontSize"], json!(12));
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(MergedConfig::empty().materialize().unwrap(), json!({}));
        assert_eq!(MergedConfig::empty().layer_count(), 0);
    }

    #[test]
    fn test_with_layer_adds_highest_priority() {
        let a = json!({"k": 1});
        let b = json!({"k": 2});
        let base = MergedConfig::new(vec![&a]);
        let layered = base.with_layer(&b);

        assert_eq!(base.layer_count(), 1);
        assert_eq!(layered.layer_count(), 2);
        assert_eq!(layered.materialize().unwrap(), json!({"k": 2}));
    }

    #[test]
    fn test_depth_limit() {
        let deep = json!({"a": {"b": {"c": 1}}});
        let options = MaterializeOptions { max_depth: 2 };
        let err = MergedConfig::new(vec![&deep])
            .materialize_with_options(&options)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NestingTooDeep { ref path, .. } if path == &["a", "b", "c"]
        ));
    }
}
