//! Declarative configuration for code exercise slides.
//!
//! This crate turns the flat, prefix-scoped attributes a slide author writes
//! into structured configuration, and combines configuration from several
//! sources into one effective tree.
//!
//! # Key Features
//!
//! - **Namespace parsing**: `fooBarEditorFontSize="14"` under prefix `fooBar`
//!   becomes `{"editor": {"font": {"size": 14}}}`
//! - **Best-effort decoding**: leaf values are JSON when they parse, raw strings otherwise
//! - **Right-biased deep merge**: later layers win per leaf, sibling keys coexist
//! - **No aliasing**: merging never writes into any of its input layers
//!
//! # Architecture
//!
//! - [`parse_namespace`]: flat attributes to a nested [`ConfigMap`]
//! - [`MergedConfig`]: ordered layers (first = lowest priority) materialized into one value
//! - [`PluginOptions`]: the typed top-level options (defaults < host overrides)
//!
//! # Example
//!
//! ```rust
//! use code_exercise_config::{MergedConfig, parse_dataset};
//! use indexmap::IndexMap;
//! use serde_json::{Value, json};
//!
//! let mut dataset = IndexMap::new();
//! dataset.insert("fooBar".to_string(), "{}".to_string());
//! dataset.insert("fooBarEditorFontSize".to_string(), "14".to_string());
//!
//! let slide = Value::Object(parse_dataset(&dataset, "fooBar"));
//! assert_eq!(slide, json!({"editor": {"font": {"size": 14}}}));
//!
//! let defaults = json!({"editor": {"font": {"size": 12, "family": "mono"}}});
//! let merged = MergedConfig::new(vec![&defaults, &slide]).materialize().unwrap();
//! assert_eq!(merged, json!({"editor": {"font": {"size": 14, "family": "mono"}}}));
//! ```

mod merged;
mod namespace;
mod options;
mod types;

pub use types::{ConfigError, ConfigMap};

pub use namespace::{decode_value, namespace_path, parse_dataset, parse_namespace};

pub use merged::{MaterializeOptions, MergedConfig, merge_into};

pub use options::{
    DEFAULT_DATA_PREFIX, DEFAULT_DATA_SET_PREFIX, DEFAULT_EXERCISE_TYPE, DEFAULT_SHOW_PREVIEW,
    FeedbackText, PLUGIN_OPTIONS_KEY, PluginOptions, builtin_defaults,
};

// Re-export for convenience
pub use serde_json::Value;
