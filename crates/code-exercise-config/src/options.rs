//! Typed top-level plugin options.
//!
//! The effective options are the built-in defaults overlaid with whatever the
//! host configuration holds under [`PLUGIN_OPTIONS_KEY`]. The defaults are
//! rebuilt for every resolution, so no merge can leak into a later one.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::merged::MergedConfig;
use crate::types::{ConfigError, ConfigMap};

/// Reserved key of the host configuration object holding plugin options.
pub const PLUGIN_OPTIONS_KEY: &str = "codeExercise";

/// Prefix of element-scoped marker attributes (`data-code-exercise-content`, ...).
pub const DEFAULT_DATA_PREFIX: &str = "data-code-exercise-";

/// Prefix of dataset keys on the slide (`codeExerciseType`, ...).
pub const DEFAULT_DATA_SET_PREFIX: &str = "codeExercise";

pub const DEFAULT_EXERCISE_TYPE: &str = "html";

pub const DEFAULT_SHOW_PREVIEW: &str = "true";

/// Texts of the hints panel. `{count}` and `{index}` are substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackText {
    pub heading: String,
    pub intro: String,
    pub no_hints: String,
    pub success: String,
    pub toggle: String,
    pub hint_label: String,
    pub count: String,
    /// Live-region text when exactly one hint is shown.
    pub count_one: String,
}

impl Default for FeedbackText {
    fn default() -> Self {
        Self {
            heading: "Hints:".to_string(),
            intro: "Start working on the exercise!".to_string(),
            no_hints: "There are no hints yet.".to_string(),
            success: "Well done! Everything is correct!".to_string(),
            toggle: "Toggle hint".to_string(),
            hint_label: "Hint {index}".to_string(),
            count: "There are {count} hints.".to_string(),
            count_one: "There is 1 hint.".to_string(),
        }
    }
}

impl FeedbackText {
    /// Live-region text for `count` hints.
    pub fn count_text(&self, count: usize) -> String {
        let template = if count == 1 { &self.count_one } else { &self.count };
        template.replace("{count}", &count.to_string())
    }

    /// Accessible label of the 1-based hint `index`.
    pub fn hint_label_text(&self, index: usize) -> String {
        self.hint_label.replace("{index}", &index.to_string())
    }
}

/// Effective top-level options of one plugin instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    pub data_prefix: String,
    pub data_set_prefix: String,
    /// Exercise type used when a slide does not declare one.
    pub exercise_type: String,
    /// Preview flag used when a slide does not declare one (`"true"` enables it).
    pub show_preview: String,
    /// Base editor configuration, overridden per slide.
    pub monaco_editor_options: ConfigMap,
    pub feedback: FeedbackText,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            data_prefix: DEFAULT_DATA_PREFIX.to_string(),
            data_set_prefix: DEFAULT_DATA_SET_PREFIX.to_string(),
            exercise_type: DEFAULT_EXERCISE_TYPE.to_string(),
            show_preview: DEFAULT_SHOW_PREVIEW.to_string(),
            monaco_editor_options: ConfigMap::new(),
            feedback: FeedbackText::default(),
        }
    }
}

/// A fresh copy of the built-in defaults as a configuration tree.
pub fn builtin_defaults() -> Value {
    let feedback = FeedbackText::default();
    json!({
        "dataPrefix": DEFAULT_DATA_PREFIX,
        "dataSetPrefix": DEFAULT_DATA_SET_PREFIX,
        "exerciseType": DEFAULT_EXERCISE_TYPE,
        "showPreview": DEFAULT_SHOW_PREVIEW,
        "monacoEditorOptions": {},
        "feedback": {
            "heading": feedback.heading,
            "intro": feedback.intro,
            "noHints": feedback.no_hints,
            "success": feedback.success,
            "toggle": feedback.toggle,
            "hintLabel": feedback.hint_label,
            "count": feedback.count,
            "countOne": feedback.count_one,
        },
    })
}

/// Bring every field the defaults declare back to the default's shape.
///
/// Only keys present in `defaults` are checked; objects without declared
/// keys (`monacoEditorOptions`) accept any content.
fn coerce_to_defaults(value: &mut Value, defaults: &Value, path: &str) {
    let (Value::Object(fields), Value::Object(expected)) = (value, defaults) else {
        return;
    };

    for (key, default) in expected {
        let field = fields
            .entry(key.clone())
            .or_insert_with(|| default.clone());
        let field_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", path, key)
        };

        if field.is_object() && default.is_object() {
            coerce_to_defaults(field, default, &field_path);
            continue;
        }

        let replacement = match (&*field, default) {
            (Value::String(_), Value::String(_)) => None,
            (Value::Bool(b), Value::String(_)) => Some(Value::String(b.to_string())),
            (Value::Number(n), Value::String(_)) => Some(Value::String(n.to_string())),
            (other, _) => {
                tracing::warn!(
                    field = %field_path,
                    value = %other,
                    "Plugin option has the wrong type, using the default"
                );
                Some(default.clone())
            }
        };
        if let Some(replacement) = replacement {
            *field = replacement;
        }
    }
}

impl PluginOptions {
    /// Resolve the effective options from the host configuration object.
    ///
    /// Only the object under [`PLUGIN_OPTIONS_KEY`] is consulted. A missing or
    /// `null` entry leaves the defaults untouched; a non-object entry is
    /// ignored with a warning. Boolean and numeric scalars given for text
    /// fields are read as their string form (`true` becomes `"true"`); any
    /// other mistyped field falls back to its default with a warning.
    pub fn resolve(host_config: Option<&Value>) -> Result<Self, ConfigError> {
        let defaults = builtin_defaults();
        let mut merged = MergedConfig::new(vec![&defaults]);

        match host_config.and_then(|config| config.get(PLUGIN_OPTIONS_KEY)) {
            Some(host) if host.is_object() => merged = merged.with_layer(host),
            None | Some(Value::Null) => {}
            Some(other) => {
                tracing::warn!(
                    key = PLUGIN_OPTIONS_KEY,
                    value = %other,
                    "Host plugin options are not an object, ignoring them"
                );
            }
        }

        let mut value = merged.materialize()?;
        coerce_to_defaults(&mut value, &defaults, "");
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidOptions {
            message: e.to_string(),
        })
    }

    /// Element attribute marking the starter content (`data-code-exercise-content`).
    pub fn content_attribute(&self) -> String {
        format!("{}content", self.data_prefix)
    }

    /// Element attribute marking relocated custom content.
    pub fn custom_content_attribute(&self) -> String {
        format!("{}custom-content", self.data_prefix)
    }

    /// Dataset key for a suffix such as `Type` (`codeExerciseType`).
    pub fn dataset_key(&self, suffix: &str) -> String {
        format!("{}{}", self.data_set_prefix, suffix)
    }

    /// Dataset namespace of per-slide editor overrides (`codeExerciseMonaco`).
    pub fn editor_namespace(&self) -> String {
        self.dataset_key("Monaco")
    }
}
