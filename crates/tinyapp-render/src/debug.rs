//! Debug rendering engine.
//!
//! [`DebugEngine`] ignores template files altogether: the template name picks
//! one of a fixed set of dump formats. It is meant as the last member of a
//! [`MergedEngine`](crate::MergedEngine) chain, or for inspecting what an
//! action really returned.

use std::path::PathBuf;

use serde_json::Value;

use crate::engine::RenderingEngine;
use crate::error::RenderError;

/// Template names understood by [`DebugEngine`].
pub const DEBUG_MODES: &[&str] = &["plain", "json", "yaml", "debug", "tree"];

/// Default truncation length for strings in `tree` output.
pub const DEFAULT_TREE_STRING_LENGTH: usize = 64;

/// Engine dumping data in a format selected by the template name.
///
/// | template | output |
/// |----------|--------|
/// | `plain`  | strings as is, `null` as empty, anything else as compact JSON |
/// | `json`   | pretty-printed JSON |
/// | `yaml`   | YAML |
/// | `debug`  | Rust `{:#?}` of the value |
/// | `tree`   | box-drawing tree with type annotations |
///
/// Prefix, postfix and directories are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEngine {
    tree_string_length: usize,
}

impl Default for DebugEngine {
    fn default() -> Self {
        Self {
            tree_string_length: DEFAULT_TREE_STRING_LENGTH,
        }
    }
}

impl DebugEngine {
    /// Creates an engine truncating tree strings at 64 characters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the truncation length for strings in `tree` output.
    pub fn with_tree_string_length(mut self, length: usize) -> Self {
        self.tree_string_length = length;
        self
    }

    /// Returns the truncation length for strings in `tree` output.
    pub fn tree_string_length(&self) -> usize {
        self.tree_string_length
    }

    fn tree(&self, key: &str, value: &Value, gap: &str) -> String {
        let mut out = self.pair(key, value);

        let children: Vec<(String, &Value)> = match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            _ => return out,
        };

        let count = children.len();
        let indent = " ".repeat(format!("{}{}", key, count).chars().count());
        let prefix = format!("{}  {} ", gap, indent);

        for (i, (sub_key, sub_value)) in children.into_iter().enumerate() {
            let last = i + 1 == count;
            out.push('\n');
            out.push_str(&prefix);
            out.push(if last { '└' } else { '├' });
            let child_gap = format!("{}{}", prefix, if last { ' ' } else { '│' });
            out.push_str(&self.tree(&sub_key, sub_value, &child_gap));
        }

        out
    }

    fn pair(&self, key: &str, value: &Value) -> String {
        match value {
            Value::Null => format!(" {} => [null]", key),
            Value::Bool(b) => format!(" {} => [bool] {}", key, b),
            Value::Number(n) if n.is_f64() => format!(" {} => [float] {}", key, n),
            Value::Number(n) => format!(" {} => [int] {}", key, n),
            Value::String(s) => {
                let len = s.chars().count();
                if len > self.tree_string_length {
                    let cut: String = s.chars().take(self.tree_string_length).collect();
                    format!(" {} => [string({})] \"{}...\"", key, len, cut)
                } else {
                    format!(" {} => [string({})] \"{}\"", key, len, s)
                }
            }
            Value::Array(items) if items.is_empty() => format!(" {}[0]", key),
            Value::Object(map) if map.is_empty() => format!(" {}[0]", key),
            Value::Array(items) => format!(" {}[{}]┐", key, items.len()),
            Value::Object(map) => format!(" {}[{}]┐", key, map.len()),
        }
    }
}

fn plain(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl RenderingEngine for DebugEngine {
    fn render(&self, data: &Value, template: &str) -> Result<String, RenderError> {
        match template {
            "plain" => Ok(plain(data)),
            "json" => Ok(serde_json::to_string_pretty(data)?),
            "yaml" => Ok(serde_yaml::to_string(data)?),
            "debug" => Ok(format!("{:#?}", data)),
            "tree" => Ok(self.tree("root", data, "")),
            other => Err(RenderError::not_found_with(
                other,
                format!("valid names are: {}", DEBUG_MODES.join(", ")),
            )),
        }
    }

    fn set_template_prefix(&mut self, _prefix: &str) {}

    fn set_template_postfix(&mut self, _postfix: &str) {}

    fn template_prefix(&self) -> &str {
        ""
    }

    fn template_postfix(&self) -> &str {
        ""
    }

    fn add_template_directories(&mut self, _dirs: &[PathBuf]) {}

    fn remove_template_directories(&mut self, _dirs: &[PathBuf]) {}

    fn template_directories(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "debug"
    }
}
