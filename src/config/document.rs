use std::collections::BTreeMap;
use std::path::Path;

use crate::foundation::error::{ZvisError, ZvisResult};

/// String-keyed properties of one section. Keys are lower-case.
pub type Properties = BTreeMap<String, String>;

/// Section whose keys act as fallbacks for every other section. It is never a section itself.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Parsed sectioned key/value configuration.
///
/// Grammar, line by line:
/// - `[name]` opens (or re-opens) a section;
/// - `key = value` / `key: value` sets a property, the key case-folded, both sides trimmed;
/// - a `;` preceded by whitespace in a value starts a trailing comment;
/// - blank lines and lines starting with `#` or `;` are skipped;
/// - an indented line continues the previous value on a new line.
///
/// Keys of a `[DEFAULT]` section fill in whatever every other section leaves unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    sections: BTreeMap<String, Properties>,
    defaults: Properties,
}

impl ConfigDocument {
    /// Parse configuration text.
    pub fn parse(text: &str) -> ZvisResult<Self> {
        let mut sections = BTreeMap::<String, Properties>::new();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let lineno = idx + 1;
            let line = raw.trim_end_matches('\r');
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if line.starts_with(char::is_whitespace) {
                if let (Some(section), Some(key)) = (current.as_ref(), last_key.as_ref())
                    && let Some(value) = sections
                        .get_mut(section)
                        .and_then(|props| props.get_mut(key))
                {
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
                return Err(ZvisError::config(format!(
                    "line {lineno}: continuation line without a preceding key"
                )));
            }

            if let Some(rest) = trimmed.strip_prefix('[') {
                let Some(name) = rest.strip_suffix(']') else {
                    return Err(ZvisError::config(format!(
                        "line {lineno}: unterminated section header '{trimmed}'"
                    )));
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(ZvisError::config(format!(
                        "line {lineno}: empty section name"
                    )));
                }
                sections.entry(name.to_string()).or_default();
                current = Some(name.to_string());
                last_key = None;
                continue;
            }

            let Some(sep) = trimmed.find(['=', ':']) else {
                return Err(ZvisError::config(format!(
                    "line {lineno}: expected 'key = value', got '{trimmed}'"
                )));
            };
            let key = trimmed[..sep].trim().to_lowercase();
            if key.is_empty() {
                return Err(ZvisError::config(format!("line {lineno}: empty key")));
            }
            let value = strip_inline_comment(trimmed[sep + 1..].trim()).to_string();

            let Some(section) = current.as_ref() else {
                return Err(ZvisError::config(format!(
                    "line {lineno}: key '{key}' appears before any [section] header"
                )));
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.clone(), value);
            last_key = Some(key);
        }

        let defaults = sections.remove(DEFAULT_SECTION).unwrap_or_default();
        for props in sections.values_mut() {
            for (key, value) in &defaults {
                props
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
        }

        Ok(Self { sections, defaults })
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: &Path) -> ZvisResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ZvisError::config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::parse(&text).map_err(|e| match e {
            ZvisError::Config(msg) => {
                ZvisError::config(format!("config file '{}': {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Fallback properties from `[DEFAULT]`, already merged into every section.
    pub fn defaults(&self) -> &Properties {
        &self.defaults
    }

    /// Properties of a section, if present.
    pub fn section(&self, name: &str) -> Option<&Properties> {
        self.sections.get(name)
    }

    /// Properties of a section that must be present.
    pub fn require_section(&self, name: &str) -> ZvisResult<&Properties> {
        self.section(name)
            .ok_or_else(|| ZvisError::config(format!("missing section [{name}]")))
    }

    /// Section names in lexicographic order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Sections in lexicographic order of their names.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Properties)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn strip_inline_comment(value: &str) -> &str {
    let bytes = value.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b';' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return value[..i].trim_end();
        }
    }
    value
}

#[cfg(test)]
#[path = "../../tests/unit/config/document.rs"]
mod tests;
