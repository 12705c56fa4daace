//! User override rules applied to every type name the engine emits.
//!
//! ```json
//! { "replacements": [ { "match": "/^Vendor_/", "replace": "V_" } ] }
//! ```

use std::path::Path;

use regex::Regex;
use serde_json::Value;

use crate::diagnostics::ConfigIssue;

pub const DEFAULT_CONFIG_FILE: &str = "nsflat.json";

#[derive(Debug, Clone)]
struct Replacement {
    pattern: Regex,
    template: String,
}

/// Ordered regex rewrite rules. Empty when no configuration is present.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    rules: Vec<Replacement>,
}

impl Overrides {
    pub fn none() -> Self {
        Self::default()
    }

    /// Load rules from `path`. A missing file means no rules; every other
    /// problem is logged and the offending piece ignored.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("no configuration at {}", path.display());
            return Self::none();
        }
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) => {
                tracing::warn!("{}", ConfigIssue::Unreadable { path: path.to_path_buf(), source });
                return Self::none();
            }
        };
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(source) => {
                tracing::warn!("{}", ConfigIssue::InvalidJson { path: path.to_path_buf(), source });
                return Self::none();
            }
        };

        let (overrides, issues) = Self::from_value(&value);
        for issue in &issues {
            tracing::warn!("{}: {issue}", path.display());
        }
        if !overrides.is_empty() {
            tracing::info!("found {} replacement patterns for rewriting classes", overrides.len());
        }
        overrides
    }

    /// Build rules from a parsed configuration, returning the issues found.
    pub fn from_value(value: &Value) -> (Self, Vec<ConfigIssue>) {
        let mut overrides = Self::none();
        let mut issues = Vec::new();

        let Some(root) = value.as_object() else {
            issues.push(ConfigIssue::RootNotObject);
            return (overrides, issues);
        };
        let Some(replacements) = root.get("replacements") else {
            return (overrides, issues);
        };
        let Some(entries) = replacements.as_array() else {
            issues.push(ConfigIssue::ReplacementsNotArray);
            return (overrides, issues);
        };

        for (index, entry) in entries.iter().enumerate() {
            let Some(raw_match) = entry.get("match").and_then(Value::as_str) else {
                issues.push(ConfigIssue::MissingField { index, field: "match" });
                continue;
            };
            let Some(raw_replace) = entry.get("replace").and_then(Value::as_str) else {
                issues.push(ConfigIssue::MissingField { index, field: "replace" });
                continue;
            };
            match Regex::new(&translate_pattern(raw_match)) {
                Ok(pattern) => overrides.rules.push(Replacement { pattern, template: translate_template(raw_replace) }),
                Err(source) => issues.push(ConfigIssue::InvalidPattern { index, source }),
            }
        }

        (overrides, issues)
    }

    /// Run `name` through every rule in order.
    pub fn apply(&self, name: &str) -> String {
        let mut out = name.to_string();
        for rule in &self.rules {
            let replaced = rule.pattern.replace_all(&out, rule.template.as_str()).into_owned();
            if replaced != out {
                tracing::trace!("override rewrote {out} to {replaced}");
            }
            out = replaced;
        }
        out
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

const DELIMITERS: &[char] = &['/', '#', '~', '!', '@', '%', '|', '+'];

/// `/body/flags` becomes `(?flags)body`; anything else is used verbatim.
fn translate_pattern(raw: &str) -> String {
    let Some(delimiter) = raw.chars().next().filter(|c| DELIMITERS.contains(c)) else {
        return raw.to_string();
    };
    let Some(close) = raw.rfind(delimiter).filter(|&at| at > 0) else {
        return raw.to_string();
    };
    let flags = &raw[close + 1..];
    if !flags.chars().all(|c| matches!(c, 'i' | 'm' | 's' | 'x' | 'u')) {
        return raw.to_string();
    }

    let body = raw[1..close].replace(&format!("\\{delimiter}"), &delimiter.to_string());
    let inline: String = flags.chars().filter(|&c| c != 'u').collect();
    if inline.is_empty() { body } else { format!("(?{inline}){body}") }
}

/// PCRE back-references `\1` become `${1}`.
fn translate_template(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek().is_some_and(char::is_ascii_digit) {
            let mut group = String::new();
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                group.push(d);
            }
            out.push_str(&format!("${{{group}}}"));
        } else {
            out.push(c);
        }
    }
    out
}
