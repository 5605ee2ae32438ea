use serde::{Deserialize, Serialize};

use crate::Result;

pub const DEFAULT_NAMESPACE: &str = "z";
pub const DEFAULT_NAME_PREFIX: &str = "schema";

pub const NAMESPACE_ENV: &str = "SCHEMA_HOIST_NAMESPACE";
pub const NAME_PREFIX_ENV: &str = "SCHEMA_HOIST_PREFIX";

/// Where the block of hoisted declarations lands in the program body.
///
/// Both variants keep a leading directive prologue (`"use strict"`) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsertionPoint {
    /// Before every pre-existing top-level statement.
    #[default]
    ProgramStart,
    /// After the leading run of import declarations.
    AfterImports,
}

/// Knobs of the schema hoisting pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoistOptions {
    /// Identifier whose call chains are hoisted.
    pub namespace: String,
    /// Stem of generated declaration names (`_schema`, `_schema2`, ...).
    pub name_prefix: String,
    pub insertion: InsertionPoint,
}

impl Default for HoistOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            insertion: InsertionPoint::default(),
        }
    }
}

impl HoistOptions {
    /// Applies `SCHEMA_HOIST_*` values from `lookup`; blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };
        if let Some(namespace) = read(NAMESPACE_ENV) {
            self.namespace = namespace;
        }
        if let Some(prefix) = read(NAME_PREFIX_ENV) {
            self.name_prefix = prefix;
        }
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    pub fn with_insertion(mut self, insertion: InsertionPoint) -> Self {
        self.insertion = insertion;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.namespace) {
            bail!("namespace `{}` is not a valid identifier", self.namespace);
        }
        let stem = self.name_prefix.trim_start_matches('_');
        if !is_identifier(stem) {
            bail!(
                "name prefix `{}` does not produce valid identifiers",
                self.name_prefix
            );
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first == '$' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c == '$' || c.is_alphanumeric())
}
