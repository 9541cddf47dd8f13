//! Schema normalization: free-form headers to canonical column keys.
//!
//! A canonical key is produced by, in order:
//!
//! 1. trimming leading and trailing whitespace,
//! 2. removing `(` and `)`,
//! 3. replacing each remaining whitespace character with `_`,
//! 4. replacing `%` with the literal `pct`,
//! 5. ASCII-lowercasing.
//!
//! Normalization is total and idempotent: a canonical key maps to itself.
//! When two headers collapse to the same key, later ones get a `_2`, `_3`, ...
//! suffix so keys stay unique.

use std::collections::HashSet;

use log::warn;
use serde::Serialize;

pub const COUNTRY_COLUMN: &str = "country";
pub const CONTINENT_COLUMN: &str = "continent";

pub fn canonical_column_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .replace('%', "pct")
        .to_ascii_lowercase()
}

/// One column of a normalized table, remembering the header it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub source: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    /// Normalizes every header, suffixing keys that collide with an earlier column.
    pub fn from_headers(headers: &[String]) -> Self {
        let mut taken: HashSet<String> = HashSet::with_capacity(headers.len());
        let mut columns = Vec::with_capacity(headers.len());
        for header in headers {
            let base = canonical_column_key(header);
            let mut key = base.clone();
            let mut n = 2;
            while taken.contains(&key) {
                key = format!("{base}_{n}");
                n += 1;
            }
            if key != base {
                warn!("Header '{header}' normalizes to taken key '{base}'; using '{key}'");
            }
            taken.insert(key.clone());
            columns.push(Column {
                source: header.clone(),
                key,
            });
        }
        Self { columns }
    }

    pub fn keys(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.key.clone()).collect()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.column_index(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Appends a derived column whose key is already canonical.
    pub(crate) fn push_derived(&mut self, key: &str) {
        self.columns.push(Column {
            source: key.to_string(),
            key: key.to_string(),
        });
    }
}
