//! Persisted value-table record.
//!
//! On disk a table is two parallel sequences: `keys[i]` owns `values[i]`.
//!
//! ```json
//! { "keys": ["0_2", "3_1"], "values": [[0.0, 0.4, 0.0, 0.0, 0.0], [0.1, 0.0, 0.0, -0.2, 0.0]] }
//! ```
//!
//! This type only carries the shape; validation (matching lengths, key
//! syntax, vector length) happens when the record is turned back into a table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueRecord {
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub values: Vec<Vec<f32>>,
}

impl ValueRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry, keeping both sequences aligned.
    pub fn push(&mut self, key: impl Into<String>, values: Vec<f32>) {
        self.keys.push(key.into());
        self.values.push(values);
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// True when both sequences have the same length.
    pub fn is_aligned(&self) -> bool {
        self.keys.len() == self.values.len()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}
