//! Value Table Store
//!
//! Maps each observed [`StateKey`] to one learned score per [`Action`].
//! Entries are created lazily (all zeros) the first time a key is seen, and
//! the whole table round-trips through a [`ValueRecord`] for persistence.
//!
//! Saving replaces the file atomically; loading a file that does not exist
//! yields an empty table, while a corrupted file is an error.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use encounter_events::{Action, ActionValues, StateKey, ValueRecord, ACTION_COUNT};

use crate::error::TableError;

/// Per-agent lookup table of learned action values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueTable {
    entries: HashMap<StateKey, ActionValues>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the values for `key`, inserting an all-zero vector first if
    /// the key has never been seen.
    pub fn get_or_create(&mut self, key: StateKey) -> &ActionValues {
        self.entries.entry(key).or_insert([0.0; ACTION_COUNT])
    }

    pub fn get(&self, key: &StateKey) -> Option<&ActionValues> {
        self.entries.get(key)
    }

    /// Overwrites one action value. The key must already exist; call
    /// [`get_or_create`](Self::get_or_create) first in the same step.
    pub fn update(&mut self, key: StateKey, action: Action, value: f32) -> Result<(), TableError> {
        let values = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| TableError::MissingKey(key.to_string()))?;
        values[action.index()] = value;
        Ok(())
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Produces the persisted form. Keys are sorted so identical tables
    /// always serialize identically.
    pub fn to_record(&self) -> ValueRecord {
        let mut keys: Vec<&StateKey> = self.entries.keys().collect();
        keys.sort();

        let mut record = ValueRecord::new();
        for key in keys {
            record.push(key.to_string(), self.entries[key].to_vec());
        }
        record
    }

    /// Builds a table from its persisted form.
    ///
    /// Fails on misaligned sequences, unparseable keys and value vectors of
    /// the wrong length. A key listed twice keeps its last vector.
    pub fn from_record(record: &ValueRecord) -> Result<Self, TableError> {
        if !record.is_aligned() {
            return Err(TableError::LengthMismatch {
                keys: record.keys.len(),
                values: record.values.len(),
            });
        }

        let mut entries = HashMap::with_capacity(record.len());
        for (index, (raw_key, raw_values)) in record.keys.iter().zip(&record.values).enumerate() {
            let key: StateKey = raw_key
                .parse()
                .map_err(|source| TableError::InvalidKey { index, source })?;

            let values: ActionValues =
                raw_values
                    .as_slice()
                    .try_into()
                    .map_err(|_| TableError::VectorLength {
                        key: raw_key.clone(),
                        found: raw_values.len(),
                        expected: ACTION_COUNT,
                    })?;

            if entries.insert(key, values).is_some() {
                tracing::warn!("Duplicate key {} in value record, keeping the later entry", key);
            }
        }

        Ok(Self { entries })
    }

    /// Replaces the entire table with the contents of `record`. On error the
    /// current contents are left untouched.
    pub fn replace_from_record(&mut self, record: &ValueRecord) -> Result<(), TableError> {
        *self = Self::from_record(record)?;
        Ok(())
    }

    /// Loads a table from a JSON file. A missing file gives an empty table.
    pub fn load(path: &Path) -> Result<Self, TableError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No value table at {:?}, starting empty", path);
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(TableError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let record = ValueRecord::from_json(&content).map_err(|source| TableError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_record(&record)?;
        tracing::info!("Loaded value table from {:?} ({} states)", path, table.len());
        Ok(table)
    }

    /// Writes the table to `path` as JSON, replacing any existing file in a
    /// single rename.
    pub fn save(&self, path: &Path) -> Result<(), TableError> {
        let json = self
            .to_record()
            .to_json_pretty()
            .map_err(|source| TableError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        atomic_write(path, json.as_bytes()).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved value table to {:?} ({} states)", path, self.len());
        Ok(())
    }
}

/// Writes to a temporary sibling file, syncs it, then renames it over `path`.
fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let temp_name = format!(
        ".tmp_{}_{}",
        std::process::id(),
        path.file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default()
    );
    let temp_path = parent.join(temp_name);

    let result = File::create(&temp_path).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = result {
        fs::remove_file(&temp_path).ok();
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        fs::remove_file(&temp_path).ok();
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_inserts_zeros() {
        let mut table = ValueTable::new();
        let key = StateKey::new(3, 1);

        assert!(table.get(&key).is_none());
        assert_eq!(*table.get_or_create(key), [0.0; ACTION_COUNT]);
        assert_eq!(table.len(), 1);

        // Second call does not grow the table
        table.get_or_create(key);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_update_existing_key() {
        let mut table = ValueTable::new();
        let key = StateKey::new(2, 2);
        table.get_or_create(key);

        table.update(key, Action::MoveLeft, 0.75).unwrap();

        let values = table.get(&key).unwrap();
        assert_eq!(values[Action::MoveLeft.index()], 0.75);
        assert_eq!(values[Action::Idle.index()], 0.0);
    }

    #[test]
    fn test_update_missing_key_fails() {
        let mut table = ValueTable::new();
        let err = table
            .update(StateKey::new(1, 1), Action::Idle, 1.0)
            .unwrap_err();
        assert!(matches!(err, TableError::MissingKey(ref k) if k == "1_1"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_record_keys_are_sorted() {
        let mut table = ValueTable::new();
        table.get_or_create(StateKey::new(10, 0));
        table.get_or_create(StateKey::new(2, 3));
        table.get_or_create(StateKey::new(2, 1));

        let record = table.to_record();
        assert_eq!(record.keys, vec!["2_1", "2_3", "10_0"]);
        assert!(record.is_aligned());
    }

    #[test]
    fn test_record_round_trip_is_exact() {
        let mut table = ValueTable::new();
        let a = StateKey::new(0, 2);
        let b = StateKey::new(7, 3);
        table.get_or_create(a);
        table.get_or_create(b);
        table.update(a, Action::MoveToward, -0.123_456_79).unwrap();
        table.update(b, Action::MoveRight, 1.0e-7).unwrap();
        table.update(b, Action::Idle, 0.1).unwrap();

        let restored = ValueTable::from_record(&table.to_record()).unwrap();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_from_record_length_mismatch() {
        let mut record = ValueRecord::new();
        record.keys.push("1_1".to_string());
        let err = ValueTable::from_record(&record).unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { keys: 1, values: 0 }));
    }

    #[test]
    fn test_from_record_bad_vector_length() {
        let mut record = ValueRecord::new();
        record.push("1_1", vec![0.0; ACTION_COUNT - 1]);
        let err = ValueTable::from_record(&record).unwrap_err();
        assert!(matches!(err, TableError::VectorLength { found: 4, expected: 5, .. }));
    }

    #[test]
    fn test_from_record_bad_key() {
        let mut record = ValueRecord::new();
        record.push("0_0", vec![0.0; ACTION_COUNT]);
        record.push("near_left", vec![0.0; ACTION_COUNT]);
        let err = ValueTable::from_record(&record).unwrap_err();
        assert!(matches!(err, TableError::InvalidKey { index: 1, .. }));
    }

    #[test]
    fn test_from_record_duplicate_key_last_wins() {
        let mut record = ValueRecord::new();
        record.push("4_2", vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        record.push("4_2", vec![2.0, 0.0, 0.0, 0.0, 0.0]);

        let table = ValueTable::from_record(&record).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&StateKey::new(4, 2)).unwrap()[0], 2.0);
    }

    #[test]
    fn test_replace_from_record_keeps_table_on_error() {
        let mut table = ValueTable::new();
        table.get_or_create(StateKey::new(1, 0));

        let mut bad = ValueRecord::new();
        bad.values.push(vec![0.0; ACTION_COUNT]);
        assert!(table.replace_from_record(&bad).is_err());
        assert!(table.contains(&StateKey::new(1, 0)));

        let mut good = ValueRecord::new();
        good.push("9_3", vec![0.5; ACTION_COUNT]);
        table.replace_from_record(&good).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.contains(&StateKey::new(9, 3)));
    }
}
