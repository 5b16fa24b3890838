//! Base implementation of records.
use crate::error::PixelqError;
use anyhow::Result;
use chrono::prelude::{DateTime, Local};
use std::{
    collections::{
        hash_map::{IntoIter, Iter, Keys},
        HashMap,
    },
    convert::Into,
    iter::IntoIterator,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone)]
pub enum RecordValue {
    /// Scalar, used for numeric values of a metric.
    Scalar(f32),

    /// Date and time.
    DateTime(DateTime<Local>),

    /// String, used for textual values.
    String(String),
}

/// Represents a record, a map from names to [`RecordValue`]s.
#[derive(Debug)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Constructs an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Constructs a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Constructs a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys of the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Returns an iterator over key-value pairs of the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns a consuming iterator over key-value pairs of the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Gets the value for the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns `true` if the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges records; entries of `record` win on key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar value for the given key.
    pub fn get_scalar(&self, k: &str) -> Result<f32> {
        match self
            .0
            .get(k)
            .ok_or_else(|| PixelqError::RecordKeyNotFound(k.to_string()))?
        {
            RecordValue::Scalar(v) => Ok(*v),
            _ => Err(PixelqError::RecordValueType(k.to_string()).into()),
        }
    }

    /// Gets a string value for the given key.
    pub fn get_string(&self, k: &str) -> Result<String> {
        match self
            .0
            .get(k)
            .ok_or_else(|| PixelqError::RecordKeyNotFound(k.to_string()))?
        {
            RecordValue::String(s) => Ok(s.clone()),
            _ => Err(PixelqError::RecordValueType(k.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordValue::Scalar};

    #[test]
    fn merge_prefers_right_hand_entries() {
        let r1 = Record::from_slice(&[("a", Scalar(1.0)), ("b", Scalar(2.0))]);
        let r2 = Record::from_slice(&[("b", Scalar(3.0))]);
        let merged = r1.merge(r2);
        assert_eq!(merged.get_scalar("a").unwrap(), 1.0);
        assert_eq!(merged.get_scalar("b").unwrap(), 3.0);
    }

    #[test]
    fn get_scalar_reports_missing_key() {
        let r = Record::empty();
        assert!(r.get_scalar("loss").is_err());
    }
}
