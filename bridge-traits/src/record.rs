//! Schema-less result rows
//!
//! A [`Record`] is an ordered mapping from lower-cased column name to
//! [`QueryValue`]. Order follows the query projection so that serialized
//! payloads list columns the way the statement declared them.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::database::QueryValue;

/// Ordered, case-normalized key/value row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, QueryValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Insert a field, lower-casing the key.
    ///
    /// An existing key keeps its position and has its value replaced; the
    /// previous value is returned.
    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<QueryValue>) -> Option<QueryValue> {
        let key = key.as_ref().to_lowercase();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    /// Look up a field by name (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        let key = key.to_lowercase();
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in projection order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Shallow union of `self` and `other`, producing a new record.
    ///
    /// Fields of `other` win on key collision; keys only present in `other`
    /// are appended in `other`'s order. Neither input is modified.
    pub fn merged_with(&self, other: &Record) -> Record {
        let mut merged = self.clone();
        for (key, value) in &other.fields {
            merged.insert(key, value.clone());
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: AsRef<str>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, QueryValue);
    type IntoIter = std::vec::IntoIter<(String, QueryValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_lowercases_and_keeps_order() {
        let mut record = Record::new();
        record.insert("Release_Name", "Abbey Road");
        record.insert("YEAR", 1969);
        record.insert("artist", "The Beatles");

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["release_name", "year", "artist"]);
        assert_eq!(record.get("release_name"), Some(&QueryValue::Text("Abbey Road".into())));
        assert_eq!(record.get("Year"), Some(&QueryValue::Int32(1969)));
    }

    #[test]
    fn test_insert_existing_key_replaces_in_place() {
        let mut record: Record = vec![("a", 1), ("b", 2)].into_iter().collect();
        let previous = record.insert("a", 10);

        assert_eq!(previous, Some(QueryValue::Int32(1)));
        assert_eq!(record.len(), 2);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&QueryValue::Int32(10)));
    }

    #[test]
    fn test_merged_with_other_wins_and_originals_untouched() {
        let base: Record = vec![("id", QueryValue::Int32(7)), ("title", "A".into())]
            .into_iter()
            .collect();
        let tag: Record = vec![("id", QueryValue::Int32(7)), ("tag", "rock".into())]
            .into_iter()
            .collect();

        let merged = base.merged_with(&tag);

        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["id", "title", "tag"]);
        assert_eq!(merged.get("tag"), Some(&QueryValue::Text("rock".into())));
        assert!(!base.contains_key("tag"));
        assert_eq!(tag.len(), 2);
    }

    #[test]
    fn test_serializes_in_projection_order() {
        let record: Record = vec![
            ("year", QueryValue::Int32(1997)),
            ("artist", "Radiohead".into()),
            ("month", QueryValue::Null),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"year":1997,"artist":"Radiohead","month":null}"#);
    }

    #[test]
    fn test_empty_record_serializes_as_empty_object() {
        assert_eq!(serde_json::to_string(&Record::new()).unwrap(), "{}");
    }
}
