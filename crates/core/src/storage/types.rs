use std::collections::BTreeMap;

use crate::notes::Note;

/// A scalar key value inside a continuation token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyValue {
    /// String attribute.
    S(String),
    /// Number attribute, kept in its textual form.
    N(String),
}

/// Opaque continuation token returned by a scan.
///
/// Maps key attribute names to the key of the last item evaluated. Callers
/// hand it back unchanged to resume the scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanCursor(BTreeMap<String, KeyValue>);

impl ScanCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: KeyValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&KeyValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &KeyValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, KeyValue)> for ScanCursor {
    fn from_iter<I: IntoIterator<Item = (String, KeyValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Result of a single scan call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    pub notes: Vec<Note>,
    /// Where the next call should resume; `None` once the table is exhausted.
    pub next: Option<ScanCursor>,
}
