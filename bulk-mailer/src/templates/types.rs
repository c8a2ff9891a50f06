//! Template types and data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field that holds the destination address of a recipient
pub const EMAIL_FIELD: &str = "email";

/// One row of an uploaded contact list
///
/// Maps field names to values. The `email` field is the destination address;
/// every other field is available as a template variable (and so is `email`
/// itself). Fields are kept in sorted order so rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(BTreeMap<String, String>);

impl Recipient {
    /// Create an empty recipient
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Destination address, if the row has one
    pub fn email(&self) -> Option<&str> {
        self.get(EMAIL_FIELD)
    }

    /// Value of a single field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over `(field, value)` pairs in key order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Recipient
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Subject and HTML body, both of which may contain `{{field}}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Subject line
    pub subject: String,
    /// HTML body
    pub body: String,
}

impl EmailTemplate {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }
}
