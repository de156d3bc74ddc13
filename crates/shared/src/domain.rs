use std::{
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Server-assigned contact identifier. Backends hand out either integers or
/// strings, so both shapes are accepted on the wire.
///
/// Ids compare by their wire text: `Numeric(1)` equals `Text("1")`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl PartialEq for ContactId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Numeric(n), Self::Text(t)) | (Self::Text(t), Self::Numeric(n)) => {
                *t == n.to_string()
            }
        }
    }
}

impl Eq for ContactId {}

impl Hash for ContactId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Numeric(id) => id.to_string().hash(state),
            Self::Text(id) => id.hash(state),
        }
    }
}

impl FromStr for ContactId {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Ok(match raw.parse::<i64>() {
            Ok(id) => Self::Numeric(id),
            Err(_) => Self::Text(raw.to_string()),
        })
    }
}

impl From<i64> for ContactId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

/// Tags attached to a contact.
///
/// Kept in first-seen order for display, but compared as a set. On the wire
/// the whole set travels as a single comma-joined string.
#[derive(Debug, Clone, Default)]
pub struct Tags(Vec<String>);

impl Tags {
    pub const SEPARATOR: char = ',';

    pub fn parse(raw: &str) -> Self {
        raw.split(Self::SEPARATOR).collect()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|existing| existing == tag)
    }

    /// Adds `tag` unless it is blank or already present. Returns whether the
    /// set changed.
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != tag);
        self.0.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = Tags::default();
        for tag in iter {
            tags.insert(tag.as_ref());
        }
        tags
    }
}

impl PartialEq for Tags {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.iter().all(|tag| other.contains(tag))
    }
}

impl Eq for Tags {}

impl Serialize for Tags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Tags::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub tags: Tags,
}

impl Contact {
    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Request body for create and update: a contact without its identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(default)]
    pub tags: Tags,
}

impl ContactDraft {
    pub fn into_contact(self, id: ContactId) -> Contact {
        Contact {
            id,
            full_name: self.full_name,
            email: self.email,
            phone_number: self.phone_number,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
