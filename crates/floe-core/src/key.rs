use crate::{error::UsageError, record::RecordId};
use std::fmt;

///
/// CollectionName
///
/// Validated, non-empty collection identifier. First segment of every
/// record key path.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Result<Self, UsageError> {
        let name = name.into();
        if name.is_empty() {
            return Err(UsageError::EmptyCollection);
        }

        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for CollectionName {
    type Error = UsageError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

///
/// RecordKey
///
/// Store key path: `(collection)` while the identifier is still
/// unassigned, `(collection, id)` once complete. The identifier never
/// appears in the flat property set; decoding recovers it from here.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RecordKey {
    collection: CollectionName,
    id: Option<RecordId>,
}

impl RecordKey {
    /// Key for a record whose identifier the store will assign on write.
    #[must_use]
    pub const fn incomplete(collection: CollectionName) -> Self {
        Self {
            collection,
            id: None,
        }
    }

    /// Key addressing exactly one record.
    pub fn complete(collection: CollectionName, id: RecordId) -> Result<Self, UsageError> {
        if id.is_empty() {
            return Err(UsageError::EmptyIdentifier);
        }

        Ok(Self {
            collection,
            id: Some(id),
        })
    }

    #[must_use]
    pub const fn collection(&self) -> &CollectionName {
        &self.collection
    }

    #[must_use]
    pub const fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.id.is_some()
    }

    #[must_use]
    pub fn into_parts(self) -> (CollectionName, Option<RecordId>) {
        (self.collection, self.id)
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}/{id}", self.collection),
            None => write!(f, "{}", self.collection),
        }
    }
}

///
/// TESTS
///
