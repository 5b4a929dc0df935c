//! Module: response
//! Responsibility: the decoded result set of one read, with cardinality
//! helpers for callers that expect exactly one record.

use crate::record::{Record, RecordId};
use thiserror::Error as ThisError;

///
/// ResponseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ResponseError {
    #[error("expected one record, found none")]
    NotFound,

    #[error("expected one record, found {count}")]
    NotUnique { count: usize },
}

///
/// Response
///
/// Records of one page or one whole read, in store order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response(pub Vec<Record>);

impl Response {
    #[must_use]
    pub const fn new(records: Vec<Record>) -> Self {
        Self(records)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.0
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.0
    }

    /// Identifiers of the returned records, skipping any without one.
    #[must_use]
    pub fn ids(&self) -> Vec<RecordId> {
        self.0
            .iter()
            .filter_map(|record| record.id().cloned())
            .collect()
    }

    /// Exactly one record, or an error.
    pub fn one(self) -> Result<Record, ResponseError> {
        let mut records = self.0;
        match records.len() {
            0 => Err(ResponseError::NotFound),
            1 => records.pop().ok_or(ResponseError::NotFound),
            count => Err(ResponseError::NotUnique { count }),
        }
    }

    /// At most one record; absence is not an error.
    pub fn one_opt(self) -> Result<Option<Record>, ResponseError> {
        let mut records = self.0;
        match records.len() {
            0 => Ok(None),
            1 => Ok(records.pop()),
            count => Err(ResponseError::NotUnique { count }),
        }
    }
}

impl From<Vec<Record>> for Response {
    fn from(records: Vec<Record>) -> Self {
        Self(records)
    }
}

impl IntoIterator for Response {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Response {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> Record {
        Record::new().with_id(id)
    }

    #[test]
    fn one_requires_exactly_one_record() {
        assert_eq!(Response::new(vec![]).one(), Err(ResponseError::NotFound));

        let single = Response::new(vec![record("a")]).one().unwrap();
        assert_eq!(single.id().map(RecordId::as_str), Some("a"));

        assert_eq!(
            Response::new(vec![record("a"), record("b")]).one(),
            Err(ResponseError::NotUnique { count: 2 })
        );
    }

    #[test]
    fn one_opt_treats_absence_as_none() {
        assert_eq!(Response::new(vec![]).one_opt(), Ok(None));
        assert!(Response::new(vec![record("a")]).one_opt().unwrap().is_some());
        assert_eq!(
            Response::new(vec![record("a"), record("b")]).one_opt(),
            Err(ResponseError::NotUnique { count: 2 })
        );
    }

    #[test]
    fn ids_collects_present_identifiers() {
        let response = Response::new(vec![record("a"), Record::new(), record("b")]);

        let ids: Vec<String> = response.ids().into_iter().map(RecordId::into_string).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
