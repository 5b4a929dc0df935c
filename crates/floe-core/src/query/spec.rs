//! Module: query::spec
//! Responsibility: the caller-facing query vocabulary.
//! Does not own: JSON parsing, compilation, execution.

use crate::{
    query::{QueryError, parse},
    value::Value,
};

///
/// RangeOp
///
/// Inequality operators accepted inside a filter constraint document.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum RangeOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl RangeOp {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
        }
    }

    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "$gt" => Some(Self::Gt),
            "$gte" => Some(Self::Gte),
            "$lt" => Some(Self::Lt),
            "$lte" => Some(Self::Lte),
            _ => None,
        }
    }
}

///
/// FilterValue
///
/// A single constraint against one field. Equality carries the value
/// directly; ranges carry the operator beside it, so an equality match
/// against a value that merely looks like an operator document cannot
/// be confused with a range.
///

#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    Equals(Value),
    Range(RangeOp, Value),
}

///
/// FilterEntry
///

#[derive(Clone, Debug, PartialEq)]
pub struct FilterEntry {
    pub field: String,
    pub value: FilterValue,
}

///
/// FilterSpec
///
/// Ordered conjunction of field constraints. Entry order is preserved
/// into the compiled query.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterSpec {
    entries: Vec<FilterEntry>,
}

impl FilterSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push(FilterEntry {
            field: field.into(),
            value: FilterValue::Equals(value.into()),
        });
        self
    }

    #[must_use]
    pub fn gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.range(field, RangeOp::Gt, value)
    }

    #[must_use]
    pub fn gte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.range(field, RangeOp::Gte, value)
    }

    #[must_use]
    pub fn lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.range(field, RangeOp::Lt, value)
    }

    #[must_use]
    pub fn lte(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.range(field, RangeOp::Lte, value)
    }

    #[must_use]
    pub fn range(mut self, field: impl Into<String>, op: RangeOp, value: impl Into<Value>) -> Self {
        self.entries.push(FilterEntry {
            field: field.into(),
            value: FilterValue::Range(op, value.into()),
        });
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Positive means ascending, everything else descending.
    #[must_use]
    pub const fn from_signum(n: f64) -> Self {
        if n > 0.0 { Self::Asc } else { Self::Desc }
    }
}

///
/// SortSpec
///
/// Ordered list of sort keys. Earlier fields take precedence.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SortSpec {
    fields: Vec<(String, SortDirection)>,
}

impl SortSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[must_use]
    pub fn asc(self, field: impl Into<String>) -> Self {
        self.by(field, SortDirection::Asc)
    }

    #[must_use]
    pub fn desc(self, field: impl Into<String>) -> Self {
        self.by(field, SortDirection::Desc)
    }

    #[must_use]
    pub fn by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.fields.push((field.into(), direction));
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[(String, SortDirection)] {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

///
/// ProjectionSpec
///
/// Fields to return instead of the full record. Empty means everything.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectionSpec {
    fields: Vec<String>,
}

impl ProjectionSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        if !self.fields.contains(&field) {
            self.fields.push(field);
        }
        self
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

///
/// PageSpec
///
/// Page size cap and the number of leading rows to pass over. The
/// offset applies to the first execution of a query only; continuation
/// resumes from position, not offset.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PageSpec {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl PageSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            limit: None,
            offset: 0,
        }
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }
}

///
/// QuerySpec
///
/// Everything a read operation needs: filter, projection, sort, and
/// page bounds.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuerySpec {
    pub filter: FilterSpec,
    pub projection: ProjectionSpec,
    pub sort: SortSpec,
    pub page: PageSpec,
}

impl QuerySpec {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filter: FilterSpec::new(),
            projection: ProjectionSpec::new(),
            sort: SortSpec::new(),
            page: PageSpec::new(),
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterSpec) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn projection(mut self, projection: ProjectionSpec) -> Self {
        self.projection = projection;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.page.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.page.offset = offset;
        self
    }

    /// Build a spec from the three JSON documents of the dynamic form:
    /// filter, projection, and parameters (`limit`, `skip`, `sort`).
    pub fn from_json(
        filter: &serde_json::Value,
        projection: &serde_json::Value,
        params: &serde_json::Value,
    ) -> Result<Self, QueryError> {
        let filter = parse::filter_from_json(filter)?;
        let projection = parse::projection_from_json(projection)?;
        let (page, sort) = parse::params_from_json(params)?;

        Ok(Self {
            filter,
            projection,
            sort,
            page,
        })
    }
}

///
/// TESTS
///
