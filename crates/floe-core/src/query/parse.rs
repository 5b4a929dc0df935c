//! Module: query::parse
//! Responsibility: lower the three JSON documents of the dynamic query
//! form (filter, projection, parameters) into typed specs.
//! Boundary: rejects unknown operators and array values up front, before
//! anything reaches the store.

use crate::{
    query::{FilterSpec, PageSpec, ProjectionSpec, QueryError, RangeOp, SortDirection, SortSpec},
    value,
};

const PARAM_LIMIT: &str = "limit";
const PARAM_SKIP: &str = "skip";
const PARAM_SORT: &str = "sort";

/// Parse a filter document. `null` means no constraints. Each key is a
/// field name; a scalar value is an equality constraint, an object is a
/// map of range operators, and an array is rejected.
pub fn filter_from_json(doc: &serde_json::Value) -> Result<FilterSpec, QueryError> {
    let mut spec = FilterSpec::new();

    let map = match doc {
        serde_json::Value::Null => return Ok(spec),
        serde_json::Value::Object(map) => map,
        _ => return Err(QueryError::FilterNotObject),
    };

    for (field, constraint) in map {
        spec = parse_constraint(spec, field, constraint)?;
    }

    Ok(spec)
}

fn parse_constraint(
    spec: FilterSpec,
    field: &str,
    constraint: &serde_json::Value,
) -> Result<FilterSpec, QueryError> {
    match constraint {
        serde_json::Value::Array(_) => Err(QueryError::ArrayFilter {
            field: field.to_string(),
        }),

        serde_json::Value::Object(ops) => {
            let mut spec = spec;
            for (keyword, operand) in ops {
                let Some(op) = RangeOp::from_keyword(keyword) else {
                    return Err(QueryError::InvalidOperator {
                        op: keyword.clone(),
                    });
                };
                if operand.is_array() {
                    return Err(QueryError::ArrayFilter {
                        field: field.to_string(),
                    });
                }

                spec = spec.range(field, op, value::from_json(operand));
            }

            Ok(spec)
        }

        scalar => Ok(spec.eq(field, value::from_json(scalar))),
    }
}

/// Parse a projection document: keys with truthy values are kept.
pub fn projection_from_json(doc: &serde_json::Value) -> Result<ProjectionSpec, QueryError> {
    let mut spec = ProjectionSpec::new();

    let map = match doc {
        serde_json::Value::Null => return Ok(spec),
        serde_json::Value::Object(map) => map,
        _ => return Err(QueryError::ProjectionNotObject),
    };

    for (field, flag) in map {
        if json_truthy(flag) {
            spec = spec.field(field);
        }
    }

    Ok(spec)
}

// JSON counterpart of loose boolean coercion in the dynamic form.
fn json_truthy(flag: &serde_json::Value) -> bool {
    match flag {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Parse the parameters document: `limit`, `skip`, and `sort`.
pub fn params_from_json(doc: &serde_json::Value) -> Result<(PageSpec, SortSpec), QueryError> {
    let mut page = PageSpec::new();
    let mut sort = SortSpec::new();

    let map = match doc {
        serde_json::Value::Null => return Ok((page, sort)),
        serde_json::Value::Object(map) => map,
        _ => return Err(QueryError::ParamsNotObject),
    };

    if let Some(limit) = map.get(PARAM_LIMIT) {
        page.limit = Some(parse_page_bound(PARAM_LIMIT, limit)?);
    }
    if let Some(skip) = map.get(PARAM_SKIP) {
        page.offset = parse_page_bound(PARAM_SKIP, skip)?;
    }
    if let Some(doc) = map.get(PARAM_SORT) {
        sort = sort_from_json(doc)?;
    }

    Ok((page, sort))
}

fn parse_page_bound(name: &'static str, bound: &serde_json::Value) -> Result<u32, QueryError> {
    bound
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(QueryError::InvalidPageBound { name })
}

/// Parse a sort document. Key order fixes precedence; a positive value
/// sorts ascending, anything else descending.
fn sort_from_json(doc: &serde_json::Value) -> Result<SortSpec, QueryError> {
    let mut spec = SortSpec::new();

    let serde_json::Value::Object(map) = doc else {
        return Err(QueryError::SortNotObject);
    };

    for (field, direction) in map {
        let Some(n) = direction.as_f64() else {
            return Err(QueryError::SortDirectionNotNumber {
                field: field.clone(),
            });
        };

        spec = spec.by(field, SortDirection::from_signum(n));
    }

    Ok(spec)
}

///
/// TESTS
///
