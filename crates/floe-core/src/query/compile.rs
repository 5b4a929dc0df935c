//! Module: query::compile
//! Responsibility: lower a QuerySpec into the native store form.
//! Boundary: pure; the same inputs always produce an equal NativeQuery.

use crate::{
    codec::PACKED_FIELD,
    key::CollectionName,
    query::{
        CompareOp, NativeFilter, NativeQuery, QuerySpec, RangeOp,
        spec::{FilterEntry, FilterValue},
    },
    record::{ID_FIELD, RecordId},
};

/// Compile a spec against a collection. Filter entries, sort keys, and
/// page bounds carry over in spec order.
#[must_use]
pub fn compile(collection: &CollectionName, spec: &QuerySpec) -> NativeQuery {
    let filters = spec.filter.entries().iter().map(lower_entry).collect();

    NativeQuery {
        collection: collection.clone(),
        projection: lower_projection(spec),
        filters,
        order: spec.sort.fields().to_vec(),
        limit: spec.page.limit,
        offset: spec.page.offset,
        start: None,
    }
}

/// A non-empty projection also requests the packing sidecar; without it
/// a projected packed field could not be restored deterministically.
fn lower_projection(spec: &QuerySpec) -> Vec<String> {
    let mut projection = spec.projection.fields().to_vec();
    if !projection.is_empty() && !projection.iter().any(|field| field == PACKED_FIELD) {
        projection.push(PACKED_FIELD.to_string());
    }

    projection
}

/// Equality on the identifier field becomes a key filter when the value
/// has an identifier form (text or integer). Any other `_id` constraint
/// stays a property filter; the encoder never writes the identifier as
/// a property, so such a filter matches no row written through it.
fn lower_entry(entry: &FilterEntry) -> NativeFilter {
    match &entry.value {
        FilterValue::Equals(value) => {
            if entry.field == ID_FIELD
                && let Some(id) = RecordId::from_value(value)
            {
                return NativeFilter::KeyEquals { id };
            }

            NativeFilter::Field {
                name: entry.field.clone(),
                op: CompareOp::Eq,
                value: value.clone(),
            }
        }

        FilterValue::Range(op, value) => NativeFilter::Field {
            name: entry.field.clone(),
            op: lower_range_op(*op),
            value: value.clone(),
        },
    }
}

const fn lower_range_op(op: RangeOp) -> CompareOp {
    match op {
        RangeOp::Gt => CompareOp::Gt,
        RangeOp::Gte => CompareOp::Gte,
        RangeOp::Lt => CompareOp::Lt,
        RangeOp::Lte => CompareOp::Lte,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        query::{FilterSpec, ProjectionSpec, SortSpec},
        value::Value,
    };

    fn users() -> CollectionName {
        CollectionName::new("users").unwrap()
    }

    #[test]
    fn range_operators_lower_to_native_comparators() {
        let spec = QuerySpec::new().filter(
            FilterSpec::new()
                .gt("size", 1_i64)
                .gte("size", 2_i64)
                .lt("size", 8_i64)
                .lte("size", 9_i64),
        );
        let query = compile(&users(), &spec);

        let ops: Vec<CompareOp> = query
            .filters
            .iter()
            .map(|filter| match filter {
                NativeFilter::Field { op, .. } => *op,
                NativeFilter::KeyEquals { .. } => panic!("unexpected key filter"),
            })
            .collect();

        assert_eq!(
            ops,
            [CompareOp::Gt, CompareOp::Gte, CompareOp::Lt, CompareOp::Lte]
        );
    }

    #[test]
    fn id_equality_lowers_to_key_filter() {
        let spec = QuerySpec::new().filter(FilterSpec::new().eq(ID_FIELD, "42"));
        let query = compile(&users(), &spec);

        assert_eq!(
            query.filters,
            [NativeFilter::KeyEquals {
                id: RecordId::new("42")
            }]
        );
    }

    #[test]
    fn id_equality_without_identifier_form_stays_a_property_filter() {
        let spec = QuerySpec::new().filter(FilterSpec::new().eq(ID_FIELD, true));
        let query = compile(&users(), &spec);

        assert_eq!(
            query.filters,
            [NativeFilter::Field {
                name: ID_FIELD.to_string(),
                op: CompareOp::Eq,
                value: Value::Bool(true),
            }]
        );
    }

    #[test]
    fn projection_requests_the_packing_sidecar() {
        let spec = QuerySpec::new().projection(ProjectionSpec::new().field("name"));
        let query = compile(&users(), &spec);
        assert_eq!(query.projection, ["name", PACKED_FIELD]);

        // an empty projection means all fields; nothing to request
        let unprojected = compile(&users(), &QuerySpec::new());
        assert!(unprojected.projection.is_empty());
    }

    #[test]
    fn id_range_stays_a_property_filter() {
        let spec = QuerySpec::new().filter(FilterSpec::new().gt(ID_FIELD, "42"));
        let query = compile(&users(), &spec);

        assert_eq!(
            query.filters,
            [NativeFilter::Field {
                name: ID_FIELD.to_string(),
                op: CompareOp::Gt,
                value: Value::text("42"),
            }]
        );
    }

    #[test]
    fn order_and_page_bounds_carry_over_in_spec_order() {
        let spec = QuerySpec::new()
            .sort(SortSpec::new().asc("age").desc("name"))
            .limit(5)
            .offset(2);
        let query = compile(&users(), &spec);

        assert_eq!(query.order.len(), 2);
        assert_eq!(query.order[0].0, "age");
        assert_eq!(query.limit, Some(5));
        assert_eq!(query.offset, 2);
        assert_eq!(query.start, None);

        // deterministic: compiling the same spec twice yields equal queries
        assert_eq!(query, compile(&users(), &spec));
    }
}
