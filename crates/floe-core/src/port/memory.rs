//! Module: port::memory
//! Responsibility: in-memory StorePort with the same observable contract
//! as a remote store: filters, ordering, projection, offset, and
//! positional continuation tokens.
//! Boundary: single process, no durability; rows live behind one mutex.

use crate::{
    key::{CollectionName, RecordKey},
    port::{StoreError, StorePort},
    query::{
        CompareOp, ContinuationToken, FlatProps, NativeFilter, NativeQuery, QueryPage, RawRow,
        SortDirection,
    },
    record::RecordId,
    value::{Value, canonical_cmp},
};
use async_trait::async_trait;
use std::{
    cmp::Ordering,
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

static NULL: Value = Value::Null;

///
/// MemoryStore
///
/// Store used by tests and local development. Identifier assignment is
/// a process-local counter; continuation tokens encode the absolute row
/// position reached so far.
///

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: BTreeMap<CollectionName, BTreeMap<RecordId, FlatProps>>,
    next_id: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held for a collection.
    pub fn row_count(&self, collection: &CollectionName) -> Result<usize, StoreError> {
        let state = self.lock()?;

        Ok(state.collections.get(collection).map_or(0, BTreeMap::len))
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::backend("memory store mutex poisoned"))
    }
}

#[async_trait]
impl StorePort for MemoryStore {
    async fn run_query(&self, query: &NativeQuery) -> Result<QueryPage, StoreError> {
        let state = self.lock()?;

        let mut rows = Vec::new();
        if let Some(collection) = state.collections.get(&query.collection) {
            for (id, props) in collection {
                if !matches_filters(id, props, &query.filters) {
                    continue;
                }

                let key = RecordKey::complete(query.collection.clone(), id.clone())
                    .map_err(|_| StoreError::backend("stored row has an empty identifier"))?;
                rows.push(RawRow {
                    key,
                    props: props.clone(),
                });
            }
        }
        drop(state);

        if !query.order.is_empty() {
            sort_rows(&mut rows, &query.order);
        }

        let start = match &query.start {
            Some(token) => parse_position(token)?,
            None => usize::try_from(query.offset).unwrap_or(usize::MAX),
        };

        Ok(page_rows(rows, start, query))
    }

    async fn put(&self, key: RecordKey, props: FlatProps) -> Result<RecordKey, StoreError> {
        let mut state = self.lock()?;

        let (collection, id) = key.into_parts();
        let id = match id {
            Some(id) => id,
            None => {
                state.next_id += 1;
                RecordId::new(state.next_id.to_string())
            }
        };

        state
            .collections
            .entry(collection.clone())
            .or_default()
            .insert(id.clone(), props);
        drop(state);

        RecordKey::complete(collection, id)
            .map_err(|_| StoreError::backend("assigned row identifier is empty"))
    }

    async fn delete(&self, key: RecordKey) -> Result<(), StoreError> {
        let mut state = self.lock()?;

        let (collection, id) = key.into_parts();
        let Some(id) = id else {
            return Err(StoreError::backend("delete requires a complete key"));
        };

        // removing an absent row is not an error here
        if let Some(rows) = state.collections.get_mut(&collection) {
            rows.remove(&id);
        }

        Ok(())
    }
}

fn matches_filters(id: &RecordId, props: &FlatProps, filters: &[NativeFilter]) -> bool {
    filters.iter().all(|filter| match filter {
        NativeFilter::KeyEquals { id: want } => id == want,
        NativeFilter::Field { name, op, value } => props
            .get(name)
            .is_some_and(|prop| op_matches(*op, canonical_cmp(prop, value))),
    })
}

const fn op_matches(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => matches!(ordering, Ordering::Equal),
        CompareOp::Gt => matches!(ordering, Ordering::Greater),
        CompareOp::Gte => !matches!(ordering, Ordering::Less),
        CompareOp::Lt => matches!(ordering, Ordering::Less),
        CompareOp::Lte => !matches!(ordering, Ordering::Greater),
    }
}

fn sort_rows(rows: &mut [RawRow], order: &[(String, SortDirection)]) {
    // stable sort keeps key order between equal rows
    rows.sort_by(|a, b| {
        for (field, direction) in order {
            let ordering = canonical_cmp(field_or_null(a, field), field_or_null(b, field));
            let ordering = match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    });
}

// absent fields sort as null, before every present value
fn field_or_null<'a>(row: &'a RawRow, field: &str) -> &'a Value {
    row.props.get(field).unwrap_or(&NULL)
}

fn parse_position(token: &ContinuationToken) -> Result<usize, StoreError> {
    token.as_str().parse().map_err(|_| {
        StoreError::backend(format!(
            "malformed continuation token: {}",
            token.as_str()
        ))
    })
}

fn page_rows(rows: Vec<RawRow>, start: usize, query: &NativeQuery) -> QueryPage {
    let total = rows.len();
    let limit = query
        .limit
        .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));

    let mut page: Vec<RawRow> = rows.into_iter().skip(start).take(limit).collect();

    if !query.projection.is_empty() {
        for row in &mut page {
            row.props
                .retain(|field, _| query.projection.contains(field));
        }
    }

    // a token on an empty page would replay the same position forever
    let consumed = start.saturating_add(page.len());
    let continuation = (query.limit.is_some() && !page.is_empty() && consumed < total)
        .then(|| ContinuationToken::new(consumed.to_string()));

    QueryPage {
        rows: page,
        continuation,
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> CollectionName {
        CollectionName::new("users").unwrap()
    }

    fn all_rows(collection: &CollectionName) -> NativeQuery {
        NativeQuery {
            collection: collection.clone(),
            projection: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: 0,
            start: None,
        }
    }

    fn row(age: i64, name: &str) -> FlatProps {
        let mut props = FlatProps::new();
        props.insert("age".to_string(), Value::Int(age));
        props.insert("name".to_string(), Value::text(name));
        props
    }

    async fn seed(store: &MemoryStore, rows: &[(&str, i64, &str)]) {
        for (id, age, name) in rows {
            let key = RecordKey::complete(users(), RecordId::new(*id)).unwrap();
            store.put(key, row(*age, name)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn put_assigns_sequential_identifiers() {
        let store = MemoryStore::new();

        let first = store
            .put(RecordKey::incomplete(users()), row(1, "a"))
            .await
            .unwrap();
        let second = store
            .put(RecordKey::incomplete(users()), row(2, "b"))
            .await
            .unwrap();

        assert_eq!(first.id().map(RecordId::as_str), Some("1"));
        assert_eq!(second.id().map(RecordId::as_str), Some("2"));
        assert_eq!(store.row_count(&users()).unwrap(), 2);
    }

    #[tokio::test]
    async fn query_pages_follow_positional_tokens() {
        let store = MemoryStore::new();
        seed(
            &store,
            &[("a", 1, "a"), ("b", 2, "b"), ("c", 3, "c"), ("d", 4, "d"), ("e", 5, "e")],
        )
        .await;

        let mut query = all_rows(&users());
        query.limit = Some(2);

        let first = store.run_query(&query).await.unwrap();
        assert_eq!(first.rows.len(), 2);
        query.start = first.continuation;
        assert!(query.start.is_some());

        let second = store.run_query(&query).await.unwrap();
        assert_eq!(second.rows.len(), 2);
        query.start = second.continuation;

        let third = store.run_query(&query).await.unwrap();
        assert_eq!(third.rows.len(), 1);
        assert_eq!(third.continuation, None);
    }

    #[tokio::test]
    async fn zero_limit_returns_no_rows_and_no_continuation() {
        let store = MemoryStore::new();
        seed(&store, &[("a", 1, "a"), ("b", 2, "b")]).await;

        let mut query = all_rows(&users());
        query.limit = Some(0);

        let page = store.run_query(&query).await.unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.continuation, None);
    }

    #[tokio::test]
    async fn missing_field_never_matches_filters() {
        let store = MemoryStore::new();
        let key = RecordKey::complete(users(), RecordId::new("a")).unwrap();
        let mut props = FlatProps::new();
        props.insert("name".to_string(), Value::text("a"));
        store.put(key, props).await.unwrap();

        let mut query = all_rows(&users());
        query.filters = vec![NativeFilter::Field {
            name: "age".to_string(),
            op: CompareOp::Gt,
            value: Value::Int(0),
        }];

        let page = store.run_query(&query).await.unwrap();
        assert!(page.rows.is_empty());
    }

    #[tokio::test]
    async fn range_filters_and_order_apply() {
        let store = MemoryStore::new();
        seed(
            &store,
            &[("a", 5, "e"), ("b", 2, "d"), ("c", 8, "c"), ("d", 2, "b")],
        )
        .await;

        let mut query = all_rows(&users());
        query.filters = vec![NativeFilter::Field {
            name: "age".to_string(),
            op: CompareOp::Lte,
            value: Value::Int(5),
        }];
        query.order = vec![
            ("age".to_string(), SortDirection::Asc),
            ("name".to_string(), SortDirection::Desc),
        ];

        let page = store.run_query(&query).await.unwrap();
        let ids: Vec<&str> = page
            .rows
            .iter()
            .map(|row| row.key.id().map_or("", RecordId::as_str))
            .collect();

        assert_eq!(ids, ["b", "d", "a"]);
    }

    #[tokio::test]
    async fn key_filter_selects_one_row() {
        let store = MemoryStore::new();
        seed(&store, &[("a", 1, "a"), ("b", 2, "b")]).await;

        let mut query = all_rows(&users());
        query.filters = vec![NativeFilter::KeyEquals {
            id: RecordId::new("b"),
        }];

        let page = store.run_query(&query).await.unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].key.id().map(RecordId::as_str), Some("b"));
    }

    #[tokio::test]
    async fn projection_drops_unlisted_props() {
        let store = MemoryStore::new();
        seed(&store, &[("a", 1, "ada")]).await;

        let mut query = all_rows(&users());
        query.projection = vec!["name".to_string()];

        let page = store.run_query(&query).await.unwrap();
        assert_eq!(page.rows[0].props.len(), 1);
        assert_eq!(page.rows[0].props.get("name"), Some(&Value::text("ada")));
    }

    #[tokio::test]
    async fn delete_absent_row_is_ok() {
        let store = MemoryStore::new();
        seed(&store, &[("a", 1, "a")]).await;

        let absent = RecordKey::complete(users(), RecordId::new("zz")).unwrap();
        store.delete(absent).await.unwrap();

        let present = RecordKey::complete(users(), RecordId::new("a")).unwrap();
        store.delete(present).await.unwrap();
        assert_eq!(store.row_count(&users()).unwrap(), 0);
    }

    #[tokio::test]
    async fn rows_missing_the_sort_field_order_first() {
        let store = MemoryStore::new();
        let with_age = RecordKey::complete(users(), RecordId::new("a")).unwrap();
        store.put(with_age, row(30, "a")).await.unwrap();
        let without_age = RecordKey::complete(users(), RecordId::new("b")).unwrap();
        let mut props = FlatProps::new();
        props.insert("name".to_string(), Value::text("b"));
        store.put(without_age, props).await.unwrap();

        let mut query = all_rows(&users());
        query.order = vec![("age".to_string(), SortDirection::Asc)];

        let page = store.run_query(&query).await.unwrap();
        let ids: Vec<&str> = page
            .rows
            .iter()
            .map(|row| row.key.id().map_or("", RecordId::as_str))
            .collect();

        assert_eq!(ids, ["b", "a"]);
    }
}
