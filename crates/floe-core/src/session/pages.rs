//! Module: session::pages
//! Responsibility: drive one compiled query across store pages,
//! threading the continuation token between executions.
//! Boundary: pages arrive strictly in order; an error fuses the
//! sequence, and pages already delivered stand.

use crate::{
    codec::decode_rows,
    error::CoreError,
    obs::{OpSpan, TraceOp, TraceSink},
    port::StorePort,
    query::{NativeQuery, QueryPage},
    response::Response,
};
use std::sync::Arc;

///
/// Pages
///
/// Lazy page sequence over one compiled query. Nothing reaches the
/// store until a page is requested.
///

pub struct Pages {
    port: Arc<dyn StorePort>,
    trace: Option<Arc<dyn TraceSink>>,
    collection: String,
    state: PageState,
}

enum PageState {
    Running(NativeQuery),
    Done,
}

impl Pages {
    pub(crate) fn new(
        port: Arc<dyn StorePort>,
        trace: Option<Arc<dyn TraceSink>>,
        collection: String,
        query: NativeQuery,
    ) -> Self {
        Self {
            port,
            trace,
            collection,
            state: PageState::Running(query),
        }
    }

    /// Fetch and decode the next page. `Ok(None)` means the sequence is
    /// exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Response>, CoreError> {
        let PageState::Running(query) = std::mem::replace(&mut self.state, PageState::Done)
        else {
            return Ok(None);
        };

        let span = OpSpan::start(self.trace.as_deref(), TraceOp::Page, &self.collection);

        let page = match self.port.run_query(&query).await {
            Ok(page) => page,
            Err(err) => {
                span.fail();
                return Err(err.into());
            }
        };
        let QueryPage { rows, continuation } = page;

        let records = match decode_rows(rows) {
            Ok(records) => records,
            Err(err) => {
                span.fail();
                return Err(err.into());
            }
        };
        span.finish(u64::try_from(records.len()).unwrap_or(u64::MAX));

        // a token on an empty page cannot make progress; following it
        // would loop on the same position
        if let Some(token) = continuation
            && !records.is_empty()
        {
            let mut next = query;
            next.start = Some(token);
            next.offset = 0; // the offset applies to the first execution only
            self.state = PageState::Running(next);
        }

        Ok(Some(Response::new(records)))
    }

    /// True once the sequence is exhausted or fused by an error.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.state, PageState::Done)
    }

    /// Drive the sequence to exhaustion, handing each page that carries
    /// rows to `on_page` as it arrives. Empty pages are withheld.
    pub async fn for_each_page<F>(mut self, mut on_page: F) -> Result<(), CoreError>
    where
        F: FnMut(Response),
    {
        while let Some(page) = self.next_page().await? {
            if !page.is_empty() {
                on_page(page);
            }
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        key::{CollectionName, RecordKey},
        port::{MemoryStore, StoreError},
        query::{ContinuationToken, FlatProps, QuerySpec},
        record::{Record, RecordId},
        session::Datastore,
        value::Value,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn seeded(count: u64) -> Datastore {
        let store = Arc::new(MemoryStore::new());
        let db = Datastore::new(store);
        let items = db.collection("items");
        for n in 1..=count {
            let key = format!("k{n:02}");
            let record = Record::new().with_id(key).set("n", Value::Uint(n));
            items.save(&record).await.unwrap();
        }

        db
    }

    #[tokio::test]
    async fn exhausted_sequence_keeps_returning_none() {
        let db = seeded(3).await;
        let mut pages = db
            .collection("items")
            .get_pages(&QuerySpec::new())
            .unwrap();

        assert!(pages.next_page().await.unwrap().is_some());
        assert!(pages.next_page().await.unwrap().is_none());
        assert!(pages.is_done());
        assert!(pages.next_page().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn zero_limit_sequence_stays_finite() {
        let db = seeded(3).await;
        let mut pages = db
            .collection("items")
            .get_pages(&QuerySpec::new().limit(0))
            .unwrap();

        let first = pages.next_page().await.unwrap().unwrap();
        assert!(first.is_empty());
        assert!(pages.is_done());
        assert!(pages.next_page().await.unwrap().is_none());
    }

    /// Store double that answers every query with an empty page and a
    /// continuation token.
    struct StalledStore;

    #[async_trait]
    impl StorePort for StalledStore {
        async fn run_query(&self, _query: &NativeQuery) -> Result<QueryPage, StoreError> {
            Ok(QueryPage {
                rows: Vec::new(),
                continuation: Some(ContinuationToken::new("0")),
            })
        }

        async fn put(&self, _key: RecordKey, _props: FlatProps) -> Result<RecordKey, StoreError> {
            Err(StoreError::backend("not supported"))
        }

        async fn delete(&self, _key: RecordKey) -> Result<(), StoreError> {
            Err(StoreError::backend("not supported"))
        }
    }

    #[tokio::test]
    async fn token_on_an_empty_page_does_not_rearm_the_sequence() {
        let db = Datastore::new(Arc::new(StalledStore));
        let mut pages = db
            .collection("items")
            .get_pages(&QuerySpec::new().limit(2))
            .unwrap();

        let first = pages.next_page().await.unwrap().unwrap();
        assert!(first.is_empty());
        assert!(pages.is_done());
        assert!(pages.next_page().await.unwrap().is_none());
    }

    /// Store double that fails every query after the first.
    struct FailsAfterFirst {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StorePort for FailsAfterFirst {
        async fn run_query(
            &self,
            query: &NativeQuery,
        ) -> Result<QueryPage, StoreError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
                return Err(StoreError::unavailable("lost connection"));
            }

            self.inner.run_query(query).await
        }

        async fn put(&self, key: RecordKey, props: FlatProps) -> Result<RecordKey, StoreError> {
            self.inner.put(key, props).await
        }

        async fn delete(&self, key: RecordKey) -> Result<(), StoreError> {
            self.inner.delete(key).await
        }
    }

    #[tokio::test]
    async fn error_fuses_the_sequence_and_delivered_pages_stand() {
        let store = Arc::new(FailsAfterFirst {
            inner: MemoryStore::new(),
            calls: AtomicUsize::new(0),
        });
        for n in 1..=5_u64 {
            let key = RecordKey::complete(
                CollectionName::new("items").unwrap(),
                RecordId::new(format!("k{n:02}")),
            )
            .unwrap();
            store.inner.put(key, FlatProps::new()).await.unwrap();
        }

        let db = Datastore::new(store);
        let mut pages = db
            .collection("items")
            .get_pages(&QuerySpec::new().limit(2))
            .unwrap();

        let first = pages.next_page().await.unwrap().unwrap();
        assert_eq!(first.len(), 2);

        let err = pages.next_page().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Store(StoreError::Unavailable { .. })
        ));
        assert!(pages.is_done());
        assert!(pages.next_page().await.unwrap().is_none());
    }
}
