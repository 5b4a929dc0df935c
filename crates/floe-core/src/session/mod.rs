//! Module: session
//! Responsibility: the caller-facing operation surface. Wires query
//! compilation, the codec, and a store port together per operation.
//! Does not own: store transport, value semantics, pagination transport.
//! Boundary: per-operation state only; a collection handle is cheap and
//! holds no connection.

mod pages;

pub use pages::Pages;

use crate::{
    codec::{decode_rows, encode},
    error::{CoreError, UsageError},
    key::{CollectionName, RecordKey},
    obs::{OpSpan, TraceOp, TraceSink},
    port::{StoreError, StorePort},
    query::{FilterSpec, NativeQuery, ProjectionSpec, QuerySpec, compile},
    record::{ID_FIELD, Record, RecordId},
    response::Response,
    value::Value,
};
use std::{fmt, sync::Arc};

///
/// Datastore
///
/// Entry point bound to one store port. Cloning shares the port and the
/// trace sink.
///

#[derive(Clone)]
pub struct Datastore {
    port: Arc<dyn StorePort>,
    trace: Option<Arc<dyn TraceSink>>,
}

impl Datastore {
    #[must_use]
    pub fn new(port: Arc<dyn StorePort>) -> Self {
        Self { port, trace: None }
    }

    #[must_use]
    pub fn trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Handle on one collection. The name is validated when the first
    /// operation runs, not here.
    #[must_use]
    pub fn collection(&self, name: impl Into<String>) -> Collection {
        Collection {
            port: Arc::clone(&self.port),
            trace: self.trace.clone(),
            name: name.into(),
        }
    }
}

impl fmt::Debug for Datastore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Datastore").finish_non_exhaustive()
    }
}

///
/// Collection
///
/// Operations against one named collection.
///

#[derive(Clone)]
pub struct Collection {
    port: Arc<dyn StorePort>,
    trace: Option<Arc<dyn TraceSink>>,
    name: String,
}

impl Collection {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run a query and return every matching record in one response.
    pub async fn get(&self, spec: &QuerySpec) -> Result<Response, CoreError> {
        let target = self.target()?;
        let query = compile(&target, spec);

        let span = OpSpan::start(self.trace_ref(), TraceOp::Get, &self.name);
        let result = self.run_single(&query).await;
        match &result {
            Ok(response) => span.finish(u64::try_from(response.len()).unwrap_or(u64::MAX)),
            Err(_) => span.fail(),
        }

        result
    }

    /// Fetch the record with the given identifier, or `None`.
    pub async fn get_one(
        &self,
        id: impl Into<RecordId>,
        projection: ProjectionSpec,
    ) -> Result<Option<Record>, CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UsageError::EmptyIdentifier.into());
        }

        let spec = QuerySpec::new()
            .filter(FilterSpec::new().eq(ID_FIELD, Value::Text(id.into_string())))
            .projection(projection)
            .limit(1);

        let target = self.target()?;
        let query = compile(&target, &spec);

        let span = OpSpan::start(self.trace_ref(), TraceOp::GetOne, &self.name);
        match self.run_single(&query).await {
            Ok(response) => {
                span.finish(u64::try_from(response.len()).unwrap_or(u64::MAX));
                Ok(response.one_opt()?)
            }
            Err(err) => {
                span.fail();
                Err(err)
            }
        }
    }

    /// Compile a query into a lazy page sequence. Nothing reaches the
    /// store until the first page is requested.
    pub fn get_pages(&self, spec: &QuerySpec) -> Result<Pages, CoreError> {
        let target = self.target()?;
        let query = compile(&target, spec);

        Ok(Pages::new(
            Arc::clone(&self.port),
            self.trace.clone(),
            self.name.clone(),
            query,
        ))
    }

    /// Run a paged query to exhaustion, handing each page to `on_page`
    /// as it arrives.
    pub async fn for_each_page<F>(&self, spec: &QuerySpec, on_page: F) -> Result<(), CoreError>
    where
        F: FnMut(Response),
    {
        self.get_pages(spec)?.for_each_page(on_page).await
    }

    /// Write one record and return its identifier. A record without one
    /// gets a store-assigned identifier.
    pub async fn save(&self, record: &Record) -> Result<RecordId, CoreError> {
        let target = self.target()?;
        let (key, props) = encode(&target, record)?;

        let span = OpSpan::start(self.trace_ref(), TraceOp::Save, &self.name);
        match self.port.put(key, props).await {
            Ok(stored) => {
                span.finish(1);

                let (_, id) = stored.into_parts();
                id.ok_or_else(|| {
                    StoreError::backend(format!(
                        "put returned an incomplete key for {}",
                        self.name
                    ))
                    .into()
                })
            }
            Err(err) => {
                span.fail();
                Err(err.into())
            }
        }
    }

    /// Remove the record with the given identifier. Whether removing an
    /// absent record is an error is up to the store.
    pub async fn delete(&self, id: impl Into<RecordId>) -> Result<(), CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UsageError::EmptyIdentifier.into());
        }

        let target = self.target()?;
        let key = RecordKey::complete(target, id)?;

        let span = OpSpan::start(self.trace_ref(), TraceOp::Delete, &self.name);
        match self.port.delete(key).await {
            Ok(()) => {
                span.finish(1);
                Ok(())
            }
            Err(err) => {
                span.fail();
                Err(err.into())
            }
        }
    }

    async fn run_single(&self, query: &NativeQuery) -> Result<Response, CoreError> {
        let page = self.port.run_query(query).await?;
        let records = decode_rows(page.rows)?;

        Ok(Response::new(records))
    }

    fn target(&self) -> Result<CollectionName, CoreError> {
        Ok(CollectionName::new(self.name.as_str())?)
    }

    fn trace_ref(&self) -> Option<&dyn TraceSink> {
        self.trace.as_deref()
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MemoryStore;

    fn db() -> Datastore {
        Datastore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn empty_collection_name_is_rejected_at_first_use() {
        let err = db().collection("").get(&QuerySpec::new()).await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::Usage(UsageError::EmptyCollection)
        ));
    }

    #[tokio::test]
    async fn empty_identifier_is_rejected_before_any_store_call() {
        let users = db().collection("users");

        let get = users.get_one("", ProjectionSpec::new()).await.unwrap_err();
        assert!(matches!(get, CoreError::Usage(UsageError::EmptyIdentifier)));

        let del = users.delete("").await.unwrap_err();
        assert!(matches!(del, CoreError::Usage(UsageError::EmptyIdentifier)));
    }

    #[tokio::test]
    async fn save_then_get_one_roundtrips() {
        let users = db().collection("users");

        let id = users
            .save(&Record::new().set("name", "ada"))
            .await
            .unwrap();

        let found = users
            .get_one(id, ProjectionSpec::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("name"), Some(&Value::text("ada")));
    }
}
