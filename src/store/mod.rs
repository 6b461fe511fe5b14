//! Document store abstraction.
//!
//! Handlers depend on `DocumentStore` rather than a concrete driver so the
//! API can run against PostgreSQL in production and an in-memory store in
//! tests. Documents are schema-validated at the HTTP boundary and stored as
//! JSON objects addressed by a store-assigned UUID.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors surfaced by store implementations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The two collections this API serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Services,
    Bookings,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Services, Collection::Bookings];

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Services => "services",
            Collection::Bookings => "bookings",
        }
    }
}

/// Document fields the API filters on. A closed set, so field names can be
/// spliced into SQL without quoting concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    ServiceProviderEmail,
    UserEmail,
}

impl QueryField {
    pub fn json_key(&self) -> &'static str {
        match self {
            QueryField::ServiceProviderEmail => "serviceProviderEmail",
            QueryField::UserEmail => "userEmail",
        }
    }
}

/// Equality filter on a single document field
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: QueryField,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    pub inserted_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// A named-collection document store. One call per API operation, no
/// transactions; concurrent writes race at the store's consistency level.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning the store-assigned id.
    async fn insert(&self, collection: Collection, doc: Value) -> Result<InsertResult, StoreError>;

    /// Fetch all documents, optionally restricted by an equality filter.
    async fn find(
        &self,
        collection: Collection,
        filter: Option<FieldFilter>,
    ) -> Result<Vec<Value>, StoreError>;

    /// Fetch a single document by id; absence is `None`, not an error.
    async fn find_one(&self, collection: Collection, id: Uuid)
        -> Result<Option<Value>, StoreError>;

    /// Merge-patch the document with the given id, inserting it when no
    /// document matches (upsert).
    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        patch: Value,
    ) -> Result<UpdateResult, StoreError>;

    /// Delete by id; deleting an absent id reports zero documents affected.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, StoreError>;

    /// Connectivity check for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release held resources on shutdown.
    async fn close(&self);
}

/// Assemble the wire document: stored fields plus the assigned id.
pub(crate) fn document(id: Uuid, doc: Value) -> Value {
    let mut map = Map::new();
    map.insert("id".to_string(), Value::String(id.to_string()));
    if let Value::Object(fields) = doc {
        map.extend(fields);
    }
    Value::Object(map)
}
