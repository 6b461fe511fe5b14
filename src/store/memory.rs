//! In-memory document store used by unit and integration tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{
    document, Collection, DeleteResult, DocumentStore, FieldFilter, InsertResult, StoreError,
    UpdateResult,
};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, HashMap<Uuid, Map<String, Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn as_object(doc: Value) -> Map<String, Value> {
    match doc {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, doc: Value) -> Result<InsertResult, StoreError> {
        let id = Uuid::new_v4();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection)
            .or_default()
            .insert(id, as_object(doc));
        Ok(InsertResult { inserted_id: id })
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Option<FieldFilter>,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        let docs = collections.get(&collection);

        let mut results = Vec::new();
        if let Some(docs) = docs {
            for (id, fields) in docs {
                let matches = match &filter {
                    Some(f) => {
                        fields.get(f.field.json_key()) == Some(&Value::String(f.value.clone()))
                    }
                    None => true,
                };
                if matches {
                    results.push(document(*id, Value::Object(fields.clone())));
                }
            }
        }
        Ok(results)
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(&id))
            .map(|fields| document(id, Value::Object(fields.clone()))))
    }

    async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        patch: Value,
    ) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        match docs.get_mut(&id) {
            Some(fields) => {
                fields.extend(as_object(patch));
                Ok(UpdateResult {
                    matched_count: 1,
                    modified_count: 1,
                    upserted_id: None,
                })
            }
            None => {
                docs.insert(id, as_object(patch));
                Ok(UpdateResult {
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: Some(id),
                })
            }
        }
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<DeleteResult, StoreError> {
        let mut collections = self.collections.write().await;
        let removed = collections
            .get_mut(&collection)
            .and_then(|docs| docs.remove(&id));
        Ok(DeleteResult {
            deleted_count: if removed.is_some() { 1 } else { 0 },
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}
