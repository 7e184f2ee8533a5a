//! In-memory collection for dev/test wiring.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use trailhead_query::{QueryOptions, VERSION_FIELD};

use crate::collection::{Collection, StoreError};
use crate::eval::{matches_filter, sort_documents};

#[derive(Debug, Clone)]
struct Stored<T> {
    id: Uuid,
    version: u64,
    record: T,
}

/// Insertion-ordered in-memory collection guarded by an `RwLock`.
///
/// The internal version counter is stamped on insert and bumped on replace;
/// it surfaces in serialized documents as the `version` field the default
/// projection hides.
#[derive(Debug)]
pub struct MemoryCollection<T> {
    inner: RwLock<Vec<Stored<T>>>,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Collection<T> for MemoryCollection<T>
where
    T: Clone + Serialize + Send + Sync + 'static,
{
    fn insert(&self, id: Uuid, record: T) -> Result<(), StoreError> {
        let mut records = self.inner.write().map_err(poisoned)?;
        records.push(Stored {
            id,
            version: 1,
            record,
        });
        Ok(())
    }

    fn insert_unique(
        &self,
        id: Uuid,
        record: T,
        conflict: &dyn Fn(&T) -> bool,
    ) -> Result<bool, StoreError> {
        let mut records = self.inner.write().map_err(poisoned)?;
        if records.iter().any(|s| conflict(&s.record)) {
            return Ok(false);
        }
        records.push(Stored {
            id,
            version: 1,
            record,
        });
        Ok(true)
    }

    fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let records = self.inner.read().map_err(poisoned)?;
        Ok(records.iter().find(|s| s.id == id).map(|s| s.record.clone()))
    }

    fn replace(&self, id: Uuid, record: T) -> Result<(), StoreError> {
        let mut records = self.inner.write().map_err(poisoned)?;
        let stored = records
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound)?;
        stored.version += 1;
        stored.record = record;
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.inner.write().map_err(poisoned)?;
        let before = records.len();
        records.retain(|s| s.id != id);
        Ok(records.len() < before)
    }

    fn find(&self, options: &QueryOptions) -> Result<Vec<Value>, StoreError> {
        let records = self.inner.read().map_err(poisoned)?;

        let mut docs = Vec::with_capacity(records.len());
        for stored in records.iter() {
            let mut doc = serde_json::to_value(&stored.record)
                .map_err(|e| StoreError::Internal(e.to_string()))?;
            if let Value::Object(map) = &mut doc {
                map.insert(VERSION_FIELD.to_string(), Value::from(stored.version));
            }
            if let Some(filter) = &options.filter {
                if !matches_filter(filter, &doc) {
                    continue;
                }
            }
            docs.push(doc);
        }
        drop(records);

        if let Some(sort) = &options.sort {
            sort_documents(&mut docs, sort);
        }

        if let Some(page) = &options.page {
            let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
            let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
            docs = docs.into_iter().skip(skip).take(limit).collect();
        }

        if let Some(projection) = &options.projection {
            for doc in &mut docs {
                projection.apply(doc);
            }
        }

        Ok(docs)
    }

    fn list(&self) -> Result<Vec<T>, StoreError> {
        let records = self.inner.read().map_err(poisoned)?;
        Ok(records.iter().map(|s| s.record.clone()).collect())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let records = self.inner.read().map_err(poisoned)?;
        Ok(records.len() as u64)
    }
}

impl<T, S> Collection<T> for Arc<S>
where
    S: Collection<T> + ?Sized,
{
    fn insert(&self, id: Uuid, record: T) -> Result<(), StoreError> {
        (**self).insert(id, record)
    }

    fn insert_unique(
        &self,
        id: Uuid,
        record: T,
        conflict: &dyn Fn(&T) -> bool,
    ) -> Result<bool, StoreError> {
        (**self).insert_unique(id, record, conflict)
    }

    fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        (**self).get(id)
    }

    fn replace(&self, id: Uuid, record: T) -> Result<(), StoreError> {
        (**self).replace(id, record)
    }

    fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        (**self).delete(id)
    }

    fn find(&self, options: &QueryOptions) -> Result<Vec<Value>, StoreError> {
        (**self).find(options)
    }

    fn list(&self) -> Result<Vec<T>, StoreError> {
        (**self).list()
    }

    fn count(&self) -> Result<u64, StoreError> {
        (**self).count()
    }
}

fn poisoned<E>(_: E) -> StoreError {
    StoreError::Internal("collection lock poisoned".to_string())
}
