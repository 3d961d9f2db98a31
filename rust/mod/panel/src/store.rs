//! JSON records over the byte KV store.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use tvpanel_core::ServiceError;
use tvpanel_kv::{KVError, KVStore};

use crate::model::{Department, Panel, Product, ProductPanelAssociation};

/// A record kind stored under `{PREFIX}{id}`.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const PREFIX: &'static str;
    /// Human name used in error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

impl Record for Product {
    const PREFIX: &'static str = "panel:product:";
    const KIND: &'static str = "product";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Department {
    const PREFIX: &'static str = "panel:department:";
    const KIND: &'static str = "department";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Panel {
    const PREFIX: &'static str = "panel:panel:";
    const KIND: &'static str = "panel";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for ProductPanelAssociation {
    const PREFIX: &'static str = "panel:assoc:";
    const KIND: &'static str = "association";

    fn id(&self) -> &str {
        &self.id
    }
}

pub(crate) fn kv_err(e: KVError) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

/// Typed view of one key prefix.
pub struct Collection<T: Record> {
    kv: Arc<dyn KVStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Collection<T> {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            kv,
            _record: PhantomData,
        }
    }

    fn key(id: &str) -> String {
        format!("{}{}", T::PREFIX, id)
    }

    pub fn not_found(id: &str) -> ServiceError {
        ServiceError::NotFound(format!("{} '{}' not found", T::KIND, id))
    }

    pub fn find(&self, id: &str) -> Result<Option<T>, ServiceError> {
        let Some(bytes) = self.kv.get(&Self::key(id)).map_err(kv_err)? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| ServiceError::Internal(e.to_string()))
    }

    pub fn get(&self, id: &str) -> Result<T, ServiceError> {
        self.find(id)?.ok_or_else(|| Self::not_found(id))
    }

    pub fn exists(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(self.kv.get(&Self::key(id)).map_err(kv_err)?.is_some())
    }

    /// Every record under the prefix, in key order.
    ///
    /// Entries that no longer decode are skipped with a warning so one bad
    /// record cannot take a whole listing down.
    pub fn all(&self) -> Result<Vec<T>, ServiceError> {
        let entries = self.kv.scan(T::PREFIX).map_err(kv_err)?;
        let mut records = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match serde_json::from_slice::<T>(&value) {
                Ok(record) => records.push(record),
                Err(e) => warn!(%key, error = %e, "skipping undecodable record"),
            }
        }
        Ok(records)
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Result<Vec<T>, ServiceError> {
        Ok(self.all()?.into_iter().filter(|r| pred(r)).collect())
    }

    pub fn put(&self, record: &T) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(record).map_err(|e| ServiceError::Internal(e.to_string()))?;
        self.kv.set(&Self::key(record.id()), &data).map_err(kv_err)
    }

    /// Store a new record, refusing to overwrite an existing id.
    pub fn insert(&self, record: &T) -> Result<(), ServiceError> {
        if self.exists(record.id())? {
            return Err(ServiceError::Conflict(format!(
                "{} '{}' already exists",
                T::KIND,
                record.id()
            )));
        }
        self.put(record)
    }

    pub fn remove(&self, id: &str) -> Result<(), ServiceError> {
        if !self.exists(id)? {
            return Err(Self::not_found(id));
        }
        self.kv.delete(&Self::key(id)).map_err(kv_err)
    }

    /// Remove several records in one transaction. Missing ids are ignored.
    pub fn remove_many<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Result<(), ServiceError> {
        let keys: Vec<String> = ids.into_iter().map(Self::key).collect();
        if keys.is_empty() {
            return Ok(());
        }
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.kv.batch_delete(&refs).map_err(kv_err)
    }
}
