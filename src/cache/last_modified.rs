//! Last-modified timestamps for time-based validation

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use chrono::{DateTime, Utc};

/// Key of a tracked resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Collection(&'static str),
    Item(&'static str, String),
}

impl Resource {
    pub fn books() -> Self {
        Resource::Collection("books")
    }

    pub fn book(id: &str) -> Self {
        Resource::Item("books", id.to_string())
    }
}

/// Process-local registry of last-modified instants.
///
/// A resource seen for the first time is stamped with the current time.
#[derive(Debug, Default)]
pub struct LastModifiedRegistry {
    stamps: RwLock<HashMap<Resource, DateTime<Utc>>>,
}

impl LastModifiedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp of `resource` if it has one, without creating it
    pub fn peek(&self, resource: &Resource) -> Option<DateTime<Utc>> {
        self.stamps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(resource)
            .copied()
    }

    /// Current stamp of `resource`, creating it on first access.
    ///
    /// Only call this for resources known to exist.
    pub fn get(&self, resource: &Resource) -> DateTime<Utc> {
        if let Some(stamp) = self.peek(resource) {
            return stamp;
        }
        *self
            .stamps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(resource.clone())
            .or_insert_with(Utc::now)
    }

    /// Mark `resource` as modified now
    pub fn touch(&self, resource: Resource) -> DateTime<Utc> {
        let now = Utc::now();
        self.stamps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(resource, now);
        now
    }

    /// Mark one book and the books collection as modified
    pub fn touch_book(&self, id: &str) {
        let now = self.touch(Resource::book(id));
        self.stamps
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Resource::books(), now);
    }

    /// Drop a deleted book's stamp and mark the collection as modified
    pub fn forget_book(&self, id: &str) {
        let mut stamps = self.stamps.write().unwrap_or_else(PoisonError::into_inner);
        stamps.remove(&Resource::book(id));
        stamps.insert(Resource::books(), Utc::now());
    }

    pub fn len(&self) -> usize {
        self.stamps.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
