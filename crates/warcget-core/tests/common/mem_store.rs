//! Counting in-memory object store for integration tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use warcget_core::store::{ObjectStore, StoreError};

/// In-memory store keyed by `(container, name)`, instrumented with a delete
/// counter and a write-failure switch for persist-error tests.
#[derive(Default)]
pub struct MemStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    deletes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a permission error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn contains(&self, container: &str, name: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&(container.to_string(), name.to_string()))
    }

    pub fn get(&self, container: &str, name: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(container.to_string(), name.to_string()))
            .cloned()
    }

    /// Names of all objects in `container`, sorted.
    pub fn names_in(&self, container: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(c, _)| c == container)
            .map(|(_, n)| n.clone())
            .collect();
        names.sort();
        names
    }

    pub fn put(&self, container: &str, name: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((container.to_string(), name.to_string()), data.to_vec());
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn read(&self, container: &str, name: &str) -> Result<Vec<u8>, StoreError> {
        self.get(container, name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn write(&self, container: &str, name: &str, data: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::Other,
                "write disabled by test",
            )));
        }
        self.put(container, name, data);
        Ok(())
    }

    async fn delete(&self, container: &str, name: &str) -> Result<(), StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .remove(&(container.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
