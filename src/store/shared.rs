use parking_lot::Mutex;
use std::sync::Arc;

use super::ShapeStore;
use crate::codec::{NewShapeRow, ShapeRow};
use crate::error::StoreResult;
use crate::shape::{ShapeId, ShapeType};

/// Cloneable handle that serializes every store operation through one lock.
///
/// Each clone refers to the same underlying store, so appends and tail deletes
/// from different threads never interleave.
#[derive(Debug)]
pub struct SharedStore<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ShapeStore> SharedStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access to the store
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }
}

impl<S: ShapeStore> ShapeStore for SharedStore<S> {
    fn append(&mut self, row: NewShapeRow) -> StoreResult<ShapeId> {
        self.inner.lock().append(row)
    }

    fn list_all(&self) -> StoreResult<Vec<ShapeRow>> {
        self.inner.lock().list_all()
    }

    fn list_by_type(&self, shape_type: ShapeType) -> StoreResult<Vec<ShapeRow>> {
        self.inner.lock().list_by_type(shape_type)
    }

    fn delete_highest_id(&mut self) -> StoreResult<Option<ShapeRow>> {
        self.inner.lock().delete_highest_id()
    }
}
