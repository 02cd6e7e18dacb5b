//! Ordered, append-only shape storage.
//!
//! A store assigns ids, keeps rows in id order and supports exactly one kind of
//! mutation besides appending: removing the row with the highest id. Stores are
//! single-writer; hosts that share one across threads wrap it in [`SharedStore`].

mod journal;
mod memory;
mod shared;

pub use journal::JournalStore;
pub use memory::MemoryStore;
pub use shared::SharedStore;

use crate::codec::{NewShapeRow, ShapeRow};
use crate::error::StoreResult;
use crate::shape::{ShapeFilter, ShapeId, ShapeType};

pub trait ShapeStore {
    /// Persists a row and returns the id assigned to it
    fn append(&mut self, row: NewShapeRow) -> StoreResult<ShapeId>;

    /// All rows in ascending id order
    fn list_all(&self) -> StoreResult<Vec<ShapeRow>>;

    /// Rows of one type in ascending id order
    fn list_by_type(&self, shape_type: ShapeType) -> StoreResult<Vec<ShapeRow>>;

    /// Removes the row with the highest id, if any
    fn delete_highest_id(&mut self) -> StoreResult<Option<ShapeRow>>;

    fn list(&self, filter: ShapeFilter) -> StoreResult<Vec<ShapeRow>> {
        match filter {
            ShapeFilter::All => self.list_all(),
            ShapeFilter::Only(shape_type) => self.list_by_type(shape_type),
        }
    }
}
