use super::ShapeStore;
use crate::codec::{NewShapeRow, ShapeRow};
use crate::error::StoreResult;
use crate::shape::{ShapeId, ShapeType};

/// In-memory store. Rows are kept in append order, which is also id order.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    rows: Vec<ShapeRow>,
    next_id: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[ShapeRow] {
        &self.rows
    }
}

impl ShapeStore for MemoryStore {
    fn append(&mut self, row: NewShapeRow) -> StoreResult<ShapeId> {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        log::debug!("Appending {} {}", row.shape_type, id);
        self.rows.push(row.with_id(id));
        Ok(id)
    }

    fn list_all(&self) -> StoreResult<Vec<ShapeRow>> {
        Ok(self.rows.clone())
    }

    fn list_by_type(&self, shape_type: ShapeType) -> StoreResult<Vec<ShapeRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|row| row.shape_type == shape_type)
            .cloned()
            .collect())
    }

    fn delete_highest_id(&mut self) -> StoreResult<Option<ShapeRow>> {
        let removed = self.rows.pop();
        if let Some(row) = &removed {
            log::debug!("Deleted {} {}", row.shape_type, row.id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::shape::{Argb, Point, Shape, ShapeStyle};

    fn rect_row() -> NewShapeRow {
        let shape = Shape::rectangle_from_corners(Point::new(0, 0), Point::new(3, 3), false);
        codec::encode(&shape, &ShapeStyle::outline(Argb::BLACK))
    }

    fn line_row() -> NewShapeRow {
        let shape = Shape::free_line(vec![Point::new(0, 0), Point::new(3, 3)]).unwrap();
        codec::encode(&shape, &ShapeStyle::outline(Argb::BLACK))
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut store = MemoryStore::new();
        let ids: Vec<_> = (0..5).map(|_| store.append(rect_row()).unwrap()).collect();
        assert_eq!(ids, (1..=5).map(ShapeId).collect::<Vec<_>>());

        let listed: Vec<_> = store.list_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = MemoryStore::new();
        store.append(rect_row()).unwrap();
        store.append(rect_row()).unwrap();
        assert_eq!(store.delete_highest_id().unwrap().map(|r| r.id), Some(ShapeId(2)));
        assert_eq!(store.append(rect_row()).unwrap(), ShapeId(3));
    }

    #[test]
    fn test_delete_on_empty_is_noop() {
        let mut store = MemoryStore::new();
        assert!(store.delete_highest_id().unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_by_type_keeps_id_order() {
        let mut store = MemoryStore::new();
        store.append(rect_row()).unwrap();
        store.append(line_row()).unwrap();
        store.append(rect_row()).unwrap();
        store.append(line_row()).unwrap();

        let rects: Vec<_> = store
            .list_by_type(ShapeType::Rectangle)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(rects, vec![ShapeId(1), ShapeId(3)]);
        assert!(store.list_by_type(ShapeType::Ellipse).unwrap().is_empty());
    }
}
