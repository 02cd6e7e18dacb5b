use crate::codec::ShapeRow;
use crate::error::StoreResult;
use crate::render::{self, RenderSurface};
use crate::shape::Argb;
use crate::store::ShapeStore;

/// Undoes the most recent shape by deleting it from the store and redrawing
/// the remaining history from scratch.
///
/// There is no raster snapshot stack and no redo, so every undo costs a full
/// replay of the store.
#[derive(Debug, Clone)]
pub struct UndoManager {
    default_color: Argb,
    undone: usize,
}

impl UndoManager {
    pub fn new(default_color: Argb) -> Self {
        Self {
            default_color,
            undone: 0,
        }
    }

    /// Removes the newest shape and replays the rest onto `surface`.
    ///
    /// Returns the removed row, or `None` if the store was already empty, in
    /// which case the surface is left alone.
    pub fn undo<S, R>(&mut self, store: &mut S, surface: &mut R) -> StoreResult<Option<ShapeRow>>
    where
        S: ShapeStore + ?Sized,
        R: RenderSurface + ?Sized,
    {
        let Some(removed) = store.delete_highest_id()? else {
            log::debug!("Nothing to undo");
            return Ok(None);
        };

        let drawn = render::redraw_all(&*store, surface, self.default_color)?;
        self.undone += 1;
        log::info!("Undid {} {}, replayed {} shapes", removed.shape_type, removed.id, drawn);
        Ok(Some(removed))
    }

    /// Number of successful undos performed by this manager
    pub fn undone(&self) -> usize {
        self.undone
    }
}
