use crate::codec::{self, ShapeRow};
use crate::error::{ParseResult, StoreResult};
use crate::shape::{Argb, ShapeId, ShapeRecord};
use crate::store::ShapeStore;

/// The drawing surface supplied by the UI layer.
///
/// Every record that becomes visible goes through `render_shape`: the first
/// draw after a gesture, undo replays, restore replays and resize redraws.
pub trait RenderSurface {
    /// Erase everything drawn so far
    fn clear(&mut self);

    fn render_shape(&mut self, record: &ShapeRecord);
}

/// Decodes a row and renders it. A row whose geometry cannot be decoded is not
/// drawn and the error is returned to the caller.
pub fn render_row<R: RenderSurface + ?Sized>(
    surface: &mut R,
    row: &ShapeRow,
    default_color: Argb,
) -> ParseResult<ShapeId> {
    let record = codec::decode(row, default_color)?;
    surface.render_shape(&record);
    Ok(record.id)
}

/// Renders rows in order, skipping any that fail to decode. Returns how many
/// were drawn.
pub fn replay_rows<R: RenderSurface + ?Sized>(
    surface: &mut R,
    rows: &[ShapeRow],
    default_color: Argb,
) -> usize {
    let mut drawn = 0;
    for row in rows {
        match render_row(surface, row, default_color) {
            Ok(_) => drawn += 1,
            Err(e) => log::warn!("Skipping unreadable shape {}: {}", row.id, e),
        }
    }
    drawn
}

/// Clears the surface and draws every stored shape in id order
pub fn redraw_all<S, R>(store: &S, surface: &mut R, default_color: Argb) -> StoreResult<usize>
where
    S: ShapeStore + ?Sized,
    R: RenderSurface + ?Sized,
{
    let rows = store.list_all()?;
    surface.clear();
    Ok(replay_rows(surface, &rows, default_color))
}

/// A call observed by a [`Recorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Clear,
    Render(ShapeRecord),
}

/// Surface that records calls instead of drawing. Useful for tests and for
/// headless hosts that forward render calls elsewhere.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    calls: Vec<SurfaceCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Ids of rendered records, in call order
    pub fn rendered_ids(&self) -> Vec<ShapeId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Render(record) => Some(record.id),
                SurfaceCall::Clear => None,
            })
            .collect()
    }

    /// Records currently visible, i.e. those rendered since the last clear
    pub fn visible(&self) -> Vec<&ShapeRecord> {
        let start = self
            .calls
            .iter()
            .rposition(|call| *call == SurfaceCall::Clear)
            .map_or(0, |i| i + 1);
        self.calls[start..]
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Render(record) => Some(record),
                SurfaceCall::Clear => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl RenderSurface for Recorder {
    fn clear(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }

    fn render_shape(&mut self, record: &ShapeRecord) {
        self.calls.push(SurfaceCall::Render(record.clone()));
    }
}
