//! The boundary between the drawing UI and the persisted shape history.
//!
//! The UI reports completed gestures, undo and restore requests, and timer
//! ticks. The canvas persists, replays and forwards render calls to whatever
//! [`RenderSurface`] the UI passes in.
//!
//! All mutations go through `&mut self`, so a canvas is a single writer for its
//! store. Hosts that need to reach the canvas from several threads should put
//! it behind one lock rather than sharing the store.
//!
//! # Gestures during a restore
//!
//! The [`GesturePolicy`] in the config decides what happens when a gesture
//! completes mid-replay. With `CancelReplay` the shape is stored first, then
//! the replay is dropped and the whole history is redrawn, new shape included.
//! With `BlockDuringReplay` the gesture is refused with
//! [`CanvasError::ReplayInProgress`].

use std::time::Instant;

use crate::codec::{self, ShapeRow};
use crate::config::{CanvasConfig, GesturePolicy};
use crate::error::{CanvasError, CanvasResult, StoreResult};
use crate::render::{self, RenderSurface};
use crate::restore::{ReplayState, RestoreScheduler, TickOutcome};
use crate::shape::{Argb, Shape, ShapeFilter, ShapeId, ShapeRecord, ShapeStyle};
use crate::store::ShapeStore;
use crate::undo::UndoManager;

#[derive(Debug)]
pub struct Canvas<S> {
    store: S,
    undo: UndoManager,
    restore: RestoreScheduler,
    policy: GesturePolicy,
    default_color: Argb,
}

impl<S: ShapeStore> Canvas<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &CanvasConfig::default())
    }

    pub fn with_config(store: S, config: &CanvasConfig) -> Self {
        let default_color = config.fallback_color();
        Self {
            store,
            undo: UndoManager::new(default_color),
            restore: RestoreScheduler::new(config.tick_interval(), default_color),
            policy: config.gesture_policy,
            default_color,
        }
    }

    /// Persists a completed shape and draws it.
    ///
    /// The shape is only drawn once the store has accepted it. A failed append
    /// leaves the surface and any running restore untouched.
    pub fn on_shape_completed<R>(
        &mut self,
        shape: Shape,
        style: ShapeStyle,
        surface: &mut R,
    ) -> CanvasResult<ShapeId>
    where
        R: RenderSurface + ?Sized,
    {
        let replaying = self.restore.is_replaying();
        if replaying && self.policy == GesturePolicy::BlockDuringReplay {
            log::debug!("Rejected {} while restoring", shape.shape_type());
            return Err(CanvasError::ReplayInProgress);
        }

        let id = self.store.append(codec::encode(&shape, &style))?;

        if replaying {
            // The redraw includes the shape that was just appended.
            self.restore.cancel();
            render::redraw_all(&self.store, surface, self.default_color)?;
        } else {
            surface.render_shape(&ShapeRecord { id, shape, style });
        }
        Ok(id)
    }

    /// Removes the newest shape and redraws the rest. Any restore in flight is
    /// cancelled first.
    pub fn on_undo_requested<R>(&mut self, surface: &mut R) -> StoreResult<Option<ShapeRow>>
    where
        R: RenderSurface + ?Sized,
    {
        self.restore.cancel();
        self.undo.undo(&mut self.store, surface)
    }

    pub fn on_restore_requested<R>(
        &mut self,
        filter: ShapeFilter,
        surface: &mut R,
    ) -> StoreResult<usize>
    where
        R: RenderSurface + ?Sized,
    {
        self.restore.start(filter, &self.store, surface)
    }

    pub fn on_tick<R: RenderSurface + ?Sized>(&mut self, surface: &mut R) -> TickOutcome {
        self.restore.tick(surface)
    }

    /// Ticks the restore only if its interval has elapsed
    pub fn on_poll<R: RenderSurface + ?Sized>(
        &mut self,
        now: Instant,
        surface: &mut R,
    ) -> Option<TickOutcome> {
        self.restore.poll(now, surface)
    }

    /// Redraws the whole history, e.g. after the surface was resized
    pub fn redraw<R: RenderSurface + ?Sized>(&self, surface: &mut R) -> StoreResult<usize> {
        render::redraw_all(&self.store, surface, self.default_color)
    }

    pub fn replay_state(&self) -> ReplayState {
        self.restore.state()
    }

    pub fn is_replaying(&self) -> bool {
        self.restore.is_replaying()
    }

    pub fn scheduler(&self) -> &RestoreScheduler {
        &self.restore
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
