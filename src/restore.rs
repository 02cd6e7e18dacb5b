//! Animated restore of the stored history.
//!
//! The scheduler is a two-state machine:
//!
//! ```text
//!   ┌──────┐  start(filter)   ┌───────────┐
//!   │ Idle ├─────────────────►│ Replaying │◄──┐ start(filter)
//!   └──▲───┘                  └─────┬─────┘───┘ (queue replaced)
//!      │   tick() on empty queue    │
//!      └────────── or cancel() ─────┘
//! ```
//!
//! `start` snapshots the matching rows into a queue. Each `tick` renders at
//! most one of them, so the host decides the cadence by how often it ticks.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::codec::ShapeRow;
use crate::error::{ParseError, StoreResult};
use crate::render::{self, RenderSurface};
use crate::shape::{Argb, ShapeFilter, ShapeId};
use crate::store::ShapeStore;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    Idle,
    Replaying,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered(ShapeId),
    /// The row could not be decoded and was dropped from the replay
    Skipped(ShapeId, ParseError),
    /// The queue ran dry and the scheduler went back to idle
    Finished,
    /// Nothing was replaying
    Idle,
}

#[derive(Debug)]
pub struct RestoreScheduler {
    state: ReplayState,
    filter: ShapeFilter,
    queue: VecDeque<ShapeRow>,
    interval: Duration,
    default_color: Argb,
    next_tick_at: Option<Instant>,
}

impl RestoreScheduler {
    pub fn new(interval: Duration, default_color: Argb) -> Self {
        Self {
            state: ReplayState::Idle,
            filter: ShapeFilter::All,
            queue: VecDeque::new(),
            interval,
            default_color,
            next_tick_at: None,
        }
    }

    /// Clears the surface and queues every row matching `filter` for replay.
    ///
    /// A replay already in flight is abandoned: its remaining rows are dropped
    /// and replaced by the new queue. Returns the number of queued rows.
    pub fn start<S, R>(
        &mut self,
        filter: ShapeFilter,
        store: &S,
        surface: &mut R,
    ) -> StoreResult<usize>
    where
        S: ShapeStore + ?Sized,
        R: RenderSurface + ?Sized,
    {
        let rows = store.list(filter)?;

        if self.state == ReplayState::Replaying {
            log::info!(
                "Restore of {} replaced with {}, dropping {} pending shapes",
                self.filter,
                filter,
                self.queue.len()
            );
        }

        surface.clear();
        self.queue = rows.into();
        self.filter = filter;
        self.state = ReplayState::Replaying;
        self.next_tick_at = None;
        log::info!("Restoring {} shapes ({})", self.queue.len(), filter);
        Ok(self.queue.len())
    }

    /// Renders the next queued row, or returns to idle once the queue is empty.
    pub fn tick<R: RenderSurface + ?Sized>(&mut self, surface: &mut R) -> TickOutcome {
        if self.state == ReplayState::Idle {
            return TickOutcome::Idle;
        }

        let Some(row) = self.queue.pop_front() else {
            self.state = ReplayState::Idle;
            self.next_tick_at = None;
            log::debug!("Restore of {} finished", self.filter);
            return TickOutcome::Finished;
        };

        match render::render_row(surface, &row, self.default_color) {
            Ok(id) => {
                log::trace!("Restored {} {}, {} left", row.shape_type, id, self.queue.len());
                TickOutcome::Rendered(id)
            }
            Err(e) => {
                log::warn!("Skipping unreadable shape {} during restore: {}", row.id, e);
                TickOutcome::Skipped(row.id, e)
            }
        }
    }

    /// Ticks if the interval has elapsed.
    ///
    /// For hosts with a free-running loop. The first poll after `start` arms
    /// the clock; after that a tick happens at most once per interval.
    pub fn poll<R: RenderSurface + ?Sized>(
        &mut self,
        now: Instant,
        surface: &mut R,
    ) -> Option<TickOutcome> {
        if self.state == ReplayState::Idle {
            return None;
        }
        match self.next_tick_at {
            None => {
                self.next_tick_at = Some(now + self.interval);
                None
            }
            Some(due) if now >= due => {
                let outcome = self.tick(surface);
                if self.state == ReplayState::Replaying {
                    self.next_tick_at = Some(now + self.interval);
                }
                Some(outcome)
            }
            Some(_) => None,
        }
    }

    /// Drops the pending queue and returns to idle. Already rendered shapes
    /// stay on the surface.
    pub fn cancel(&mut self) {
        if self.state == ReplayState::Replaying {
            log::info!("Restore of {} cancelled with {} pending", self.filter, self.queue.len());
        }
        self.queue.clear();
        self.state = ReplayState::Idle;
        self.next_tick_at = None;
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn is_replaying(&self) -> bool {
        self.state == ReplayState::Replaying
    }

    pub fn filter(&self) -> ShapeFilter {
        self.filter
    }

    /// Rows still waiting to be rendered
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next polled tick is due, if the clock is armed
    pub fn next_tick_at(&self) -> Option<Instant> {
        self.next_tick_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::render::Recorder;
    use crate::shape::{Point, Shape, ShapeStyle};
    use crate::store::MemoryStore;

    fn store_with(count: usize) -> MemoryStore {
        let mut store = MemoryStore::new();
        for i in 0..count as i32 {
            let shape =
                Shape::rectangle_from_corners(Point::new(i, i), Point::new(i + 2, i + 2), false);
            store
                .append(codec::encode(&shape, &ShapeStyle::outline(Argb::BLACK)))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_tick_when_idle_does_nothing() {
        let mut scheduler = RestoreScheduler::new(DEFAULT_TICK_INTERVAL, Argb::BLACK);
        let mut surface = Recorder::new();
        assert_eq!(scheduler.tick(&mut surface), TickOutcome::Idle);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_poll_respects_interval() {
        let store = store_with(2);
        let mut surface = Recorder::new();
        let interval = Duration::from_millis(300);
        let mut scheduler = RestoreScheduler::new(interval, Argb::BLACK);
        scheduler.start(ShapeFilter::All, &store, &mut surface).unwrap();

        let t0 = Instant::now();
        assert_eq!(scheduler.poll(t0, &mut surface), None);
        assert_eq!(scheduler.next_tick_at(), Some(t0 + interval));
        assert_eq!(scheduler.poll(t0 + Duration::from_millis(299), &mut surface), None);

        let t1 = t0 + interval;
        assert_eq!(scheduler.poll(t1, &mut surface), Some(TickOutcome::Rendered(ShapeId(1))));
        assert_eq!(scheduler.poll(t1 + Duration::from_millis(10), &mut surface), None);

        let t2 = t1 + interval;
        assert_eq!(scheduler.poll(t2, &mut surface), Some(TickOutcome::Rendered(ShapeId(2))));
        let t3 = t2 + interval;
        assert_eq!(scheduler.poll(t3, &mut surface), Some(TickOutcome::Finished));
        assert_eq!(scheduler.state(), ReplayState::Idle);
        assert_eq!(scheduler.poll(t3 + interval, &mut surface), None);
        assert_eq!(scheduler.next_tick_at(), None);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let store = store_with(3);
        let mut surface = Recorder::new();
        let mut scheduler = RestoreScheduler::new(DEFAULT_TICK_INTERVAL, Argb::BLACK);
        assert_eq!(scheduler.start(ShapeFilter::All, &store, &mut surface).unwrap(), 3);
        scheduler.tick(&mut surface);
        scheduler.cancel();

        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.tick(&mut surface), TickOutcome::Idle);
        assert_eq!(surface.rendered_ids(), vec![ShapeId(1)]);
    }

    #[test]
    fn test_bad_row_is_skipped_not_fatal() {
        let mut store = store_with(1);
        let mut bad = codec::encode(
            &Shape::free_line(vec![Point::new(0, 0), Point::new(1, 1)]).unwrap(),
            &ShapeStyle::outline(Argb::BLACK),
        );
        bad.extra_data = "garbage".into();
        store.append(bad).unwrap();
        let shape = Shape::ellipse_from_corners(Point::new(0, 0), Point::new(9, 9), true);
        store.append(codec::encode(&shape, &ShapeStyle::outline(Argb::BLACK))).unwrap();

        let mut surface = Recorder::new();
        let mut scheduler = RestoreScheduler::new(DEFAULT_TICK_INTERVAL, Argb::BLACK);
        scheduler.start(ShapeFilter::All, &store, &mut surface).unwrap();

        assert_eq!(scheduler.tick(&mut surface), TickOutcome::Rendered(ShapeId(1)));
        assert!(matches!(scheduler.tick(&mut surface), TickOutcome::Skipped(ShapeId(2), _)));
        assert_eq!(scheduler.tick(&mut surface), TickOutcome::Rendered(ShapeId(3)));
        assert_eq!(scheduler.tick(&mut surface), TickOutcome::Finished);
        assert_eq!(surface.rendered_ids(), vec![ShapeId(1), ShapeId(3)]);
    }
}
