#![warn(clippy::all, rust_2018_idioms)]

pub mod canvas;
pub mod codec;
pub mod config;
pub mod egui_surface;
pub mod error;
pub mod render;
pub mod restore;
pub mod shape;
pub mod store;
pub mod undo;

pub use canvas::Canvas;
pub use codec::{NewShapeRow, ShapeRow};
pub use config::{CanvasConfig, GesturePolicy};
pub use egui_surface::EguiSurface;
pub use error::{CanvasError, ConfigError, ParseError, StoreError};
pub use render::{Recorder, RenderSurface};
pub use restore::{ReplayState, RestoreScheduler, TickOutcome};
pub use shape::{
    Argb, Bounds, Point, Shape, ShapeFilter, ShapeId, ShapeRecord, ShapeStyle, ShapeType,
};
pub use store::{JournalStore, MemoryStore, ShapeStore, SharedStore};
pub use undo::UndoManager;
