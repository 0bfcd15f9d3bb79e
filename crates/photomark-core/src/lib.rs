//! Photomark Core Library
//!
//! Platform-agnostic annotation model, undo history and touch gesture engine
//! for marking up photos.

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod shapes;
pub mod store;
pub mod tools;

pub use canvas::{Canvas, CanvasDocument};
pub use config::{BakeConfig, ConfigError, EngineConfig, OutputFormat};
pub use gesture::{GestureMachine, GestureState, Pinch, pinch_transform};
pub use history::History;
pub use input::{PointerId, TouchEvent, TouchPhase};
pub use shapes::{
    Item, ItemId, ItemStyle, ItemTrait, PaintMode, ParametricShape, SerializableColor,
    StrokePaint, Surface,
};
pub use store::AnnotationStore;
pub use tools::{ToolKind, ToolManager};
