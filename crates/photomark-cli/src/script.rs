//! Recorded annotation sessions.
//!
//! A session script is JSON:
//! ```json
//! {
//!   "canvas": { "width": 400, "height": 300 },
//!   "commands": [
//!     { "type": "tool", "tool": "Rectangle" },
//!     { "type": "color", "color": "#ff0000" },
//!     { "type": "touch", "pointer": 1, "x": 10, "y": 10, "phase": "down" },
//!     { "type": "touch", "pointer": 1, "x": 90, "y": 60, "phase": "up" },
//!     { "type": "undo" }
//!   ]
//! }
//! ```

use kurbo::Point;
use photomark_core::canvas::Canvas;
use photomark_core::input::{PointerId, TouchEvent, TouchPhase};
use photomark_core::shapes::SerializableColor;
use photomark_core::tools::ToolKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Script errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Command {index}: invalid color {color:?}")]
    InvalidColor { index: usize, color: String },
}

/// Live canvas size the session was recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// One recorded host action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Tool { tool: ToolKind },
    /// `#rrggbb` or `#rrggbbaa`.
    Color { color: String },
    Width { width: f64 },
    Touch {
        pointer: PointerId,
        x: f64,
        y: f64,
        phase: TouchPhase,
    },
    Undo,
    Redo,
    Clear,
    /// Abort the active gesture.
    Cancel,
}

/// What a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub commands: usize,
    pub repaints: usize,
    pub undos: usize,
    pub redos: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    pub canvas: CanvasSize,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl SessionScript {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Drive `canvas` through every command in order.
    pub fn replay(&self, canvas: &mut Canvas) -> Result<ReplaySummary, ScriptError> {
        canvas.set_canvas_size(self.canvas.width, self.canvas.height);
        let mut summary = ReplaySummary::default();

        for (index, command) in self.commands.iter().enumerate() {
            log::trace!("Replaying command {index}: {command:?}");
            match command {
                Command::Tool { tool } => canvas.set_tool(*tool),
                Command::Color { color } => {
                    let parsed = SerializableColor::from_hex(color).ok_or_else(|| {
                        ScriptError::InvalidColor {
                            index,
                            color: color.clone(),
                        }
                    })?;
                    canvas.set_color(parsed);
                }
                Command::Width { width } => canvas.set_stroke_width(*width),
                Command::Touch {
                    pointer,
                    x,
                    y,
                    phase,
                } => {
                    let event = TouchEvent::new(*pointer, Point::new(*x, *y), *phase);
                    if canvas.handle_touch(event) {
                        summary.repaints += 1;
                    }
                }
                Command::Undo => summary.undos += usize::from(canvas.undo()),
                Command::Redo => summary.redos += usize::from(canvas.redo()),
                Command::Clear => canvas.clear(),
                Command::Cancel => {
                    canvas.cancel_session();
                }
            }
            summary.commands += 1;
        }

        log::debug!("Replayed {summary:?}, {} items committed", canvas.items().len());
        Ok(summary)
    }
}
