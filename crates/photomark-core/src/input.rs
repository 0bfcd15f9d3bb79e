//! Touch input samples and live pointer tracking.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Maximum number of pointers a gesture tracks at once.
pub const MAX_POINTERS: usize = 2;

/// Session-scoped pointer identifier supplied by the host.
pub type PointerId = u64;

/// Phase of a touch sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancelled,
}

/// One pointer-identified touch sample in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub pointer: PointerId,
    pub position: Point,
    pub phase: TouchPhase,
}

impl TouchEvent {
    pub fn new(pointer: PointerId, position: Point, phase: TouchPhase) -> Self {
        Self {
            pointer,
            position,
            phase,
        }
    }

    pub fn down(pointer: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer, Point::new(x, y), TouchPhase::Down)
    }

    pub fn moved(pointer: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer, Point::new(x, y), TouchPhase::Move)
    }

    pub fn up(pointer: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer, Point::new(x, y), TouchPhase::Up)
    }

    pub fn cancelled(pointer: PointerId, x: f64, y: f64) -> Self {
        Self::new(pointer, Point::new(x, y), TouchPhase::Cancelled)
    }

    /// Up and cancel both end the pointer.
    pub fn is_release(&self) -> bool {
        matches!(self.phase, TouchPhase::Up | TouchPhase::Cancelled)
    }
}

/// Last known position of each live pointer, in press order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pointers {
    live: Vec<(PointerId, Point)>,
}

impl Pointers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a pointer. Returns `false` when it is already tracked
    /// or the tracker is full.
    pub fn press(&mut self, id: PointerId, position: Point) -> bool {
        if self.contains(id) || self.live.len() >= MAX_POINTERS {
            return false;
        }
        self.live.push((id, position));
        true
    }

    /// Update a tracked pointer, returning its previous position.
    pub fn update(&mut self, id: PointerId, position: Point) -> Option<Point> {
        let entry = self.live.iter_mut().find(|(pid, _)| *pid == id)?;
        Some(std::mem::replace(&mut entry.1, position))
    }

    /// Stop tracking a pointer, returning its last position.
    pub fn release(&mut self, id: PointerId) -> Option<Point> {
        let index = self.live.iter().position(|(pid, _)| *pid == id)?;
        Some(self.live.remove(index).1)
    }

    pub fn contains(&self, id: PointerId) -> bool {
        self.live.iter().any(|(pid, _)| *pid == id)
    }

    pub fn position(&self, id: PointerId) -> Option<Point> {
        self.live
            .iter()
            .find(|(pid, _)| *pid == id)
            .map(|(_, position)| *position)
    }

    /// Positions of the first two pointers, when two are live.
    pub fn pair(&self) -> Option<(Point, Point)> {
        match self.live.as_slice() {
            [(_, a), (_, b)] => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn count(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
