//! Touch gesture state machine.
//!
//! A [`GestureMachine`] turns pointer-identified touch samples into drawing,
//! dragging and two-finger scale/rotate operations on a [`CanvasDocument`].
//! All per-interaction state lives in a [`GestureSession`] that exists from
//! the first pointer down to the last pointer up.

use crate::canvas::CanvasDocument;
use crate::geometry;
use crate::input::{PointerId, Pointers, TouchEvent, TouchPhase};
use crate::shapes::{Item, ItemId};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Rect};

/// Default hit-test slack around item bounds, in canvas units.
pub const DEFAULT_HIT_TOLERANCE: f64 = 10.0;

/// Pinch start distances below this, in canvas units, are treated as
/// degenerate.
pub const DEGENERATE_DISTANCE: f64 = 1.0;

/// Result of comparing a two-finger gesture against its start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pinch {
    /// Live distance over start distance (1 for a degenerate start).
    pub scale: f64,
    /// Live angle minus start angle, in radians.
    pub rotation: f64,
    /// `original_bounds` scaled by `scale` about its center.
    pub bounds: Rect,
}

/// Pure two-finger transform math.
pub fn pinch_transform(
    p1_start: Point,
    p2_start: Point,
    p1_now: Point,
    p2_now: Point,
    original_bounds: Rect,
) -> Pinch {
    let start_distance = geometry::distance(p1_start, p2_start);
    let live_distance = geometry::distance(p1_now, p2_now);

    let mut scale = if start_distance < DEGENERATE_DISTANCE {
        1.0
    } else {
        live_distance / start_distance
    };
    if !scale.is_finite() {
        scale = 1.0;
    }

    let mut rotation = geometry::angle(p1_now, p2_now) - geometry::angle(p1_start, p2_start);
    if !rotation.is_finite() {
        rotation = 0.0;
    }

    Pinch {
        scale,
        rotation,
        bounds: geometry::scale_about_center(original_bounds, scale),
    }
}

/// The item a session is acting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A committed item in the store.
    Committed(ItemId),
    /// The session's own, not yet committed, shape.
    Provisional,
}

/// What a drafting pointer is growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftTarget {
    /// A stroke that was committed at pointer down.
    Stroke(ItemId),
    /// The provisional shape.
    Shape,
}

/// Snapshot taken when the second finger lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchStart {
    pub p1: Point,
    pub p2: Point,
    pub bounds: Rect,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GesturePhase {
    Drafting {
        pointer: PointerId,
        anchor: Point,
        target: DraftTarget,
    },
    Dragging,
    Transforming(PinchStart),
    /// Pointers are down but nothing reacts to them.
    Holding,
}

/// Observable state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Drafting,
    Dragging,
    Transforming,
    Holding,
}

/// State of one touch interaction, first finger down to last finger up.
#[derive(Debug, Clone)]
pub struct GestureSession {
    pointers: Pointers,
    tool: ToolKind,
    phase: GesturePhase,
    selection: Option<Selection>,
    provisional: Option<Item>,
}

impl GestureSession {
    /// Tool mode captured when the session began.
    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.count()
    }
}

/// Interprets touch samples against a document.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    session: Option<GestureSession>,
    hit_tolerance: f64,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(DEFAULT_HIT_TOLERANCE)
    }
}

impl GestureMachine {
    pub fn new(hit_tolerance: f64) -> Self {
        Self {
            session: None,
            hit_tolerance,
        }
    }

    pub fn state(&self) -> GestureState {
        match self.session.as_ref().map(|s| s.phase) {
            None => GestureState::Idle,
            Some(GesturePhase::Drafting { .. }) => GestureState::Drafting,
            Some(GesturePhase::Dragging) => GestureState::Dragging,
            Some(GesturePhase::Transforming(_)) => GestureState::Transforming,
            Some(GesturePhase::Holding) => GestureState::Holding,
        }
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// The shape being drafted, not yet part of the store.
    pub fn provisional(&self) -> Option<&Item> {
        self.session.as_ref()?.provisional.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Abort the active session, discarding any provisional shape.
    /// Returns whether there was a session to abort.
    pub fn cancel(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                log::debug!(
                    "Gesture cancelled by host (provisional discarded: {})",
                    session.provisional.is_some()
                );
                true
            }
            None => false,
        }
    }

    /// Feed one touch sample. Returns whether the canvas needs a repaint.
    pub fn handle(
        &mut self,
        event: TouchEvent,
        document: &mut CanvasDocument,
        tools: &ToolManager,
    ) -> bool {
        match event.phase {
            TouchPhase::Down => self.pointer_down(event.pointer, event.position, document, tools),
            TouchPhase::Move => self.pointer_move(event.pointer, event.position, document),
            TouchPhase::Up | TouchPhase::Cancelled => {
                self.pointer_up(event.pointer, event.position, document)
            }
        }
    }

    fn pointer_down(
        &mut self,
        pointer: PointerId,
        position: Point,
        document: &mut CanvasDocument,
        tools: &ToolManager,
    ) -> bool {
        if self.session.is_none() {
            self.session = Some(Self::begin(
                pointer,
                position,
                document,
                tools,
                self.hit_tolerance,
            ));
            return true;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        if !session.pointers.press(pointer, position) {
            log::trace!("Ignoring extra or duplicate pointer {pointer}");
            return false;
        }

        let Some(selection) = session.selection else {
            return false;
        };
        let Some((p1, p2)) = session.pointers.pair() else {
            return false;
        };
        let Some(item) = target(selection, &session.provisional, document) else {
            return false;
        };

        session.phase = GesturePhase::Transforming(PinchStart {
            p1,
            p2,
            bounds: item.bounds(),
            rotation: item.rotation(),
        });
        log::debug!("Two-finger transform started on {selection:?}");
        false
    }

    fn begin(
        pointer: PointerId,
        position: Point,
        document: &mut CanvasDocument,
        tools: &ToolManager,
        hit_tolerance: f64,
    ) -> GestureSession {
        let tool = tools.current_tool;
        let mut pointers = Pointers::new();
        pointers.press(pointer, position);

        let hit = if tool.selects_items() {
            document.store().hit_test(position, hit_tolerance)
        } else {
            None
        };

        let (phase, selection, provisional) = if let Some(id) = hit {
            log::debug!("Selected item {id} for dragging");
            (GesturePhase::Dragging, Some(Selection::Committed(id)), None)
        } else if tool.is_freehand() {
            let stroke = tools.create_item(tool, position);
            let id = stroke.id();
            document.commit(stroke);
            let phase = GesturePhase::Drafting {
                pointer,
                anchor: position,
                target: DraftTarget::Stroke(id),
            };
            (phase, None, None)
        } else {
            let shape = tools.create_item(tool, position);
            let phase = GesturePhase::Drafting {
                pointer,
                anchor: position,
                target: DraftTarget::Shape,
            };
            (phase, Some(Selection::Provisional), Some(shape))
        };

        GestureSession {
            pointers,
            tool,
            phase,
            selection,
            provisional,
        }
    }

    fn pointer_move(
        &mut self,
        pointer: PointerId,
        position: Point,
        document: &mut CanvasDocument,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(previous) = session.pointers.update(pointer, position) else {
            log::trace!("Ignoring move for untracked pointer {pointer}");
            return false;
        };

        match session.phase {
            GesturePhase::Drafting {
                pointer: origin,
                anchor,
                target,
            } if origin == pointer => {
                let item = match target {
                    DraftTarget::Stroke(id) => document.item_mut(id),
                    DraftTarget::Shape => session.provisional.as_mut(),
                };
                match item {
                    Some(item) => {
                        item.update_geometry(anchor, position);
                        true
                    }
                    None => false,
                }
            }
            GesturePhase::Dragging => {
                let Some(selection) = session.selection else {
                    return false;
                };
                match target_mut(selection, &mut session.provisional, document) {
                    Some(item) => {
                        let delta = position - previous;
                        item.translate(delta.x, delta.y);
                        true
                    }
                    None => false,
                }
            }
            GesturePhase::Transforming(start) => {
                let (Some(selection), Some((p1, p2))) = (session.selection, session.pointers.pair())
                else {
                    return false;
                };
                let pinch = pinch_transform(start.p1, start.p2, p1, p2, start.bounds);
                let Some(shape) = target_mut(selection, &mut session.provisional, document)
                    .and_then(Item::as_parametric_mut)
                else {
                    return false;
                };
                shape.scale_from_original_bounds(start.bounds, pinch.scale);
                shape.set_rotation(start.rotation);
                shape.apply_rotation(pinch.rotation);
                true
            }
            GesturePhase::Drafting { .. } | GesturePhase::Holding => false,
        }
    }

    fn pointer_up(
        &mut self,
        pointer: PointerId,
        _position: Point,
        document: &mut CanvasDocument,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.pointers.release(pointer).is_none() {
            log::trace!("Ignoring release for untracked pointer {pointer}");
            return false;
        }

        if session.pointers.is_empty() {
            return self.end(document);
        }

        match session.phase {
            GesturePhase::Transforming(_) => {
                session.phase = match session.selection {
                    Some(Selection::Committed(_)) => GesturePhase::Dragging,
                    _ => GesturePhase::Holding,
                };
                log::debug!("Two-finger transform ended");
            }
            GesturePhase::Drafting { pointer: origin, .. } if origin == pointer => {
                session.phase = GesturePhase::Holding;
            }
            _ => {}
        }
        false
    }

    fn end(&mut self, document: &mut CanvasDocument) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        if let Some(shape) = session.provisional {
            document.commit(shape);
        }
        true
    }
}

fn target<'a>(
    selection: Selection,
    provisional: &'a Option<Item>,
    document: &'a CanvasDocument,
) -> Option<&'a Item> {
    match selection {
        Selection::Committed(id) => document.store().get(id),
        Selection::Provisional => provisional.as_ref(),
    }
}

fn target_mut<'a>(
    selection: Selection,
    provisional: &'a mut Option<Item>,
    document: &'a mut CanvasDocument,
) -> Option<&'a mut Item> {
    match selection {
        Selection::Committed(id) => document.item_mut(id),
        Selection::Provisional => provisional.as_mut(),
    }
}
