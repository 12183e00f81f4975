use crate::foundation::core::{Point, Vec2};
use crate::foundation::math::{contact_angle_deg, contact_distance};
use crate::interaction::hit_test::select_at;
use crate::interaction::input::{HistoryCommand, InputEvent};
use crate::model::session::Session;

/// Default wheel-to-scale factor: one wheel "line" of 100 units is a scale step of 1.0.
pub const DEFAULT_WHEEL_ZOOM_FACTOR: f64 = -0.01;

/// Where the gesture machine currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    /// Panning the base image. `anchor` is the down position minus the pan at drag start.
    DraggingCanvas { anchor: Point },
    /// Moving the selected overlay. `last` is the most recent pointer position.
    DraggingOverlay { last: Point },
    /// Two contacts scaling and rotating the selected overlay.
    PinchZoomRotate { distance: f64, angle: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

/// What an input event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing changed.
    Ignored,
    /// The machine moved between states or the selection changed; the model transform did not.
    StateChanged,
    /// The model was mutated and the surface must be recomposited.
    Mutated,
    /// A touch ended horizontally displaced from where it started.
    Swipe(SwipeDirection),
    /// A key chord asked for history navigation.
    History(HistoryCommand),
}

impl GestureOutcome {
    pub fn needs_redraw(self) -> bool {
        matches!(self, Self::Mutated)
    }
}

/// Turns raw input sequences into model mutations.
#[derive(Clone, Debug)]
pub struct GestureController {
    state: GestureState,
    surface_origin: Vec2,
    wheel_zoom_factor: f64,
    swipe_start_x: Option<f64>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new(Vec2::ZERO, DEFAULT_WHEEL_ZOOM_FACTOR)
    }
}

impl GestureController {
    /// `surface_origin` is the surface's top-left corner in input space; it is subtracted
    /// from pointer positions before hit-testing.
    pub fn new(surface_origin: Vec2, wheel_zoom_factor: f64) -> Self {
        Self {
            state: GestureState::Idle,
            surface_origin,
            wheel_zoom_factor,
            swipe_start_x: None,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Drop any in-flight gesture.
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
        self.swipe_start_x = None;
    }

    pub fn handle(&mut self, session: &mut Session, event: &InputEvent) -> GestureOutcome {
        match event {
            InputEvent::PointerDown { at } => self.begin_drag(session, *at),
            InputEvent::PointerMove { at } => self.drag_to(session, *at),
            InputEvent::PointerUp => self.end(),
            InputEvent::TouchStart { touches } => self.touch_start(session, touches),
            InputEvent::TouchMove { touches } => self.touch_move(session, touches),
            InputEvent::TouchEnd { changed } => self.touch_end(*changed),
            InputEvent::Wheel { delta_y } => self.wheel(session, *delta_y),
            InputEvent::Key { chord } => chord
                .command()
                .map_or(GestureOutcome::Ignored, GestureOutcome::History),
        }
    }

    fn begin_drag(&mut self, session: &mut Session, at: Point) -> GestureOutcome {
        let local = at - self.surface_origin;
        self.state = match select_at(&mut session.overlays, local) {
            Some(index) => {
                tracing::debug!(index, "overlay drag start");
                GestureState::DraggingOverlay { last: at }
            }
            None => {
                tracing::debug!("canvas drag start");
                GestureState::DraggingCanvas {
                    anchor: at - session.canvas.translate,
                }
            }
        };
        GestureOutcome::StateChanged
    }

    /// A single contact only ever drags an overlay; a miss leaves the canvas where it is.
    fn touch_select(&mut self, session: &mut Session, at: Point) -> GestureOutcome {
        let local = at - self.surface_origin;
        match select_at(&mut session.overlays, local) {
            Some(index) => {
                tracing::debug!(index, "overlay touch drag start");
                self.state = GestureState::DraggingOverlay { last: at };
                GestureOutcome::StateChanged
            }
            None => self.end(),
        }
    }

    fn drag_to(&mut self, session: &mut Session, at: Point) -> GestureOutcome {
        match self.state {
            GestureState::DraggingOverlay { last } => {
                let Some(overlay) = session.overlays.selected_mut() else {
                    self.state = GestureState::Idle;
                    return GestureOutcome::StateChanged;
                };
                overlay.translate_by(at - last);
                self.state = GestureState::DraggingOverlay { last: at };
                GestureOutcome::Mutated
            }
            GestureState::DraggingCanvas { anchor } => {
                let t = at - anchor;
                session.canvas.set_translate(t.x, t.y);
                GestureOutcome::Mutated
            }
            GestureState::Idle | GestureState::PinchZoomRotate { .. } => GestureOutcome::Ignored,
        }
    }

    fn end(&mut self) -> GestureOutcome {
        if self.state == GestureState::Idle {
            return GestureOutcome::Ignored;
        }
        self.state = GestureState::Idle;
        GestureOutcome::StateChanged
    }

    fn touch_start(&mut self, session: &mut Session, touches: &[Point]) -> GestureOutcome {
        match touches {
            [p] => {
                self.swipe_start_x = Some(p.x);
                self.touch_select(session, *p)
            }
            [a, b] if session.overlays.selected().is_some() => {
                self.state = GestureState::PinchZoomRotate {
                    distance: contact_distance(*a, *b),
                    angle: contact_angle_deg(*a, *b),
                };
                tracing::debug!("pinch start");
                GestureOutcome::StateChanged
            }
            _ => GestureOutcome::Ignored,
        }
    }

    fn touch_move(&mut self, session: &mut Session, touches: &[Point]) -> GestureOutcome {
        match (self.state, touches) {
            (GestureState::DraggingOverlay { .. } | GestureState::DraggingCanvas { .. }, [p]) => {
                self.drag_to(session, *p)
            }
            (GestureState::PinchZoomRotate { distance, angle }, [a, b]) => {
                let Some(overlay) = session.overlays.selected_mut() else {
                    self.state = GestureState::Idle;
                    return GestureOutcome::StateChanged;
                };
                let new_distance = contact_distance(*a, *b);
                let new_angle = contact_angle_deg(*a, *b);

                if distance > 0.0 {
                    overlay.multiply_scale(new_distance / distance);
                } else {
                    tracing::debug!("pinch baseline distance is zero, scale update skipped");
                }
                overlay.rotate_by(new_angle - angle);

                self.state = GestureState::PinchZoomRotate {
                    distance: new_distance,
                    angle: new_angle,
                };
                GestureOutcome::Mutated
            }
            _ => GestureOutcome::Ignored,
        }
    }

    fn touch_end(&mut self, changed: Option<Point>) -> GestureOutcome {
        let ended = self.end();
        let (Some(start), Some(end)) = (self.swipe_start_x.take(), changed) else {
            return ended;
        };
        if end.x < start {
            GestureOutcome::Swipe(SwipeDirection::Left)
        } else if end.x > start {
            GestureOutcome::Swipe(SwipeDirection::Right)
        } else {
            ended
        }
    }

    fn wheel(&mut self, session: &mut Session, delta_y: f64) -> GestureOutcome {
        let zoom = delta_y * self.wheel_zoom_factor;
        let scale = match session.overlays.selected_mut() {
            Some(overlay) => overlay.adjust_scale(zoom),
            None => session.canvas.adjust_scale(zoom),
        };
        tracing::debug!(zoom, scale, "wheel zoom");
        GestureOutcome::Mutated
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/gesture.rs"]
mod tests;
