use super::*;
use crate::foundation::core::ImageRef;

fn session() -> Session {
    Session::new(ImageRef::new("base.png"))
}

/// Flips on redo, unflips on undo.
struct Flip;

impl EditAction for Flip {
    fn undo(&self, session: &mut Session) {
        session.canvas.flipped = false;
    }

    fn redo(&self, session: &mut Session) {
        session.canvas.flipped = true;
    }

    fn description(&self) -> String {
        "flip".to_string()
    }
}

fn zoom_step(from: f64, to: f64) -> SnapshotAction {
    let mut before = session();
    before.canvas.set_scale(from);
    let mut after = session();
    after.canvas.set_scale(to);
    SnapshotAction::new(format!("zoom {to}"), before, after)
}

#[test]
fn empty_history_is_bounds_checked() {
    let mut h = History::default();
    let mut s = session();
    assert_eq!(h.undo(&mut s), None);
    assert_eq!(h.redo(&mut s), None);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn undo_then_redo_walks_the_index() {
    let mut h = History::default();
    let mut s = session();
    s.canvas.flipped = true;
    h.push(Box::new(Flip));

    assert_eq!(h.undo(&mut s).as_deref(), Some("flip"));
    assert!(!s.canvas.flipped);
    assert_eq!(h.undo(&mut s), None);

    assert_eq!(h.redo(&mut s).as_deref(), Some("flip"));
    assert!(s.canvas.flipped);
    assert_eq!(h.redo(&mut s), None);
}

#[test]
fn push_truncates_redo_tail() {
    let mut h = History::default();
    let mut s = session();
    h.push(Box::new(zoom_step(1.0, 1.5)));
    h.push(Box::new(zoom_step(1.5, 2.0)));
    h.undo(&mut s);
    assert_eq!(h.redo_count(), 1);

    h.push(Box::new(zoom_step(1.5, 0.75)));
    assert_eq!(h.redo_count(), 0);
    assert_eq!(h.undo_count(), 2);

    h.undo(&mut s);
    assert_eq!(s.canvas.scale(), 1.5);
    h.undo(&mut s);
    assert_eq!(s.canvas.scale(), 1.0);
}

#[test]
fn limit_drops_oldest_actions() {
    let mut h = History::new(Some(2));
    let mut s = session();
    h.push(Box::new(zoom_step(1.0, 1.1)));
    h.push(Box::new(zoom_step(1.1, 1.2)));
    h.push(Box::new(zoom_step(1.2, 1.3)));
    assert_eq!(h.undo_count(), 2);
    h.undo(&mut s);
    h.undo(&mut s);
    assert_eq!(s.canvas.scale(), 1.1);
    assert!(!h.can_undo());
}
