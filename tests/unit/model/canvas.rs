use super::*;
use crate::foundation::core::{MAX_SCALE, MIN_SCALE};

#[test]
fn identity_defaults() {
    let t = CanvasTransform::default();
    assert_eq!(t.translate, Vec2::ZERO);
    assert_eq!(t.scale(), 1.0);
    assert!(!t.flipped);
    assert!(!t.inverted);
}

#[test]
fn additive_scale_never_leaves_bounds() {
    let mut t = CanvasTransform::identity();
    let deltas = [0.7, 0.9, 1.4, -0.2, -5.0, 0.01, 12.0, -0.3, f64::NAN, -1.1];
    for d in deltas {
        let s = t.adjust_scale(d);
        assert!((MIN_SCALE..=MAX_SCALE).contains(&s), "scale {s} after delta {d}");
    }
}

#[test]
fn zoom_in_at_ceiling_holds() {
    let mut t = CanvasTransform::identity();
    t.set_scale(3.0);
    t.adjust_scale(1.0);
    assert_eq!(t.scale(), 3.0);
}

#[test]
fn from_parts_clamps_scale() {
    let t = CanvasTransform::from_parts(Vec2::new(1.0, 2.0), 9.0, true, false);
    assert_eq!(t.scale(), MAX_SCALE);
    assert!(t.flipped);
}

#[test]
fn toggles_and_reset() {
    let mut t = CanvasTransform::identity();
    t.toggle_flip();
    t.toggle_invert();
    t.set_translate(4.0, -3.0);
    t.adjust_scale(0.5);
    assert!(t.flipped && t.inverted);
    t.reset();
    assert_eq!(t, CanvasTransform::identity());
}

#[test]
fn surface_size_follows_scale() {
    let mut t = CanvasTransform::identity();
    t.set_scale(1.5);
    assert_eq!(t.surface_size(Size::new(800.0, 600.0)), Size::new(1200.0, 900.0));
}
