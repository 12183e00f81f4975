use super::*;
use crate::assets::source::MemoryImageSource;
use crate::foundation::core::{Point, Rect, Vec2};
use crate::interaction::history::SnapshotAction;
use crate::interaction::input::KeyChord;
use crate::persist::store::MemoryStore;
use crate::render::record::RecordingRenderer;

type TestEditor = Editor<RecordingRenderer, MemoryImageSource>;

fn images() -> MemoryImageSource {
    MemoryImageSource::new()
        .with_image("base.png", DecodedImage::solid(800, 600, [10, 10, 10, 255]).unwrap())
        .with_image("alt.png", DecodedImage::solid(40, 30, [0, 0, 0, 255]).unwrap())
        .with_image("o.png", DecodedImage::solid(16, 16, [255, 0, 0, 255]).unwrap())
        .with_image("p.png", DecodedImage::solid(8, 8, [0, 255, 0, 255]).unwrap())
}

fn editor() -> TestEditor {
    Editor::open(
        ImageRef::new("base.png"),
        images(),
        RecordingRenderer::new(),
        EditorOpts::default(),
    )
    .unwrap()
}

fn draws(commands: &[DrawCommand]) -> Vec<&str> {
    commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawImage { image, .. } => Some(image.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn open_composites_the_base_immediately() {
    let e = editor();
    assert_eq!(e.renderer().surface_size(), (800, 600));
    assert_eq!(draws(e.renderer().commands()), vec!["base.png"]);
    assert_eq!(e.base_size(), Size::new(800.0, 600.0));
}

#[test]
fn open_with_unknown_image_is_a_decode_error() {
    let err = Editor::open(
        ImageRef::new("missing.png"),
        images(),
        RecordingRenderer::new(),
        EditorOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CanvasError::Decode(_)));
}

#[test]
fn added_overlay_takes_the_surface_size_and_selection() {
    let mut e = editor();
    e.adjust_base_scale(0.5).unwrap();
    let index = e.add_overlay(ImageRef::new("o.png")).unwrap();
    assert_eq!(index, 0);

    let o = e.session().overlays.selected().unwrap();
    assert_eq!(o.native_size(), Size::new(1200.0, 900.0));
    assert_eq!(o.bounds(), Rect::new(0.0, 0.0, 1200.0, 900.0));
    assert_eq!(draws(&e.plan().unwrap()), vec!["base.png", "o.png"]);
}

#[test]
fn failed_overlay_decode_leaves_session_alone() {
    let mut e = editor();
    let before = e.session().clone();
    assert!(e.add_overlay(ImageRef::new("nope.png")).is_err());
    assert_eq!(e.session(), &before);
}

#[test]
fn load_image_keeps_transform_and_overlays() {
    let mut e = editor();
    e.add_overlay(ImageRef::new("o.png")).unwrap();
    e.toggle_flip().unwrap();
    e.load_image(ImageRef::new("alt.png")).unwrap();

    assert_eq!(e.session().base_image.as_str(), "alt.png");
    assert!(e.session().canvas.flipped);
    assert_eq!(e.session().overlays.len(), 1);
    assert_eq!(e.renderer().surface_size(), (40, 30));
}

#[test]
fn wheel_input_redraws_with_new_scale() {
    let mut e = editor();
    e.add_overlay(ImageRef::new("o.png")).unwrap();
    let out = e
        .handle_input(&InputEvent::Wheel { delta_y: -100.0 })
        .unwrap();
    assert_eq!(out, GestureOutcome::Mutated);
    assert_eq!(e.session().overlays.selected().unwrap().scale(), 2.0);
    assert!(e.renderer().commands().contains(&DrawCommand::Scale { sx: 2.0, sy: 2.0 }));
}

#[test]
fn layer_moves_without_selection_do_nothing() {
    let mut e = editor();
    let before = e.renderer().commands().len();
    assert!(!e.move_layer_up().unwrap());
    assert!(!e.move_layer_down().unwrap());
    assert_eq!(e.renderer().commands().len(), before);
}

#[test]
fn layer_move_and_inverse_restore_order() {
    let mut e = editor();
    e.add_overlay(ImageRef::new("o.png")).unwrap();
    e.add_overlay(ImageRef::new("p.png")).unwrap();
    assert!(e.move_layer_up().unwrap());
    assert_eq!(draws(&e.plan().unwrap()), vec!["base.png", "p.png", "o.png"]);
    assert!(e.move_layer_down().unwrap());
    assert_eq!(draws(&e.plan().unwrap()), vec!["base.png", "o.png", "p.png"]);
}

#[test]
fn reset_is_idempotent() {
    let mut e = editor();
    e.add_overlay(ImageRef::new("o.png")).unwrap();
    e.set_base_translate(30.0, 40.0).unwrap();
    e.toggle_invert().unwrap();

    e.reset().unwrap();
    let once = e.session().clone();
    e.reset().unwrap();
    assert_eq!(e.session(), &once);
    assert!(e.session().overlays.is_empty());
    assert_eq!(e.session().canvas.translate, Vec2::ZERO);
    assert!(!e.session().canvas.inverted);
}

#[test]
fn key_chords_walk_the_history() {
    let mut e = editor();
    let before = e.session().clone();
    e.add_overlay(ImageRef::new("o.png")).unwrap();
    let after = e.session().clone();
    e.push_action(Box::new(SnapshotAction::new("add overlay", before.clone(), after.clone())));

    let undo = InputEvent::Key {
        chord: KeyChord::new(true, 'z'),
    };
    e.handle_input(&undo).unwrap();
    assert_eq!(e.session(), &before);

    let redo = InputEvent::Key {
        chord: KeyChord::new(true, 'y'),
    };
    e.handle_input(&redo).unwrap();
    assert_eq!(e.session(), &after);
    assert_eq!(e.redo().unwrap(), None);
}

#[test]
fn save_then_load_restores_session() {
    let mut e = editor();
    e.add_overlay(ImageRef::new("o.png")).unwrap();
    e.handle_input(&InputEvent::PointerDown {
        at: Point::new(10.0, 10.0),
    })
    .unwrap();
    e.handle_input(&InputEvent::PointerMove {
        at: Point::new(60.0, 30.0),
    })
    .unwrap();
    e.handle_input(&InputEvent::PointerUp).unwrap();

    let mut store = MemoryStore::new();
    e.save_project(&mut store).unwrap();
    let saved = e.session().clone();

    e.reset().unwrap();
    assert!(e.load_project(&store).unwrap());
    assert_eq!(e.session().overlays.as_slice(), saved.overlays.as_slice());
    assert_eq!(e.session().canvas, saved.canvas);
    assert_eq!(e.session().overlays.selected_index(), None);
}

#[test]
fn absent_or_malformed_project_is_a_noop() {
    let mut e = editor();
    e.add_overlay(ImageRef::new("o.png")).unwrap();
    let before = e.session().clone();

    let mut store = MemoryStore::new();
    assert!(!e.load_project(&store).unwrap());
    store.save("savedProject", "{not json").unwrap();
    assert!(!e.load_project(&store).unwrap());
    assert_eq!(e.session(), &before);
}

#[test]
fn project_with_unknown_image_fails_without_swapping() {
    let mut e = editor();
    let before = e.session().clone();
    let mut store = MemoryStore::new();
    store
        .save(
            "savedProject",
            r#"{"image": "gone.png", "scale": 1, "translateX": 0, "translateY": 0, "flip": false, "invert": false}"#,
        )
        .unwrap();
    let err = e.load_project(&store).unwrap_err();
    assert!(matches!(err, CanvasError::Decode(_)));
    assert_eq!(e.session(), &before);
}

#[test]
fn scripted_commands_drive_the_editor() {
    let mut e = editor();
    let script: Vec<EditorCommand> = serde_json::from_str(
        r#"[
            {"op": "add_overlay", "src": "o.png"},
            {"op": "input", "event": {"type": "wheel", "delta_y": -50}},
            {"op": "toggle_flip"},
            {"op": "move_layer_down"}
        ]"#,
    )
    .unwrap();
    for cmd in &script {
        e.apply(cmd).unwrap();
    }
    assert_eq!(e.session().overlays.selected().unwrap().scale(), 1.5);
    assert!(e.session().canvas.flipped);
}

fn wide_editor() -> TestEditor {
    let images = MemoryImageSource::new()
        .with_image("wide.png", DecodedImage::solid(6000, 2, [1, 2, 3, 255]).unwrap())
        .with_image("o.png", DecodedImage::solid(4, 4, [255, 0, 0, 255]).unwrap());
    Editor::open(
        ImageRef::new("wide.png"),
        images,
        RecordingRenderer::new(),
        EditorOpts::default(),
    )
    .unwrap()
}

#[test]
fn zoom_past_surface_limit_rolls_back_and_editor_keeps_working() {
    let mut e = wide_editor();
    let before = e.session().clone();

    let err = e
        .handle_input(&InputEvent::Wheel { delta_y: -200.0 })
        .unwrap_err();
    assert!(matches!(err, CanvasError::Render(_)));
    assert_eq!(e.session(), &before);
    assert_eq!(e.session().canvas.scale(), 1.0);
    assert_eq!(e.renderer().surface_size(), (6000, 2));

    e.toggle_flip().unwrap();
    assert!(e.session().canvas.flipped);
    assert_eq!(e.adjust_base_scale(1.0).unwrap(), 2.0);
}

#[test]
fn direct_zoom_past_surface_limit_is_rejected_without_change() {
    let mut e = wide_editor();
    assert!(e.adjust_base_scale(2.0).is_err());
    assert_eq!(e.session().canvas.scale(), 1.0);
    assert_eq!(e.gesture_state(), GestureState::Idle);
}

#[test]
fn failed_undo_redraw_keeps_session_and_cursor() {
    let mut e = wide_editor();
    let current = e.session().clone();
    let mut too_big = current.clone();
    too_big.canvas.set_scale(3.0);
    e.push_action(Box::new(SnapshotAction::new("zoom", too_big, current.clone())));

    assert!(e.undo().is_err());
    assert_eq!(e.session(), &current);
    assert!(e.history().can_undo());
    assert!(!e.history().can_redo());
}

#[test]
fn from_session_decodes_every_referenced_image() {
    let mut s = Session::new(ImageRef::new("base.png"));
    s.overlays
        .push(Overlay::new(ImageRef::new("o.png"), Size::new(10.0, 10.0)));
    let e = Editor::from_session(s.clone(), images(), RecordingRenderer::new(), EditorOpts::default())
        .unwrap();
    assert_eq!(e.session(), &s);
    assert_eq!(draws(e.renderer().commands()), vec!["base.png", "o.png"]);

    let mut missing = s;
    missing.base_image = ImageRef::new("gone.png");
    let err = Editor::from_session(missing, images(), RecordingRenderer::new(), EditorOpts::default())
        .unwrap_err();
    assert!(matches!(err, CanvasError::Decode(_)));
}
