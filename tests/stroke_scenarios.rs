use air_canvas::{BrushKind, CanvasEngine, Color, Error, Layer, PointerEvent};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("air-canvas-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn stroke(canvas: &mut CanvasEngine, points: &[(i32, i32)]) {
    for &(x, y) in points {
        canvas.handle_pointer(PointerEvent::draw(x, y, 1.0));
    }
    canvas.handle_pointer(PointerEvent::lift());
}

#[test_log::test]
fn horizontal_stroke_is_continuous() {
    let mut canvas = CanvasEngine::new(800, 600, Color::WHITE);
    let red = Color::rgb(220, 20, 20);
    canvas.set_color(red);
    let before = canvas.history_len();

    canvas.handle_pointer(PointerEvent::draw(100, 100, 1.0));
    canvas.handle_pointer(PointerEvent::draw(200, 100, 1.0));
    canvas.handle_pointer(PointerEvent::lift());

    assert_eq!(canvas.history_len(), before + 1);
    let layer = canvas.layer();
    for x in 100..=200 {
        assert_eq!(layer.get(x, 100), Some(red), "gap at x={x}");
    }
    assert_eq!(layer.get(300, 100), Some(Color::WHITE));
    assert_eq!(layer.get(150, 200), Some(Color::WHITE));
}

#[test]
fn every_brush_draws_a_connected_stroke_on_the_centre_line() {
    for kind in BrushKind::ALL {
        let mut canvas = CanvasEngine::new(200, 80, Color::WHITE).with_seed(1);
        canvas.set_brush(kind);
        canvas.set_size(9);
        canvas.set_color(Color::BLACK);
        stroke(&mut canvas, &[(20, 40), (180, 40)]);
        let layer = canvas.layer();
        let untouched = (25..=175).filter(|&x| layer.get(x, 40) == Some(Color::WHITE)).count();
        assert_eq!(untouched, 0, "{kind} left {untouched} gaps");
    }
}

#[test]
fn undo_back_to_the_start_then_stop() {
    let mut canvas = CanvasEngine::new(120, 90, Color::WHITE);
    let original = canvas.layer().clone();
    for i in 0..4 {
        stroke(&mut canvas, &[(10 + 20 * i, 10), (10 + 20 * i, 80)]);
    }
    let n = canvas.history_len();
    assert_eq!(n, 5);

    for _ in 0..n - 1 {
        assert!(canvas.undo());
    }
    assert_eq!(canvas.layer(), &original);
    assert!(!canvas.undo());
    assert_eq!(canvas.layer(), &original);
}

#[test]
fn redo_restores_exact_bytes() {
    let mut canvas = CanvasEngine::new(120, 90, Color::WHITE).with_seed(9);
    canvas.set_brush(BrushKind::Watercolor);
    stroke(&mut canvas, &[(30, 30), (90, 60)]);
    canvas.set_brush(BrushKind::Pencil);
    stroke(&mut canvas, &[(30, 60), (90, 30)]);
    let drawn = canvas.layer().as_bytes().to_vec();

    assert!(canvas.undo());
    assert_ne!(canvas.layer().as_bytes(), &drawn[..]);
    assert!(canvas.redo());
    assert_eq!(canvas.layer().as_bytes(), &drawn[..]);
    assert!(!canvas.redo());
}

#[test]
fn new_stroke_after_undo_discards_redo() {
    let mut canvas = CanvasEngine::new(64, 64, Color::WHITE);
    stroke(&mut canvas, &[(10, 10)]);
    stroke(&mut canvas, &[(30, 30)]);
    assert!(canvas.undo());
    assert!(canvas.can_redo());

    stroke(&mut canvas, &[(50, 50)]);
    assert!(!canvas.can_redo());
    assert!(!canvas.redo());
}

#[test]
fn redo_records_the_layer_it_replaced() {
    let mut canvas = CanvasEngine::new(64, 64, Color::WHITE);
    let background = canvas.layer().clone();
    stroke(&mut canvas, &[(10, 10), (50, 10)]);
    let b = canvas.layer().clone();

    assert!(canvas.undo());
    assert!(canvas.redo());
    assert_eq!(canvas.layer(), &b);

    stroke(&mut canvas, &[(10, 50), (50, 50)]);
    assert!(canvas.undo());
    // the entry under the new stroke is the pre-redo layer, not the redone one
    assert_eq!(canvas.layer(), &background);
    assert!(canvas.undo());
    assert_eq!(canvas.layer(), &background);
    assert!(!canvas.undo());
}

#[test]
fn history_is_bounded() {
    let mut canvas = CanvasEngine::new(32, 32, Color::WHITE).with_history_capacity(3);
    for i in 0..10 {
        stroke(&mut canvas, &[(i * 3, 16)]);
    }
    assert_eq!(canvas.history_len(), 3);
    assert!(canvas.undo());
    assert!(canvas.undo());
    assert!(!canvas.undo());
}

#[test]
fn clamped_setters() {
    let mut canvas = CanvasEngine::new(8, 8, Color::WHITE);
    canvas.set_opacity(-0.5);
    assert_eq!(canvas.brush().opacity(), 0.0);
    canvas.set_opacity(1.5);
    assert_eq!(canvas.brush().opacity(), 1.0);
    canvas.set_flow(-1.0);
    canvas.set_hardness(7.0);
    canvas.set_size(0);
    assert_eq!(canvas.brush().flow(), 0.0);
    assert_eq!(canvas.brush().hardness(), 1.0);
    assert_eq!(canvas.brush().size(), 1);
}

#[test_log::test]
fn clear_then_save_is_all_background() {
    let dir = scratch_dir("clear-save");
    let path = dir.join("nested/deeper/drawing.png");
    let bg = Color::rgb(250, 240, 230);

    let mut canvas = CanvasEngine::new(40, 30, bg);
    stroke(&mut canvas, &[(5, 5), (35, 25)]);
    canvas.clear();
    assert!(canvas.save(&path));

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (40, 30));
    assert!(img.pixels().all(|p| p.0 == bg.channels()));
    assert!(!path.with_file_name("drawing.png.tmp").exists());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn saved_channels_match_the_layer() {
    let dir = scratch_dir("channels");
    let path = dir.join("mark.bmp");
    let mut canvas = CanvasEngine::new(20, 20, Color::WHITE);
    canvas.set_color(Color::rgb(10, 120, 240));
    canvas.set_size(3);
    stroke(&mut canvas, &[(10, 10)]);
    canvas.export(&path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!(img.get_pixel(10, 10).0, [10, 120, 240]);
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
    let _ = fs::remove_dir_all(&dir);
}

#[test_log::test]
fn failed_save_reports_false_and_changes_nothing() {
    let dir = scratch_dir("blocked");
    fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();

    let mut canvas = CanvasEngine::new(16, 16, Color::WHITE);
    stroke(&mut canvas, &[(8, 8)]);
    let layer: Layer = canvas.layer().clone();
    let history = canvas.history_len();

    let target = blocker.join("sub/out.png");
    assert!(!canvas.save(&target));
    assert!(matches!(canvas.export(&target), Err(Error::Io(_))));
    assert!(!target.exists());
    assert_eq!(canvas.layer(), &layer);
    assert_eq!(canvas.history_len(), history);
    let _ = fs::remove_dir_all(&dir);
}
