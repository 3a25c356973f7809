//! End-to-end frame-loop tests driving the overlay through its public
//! surface only: accessors, raw input events, and save commands.

use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use twk::prelude::*;

fn new_gui(dir: &Path) -> Gui {
    Gui::new(
        GuiSettings::new("itest")
            .save_dir(dir)
            .load_latest_on_startup(false)
            .autosave_on_shutdown(false),
    )
    .unwrap()
}

fn press(g: &mut Gui, x: f32, y: f32) -> bool {
    g.publish_pointer_event(PointerEventKind::Press, Vec2::new(x, y), PointerButton::Left)
}

fn drag(g: &mut Gui, x: f32, y: f32) -> bool {
    g.publish_pointer_event(PointerEventKind::Drag, Vec2::new(x, y), PointerButton::Left)
}

fn release(g: &mut Gui, x: f32, y: f32) -> bool {
    g.publish_pointer_event(
        PointerEventKind::Release,
        Vec2::new(x, y),
        PointerButton::Left,
    )
}

fn click(g: &mut Gui, x: f32, y: f32) {
    press(g, x, y);
    release(g, x, y);
}

fn center(r: Rect) -> (f32, f32) {
    (r.x + r.width / 2.0, r.y + r.height / 2.0)
}

fn undo_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::CTRL)
}

fn redo_key() -> KeyEvent {
    KeyEvent::new(KeyCode::Char('y')).with_modifiers(Modifiers::CTRL)
}

#[test]
fn slider_drag_commit_undo_redo() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.begin_frame(1920.0, 1080.0);

    assert_eq!(g.slider("scene/shape/rotation", 0.0), 0.0);
    g.begin_frame(1920.0, 1080.0);

    // Open the nested folder's window by clicking its row in "scene".
    let shape_row = g.node_rect("scene/shape").unwrap();
    assert!(!shape_row.is_empty());
    let (cx, cy) = center(shape_row);
    click(&mut g, cx, cy);
    assert!(g.window_rect("scene/shape").is_some());
    g.begin_frame(1920.0, 1080.0);

    assert!(!g.can_undo());
    let row = g.node_rect("scene/shape/rotation").unwrap();
    let (rx, ry) = center(row);
    press(&mut g, rx, ry);
    drag(&mut g, rx + 450.0, ry);
    release(&mut g, rx + 450.0, ry);

    // 450 px at the default 0.1 step.
    let dragged = g.slider("scene/shape/rotation", 0.0);
    assert!(dragged > 40.0, "drag moved the value, got {dragged}");
    assert!(g.can_undo());

    assert!(g.publish_key_event(undo_key()));
    assert_eq!(g.slider("scene/shape/rotation", 0.0), 0.0);

    assert!(g.publish_key_event(redo_key()));
    assert!(g.slider("scene/shape/rotation", 0.0) > 40.0);
}

#[test]
fn press_over_overlapping_windows_hits_the_front_one() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.slider("a/x", 0.0);
    g.slider("b/y", 0.0);
    g.begin_frame(1920.0, 1080.0);

    let ra = g.window_rect("a").unwrap();
    let rb = g.window_rect("b").unwrap();
    // The cascade overlaps them; pick a point inside both title areas.
    let overlap_x = rb.x.max(ra.x) + 5.0;
    assert!(ra.contains(overlap_x, ra.y + 5.0));
    assert!(rb.contains(overlap_x, rb.y + 5.0));

    assert!(press(&mut g, overlap_x, rb.y + 5.0));
    assert_eq!(g.focused_folder(), Some("b"), "front window takes the press");
    release(&mut g, overlap_x, rb.y + 5.0);

    // Focus "a" through a point only it contains, then press the
    // overlap again: "a" is now in front and wins.
    assert!(press(&mut g, ra.x + 2.0, ra.y + 5.0));
    assert_eq!(g.focused_folder(), Some("a"));
    release(&mut g, ra.x + 2.0, ra.y + 5.0);
    assert!(press(&mut g, overlap_x, rb.y + 5.0));
    assert_eq!(g.focused_folder(), Some("a"));
    release(&mut g, overlap_x, rb.y + 5.0);

    // A press over nothing falls through to the host.
    assert!(!press(&mut g, 1800.0, 900.0));
    assert!(g.mouse_falls_through());
}

#[test]
fn fell_through_press_cancels_the_previous_widget_drag() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.begin_frame(1920.0, 1080.0);
    g.slider("v", 0.0);
    g.begin_frame(1920.0, 1080.0);

    let row = g.node_rect("v").unwrap();
    let (x, y) = center(row);
    press(&mut g, x, y);
    // The host steals the next press; no release arrives in between.
    assert!(!press(&mut g, 1800.0, 900.0));
    assert!(g.mouse_falls_through());
    // Drags now belong to the host, not the abandoned slider gesture.
    drag(&mut g, 1900.0, 900.0);
    assert_eq!(g.slider("v", 0.0), 0.0);
}

#[test]
fn toggle_click_commits_and_survives_reload() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.begin_frame(1920.0, 1080.0);
    assert!(!g.toggle("paused", false));
    g.begin_frame(1920.0, 1080.0);

    let row = g.node_rect("paused").unwrap();
    let (x, y) = center(row);
    click(&mut g, x, y);
    assert!(g.toggle("paused", false));
    assert!(g.can_undo(), "a click is one commit");
    g.save_as("one").unwrap();

    // A fresh instance declares the widget after loading: the saved
    // value arrives through restore-on-create.
    let mut g2 = Gui::new(
        GuiSettings::new("itest")
            .save_dir(tmp.path())
            .autosave_on_shutdown(false),
    )
    .unwrap();
    g2.begin_frame(1920.0, 1080.0);
    assert!(g2.toggle("paused", false));
}

#[test]
fn vector_drag_moves_both_axes_and_undoes() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.begin_frame(1920.0, 1080.0);
    g.vector2("offset", Vec2::ZERO);
    g.begin_frame(1920.0, 1080.0);

    let row = g.node_rect("offset").unwrap();
    let (x, y) = center(row);
    press(&mut g, x, y);
    drag(&mut g, x + 30.0, y + 20.0);
    release(&mut g, x + 30.0, y + 20.0);

    // 30 px and 20 px at the default 0.1 step.
    let v = g.vector2("offset", Vec2::ZERO);
    assert!((v.x - 3.0).abs() < 1e-4, "x moved by the drag, got {}", v.x);
    assert!((v.y - 2.0).abs() < 1e-4, "y moved by the drag, got {}", v.y);
    assert!(g.can_undo(), "the drag is one commit");

    assert!(g.publish_key_event(undo_key()));
    assert_eq!(g.vector2("offset", Vec2::ZERO), Vec2::ZERO);
}

#[test]
fn wheel_shifts_slider_precision() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.begin_frame(1920.0, 1080.0);
    g.slider("v", 0.0);
    g.begin_frame(1920.0, 1080.0);

    let row = g.node_rect("v").unwrap();
    let (x, y) = center(row);
    // Scroll down once: 0.1 -> 1.0 per pixel.
    assert!(g.publish_pointer_event(
        PointerEventKind::Wheel(-1.0),
        Vec2::new(x, y),
        PointerButton::Left,
    ));
    press(&mut g, x, y);
    drag(&mut g, x + 10.0, y);
    release(&mut g, x + 10.0, y);
    assert_eq!(g.slider("v", 0.0), 10.0);
}

#[test]
fn window_drag_snaps_on_drop_when_grid_enabled() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.slider("a/x", 0.0);
    g.begin_frame(1920.0, 1080.0);
    g.set_grid_snap(true);

    let r = g.window_rect("a").unwrap();
    press(&mut g, r.x + 10.0, r.y + 10.0);
    drag(&mut g, r.x + 23.0, r.y + 17.0);
    release(&mut g, r.x + 23.0, r.y + 17.0);

    let dropped = g.window_rect("a").unwrap();
    assert_eq!(dropped.x % 24.0, 0.0, "x snapped to the 24 px grid");
    assert_eq!(dropped.y % 24.0, 0.0, "y snapped to the 24 px grid");
    assert_ne!((dropped.x, dropped.y), (r.x, r.y), "the drag moved it");
}

#[test]
fn save_commands_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.slider_set("speed", 5.0);
    g.save_as("first").unwrap();
    sleep(Duration::from_millis(20));
    g.slider_set("speed", 9.0);
    g.save_as("second").unwrap();

    let names: Vec<_> = g.list_saves().unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["second", "first"]);

    g.load_save("first").unwrap();
    assert_eq!(g.slider("speed", 0.0), 5.0);

    g.rename_save("first", "alpha").unwrap();
    g.delete_save("second").unwrap();
    let names: Vec<_> = g.list_saves().unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["alpha"]);

    let generated = g.save_with_generated_name().unwrap();
    assert!(g.list_saves().unwrap().iter().any(|s| s.name == generated));
}

#[test]
fn shutdown_autosaves_and_next_run_restores() {
    let tmp = tempfile::tempdir().unwrap();
    let mut g = Gui::new(
        GuiSettings::new("itest")
            .save_dir(tmp.path())
            .load_latest_on_startup(false),
    )
    .unwrap();
    g.begin_frame(1920.0, 1080.0);
    g.slider_set("x", 2.0);
    g.shutdown();
    assert!(g.list_saves().unwrap().iter().any(|s| s.name == "auto"));

    let mut next = Gui::new(GuiSettings::new("itest").save_dir(tmp.path())).unwrap();
    next.begin_frame(1920.0, 1080.0);
    assert_eq!(next.slider("x", 0.0), 2.0);
}

#[test]
fn hidden_overlay_draws_nothing() {
    #[derive(Default)]
    struct CountingPainter {
        chrome: usize,
        rows: usize,
    }
    impl GuiPainter for CountingPainter {
        fn window_chrome(&mut self, _chrome: &WindowChrome<'_>) {
            self.chrome += 1;
        }
        fn row(&mut self, _row: &RowInfo<'_>) {
            self.rows += 1;
        }
    }

    let tmp = tempfile::tempdir().unwrap();
    let mut g = new_gui(tmp.path());
    g.slider("a/x", 0.0);
    g.toggle("flag", false);
    g.begin_frame(1920.0, 1080.0);

    let mut painter = CountingPainter::default();
    g.draw(&mut painter);
    // Root window (rows "a" and "flag") plus the "a" window (row "x").
    assert_eq!(painter.chrome, 2);
    assert_eq!(painter.rows, 3);

    g.hide();
    let mut hidden = CountingPainter::default();
    g.draw(&mut hidden);
    assert_eq!((hidden.chrome, hidden.rows), (0, 0));
}
