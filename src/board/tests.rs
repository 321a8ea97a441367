use super::*;
use crate::draw::Rgba8;
use crate::scheduler::FrameRequests;
use std::cell::RefCell;
use std::rc::Rc;

const MS: Duration = Duration::from_millis(1);

fn test_config() -> Config {
    let mut config = Config::default();
    config.canvas.texture_enabled = false;
    config.ui.show_help_on_start = false;
    config
}

fn create_test_board(config: &Config, now: Instant) -> Chalkboard<FrameRequests> {
    Chalkboard::with_rng(
        config,
        100,
        100,
        FrameRequests::default(),
        now,
        StdRng::seed_from_u64(7),
    )
    .unwrap()
}

fn pixel(board: &mut Chalkboard<FrameRequests>, x: i32, y: i32) -> Rgba8 {
    board.surface_mut().pixel(x, y).unwrap()
}

/// Delivers frames until the scheduler stops asking for them.
fn drain_frames(board: &mut Chalkboard<FrameRequests>) -> usize {
    let mut rendered = 0;
    while board.host_mut().take() {
        if let FrameOutcome::Rearmed { rendered: n } = board.on_frame() {
            rendered += n;
        }
    }
    rendered
}

#[test]
fn press_without_motion_leaves_a_dot() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);
    let background = pixel(&mut board, 0, 0);

    board.on_mouse_press(MouseButton::Left, 10.0, 10.0);
    board.on_mouse_release(MouseButton::Left);

    assert!(pixel(&mut board, 10, 10).r > background.r);
    assert_eq!(pixel(&mut board, 15, 10), background);
    assert_eq!(board.mode(), StrokeMode::Idle);
    // No motion, so no frame was ever requested.
    assert_eq!(board.host().total(), 0);
}

#[test]
fn queued_points_render_once_per_frame() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);

    board.on_mouse_press(MouseButton::Left, 10.0, 50.0);
    board.on_mouse_motion(20.0, 50.0);
    board.on_mouse_motion(30.0, 50.0);
    board.on_mouse_motion(40.0, 50.0);

    assert_eq!(board.scheduler().len(), 3);
    assert_eq!(board.host().total(), 1, "one frame request per batch");

    assert!(board.host_mut().take());
    assert_eq!(board.on_frame(), FrameOutcome::Rearmed { rendered: 3 });
    assert_eq!(board.stroke().last, Point::new(40.0, 50.0));

    // Next frame finds nothing and stops the loop.
    assert!(board.host_mut().take());
    assert_eq!(board.on_frame(), FrameOutcome::Idle);
    assert!(!board.host().is_pending());
    assert!(!board.scheduler().is_pending());
}

#[test]
fn motion_after_idle_restarts_frame_loop() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);

    board.on_mouse_press(MouseButton::Left, 10.0, 50.0);
    board.on_mouse_motion(20.0, 50.0);
    assert_eq!(drain_frames(&mut board), 1);

    board.on_mouse_motion(30.0, 50.0);
    assert!(board.host().is_pending());
    assert_eq!(drain_frames(&mut board), 1);
    assert_eq!(board.host().total(), 4);
}

#[test]
fn release_discards_unrendered_points() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);
    let background = pixel(&mut board, 80, 50);

    board.on_mouse_press(MouseButton::Left, 10.0, 50.0);
    board.on_mouse_motion(80.0, 50.0);
    board.on_mouse_release(MouseButton::Left);

    assert!(board.scheduler().is_empty());
    // The frame requested before release still fires and goes idle.
    assert!(board.host_mut().take());
    assert_eq!(board.on_frame(), FrameOutcome::Idle);
    assert_eq!(pixel(&mut board, 80, 50), background);
}

#[test]
fn hover_moves_cursor_without_drawing() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);

    board.on_mouse_motion(25.0, 30.0);

    let cursor = board.cursor();
    assert_eq!(cursor.position, Some(Point::new(25.0, 30.0)));
    assert!(cursor.visible);
    assert!(board.scheduler().is_empty());

    board.on_pointer_leave();
    assert!(!board.cursor().visible);
}

#[test]
fn right_button_erases_then_restores_toggle() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);

    board.on_mouse_press(MouseButton::Right, 50.0, 50.0);
    assert_eq!(board.mode(), StrokeMode::Erasing);

    board.on_mouse_motion(50.0, 50.0);
    drain_frames(&mut board);
    assert_eq!(pixel(&mut board, 50, 50).a, 0);

    board.on_mouse_release(MouseButton::Right);
    assert!(!board.stroke().is_erasing);
}

#[test]
fn right_button_keeps_toggled_eraser_on() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);
    board.toggle_eraser();

    board.on_mouse_press(MouseButton::Right, 50.0, 50.0);
    board.on_mouse_release(MouseButton::Right);

    assert!(board.stroke().is_erasing);
}

#[test]
fn leaving_surface_ends_stroke() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);

    board.on_mouse_press(MouseButton::Right, 50.0, 50.0);
    board.on_pointer_leave();

    assert_eq!(board.mode(), StrokeMode::Idle);
    assert!(!board.stroke().is_erasing);
}

#[test]
fn middle_button_is_ignored() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);

    board.on_mouse_press(MouseButton::Middle, 10.0, 10.0);
    assert_eq!(board.mode(), StrokeMode::Idle);
}

#[test]
fn single_touch_draws_and_second_finger_is_ignored() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);
    let finger = |id, x, y| TouchPoint { id, x, y };

    board.on_touch_start(&[finger(1, 10.0, 20.0), finger(2, 60.0, 60.0)]);
    assert_eq!(board.mode(), StrokeMode::Idle);

    board.on_touch_start(&[finger(3, 10.0, 20.0)]);
    assert_eq!(board.mode(), StrokeMode::Drawing);

    board.on_touch_move(&[finger(4, 90.0, 90.0)]);
    assert!(board.scheduler().is_empty());

    board.on_touch_move(&[finger(3, 30.0, 20.0)]);
    assert_eq!(drain_frames(&mut board), 1);
    assert_eq!(board.stroke().last, Point::new(30.0, 20.0));

    board.on_touch_end(&[finger(3, 30.0, 20.0)]);
    assert_eq!(board.mode(), StrokeMode::Idle);
}

#[test]
fn touch_disabled_by_config() {
    let now = Instant::now();
    let mut config = test_config();
    config.touch.enabled = false;
    let mut board = create_test_board(&config, now);

    board.on_touch_start(&[TouchPoint { id: 1, x: 5.0, y: 5.0 }]);
    assert_eq!(board.mode(), StrokeMode::Idle);
}

#[test]
fn default_keys_trigger_actions() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);
    let none = Modifiers::default();

    assert_eq!(
        board.on_key(Key::Char('e'), none, now),
        Some(Action::ToggleEraser)
    );
    assert!(board.stroke().is_erasing);

    assert_eq!(
        board.on_key(Key::Char('h'), none, now),
        Some(Action::ToggleHelp)
    );
    assert!(board.notices().is_showing(NoticeKind::Help, now));
    assert!(!board.notices().is_showing(NoticeKind::Help, now + 5000 * MS));

    assert_eq!(board.on_key(Key::Char('x'), none, now), None);
}

#[test]
fn space_clears_strokes_and_holes() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);
    let background = pixel(&mut board, 50, 50);

    board.on_mouse_press(MouseButton::Right, 50.0, 50.0);
    board.on_mouse_motion(50.0, 50.0);
    drain_frames(&mut board);
    board.on_mouse_release(MouseButton::Right);
    board.on_mouse_press(MouseButton::Left, 10.0, 10.0);
    board.on_mouse_release(MouseButton::Left);

    assert_eq!(
        board.on_key(Key::Space, Modifiers::default(), now),
        Some(Action::ClearCanvas)
    );
    assert_eq!(pixel(&mut board, 50, 50), background);
    assert_eq!(pixel(&mut board, 10, 10), background);
}

#[test]
fn startup_help_is_delayed() {
    let now = Instant::now();
    let mut config = test_config();
    config.ui.show_help_on_start = true;
    let board = create_test_board(&config, now);

    assert!(!board.notices().is_showing(NoticeKind::Help, now));
    assert!(board.notices().is_showing(NoticeKind::Help, now + 500 * MS));
    assert!(!board.notices().is_showing(NoticeKind::Help, now + 3500 * MS));
}

#[test]
fn resize_is_debounced_and_keeps_holes() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);
    board.toggle_eraser();
    board.start_stroke(Point::new(50.0, 50.0));
    board.enqueue(Point::new(50.0, 50.0));
    drain_frames(&mut board);
    board.stop_stroke();

    board.request_resize(300, 200, now);
    board.request_resize(200, 150, now + 50 * MS);
    board.poll(now + 120 * MS);
    assert_eq!(board.surface().width(), 100);

    board.poll(now + 150 * MS);
    assert_eq!(board.surface().width(), 200);
    assert_eq!(board.surface().height(), 150);
    assert_eq!(pixel(&mut board, 50, 50).a, 0);
    assert_eq!(pixel(&mut board, 150, 120).a, 255);
}

#[test]
fn invalid_resize_keeps_surface() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);

    board.request_resize(0, 150, now);
    board.poll(now + 200 * MS);

    assert_eq!(board.surface().width(), 100);
}

#[test]
fn set_color_changes_chalk() {
    let now = Instant::now();
    let mut board = create_test_board(&test_config(), now);

    board.set_color("#ff0000").unwrap();
    board.on_mouse_press(MouseButton::Left, 10.0, 10.0);

    let dot = pixel(&mut board, 10, 10);
    assert!(dot.r > dot.g);
    assert!(board.set_color("red").is_err());
}

#[test]
fn save_writes_png_and_posts_notice() {
    let now = Instant::now();
    let temp = tempfile::tempdir().unwrap();
    let saved = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&saved);

    let mut board = create_test_board(&test_config(), now).with_capabilities(
        Capabilities::new().on_save(move |path| sink.borrow_mut().push(path.to_path_buf())),
    );
    board.set_export_config(ExportConfig {
        directory: temp.path().to_path_buf(),
        filename_prefix: "chalkboard".to_string(),
        include_timestamp: true,
    });

    let path = board.save(now, 1234).unwrap();

    assert!(path.ends_with("chalkboard_1234.png"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    assert!(board.notices().is_showing(NoticeKind::Success, now));
    assert!(!board.notices().is_showing(NoticeKind::Success, now + 2000 * MS));
    assert_eq!(saved.borrow().as_slice(), &[path]);
}

#[test]
fn failed_save_posts_error_notice() {
    let now = Instant::now();
    let temp = tempfile::tempdir().unwrap();
    let blocker = temp.path().join("not-a-dir");
    std::fs::write(&blocker, b"").unwrap();

    let mut board = create_test_board(&test_config(), now);
    board.set_export_config(ExportConfig {
        directory: blocker.join("nested"),
        filename_prefix: "chalkboard".to_string(),
        include_timestamp: true,
    });

    assert!(board.save(now, 1).is_err());
    assert!(board.notices().is_showing(NoticeKind::Error, now));

    // The board still draws afterwards.
    board.on_mouse_press(MouseButton::Left, 10.0, 10.0);
    assert_eq!(board.mode(), StrokeMode::Drawing);
}

#[test]
fn capabilities_fire_on_clear_and_eraser_toggle() {
    let now = Instant::now();
    let events = Rc::new(RefCell::new(Vec::new()));
    let on_clear = Rc::clone(&events);
    let on_toggle = Rc::clone(&events);

    let mut board = create_test_board(&test_config(), now).with_capabilities(
        Capabilities::new()
            .on_clear(move || on_clear.borrow_mut().push("clear".to_string()))
            .on_eraser_toggle(move |on| on_toggle.borrow_mut().push(format!("eraser {on}"))),
    );

    board.toggle_eraser();
    board.clear();
    board.on_mouse_press(MouseButton::Right, 5.0, 5.0);
    board.on_mouse_release(MouseButton::Right);

    // Forcing the eraser while it is already on is not a change.
    assert_eq!(*events.borrow(), vec!["eraser true", "clear"]);
}

#[test]
fn bad_keybindings_are_rejected() {
    let mut config = test_config();
    config.keybindings.save_image = vec!["Space".to_string()];

    let result = Chalkboard::new(&config, 10, 10, FrameRequests::default(), Instant::now());
    assert!(matches!(result, Err(BoardError::Keybindings(_))));
}
