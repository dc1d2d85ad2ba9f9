use super::*;
use std::cell::Cell;

fn win() -> Window {
    Window::with_unix_origin(Viewport::new(100.0, 50.0, 1.0).unwrap(), 1_000.0)
}

#[test]
fn frame_callbacks_requested_during_tick_wait_for_next_tick() {
    let w = win();
    let hits = Rc::new(Cell::new(0u32));

    let (w2, h2) = (w.clone(), hits.clone());
    w.request_animation_frame(move |_| {
        h2.set(h2.get() + 1);
        let h3 = h2.clone();
        w2.request_animation_frame(move |_| h3.set(h3.get() + 1));
    });

    assert_eq!(w.tick(16.0), 1);
    assert_eq!(hits.get(), 1);
    assert_eq!(w.pending_frame_count(), 1);
    assert_eq!(w.tick(16.0), 1);
    assert_eq!(hits.get(), 2);
    assert_eq!(w.pending_frame_count(), 0);
}

#[test]
fn cancelled_frame_never_runs() {
    let w = win();
    let hits = Rc::new(Cell::new(0u32));
    let h = hits.clone();
    let id = w.request_animation_frame(move |_| h.set(h.get() + 1));
    assert!(w.cancel_animation_frame(id));
    assert!(!w.cancel_animation_frame(id));
    w.tick(16.0);
    assert_eq!(hits.get(), 0);
}

#[test]
fn frame_time_tracks_monotonic_and_wall_clock() {
    let w = win();
    let seen = Rc::new(Cell::new(None));
    let s = seen.clone();
    w.request_animation_frame(move |t| s.set(Some(t)));
    w.tick(20.0);
    let t = seen.get().unwrap();
    assert_eq!(t.now_ms, 20.0);
    assert_eq!(t.unix_ms, 1_020.0);
}

#[test]
fn tasks_run_before_frames_and_timers_fire_when_due() {
    let w = win();
    let log = Rc::new(RefCell::new(Vec::<&'static str>::new()));

    let l = log.clone();
    w.request_animation_frame(move |_| l.borrow_mut().push("frame"));
    let l = log.clone();
    w.post_task(move || l.borrow_mut().push("task"));
    let l = log.clone();
    w.set_timeout(30.0, move || l.borrow_mut().push("timer"));

    w.tick(16.0);
    assert_eq!(*log.borrow(), vec!["task", "frame"]);
    w.tick(16.0);
    assert_eq!(*log.borrow(), vec!["task", "frame", "timer"]);
    assert_eq!(w.pending_timer_count(), 0);
}

#[test]
fn cleared_timer_does_not_fire() {
    let w = win();
    let hit = Rc::new(Cell::new(false));
    let h = hit.clone();
    let id = w.set_timeout(0.0, move || h.set(true));
    assert!(w.clear_timeout(id));
    w.tick(1.0);
    assert!(!hit.get());
}

#[test]
fn resize_listeners_receive_new_viewport_until_removed() {
    let w = win();
    let widths = Rc::new(RefCell::new(Vec::new()));
    let ws = widths.clone();
    let id = w.add_resize_listener(move |vp| ws.borrow_mut().push(vp.width));
    assert_eq!(w.resize_listener_count(), 1);

    w.set_viewport(Viewport::new(200.0, 50.0, 1.0).unwrap());
    assert!(w.remove_resize_listener(id));
    w.set_viewport(Viewport::new(300.0, 50.0, 1.0).unwrap());

    assert_eq!(*widths.borrow(), vec![200.0]);
    assert_eq!(w.viewport().width, 300.0);
    assert_eq!(w.resize_listener_count(), 0);
}

#[test]
fn pointer_state_follows_events() {
    let w = win();
    let count = Rc::new(Cell::new(0u32));
    let c = count.clone();
    let id = w.add_pointer_listener(move |_| c.set(c.get() + 1));

    w.dispatch_pointer(PointerEvent {
        kind: PointerKind::Down,
        position: Point::new(3.0, 4.0),
    });
    assert!(w.pointer().pressed);
    assert_eq!(w.pointer().position, Point::new(3.0, 4.0));
    w.dispatch_pointer(PointerEvent {
        kind: PointerKind::Up,
        position: Point::new(5.0, 4.0),
    });
    assert!(!w.pointer().pressed);
    assert_eq!(count.get(), 2);

    assert!(w.remove_pointer_listener(id));
    assert_eq!(w.pointer_listener_count(), 0);
}

#[test]
fn frame_requested_by_a_task_runs_on_the_following_tick() {
    let w = win();
    let hits = Rc::new(Cell::new(0u32));
    let (w2, h) = (w.clone(), hits.clone());
    w.post_task(move || {
        w2.request_animation_frame(move |_| h.set(h.get() + 1));
    });

    assert_eq!(w.tick(16.0), 0);
    assert_eq!(w.pending_frame_count(), 1);
    assert_eq!(w.tick(16.0), 1);
    assert_eq!(hits.get(), 1);
}
