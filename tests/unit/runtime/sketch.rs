use super::*;
use crate::window::{PointerEvent, PointerKind};
use std::cell::Cell;

#[derive(Default)]
struct Probe {
    setups: Rc<Cell<u32>>,
    draws: Rc<Cell<u32>>,
    resizes: Rc<Cell<u32>>,
    pressed_seen: Rc<Cell<bool>>,
}

impl Sketch for Probe {
    fn setup(&mut self, _viewport: Viewport) {
        self.setups.set(self.setups.get() + 1);
    }

    fn draw(&mut self, p: &mut SketchFrame<'_, '_>) {
        self.draws.set(self.draws.get() + 1);
        if p.mouse_is_pressed() {
            self.pressed_seen.set(true);
        }
        p.background(Color::rgb(0, 0, 0));
        p.fill(Color::rgb(255, 0, 0));
        let (cx, cy) = (p.width() / 2.0, p.height() / 2.0);
        p.ellipse(cx, cy, 8.0);
    }

    fn window_resized(&mut self, _viewport: Viewport) {
        self.resizes.set(self.resizes.get() + 1);
    }
}

fn win() -> Window {
    Window::with_unix_origin(Viewport::new(40.0, 20.0, 1.0).unwrap(), 0.0)
}

#[test]
fn instance_draws_every_frame_and_tears_down() {
    let w = win();
    let c = Container::new("stage");
    let probe = Probe::default();
    let (setups, draws) = (probe.setups.clone(), probe.draws.clone());

    let rt = SketchRuntime::new();
    let inst = rt.instantiate(Box::new(probe), &w, &c, 7).unwrap();
    assert_eq!(setups.get(), 1);
    assert_eq!(draws.get(), 1);
    assert_eq!(c.child_count(), 1);
    assert_eq!(w.resize_listener_count(), 1);
    assert_eq!(w.pointer_listener_count(), 1);

    w.tick(16.0);
    w.tick(16.0);
    assert_eq!(inst.frame_count(), 3);
    assert!(inst.is_running());

    let frame = inst.surface().unwrap().snapshot();
    assert_eq!(frame.pixel(20, 10), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));

    inst.remove();
    assert_eq!(c.child_count(), 0);
    assert_eq!(w.resize_listener_count(), 0);
    assert_eq!(w.pointer_listener_count(), 0);
    assert_eq!(w.pending_frame_count(), 0);
    w.tick(16.0);
    assert_eq!(draws.get(), 3);
}

#[test]
fn resize_refits_surface_then_notifies_sketch() {
    let w = win();
    let c = Container::new("stage");
    let probe = Probe::default();
    let resizes = probe.resizes.clone();
    let inst = SketchRuntime::new()
        .instantiate(Box::new(probe), &w, &c, 1)
        .unwrap();

    w.set_viewport(Viewport::new(80.0, 40.0, 2.0).unwrap());
    assert_eq!(resizes.get(), 1);
    assert_eq!(inst.surface().unwrap().backing_size(), (160, 80));
}

#[test]
fn pointer_state_reaches_draw() {
    let w = win();
    let c = Container::new("stage");
    let probe = Probe::default();
    let seen = probe.pressed_seen.clone();
    let _inst = SketchRuntime::new()
        .instantiate(Box::new(probe), &w, &c, 1)
        .unwrap();

    w.dispatch_pointer(PointerEvent {
        kind: PointerKind::Down,
        position: Point::new(5.0, 5.0),
    });
    assert!(!seen.get());
    w.tick(16.0);
    assert!(seen.get());
}

#[test]
fn dropping_an_instance_releases_everything() {
    let w = win();
    let c = Container::new("stage");
    {
        let _inst = SketchRuntime::new()
            .instantiate(Box::new(Probe::default()), &w, &c, 1)
            .unwrap();
    }
    assert!(c.is_empty());
    assert_eq!(w.pending_frame_count(), 0);
    assert_eq!(w.resize_listener_count(), 0);
}
