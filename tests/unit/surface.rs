use super::*;

fn window(w: f64, h: f64, dpr: f64) -> Window {
    Window::with_unix_origin(Viewport::new(w, h, dpr).unwrap(), 0.0)
}

#[test]
fn create_appends_tagged_child() {
    let win = window(32.0, 16.0, 1.0);
    let container = Container::new("stage");
    let s = SurfaceHandle::create(&win, &container).unwrap();
    assert_eq!(container.child_count(), 1);
    assert_eq!(container.children()[0].class, ARTWORK_CLASS);
    assert!(s.is_attached());
}

#[test]
fn backing_store_scales_by_device_pixel_ratio() {
    let win = window(32.0, 16.0, 2.0);
    let container = Container::new("stage");
    let s = SurfaceHandle::create(&win, &container).unwrap();
    assert_eq!(s.backing_size(), (64, 32));
    assert_eq!(s.viewport().width, 32.0);
}

#[test]
fn resize_is_idempotent_for_same_viewport() {
    let win = window(32.0, 16.0, 1.0);
    let container = Container::new("stage");
    let s = SurfaceHandle::create(&win, &container).unwrap();

    let vp = Viewport::new(40.0, 20.0, 1.5).unwrap();
    assert!(s.resize(vp).unwrap());
    let first = s.backing_size();
    assert!(!s.resize(vp).unwrap());
    assert_eq!(s.backing_size(), first);
    assert_eq!(first, (60, 30));
}

#[test]
fn empty_viewport_cannot_produce_a_context() {
    let win = window(0.0, 16.0, 1.0);
    let container = Container::new("stage");
    let err = SurfaceHandle::create(&win, &container).err().unwrap();
    assert!(matches!(err, NocturneError::Surface(_)));
    assert_eq!(container.child_count(), 0);
}

#[test]
fn remove_detaches_once() {
    let win = window(8.0, 8.0, 1.0);
    let container = Container::new("stage");
    let s = SurfaceHandle::create(&win, &container).unwrap();
    assert!(s.remove());
    assert_eq!(container.child_count(), 0);
    assert!(!s.is_attached());
    assert!(!s.remove());
}

#[test]
fn paint_uses_logical_units() {
    let win = window(8.0, 8.0, 2.0);
    let container = Container::new("stage");
    let s = SurfaceHandle::create(&win, &container).unwrap();
    s.paint(|p| {
        p.clear(Color::rgb(0, 0, 0));
        // Right half in logical units covers the right half of the 16x16 backing store.
        p.fill_rect(Rect::new(4.0, 0.0, 8.0, 8.0), Color::rgb(255, 0, 0));
    });
    let frame = s.snapshot();
    assert_eq!((frame.width, frame.height), (16, 16));
    assert_eq!(frame.pixel(2, 8), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(13, 8), Some([255, 0, 0, 255]));
}

#[test]
fn save_restore_scopes_transforms() {
    let win = window(10.0, 10.0, 1.0);
    let container = Container::new("stage");
    let s = SurfaceHandle::create(&win, &container).unwrap();
    s.paint(|p| {
        p.clear(Color::rgb(0, 0, 0));
        p.save();
        p.translate(Vec2::new(5.0, 0.0));
        p.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::rgb(0, 255, 0));
        p.restore();
        p.fill_rect(Rect::new(0.0, 5.0, 5.0, 10.0), Color::rgb(0, 0, 255));
    });
    let frame = s.snapshot();
    assert_eq!(frame.pixel(7, 2), Some([0, 255, 0, 255]));
    assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(2, 7), Some([0, 0, 255, 255]));
}

#[test]
fn lerp_color_endpoints() {
    let a = Color::rgba(0, 0, 0, 0);
    let b = Color::rgba(200, 100, 50, 255);
    assert_eq!(lerp_color(a, b, 0.0), a);
    assert_eq!(lerp_color(a, b, 1.0), b);
}
