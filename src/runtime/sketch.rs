use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::{Color, Point, Viewport};
use crate::foundation::error::NocturneResult;
use crate::foundation::math::Rng64;
use crate::frame_loop::FrameLoop;
use crate::surface::{Painter, SurfaceHandle};
use crate::window::{Container, ListenerId, PointerState, Window};

/// User code driven by the sketch runtime.
pub trait Sketch {
    /// Called once, before the first `draw`.
    fn setup(&mut self, _viewport: Viewport) {}

    /// Called once per animation frame.
    fn draw(&mut self, p: &mut SketchFrame<'_, '_>);

    /// Called after the runtime has re-fitted its surface to a new viewport.
    fn window_resized(&mut self, _viewport: Viewport) {}
}

/// Per-frame view of the runtime handed to [`Sketch::draw`].
pub struct SketchFrame<'p, 'a> {
    painter: &'p mut Painter<'a>,
    rng: &'p mut Rng64,
    millis: f64,
    frame_count: u64,
    pointer: PointerState,
    fill: Color,
}

impl<'a> SketchFrame<'_, 'a> {
    pub fn width(&self) -> f64 {
        self.painter.width()
    }

    pub fn height(&self) -> f64 {
        self.painter.height()
    }

    /// Milliseconds since the instance started.
    pub fn millis(&self) -> f64 {
        self.millis
    }

    /// 1 on the first `draw`.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn mouse(&self) -> Point {
        self.pointer.position
    }

    pub fn mouse_is_pressed(&self) -> bool {
        self.pointer.pressed
    }

    /// Uniform in `[0, max)`.
    pub fn random(&mut self, max: f64) -> f64 {
        self.rng.range(0.0, max)
    }

    pub fn background(&mut self, color: Color) {
        self.painter.clear(color);
    }

    pub fn fill(&mut self, color: Color) {
        self.fill = color;
    }

    /// Set the fill from HSB(A) on a 360/100/100/100 scale.
    pub fn fill_hsb(&mut self, h: f64, s: f64, b: f64, a: f64) {
        self.fill = Color::from_hsb(h, s, b, a);
    }

    /// Circle of diameter `d` centered at `(x, y)` in the current fill.
    pub fn ellipse(&mut self, x: f64, y: f64, d: f64) {
        self.painter.fill_circle(Point::new(x, y), d / 2.0, self.fill);
    }

    pub fn painter(&mut self) -> &mut Painter<'a> {
        &mut *self.painter
    }
}

struct InstanceState {
    sketch: Box<dyn Sketch>,
    rng: Rng64,
    started_ms: f64,
    frame_count: u64,
    pointer: PointerState,
}

/// The loaded runtime handle. Shared read-only by every instance it creates.
#[derive(Debug)]
pub struct SketchRuntime {
    version: &'static str,
}

impl SketchRuntime {
    pub const VERSION: &'static str = "1.0.0";

    pub(crate) fn new() -> Self {
        Self {
            version: Self::VERSION,
        }
    }

    pub fn version(&self) -> &str {
        self.version
    }

    /// Start `sketch` on a fresh surface inside `container`.
    ///
    /// The instance owns the surface, one resize listener, one pointer listener and its frame
    /// loop until [`SketchInstance::remove`].
    pub fn instantiate(
        &self,
        mut sketch: Box<dyn Sketch>,
        window: &Window,
        container: &Container,
        seed: u64,
    ) -> NocturneResult<SketchInstance> {
        let surface = SurfaceHandle::create(window, container)?;
        sketch.setup(window.viewport());

        let state = Rc::new(RefCell::new(InstanceState {
            sketch,
            rng: Rng64::new(seed),
            started_ms: window.frame_time().now_ms,
            frame_count: 0,
            pointer: window.pointer(),
        }));

        let resize = {
            let surface = surface.clone();
            let state = Rc::clone(&state);
            window.add_resize_listener(move |vp| {
                if let Err(e) = surface.resize(vp) {
                    tracing::warn!(error = %e, "sketch surface kept its previous size");
                    return;
                }
                state.borrow_mut().sketch.window_resized(vp);
            })
        };

        let pointer = {
            let state = Rc::clone(&state);
            window.add_pointer_listener(move |ev| {
                let mut st = state.borrow_mut();
                st.pointer.position = ev.position;
                match ev.kind {
                    crate::window::PointerKind::Down => st.pointer.pressed = true,
                    crate::window::PointerKind::Up => st.pointer.pressed = false,
                    crate::window::PointerKind::Move => {}
                }
            })
        };

        let frame_loop = {
            let surface = surface.clone();
            let state = Rc::clone(&state);
            FrameLoop::start(window, move |t| {
                let mut guard = state.borrow_mut();
                let st = &mut *guard;
                st.frame_count += 1;
                let millis = t.now_ms - st.started_ms;
                surface.paint(|painter| {
                    let mut frame = SketchFrame {
                        painter,
                        rng: &mut st.rng,
                        millis,
                        frame_count: st.frame_count,
                        pointer: st.pointer,
                        fill: Color::rgb(255, 255, 255),
                    };
                    st.sketch.draw(&mut frame);
                });
            })
        };

        Ok(SketchInstance {
            window: window.clone(),
            surface: Some(surface),
            frame_loop: Some(frame_loop),
            resize: Some(resize),
            pointer: Some(pointer),
            state,
        })
    }
}

/// A running sketch. [`SketchInstance::remove`] (or drop) releases everything it registered.
pub struct SketchInstance {
    window: Window,
    surface: Option<SurfaceHandle>,
    frame_loop: Option<FrameLoop>,
    resize: Option<ListenerId>,
    pointer: Option<ListenerId>,
    state: Rc<RefCell<InstanceState>>,
}

impl SketchInstance {
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frame_count
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.as_ref().is_some_and(FrameLoop::is_running)
    }

    pub fn surface(&self) -> Option<&SurfaceHandle> {
        self.surface.as_ref()
    }

    pub fn remove(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(lp) = self.frame_loop.take() {
            lp.cancel();
        }
        if let Some(id) = self.resize.take() {
            self.window.remove_resize_listener(id);
        }
        if let Some(id) = self.pointer.take() {
            self.window.remove_pointer_listener(id);
        }
        if let Some(s) = self.surface.take() {
            s.remove();
        }
    }
}

impl Drop for SketchInstance {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/sketch.rs"]
mod tests;
