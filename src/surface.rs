//! Drawing surfaces attached to a [`Container`], rasterized with `vello_cpu`.
//!
//! A surface keeps two sizes: the logical size (viewport units, what drawing commands use) and
//! the backing store (`logical * device_pixel_ratio`, what gets rasterized). [`Painter`] applies
//! the device pixel ratio as a base transform so callers never see physical pixels.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Shape;

use crate::foundation::core::{Affine, Color, FrameRGBA, Point, Rect, Vec2, Viewport};
use crate::foundation::error::{NocturneError, NocturneResult};
use crate::window::Window;
use crate::window::container::{Container, NodeId, WeakContainer};

/// Class every artwork surface is tagged with.
pub const ARTWORK_CLASS: &str = "artwork";

const PATH_TOLERANCE: f64 = 0.1;
const GLOW_RINGS: usize = 12;

struct Surface {
    container: WeakContainer,
    node: Option<NodeId>,
    viewport: Viewport,
    pixmap: vello_cpu::Pixmap,
}

/// Shared handle to a surface. Clones refer to the same surface.
#[derive(Clone)]
pub struct SurfaceHandle {
    inner: Rc<RefCell<Surface>>,
}

fn backing_dims(viewport: Viewport) -> NocturneResult<(u16, u16)> {
    let (w, h) = viewport.physical_size();
    if w == 0 || h == 0 {
        return Err(NocturneError::surface(format!(
            "cannot obtain a drawing context for an empty {w}x{h} backing store"
        )));
    }
    let w: u16 = w.try_into().map_err(|_| {
        NocturneError::surface(format!("backing store width exceeds u16: {w}"))
    })?;
    let h: u16 = h.try_into().map_err(|_| {
        NocturneError::surface(format!("backing store height exceeds u16: {h}"))
    })?;
    Ok((w, h))
}

impl SurfaceHandle {
    /// Create a surface sized to the window's current viewport and append it to `container`.
    pub fn create(window: &Window, container: &Container) -> NocturneResult<Self> {
        let viewport = window.viewport();
        let (w, h) = backing_dims(viewport)?;
        let handle = Self {
            inner: Rc::new(RefCell::new(Surface {
                container: container.downgrade(),
                node: None,
                viewport,
                pixmap: vello_cpu::Pixmap::new(w, h),
            })),
        };
        let node = container.append(ARTWORK_CLASS, handle.clone());
        handle.inner.borrow_mut().node = Some(node);
        Ok(handle)
    }

    /// Logical viewport the surface is currently laid out for.
    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    /// Backing-store size in physical pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let s = self.inner.borrow();
        (u32::from(s.pixmap.width()), u32::from(s.pixmap.height()))
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().node.is_some()
    }

    /// Re-fit the backing store to `viewport`. Returns whether the backing store changed.
    ///
    /// Calling this again with the same viewport is a no-op.
    pub fn resize(&self, viewport: Viewport) -> NocturneResult<bool> {
        let (w, h) = backing_dims(viewport)?;
        let mut s = self.inner.borrow_mut();
        s.viewport = viewport;
        if s.pixmap.width() == w && s.pixmap.height() == h {
            return Ok(false);
        }
        s.pixmap = vello_cpu::Pixmap::new(w, h);
        Ok(true)
    }

    /// Detach from the container. Returns `false` if the surface was already removed.
    pub fn remove(&self) -> bool {
        let (node, container) = {
            let mut s = self.inner.borrow_mut();
            (s.node.take(), s.container.upgrade())
        };
        match (node, container) {
            (Some(id), Some(container)) => container.remove(id),
            (Some(_), None) => true,
            (None, _) => {
                tracing::warn!("surface removed twice");
                false
            }
        }
    }

    /// Run one drawing pass. `f` must not touch this same surface handle.
    pub fn paint(&self, f: impl FnOnce(&mut Painter<'_>)) {
        let mut guard = self.inner.borrow_mut();
        let Surface {
            viewport, pixmap, ..
        } = &mut *guard;
        let mut ctx = vello_cpu::RenderContext::new(pixmap.width(), pixmap.height());
        {
            let mut painter = Painter::new(&mut ctx, *viewport);
            f(&mut painter);
        }
        ctx.flush();
        ctx.render_to_pixmap(pixmap);
    }

    /// Copy the backing store out.
    pub fn snapshot(&self) -> FrameRGBA {
        let s = self.inner.borrow();
        FrameRGBA {
            width: u32::from(s.pixmap.width()),
            height: u32::from(s.pixmap.height()),
            data: s.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

/// Immediate-mode drawing in logical units.
pub struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    viewport: Viewport,
    base: Affine,
    current: Affine,
    stack: Vec<Affine>,
}

impl<'a> Painter<'a> {
    fn new(ctx: &'a mut vello_cpu::RenderContext, viewport: Viewport) -> Self {
        Self {
            ctx,
            viewport,
            base: Affine::scale(viewport.device_pixel_ratio),
            current: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.viewport.width
    }

    pub fn height(&self) -> f64 {
        self.viewport.height
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    pub fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.current = t;
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.current *= Affine::translate(offset);
    }

    pub fn rotate(&mut self, radians: f64) {
        self.current *= Affine::rotate(radians);
    }

    /// Fill the whole logical viewport, ignoring the current transform.
    pub fn clear(&mut self, color: Color) {
        let saved = self.current;
        self.current = Affine::IDENTITY;
        self.fill_rect(self.viewport.bounds(), color);
        self.current = saved;
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_shape(&rect, color);
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        self.fill_shape(&kurbo::Circle::new(center, radius), color);
    }

    pub fn fill_ellipse(&mut self, center: Point, radii: Vec2, rotation: f64, color: Color) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        self.fill_shape(&kurbo::Ellipse::new(center, radii, rotation), color);
    }

    pub fn stroke_ellipse(
        &mut self,
        center: Point,
        radii: Vec2,
        rotation: f64,
        width: f64,
        color: Color,
    ) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        self.stroke_shape(&kurbo::Ellipse::new(center, radii, rotation), width, color);
    }

    /// Stroke a circular arc starting at `start` radians and sweeping `sweep` radians.
    pub fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        start: f64,
        sweep: f64,
        width: f64,
        color: Color,
    ) {
        if radius <= 0.0 {
            return;
        }
        let arc = kurbo::Arc::new(center, Vec2::new(radius, radius), start, sweep, 0.0);
        self.stroke_shape(&arc, width, color);
    }

    /// Soft radial glow from `inner` at the center to `outer` at `radius`.
    ///
    /// Approximated with concentric discs; alpha accumulates towards the center.
    pub fn fill_glow(&mut self, center: Point, radius: f64, inner: Color, outer: Color) {
        if radius <= 0.0 {
            return;
        }
        for i in 0..GLOW_RINGS {
            let t = i as f64 / GLOW_RINGS as f64;
            let r = radius * (1.0 - t);
            let c = lerp_color(outer, inner, t);
            let a = (f64::from(c.a) / 255.0) / GLOW_RINGS as f64 * 2.0;
            self.fill_circle(center, r, c.with_alpha(a));
        }
    }

    fn fill_shape(&mut self, shape: &impl Shape, color: Color) {
        let path = bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE));
        self.apply(color);
        self.ctx.fill_path(&path);
    }

    fn stroke_shape(&mut self, shape: &impl Shape, width: f64, color: Color) {
        let path = bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE));
        self.apply(color);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
    }

    fn apply(&mut self, color: Color) {
        self.ctx.set_transform(affine_to_cpu(self.base * self.current));
        self.ctx.set_paint(color_to_cpu(color));
    }
}

fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    let l = |x: u8, y: u8| -> u8 {
        (f64::from(x) + (f64::from(y) - f64::from(x)) * t.clamp(0.0, 1.0)).round() as u8
    };
    Color::rgba(l(a.r, b.r), l(a.g, b.g), l(a.b, b.b), l(a.a, b.a))
}

fn color_to_cpu(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/surface.rs"]
mod tests;
