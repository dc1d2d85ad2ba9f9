//! Built-in artworks.
//!
//! Canvas-direct artworks implement [`Scene`] and are mounted through [`mount_scene`], which owns
//! the session plumbing (surface, resize listener, frame loop, teardown order). Library-backed
//! artworks go through the sketch runtime instead.

pub mod aurora_pulse;
pub mod constellation;
pub mod particle;
pub mod solar_system;

use crate::artwork::Detach;
use crate::foundation::core::Viewport;
use crate::foundation::error::NocturneResult;
use crate::frame_loop::FrameLoop;
use crate::surface::{Painter, SurfaceHandle};
use crate::window::{Container, FrameTime, Window};

use std::cell::RefCell;
use std::rc::Rc;

pub use aurora_pulse::AuroraPulse;
pub use constellation::Constellation;
pub use particle::ParticleField;
pub use solar_system::SolarSystem;

/// Per-session state of a canvas-direct artwork.
pub(crate) trait Scene {
    /// Called after the surface has been re-fitted to a new viewport.
    fn resized(&mut self, _viewport: Viewport) {}

    /// Repaint, advance, draw. One call per animation frame.
    fn frame(&mut self, painter: &mut Painter<'_>, t: FrameTime);
}

/// Mount `scene` on a fresh surface in `container`.
///
/// The returned [`Detach`] cancels the loop, removes the resize listener and removes the surface,
/// in that order.
pub(crate) fn mount_scene(
    slug: &str,
    window: &Window,
    container: &Container,
    scene: impl Scene + 'static,
) -> NocturneResult<Detach> {
    let surface = SurfaceHandle::create(window, container)?;
    let scene = Rc::new(RefCell::new(scene));

    let resize = {
        let surface = surface.clone();
        let scene = Rc::clone(&scene);
        window.add_resize_listener(move |vp| match surface.resize(vp) {
            Ok(_) => scene.borrow_mut().resized(vp),
            Err(e) => tracing::warn!(error = %e, "surface kept its previous size"),
        })
    };

    let frame_loop = {
        let surface = surface.clone();
        let scene = Rc::clone(&scene);
        FrameLoop::start(window, move |t| {
            let mut scene = scene.borrow_mut();
            surface.paint(|painter| scene.frame(painter, t));
        })
    };

    tracing::debug!(slug, "artwork mounted");
    let slug = slug.to_owned();
    let window = window.clone();
    Ok(Detach::new(move || {
        frame_loop.cancel();
        window.remove_resize_listener(resize);
        surface.remove();
        tracing::debug!(slug = %slug, "artwork detached");
    }))
}
