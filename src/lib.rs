//! Nocturne is a small gallery of generative-art sketches.
//!
//! Artworks are registered in a [`Registry`], selected by slug through the [`Shell`], mounted
//! onto a drawing surface inside a [`Container`], animated from a headless [`Window`] event loop,
//! and detached without leaving frame callbacks, timers or listeners behind.
//!
//! - [`Artwork::mount`] returns a [`Detach`] that tears the whole session down synchronously.
//! - Library-backed artworks share one lazily loaded [`SketchRuntime`] through a
//!   [`LibraryLoader`].
//! - [`RenderSession`] drives everything offline and hands frames to a [`FrameSink`].
#![forbid(unsafe_code)]

pub mod artwork;
pub mod artworks;
mod foundation;
pub mod frame_loop;
pub mod palette;
pub mod registry;
pub mod runtime;
pub mod session;
pub mod shell;
pub mod stars;
pub mod surface;
pub mod window;

pub use crate::foundation::core::{Affine, Color, FrameRGBA, Point, Rect, Vec2, Viewport};
pub use crate::foundation::error::{NocturneError, NocturneResult};
pub use crate::foundation::math::Rng64;

pub use crate::artwork::{Artwork, ArtworkMeta, Detach};
pub use crate::frame_loop::FrameLoop;
pub use crate::palette::{Palette, palette_count, pick_palette};
pub use crate::registry::Registry;
pub use crate::runtime::{
    BundledScriptHost, LibraryLoader, LoaderOpts, ScriptBehavior, ScriptHost, SketchRuntime,
};
pub use crate::session::{FrameSink, InMemorySink, PngDirSink, RenderOpts, RenderSession};
pub use crate::shell::{Page, Route, Shell, parse_route};
pub use crate::stars::{JsonRowStore, MemoryRowStore, RowStore, Star, StarGrid};
pub use crate::surface::SurfaceHandle;
pub use crate::window::{Container, FrameTime, PointerEvent, PointerKind, Window};
