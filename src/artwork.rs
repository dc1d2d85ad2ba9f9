//! The artwork contract: metadata plus `mount`, which attaches a live, animating surface to a
//! container and hands back a [`Detach`] that undoes all of it.

use std::fmt;

use crate::foundation::error::NocturneResult;
use crate::window::{Container, Window};

/// Title, slug and description of an artwork. Identity is the slug.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ArtworkMeta {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl ArtworkMeta {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            description: description.into(),
        }
    }
}

/// A self-contained animated visual.
///
/// `mount` must:
/// - create exactly one surface as a child of `container`,
/// - register exactly one resize listener on `window`,
/// - start exactly one animation loop (directly, or through the sketch runtime),
///
/// and return a [`Detach`] that stops the loop, removes the listeners and removes the surface,
/// synchronously. `mount` may be called again once a previous [`Detach`] has run.
pub trait Artwork {
    fn meta(&self) -> &ArtworkMeta;

    fn mount(&self, window: &Window, container: &Container) -> NocturneResult<Detach>;

    fn slug(&self) -> &str {
        &self.meta().slug
    }
}

/// Teardown for one mount session.
///
/// Consumed by [`Detach::detach`], so it cannot run twice. Dropping a `Detach` that was never
/// invoked runs it as well.
#[must_use = "dropping a Detach tears the mount session down immediately"]
pub struct Detach {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Detach {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    pub fn detach(mut self) {
        if let Some(f) = self.teardown.take() {
            f();
        }
    }
}

impl Drop for Detach {
    fn drop(&mut self) {
        if let Some(f) = self.teardown.take() {
            f();
        }
    }
}

impl fmt::Debug for Detach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detach")
            .field("pending", &self.teardown.is_some())
            .finish()
    }
}
