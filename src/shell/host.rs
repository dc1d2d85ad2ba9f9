use crate::artwork::Detach;
use crate::foundation::error::NocturneResult;
use crate::registry::Registry;
use crate::shell::page::Page;
use crate::shell::route::{Route, parse_route};
use crate::window::{Container, Window};

/// Owns the live container and enforces one mount session at a time.
pub struct Shell {
    window: Window,
    container: Container,
    registry: Registry,
    current: Option<(String, Detach)>,
    page: Option<Page>,
}

impl Shell {
    pub fn new(window: &Window, container: &Container, registry: Registry) -> Self {
        Self {
            window: window.clone(),
            container: container.clone(),
            registry,
            current: None,
            page: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    /// The last successfully rendered page.
    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// Slug of the live mount session, if any.
    pub fn current_slug(&self) -> Option<&str> {
        self.current.as_ref().map(|(slug, _)| slug.as_str())
    }

    pub fn has_current_detach(&self) -> bool {
        self.current.is_some()
    }

    /// Show `location`.
    ///
    /// The previous session is always detached first and the container emptied, whatever the
    /// new route is. Unknown slugs render [`Page::NotFound`] and are not errors. A failing
    /// `mount` propagates its error and leaves no session behind.
    #[tracing::instrument(skip(self))]
    pub fn navigate(&mut self, location: &str) -> NocturneResult<&Page> {
        self.detach_current();
        let cleared = self.container.clear();
        if cleared > 0 {
            tracing::debug!(cleared, "removed stray container children");
        }
        self.page = None;

        let page = match parse_route(location) {
            Route::Home => Page::home(&self.registry),
            Route::Artwork(slug) => match self.registry.get_by_slug(&slug) {
                Some(artwork) => {
                    let detach = artwork.mount(&self.window, &self.container)?;
                    self.current = Some((slug, detach));
                    Page::detail(&self.registry, artwork.meta())
                }
                None => {
                    tracing::debug!(slug = %slug, "no artwork for slug");
                    Page::not_found(location)
                }
            },
        };
        let page: &Page = self.page.insert(page);
        Ok(page)
    }

    /// Detach the live session, if any.
    pub fn shutdown(&mut self) {
        self.detach_current();
        self.page = None;
    }

    fn detach_current(&mut self) {
        if let Some((slug, detach)) = self.current.take() {
            tracing::debug!(slug = %slug, "detaching previous artwork");
            detach.detach();
        }
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.detach_current();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shell/host.rs"]
mod tests;
