use super::*;
use crate::artwork::{Artwork, ArtworkMeta};
use crate::foundation::core::Viewport;
use crate::foundation::error::NocturneError;
use crate::surface::SurfaceHandle;
use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

/// Records mount/detach order and really attaches a surface.
struct Recording {
    meta: ArtworkMeta,
    log: Log,
    fail: bool,
}

impl Artwork for Recording {
    fn meta(&self) -> &ArtworkMeta {
        &self.meta
    }

    fn mount(&self, window: &Window, container: &Container) -> NocturneResult<Detach> {
        if self.fail {
            return Err(NocturneError::surface("no context"));
        }
        let live = self
            .log
            .borrow()
            .iter()
            .filter(|e| e.starts_with("mount"))
            .count()
            - self
                .log
                .borrow()
                .iter()
                .filter(|e| e.starts_with("detach"))
                .count();
        assert_eq!(live, 0, "mounted while another session was live");
        assert!(container.is_empty(), "container not cleared before mount");

        let surface = SurfaceHandle::create(window, container)?;
        self.log.borrow_mut().push(format!("mount {}", self.meta.slug));
        let log = Rc::clone(&self.log);
        let slug = self.meta.slug.clone();
        Ok(Detach::new(move || {
            surface.remove();
            log.borrow_mut().push(format!("detach {slug}"));
        }))
    }
}

fn shell_with(slugs: &[(&str, bool)]) -> (Shell, Log) {
    let log: Log = Rc::default();
    let artworks: Vec<Box<dyn Artwork>> = slugs
        .iter()
        .map(|&(slug, fail)| {
            Box::new(Recording {
                meta: ArtworkMeta::new(slug.to_uppercase(), slug, format!("about {slug}")),
                log: Rc::clone(&log),
                fail,
            }) as Box<dyn Artwork>
        })
        .collect();
    let w = Window::with_unix_origin(Viewport::new(32.0, 32.0, 1.0).unwrap(), 0.0);
    let c = Container::new("artwork-root");
    let shell = Shell::new(&w, &c, Registry::new(artworks).unwrap());
    (shell, log)
}

#[test]
fn navigation_detaches_before_mounting() {
    let (mut shell, log) = shell_with(&[("a", false), ("b", false)]);

    shell.navigate("/a").unwrap();
    shell.navigate("/b").unwrap();
    shell.navigate("/a").unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["mount a", "detach a", "mount b", "detach b", "mount a"]
    );
    assert_eq!(shell.container().child_count(), 1);
    assert_eq!(shell.current_slug(), Some("a"));
}

#[test]
fn detail_page_marks_active_link() {
    let (mut shell, _log) = shell_with(&[("a", false), ("b", false)]);
    let page = shell.navigate("/b").unwrap().clone();
    match &page {
        Page::Detail {
            title,
            description,
            links,
        } => {
            assert_eq!(title, "B");
            assert_eq!(description, "about b");
            let active: Vec<&str> = links
                .iter()
                .filter(|l| l.active)
                .map(|l| l.href.as_str())
                .collect();
            assert_eq!(active, vec!["/b"]);
        }
        other => panic!("expected detail page, got {other:?}"),
    }
    let text = page.to_string();
    assert!(text.starts_with("B\nabout b\n"), "{text}");
    assert!(text.contains("* B (/b)"), "{text}");
}

#[test]
fn unknown_slug_shows_not_found_without_session() {
    let (mut shell, log) = shell_with(&[("a", false)]);
    shell.navigate("/a").unwrap();

    let page = shell.navigate("/nonexistent").unwrap();
    assert!(matches!(page, Page::NotFound { .. }));
    assert!(page.to_string().contains("(/)"));
    assert!(!shell.has_current_detach());
    assert!(shell.container().is_empty());
    assert_eq!(*log.borrow(), vec!["mount a", "detach a"]);
}

#[test]
fn home_lists_registry_in_order_and_detaches() {
    let (mut shell, log) = shell_with(&[("a", false), ("b", false), ("c", false)]);
    shell.navigate("/c").unwrap();

    let page = shell.navigate("/").unwrap();
    let hrefs: Vec<&str> = page.links().iter().map(|l| l.href.as_str()).collect();
    assert_eq!(hrefs, vec!["/a", "/b", "/c"]);
    assert!(page.links().iter().all(|l| !l.active));
    assert!(!shell.has_current_detach());
    assert_eq!(log.borrow().last().map(String::as_str), Some("detach c"));
}

#[test]
fn mount_failure_propagates_and_leaves_no_session() {
    let (mut shell, log) = shell_with(&[("a", false), ("broken", true)]);
    shell.navigate("/a").unwrap();

    let err = shell.navigate("/broken").unwrap_err();
    assert!(err.to_string().starts_with("surface error:"), "{err}");
    assert!(!shell.has_current_detach());
    assert!(shell.page().is_none());
    assert!(shell.container().is_empty());
    assert_eq!(*log.borrow(), vec!["mount a", "detach a"]);
}

#[test]
fn shutdown_and_drop_detach_the_live_session() {
    let (mut shell, log) = shell_with(&[("a", false)]);
    shell.navigate("/a").unwrap();
    shell.shutdown();
    assert_eq!(*log.borrow(), vec!["mount a", "detach a"]);

    shell.navigate("/a").unwrap();
    drop(shell);
    assert_eq!(log.borrow().len(), 4);
}
