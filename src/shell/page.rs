use std::fmt;

use crate::artwork::ArtworkMeta;
use crate::registry::Registry;
use crate::shell::route::href_for;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct NavLink {
    pub title: String,
    pub href: String,
    pub active: bool,
}

/// The view the shell shows after a navigation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Page {
    /// Every registry entry as a link, in registry order.
    Home { links: Vec<NavLink> },
    /// A mounted artwork. Exactly one of `links` is active.
    Detail {
        title: String,
        description: String,
        links: Vec<NavLink>,
    },
    NotFound { location: String, home: NavLink },
}

pub(crate) fn nav_links(registry: &Registry, active: Option<&str>) -> Vec<NavLink> {
    registry
        .artworks()
        .map(|a| NavLink {
            title: a.meta().title.clone(),
            href: href_for(a.slug()),
            active: Some(a.slug()) == active,
        })
        .collect()
}

impl Page {
    pub(crate) fn home(registry: &Registry) -> Self {
        Self::Home {
            links: nav_links(registry, None),
        }
    }

    pub(crate) fn detail(registry: &Registry, meta: &ArtworkMeta) -> Self {
        Self::Detail {
            title: meta.title.clone(),
            description: meta.description.clone(),
            links: nav_links(registry, Some(&meta.slug)),
        }
    }

    pub(crate) fn not_found(location: &str) -> Self {
        Self::NotFound {
            location: location.to_owned(),
            home: NavLink {
                title: "Back to the gallery".to_owned(),
                href: "/".to_owned(),
                active: false,
            },
        }
    }

    pub fn links(&self) -> &[NavLink] {
        match self {
            Self::Home { links } | Self::Detail { links, .. } => links,
            Self::NotFound { home, .. } => std::slice::from_ref(home),
        }
    }
}

fn write_links(f: &mut fmt::Formatter<'_>, links: &[NavLink]) -> fmt::Result {
    for l in links {
        let marker = if l.active { '*' } else { '-' };
        writeln!(f, "  {marker} {} ({})", l.title, l.href)?;
    }
    Ok(())
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home { links } => {
                writeln!(f, "Nocturne Gallery")?;
                write_links(f, links)
            }
            Self::Detail {
                title,
                description,
                links,
            } => {
                writeln!(f, "{title}")?;
                writeln!(f, "{description}")?;
                write_links(f, links)
            }
            Self::NotFound { location, home } => {
                writeln!(f, "Not found: {location}")?;
                write_links(f, std::slice::from_ref(home))
            }
        }
    }
}
