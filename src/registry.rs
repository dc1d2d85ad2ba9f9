use std::collections::BTreeSet;
use std::rc::Rc;

use crate::artwork::Artwork;
use crate::artworks::{AuroraPulse, Constellation, ParticleField, SolarSystem};
use crate::foundation::error::{NocturneError, NocturneResult};
use crate::runtime::loader::LibraryLoader;

/// Ordered set of artworks. Order is display and navigation order.
pub struct Registry {
    artworks: Vec<Box<dyn Artwork>>,
}

fn validate_slug(slug: &str) -> NocturneResult<()> {
    if slug.is_empty() {
        return Err(NocturneError::validation("artwork slug must not be empty"));
    }
    if let Some(c) = slug
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(NocturneError::validation(format!(
            "artwork slug {slug:?} contains {c:?}; only [a-z0-9-] is allowed"
        )));
    }
    Ok(())
}

impl Registry {
    /// Fails on an empty, non-URL-safe, or duplicate slug.
    pub fn new(artworks: Vec<Box<dyn Artwork>>) -> NocturneResult<Self> {
        let mut seen = BTreeSet::new();
        for a in &artworks {
            let slug = a.slug();
            validate_slug(slug)?;
            if !seen.insert(slug.to_owned()) {
                return Err(NocturneError::validation(format!(
                    "duplicate artwork slug {slug:?}"
                )));
            }
        }
        Ok(Self { artworks })
    }

    /// particle, aurora-pulse, solar-system, constellation.
    pub fn builtin(loader: Rc<LibraryLoader>) -> NocturneResult<Self> {
        Self::new(vec![
            Box::new(ParticleField::new()),
            Box::new(AuroraPulse::new(loader)),
            Box::new(SolarSystem::new()),
            Box::new(Constellation::new()),
        ])
    }

    pub fn artworks(&self) -> impl ExactSizeIterator<Item = &dyn Artwork> {
        self.artworks.iter().map(|a| &**a)
    }

    pub fn first(&self) -> Option<&dyn Artwork> {
        self.artworks.first().map(|a| &**a)
    }

    pub fn len(&self) -> usize {
        self.artworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artworks.is_empty()
    }

    /// First artwork whose slug equals `slug`. Case-sensitive.
    pub fn get_by_slug(&self, slug: &str) -> Option<&dyn Artwork> {
        self.artworks().find(|a| a.slug() == slug)
    }
}
