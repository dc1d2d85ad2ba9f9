/// Where a location points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Artwork(String),
}

/// Parse a path-style location such as `/`, `/particle` or `/particle/?x=1#top`.
///
/// Query and fragment are ignored, as are leading and trailing slashes. Only the first path
/// segment selects the artwork. Never fails; whether the slug exists is the registry's call.
pub fn parse_route(location: &str) -> Route {
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('/');
    match path.split('/').next() {
        Some(slug) if !slug.is_empty() => Route::Artwork(slug.to_owned()),
        _ => Route::Home,
    }
}

/// Location of an artwork's detail page.
pub fn href_for(slug: &str) -> String {
    format!("/{slug}")
}
