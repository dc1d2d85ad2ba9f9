//! The page shell: routing, page views and the swap discipline between mount sessions.

pub mod host;
pub mod page;
pub mod route;

pub use host::Shell;
pub use page::{NavLink, Page};
pub use route::{Route, href_for, parse_route};
