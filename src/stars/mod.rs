//! The standalone star map: a character grid with stars overlaid, and a small row store that
//! persists the star list between runs.

pub mod grid;
pub mod store;

pub use grid::{GridOrigin, Star, StarGrid, pg_constellation};
pub use store::{JsonRowStore, MemoryRowStore, RowStore, seed_if_empty};
