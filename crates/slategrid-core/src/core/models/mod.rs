//! # Core Models Module
//!
//! The data model of a placement: what items exist, which copies are owned, and where the
//! placed copies sit on the grid.
//!
//! ## Key Components
//!
//! - [`item`] - Immutable item definitions (artifacts and slates), rarities, rotations,
//!   buff patterns and placement conditions
//! - [`catalog`] - The id-keyed catalog built once from the parsed item collections
//! - [`instance`] - Placed item instances and the cell specs used to create them
//! - [`grid`] - The fixed-width slot grid and its coordinate arithmetic
//! - [`stock`] - The owned-but-unplaced item pool
//! - [`ids`] - Stable identifiers for placed instances
//!
//! ## Usage
//!
//! ```ignore
//! use slategrid::core::models::{catalog::{Catalog, RawCatalog}, grid::PlacementGrid};
//!
//! let catalog = Catalog::from_raw(serde_json::from_str::<RawCatalog>(json)?)?;
//! let grid = PlacementGrid::new(6, 24);
//! assert_eq!(grid.height(), 4);
//! ```

pub mod catalog;
pub mod grid;
pub mod ids;
pub mod instance;
pub mod item;
pub mod stock;
