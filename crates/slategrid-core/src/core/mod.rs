//! # Core Module
//!
//! Stateless data structures shared by the engine and the workflows.
//!
//! - **Item Models** ([`models`]) - Item definitions, the catalog, placed instances, the grid
//!   and the unplaced stock pool
//! - **Lookup Tables** ([`tables`]) - Fixed rarity weights and well-known effect tags

pub mod models;
pub mod tables;
