//! # slategrid Core Library
//!
//! A grid buff-propagation and scoring engine for artifact and slate placements on a
//! fixed-width inventory grid.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so each concern can be tested on its own.
//!
//! - **[`core`]: The Foundation.** Immutable item definitions, the id-keyed [`Catalog`],
//!   placed item instances, the slot grid and the unplaced stock pool. No behaviour beyond
//!   bookkeeping lives here.
//!
//! - **[`engine`]: The Logic Core.** The stateful [`PlacementSession`] with its mutation
//!   primitives, the buff propagation pass that derives a [`BuffMap`] from the grid, and the
//!   eligibility and scoring rules that turn a grid into a single normalized score.
//!
//! - **[`workflows`]: The Public API.** High-level entry points that tie the engine together:
//!   evaluating a session for display, and exchanging placements with an external optimizer.
//!
//! [`Catalog`]: core::models::catalog::Catalog
//! [`PlacementSession`]: engine::session::PlacementSession
//! [`BuffMap`]: engine::buffs::BuffMap

pub mod core;
pub mod engine;
pub mod workflows;
