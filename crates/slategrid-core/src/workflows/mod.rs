//! # Workflows Module
//!
//! High-level entry points that tie the engine together for a caller such as a UI or
//! the command-line interface.
//!
//! ## Overview
//!
//! Workflows never hold state of their own. They read from or write to a
//! [`PlacementSession`](crate::engine::session::PlacementSession) and hand back plain
//! result values for display.
//!
//! ## Architecture
//!
//! - **Evaluation** ([`evaluate`]) - Recomputes buffs and the normalized score of a
//!   session, with per-slot annotations.
//! - **Optimizer Exchange** ([`optimize`]) - Builds the request for an external optimizer
//!   and applies its returned board atomically.

pub mod evaluate;
pub mod optimize;
