//! # Engine Module
//!
//! The stateful half of slategrid: the placement session that owns a grid and its stock,
//! and the pure passes that derive buffs and scores from it.
//!
//! ## Overview
//!
//! A [`session::PlacementSession`] is the single writer of a placement. Every mutation is
//! validated, applied atomically together with its stock adjustment, returned to the caller
//! as a [`events::GridChange`] and broadcast to registered observers. Derived data is never
//! stored on the session: after each mutation the caller re-runs [`buffs::propagate`] and
//! [`scoring::Scorer`] from scratch.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Grid width, slot bounds and score normalization
//! - **Session** ([`session`]) - Mutation primitives and stock bookkeeping
//! - **Change Notification** ([`events`]) - Change values and the observer list
//! - **Buff Propagation** ([`buffs`]) - Slate projections onto neighbouring cells
//! - **Eligibility** ([`eligibility`]) - Geometric placement rules for artifacts
//! - **Scoring** ([`scoring`]) - Weighted, normalized score and per-slot annotations
//! - **Progress Reporting** ([`progress`]) - Callback sink for long-running workflows
//! - **Error Handling** ([`error`]) - Session error taxonomy

pub mod buffs;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod events;
pub mod progress;
pub mod scoring;
pub mod session;
pub(crate) mod transaction;
