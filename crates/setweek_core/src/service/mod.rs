//! Weekly lifecycle services.
//!
//! # Responsibility
//! - Decide whether persisted state continues or resets (`lifecycle`).
//! - Own the dataset and keep storage in sync with it (`tracker`).

pub mod lifecycle;
pub mod tracker;
