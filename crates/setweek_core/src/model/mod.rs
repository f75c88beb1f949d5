//! Domain model for the weekly set tracker.
//!
//! # Responsibility
//! - Define the tracked item record and the ordered dataset that owns it.
//! - Keep every mutation of the dataset total: rejections are values.
//!
//! # Invariants
//! - Set counts are unsigned and never drop below zero.
//! - Item names are unique within a dataset, compared case-insensitively.

pub mod dataset;
pub mod item;
