//! # ETL Transform Crate
//!
//! Turns the per-file datasets into one consolidated dataset.
//!
//! ## Guarantees
//!
//! - The output holds the union of all input columns, in first-seen order.
//!   Rows from inputs lacking a column get nulls in it.
//! - The output row count is the sum of the input row counts.
//! - The result is deterministic for a given input order.
//! - An empty input sequence produces an empty dataset, not an error.
//! - The input sequence is consumed once and abandoned at the first error.
//!
//! Normalization after concatenation is a pluggable [`Normalizer`] policy.

// Declare the modules that constitute this crate.
pub mod combine;
pub mod error;
pub mod normalize;

// Re-export the key components to create a clean, public-facing API.
pub use combine::{concat_frames, transform_data};
pub use error::TransformError;
pub use normalize::{Normalizer, Passthrough, TrimStrings, normalizer_for};
