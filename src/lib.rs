//! # Lineup
//!
//! This library splits a roster of ten ranked players into two balanced
//! five-player teams. Players are ranked by a single tier score, then
//! either dealt out in a snake draft or seated greedily in their preferred
//! roles. Looking players up and rendering the result are left to the
//! caller; this crate only defines the seams it needs from them.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod constants;
pub mod directory;
pub mod player;
pub mod queue;
pub mod role;
pub mod teams;
pub mod tier;

pub use player::compute_score;
pub use teams::balance_teams;
