//! Onegin sort
//!
//! Sorts the lines of a text by their letters alone: punctuation, digits and
//! spaces are skipped and case is ignored. Lines can be compared from their
//! first letter or from their last (rhyme order), and sorted either with a
//! binary search tree or with an in-place comparison sort.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod error;
pub mod config;

pub mod compare;
pub mod line;
pub mod tree_sort;
pub mod core_sort;

// Re-export commonly used types
pub use compare::{compare_alphabetic, Direction};
pub use config::{Algorithm, OutputFilter, SortConfig};
pub use core_sort::{OneginSort, SortOutcome};
pub use error::{OneginError, OneginResult};
pub use line::Line;
pub use tree_sort::OrderedIndex;

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const SORT_FAILURE: i32 = 2;

/// Run one sort as described by `config` and return the process exit code
pub fn sort(config: &SortConfig) -> OneginResult<i32> {
    config.validate()?;
    OneginSort::new(config.clone()).run()?;
    Ok(EXIT_SUCCESS)
}
