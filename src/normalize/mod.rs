//! Response normalization module
//!
//! Collapses the ordered per-page values of one logical call into a single
//! value.
//!
//! # Rules
//!
//! 1. A single page is returned as is
//! 2. Pages that are all equal collapse to the first
//! 3. Array pages concatenate; object pages merge key by key, with array
//!    values concatenated and other values overwritten
//! 4. Scalar pages, or a mix of array and object pages, are left unmerged

mod merge;

pub use merge::{merge, merge_pages, merge_strict, Merged};
