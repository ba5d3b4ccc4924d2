//! # Algorithms on formulas
//!
//! Alpha-equivalence, and the regular form used to deduplicate formulas.

pub mod ident;
pub mod regular;

pub use ident::{list_equals, list_equals_no_order};
pub use regular::{compare_formulas, compare_terms};
