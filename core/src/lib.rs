//! # Symbolic first order logic.
//!
//! This library represents formulas of first order logic as immutable,
//! shared trees, and searches for proofs by rewriting.
//!
//! It contains:
//! - the data model for terms and formulas, alpha-equivalence and a
//!   canonical "regular form" used for deduplication (in `kernel` and `algo`)
//! - pattern matching modulo associativity and commutativity of `∧`/`∨`,
//!   with parametrized formula references (in `matcher`)
//! - rewrite rules, the logic rule catalogue and a bounded proof search
//!   (in `rule`)
//! - structures declaring symbols and rules, and proof sessions with
//!   nested assumptions (in `structure` and `system`)

// unsafe needs to be visible
#![deny(unsafe_code)]

pub mod algo;
pub mod config;
pub mod context;
pub mod error;
pub mod kernel;
pub mod matcher;
pub mod rule;
pub mod structure;
pub mod system;

pub use fnv::{FnvHashMap, FnvHashSet};

pub use algo::{compare_formulas, compare_terms};
pub use config::Config;
pub use context::{Context, ContextKind, FormulaContext};
pub use error::{Error, Result};
pub use kernel::FormulaView::*;
pub use kernel::TermView::*;
pub use kernel::{
    Connective, Constant, Formula, FormulaView, Function, Predicate, QualifiedName, Quantifier, Ref, Subst,
    Term, TermView, Variable,
};
pub use matcher::{FormulaMatcher, MatchResult, Matcher, TermMatcher};
pub use rule::{Deduction, DeductionNode, LogicRule, LogicSearch, MatcherEquivRule, MatcherRule, Rule, Toward};
pub use structure::Structure;
pub use system::System;

pub(crate) mod macros {
    #[allow(unused_macros)]
    #[macro_export]
    macro_rules! ignore{
        () => { () };
        ($t :expr) => {{
            #[allow(unused_value)]
            let _ = $t;
        } };
        ($t0: expr, $($t:expr),*) => {{
            #[allow(unused_value)]
            let _ = $t0;
            crate::ignore!($($t),*)
        }}
    }

    #[macro_export]
    macro_rules! logtrace{
        ($($t:expr),*) => {{
            {
                #[cfg(feature="logging")]
                log::trace!($($t),*)
            }

            {
                #[cfg(not(feature="logging"))]
                crate::ignore!($($t),*)
            }
        }}
    }

    #[macro_export]
    macro_rules! logdebug{
        ($($t:expr),*) => {{
            {
                #[cfg(feature="logging")]
                log::debug!($($t),*)
            }

            {
                #[cfg(not(feature="logging"))]
                crate::ignore!($($t),*)
            }
        }}
    }
}
