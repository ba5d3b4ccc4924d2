//! Data model: names, symbols, terms and formulas.

pub type Ref<T> = std::rc::Rc<T>;

pub use crate::error::{Error, Result};

pub mod formula;
pub mod name;
pub mod subst;
pub mod symbol;
pub mod term;

pub use formula::{Connective, Formula, FormulaView, Formulas, Quantifier};
pub use name::{QualifiedName, RStr, VarSet, Variable};
pub use subst::Subst;
pub use symbol::{Constant, Function, Predicate};
pub use term::{Term, TermView, Terms};
pub use FormulaView::*;
pub use TermView::*;
