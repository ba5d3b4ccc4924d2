//! # Contexts
//!
//! A `FormulaContext` is the set of formulas known at some point of a
//! proof, deduplicated by regular form. A `Context` is one frame of the
//! assumption stack of a `System`: it owns its formulas and its structure,
//! so popping it never affects the frame below.

use crate::{kernel::Formula, structure::Structure};
use std::collections::{BTreeMap, BTreeSet};

/// Known formulas, in order of addition.
#[derive(Clone, Debug, Default)]
pub struct FormulaContext {
    formulas: Vec<Formula>,
    /// Regular form ⇒ the formula as it was added.
    regular_forms: BTreeMap<Formula, Formula>,
}

impl FormulaContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_formulas<I>(fs: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        let mut ctx = Self::new();
        ctx.add_all(fs);
        ctx
    }

    /// Add `f` unless an alpha-equivalent formula is already known.
    /// Returns `true` if it was added.
    pub fn add_formula(&mut self, f: Formula) -> bool {
        let rf = f.regular_form();
        if self.regular_forms.contains_key(&rf) {
            return false;
        }
        self.regular_forms.insert(rf, f.clone());
        self.formulas.push(f);
        true
    }

    /// Add every formula, returns how many were new.
    pub fn add_all<I>(&mut self, fs: I) -> usize
    where
        I: IntoIterator<Item = Formula>,
    {
        fs.into_iter().filter(|f| self.add_formula(f.clone())).count()
    }

    #[inline]
    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    #[inline]
    pub fn regular_forms(&self) -> &BTreeMap<Formula, Formula> {
        &self.regular_forms
    }

    /// Regular forms of the known formulas.
    pub fn obtained(&self) -> BTreeSet<Formula> {
        self.regular_forms.keys().cloned().collect()
    }

    /// Is `f` known, up to regular form?
    pub fn contains(&self, f: &Formula) -> bool {
        self.regular_forms.contains_key(&f.regular_form())
    }

    /// The known formula with this regular form.
    pub fn by_regular_form(&self, rf: &Formula) -> Option<&Formula> {
        self.regular_forms.get(rf)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

/// Kind of a frame of the context stack.
#[derive(Clone, Debug)]
pub enum ContextKind {
    /// The bottom frame.
    Base,
    /// Frame opened by `assume`.
    Assumed(Vec<Formula>),
}

/// A frame of the context stack.
#[derive(Clone, Debug)]
pub struct Context {
    kind: ContextKind,
    structure: Structure,
    formulas: FormulaContext,
}

impl Context {
    /// The base frame.
    pub fn base(structure: Structure) -> Self {
        Context {
            kind: ContextKind::Base,
            structure,
            formulas: FormulaContext::new(),
        }
    }

    /// A new frame on top of `self`, knowing everything `self` knows
    /// plus `assumptions`.
    pub fn assume(&self, assumptions: Vec<Formula>) -> Self {
        let mut formulas = self.formulas.clone();
        formulas.add_all(assumptions.iter().cloned());
        Context {
            kind: ContextKind::Assumed(assumptions),
            structure: self.structure.clone(),
            formulas,
        }
    }

    pub fn kind(&self) -> &ContextKind {
        &self.kind
    }

    pub fn is_base(&self) -> bool {
        matches!(self.kind, ContextKind::Base)
    }

    /// Assumptions of this frame, empty for the base.
    pub fn assumptions(&self) -> &[Formula] {
        match &self.kind {
            ContextKind::Base => &[],
            ContextKind::Assumed(fs) => fs,
        }
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn structure_mut(&mut self) -> &mut Structure {
        &mut self.structure
    }

    pub fn formula_context(&self) -> &FormulaContext {
        &self.formulas
    }

    pub fn formula_context_mut(&mut self) -> &mut FormulaContext {
        &mut self.formulas
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kernel::{Term, Variable};

    #[test]
    fn test_dedup_by_regular_form() {
        let mut ctx = FormulaContext::new();
        let f = Formula::forall(Variable::new("x"), Formula::equal(Term::var_str("x"), Term::var_str("x")));
        let g = Formula::forall(Variable::new("y"), Formula::equal(Term::var_str("y"), Term::var_str("y")));
        assert!(ctx.add_formula(f.clone()));
        assert!(!ctx.add_formula(g.clone()));
        assert_eq!(ctx.len(), 1);
        assert!(ctx.contains(&g));
        assert_eq!(ctx.by_regular_form(&g.regular_form()), Some(&f));
    }

    #[test]
    fn test_assume_copies() {
        let mut base = Context::base(Structure::logic().unwrap());
        base.formula_context_mut().add_formula(Formula::atom("A"));
        let mut child = base.assume(vec![Formula::atom("B")]);
        child.formula_context_mut().add_formula(Formula::atom("C"));
        assert_eq!(child.formula_context().len(), 3);
        assert_eq!(base.formula_context().len(), 1);
        assert!(base.is_base());
        assert_eq!(child.assumptions(), &[Formula::atom("B")][..]);
    }
}
