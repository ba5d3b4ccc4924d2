//! # Match results
//!
//! A match result is a partial substitution: pattern references bound to
//! formulas, and term references bound to terms.

use crate::{
    errorstr,
    kernel::{Formula, RStr, Subst, Term, VarSet, Variable},
    Result,
};
use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::fmt;

/// A formula bound to a pattern reference.
///
/// `params` are the variables of `formula` that stand for the arguments
/// of a parametrized reference `φ(x, y)`. They are empty for a plain `P`.
#[derive(Clone, Debug)]
pub struct RefFormula {
    pub formula: Formula,
    pub params: SmallVec<[Variable; 2]>,
}

/// Result of a successful match.
#[derive(Clone, Default)]
pub struct MatchResult {
    formulas: FnvHashMap<RStr, RefFormula>,
    terms: FnvHashMap<RStr, Term>,
}

impl RefFormula {
    pub fn new(formula: Formula) -> Self {
        RefFormula {
            formula,
            params: SmallVec::new(),
        }
    }

    pub fn with_params<I>(formula: Formula, params: I) -> Self
    where
        I: IntoIterator<Item = Variable>,
    {
        RefFormula {
            formula,
            params: params.into_iter().collect(),
        }
    }

    /// Instantiate the parameters with `args`.
    pub fn build(&self, args: &[Term]) -> Result<Formula> {
        if args.len() != self.params.len() {
            return Err(errorstr!(
                "reference `{}` expects {} arguments, got {}",
                self.formula,
                self.params.len(),
                args.len()
            ));
        }
        let s: Subst = self
            .params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect();
        Ok(self.formula.replace_var(&s))
    }
}

impl MatchResult {
    /// Empty result.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty() && self.terms.is_empty()
    }

    #[inline]
    pub fn formula_ref(&self, name: &str) -> Option<&RefFormula> {
        self.formulas.get(name)
    }

    #[inline]
    pub fn term_ref(&self, name: &str) -> Option<&Term> {
        self.terms.get(name)
    }

    pub fn bind_formula(&mut self, name: RStr, r: RefFormula) {
        self.formulas.insert(name, r);
    }

    pub fn bind_term(&mut self, name: RStr, t: Term) {
        self.terms.insert(name, t);
    }

    pub fn unbind_term(&mut self, name: &str) -> Option<Term> {
        self.terms.remove(name)
    }

    /// The formula bound to `name`.
    pub fn get(&self, name: &str) -> Result<Formula> {
        self.opt(name)
            .ok_or_else(|| errorstr!("unbound formula reference `{}`", name))
    }

    /// The formula bound to `name`, if any.
    pub fn opt(&self, name: &str) -> Option<Formula> {
        self.formulas.get(name).map(|r| r.formula.clone())
    }

    /// The term bound to `name`.
    pub fn term(&self, name: &str) -> Result<Term> {
        self.terms
            .get(name)
            .cloned()
            .ok_or_else(|| errorstr!("unbound term reference `{}`", name))
    }

    /// `φ(args)` for the parametrized reference `φ` bound to `name`.
    pub fn apply(&self, name: &str, args: &[Term]) -> Result<Formula> {
        match self.formulas.get(name) {
            Some(r) => r.build(args),
            None => Err(errorstr!("unbound formula reference `{}`", name)),
        }
    }

    /// All variables occurring in bound values.
    pub fn all_variables(&self) -> VarSet {
        let mut s = VarSet::new();
        for r in self.formulas.values() {
            s.extend(r.formula.all_variables().iter().cloned());
            s.extend(r.params.iter().cloned());
        }
        for t in self.terms.values() {
            s.extend(t.variables().iter().cloned());
        }
        s
    }

    /// A variable that occurs in no bound value.
    pub fn unused_var(&self) -> Variable {
        let vs = self.all_variables();
        Variable::fresh("x", |v| vs.contains(v))
    }

    pub fn term_refs(&self) -> impl Iterator<Item = (&RStr, &Term)> + '_ {
        self.terms.iter()
    }

    pub fn formula_refs(&self) -> impl Iterator<Item = (&RStr, &RefFormula)> + '_ {
        self.formulas.iter()
    }

    /// Bound formula references, sorted by name.
    pub fn formula_names(&self) -> Vec<RStr> {
        let mut v: Vec<_> = self.formulas.keys().cloned().collect();
        v.sort();
        v
    }
}

impl fmt::Debug for MatchResult {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let mut fs: Vec<_> = self.formulas.iter().collect();
        fs.sort_by(|a, b| a.0.cmp(b.0));
        let mut ts: Vec<_> = self.terms.iter().collect();
        ts.sort_by(|a, b| a.0.cmp(b.0));
        write!(out, "{{")?;
        for (n, r) in fs {
            if r.params.is_empty() {
                write!(out, " {} := {};", n, r.formula)?;
            } else {
                write!(out, " {}{:?} := {};", n, &r.params[..], r.formula)?;
            }
        }
        for (n, t) in ts {
            write!(out, " {} := {};", n, t)?;
        }
        write!(out, " }}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_strict_lookup() {
        let mut r = MatchResult::new();
        assert!(r.get("P").is_err());
        assert!(r.term("x").is_err());
        r.bind_formula("P".into(), RefFormula::new(Formula::atom("A")));
        assert_eq!(r.get("P").ok(), Some(Formula::atom("A")));
        assert_eq!(r.opt("Q"), None);
    }

    #[test]
    fn test_build() -> Result<()> {
        let x = Variable::new("x");
        let body = Formula::equal(Term::var(x.clone()), Term::var_str("y"));
        let r = RefFormula::with_params(body, vec![x]);
        let f = r.build(&[Term::var_str("z")])?;
        assert_eq!(f, Formula::equal(Term::var_str("z"), Term::var_str("y")));
        assert!(r.build(&[]).is_err());
        Ok(())
    }

    #[test]
    fn test_unused_var() {
        let mut r = MatchResult::new();
        r.bind_term("a".into(), Term::var_str("x1"));
        r.bind_formula("P".into(), RefFormula::new(Formula::equal(Term::var_str("x2"), Term::var_str("x3"))));
        assert_eq!(r.unused_var().name(), "x4");
    }
}
