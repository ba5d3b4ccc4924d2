//! # Substitutions
//!
//! A substitution maps variables to terms. Applying it to a formula only
//! touches free occurrences, and renames binders that would capture a
//! variable of the substituted terms.

use super::{
    formula::{Formula, FormulaView::*},
    name::{QualifiedName, VarSet, Variable},
    term::{Term, TermView::*},
};
use fnv::FnvHashMap;
use smallvec::{smallvec, SmallVec};

/// A substitution.
#[derive(Clone, Default)]
pub struct Subst(Bindings);

type Binding = (Variable, Term);
type Bindings = SmallVec<[Binding; 4]>;

impl Subst {
    /// Empty substitution.
    pub fn new() -> Self {
        Subst(smallvec![])
    }

    /// Substitution with one binding.
    pub fn single(v: Variable, t: Term) -> Self {
        Subst(smallvec![(v, t)])
    }

    /// Add a binding, replacing any previous binding of `v`.
    pub fn add_binding(&mut self, v: Variable, t: Term) {
        self.0.retain(|(u, _)| *u != v);
        self.0.push((v, t))
    }

    pub fn get(&self, v: &Variable) -> Option<&Term> {
        self.0.iter().find(|(u, _)| u == v).map(|(_, t)| t)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.0.iter()
    }

    /// Copy of the substitution without a binding for `v`.
    fn without(&self, v: &Variable) -> Subst {
        Subst(self.0.iter().filter(|(u, _)| u != v).cloned().collect())
    }

    /// Does any binding apply to one of these variables?
    fn touches(&self, vars: &VarSet) -> bool {
        self.0.iter().any(|(u, _)| vars.contains(u))
    }
}

impl Term {
    /// Replace variables with terms.
    pub fn replace_var(&self, s: &Subst) -> Term {
        if !s.touches(self.variables()) {
            return self.clone();
        }
        match self.view() {
            TVar(v) => s.get(v).cloned().unwrap_or_else(|| self.clone()),
            TConst(_) => self.clone(),
            TNamed(_, args) | TFun(_, args) => {
                self.with_args(args.iter().map(|a| a.replace_var(s)).collect())
            }
        }
    }

    /// Replace every occurrence of `from` with `to`.
    pub fn replace_term(&self, from: &Term, to: &Term) -> Term {
        if self == from {
            return to.clone();
        }
        match self.view() {
            TVar(_) | TConst(_) => self.clone(),
            TNamed(_, args) | TFun(_, args) => {
                self.with_args(args.iter().map(|a| a.replace_term(from, to)).collect())
            }
        }
    }

    /// Rename variables, without any check.
    pub fn rename_all_var(&self, m: &FnvHashMap<Variable, Variable>) -> Term {
        match self.view() {
            TVar(v) => match m.get(v) {
                Some(v2) => Term::var(v2.clone()),
                None => self.clone(),
            },
            TConst(_) => self.clone(),
            TNamed(_, args) | TFun(_, args) => {
                self.with_args(args.iter().map(|a| a.rename_all_var(m)).collect())
            }
        }
    }
}

impl Formula {
    /// Replace free occurrences of variables with terms, avoiding capture.
    ///
    /// A quantifier binding a variable of `s` hides that binding in its body.
    pub fn replace_var(&self, s: &Subst) -> Formula {
        if !s.touches(self.variables()) {
            return self.clone();
        }
        match self.view() {
            FPred(p, args) => Formula::pred(p.clone(), args.iter().map(|a| a.replace_var(s))),
            FNamed(n, args) => Formula::named(n.clone(), args.iter().map(|a| a.replace_var(s))),
            FForAll(..) | FExists(..) => {
                let (q, v, body) = match self.as_quantified() {
                    Some(x) => x,
                    None => return self.clone(),
                };
                let s = s.without(v);
                if !s.touches(body.variables()) {
                    return self.clone();
                }
                let captures = s
                    .iter()
                    .any(|(u, t)| body.variables().contains(u) && t.variables().contains(v));
                if captures {
                    let mut avoid = body.all_variables().clone();
                    for (u, t) in s.iter() {
                        avoid.insert(u.clone());
                        avoid.extend(t.variables().iter().cloned());
                    }
                    let w = Variable::fresh(v.name(), |x| avoid.contains(x));
                    crate::logtrace!("subst: rename binder {} to {} in {}", v, w, self);
                    let body = body.replace_var(&Subst::single(v.clone(), Term::var(w.clone())));
                    Formula::quantified(q, w, body.replace_var(&s))
                } else {
                    Formula::quantified(q, v.clone(), body.replace_var(&s))
                }
            }
            _ => self.map_children(|c| c.replace_var(s)),
        }
    }

    /// Rename free variables, avoiding capture.
    pub fn rename_var(&self, m: &[(Variable, Variable)]) -> Formula {
        let s: Subst = m.iter().map(|(u, v)| (u.clone(), Term::var(v.clone()))).collect();
        self.replace_var(&s)
    }

    /// Rename every occurrence of variables, bound or free, without any
    /// check. This does not preserve meaning in general.
    pub fn rename_all_var(&self, m: &FnvHashMap<Variable, Variable>) -> Formula {
        match self.view() {
            FPred(p, args) => Formula::pred(p.clone(), args.iter().map(|a| a.rename_all_var(m))),
            FNamed(n, args) => {
                Formula::named(n.clone(), args.iter().map(|a| a.rename_all_var(m)))
            }
            FForAll(v, b) | FExists(v, b) => {
                let q = match self.as_quantified() {
                    Some((q, _, _)) => q,
                    None => return self.clone(),
                };
                let v = m.get(v).cloned().unwrap_or_else(|| v.clone());
                Formula::quantified(q, v, b.rename_all_var(m))
            }
            _ => self.map_children(|c| c.rename_all_var(m)),
        }
    }

    /// Replace occurrences of the term `from` with `to`, except where
    /// a variable of `from` is bound.
    pub fn replace_term(&self, from: &Term, to: &Term) -> Formula {
        match self.view() {
            FPred(p, args) => {
                Formula::pred(p.clone(), args.iter().map(|a| a.replace_term(from, to)))
            }
            FNamed(n, args) => {
                Formula::named(n.clone(), args.iter().map(|a| a.replace_term(from, to)))
            }
            FForAll(v, body) | FExists(v, body) => {
                let q = match self.as_quantified() {
                    Some((q, _, _)) => q,
                    None => return self.clone(),
                };
                if from.variables().contains(v) {
                    self.clone()
                } else if to.variables().contains(v) {
                    let mut avoid = body.all_variables().clone();
                    avoid.extend(to.variables().iter().cloned());
                    avoid.extend(from.variables().iter().cloned());
                    let w = Variable::fresh(v.name(), |x| avoid.contains(x));
                    let body = body.replace_var(&Subst::single(v.clone(), Term::var(w.clone())));
                    Formula::quantified(q, w, body.replace_term(from, to))
                } else {
                    Formula::quantified(q, v.clone(), body.replace_term(from, to))
                }
            }
            _ => self.map_children(|c| c.replace_term(from, to)),
        }
    }

    /// Replace the proposition `name` (a named formula without
    /// parameters) by `by`, renaming binders that would capture a free
    /// variable of `by`.
    pub fn replace_named(&self, name: &QualifiedName, by: &Formula) -> Formula {
        match self.view() {
            FNamed(n, args) if args.is_empty() && n == name => by.clone(),
            FPred(..) | FNamed(..) => self.clone(),
            FForAll(v, body) | FExists(v, body) => {
                let q = match self.as_quantified() {
                    Some((q, _, _)) => q,
                    None => return self.clone(),
                };
                if by.variables().contains(v) {
                    let mut avoid = body.all_variables().clone();
                    avoid.extend(by.variables().iter().cloned());
                    let w = Variable::fresh(v.name(), |x| avoid.contains(x));
                    let body = body.replace_var(&Subst::single(v.clone(), Term::var(w.clone())));
                    Formula::quantified(q, w, body.replace_named(name, by))
                } else {
                    Formula::quantified(q, v.clone(), body.replace_named(name, by))
                }
            }
            _ => self.map_children(|c| c.replace_named(name, by)),
        }
    }
}

mod impls {
    use super::*;
    use std::fmt;

    impl fmt::Debug for Subst {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "(subst")?;
            for (v, t) in self.iter() {
                write!(f, " ({} := {})", v, t)?;
            }
            write!(f, ")")
        }
    }

    impl std::iter::FromIterator<(Variable, Term)> for Subst {
        fn from_iter<T: IntoIterator<Item = (Variable, Term)>>(iter: T) -> Self {
            let mut s = Subst::new();
            for (v, t) in iter {
                s.add_binding(v, t)
            }
            s
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kernel::{Constant, QualifiedName};

    fn v(s: &str) -> Variable {
        Variable::new(s)
    }
    fn t(s: &str) -> Term {
        Term::var_str(s)
    }

    #[test]
    fn test_replace_free_only() {
        // (x = y) ∧ ∀x. (x = y)
        let f = Formula::and(vec![
            Formula::equal(t("x"), t("y")),
            Formula::forall(v("x"), Formula::equal(t("x"), t("y"))),
        ]);
        let g = f.replace_var(&Subst::single(v("x"), t("z")));
        assert_eq!(format!("{}", g), "z = y ∧ (∀x. x = y)");
    }

    #[test]
    fn test_replace_avoids_capture() {
        // ∀y. (x = y)  with x := y
        let f = Formula::forall(v("y"), Formula::equal(t("x"), t("y")));
        let g = f.replace_var(&Subst::single(v("x"), t("y")));
        match g.view() {
            FForAll(w, body) => {
                assert_ne!(w.name(), "y");
                assert_eq!(*body, Formula::equal(t("y"), Term::var(w.clone())));
            }
            _ => panic!("expected a quantifier, got {}", g),
        }
    }

    #[test]
    fn test_rename_all() {
        let f = Formula::forall(v("x"), Formula::equal(t("x"), t("y")));
        let mut m = FnvHashMap::default();
        m.insert(v("x"), v("a"));
        m.insert(v("y"), v("b"));
        assert_eq!(format!("{}", f.rename_all_var(&m)), "∀a. a = b");
    }

    #[test]
    fn test_replace_term() {
        let c = Term::constant(Constant::new(QualifiedName::new("c")));
        let f = Formula::and(vec![
            Formula::equal(c.clone(), t("y")),
            Formula::exists(v("x"), Formula::equal(t("x"), c.clone())),
        ]);
        let g = f.replace_term(&c, &t("x"));
        // the binder is renamed so that `x` stays free
        assert!(g.variables().contains(&v("x")));
        assert!(g.all_constants().is_empty());
    }

    #[test]
    fn test_replace_named() {
        // ∀y. P ∧ y = y, with P := (y = z)
        let f = Formula::forall(
            v("y"),
            Formula::and(vec![Formula::atom("P"), Formula::equal(t("y"), t("y"))]),
        );
        let g = f.replace_named(&QualifiedName::new("P"), &Formula::equal(t("y"), t("z")));
        assert!(g.variables().contains(&v("y")));
        assert!(g.variables().contains(&v("z")));
        assert_eq!(f.replace_named(&QualifiedName::new("Q"), &Formula::atom("R")), f);
    }
}
