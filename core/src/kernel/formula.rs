//! # Formulas
//!
//! Formulas are immutable, refcounted trees. Free variables, all
//! variables and the regular form are computed once and cached in the node.

use super::{
    name::{QualifiedName, VarSet, Variable},
    symbol::{Constant, Predicate},
    term::{Term, Terms},
    Ref,
};
use smallvec::{smallvec, SmallVec};
use std::{cell::OnceCell, fmt};

/// A formula.
///
/// The formula is refcounted and is thus cheaply clonable.
#[derive(Clone)]
pub struct Formula(Ref<FormulaImpl>);

/// Small vector of formulas.
pub type Formulas = SmallVec<[Formula; 3]>;

/// The public view of a formula's root.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum FormulaView {
    /// Predicate applied to terms, ordered or not depending on the predicate.
    FPred(Predicate, Terms),
    /// Opaque named formula with term parameters, atomic for matching.
    FNamed(QualifiedName, Terms),
    FNot(Formula),
    /// N-ary, commutative conjunction.
    FAnd(Formulas),
    /// N-ary, commutative disjunction.
    FOr(Formulas),
    FImply(Formula, Formula),
    /// Equivalence, unordered.
    FEquiv(Formula, Formula),
    FForAll(Variable, Formula),
    FExists(Variable, Formula),
}

pub use FormulaView::*;

/// Kind of quantifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantifier {
    ForAll,
    Exists,
}

/// Kind of n-ary connective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
}

struct FormulaImpl {
    view: FormulaView,
    /// Free variables.
    vars: OnceCell<VarSet>,
    /// Free and bound variables.
    all_vars: OnceCell<VarSet>,
    regular: OnceCell<Formula>,
}

impl Formula {
    fn make_(view: FormulaView) -> Self {
        Formula(Ref::new(FormulaImpl {
            view,
            vars: OnceCell::new(),
            all_vars: OnceCell::new(),
            regular: OnceCell::new(),
        }))
    }

    pub fn pred<I>(p: Predicate, args: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Formula::make_(FPred(p, args.into_iter().collect()))
    }

    /// `a = b`.
    pub fn equal(a: Term, b: Term) -> Self {
        Formula::pred(Predicate::equal(), [a, b])
    }

    pub fn named<I>(name: QualifiedName, params: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Formula::make_(FNamed(name, params.into_iter().collect()))
    }

    /// A named formula without parameters, such as the proposition `P`.
    pub fn atom(name: &str) -> Self {
        Formula::named(QualifiedName::new(name), None)
    }

    pub fn not(f: Formula) -> Self {
        Formula::make_(FNot(f))
    }

    /// Negation, collapsing a double negation.
    pub fn negate(f: Formula) -> Self {
        match f.view() {
            FNot(a) => a.clone(),
            _ => Formula::not(f),
        }
    }

    pub fn and<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        Formula::make_(FAnd(children.into_iter().collect()))
    }

    pub fn or<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        Formula::make_(FOr(children.into_iter().collect()))
    }

    /// Conjunction, or the only child if there is just one.
    pub fn and_of(children: Vec<Formula>) -> Self {
        Formula::multi_of(Connective::And, children)
    }

    /// Disjunction, or the only child if there is just one.
    pub fn or_of(children: Vec<Formula>) -> Self {
        Formula::multi_of(Connective::Or, children)
    }

    pub fn multi<I>(c: Connective, children: I) -> Self
    where
        I: IntoIterator<Item = Formula>,
    {
        match c {
            Connective::And => Formula::and(children),
            Connective::Or => Formula::or(children),
        }
    }

    fn multi_of(c: Connective, mut children: Vec<Formula>) -> Self {
        if children.len() == 1 {
            children.pop().unwrap_or_else(|| Formula::multi(c, None))
        } else {
            Formula::multi(c, children)
        }
    }

    pub fn imply(a: Formula, b: Formula) -> Self {
        Formula::make_(FImply(a, b))
    }

    pub fn equiv(a: Formula, b: Formula) -> Self {
        Formula::make_(FEquiv(a, b))
    }

    pub fn forall(v: Variable, body: Formula) -> Self {
        Formula::make_(FForAll(v, body))
    }

    pub fn exists(v: Variable, body: Formula) -> Self {
        Formula::make_(FExists(v, body))
    }

    pub fn quantified(q: Quantifier, v: Variable, body: Formula) -> Self {
        match q {
            Quantifier::ForAll => Formula::forall(v, body),
            Quantifier::Exists => Formula::exists(v, body),
        }
    }

    #[inline]
    pub fn view(&self) -> &FormulaView {
        &self.0.view
    }

    pub fn as_quantified(&self) -> Option<(Quantifier, &Variable, &Formula)> {
        match self.view() {
            FForAll(v, b) => Some((Quantifier::ForAll, v, b)),
            FExists(v, b) => Some((Quantifier::Exists, v, b)),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<(Connective, &[Formula])> {
        match self.view() {
            FAnd(cs) => Some((Connective::And, &cs[..])),
            FOr(cs) => Some((Connective::Or, &cs[..])),
            _ => None,
        }
    }

    /// Is this a predicate, or a named formula?
    pub fn is_atomic(&self) -> bool {
        matches!(self.view(), FPred(..) | FNamed(..))
    }

    /// Sub-formulas of the root.
    pub fn children(&self) -> SmallVec<[&Formula; 3]> {
        match self.view() {
            FPred(..) | FNamed(..) => smallvec![],
            FNot(a) | FForAll(_, a) | FExists(_, a) => smallvec![a],
            FImply(a, b) | FEquiv(a, b) => smallvec![a, b],
            FAnd(cs) | FOr(cs) => cs.iter().collect(),
        }
    }

    /// Same root with new children, which must be as many as `children()`.
    pub fn with_children(&self, mut cs: Vec<Formula>) -> Formula {
        match self.view() {
            FPred(..) | FNamed(..) => self.clone(),
            FAnd(_) => Formula::and(cs),
            FOr(_) => Formula::or(cs),
            _ if cs.len() == 1 => {
                let a = cs.pop().unwrap_or_else(|| self.clone());
                match self.view() {
                    FNot(_) => Formula::not(a),
                    FForAll(v, _) => Formula::forall(v.clone(), a),
                    FExists(v, _) => Formula::exists(v.clone(), a),
                    _ => self.clone(),
                }
            }
            FImply(..) | FEquiv(..) if cs.len() == 2 => {
                let b = cs.pop();
                let a = cs.pop();
                match (a, b, self.view()) {
                    (Some(a), Some(b), FImply(..)) => Formula::imply(a, b),
                    (Some(a), Some(b), _) => Formula::equiv(a, b),
                    _ => self.clone(),
                }
            }
            _ => self.clone(),
        }
    }

    /// Apply `f` to every immediate sub-formula.
    pub fn map_children<F>(&self, mut f: F) -> Formula
    where
        F: FnMut(&Formula) -> Formula,
    {
        match self.view() {
            FPred(..) | FNamed(..) => self.clone(),
            FNot(a) => Formula::not(f(a)),
            FAnd(cs) => Formula::and(cs.iter().map(f)),
            FOr(cs) => Formula::or(cs.iter().map(f)),
            FImply(a, b) => Formula::imply(f(a), f(b)),
            FEquiv(a, b) => Formula::equiv(f(a), f(b)),
            FForAll(v, a) => Formula::forall(v.clone(), f(a)),
            FExists(v, a) => Formula::exists(v.clone(), f(a)),
        }
    }

    /// Free variables.
    pub fn variables(&self) -> &VarSet {
        self.0.vars.get_or_init(|| match self.view() {
            FPred(_, args) | FNamed(_, args) => term_vars(args),
            FForAll(v, b) | FExists(v, b) => {
                let mut s = b.variables().clone();
                s.remove(v);
                s
            }
            _ => {
                let mut s = VarSet::new();
                for c in self.children() {
                    s.extend(c.variables().iter().cloned());
                }
                s
            }
        })
    }

    /// Free and bound variables.
    pub fn all_variables(&self) -> &VarSet {
        self.0.all_vars.get_or_init(|| match self.view() {
            FPred(_, args) | FNamed(_, args) => term_vars(args),
            FForAll(v, b) | FExists(v, b) => {
                let mut s = b.all_variables().clone();
                s.insert(v.clone());
                s
            }
            _ => {
                let mut s = VarSet::new();
                for c in self.children() {
                    s.extend(c.all_variables().iter().cloned());
                }
                s
            }
        })
    }

    /// Access the cached regular form, computing it with `f` if needed.
    pub(crate) fn regular_cache<F>(&self, f: F) -> &Formula
    where
        F: FnOnce() -> Formula,
    {
        self.0.regular.get_or_init(f)
    }

    /// Remove nested `∧` inside `∧`, and `∨` inside `∨`.
    ///
    /// `(A∧B)∧C` becomes `A∧B∧C`.
    pub fn flatten(&self) -> Formula {
        match self.view() {
            FPred(..) | FNamed(..) => self.clone(),
            FAnd(cs) | FOr(cs) => {
                let is_and = matches!(self.view(), FAnd(_));
                let mut out = Formulas::new();
                for c in cs {
                    let c = c.flatten();
                    match (c.view(), is_and) {
                        (FAnd(sub), true) | (FOr(sub), false) => out.extend(sub.iter().cloned()),
                        _ => out.push(c),
                    }
                }
                if is_and {
                    Formula::and(out)
                } else {
                    Formula::or(out)
                }
            }
            _ => self.map_children(|c| c.flatten()),
        }
    }

    /// Constants occurring in the formula, in order of first occurrence.
    pub fn all_constants(&self) -> Vec<Constant> {
        let mut out = vec![];
        self.collect_constants(&mut out);
        out
    }

    fn collect_constants(&self, out: &mut Vec<Constant>) {
        match self.view() {
            FPred(_, args) | FNamed(_, args) => {
                for a in args {
                    a.collect_constants(out)
                }
            }
            _ => {
                for c in self.children() {
                    c.collect_constants(out)
                }
            }
        }
    }

    /// A variable `x1, x2, …` that does not occur in the formula.
    pub fn next_var(&self) -> Variable {
        let vs = self.all_variables();
        Variable::fresh("x", |v| vs.contains(v))
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|c| c.size()).sum::<usize>()
    }

    /// Is this `a = b`?
    pub fn is_equality(&self) -> bool {
        matches!(self.view(), FPred(p, args) if args.len() == 2 && *p == Predicate::equal())
    }

    fn is_binop(&self) -> bool {
        matches!(self.view(), FAnd(_) | FOr(_) | FImply(..) | FEquiv(..))
    }

    fn pp_(&self, out: &mut fmt::Formatter, paren: bool) -> fmt::Result {
        if paren {
            write!(out, "(")?;
        }
        match self.view() {
            FPred(_, args) if self.is_equality() => {
                write!(out, "{} = {}", args[0], args[1])?
            }
            FPred(p, args) => pp_app(p.name().display(), args, out)?,
            FNamed(n, args) if args.is_empty() => write!(out, "{}", n.display())?,
            FNamed(n, args) => pp_app(n.display(), args, out)?,
            FNot(a) => {
                write!(out, "¬")?;
                let p = a.is_binop() || a.as_quantified().is_some() || a.is_equality();
                a.pp_(out, p)?
            }
            FAnd(cs) | FOr(cs) => {
                let sep = if matches!(self.view(), FAnd(_)) { " ∧ " } else { " ∨ " };
                for (i, c) in cs.iter().enumerate() {
                    if i > 0 {
                        write!(out, "{}", sep)?;
                    }
                    c.pp_(out, c.is_binop() || c.as_quantified().is_some())?;
                }
            }
            FImply(a, b) | FEquiv(a, b) => {
                a.pp_(out, a.is_binop() || a.as_quantified().is_some())?;
                let sep = if matches!(self.view(), FImply(..)) { " → " } else { " ↔ " };
                write!(out, "{}", sep)?;
                b.pp_(out, b.is_binop() || b.as_quantified().is_some())?
            }
            FForAll(v, b) | FExists(v, b) => {
                let q = if matches!(self.view(), FForAll(..)) { "∀" } else { "∃" };
                write!(out, "{}{}. ", q, v)?;
                b.pp_(out, b.is_binop())?
            }
        }
        if paren {
            write!(out, ")")?;
        }
        Ok(())
    }
}

fn term_vars(args: &[Term]) -> VarSet {
    let mut s = VarSet::new();
    for a in args {
        s.extend(a.variables().iter().cloned());
    }
    s
}

fn pp_app(head: &str, args: &[Term], out: &mut fmt::Formatter) -> fmt::Result {
    write!(out, "{}(", head)?;
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{}", a)?;
    }
    write!(out, ")")
}

mod impls {
    use super::*;

    impl fmt::Display for Formula {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            self.pp_(out, false)
        }
    }

    impl fmt::Debug for Formula {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            self.pp_(out, false)
        }
    }

    impl PartialEq for Formula {
        fn eq(&self, other: &Self) -> bool {
            Ref::ptr_eq(&self.0, &other.0) || self.view() == other.view()
        }
    }

    impl Eq for Formula {}

    impl std::hash::Hash for Formula {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            self.view().hash(state)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn x() -> Term {
        Term::var_str("x")
    }
    fn y() -> Term {
        Term::var_str("y")
    }

    #[test]
    fn test_sizeof_formula() {
        assert_eq!(std::mem::size_of::<Formula>(), std::mem::size_of::<*const ()>());
    }

    #[test]
    fn test_variables() {
        // ∀x. (x = y)
        let f = Formula::forall(Variable::new("x"), Formula::equal(x(), y()));
        let free: Vec<_> = f.variables().iter().map(|v| v.name().to_string()).collect();
        assert_eq!(free, vec!["y"]);
        let all: Vec<_> = f.all_variables().iter().map(|v| v.name().to_string()).collect();
        assert_eq!(all, vec!["x", "y"]);
        assert_eq!(f.next_var().name(), "x1");
    }

    #[test]
    fn test_flatten() {
        let (a, b, c) = (Formula::atom("A"), Formula::atom("B"), Formula::atom("C"));
        let f = Formula::and(vec![Formula::and(vec![a.clone(), b.clone()]), c.clone()]);
        let g = f.flatten();
        assert_eq!(g, Formula::and(vec![a.clone(), b.clone(), c.clone()]));
        assert_eq!(g.flatten(), g);
        // different connectives are kept apart
        let h = Formula::or(vec![Formula::and(vec![a.clone(), b.clone()]), c.clone()]);
        assert_eq!(h.flatten(), h);
        let n = Formula::not(Formula::or(vec![Formula::or(vec![a.clone(), b]), c]));
        assert_eq!(format!("{}", n.flatten()), "¬(A ∨ B ∨ C)");
    }

    #[test]
    fn test_negate() {
        let p = Formula::atom("P");
        assert_eq!(Formula::negate(Formula::not(p.clone())), p);
        assert_eq!(Formula::negate(p.clone()), Formula::not(p));
    }

    #[test]
    fn test_constants() {
        let c = Constant::new(QualifiedName::new("c"));
        let d = Constant::new(QualifiedName::new("d"));
        let f = Formula::and(vec![
            Formula::equal(Term::constant(d.clone()), Term::constant(c.clone())),
            Formula::equal(Term::constant(c.clone()), x()),
        ]);
        assert_eq!(f.all_constants(), vec![d, c]);
    }

    #[test]
    fn test_with_children() {
        let (p, q) = (Formula::atom("P"), Formula::atom("Q"));
        let f = Formula::imply(p.clone(), q.clone());
        assert_eq!(f.with_children(vec![q.clone(), p.clone()]), Formula::imply(q, p));
    }
}
