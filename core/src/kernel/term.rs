//! # Terms
//!
//! Terms are the objects formulas talk about: variables, constants,
//! named terms and function applications. They contain no binders.

use super::{
    name::{QualifiedName, VarSet, Variable},
    symbol::{Constant, Function},
    Ref,
};
use smallvec::SmallVec;
use std::{cell::OnceCell, fmt};

/// A term.
///
/// The term is refcounted and is thus cheaply clonable.
#[derive(Clone)]
pub struct Term(Ref<TermImpl>);

/// Small vector of terms.
pub type Terms = SmallVec<[Term; 3]>;

/// The public view of a term's root.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TermView {
    TVar(Variable),
    TConst(Constant),
    /// An opaque named term. It is atomic for matching, but its
    /// parameters count for variable collection.
    TNamed(QualifiedName, Terms),
    /// Function application. Arguments of an unordered function are a
    /// multiset.
    TFun(Function, Terms),
}

pub use TermView::*;

struct TermImpl {
    view: TermView,
    /// Free variables, computed on demand.
    vars: OnceCell<VarSet>,
}

impl Term {
    fn make_(view: TermView) -> Self {
        Term(Ref::new(TermImpl {
            view,
            vars: OnceCell::new(),
        }))
    }

    pub fn var(v: Variable) -> Self {
        Term::make_(TVar(v))
    }

    /// Variable term from a name.
    pub fn var_str(name: &str) -> Self {
        Term::var(Variable::new(name))
    }

    pub fn constant(c: Constant) -> Self {
        Term::make_(TConst(c))
    }

    pub fn named<I>(name: QualifiedName, args: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Term::make_(TNamed(name, args.into_iter().collect()))
    }

    pub fn fun<I>(f: Function, args: I) -> Self
    where
        I: IntoIterator<Item = Term>,
    {
        Term::make_(TFun(f, args.into_iter().collect()))
    }

    #[inline]
    pub fn view(&self) -> &TermView {
        &self.0.view
    }

    pub fn as_var(&self) -> Option<&Variable> {
        match self.view() {
            TVar(v) => Some(v),
            _ => None,
        }
    }

    /// Arguments of the root, empty for atoms.
    pub fn args(&self) -> &[Term] {
        match self.view() {
            TVar(_) | TConst(_) => &[],
            TNamed(_, args) | TFun(_, args) => &args[..],
        }
    }

    /// Are the arguments of the root compared in order?
    pub fn is_ordered(&self) -> bool {
        match self.view() {
            TFun(f, _) => f.is_ordered(),
            _ => true,
        }
    }

    /// Same root, new arguments. Atoms are returned unchanged.
    pub fn with_args(&self, args: Terms) -> Term {
        match self.view() {
            TVar(_) | TConst(_) => self.clone(),
            TNamed(n, _) => Term::make_(TNamed(n.clone(), args)),
            TFun(f, _) => Term::make_(TFun(f.clone(), args)),
        }
    }

    /// Free variables of the term.
    pub fn variables(&self) -> &VarSet {
        self.0.vars.get_or_init(|| {
            let mut s = VarSet::new();
            match self.view() {
                TVar(v) => {
                    s.insert(v.clone());
                }
                TConst(_) => (),
                TNamed(_, args) | TFun(_, args) => {
                    for a in args {
                        s.extend(a.variables().iter().cloned());
                    }
                }
            }
            s
        })
    }

    /// Push the constants of this term that are not yet in `out`.
    pub fn collect_constants(&self, out: &mut Vec<Constant>) {
        match self.view() {
            TVar(_) => (),
            TConst(c) => {
                if !out.contains(c) {
                    out.push(c.clone())
                }
            }
            TNamed(_, args) | TFun(_, args) => {
                for a in args {
                    a.collect_constants(out)
                }
            }
        }
    }

    fn pp_(&self, out: &mut fmt::Formatter) -> fmt::Result {
        match self.view() {
            TVar(v) => write!(out, "{}", v),
            TConst(c) => write!(out, "{}", c),
            TNamed(n, args) if args.is_empty() => write!(out, "{}", n.display()),
            TNamed(n, args) => pp_args(n.display(), args, out),
            TFun(f, args) => pp_args(f.name().display(), args, out),
        }
    }
}

fn pp_args(head: &str, args: &[Term], out: &mut fmt::Formatter) -> fmt::Result {
    write!(out, "{}(", head)?;
    for (i, a) in args.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        a.pp_(out)?;
    }
    write!(out, ")")
}

mod impls {
    use super::*;

    impl fmt::Display for Term {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            self.pp_(out)
        }
    }

    impl fmt::Debug for Term {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            self.pp_(out)
        }
    }

    impl PartialEq for Term {
        fn eq(&self, other: &Self) -> bool {
            Ref::ptr_eq(&self.0, &other.0) || self.view() == other.view()
        }
    }

    impl Eq for Term {}

    impl std::hash::Hash for Term {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            self.view().hash(state)
        }
    }

    impl From<Variable> for Term {
        fn from(v: Variable) -> Self {
            Term::var(v)
        }
    }

    impl From<Constant> for Term {
        fn from(c: Constant) -> Self {
            Term::constant(c)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sizeof_term() {
        assert_eq!(std::mem::size_of::<Term>(), std::mem::size_of::<*const ()>());
    }

    #[test]
    fn test_variables() {
        let f = Function::new(QualifiedName::new("f"), Some(2), true);
        let c = Constant::new(QualifiedName::new("c"));
        let t = Term::fun(
            f,
            vec![Term::var_str("x"), Term::named(QualifiedName::new("g"), vec![Term::var_str("y")])],
        );
        let vs: Vec<_> = t.variables().iter().map(|v| v.name().to_string()).collect();
        assert_eq!(vs, vec!["x", "y"]);
        assert!(Term::constant(c).variables().is_empty());
        assert_eq!(format!("{}", t), "f(x, g(y))");
    }
}
