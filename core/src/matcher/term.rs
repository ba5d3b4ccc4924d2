//! # Term matchers

use super::{util, MatchResult, Matcher};
use crate::kernel::{Constant, Function, QualifiedName, RStr, Term, TermView::*, Variable};

/// A pattern on terms.
#[derive(Clone, Debug)]
pub enum TermMatcher {
    /// A reference: binds to the first term it meets, then requires
    /// identity with it.
    Ref(RStr),
    /// Exactly this variable.
    Var(Variable),
    Const(Constant),
    /// Named term with these parameters, matched in order.
    Named(QualifiedName, Vec<TermMatcher>),
    /// Function application, ordered or not depending on the function.
    Fun(Function, Vec<TermMatcher>),
}

impl TermMatcher {
    /// Reference named `s`.
    pub fn r(s: &str) -> Self {
        TermMatcher::Ref(s.into())
    }

    /// Pattern for a template term: its variables become references.
    pub fn from_term(t: &Term) -> Self {
        match t.view() {
            TVar(v) => TermMatcher::Ref(v.to_rstr()),
            TConst(c) => TermMatcher::Const(c.clone()),
            TNamed(n, args) => TermMatcher::Named(n.clone(), args.iter().map(Self::from_term).collect()),
            TFun(f, args) => TermMatcher::Fun(f.clone(), args.iter().map(Self::from_term).collect()),
        }
    }

    /// The term this pattern denotes under `r`, if it is fully determined.
    pub fn resolve(&self, r: &MatchResult) -> Option<Term> {
        match self {
            TermMatcher::Ref(n) => r.term_ref(n).cloned(),
            TermMatcher::Var(v) => Some(Term::var(v.clone())),
            TermMatcher::Const(c) => Some(Term::constant(c.clone())),
            TermMatcher::Named(n, args) => {
                let args: Option<Vec<Term>> = args.iter().map(|a| a.resolve(r)).collect();
                Some(Term::named(n.clone(), args?))
            }
            TermMatcher::Fun(f, args) => {
                let args: Option<Vec<Term>> = args.iter().map(|a| a.resolve(r)).collect();
                Some(Term::fun(f.clone(), args?))
            }
        }
    }
}

impl Matcher<Term> for TermMatcher {
    fn match_(&self, t: &Term, prev: &MatchResult) -> Vec<MatchResult> {
        match (self, t.view()) {
            (TermMatcher::Ref(n), _) => match prev.term_ref(n) {
                Some(bound) if bound.is_identity_to(t) => vec![prev.clone()],
                Some(_) => vec![],
                None => {
                    let mut r = prev.clone();
                    r.bind_term(n.clone(), t.clone());
                    vec![r]
                }
            },
            (TermMatcher::Var(v), TVar(v2)) if v == v2 => vec![prev.clone()],
            (TermMatcher::Const(c), TConst(c2)) if c == c2 => vec![prev.clone()],
            (TermMatcher::Named(n, ms), TNamed(n2, args)) if n == n2 => {
                util::ordered_match(args, ms, prev)
            }
            (TermMatcher::Fun(f, ms), TFun(f2, args)) if f == f2 => {
                if f.is_ordered() {
                    util::ordered_match(args, ms, prev)
                } else {
                    util::unordered_match(args, ms, prev)
                }
            }
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unordered_fun() {
        let plus = Function::new(QualifiedName::new("plus"), Some(2), false);
        let c = Constant::new(QualifiedName::new("c"));
        let t = Term::fun(plus.clone(), vec![Term::var_str("a"), Term::constant(c.clone())]);
        let m = TermMatcher::Fun(plus, vec![TermMatcher::Const(c), TermMatcher::r("x")]);
        let rs = m.match_(&t, &MatchResult::new());
        assert_eq!(rs.len(), 1);
        assert_eq!(rs[0].term_ref("x"), Some(&Term::var_str("a")));
    }

    #[test]
    fn test_resolve() {
        let mut r = MatchResult::new();
        let f = Function::new(QualifiedName::new("f"), Some(1), true);
        let m = TermMatcher::Fun(f.clone(), vec![TermMatcher::r("x")]);
        assert!(m.resolve(&r).is_none());
        r.bind_term("x".into(), Term::var_str("y"));
        assert_eq!(m.resolve(&r), Some(Term::fun(f, vec![Term::var_str("y")])));
    }
}
