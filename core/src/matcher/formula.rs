//! # Formula matchers
//!
//! A formula matcher is a pattern tree. References (`P`, `φ(x)`) bind to
//! sub-formulas on first use and must be identical on later uses.
//! `∧`/`∨` patterns are matched against the children in any order, and
//! can hand the children they do not claim to a fallback matcher.

use super::{util, MatchResult, Matcher, RefFormula, TermMatcher};
use crate::kernel::{
    Connective, Formula, FormulaView::*, Formulas, Predicate, QualifiedName, RStr, Term,
    TermView::*, Variable,
};
use smallvec::SmallVec;

/// A pattern on formulas.
#[derive(Clone, Debug)]
pub enum FormulaMatcher {
    /// Matches nothing. Used as the fallback of an exact `∧`/`∨`.
    Empty,
    /// Formula reference `P`.
    Ref(RStr),
    /// Parametrized formula reference `φ(x, …)`.
    ///
    /// On first use the bound formula is abstracted over the arguments;
    /// on later uses it is instantiated with them and compared.
    VarRef(RStr, Vec<TermMatcher>),
    /// Named formula with these parameters.
    Named(QualifiedName, Vec<TermMatcher>),
    Pred(Predicate, Vec<TermMatcher>),
    Not(Box<FormulaMatcher>),
    Imply(Box<FormulaMatcher>, Box<FormulaMatcher>),
    /// `↔`, in either order.
    Equiv(Box<FormulaMatcher>, Box<FormulaMatcher>),
    /// Conjunction: the children, plus the fallback for leftover conjuncts.
    And(Vec<FormulaMatcher>, Box<FormulaMatcher>),
    Or(Vec<FormulaMatcher>, Box<FormulaMatcher>),
    /// The term reference names the bound variable within the body.
    ForAll(RStr, Box<FormulaMatcher>),
    Exists(RStr, Box<FormulaMatcher>),
}

use FormulaMatcher as FM;

impl FormulaMatcher {
    pub fn r(name: &str) -> Self {
        FM::Ref(name.into())
    }

    pub fn var_ref(name: &str, args: Vec<TermMatcher>) -> Self {
        FM::VarRef(name.into(), args)
    }

    pub fn pred(p: Predicate, args: Vec<TermMatcher>) -> Self {
        FM::Pred(p, args)
    }

    /// `x = y` on term references.
    pub fn equal(a: &str, b: &str) -> Self {
        FM::Pred(Predicate::equal(), vec![TermMatcher::r(a), TermMatcher::r(b)])
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(m: FormulaMatcher) -> Self {
        FM::Not(Box::new(m))
    }

    pub fn imply(a: FormulaMatcher, b: FormulaMatcher) -> Self {
        FM::Imply(Box::new(a), Box::new(b))
    }

    pub fn equiv(a: FormulaMatcher, b: FormulaMatcher) -> Self {
        FM::Equiv(Box::new(a), Box::new(b))
    }

    /// Exactly these conjuncts.
    pub fn and(children: Vec<FormulaMatcher>) -> Self {
        FM::And(children, Box::new(FM::Empty))
    }

    /// These conjuncts, and the rest matched by `fallback`.
    pub fn and_with(children: Vec<FormulaMatcher>, fallback: FormulaMatcher) -> Self {
        FM::And(children, Box::new(fallback))
    }

    pub fn or(children: Vec<FormulaMatcher>) -> Self {
        FM::Or(children, Box::new(FM::Empty))
    }

    pub fn or_with(children: Vec<FormulaMatcher>, fallback: FormulaMatcher) -> Self {
        FM::Or(children, Box::new(fallback))
    }

    pub fn forall(var: &str, body: FormulaMatcher) -> Self {
        FM::ForAll(var.into(), Box::new(body))
    }

    pub fn exists(var: &str, body: FormulaMatcher) -> Self {
        FM::Exists(var.into(), Box::new(body))
    }

    /// Pattern for a template formula.
    ///
    /// Named formulas become references (parametrized if they have
    /// arguments), variables become term references, and `∧`/`∨`
    /// must match exactly.
    pub fn from_formula(f: &Formula) -> Self {
        match f.view() {
            FNamed(n, args) if args.is_empty() => FM::Ref(n.full().into()),
            FNamed(n, args) => FM::VarRef(n.full().into(), args.iter().map(TermMatcher::from_term).collect()),
            FPred(p, args) => FM::Pred(p.clone(), args.iter().map(TermMatcher::from_term).collect()),
            FNot(a) => FM::not(Self::from_formula(a)),
            FImply(a, b) => FM::imply(Self::from_formula(a), Self::from_formula(b)),
            FEquiv(a, b) => FM::equiv(Self::from_formula(a), Self::from_formula(b)),
            FAnd(cs) => FM::and(cs.iter().map(Self::from_formula).collect()),
            FOr(cs) => FM::or(cs.iter().map(Self::from_formula).collect()),
            FForAll(v, b) => FM::ForAll(v.to_rstr(), Box::new(Self::from_formula(b))),
            FExists(v, b) => FM::Exists(v.to_rstr(), Box::new(Self::from_formula(b))),
        }
    }

    /// Pattern matching exactly the instances of `body` where `params`
    /// are replaced by what `args` match.
    ///
    /// Bound variables of `body` become scoped term references, so
    /// instances that only differ by bound names still match.
    fn from_instance(body: &Formula, params: &[Variable], args: &[TermMatcher]) -> Self {
        let mut env: Vec<(Variable, TermMatcher)> =
            params.iter().cloned().zip(args.iter().cloned()).collect();
        instance_(body, &mut env)
    }
}

fn instance_(f: &Formula, env: &mut Vec<(Variable, TermMatcher)>) -> FormulaMatcher {
    let terms = |args: &[Term], env: &[(Variable, TermMatcher)]| -> Vec<TermMatcher> {
        args.iter().map(|t| instance_term(t, env)).collect()
    };
    match f.view() {
        FPred(p, args) => FM::Pred(p.clone(), terms(args, env)),
        FNamed(n, args) => FM::Named(n.clone(), terms(args, env)),
        FNot(a) => FM::not(instance_(a, env)),
        FImply(a, b) => {
            let a = instance_(a, env);
            FM::imply(a, instance_(b, env))
        }
        FEquiv(a, b) => {
            let a = instance_(a, env);
            FM::equiv(a, instance_(b, env))
        }
        FAnd(cs) => FM::and(cs.iter().map(|c| instance_(c, env)).collect()),
        FOr(cs) => FM::or(cs.iter().map(|c| instance_(c, env)).collect()),
        FForAll(v, b) | FExists(v, b) => {
            let name: RStr = format!("#{}", env.len()).into();
            env.push((v.clone(), TermMatcher::Ref(name.clone())));
            let body = Box::new(instance_(b, env));
            env.pop();
            match f.view() {
                FForAll(..) => FM::ForAll(name, body),
                _ => FM::Exists(name, body),
            }
        }
    }
}

fn instance_term(t: &Term, env: &[(Variable, TermMatcher)]) -> TermMatcher {
    match t.view() {
        TVar(v) => env
            .iter()
            .rev()
            .find(|(u, _)| u == v)
            .map(|(_, m)| m.clone())
            .unwrap_or_else(|| TermMatcher::Var(v.clone())),
        TConst(c) => TermMatcher::Const(c.clone()),
        TNamed(n, args) => TermMatcher::Named(n.clone(), args.iter().map(|a| instance_term(a, env)).collect()),
        TFun(f, args) => TermMatcher::Fun(f.clone(), args.iter().map(|a| instance_term(a, env)).collect()),
    }
}

impl Matcher<Formula> for FormulaMatcher {
    fn match_(&self, f: &Formula, prev: &MatchResult) -> Vec<MatchResult> {
        match (self, f.view()) {
            (FM::Empty, _) => vec![],
            (FM::Ref(name), _) => match prev.formula_ref(name) {
                Some(bound) if bound.formula.is_identity_to(f) => vec![prev.clone()],
                Some(_) => vec![],
                None => {
                    let mut r = prev.clone();
                    r.bind_formula(name.clone(), RefFormula::new(f.clone()));
                    vec![r]
                }
            },
            (FM::VarRef(name, args), _) => match_var_ref(name, args, f, prev),
            (FM::Named(n, ms), FNamed(n2, args)) if n == n2 => util::ordered_match(args, ms, prev),
            (FM::Pred(p, ms), FPred(p2, args)) if p == p2 => {
                if p.is_ordered() {
                    util::ordered_match(args, ms, prev)
                } else {
                    util::unordered_match(args, ms, prev)
                }
            }
            (FM::Not(m), FNot(a)) => m.match_(a, prev),
            (FM::Imply(m1, m2), FImply(a, b)) => m2.match_all(b, &m1.match_(a, prev)),
            (FM::Equiv(m1, m2), FEquiv(a, b)) => {
                let mut out = m2.match_all(b, &m1.match_(a, prev));
                out.extend(m2.match_all(a, &m1.match_(b, prev)));
                out
            }
            (FM::And(ms, fb), FAnd(cs)) => match_multi(Connective::And, ms, fb, cs, prev),
            (FM::Or(ms, fb), FOr(cs)) => match_multi(Connective::Or, ms, fb, cs, prev),
            (FM::ForAll(name, m), FForAll(v, body)) | (FM::Exists(name, m), FExists(v, body)) => {
                match_quantified(name, m, v, body, prev)
            }
            _ => vec![],
        }
    }
}

fn match_multi(
    c: Connective,
    ms: &[FormulaMatcher],
    fallback: &FormulaMatcher,
    cs: &Formulas,
    prev: &MatchResult,
) -> Vec<MatchResult> {
    let fallback = match fallback {
        FM::Empty => None,
        fb => Some(fb),
    };
    util::unordered_match_with_fallback(cs, ms, fallback, |rest| Formula::multi(c, rest), prev)
}

/// Match the body with `name` standing for the bound variable `v`, then
/// restore whatever `name` meant outside.
fn match_quantified(
    name: &RStr,
    m: &FormulaMatcher,
    v: &Variable,
    body: &Formula,
    prev: &MatchResult,
) -> Vec<MatchResult> {
    let outer = prev.term_ref(name).cloned();
    let mut r = prev.clone();
    r.bind_term(name.clone(), Term::var(v.clone()));
    m.match_(body, &r)
        .into_iter()
        .map(|mut r| {
            match &outer {
                Some(t) => r.bind_term(name.clone(), t.clone()),
                None => {
                    r.unbind_term(name);
                }
            }
            r
        })
        .filter(|r| !escapes(r, prev, v))
        .collect()
}

/// Does a reference bound while matching the body of `∀v` capture `v`?
///
/// Such a binding would move `v` out of its binder when the reference is
/// used outside of it. Parameters of `φ(v)` are not captures.
fn escapes(r: &MatchResult, prev: &MatchResult, v: &Variable) -> bool {
    let term_escapes = r
        .term_refs()
        .any(|(n, t)| prev.term_ref(n).is_none() && t.variables().contains(v));
    let formula_escapes = r.formula_refs().any(|(n, rf)| {
        prev.formula_ref(n).is_none() && rf.formula.variables().contains(v) && !rf.params.contains(v)
    });
    if term_escapes || formula_escapes {
        crate::logtrace!("match: {:?} lets `{}` escape its binder", r, v);
    }
    term_escapes || formula_escapes
}

type Abstraction = (MatchResult, Formula, SmallVec<[Variable; 2]>);

fn match_var_ref(
    name: &RStr,
    args: &[TermMatcher],
    f: &Formula,
    prev: &MatchResult,
) -> Vec<MatchResult> {
    if let Some(bound) = prev.formula_ref(name) {
        if bound.params.len() != args.len() {
            return vec![];
        }
        let m = FormulaMatcher::from_instance(&bound.formula, &bound.params, args);
        return m.match_(f, prev);
    }

    // first occurrence: abstract `f` over each argument in turn
    let mut states: Vec<Abstraction> = vec![(prev.clone(), f.clone(), SmallVec::new())];
    for arg in args {
        let mut next = vec![];
        for (r, body, params) in states {
            match arg.resolve(&r) {
                Some(t) => {
                    if let Some(v) = t.as_var() {
                        let mut params = params;
                        params.push(v.clone());
                        next.push((r, body, params));
                    } else {
                        let p = fresh_param(&body, &params, &t);
                        let body = body.replace_term(&t, &Term::var(p.clone()));
                        let mut params = params;
                        params.push(p);
                        next.push((r, body, params));
                    }
                }
                None => match arg {
                    TermMatcher::Ref(tn) => {
                        let free = f.variables();
                        if free.is_empty() {
                            // `f` does not depend on the argument
                            let p = fresh_param(&body, &params, &Term::var(Variable::new("x")));
                            let mut r = r;
                            r.bind_term(tn.clone(), Term::var(p.clone()));
                            let mut params = params;
                            params.push(p);
                            next.push((r, body, params));
                            continue;
                        }
                        for v in free {
                            let mut r2 = r.clone();
                            r2.bind_term(tn.clone(), Term::var(v.clone()));
                            let mut params = params.clone();
                            params.push(v.clone());
                            next.push((r2, body.clone(), params));
                        }
                    }
                    _ => {
                        crate::logtrace!("match: undetermined argument {:?} of `{}`", arg, name);
                    }
                },
            }
        }
        states = next;
    }

    states
        .into_iter()
        .map(|(mut r, body, params)| {
            r.bind_formula(name.clone(), RefFormula::with_params(body, params));
            r
        })
        .collect()
}

fn fresh_param(body: &Formula, params: &[Variable], t: &Term) -> Variable {
    Variable::fresh("p", |v| {
        body.all_variables().contains(v) || params.contains(v) || t.variables().contains(v)
    })
}
