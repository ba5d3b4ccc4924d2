//! # Regular form
//!
//! The regular form of a formula is a canonical representative of its
//! class modulo renaming of bound variables and reordering of commutative
//! children. Bound variables are renamed `$1, $2, …` in traversal order,
//! and children of commutative nodes are sorted with `compare_formulas`.
//!
//! Two formulas are alpha-equivalent up to reordering iff their regular
//! forms are structurally equal, so the regular form is the key of every
//! deduplication table in the engine.

use crate::kernel::{
    Formula, FormulaView::*, Quantifier, Term, TermView::*, Terms, VarSet, Variable,
};
use fnv::FnvHashMap;
use std::cmp::Ordering;

impl Formula {
    /// The regular form, computed once and cached.
    pub fn regular_form(&self) -> Formula {
        self.regular_cache(|| regular_form_(self)).clone()
    }
}

fn regular_form_(f: &Formula) -> Formula {
    let all = f.all_variables();
    if !all.iter().any(|v| v.canonical_index().is_some()) {
        return regular_(f, 0).0;
    }
    // names like `$3` are taken. Free ones stay, and numbering starts
    // above them; bound ones are moved out of the way first.
    let start = f
        .variables()
        .iter()
        .filter_map(|v| v.canonical_index())
        .max()
        .unwrap_or(0);
    let mut avoid = all.clone();
    let g = rename_canonical_binders(f, &mut avoid);
    crate::logtrace!("regular form: rename {} into {}, start at {}", f, g, start);
    regular_(&g, start).0
}

fn rename_canonical_binders(f: &Formula, avoid: &mut VarSet) -> Formula {
    match f.as_quantified() {
        Some((q, v, body)) => {
            let body = rename_canonical_binders(body, avoid);
            if v.canonical_index().is_some() {
                let w = Variable::fresh("%", |x| avoid.contains(x));
                avoid.insert(w.clone());
                let body = body.rename_var(&[(v.clone(), w.clone())]);
                Formula::quantified(q, w, body)
            } else {
                Formula::quantified(q, v.clone(), body)
            }
        }
        None => f.map_children(|c| rename_canonical_binders(c, avoid)),
    }
}

/// Canonical form of `f`, numbering its binders from `start+1`.
/// Also returns the last index used.
fn regular_(f: &Formula, start: usize) -> (Formula, usize) {
    match f.view() {
        FPred(p, args) => {
            let args = regular_terms(p.is_ordered(), args);
            (Formula::pred(p.clone(), args), start)
        }
        FNamed(n, args) => (Formula::named(n.clone(), regular_terms(true, args)), start),
        FNot(a) => {
            let (a, n) = regular_(a, start);
            (Formula::not(a), n)
        }
        FImply(a, b) => {
            let (a, n) = regular_(a, start);
            let (b, n) = regular_(b, n);
            (Formula::imply(a, b), n)
        }
        FEquiv(a, b) => {
            let (mut cs, n) = regular_unordered(&[a, b], start);
            let b = cs.pop();
            let a = cs.pop();
            match (a, b) {
                (Some(a), Some(b)) => (Formula::equiv(a, b), n),
                _ => (f.clone(), start),
            }
        }
        FAnd(cs) => {
            let cs: Vec<&Formula> = cs.iter().collect();
            let (cs, n) = regular_unordered(&cs, start);
            (Formula::and(cs), n)
        }
        FOr(cs) => {
            let cs: Vec<&Formula> = cs.iter().collect();
            let (cs, n) = regular_unordered(&cs, start);
            (Formula::or(cs), n)
        }
        FForAll(v, body) | FExists(v, body) => {
            let q = if matches!(f.view(), FForAll(..)) {
                Quantifier::ForAll
            } else {
                Quantifier::Exists
            };
            let n = start + 1;
            let w = Variable::canonical(n);
            let body = body.rename_var(&[(v.clone(), w.clone())]);
            let (body, last) = regular_(&body, n);
            (Formula::quantified(q, w, body), last)
        }
    }
}

/// Canonicalize each child from the same `start`, sort them, then shift
/// the binders of each child so that indices keep increasing.
fn regular_unordered(cs: &[&Formula], start: usize) -> (Vec<Formula>, usize) {
    let mut rs: Vec<(Formula, usize)> = cs.iter().map(|c| regular_(c, start)).collect();
    rs.sort_by(|a, b| compare_formulas(&a.0, &b.0));
    let mut next = start;
    let mut out = Vec::with_capacity(rs.len());
    for (c, last) in rs {
        out.push(rename_var_after(&c, start, next - start));
        next += last - start;
    }
    (out, next)
}

/// Rename each `$i` with `i > start` into `$(i+offset)`.
fn rename_var_after(f: &Formula, start: usize, offset: usize) -> Formula {
    if offset == 0 {
        return f.clone();
    }
    let m: FnvHashMap<Variable, Variable> = f
        .all_variables()
        .iter()
        .filter_map(|v| {
            let i = v.canonical_index()?;
            if i > start {
                Some((v.clone(), Variable::canonical(i + offset)))
            } else {
                None
            }
        })
        .collect();
    f.rename_all_var(&m)
}

fn regular_terms(ordered: bool, args: &[Term]) -> Terms {
    let mut args: Terms = args.iter().map(regular_term).collect();
    if !ordered {
        args.sort_by(compare_terms);
    }
    args
}

fn regular_term(t: &Term) -> Term {
    match t.view() {
        TVar(_) | TConst(_) => t.clone(),
        TNamed(..) | TFun(..) => t.with_args(regular_terms(t.is_ordered(), t.args())),
    }
}

fn formula_rank(f: &Formula) -> u8 {
    match f.view() {
        FNamed(..) => 0,
        FPred(..) => 1,
        FNot(_) => 2,
        FImply(..) => 3,
        FEquiv(..) => 4,
        FForAll(..) => 5,
        FExists(..) => 6,
        FAnd(_) => 7,
        FOr(_) => 8,
    }
}

fn term_rank(t: &Term) -> u8 {
    match t.view() {
        TVar(_) => 0,
        TConst(_) => 1,
        TNamed(..) => 2,
        TFun(..) => 3,
    }
}

/// Lexicographic comparison; a strict prefix is smaller.
pub fn compare_lexi<T, F>(xs: &[T], ys: &[T], mut cmp: F) -> Ordering
where
    F: FnMut(&T, &T) -> Ordering,
{
    for (x, y) in xs.iter().zip(ys.iter()) {
        let c = cmp(x, y);
        if c != Ordering::Equal {
            return c;
        }
    }
    xs.len().cmp(&ys.len())
}

/// Total order on terms: by kind, then name, then arguments.
pub fn compare_terms(a: &Term, b: &Term) -> Ordering {
    term_rank(a).cmp(&term_rank(b)).then_with(|| match (a.view(), b.view()) {
        (TVar(x), TVar(y)) => x.cmp(y),
        (TConst(x), TConst(y)) => x.cmp(y),
        (TNamed(n1, a1), TNamed(n2, a2)) => n1.cmp(n2).then_with(|| compare_lexi(a1, a2, compare_terms)),
        (TFun(f1, a1), TFun(f2, a2)) => f1.cmp(f2).then_with(|| compare_lexi(a1, a2, compare_terms)),
        _ => Ordering::Equal,
    })
}

/// Total order on formulas.
///
/// Kinds are ordered `Named < Predicate < ¬ < → < ↔ < ∀ < ∃ < ∧ < ∨`,
/// then formulas of the same kind by name, then by children.
pub fn compare_formulas(a: &Formula, b: &Formula) -> Ordering {
    formula_rank(a).cmp(&formula_rank(b)).then_with(|| match (a.view(), b.view()) {
        (FNamed(n1, a1), FNamed(n2, a2)) => n1.cmp(n2).then_with(|| compare_lexi(a1, a2, compare_terms)),
        (FPred(p1, a1), FPred(p2, a2)) => p1.cmp(p2).then_with(|| compare_lexi(a1, a2, compare_terms)),
        (FForAll(v1, b1), FForAll(v2, b2)) | (FExists(v1, b1), FExists(v2, b2)) => {
            v1.cmp(v2).then_with(|| compare_formulas(b1, b2))
        }
        _ => compare_lexi(&a.children(), &b.children(), |x, y| compare_formulas(x, y)),
    })
}

mod impls {
    use super::*;

    impl PartialOrd for Formula {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Formula {
        fn cmp(&self, other: &Self) -> Ordering {
            compare_formulas(self, other)
        }
    }

    impl PartialOrd for Term {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Term {
        fn cmp(&self, other: &Self) -> Ordering {
            compare_terms(self, other)
        }
    }
}
