//! # Rewriting with matchers

use super::{MatchResult, Matcher};
use crate::{
    errorstr,
    kernel::{Formula, FormulaView::*, Ref, Term, TermView::*, VarSet, Variable},
    Result,
};

/// Builds a formula from a successful match.
pub type Replacer = Ref<dyn Fn(&MatchResult) -> Result<Formula>>;

/// Replacer instantiating `template`, see `instantiate`.
pub fn template(tpl: Formula) -> Replacer {
    Ref::new(move |r: &MatchResult| instantiate(&tpl, r))
}

/// Every formula obtained by rewriting one sub-formula of `f`.
///
/// Each match of `m` at each position yields its own result. Results are
/// flattened.
pub fn replace_one<M>(f: &Formula, m: &M, rep: &dyn Fn(&MatchResult) -> Result<Formula>) -> Result<Vec<Formula>>
where
    M: Matcher<Formula>,
{
    let res = replace_one_(f, m, rep)?;
    Ok(res.into_iter().map(|g| g.flatten()).collect())
}

fn replace_one_<M>(f: &Formula, m: &M, rep: &dyn Fn(&MatchResult) -> Result<Formula>) -> Result<Vec<Formula>>
where
    M: Matcher<Formula>,
{
    let mut out = vec![];
    for r in m.match_(f, &MatchResult::new()) {
        out.push(rep(&r)?);
    }
    let cs = f.children();
    for (i, c) in cs.iter().enumerate() {
        for c2 in replace_one_(c, m, rep)? {
            let mut new_cs: Vec<Formula> = cs.iter().map(|x| (*x).clone()).collect();
            new_cs[i] = c2;
            out.push(f.with_children(new_cs));
        }
    }
    Ok(out)
}

/// Rewrite bottom-up, replacing every sub-formula where `m` matches
/// with its first match. The result is flattened.
pub fn replace_all<M>(f: &Formula, m: &M, rep: &dyn Fn(&MatchResult) -> Result<Formula>) -> Result<Formula>
where
    M: Matcher<Formula>,
{
    Ok(replace_all_(f, m, rep)?.flatten())
}

fn replace_all_<M>(f: &Formula, m: &M, rep: &dyn Fn(&MatchResult) -> Result<Formula>) -> Result<Formula>
where
    M: Matcher<Formula>,
{
    let cs = f
        .children()
        .iter()
        .map(|c| replace_all_(c, m, rep))
        .collect::<Result<Vec<_>>>()?;
    let g = if cs.is_empty() { f.clone() } else { f.with_children(cs) };
    match m.match_(&g, &MatchResult::new()).first() {
        Some(r) => rep(r),
        None => Ok(g),
    }
}

/// Build `tpl`, replacing its named formulas and free variables by what
/// `r` binds them to.
///
/// Binders of `tpl` are renamed when they would capture a variable of
/// a bound value.
pub fn instantiate(tpl: &Formula, r: &MatchResult) -> Result<Formula> {
    let avoid = r.all_variables();
    let mut scope = vec![];
    instantiate_(tpl, r, &mut scope, &avoid)
}

fn instantiate_(
    f: &Formula,
    r: &MatchResult,
    scope: &mut Vec<(Variable, Variable)>,
    avoid: &VarSet,
) -> Result<Formula> {
    match f.view() {
        FPred(p, args) => {
            let args = instantiate_terms(args, r, scope)?;
            Ok(Formula::pred(p.clone(), args))
        }
        FNamed(n, args) => {
            let args = instantiate_terms(args, r, scope)?;
            match r.formula_ref(n.full()) {
                Some(rf) => rf.build(&args),
                None => Err(errorstr!("unbound formula reference `{}` in template", n)),
            }
        }
        FForAll(v, body) | FExists(v, body) => {
            let w = if avoid.contains(v) {
                Variable::fresh(v.name(), |x| avoid.contains(x))
            } else {
                v.clone()
            };
            scope.push((v.clone(), w.clone()));
            let body = instantiate_(body, r, scope, avoid);
            scope.pop();
            let body = body?;
            Ok(match f.view() {
                FForAll(..) => Formula::forall(w, body),
                _ => Formula::exists(w, body),
            })
        }
        _ => {
            let mut cs = vec![];
            for c in f.children() {
                cs.push(instantiate_(c, r, scope, avoid)?);
            }
            Ok(f.with_children(cs))
        }
    }
}

fn instantiate_terms(args: &[Term], r: &MatchResult, scope: &[(Variable, Variable)]) -> Result<Vec<Term>> {
    args.iter().map(|t| instantiate_term(t, r, scope)).collect()
}

fn instantiate_term(t: &Term, r: &MatchResult, scope: &[(Variable, Variable)]) -> Result<Term> {
    match t.view() {
        TVar(v) => {
            if let Some((_, w)) = scope.iter().rev().find(|(u, _)| u == v) {
                return Ok(Term::var(w.clone()));
            }
            r.term_ref(v.name())
                .cloned()
                .ok_or_else(|| errorstr!("unbound variable `{}` in template", v))
        }
        TConst(..) => Ok(t.clone()),
        TNamed(..) | TFun(..) => {
            let args = instantiate_terms(t.args(), r, scope)?;
            Ok(t.with_args(args.into_iter().collect()))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::matcher::FormulaMatcher as FM;

    fn atoms() -> (Formula, Formula, Formula) {
        (Formula::atom("A"), Formula::atom("B"), Formula::atom("C"))
    }

    #[test]
    fn test_replace_one_per_site() -> Result<()> {
        // ¬¬P ⇒ P, on ¬¬A ∧ ¬¬B
        let (a, b, _) = atoms();
        let f = Formula::and(vec![Formula::not(Formula::not(a.clone())), Formula::not(Formula::not(b.clone()))]);
        let m = FM::not(FM::not(FM::r("P")));
        let rep = template(Formula::atom("P"));
        let res = replace_one(&f, &m, &*rep)?;
        assert_eq!(res.len(), 2);
        assert!(res.iter().any(|g| g.is_identity_to(&Formula::and(vec![a.clone(), Formula::not(Formula::not(b.clone()))]))));
        let all = replace_all(&f, &m, &*rep)?;
        assert!(all.is_identity_to(&Formula::and(vec![a, b])));
        Ok(())
    }

    #[test]
    fn test_replace_flattens() -> Result<()> {
        // P → Q ⇒ ¬P ∨ Q, on A ∨ (B → C)
        let (a, b, c) = atoms();
        let f = Formula::or(vec![a.clone(), Formula::imply(b.clone(), c.clone())]);
        let m = FM::imply(FM::r("P"), FM::r("Q"));
        let rep = template(Formula::or(vec![Formula::not(Formula::atom("P")), Formula::atom("Q")]));
        let res = replace_one(&f, &m, &*rep)?;
        assert_eq!(res.len(), 1);
        assert!(res[0].is_identity_to(&Formula::or(vec![a, Formula::not(b), c])));
        Ok(())
    }

    #[test]
    fn test_instantiate_avoids_capture() -> Result<()> {
        // template ∀x. P, with P := (x = y)
        let mut r = MatchResult::new();
        let x = Variable::new("x");
        r.bind_formula("P".into(), super::super::RefFormula::new(Formula::equal(Term::var(x.clone()), Term::var_str("y"))));
        let f = instantiate(&Formula::forall(x.clone(), Formula::atom("P")), &r)?;
        match f.view() {
            FForAll(w, body) => {
                assert_ne!(w, &x);
                assert!(body.variables().contains(&x));
            }
            _ => panic!("expected a quantifier, got {}", f),
        }
        Ok(())
    }

    #[test]
    fn test_instantiate_unbound() {
        let r = MatchResult::new();
        assert!(instantiate(&Formula::atom("P"), &r).is_err());
        assert!(instantiate(&Formula::equal(Term::var_str("x"), Term::var_str("x")), &r).is_err());
    }
}
