//! # Rules built from matchers
//!
//! A `MatcherRule` rewrites with one matcher and one replacer. A
//! `MatcherEquivRule` is a definition: it rewrites in both directions.

use super::{Deduction, LogicRule, Rule, Toward};
use crate::{
    context::FormulaContext,
    errorstr,
    kernel::{Formula, FormulaView::*, QualifiedName, RStr, Term},
    matcher::{replace_all, replace_one, template, FormulaMatcher, Replacer},
    Result,
};
use std::{
    collections::{BTreeSet, HashSet},
    fmt,
};

/// Rewrite rule `matcher ⇒ replacer`.
pub struct MatcherRule {
    name: QualifiedName,
    description: String,
    matcher: FormulaMatcher,
    replacer: Replacer,
}

/// Bidirectional rule `lhs ⇔ rhs`.
pub struct MatcherEquivRule {
    name: QualifiedName,
    description: String,
    forward: (FormulaMatcher, Replacer),
    backward: (FormulaMatcher, Replacer),
}

impl MatcherRule {
    pub fn new(name: QualifiedName, description: &str, matcher: FormulaMatcher, replacer: Replacer) -> Self {
        MatcherRule {
            name,
            description: description.to_string(),
            matcher,
            replacer,
        }
    }

    /// Rewrites of `f`: one per match site, then the rewrite of every
    /// site at once if it is new.
    pub fn apply_one(&self, f: &Formula) -> Result<Vec<Formula>> {
        let mut out = vec![];
        rewrite_into(f, &self.matcher, &self.replacer, &mut out)?;
        Ok(out)
    }
}

impl MatcherEquivRule {
    pub fn new(
        name: QualifiedName,
        description: &str,
        forward: (FormulaMatcher, Replacer),
        backward: (FormulaMatcher, Replacer),
    ) -> Self {
        MatcherEquivRule {
            name,
            description: description.to_string(),
            forward,
            backward,
        }
    }

    /// Definition `lhs ⇔ rhs`.
    ///
    /// Named formulas of the patterns are references, their variables
    /// are term references. See `check_definition` for the requirements.
    pub fn from_formulas(name: QualifiedName, lhs: Formula, rhs: Formula, description: &str) -> Result<Self> {
        check_definition(&lhs, &rhs)?;
        crate::logdebug!("define {}: {} ⇔ {}", name, lhs, rhs);
        let forward = (FormulaMatcher::from_formula(&lhs), template(rhs.clone()));
        let backward = (FormulaMatcher::from_formula(&rhs), template(lhs));
        Ok(Self::new(name, description, forward, backward))
    }

    /// Rewrites of `f` in both directions, without duplicates.
    pub fn apply_one(&self, f: &Formula) -> Result<Vec<Formula>> {
        let mut out = vec![];
        rewrite_into(f, &self.forward.0, &self.forward.1, &mut out)?;
        rewrite_into(f, &self.backward.0, &self.backward.1, &mut out)?;
        Ok(out)
    }
}

/// Push the rewrites of `f` into `out`, skipping formulas identical to
/// one already there.
fn rewrite_into(f: &Formula, m: &FormulaMatcher, rep: &Replacer, out: &mut Vec<Formula>) -> Result<()> {
    let add = |g: Formula, out: &mut Vec<Formula>| {
        if out.iter().all(|h| !h.is_identity_to(&g)) {
            out.push(g)
        }
    };
    for g in replace_one(f, m, &**rep)? {
        add(g, out);
    }
    let g = replace_all(f, m, &**rep)?;
    if !g.is_identity_to(f) {
        add(g, out);
    }
    Ok(())
}

/// Check that `lhs ⇔ rhs` can be used as a definition.
///
/// Parameters of named formulas must be variables, and both sides must
/// have the same free variables and the same named formulas.
pub fn check_definition(lhs: &Formula, rhs: &Formula) -> Result<()> {
    let mut names_l = HashSet::new();
    let mut names_r = HashSet::new();
    collect_refs(lhs, &mut names_l)?;
    collect_refs(rhs, &mut names_r)?;
    if let Some(n) = names_l.symmetric_difference(&names_r).next() {
        return Err(errorstr!("formula `{}` must occur on both sides of a definition", n));
    }
    if let Some(v) = lhs.variables().symmetric_difference(rhs.variables()).next() {
        return Err(errorstr!("variable `{}` must be free on both sides of a definition", v));
    }
    Ok(())
}

fn collect_refs(f: &Formula, names: &mut HashSet<RStr>) -> Result<()> {
    match f.view() {
        FNamed(n, args) => {
            if let Some(t) = args.iter().find(|t| t.as_var().is_none()) {
                return Err(errorstr!("parameter `{}` of `{}` must be a variable", t, n));
            }
            names.insert(n.full().into());
        }
        _ => {
            for c in f.children() {
                collect_refs(c, names)?;
            }
        }
    }
    Ok(())
}

/// Scan `ctx` from the most recent formula, stop at the first rewrite
/// identical to `desired`.
fn toward_recent<F>(name: &QualifiedName, ctx: &FormulaContext, desired: &Formula, one: F) -> Result<Toward>
where
    F: Fn(&Formula) -> Result<Vec<Formula>>,
{
    let mut candidates = vec![];
    for f in ctx.formulas().iter().rev() {
        for g in one(f)? {
            if g.is_identity_to(desired) {
                crate::logtrace!("rule {}: reached {} from {}", name, desired, f);
                return Ok(Toward::Reached(Deduction::new(name, desired.clone(), vec![f.clone()])));
            }
            candidates.push(Deduction::new(name, g, vec![f.clone()]));
        }
    }
    Ok(Toward::NotReached(candidates))
}

fn incremental<F>(name: &QualifiedName, obtained: &BTreeSet<Formula>, desired: &Formula, one: F) -> Result<Toward>
where
    F: Fn(&Formula) -> Result<Vec<Formula>>,
{
    let mut candidates = vec![];
    for f in obtained {
        for g in one(f)? {
            if g.is_identity_to(desired) {
                return Ok(Toward::Reached(Deduction::new(name, desired.clone(), vec![f.clone()])));
            }
            candidates.push(Deduction::new(name, g, vec![f.clone()]));
        }
    }
    Ok(Toward::NotReached(candidates))
}

fn apply_each<F>(name: &QualifiedName, ctx: &FormulaContext, one: F) -> Result<Vec<Deduction>>
where
    F: Fn(&Formula) -> Result<Vec<Formula>>,
{
    let mut out = vec![];
    for f in ctx.formulas() {
        for g in one(f)? {
            out.push(Deduction::new(name, g, vec![f.clone()]));
        }
    }
    Ok(out)
}

impl Rule for MatcherRule {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, ctx: &FormulaContext, _: &[Formula], _: &[Term]) -> Result<Vec<Deduction>> {
        apply_each(&self.name, ctx, |f| self.apply_one(f))
    }

    fn apply_toward(&self, ctx: &FormulaContext, _: &[Formula], _: &[Term], desired: &Formula) -> Result<Toward> {
        toward_recent(&self.name, ctx, desired, |f| self.apply_one(f))
    }

    fn as_logic(&self) -> Option<&dyn LogicRule> {
        Some(self)
    }
}

impl LogicRule for MatcherRule {
    fn apply_incremental(
        &self,
        _: &FormulaContext,
        obtained: &BTreeSet<Formula>,
        _: &[Formula],
        _: &[Term],
        desired: &Formula,
    ) -> Result<Toward> {
        incremental(&self.name, obtained, desired, |f| self.apply_one(f))
    }
}

impl Rule for MatcherEquivRule {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply(&self, ctx: &FormulaContext, _: &[Formula], _: &[Term]) -> Result<Vec<Deduction>> {
        apply_each(&self.name, ctx, |f| self.apply_one(f))
    }

    fn apply_toward(&self, ctx: &FormulaContext, _: &[Formula], _: &[Term], desired: &Formula) -> Result<Toward> {
        toward_recent(&self.name, ctx, desired, |f| self.apply_one(f))
    }

    fn as_logic(&self) -> Option<&dyn LogicRule> {
        Some(self)
    }
}

impl LogicRule for MatcherEquivRule {
    fn apply_incremental(
        &self,
        _: &FormulaContext,
        obtained: &BTreeSet<Formula>,
        _: &[Formula],
        _: &[Term],
        desired: &Formula,
    ) -> Result<Toward> {
        incremental(&self.name, obtained, desired, |f| self.apply_one(f))
    }
}

impl fmt::Debug for MatcherRule {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        write!(out, "MatcherRule({}, {:?})", self.name.full(), self.matcher)
    }
}

impl fmt::Debug for MatcherEquivRule {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        write!(out, "MatcherEquivRule({})", self.name.full())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kernel::{Term, Variable};

    fn def_imply() -> MatcherEquivRule {
        let (p, q) = (Formula::atom("P"), Formula::atom("Q"));
        MatcherEquivRule::from_formulas(
            QualifiedName::of("DefImply", &["test"]),
            Formula::imply(p.clone(), q.clone()),
            Formula::or(vec![Formula::not(p), q]),
            "P→Q ⇔ ¬P∨Q",
        )
        .unwrap()
    }

    #[test]
    fn test_def_round_trip() -> Result<()> {
        let rule = def_imply();
        let (a, b) = (Formula::atom("A"), Formula::atom("B"));
        let f = Formula::imply(a.clone(), b.clone());
        let fwd = rule.apply_one(&f)?;
        let g = Formula::or(vec![Formula::not(a), b]);
        assert!(fwd.iter().any(|x| x.is_identity_to(&g)));
        let back = rule.apply_one(&g)?;
        assert!(back.iter().any(|x| x.is_identity_to(&f)));
        Ok(())
    }

    #[test]
    fn test_toward_prefers_recent() -> Result<()> {
        let rule = def_imply();
        let (a, b) = (Formula::atom("A"), Formula::atom("B"));
        let ctx = FormulaContext::from_formulas(vec![
            Formula::imply(a.clone(), b.clone()),
            Formula::or(vec![Formula::not(a.clone()), b.clone()]),
        ]);
        let goal = Formula::imply(a, b);
        let d = rule.apply_toward(&ctx, &[], &[], &goal)?.reached();
        let d = d.expect("goal should be reached");
        // found by rewriting the second formula backward
        assert_eq!(d.dependencies, vec![ctx.formulas()[1].clone()]);
        Ok(())
    }

    #[test]
    fn test_check_definition() {
        let x = Term::var_str("x");
        let p = Formula::atom("P");
        // parameter is not a variable
        let c = Term::constant(crate::kernel::Constant::new(QualifiedName::new("c")));
        let bad = Formula::named(QualifiedName::new("phi"), vec![c]);
        assert!(check_definition(&bad, &bad).is_err());
        // reference on one side only
        assert!(check_definition(&p, &Formula::atom("Q")).is_err());
        // free variable on one side only
        let lhs = Formula::equal(x.clone(), x.clone());
        let rhs = Formula::forall(Variable::new("x"), Formula::equal(x.clone(), x.clone()));
        assert!(check_definition(&lhs, &rhs).is_err());
        assert!(check_definition(&lhs, &Formula::equal(x.clone(), x)).is_ok());
    }

    #[test]
    fn test_replace_all_added_once() -> Result<()> {
        // ¬¬P ⇒ P on ¬¬A ∧ ¬¬A: each site gives the same formula
        let rule = MatcherRule::new(
            QualifiedName::new("dn"),
            "",
            FormulaMatcher::not(FormulaMatcher::not(FormulaMatcher::r("P"))),
            template(Formula::atom("P")),
        );
        let a = Formula::atom("A");
        let nna = Formula::not(Formula::not(a.clone()));
        let res = rule.apply_one(&Formula::and(vec![nna.clone(), nna.clone()]))?;
        assert_eq!(res.len(), 2);
        assert!(res.iter().any(|g| g.is_identity_to(&Formula::and(vec![a.clone(), a.clone()]))));
        Ok(())
    }
}
