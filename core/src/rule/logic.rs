//! # Rules of first order logic
//!
//! Every rule lives in the `logic` namespace. Most of them are
//! `MatcherRule`s; the others need to look at the whole context.

use super::{
    toward_from_context, Deduction, LogicRule, LogicSearch, MatcherEquivRule, MatcherRule, Rule, Toward,
};
use crate::{
    config::DEFAULT_SEARCH_DEPTH,
    context::FormulaContext,
    kernel::{Formula, FormulaView::*, QualifiedName, Ref, Term, TermView::*},
    matcher::{FormulaMatcher as FM, MatchResult, Matcher, TermMatcher},
    Result,
};
use std::collections::BTreeSet;

pub const NAMESPACE: &str = "logic";

/// `logic.<name>`.
pub fn name_of(name: &str) -> QualifiedName {
    QualifiedName::of(name, &[NAMESPACE])
}

fn p() -> FM {
    FM::r("P")
}
fn q() -> FM {
    FM::r("Q")
}
fn r() -> FM {
    FM::r("R")
}

fn of<F>(name: &str, description: &str, m: FM, rep: F) -> Ref<dyn Rule>
where
    F: Fn(&MatchResult) -> Result<Formula> + 'static,
{
    Ref::new(MatcherRule::new(name_of(name), description, m, Ref::new(rep)))
}

fn def(name: &str, description: &str, lhs: Formula, rhs: Formula) -> Result<Ref<dyn Rule>> {
    let rule = MatcherEquivRule::from_formulas(name_of(name), lhs, rhs, description)?;
    Ok(Ref::new(rule))
}

/// `P ∧ rest`, or `P` without rest.
fn with_rest(rest: Option<Formula>, f: Formula, and: bool) -> Formula {
    match (rest, and) {
        (None, _) => f,
        (Some(r), true) => Formula::and(vec![r, f]),
        (Some(r), false) => Formula::or(vec![r, f]),
    }
}

pub fn double_negate() -> Ref<dyn Rule> {
    of("DoubleNegate", "¬¬P ⇒ P", FM::not(FM::not(p())), |m| m.get("P"))
}

pub fn identity_and() -> Ref<dyn Rule> {
    of("IdentityAnd", "P∧P ⇒ P", FM::and_with(vec![p(), p()], q()), |m| {
        Ok(with_rest(m.opt("Q"), m.get("P")?, true))
    })
}

pub fn identity_or() -> Ref<dyn Rule> {
    of("IdentityOr", "P∨P ⇒ P", FM::or_with(vec![p(), p()], q()), |m| {
        Ok(with_rest(m.opt("Q"), m.get("P")?, false))
    })
}

pub fn absorption_and() -> Ref<dyn Rule> {
    let m = FM::and_with(vec![p(), FM::or_with(vec![p()], q())], r());
    of("AbsorptionAnd", "P∧(P∨Q) ⇒ P", m, |m| Ok(with_rest(m.opt("R"), m.get("P")?, true)))
}

pub fn absorption_or() -> Ref<dyn Rule> {
    let m = FM::or_with(vec![p(), FM::and_with(vec![p()], q())], r());
    of("AbsorptionOr", "P∨(P∧Q) ⇒ P", m, |m| Ok(with_rest(m.opt("R"), m.get("P")?, false)))
}

pub fn and_project() -> Ref<dyn Rule> {
    of("AndProject", "P∧Q ⇒ P", FM::and_with(vec![p()], q()), |m| m.get("P"))
}

pub fn imply_compose() -> Ref<dyn Rule> {
    let m = FM::and(vec![FM::imply(p(), q()), FM::imply(q(), r())]);
    of("ImplyCompose", "(P→Q)∧(Q→R) ⇒ P→R", m, |m| {
        Ok(Formula::imply(m.get("P")?, m.get("R")?))
    })
}

pub fn def_imply() -> Result<Ref<dyn Rule>> {
    let (p, q) = (Formula::atom("P"), Formula::atom("Q"));
    let lhs = Formula::imply(p.clone(), q.clone());
    def("DefImply", "P→Q ⇔ ¬P∨Q", lhs, Formula::or(vec![Formula::not(p), q]))
}

pub fn def_equiv_to() -> Result<Ref<dyn Rule>> {
    let (p, q) = (Formula::atom("P"), Formula::atom("Q"));
    let lhs = Formula::and(vec![Formula::imply(p.clone(), q.clone()), Formula::imply(q.clone(), p.clone())]);
    def("DefEquivTo", "(P→Q)∧(Q→P) ⇔ P↔Q", lhs, Formula::equiv(p, q))
}

pub fn equal_replace() -> Ref<dyn Rule> {
    let phi = |x: &str| FM::var_ref("phi", vec![TermMatcher::r(x)]);
    let m = FM::and(vec![FM::equal("x", "y"), phi("x")]);
    of("EqualReplace", "x=y ∧ φ(x) ⇒ φ(y)", m, |m| m.apply("phi", &[m.term("y")?]))
}

pub fn for_any_and() -> Ref<dyn Rule> {
    let app = |f: &str| FM::var_ref(f, vec![TermMatcher::r("x")]);
    let m = FM::and(vec![FM::forall("x", app("phi")), FM::forall("x", app("psi"))]);
    of("ForAnyAnd", "∀xφ(x) ∧ ∀xψ(x) ⇒ ∀x(φ(x)∧ψ(x))", m, |m| {
        let z = m.unused_var();
        let zt = Term::var(z.clone());
        let body = Formula::and(vec![m.apply("phi", &[zt.clone()])?, m.apply("psi", &[zt])?]);
        Ok(Formula::forall(z, body))
    })
}

/// `(A∧B)∧C ⇒ A∧B∧C`: reached if the flattened regular forms agree.
#[derive(Debug)]
pub struct Flatten {
    name: QualifiedName,
}

/// `P, Q ⇒ P∧Q`.
#[derive(Debug)]
pub struct AndConstruct {
    name: QualifiedName,
}

/// Modus ponens, `P, P→Q ⇒ Q`.
#[derive(Debug)]
pub struct Imply {
    name: QualifiedName,
}

/// `⇒ P∨¬P`.
#[derive(Debug)]
pub struct ExcludeMiddle {
    name: QualifiedName,
    matcher: FM,
}

/// `φ(c) ⇒ ∃x φ(x)`, for a constant `c`.
///
/// Deductions record the abstracted constant under `"constant"`.
#[derive(Debug)]
pub struct ExistConstant {
    name: QualifiedName,
}

impl Flatten {
    pub fn new() -> Self {
        Flatten { name: name_of("Flatten") }
    }

    fn toward<'a, I>(&self, subjects: I, desired: &Formula) -> Toward
    where
        I: Iterator<Item = (&'a Formula, &'a Formula)>,
    {
        let target = desired.flatten().regular_form();
        let mut candidates = vec![];
        for (rf, f) in subjects {
            let g = rf.flatten();
            if g.regular_form() == target {
                return Toward::Reached(Deduction::new(&self.name, desired.clone(), vec![f.clone()]));
            }
            if g != *rf {
                candidates.push(Deduction::new(&self.name, g, vec![f.clone()]));
            }
        }
        Toward::NotReached(candidates)
    }
}

impl Rule for Flatten {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn description(&self) -> &str {
        "(A∧B)∧C ⇒ A∧B∧C, (A∨B)∨C ⇒ A∨B∨C"
    }

    fn apply(&self, ctx: &FormulaContext, _: &[Formula], _: &[Term]) -> Result<Vec<Deduction>> {
        Ok(ctx
            .formulas()
            .iter()
            .map(|f| (f, f.flatten()))
            .filter(|(f, g)| *f != g)
            .map(|(f, g)| Deduction::new(&self.name, g, vec![f.clone()]))
            .collect())
    }

    fn apply_toward(&self, ctx: &FormulaContext, _: &[Formula], _: &[Term], desired: &Formula) -> Result<Toward> {
        Ok(self.toward(ctx.regular_forms().iter(), desired))
    }

    fn as_logic(&self) -> Option<&dyn LogicRule> {
        Some(self)
    }
}

impl LogicRule for Flatten {
    fn apply_incremental(
        &self,
        _: &FormulaContext,
        obtained: &BTreeSet<Formula>,
        _: &[Formula],
        _: &[Term],
        desired: &Formula,
    ) -> Result<Toward> {
        Ok(self.toward(obtained.iter().map(|f| (f, f)), desired))
    }
}

impl AndConstruct {
    pub fn new() -> Self {
        AndConstruct { name: name_of("AndConstruct") }
    }
}

impl Rule for AndConstruct {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn description(&self) -> &str {
        "P,Q ⇒ P∧Q"
    }

    /// The conjunction of the hinted `formulas`, if they are all known.
    fn apply(&self, ctx: &FormulaContext, formulas: &[Formula], _: &[Term]) -> Result<Vec<Deduction>> {
        if formulas.len() < 2 {
            return Ok(vec![]);
        }
        let deps: Option<Vec<Formula>> = formulas
            .iter()
            .map(|f| ctx.by_regular_form(&f.regular_form()).cloned())
            .collect();
        Ok(match deps {
            Some(deps) => vec![Deduction::new(&self.name, Formula::and(formulas.to_vec()), deps)],
            None => vec![],
        })
    }

    fn apply_toward(&self, ctx: &FormulaContext, formulas: &[Formula], terms: &[Term], desired: &Formula) -> Result<Toward> {
        toward_from_context(self, ctx, formulas, terms, desired)
    }

    fn as_logic(&self) -> Option<&dyn LogicRule> {
        Some(self)
    }
}

impl LogicRule for AndConstruct {
    fn apply_incremental(
        &self,
        ctx: &FormulaContext,
        obtained: &BTreeSet<Formula>,
        _: &[Formula],
        _: &[Term],
        desired: &Formula,
    ) -> Result<Toward> {
        let cs = match desired.view() {
            FAnd(cs) => cs,
            _ => return Ok(Toward::NotReached(vec![])),
        };
        let mut deps = vec![];
        for c in cs {
            let rf = c.regular_form();
            match ctx.by_regular_form(&rf) {
                Some(f) => deps.push(f.clone()),
                None if obtained.contains(&rf) => deps.push(rf),
                None => return Ok(Toward::NotReached(vec![])),
            }
        }
        Ok(Toward::Reached(Deduction::new(&self.name, desired.clone(), deps)))
    }
}

impl Imply {
    pub fn new() -> Self {
        Imply { name: name_of("Imply") }
    }

    /// `(Q, [P→Q, P])` for every implication among `subjects` whose
    /// premise is known in `ctx`.
    fn consequences<'a, I>(&self, ctx: &FormulaContext, subjects: I) -> Vec<(Formula, Vec<Formula>)>
    where
        I: IntoIterator<Item = &'a Formula>,
    {
        let mut out = vec![];
        for f in subjects {
            if let FImply(a, b) = f.view() {
                if let Some(src) = ctx.by_regular_form(&a.regular_form()) {
                    out.push((b.clone(), vec![f.clone(), src.clone()]));
                }
            }
        }
        out
    }

    /// `(Q, [P→Q, P])` for every implication of `ctx` whose premise was
    /// just obtained.
    fn from_premises(&self, ctx: &FormulaContext, obtained: &BTreeSet<Formula>) -> Vec<(Formula, Vec<Formula>)> {
        let mut out = vec![];
        for (rf, f) in ctx.regular_forms() {
            if obtained.contains(rf) {
                // handled by `consequences`
                continue;
            }
            if let FImply(a, b) = f.view() {
                let ra = a.regular_form();
                if obtained.contains(&ra) {
                    out.push((b.clone(), vec![f.clone(), ra]));
                }
            }
        }
        out
    }
}

impl Rule for Imply {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn description(&self) -> &str {
        "P, P→Q ⇒ Q"
    }

    fn apply(&self, ctx: &FormulaContext, _: &[Formula], _: &[Term]) -> Result<Vec<Deduction>> {
        Ok(self
            .consequences(ctx, ctx.formulas())
            .into_iter()
            .map(|(g, deps)| Deduction::new(&self.name, g, deps))
            .collect())
    }

    fn apply_toward(&self, ctx: &FormulaContext, formulas: &[Formula], terms: &[Term], desired: &Formula) -> Result<Toward> {
        toward_from_context(self, ctx, formulas, terms, desired)
    }

    fn as_logic(&self) -> Option<&dyn LogicRule> {
        Some(self)
    }
}

impl LogicRule for Imply {
    fn apply_incremental(
        &self,
        ctx: &FormulaContext,
        obtained: &BTreeSet<Formula>,
        _: &[Formula],
        _: &[Term],
        desired: &Formula,
    ) -> Result<Toward> {
        let target = desired.regular_form();
        let mut candidates = vec![];
        let found = self.consequences(ctx, obtained).into_iter().chain(self.from_premises(ctx, obtained));
        for (g, deps) in found {
            if g.regular_form() == target {
                return Ok(Toward::Reached(Deduction::new(&self.name, desired.clone(), deps)));
            }
            candidates.push(Deduction::new(&self.name, g, deps));
        }
        Ok(Toward::NotReached(candidates))
    }
}

impl ExcludeMiddle {
    pub fn new() -> Self {
        ExcludeMiddle {
            name: name_of("ExcludeMiddle"),
            matcher: FM::or(vec![p(), FM::not(p())]),
        }
    }
}

impl Rule for ExcludeMiddle {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn description(&self) -> &str {
        "⇒ P∨¬P"
    }

    /// `P∨¬P` for each hinted formula `P`.
    fn apply(&self, _: &FormulaContext, formulas: &[Formula], _: &[Term]) -> Result<Vec<Deduction>> {
        Ok(formulas
            .iter()
            .map(|f| {
                let g = Formula::or(vec![f.clone(), Formula::not(f.clone())]);
                Deduction::new(&self.name, g, vec![])
            })
            .collect())
    }

    fn apply_toward(&self, ctx: &FormulaContext, formulas: &[Formula], terms: &[Term], desired: &Formula) -> Result<Toward> {
        toward_from_context(self, ctx, formulas, terms, desired)
    }

    fn as_logic(&self) -> Option<&dyn LogicRule> {
        Some(self)
    }
}

impl LogicRule for ExcludeMiddle {
    fn apply_incremental(
        &self,
        _: &FormulaContext,
        _: &BTreeSet<Formula>,
        _: &[Formula],
        _: &[Term],
        desired: &Formula,
    ) -> Result<Toward> {
        if self.matcher.match_(desired, &MatchResult::new()).is_empty() {
            Ok(Toward::NotReached(vec![]))
        } else {
            Ok(Toward::Reached(Deduction::new(&self.name, desired.clone(), vec![])))
        }
    }
}

impl ExistConstant {
    pub fn new() -> Self {
        ExistConstant { name: name_of("ExistConstant") }
    }

    /// `∃x f[c := x]` for each constant `c` of `f`, or each of `given`.
    fn abstractions(f: &Formula, given: &[Term]) -> Vec<(Formula, Term)> {
        let x = f.next_var();
        let xt = Term::var(x.clone());
        let constants: Vec<Term> = if given.is_empty() {
            f.all_constants().into_iter().map(Term::constant).collect()
        } else {
            given.to_vec()
        };
        constants
            .into_iter()
            .map(|c| (Formula::exists(x.clone(), f.replace_term(&c, &xt)), c))
            .collect()
    }

    fn given_constants(terms: &[Term]) -> Vec<Term> {
        terms.iter().filter(|t| matches!(t.view(), TConst(_))).cloned().collect()
    }
}

impl Rule for ExistConstant {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn description(&self) -> &str {
        "φ(c) ⇒ ∃x φ(x)"
    }

    fn apply(&self, ctx: &FormulaContext, _: &[Formula], terms: &[Term]) -> Result<Vec<Deduction>> {
        let given = Self::given_constants(terms);
        let mut out = vec![];
        for f in ctx.formulas() {
            for (g, c) in Self::abstractions(f, &given) {
                out.push(Deduction::new(&self.name, g, vec![f.clone()]).with_info("constant", c));
            }
        }
        Ok(out)
    }

    fn apply_toward(&self, ctx: &FormulaContext, formulas: &[Formula], terms: &[Term], desired: &Formula) -> Result<Toward> {
        toward_from_context(self, ctx, formulas, terms, desired)
    }

    fn as_logic(&self) -> Option<&dyn LogicRule> {
        Some(self)
    }
}

impl LogicRule for ExistConstant {
    fn apply_incremental(
        &self,
        ctx: &FormulaContext,
        obtained: &BTreeSet<Formula>,
        _: &[Formula],
        terms: &[Term],
        desired: &Formula,
    ) -> Result<Toward> {
        let given = Self::given_constants(terms);
        let target = desired.regular_form();
        let mut candidates = vec![];
        for f in ctx.formulas().iter().chain(obtained.iter()) {
            for (g, c) in Self::abstractions(f, &given) {
                let rg = g.regular_form();
                if rg == target {
                    let d = Deduction::new(&self.name, desired.clone(), vec![f.clone()]);
                    return Ok(Toward::Reached(d.with_info("constant", c)));
                }
                if !obtained.contains(&rg) {
                    candidates.push(Deduction::new(&self.name, g, vec![f.clone()]).with_info("constant", c));
                }
            }
        }
        Ok(Toward::NotReached(candidates))
    }
}

/// Every rule of the catalogue.
pub fn rules() -> Result<Vec<Ref<dyn Rule>>> {
    let mut v = search_rules()?;
    v.push(Ref::new(ExistConstant::new()));
    Ok(v)
}

/// The rules the default search combines.
pub fn search_rules() -> Result<Vec<Ref<dyn Rule>>> {
    Ok(vec![
        Ref::new(Flatten::new()),
        double_negate(),
        identity_and(),
        identity_or(),
        absorption_and(),
        absorption_or(),
        Ref::new(AndConstruct::new()),
        and_project(),
        imply_compose(),
        def_imply()?,
        Ref::new(Imply::new()),
        def_equiv_to()?,
        equal_replace(),
        Ref::new(ExcludeMiddle::new()),
        for_any_and(),
    ])
}

/// `logic.Logic`, combining `search_rules` for `DEFAULT_SEARCH_DEPTH` rounds.
pub fn search() -> Result<LogicSearch> {
    LogicSearch::new(search_rules()?, DEFAULT_SEARCH_DEPTH)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kernel::{Constant, Variable};

    fn v(s: &str) -> Variable {
        Variable::new(s)
    }
    fn t(s: &str) -> Term {
        Term::var_str(s)
    }
    fn ctx(fs: Vec<Formula>) -> FormulaContext {
        FormulaContext::from_formulas(fs)
    }
    fn reaches(rule: &dyn Rule, fs: Vec<Formula>, goal: &Formula) -> Result<bool> {
        Ok(rule.apply_toward(&ctx(fs), &[], &[], goal)?.is_reached())
    }

    #[test]
    fn test_identity_or() -> Result<()> {
        let np = Formula::not(Formula::atom("P"));
        assert!(reaches(&*identity_or(), vec![Formula::or(vec![np.clone(), np.clone()])], &np)?);
        let (a, b) = (Formula::atom("A"), Formula::atom("B"));
        let f = Formula::or(vec![a.clone(), b.clone(), a.clone()]);
        assert!(reaches(&*identity_or(), vec![f], &Formula::or(vec![b, a]))?);
        Ok(())
    }

    #[test]
    fn test_absorption() -> Result<()> {
        let (a, b, c) = (Formula::atom("A"), Formula::atom("B"), Formula::atom("C"));
        let f = Formula::and(vec![c.clone(), a.clone(), Formula::or(vec![b, a.clone()])]);
        assert!(reaches(&*absorption_and(), vec![f], &Formula::and(vec![a, c]))?);
        Ok(())
    }

    #[test]
    fn test_and_construct() -> Result<()> {
        let (a, b, c) = (Formula::atom("A"), Formula::atom("B"), Formula::atom("C"));
        let rule = AndConstruct::new();
        let goal = Formula::and(vec![b.clone(), a.clone()]);
        let d = rule.apply_toward(&ctx(vec![a.clone(), b.clone()]), &[], &[], &goal)?.reached();
        assert_eq!(d.map(|d| d.dependencies), Some(vec![b.clone(), a.clone()]));
        assert!(!reaches(&rule, vec![a.clone()], &goal)?);
        assert!(!reaches(&rule, vec![a, b], &c)?);
        Ok(())
    }

    #[test]
    fn test_modus_ponens() -> Result<()> {
        let (a, b) = (Formula::atom("A"), Formula::atom("B"));
        let rule = Imply::new();
        let imp = Formula::imply(a.clone(), b.clone());
        let d = rule.apply_toward(&ctx(vec![a.clone(), imp.clone()]), &[], &[], &b)?.reached();
        assert_eq!(d.map(|d| d.dependencies), Some(vec![imp.clone(), a.clone()]));
        assert!(!reaches(&rule, vec![imp], &b)?);
        Ok(())
    }

    #[test]
    fn test_modus_ponens_late_premise() -> Result<()> {
        // the implication is old, its premise was just obtained
        let (a, b) = (Formula::atom("A"), Formula::atom("B"));
        let imp = Formula::imply(a.clone(), b.clone());
        let mut c = ctx(vec![imp.clone()]);
        c.add_formula(a.clone());
        let obtained: BTreeSet<Formula> = vec![a.regular_form()].into_iter().collect();
        let d = Imply::new().apply_incremental(&c, &obtained, &[], &[], &b)?.reached();
        assert_eq!(d.map(|d| d.dependencies), Some(vec![imp, a.regular_form()]));
        Ok(())
    }

    #[test]
    fn test_imply_compose() -> Result<()> {
        let (a, b, c) = (Formula::atom("A"), Formula::atom("B"), Formula::atom("C"));
        let f = Formula::and(vec![Formula::imply(b.clone(), c.clone()), Formula::imply(a.clone(), b)]);
        assert!(reaches(&*imply_compose(), vec![f], &Formula::imply(a, c))?);
        Ok(())
    }

    #[test]
    fn test_equal_replace() -> Result<()> {
        let p = crate::kernel::Predicate::new(QualifiedName::new("p"), 1, true);
        // a = b ∧ p(a) ⇒ p(b)
        let f = Formula::and(vec![Formula::equal(t("a"), t("b")), Formula::pred(p.clone(), vec![t("a")])]);
        assert!(reaches(&*equal_replace(), vec![f], &Formula::pred(p, vec![t("b")]))?);
        Ok(())
    }

    #[test]
    fn test_for_any_and() -> Result<()> {
        let p = crate::kernel::Predicate::new(QualifiedName::new("p"), 1, true);
        let q = crate::kernel::Predicate::new(QualifiedName::new("q"), 1, true);
        let f = Formula::and(vec![
            Formula::forall(v("x"), Formula::pred(p.clone(), vec![t("x")])),
            Formula::forall(v("y"), Formula::pred(q.clone(), vec![t("y")])),
        ]);
        let goal = Formula::forall(
            v("z"),
            Formula::and(vec![Formula::pred(p, vec![t("z")]), Formula::pred(q, vec![t("z")])]),
        );
        assert!(reaches(&*for_any_and(), vec![f], &goal)?);
        Ok(())
    }

    #[test]
    fn test_exclude_middle() -> Result<()> {
        let a = Formula::atom("A");
        let rule = ExcludeMiddle::new();
        assert!(reaches(&rule, vec![], &Formula::or(vec![Formula::not(a.clone()), a.clone()]))?);
        assert!(!reaches(&rule, vec![], &Formula::or(vec![a.clone(), a.clone()]))?);
        let wider = Formula::or(vec![a.clone(), Formula::not(a.clone()), Formula::atom("B")]);
        assert!(!reaches(&rule, vec![], &wider)?);
        let ds = rule.apply(&ctx(vec![]), &[a.clone()], &[])?;
        assert_eq!(ds.len(), 1);
        assert!(ds[0].dependencies.is_empty());
        Ok(())
    }

    #[test]
    fn test_exist_constant() -> Result<()> {
        let c = Constant::new(QualifiedName::new("c"));
        let ct = Term::constant(c);
        let f = Formula::equal(ct.clone(), t("y"));
        let goal = Formula::exists(v("w"), Formula::equal(t("w"), t("y")));
        let d = ExistConstant::new().apply_toward(&ctx(vec![f]), &[], &[], &goal)?.reached();
        let d = d.expect("goal should be reached");
        assert_eq!(d.info.get("constant"), Some(&ct));
        Ok(())
    }

    #[test]
    fn test_flatten() -> Result<()> {
        let (a, b, c) = (Formula::atom("A"), Formula::atom("B"), Formula::atom("C"));
        let f = Formula::and(vec![Formula::and(vec![a.clone(), b.clone()]), c.clone()]);
        let rule = Flatten::new();
        assert!(reaches(&rule, vec![f.clone()], &Formula::and(vec![c, b, a]))?);
        assert_eq!(rule.apply(&ctx(vec![f]), &[], &[])?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_catalogue_names() -> Result<()> {
        let rs = rules()?;
        let mut names: Vec<_> = rs.iter().map(|r| r.name().full().to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), rs.len());
        assert!(names.iter().all(|n| n.starts_with("logic.")));
        assert!(rs.iter().all(|r| r.as_logic().is_some()));
        Ok(())
    }
}
