//! # Multi-step search
//!
//! `LogicSearch` combines logic rules for a bounded number of rounds.
//! Each round applies every rule to the formulas obtained by the previous
//! round only. Formulas are deduplicated by regular form, and each one
//! remembers the step that produced it, so a reached goal comes with its
//! provenance back to the formulas of the context.

use super::{Deduction, DeductionNode, Rule, Toward};
use crate::{
    context::FormulaContext,
    errorstr,
    kernel::{Formula, QualifiedName, Ref, Term},
    rule::logic,
    Result,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

/// Apply logic rules for several rounds, see the module documentation.
#[derive(Clone)]
pub struct LogicSearch {
    name: QualifiedName,
    rules: Vec<Ref<dyn Rule>>,
    depth: usize,
}

/// How a formula was reached.
struct Step {
    formula: Formula,
    /// `None` for formulas of the context.
    rule: Option<QualifiedName>,
    /// Regular forms of the direct premises.
    premises: Vec<Formula>,
    /// Formulas of the context this step ultimately rests on.
    roots: Vec<Formula>,
}

type Reached = BTreeMap<Formula, Ref<Step>>;

impl LogicSearch {
    /// Search with `rules`, which must all be logic rules.
    pub fn new(rules: Vec<Ref<dyn Rule>>, depth: usize) -> Result<Self> {
        let mut s = LogicSearch {
            name: logic::name_of("Logic"),
            rules: vec![],
            depth,
        };
        for r in rules {
            s.push_rule(r)?;
        }
        Ok(s)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Names of the combined rules.
    pub fn rule_names(&self) -> impl Iterator<Item = &QualifiedName> + '_ {
        self.rules.iter().map(|r| r.name())
    }

    /// Copy of this search, also using `rule`.
    pub fn with_rule(&self, rule: Ref<dyn Rule>) -> Result<Self> {
        let mut s = self.clone();
        s.push_rule(rule)?;
        Ok(s)
    }

    /// Copy of this search, with another depth.
    pub fn with_depth(&self, depth: usize) -> Self {
        LogicSearch {
            depth,
            ..self.clone()
        }
    }

    fn push_rule(&mut self, rule: Ref<dyn Rule>) -> Result<()> {
        if rule.as_logic().is_none() {
            return Err(errorstr!("rule `{}` cannot be used in a search", rule.name()));
        }
        if self.rules.iter().any(|r| r.name() == rule.name()) {
            return Err(errorstr!("rule `{}` is already part of the search", rule.name()));
        }
        self.rules.push(rule);
        Ok(())
    }

    fn search(
        &self,
        ctx: &FormulaContext,
        formulas: &[Formula],
        terms: &[Term],
        desired: &Formula,
    ) -> Result<Option<Deduction>> {
        let mut ctx = ctx.clone();
        let mut reached: Reached = ctx
            .regular_forms()
            .iter()
            .map(|(rf, f)| {
                let step = Step {
                    formula: f.clone(),
                    rule: None,
                    premises: vec![],
                    roots: vec![f.clone()],
                };
                (rf.clone(), Ref::new(step))
            })
            .collect();
        let mut obtained: BTreeSet<Formula> = reached.keys().cloned().collect();

        for round in 0..self.depth {
            let mut new_obtained = BTreeSet::new();
            for rule in &self.rules {
                let lr = match rule.as_logic() {
                    Some(lr) => lr,
                    None => continue,
                };
                match lr.apply_incremental(&ctx, &obtained, formulas, terms, desired)? {
                    Toward::Reached(d) => {
                        crate::logdebug!("search: reached {} by {} in round {}", desired, d.rule, round);
                        return Ok(Some(self.conclude(d, &reached)));
                    }
                    Toward::NotReached(ds) => {
                        for d in ds {
                            let rf = d.formula.regular_form();
                            if reached.contains_key(&rf) {
                                continue;
                            }
                            crate::logtrace!("search: {} by {}", d.formula, d.rule);
                            let step = self.step(d, &reached);
                            reached.insert(rf.clone(), Ref::new(step));
                            new_obtained.insert(rf);
                        }
                    }
                }
            }
            crate::logdebug!(
                "search: round {} obtained {} new formulas ({} known)",
                round,
                new_obtained.len(),
                reached.len()
            );
            if new_obtained.is_empty() {
                break;
            }
            ctx.add_all(new_obtained.iter().cloned());
            obtained = new_obtained;
        }
        Ok(None)
    }

    /// Record the step producing `d`.
    fn step(&self, d: Deduction, reached: &Reached) -> Step {
        let premises: Vec<Formula> = d.dependencies.iter().map(|f| f.regular_form()).collect();
        let mut roots = vec![];
        for (p, dep) in premises.iter().zip(d.dependencies.iter()) {
            match reached.get(p) {
                Some(s) => {
                    for r in &s.roots {
                        if !roots.contains(r) {
                            roots.push(r.clone());
                        }
                    }
                }
                None => roots.push(dep.clone()),
            }
        }
        Step {
            formula: d.formula,
            rule: Some(d.rule),
            premises,
            roots,
        }
    }

    /// Deduction of the goal from the last step `d`.
    fn conclude(&self, d: Deduction, reached: &Reached) -> Deduction {
        let info = d.info.clone();
        let last = self.step(d, reached);
        let mut cache = BTreeMap::new();
        let children = last
            .premises
            .iter()
            .map(|p| build_tree(p, reached, &mut cache))
            .collect();
        let tree = DeductionNode {
            formula: last.formula.clone(),
            rule: last.rule.clone(),
            children,
        };
        let mut out = Deduction::new(&self.name, last.formula, last.roots).with_tree(Ref::new(tree));
        out.info = info;
        out
    }
}

fn build_tree(
    rf: &Formula,
    reached: &Reached,
    cache: &mut BTreeMap<Formula, Ref<DeductionNode>>,
) -> Ref<DeductionNode> {
    if let Some(n) = cache.get(rf) {
        return n.clone();
    }
    let node = match reached.get(rf) {
        None => DeductionNode::leaf(rf.clone()),
        Some(step) => {
            let children = step.premises.iter().map(|p| build_tree(p, reached, cache)).collect();
            Ref::new(DeductionNode {
                formula: step.formula.clone(),
                rule: step.rule.clone(),
                children,
            })
        }
    };
    cache.insert(rf.clone(), node.clone());
    node
}

impl Rule for LogicSearch {
    fn name(&self) -> &QualifiedName {
        &self.name
    }

    fn description(&self) -> &str {
        "Combination of all logic rules."
    }

    fn apply(&self, _: &FormulaContext, _: &[Formula], _: &[Term]) -> Result<Vec<Deduction>> {
        Ok(vec![])
    }

    fn apply_toward(
        &self,
        ctx: &FormulaContext,
        formulas: &[Formula],
        terms: &[Term],
        desired: &Formula,
    ) -> Result<Toward> {
        Ok(match self.search(ctx, formulas, terms, desired)? {
            Some(d) => Toward::Reached(d),
            None => Toward::NotReached(vec![]),
        })
    }

    fn as_search(&self) -> Option<&LogicSearch> {
        Some(self)
    }
}

impl fmt::Debug for LogicSearch {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<_> = self.rule_names().map(|n| n.full()).collect();
        write!(out, "LogicSearch(depth={}, {:?})", self.depth, names)
    }
}
