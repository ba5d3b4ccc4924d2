//! # Rules and deductions
//!
//! A rule derives new formulas from the formulas of a context, either
//! exhaustively (`apply`) or toward a goal (`apply_toward`). Logic rules
//! can also be applied incrementally to the formulas obtained by the
//! previous round of a search.

use crate::{
    context::FormulaContext,
    kernel::{Formula, QualifiedName, Ref, Term},
    Result,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

pub mod logic;
pub mod matcher_rule;
pub mod search;

pub use matcher_rule::{check_definition, MatcherEquivRule, MatcherRule};
pub use search::LogicSearch;

/// A transformation rule of a structure.
pub trait Rule: fmt::Debug {
    fn name(&self) -> &QualifiedName;

    fn description(&self) -> &str;

    /// All the one-step consequences of the formulas of `ctx`.
    ///
    /// `formulas` and `terms` are optional hints, some rules use them
    /// as extra inputs.
    fn apply(&self, ctx: &FormulaContext, formulas: &[Formula], terms: &[Term]) -> Result<Vec<Deduction>>;

    /// Try to reach `desired` in one step. Returns the candidates produced
    /// on the way if it is not reached.
    fn apply_toward(
        &self,
        ctx: &FormulaContext,
        formulas: &[Formula],
        terms: &[Term],
        desired: &Formula,
    ) -> Result<Toward>;

    /// This rule as a logic rule, if it can be used in a search.
    fn as_logic(&self) -> Option<&dyn LogicRule> {
        None
    }

    /// This rule as a multi-step search.
    fn as_search(&self) -> Option<&LogicSearch> {
        None
    }
}

/// A rule that can be applied to the frontier of a search.
pub trait LogicRule: Rule {
    /// Like `apply_toward`, but the subjects are `obtained` (formulas in
    /// regular form) rather than all the formulas of `ctx`.
    fn apply_incremental(
        &self,
        ctx: &FormulaContext,
        obtained: &BTreeSet<Formula>,
        formulas: &[Formula],
        terms: &[Term],
        desired: &Formula,
    ) -> Result<Toward>;
}

/// `apply_toward` of a logic rule, with every regular form of `ctx` as
/// the frontier.
pub fn toward_from_context<R>(
    rule: &R,
    ctx: &FormulaContext,
    formulas: &[Formula],
    terms: &[Term],
    desired: &Formula,
) -> Result<Toward>
where
    R: LogicRule + ?Sized,
{
    rule.apply_incremental(ctx, &ctx.obtained(), formulas, terms, desired)
}

/// A formula obtained by a rule.
#[derive(Clone, Debug)]
pub struct Deduction {
    pub rule: QualifiedName,
    /// The resulting formula.
    pub formula: Formula,
    /// The formulas from which the result is obtained.
    pub dependencies: Vec<Formula>,
    /// Extra information, such as the constant abstracted by `ExistConstant`.
    pub info: BTreeMap<String, Term>,
    /// Provenance of a multi-step deduction.
    pub tree: Option<Ref<DeductionNode>>,
}

/// A node of the provenance tree of a deduction.
///
/// Leaves have no rule: they are formulas of the context.
#[derive(Debug)]
pub struct DeductionNode {
    pub formula: Formula,
    pub rule: Option<QualifiedName>,
    pub children: Vec<Ref<DeductionNode>>,
}

/// Outcome of `apply_toward`.
#[derive(Clone, Debug)]
pub enum Toward {
    Reached(Deduction),
    /// Candidates obtained while trying.
    NotReached(Vec<Deduction>),
}

impl Deduction {
    pub fn new(rule: &QualifiedName, formula: Formula, dependencies: Vec<Formula>) -> Self {
        Deduction {
            rule: rule.clone(),
            formula,
            dependencies,
            info: BTreeMap::new(),
            tree: None,
        }
    }

    pub fn with_info(mut self, key: &str, t: Term) -> Self {
        self.info.insert(key.to_string(), t);
        self
    }

    pub fn with_tree(mut self, tree: Ref<DeductionNode>) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Provenance tree. A deduction that was not obtained by search is a
    /// single step over its dependencies.
    pub fn tree(&self) -> Ref<DeductionNode> {
        match &self.tree {
            Some(t) => t.clone(),
            None => Ref::new(DeductionNode {
                formula: self.formula.clone(),
                rule: Some(self.rule.clone()),
                children: self.dependencies.iter().cloned().map(DeductionNode::leaf).collect(),
            }),
        }
    }
}

impl DeductionNode {
    pub fn leaf(formula: Formula) -> Ref<Self> {
        Ref::new(DeductionNode {
            formula,
            rule: None,
            children: vec![],
        })
    }

    /// Number of rule applications in the tree.
    pub fn steps(&self) -> usize {
        let here = if self.rule.is_some() { 1 } else { 0 };
        here + self.children.iter().map(|c| c.steps()).sum::<usize>()
    }

    fn pp_(&self, out: &mut fmt::Formatter, indent: usize) -> fmt::Result {
        write!(out, "{:width$}{}", "", self.formula, width = 2 * indent)?;
        match &self.rule {
            Some(r) => writeln!(out, "  [{}]", r.display())?,
            None => writeln!(out)?,
        }
        for c in &self.children {
            c.pp_(out, indent + 1)?;
        }
        Ok(())
    }
}

impl Toward {
    pub fn is_reached(&self) -> bool {
        matches!(self, Toward::Reached(_))
    }

    /// The deduction, if the goal was reached.
    pub fn reached(self) -> Option<Deduction> {
        match self {
            Toward::Reached(d) => Some(d),
            Toward::NotReached(_) => None,
        }
    }
}

impl fmt::Display for Deduction {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        write!(out, "{}; by '{}' with [", self.formula, self.rule.display())?;
        for (i, d) in self.dependencies.iter().enumerate() {
            if i > 0 {
                write!(out, ", ")?;
            }
            write!(out, "{}", d)?;
        }
        write!(out, "]")
    }
}

impl fmt::Display for DeductionNode {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        self.pp_(out, 0)
    }
}
