//! # Structures
//!
//! A structure declares the symbols and rules available in a proof: its
//! predicates, functions and constants, its named rules, and the default
//! rules `deduce` falls back to when no rule is named.

use crate::{
    errorstr,
    kernel::{Constant, Formula, Function, Predicate, QualifiedName, Ref, Term, Variable},
    rule::{logic, LogicSearch, MatcherEquivRule, Rule},
    Result,
};
use std::collections::BTreeMap;

/// Namespace of the set theory symbols.
pub const SETS: &str = "sets";

/// Symbols and rules of a theory.
#[derive(Clone, Debug)]
pub struct Structure {
    name: String,
    predicates: BTreeMap<QualifiedName, Predicate>,
    functions: BTreeMap<QualifiedName, Function>,
    constants: BTreeMap<QualifiedName, Constant>,
    rules: BTreeMap<QualifiedName, Ref<dyn Rule>>,
    default_rules: Vec<Ref<dyn Rule>>,
}

impl Structure {
    /// Empty structure.
    pub fn new(name: &str) -> Self {
        Structure {
            name: name.to_string(),
            predicates: BTreeMap::new(),
            functions: BTreeMap::new(),
            constants: BTreeMap::new(),
            rules: BTreeMap::new(),
            default_rules: vec![],
        }
    }

    /// First order logic with equality, its rule catalogue, and the logic
    /// search as default rule.
    pub fn logic() -> Result<Self> {
        let mut s = Structure::new(logic::NAMESPACE);
        s.add_predicate(Predicate::equal())?;
        for r in logic::rules()? {
            s.add_rule(r)?;
        }
        let search: Ref<dyn Rule> = Ref::new(logic::search()?);
        s.add_rule(search.clone())?;
        s.add_default_rule(search);
        Ok(s)
    }

    /// `logic()` plus membership, inclusion, the empty set and
    /// extensionality.
    pub fn sets() -> Result<Self> {
        let mut s = Structure::logic()?;
        s.name = SETS.to_string();
        s.add_predicate(in_predicate())?;
        s.add_predicate(contains_predicate())?;
        s.add_constant(empty_set())?;

        let x = Term::var_str("x");
        let a = Term::var_str("A");
        let b = Term::var_str("B");
        let lhs = Formula::equal(a.clone(), b.clone());
        let rhs = Formula::forall(
            Variable::new("x"),
            Formula::equiv(
                Formula::pred(in_predicate(), vec![x.clone(), a]),
                Formula::pred(in_predicate(), vec![x, b]),
            ),
        );
        let ext = MatcherEquivRule::from_formulas(
            QualifiedName::of("Extension", &[SETS]),
            lhs,
            rhs,
            "A=B ⇔ ∀x(x∈A ↔ x∈B)",
        )?;
        let ext: Ref<dyn Rule> = Ref::new(ext);
        s.add_rule(ext.clone())?;
        s.extend_search(ext)?;
        Ok(s)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_predicate(&mut self, p: Predicate) -> Result<()> {
        if self.predicates.contains_key(p.name()) {
            return Err(errorstr!("predicate `{}` is already declared", p.name()));
        }
        self.predicates.insert(p.name().clone(), p);
        Ok(())
    }

    pub fn add_function(&mut self, f: Function) -> Result<()> {
        if self.functions.contains_key(f.name()) {
            return Err(errorstr!("function `{}` is already declared", f.name()));
        }
        self.functions.insert(f.name().clone(), f);
        Ok(())
    }

    pub fn add_constant(&mut self, c: Constant) -> Result<()> {
        if self.constants.contains_key(c.name()) {
            return Err(errorstr!("constant `{}` is already declared", c.name()));
        }
        self.constants.insert(c.name().clone(), c);
        Ok(())
    }

    /// Register a named rule. Fails if the name is taken.
    pub fn add_rule(&mut self, r: Ref<dyn Rule>) -> Result<()> {
        if self.rules.contains_key(r.name()) {
            return Err(errorstr!("rule `{}` is already declared", r.name()));
        }
        crate::logtrace!("structure {}: add rule {}", self.name, r.name());
        self.rules.insert(r.name().clone(), r);
        Ok(())
    }

    pub fn add_default_rule(&mut self, r: Ref<dyn Rule>) {
        self.default_rules.push(r)
    }

    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(&QualifiedName::new(name))
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(&QualifiedName::new(name))
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.get(&QualifiedName::new(name))
    }

    /// Find a rule by full name, or by display name if only one rule has
    /// this display name.
    pub fn rule(&self, name: &str) -> Option<&Ref<dyn Rule>> {
        if let Some(r) = self.rules.get(&QualifiedName::new(name)) {
            return Some(r);
        }
        let mut it = self.rules.values().filter(|r| r.name().display() == name);
        match (it.next(), it.next()) {
            (Some(r), None) => Some(r),
            _ => None,
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &Ref<dyn Rule>> + '_ {
        self.rules.values()
    }

    pub fn default_rules(&self) -> &[Ref<dyn Rule>] {
        &self.default_rules
    }

    /// Change the depth of every search of this structure.
    pub fn set_search_depth(&mut self, depth: usize) {
        for r in self.default_rules.iter_mut().chain(self.rules.values_mut()) {
            if let Some(s) = r.as_search() {
                let s = s.with_depth(depth);
                *r = Ref::new(s);
            }
        }
    }

    /// Add `r` to every search of this structure.
    pub fn extend_search(&mut self, r: Ref<dyn Rule>) -> Result<()> {
        crate::logdebug!("structure {}: add {} to searches", self.name, r.name());
        self.map_searches(|s| s.with_rule(r.clone()))
    }

    fn map_searches<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&LogicSearch) -> Result<LogicSearch>,
    {
        let mut default_rules = Vec::with_capacity(self.default_rules.len());
        for r in &self.default_rules {
            default_rules.push(match r.as_search() {
                Some(s) => Ref::new(f(s)?) as Ref<dyn Rule>,
                None => r.clone(),
            });
        }
        let mut rules = self.rules.clone();
        for r in rules.values_mut() {
            if let Some(s) = r.as_search() {
                *r = Ref::new(f(s)?);
            }
        }
        self.default_rules = default_rules;
        self.rules = rules;
        Ok(())
    }
}

/// `x ∈ A`.
pub fn in_predicate() -> Predicate {
    Predicate::new(QualifiedName::of("in", &[SETS]), 2, true)
}

/// `A ⊇ B`.
pub fn contains_predicate() -> Predicate {
    Predicate::new(QualifiedName::of("contains", &[SETS]), 2, true)
}

/// `∅`.
pub fn empty_set() -> Constant {
    Constant::new(QualifiedName::of("empty", &[SETS]))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_logic() -> Result<()> {
        let s = Structure::logic()?;
        assert!(s.predicate("equals").is_some());
        assert_eq!(s.default_rules().len(), 1);
        assert!(s.default_rules()[0].as_search().is_some());
        assert!(s.rule("logic.DefImply").is_some());
        assert!(s.rule("DefImply").is_some());
        assert!(s.rule("Logic").and_then(|r| r.as_search()).is_some());
        assert!(s.rule("Nope").is_none());
        Ok(())
    }

    #[test]
    fn test_duplicates() -> Result<()> {
        let mut s = Structure::logic()?;
        assert!(s.add_predicate(Predicate::equal()).is_err());
        assert!(s.add_rule(logic::double_negate()).is_err());
        s.add_constant(empty_set())?;
        assert!(s.add_constant(empty_set()).is_err());
        Ok(())
    }

    #[test]
    fn test_sets() -> Result<()> {
        let s = Structure::sets()?;
        assert!(s.predicate("sets.in").is_some());
        assert!(s.constant("sets.empty").is_some());
        assert!(s.rule("Extension").is_some());
        let search = s.default_rules()[0].as_search().map(|s| s.rule_names().count());
        let logic_search = Structure::logic()?.default_rules()[0]
            .as_search()
            .map(|s| s.rule_names().count());
        assert_eq!(search, logic_search.map(|n| n + 1));
        Ok(())
    }

    #[test]
    fn test_search_depth() -> Result<()> {
        let mut s = Structure::logic()?;
        s.set_search_depth(2);
        assert_eq!(s.default_rules()[0].as_search().map(|s| s.depth()), Some(2));
        assert_eq!(s.rule("logic.Logic").and_then(|r| r.as_search()).map(|s| s.depth()), Some(2));
        // the rest of the search is kept
        let names = |s: &Structure| s.default_rules()[0].as_search().map(|s| s.rule_names().count());
        assert_eq!(names(&s), names(&Structure::logic()?));
        Ok(())
    }
}
