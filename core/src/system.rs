//! # Proof sessions
//!
//! A `System` is a stack of contexts. The bottom one is the base context;
//! `assume` pushes a scope knowing a few more formulas, `yield_` pops it
//! and discharges a formula of the scope as an implication in the parent.

use crate::{
    config::Config,
    context::{Context, FormulaContext},
    errorstr,
    kernel::{Formula, QualifiedName, Ref},
    rule::{Deduction, MatcherEquivRule, Rule, Toward},
    structure::Structure,
    Error, Result,
};

/// A proof session over a structure.
#[derive(Clone, Debug)]
pub struct System {
    base: Context,
    scopes: Vec<Context>,
    config: Config,
}

impl System {
    /// New session with the default configuration.
    pub fn new(structure: Structure) -> Self {
        Self::with_config(structure, Config::default())
    }

    pub fn with_config(mut structure: Structure, config: Config) -> Self {
        structure.set_search_depth(config.search_depth);
        System {
            base: Context::base(structure),
            scopes: vec![],
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The innermost context.
    pub fn context(&self) -> &Context {
        self.scopes.last().unwrap_or(&self.base)
    }

    fn context_mut(&mut self) -> &mut Context {
        match self.scopes.last_mut() {
            Some(c) => c,
            None => &mut self.base,
        }
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn structure(&self) -> &Structure {
        self.context().structure()
    }

    pub fn formula_context(&self) -> &FormulaContext {
        self.context().formula_context()
    }

    /// Formulas known in the innermost context.
    pub fn formulas(&self) -> &[Formula] {
        self.formula_context().formulas()
    }

    /// Open a scope where `fs` hold.
    pub fn assume<I>(&mut self, fs: I)
    where
        I: IntoIterator<Item = Formula>,
    {
        let fs: Vec<Formula> = fs.into_iter().collect();
        crate::logdebug!("assume [{}] at depth {}", display_list(&fs), self.depth());
        let c = self.context().assume(fs);
        self.scopes.push(c);
    }

    /// Close the innermost scope. If `f` is known in it, the parent learns
    /// `assumptions → f` and it is returned.
    ///
    /// Returns `Ok(None)`, leaving the scope open, if `f` is not known.
    /// Fails in the base context.
    pub fn yield_(&mut self, f: &Formula) -> Result<Option<Formula>> {
        if self.scopes.is_empty() {
            return Err(Error::new("cannot yield in the base context"));
        }
        if !self.formula_context().contains(f) {
            crate::logdebug!("yield: {} is not known", f);
            return Ok(None);
        }
        let scope = match self.scopes.pop() {
            Some(c) => c,
            None => return Err(Error::new("cannot yield in the base context")),
        };
        let res = match scope.assumptions() {
            [] => f.clone(),
            hyps => Formula::imply(Formula::and_of(hyps.to_vec()), f.clone()).flatten(),
        };
        crate::logdebug!("yield {} at depth {}", res, self.depth());
        self.add_formula(res.clone());
        Ok(Some(res))
    }

    /// Try to obtain `f` in the innermost context, with the rule named
    /// `hint` or with the default rules. On success `f` becomes known.
    pub fn deduce(&mut self, f: &Formula, hint: Option<&str>) -> Result<Option<Deduction>> {
        let rules: Vec<Ref<dyn Rule>> = {
            let s = self.structure();
            match hint.and_then(|h| s.rule(h)) {
                Some(r) => vec![r.clone()],
                None => {
                    if let Some(h) = hint {
                        crate::logdebug!("deduce: no rule named `{}`, using default rules", h);
                    }
                    s.default_rules().to_vec()
                }
            }
        };
        for r in rules {
            crate::logdebug!("deduce {} with {}", f, r.name());
            match r.apply_toward(self.formula_context(), &[], &[], f)? {
                Toward::Reached(d) => {
                    crate::logdebug!("deduced {}", d);
                    self.add_formula(f.clone());
                    return Ok(Some(d));
                }
                Toward::NotReached(_) => (),
            }
        }
        Ok(None)
    }

    /// Add `f` to the innermost context. Returns `false` if it was known.
    pub fn add_formula(&mut self, f: Formula) -> bool {
        self.context_mut().formula_context_mut().add_formula(f)
    }

    /// Register a rule in the innermost scope.
    pub fn add_rule(&mut self, r: Ref<dyn Rule>) -> Result<()> {
        self.context_mut().structure_mut().add_rule(r)
    }

    /// Define `name` as the equivalence `lhs ⇔ rhs`.
    ///
    /// The definition lives in the innermost scope, and is used by its
    /// searches if the configuration says so.
    pub fn define(&mut self, name: &str, lhs: Formula, rhs: Formula, description: &str) -> Result<Ref<dyn Rule>> {
        let qname = QualifiedName::parse_qualified(name)?;
        let rule = MatcherEquivRule::from_formulas(qname, lhs, rhs, description)
            .map_err(|e| errorstr!("cannot define `{}`", name).with_source(e))?;
        let rule: Ref<dyn Rule> = Ref::new(rule);
        crate::logdebug!("define {:?}", rule);
        let extend = self.config.extend_search_on_define;
        let s = self.context_mut().structure_mut();
        s.add_rule(rule.clone())?;
        if extend {
            s.extend_search(rule.clone())?;
        }
        Ok(rule)
    }
}

fn display_list(fs: &[Formula]) -> String {
    fs.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod test {
    use super::*;

    fn sys() -> System {
        System::new(Structure::logic().unwrap())
    }

    #[test]
    fn test_yield_base_fails() {
        let mut s = sys();
        assert!(s.yield_(&Formula::atom("A")).is_err());
    }

    #[test]
    fn test_yield_unknown_keeps_scope() -> Result<()> {
        let mut s = sys();
        s.assume(vec![Formula::atom("A")]);
        assert!(s.yield_(&Formula::atom("B"))?.is_none());
        assert_eq!(s.depth(), 1);
        Ok(())
    }

    #[test]
    fn test_assume_yield() -> Result<()> {
        let (a, b) = (Formula::atom("A"), Formula::atom("B"));
        let mut s = sys();
        s.assume(vec![a.clone(), b.clone()]);
        let res = s.yield_(&b)?;
        let expected = Formula::imply(Formula::and(vec![a, b.clone()]), b);
        assert_eq!(res, Some(expected.clone()));
        assert_eq!(s.depth(), 0);
        assert!(s.formula_context().contains(&expected));
        Ok(())
    }

    #[test]
    fn test_yield_without_assumptions() -> Result<()> {
        let mut s = sys();
        s.assume(vec![]);
        s.add_formula(Formula::atom("A"));
        assert_eq!(s.yield_(&Formula::atom("A"))?, Some(Formula::atom("A")));
        Ok(())
    }

    #[test]
    fn test_deduce_with_hint() -> Result<()> {
        let a = Formula::atom("A");
        let mut s = sys();
        s.add_formula(Formula::not(Formula::not(a.clone())));
        let d = s.deduce(&a, Some("DoubleNegate"))?;
        assert_eq!(d.map(|d| d.rule.full().to_string()), Some("logic.DoubleNegate".to_string()));
        assert!(s.formula_context().contains(&a));
        assert!(s.deduce(&Formula::atom("Z"), Some("DoubleNegate"))?.is_none());
        assert_eq!(s.formulas().len(), 2);
        Ok(())
    }

    #[test]
    fn test_define_scoped() -> Result<()> {
        let mut s = sys();
        s.assume(vec![]);
        let lhs = Formula::not(Formula::not(Formula::atom("A")));
        s.define("my.Twice", lhs.clone(), Formula::atom("A"), "¬¬A ⇔ A")?;
        assert!(s.structure().rule("my.Twice").is_some());
        assert!(s.define("my.Twice", lhs, Formula::atom("A"), "").is_err());
        // references must be shared by both sides
        assert!(s.define("my.Bad", Formula::atom("A"), Formula::atom("B"), "").is_err());
        s.add_formula(Formula::atom("Q"));
        s.yield_(&Formula::atom("Q"))?;
        assert!(s.structure().rule("my.Twice").is_none());
        Ok(())
    }

    #[test]
    fn test_with_config() {
        let s = System::with_config(Structure::logic().unwrap(), Config::default().search_depth(1));
        let d = s.structure().default_rules()[0].as_search().map(|s| s.depth());
        assert_eq!(d, Some(1));
    }
}
