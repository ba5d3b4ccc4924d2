//! # Names and variables.

use super::Ref;
use crate::error::Result;
use std::collections::BTreeSet;

/// A reference counted string.
pub type RStr = Ref<str>;

/// A qualified name, such as `logic.DefImply`.
///
/// The display name is the last segment. Names are equal, hashed and
/// ordered by their full name only.
#[derive(Clone)]
pub struct QualifiedName {
    display: RStr,
    full: RStr,
}

/// A variable.
///
/// Variables are equal iff they have the same name. They are used both as
/// binders in quantified formulas and as free references.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Variable(RStr);

/// A set of variables, sorted by name.
pub type VarSet = BTreeSet<Variable>;

impl QualifiedName {
    /// A name whose display name is its full name.
    pub fn new(name: &str) -> Self {
        let s: RStr = Ref::from(name);
        QualifiedName {
            display: s.clone(),
            full: s,
        }
    }

    pub fn with_display(display: &str, full: &str) -> Self {
        QualifiedName {
            display: Ref::from(display),
            full: Ref::from(full),
        }
    }

    /// `of("in", &["sets"])` is `sets.in`, displayed as `in`.
    pub fn of(name: &str, qualifiers: &[&str]) -> Self {
        let mut full = String::new();
        for q in qualifiers {
            full.push_str(q);
            full.push('.');
        }
        full.push_str(name);
        QualifiedName::with_display(name, &full)
    }

    /// Parse `a.b.c`, using `c` as the display name.
    pub fn parse_qualified(full: &str) -> Result<Self> {
        let display = match full.rfind('.') {
            Some(i) => &full[i + 1..],
            None => full,
        };
        if display.trim().is_empty() {
            return Err(crate::errorstr!("invalid qualified name `{}`", full));
        }
        Ok(QualifiedName::with_display(display, full))
    }

    #[inline]
    pub fn display(&self) -> &str {
        &self.display
    }

    #[inline]
    pub fn full(&self) -> &str {
        &self.full
    }
}

impl Variable {
    /// New variable from this name.
    pub fn new(name: &str) -> Self {
        Variable(Ref::from(name))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn to_rstr(&self) -> RStr {
        self.0.clone()
    }

    /// The `i`-th canonical variable, `$i`.
    pub fn canonical(i: usize) -> Self {
        Variable::new(&format!("${}", i))
    }

    /// If this is a canonical name `$<digits>`, its index.
    pub fn canonical_index(&self) -> Option<usize> {
        let digits = self.0.strip_prefix('$')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// First variable among `prefix1, prefix2, …` for which `taken` is false.
    pub fn fresh<F>(prefix: &str, mut taken: F) -> Self
    where
        F: FnMut(&Variable) -> bool,
    {
        let mut i = 1usize;
        loop {
            let v = Variable::new(&format!("{}{}", prefix, i));
            if !taken(&v) {
                return v;
            }
            i += 1;
        }
    }
}

mod impls {
    use super::*;
    use std::{cmp::Ordering, fmt, hash::Hash};

    impl PartialEq for QualifiedName {
        fn eq(&self, other: &Self) -> bool {
            self.full == other.full
        }
    }

    impl Eq for QualifiedName {}

    impl Hash for QualifiedName {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            self.full.hash(state)
        }
    }

    impl PartialOrd for QualifiedName {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for QualifiedName {
        fn cmp(&self, other: &Self) -> Ordering {
            self.full.cmp(&other.full)
        }
    }

    impl std::borrow::Borrow<str> for QualifiedName {
        fn borrow(&self) -> &str {
            &self.full
        }
    }

    impl<'a> From<&'a str> for QualifiedName {
        fn from(s: &str) -> Self {
            QualifiedName::new(s)
        }
    }

    impl fmt::Display for QualifiedName {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            write!(out, "{}", self.full)
        }
    }

    impl fmt::Debug for QualifiedName {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            write!(out, "Name({})", self.full)
        }
    }

    impl std::borrow::Borrow<str> for Variable {
        fn borrow(&self) -> &str {
            &self.0
        }
    }

    impl<'a> From<&'a str> for Variable {
        fn from(s: &str) -> Self {
            Variable::new(s)
        }
    }

    impl fmt::Display for Variable {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            write!(out, "{}", self.0)
        }
    }

    impl fmt::Debug for Variable {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            write!(out, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_qualified() -> Result<()> {
        let n = QualifiedName::of("in", &["sets"]);
        assert_eq!(n.full(), "sets.in");
        assert_eq!(n.display(), "in");
        let n2 = QualifiedName::parse_qualified("sets.in")?;
        assert_eq!(n, n2);
        assert_eq!(n2.display(), "in");
        // equality ignores the display name
        assert_eq!(QualifiedName::with_display("x", "a.b"), QualifiedName::new("a.b"));
        assert!(QualifiedName::parse_qualified("sets.").is_err());
        Ok(())
    }

    #[test]
    fn test_canonical_index() {
        assert_eq!(Variable::new("$12").canonical_index(), Some(12));
        assert_eq!(Variable::new("$").canonical_index(), None);
        assert_eq!(Variable::new("$1a").canonical_index(), None);
        assert_eq!(Variable::new("x").canonical_index(), None);
        assert_eq!(Variable::canonical(3).name(), "$3");
    }

    #[test]
    fn test_fresh() {
        let used: VarSet = ["x1", "x2"].iter().map(|s| Variable::new(s)).collect();
        assert_eq!(Variable::fresh("x", |v| used.contains(v)).name(), "x3");
    }
}
