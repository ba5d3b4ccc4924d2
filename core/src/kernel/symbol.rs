//! # Symbols.
//!
//! Predicates, functions and constants declared by a structure.
//!
//! Predicates and functions are identified by their qualified name only:
//! arity and orderedness are metadata, two symbols with the same name are
//! the same symbol. Matching checks argument counts separately.

use super::name::QualifiedName;

/// A predicate symbol.
///
/// An unordered predicate (like equality) is commutative in its arguments.
#[derive(Clone)]
pub struct Predicate {
    name: QualifiedName,
    arity: usize,
    ordered: bool,
}

/// A function symbol. `arity` is `None` for variadic functions.
#[derive(Clone)]
pub struct Function {
    name: QualifiedName,
    arity: Option<usize>,
    ordered: bool,
}

/// A global constant.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Constant {
    name: QualifiedName,
}

impl Predicate {
    pub fn new(name: QualifiedName, arity: usize, ordered: bool) -> Self {
        Predicate {
            name,
            arity,
            ordered,
        }
    }

    /// The builtin equality predicate, binary and unordered.
    pub fn equal() -> Self {
        Predicate::new(QualifiedName::new("equals"), 2, false)
    }

    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Are arguments compared in order?
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }
}

impl Function {
    pub fn new(name: QualifiedName, arity: Option<usize>, ordered: bool) -> Self {
        Function {
            name,
            arity,
            ordered,
        }
    }

    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    #[inline]
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }
}

impl Constant {
    pub fn new(name: QualifiedName) -> Self {
        Constant { name }
    }

    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }
}

mod impls {
    use super::*;
    use std::{cmp::Ordering, fmt, hash::Hash};

    macro_rules! impl_by_name {
        ($t: ty) => {
            impl PartialEq for $t {
                fn eq(&self, other: &Self) -> bool {
                    self.name == other.name
                }
            }

            impl Eq for $t {}

            impl Hash for $t {
                fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                    self.name.hash(state)
                }
            }

            impl PartialOrd for $t {
                fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                    Some(self.cmp(other))
                }
            }

            impl Ord for $t {
                fn cmp(&self, other: &Self) -> Ordering {
                    self.name.cmp(&other.name)
                }
            }

            impl fmt::Display for $t {
                fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
                    write!(out, "{}", self.name.display())
                }
            }
        };
    }

    impl_by_name!(Predicate);
    impl_by_name!(Function);

    impl fmt::Display for Constant {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            write!(out, "{}", self.name.display())
        }
    }

    impl fmt::Debug for Predicate {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            write!(out, "pred({}/{})", self.name.full(), self.arity)
        }
    }

    impl fmt::Debug for Function {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            match self.arity {
                Some(n) => write!(out, "fun({}/{})", self.name.full(), n),
                None => write!(out, "fun({}/*)", self.name.full()),
            }
        }
    }

    impl fmt::Debug for Constant {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            write!(out, "const({})", self.name.full())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_identity_by_name() {
        let p2 = Predicate::new(QualifiedName::new("p"), 2, true);
        let p3 = Predicate::new(QualifiedName::new("p"), 3, false);
        assert_eq!(p2, p3);
        assert_ne!(p2, Predicate::equal());
        assert!(!Predicate::equal().is_ordered());
        let f = Function::new(QualifiedName::of("union", &["sets"]), None, false);
        assert_eq!(format!("{}", f), "union");
        assert_eq!(format!("{:?}", f), "fun(sets.union/*)");
    }
}
