//! # Identity of formulas up to renaming of bound variables.
//!
//! `a.is_identity_to(b)` holds if `a` and `b` are the same tree, up to
//! consistent renaming of bound variables and reordering of the children
//! of commutative nodes (`∧`, `∨`, `↔`, unordered predicates and functions).

use crate::kernel::{Formula, FormulaView::*, Term, TermView::*, Variable};

/// Is there a bijection between `xs` and `ys` such that `eq` holds
/// on every pair?
///
/// This backtracks over the assignment, so it is exponential in the
/// worst case.
pub fn list_equals_no_order<A, B, F>(xs: &[A], ys: &[B], eq: F) -> bool
where
    F: Fn(&A, &B) -> bool,
{
    if xs.len() != ys.len() {
        return false;
    }
    let mut used = vec![false; ys.len()];
    assign_(xs, ys, &eq, &mut used)
}

fn assign_<A, B, F>(xs: &[A], ys: &[B], eq: &F, used: &mut [bool]) -> bool
where
    F: Fn(&A, &B) -> bool,
{
    let (x, rest) = match xs.split_first() {
        None => return true,
        Some(p) => p,
    };
    for (j, y) in ys.iter().enumerate() {
        if used[j] || !eq(x, y) {
            continue;
        }
        used[j] = true;
        if assign_(rest, ys, eq, used) {
            return true;
        }
        used[j] = false;
    }
    false
}

/// Pairwise equality, in order.
pub fn list_equals<A, B, F>(xs: &[A], ys: &[B], eq: F) -> bool
where
    F: Fn(&A, &B) -> bool,
{
    xs.len() == ys.len() && xs.iter().zip(ys.iter()).all(|(x, y)| eq(x, y))
}

fn args_identity(ordered: bool, a1: &[Term], a2: &[Term]) -> bool {
    let eq = |x: &Term, y: &Term| x.is_identity_to(y);
    if ordered {
        list_equals(a1, a2, eq)
    } else {
        list_equals_no_order(a1, a2, eq)
    }
}

impl Term {
    /// Identity of terms, up to reordering of unordered function arguments.
    pub fn is_identity_to(&self, other: &Term) -> bool {
        if self == other {
            return true;
        }
        match (self.view(), other.view()) {
            (TVar(a), TVar(b)) => a == b,
            (TConst(a), TConst(b)) => a == b,
            (TNamed(n1, a1), TNamed(n2, a2)) => n1 == n2 && args_identity(true, a1, a2),
            (TFun(f1, a1), TFun(f2, a2)) => f1 == f2 && args_identity(f1.is_ordered(), a1, a2),
            _ => false,
        }
    }
}

impl Formula {
    /// Identity up to renaming of bound variables and reordering of
    /// commutative children.
    pub fn is_identity_to(&self, other: &Formula) -> bool {
        if self == other {
            return true;
        }
        match (self.view(), other.view()) {
            (FPred(p1, a1), FPred(p2, a2)) => p1 == p2 && args_identity(p1.is_ordered(), a1, a2),
            (FNamed(n1, a1), FNamed(n2, a2)) => n1 == n2 && args_identity(true, a1, a2),
            (FNot(a), FNot(b)) => a.is_identity_to(b),
            (FAnd(c1), FAnd(c2)) | (FOr(c1), FOr(c2)) => {
                list_equals_no_order(c1, c2, |x, y| x.is_identity_to(y))
            }
            (FImply(a1, b1), FImply(a2, b2)) => a1.is_identity_to(a2) && b1.is_identity_to(b2),
            (FEquiv(a1, b1), FEquiv(a2, b2)) => {
                (a1.is_identity_to(a2) && b1.is_identity_to(b2))
                    || (a1.is_identity_to(b2) && b1.is_identity_to(a2))
            }
            (FForAll(v1, b1), FForAll(v2, b2)) | (FExists(v1, b1), FExists(v2, b2)) => {
                if v1 == v2 {
                    return b1.is_identity_to(b2);
                }
                let (all1, all2) = (self.all_variables(), other.all_variables());
                let w = Variable::fresh("v", |x| all1.contains(x) || all2.contains(x));
                let b1 = b1.rename_var(&[(v1.clone(), w.clone())]);
                let b2 = b2.rename_var(&[(v2.clone(), w)]);
                b1.is_identity_to(&b2)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kernel::{Predicate, QualifiedName};

    fn v(s: &str) -> Variable {
        Variable::new(s)
    }
    fn t(s: &str) -> Term {
        Term::var_str(s)
    }

    #[test]
    fn test_no_order() {
        assert!(list_equals_no_order(&[1, 2, 2], &[2, 1, 2], |a, b| a == b));
        assert!(!list_equals_no_order(&[1, 2, 2], &[2, 1, 1], |a, b| a == b));
        // greedy assignment of the first element would block the second one
        assert!(list_equals_no_order(&[1, 2], &[3, 1], |a, b| a <= b));
        assert!(!list_equals_no_order(&[1], &[1, 1], |a, b| a == b));
    }

    #[test]
    fn test_alpha() {
        // ∀x. ∃y. x = y  vs  ∀a. ∃b. b = a
        let f = Formula::forall(v("x"), Formula::exists(v("y"), Formula::equal(t("x"), t("y"))));
        let g = Formula::forall(v("a"), Formula::exists(v("b"), Formula::equal(t("b"), t("a"))));
        assert!(f.is_identity_to(&g));
        assert!(g.is_identity_to(&f));
        // swapping binders changes the meaning when the predicate is ordered
        let lt = Predicate::new(QualifiedName::new("lt"), 2, true);
        let f = Formula::forall(v("x"), Formula::exists(v("y"), Formula::pred(lt.clone(), [t("x"), t("y")])));
        let g = Formula::forall(v("y"), Formula::exists(v("x"), Formula::pred(lt, [t("x"), t("y")])));
        assert!(!f.is_identity_to(&g));
    }

    #[test]
    fn test_free_vars_matter() {
        let f = Formula::forall(v("x"), Formula::equal(t("x"), t("y")));
        let g = Formula::forall(v("x"), Formula::equal(t("x"), t("z")));
        assert!(!f.is_identity_to(&g));
        // renaming the binder into a free variable of the other side is not alpha
        let h = Formula::forall(v("y"), Formula::equal(t("y"), t("y")));
        assert!(!f.is_identity_to(&h));
    }

    #[test]
    fn test_commutative() {
        let (a, b, c) = (Formula::atom("A"), Formula::atom("B"), Formula::atom("C"));
        let f = Formula::and(vec![a.clone(), b.clone(), c.clone()]);
        let g = Formula::and(vec![c.clone(), a.clone(), b.clone()]);
        assert!(f.is_identity_to(&g));
        assert!(!f.is_identity_to(&Formula::or(vec![a.clone(), b.clone(), c.clone()])));
        assert!(Formula::equiv(a.clone(), b.clone()).is_identity_to(&Formula::equiv(b.clone(), a.clone())));
        assert!(!Formula::imply(a.clone(), b.clone()).is_identity_to(&Formula::imply(b, a)));
    }
}
