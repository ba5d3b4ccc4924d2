//! # Matching lists of children
//!
//! Ordered lists are matched position by position. Unordered lists are
//! matched by backtracking over every injective assignment of matchers to
//! nodes, so a greedy early choice never hides a later success.

use super::{MatchResult, Matcher};

/// Match `nodes[i]` with `matchers[i]`, threading results through.
pub fn ordered_match<N, M>(nodes: &[N], matchers: &[M], prev: &MatchResult) -> Vec<MatchResult>
where
    M: Matcher<N>,
{
    if nodes.len() != matchers.len() {
        return vec![];
    }
    let mut results = vec![prev.clone()];
    for (n, m) in nodes.iter().zip(matchers.iter()) {
        results = m.match_all(n, &results);
        if results.is_empty() {
            break;
        }
    }
    results
}

/// Match every node with exactly one matcher, in any order.
pub fn unordered_match<N, M>(nodes: &[N], matchers: &[M], prev: &MatchResult) -> Vec<MatchResult>
where
    M: Matcher<N>,
{
    if nodes.len() != matchers.len() {
        return vec![];
    }
    let mut out = vec![];
    let mut used = vec![false; nodes.len()];
    assign_(nodes, matchers, prev, &mut used, &mut |r, _| out.push(r.clone()));
    out
}

/// Like `unordered_match`, but there can be more nodes than matchers.
///
/// The nodes left over by an assignment are passed to `fallback`, as a
/// single node if there is only one, or rebuilt with `rebuild` otherwise.
/// Without a fallback, leftovers make the assignment fail.
pub fn unordered_match_with_fallback<N, M, F>(
    nodes: &[N],
    matchers: &[M],
    fallback: Option<&M>,
    rebuild: F,
    prev: &MatchResult,
) -> Vec<MatchResult>
where
    N: Clone,
    M: Matcher<N>,
    F: Fn(Vec<N>) -> N,
{
    if nodes.len() < matchers.len() {
        return vec![];
    }
    if fallback.is_none() {
        return unordered_match(nodes, matchers, prev);
    }
    let mut out = vec![];
    let mut used = vec![false; nodes.len()];
    assign_(nodes, matchers, prev, &mut used, &mut |r, used| {
        let mut rest: Vec<N> = nodes
            .iter()
            .zip(used.iter())
            .filter(|(_, u)| !**u)
            .map(|(n, _)| n.clone())
            .collect();
        let fb = match fallback {
            Some(fb) if !rest.is_empty() => fb,
            _ => {
                out.push(r.clone());
                return;
            }
        };
        let node = if rest.len() == 1 {
            rest.pop()
        } else {
            Some(rebuild(rest))
        };
        if let Some(node) = node {
            out.extend(fb.match_(&node, r));
        }
    });
    out
}

/// Assign `matchers` (in order) to distinct unused nodes (in index
/// order), calling `k` on each complete assignment.
fn assign_<N, M, K>(nodes: &[N], matchers: &[M], r: &MatchResult, used: &mut [bool], k: &mut K)
where
    M: Matcher<N>,
    K: FnMut(&MatchResult, &[bool]),
{
    let (m, rest) = match matchers.split_first() {
        None => return k(r, used),
        Some(p) => p,
    };
    for j in 0..nodes.len() {
        if used[j] {
            continue;
        }
        let rs = m.match_(&nodes[j], r);
        if rs.is_empty() {
            continue;
        }
        used[j] = true;
        for r2 in &rs {
            assign_(nodes, rest, r2, used, k);
        }
        used[j] = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kernel::Term;
    use crate::matcher::TermMatcher;

    fn t(s: &str) -> Term {
        Term::var_str(s)
    }
    fn r(s: &str) -> TermMatcher {
        TermMatcher::Ref(s.into())
    }

    #[test]
    fn test_ordered() {
        let rs = ordered_match(&[t("a"), t("b")], &[r("x"), r("y")], &MatchResult::new());
        assert_eq!(rs.len(), 1);
        assert_eq!(rs[0].term_ref("y"), Some(&t("b")));
        // non-linear pattern
        assert!(ordered_match(&[t("a"), t("b")], &[r("x"), r("x")], &MatchResult::new()).is_empty());
        // arity mismatch
        assert!(ordered_match(&[t("a")], &[r("x"), r("y")], &MatchResult::new()).is_empty());
    }

    #[test]
    fn test_unordered() {
        let rs = unordered_match(&[t("a"), t("b")], &[r("x"), r("y")], &MatchResult::new());
        assert_eq!(rs.len(), 2);
        let rs = unordered_match(&[t("a"), t("b")], &[r("x"), TermMatcher::Var("a".into())], &MatchResult::new());
        assert_eq!(rs.len(), 1);
        assert_eq!(rs[0].term_ref("x"), Some(&t("b")));
    }

    #[test]
    fn test_fallback_single_leftover() {
        let rs = unordered_match_with_fallback(
            &[t("a"), t("b")],
            &[TermMatcher::Var("a".into())],
            Some(&r("rest")),
            |_| t("unused"),
            &MatchResult::new(),
        );
        assert_eq!(rs.len(), 1);
        assert_eq!(rs[0].term_ref("rest"), Some(&t("b")));
    }
}
