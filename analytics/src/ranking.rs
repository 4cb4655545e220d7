use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

/// One ranked group: its key, aggregate score and the members that formed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedGroup<K, T> {
    pub key: K,
    pub score: u64,
    pub members: Vec<T>,
}

/// Group `items` by `key_fn`, score each group with `score_fn` over its
/// members, and return at most `n` groups ordered by descending score.
///
/// Ties break by ascending group key, so repeated runs over the same input
/// produce identical output. Fewer than `n` groups returns them all; empty
/// input returns an empty vec.
pub fn rank_top_n<T, K, KF, SF>(
    items: impl IntoIterator<Item = T>,
    key_fn: KF,
    score_fn: SF,
    n: usize,
) -> Vec<RankedGroup<K, T>>
where
    K: Ord + Hash + Clone,
    KF: Fn(&T) -> K,
    SF: Fn(&[T]) -> u64,
{
    let mut groups: HashMap<K, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key_fn(&item)).or_default().push(item);
    }

    let mut ranked = groups
        .into_iter()
        .map(|(key, members)| {
            let score = score_fn(&members);
            RankedGroup {
                key,
                score,
                members,
            }
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| (Reverse(a.score), &a.key).cmp(&(Reverse(b.score), &b.key)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<'a>(ranked: &'a [RankedGroup<&'a str, (&'a str, u64)>]) -> Vec<&'a str> {
        ranked.iter().map(|g| g.key).collect()
    }

    fn rank(items: Vec<(&'static str, u64)>, n: usize) -> Vec<RankedGroup<&'static str, (&'static str, u64)>> {
        rank_top_n(
            items,
            |item| item.0,
            |members| members.iter().map(|m| m.1).sum(),
            n,
        )
    }

    #[test]
    fn orders_by_descending_score() {
        let ranked = rank(vec![("a", 1), ("b", 5), ("c", 3)], 5);
        assert_eq!(keys(&ranked), vec!["b", "c", "a"]);
        assert_eq!(ranked[0].score, 5);
    }

    #[test]
    fn truncates_to_n_and_tolerates_fewer_groups() {
        assert_eq!(rank(vec![("a", 1), ("b", 2), ("c", 3)], 2).len(), 2);
        assert_eq!(rank(vec![("a", 1)], 10).len(), 1);
        assert!(rank(vec![], 10).is_empty());
    }

    #[test]
    fn ties_break_by_ascending_key() {
        let ranked = rank(vec![("d", 2), ("b", 2), ("a", 1), ("c", 2)], 3);
        assert_eq!(keys(&ranked), vec!["b", "c", "d"]);
    }

    #[test]
    fn aggregates_all_members_of_a_group() {
        let ranked = rank(vec![("a", 1), ("a", 2), ("b", 2)], 5);
        assert_eq!(ranked[0].key, "a");
        assert_eq!(ranked[0].score, 3);
        assert_eq!(ranked[0].members.len(), 2);
    }
}
