// 🧮 Set Algebra - union / intersection / difference over identity sets
//
// Every operation returns a freshly owned set; callers never share storage with
// another query's result. BTreeSet keeps iteration order sorted so results are
// deterministic for a fixed input.

use crate::error::{Result, RosterError};
use std::collections::BTreeSet;

/// A ∪ B
pub fn union<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.union(b).cloned().collect()
}

/// A ∩ B
pub fn intersect<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    if a.is_empty() || b.is_empty() {
        return BTreeSet::new();
    }

    // Walk the smaller side and probe the larger one
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter(|item| large.contains(*item))
        .cloned()
        .collect()
}

/// A \ B
pub fn difference<T: Ord + Clone>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> BTreeSet<T> {
    a.difference(b).cloned().collect()
}

/// ⋂ sets
///
/// The intersection of zero sets is an error: neither "everything" nor
/// "nothing" is a safe answer for callers. Stops as soon as the running result
/// becomes empty.
pub fn intersect_all<'a, T, I>(sets: I) -> Result<BTreeSet<T>>
where
    T: Ord + Clone + 'a,
    I: IntoIterator<Item = &'a BTreeSet<T>>,
{
    let mut iter = sets.into_iter();

    let first = iter
        .next()
        .ok_or_else(|| RosterError::invalid("at least one set required"))?;
    let mut acc = first.clone();

    for set in iter {
        if acc.is_empty() {
            break;
        }
        acc = intersect(&acc, set);
    }

    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_union() {
        let result = union(&set(&["a", "b"]), &set(&["b", "c"]));
        assert_eq!(result, set(&["a", "b", "c"]));
    }

    #[test]
    fn test_intersect() {
        let result = intersect(&set(&["a", "b", "c"]), &set(&["b", "c", "d"]));
        assert_eq!(result, set(&["b", "c"]));
    }

    #[test]
    fn test_intersect_with_empty_side() {
        assert!(intersect(&set(&[]), &set(&["a"])).is_empty());
        assert!(intersect(&set(&["a"]), &set(&[])).is_empty());
    }

    #[test]
    fn test_difference() {
        let result = difference(&set(&["a", "b", "c"]), &set(&["b"]));
        assert_eq!(result, set(&["a", "c"]));
    }

    #[test]
    fn test_intersect_all_requires_at_least_one_set() {
        let empty: Vec<BTreeSet<String>> = Vec::new();
        let err = intersect_all(&empty).unwrap_err();
        assert!(matches!(err, RosterError::InvalidArgument(_)));
    }

    #[test]
    fn test_intersect_all_single_set_is_itself() {
        let sets = vec![set(&["a", "b"])];
        assert_eq!(intersect_all(&sets).unwrap(), set(&["a", "b"]));
    }

    #[test]
    fn test_intersect_all_many() {
        let sets = vec![
            set(&["a", "b", "c"]),
            set(&["a", "c", "d"]),
            set(&["c", "a"]),
        ];
        assert_eq!(intersect_all(&sets).unwrap(), set(&["a", "c"]));
    }

    #[test]
    fn test_intersect_all_short_circuits_on_empty() {
        let sets = vec![set(&["a"]), set(&[]), set(&["a"])];
        assert!(intersect_all(&sets).unwrap().is_empty());
    }

    #[test]
    fn test_results_are_not_aliased() {
        let a = set(&["a", "b"]);
        let sets = vec![a.clone()];
        let mut result = intersect_all(&sets).unwrap();
        result.insert("z".to_string());

        // Mutating the result leaves the input untouched
        assert_eq!(sets[0], a);
    }
}
