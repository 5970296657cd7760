/// Split `amount` samples over `groups` sources
/// Every group gets the quotient, the first `amount % groups` groups one more
///
/// # Example
/// ```
/// use spiderweb::prelude::*;
/// assert_eq!(partition_budget(23, 5), vec![5, 5, 5, 4, 4]);
/// assert!(partition_budget(10, 0).is_empty());
/// ```
pub fn partition_budget(amount: usize, groups: usize) -> Vec<usize> {
    if groups == 0 {
        return vec![];
    }
    let quotient = amount / groups;
    let remainder = amount % groups;
    (0..groups)
        .map(|i| quotient + usize::from(i < remainder))
        .collect()
}
