use crate::normalize::GroupKey;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedRow<K> {
    pub rank: usize,
    pub key: K,
    pub cnt: u64,
}

/// Sums counts per key. The result is in key order and has unique keys.
pub fn aggregate<K: GroupKey>(rows: impl IntoIterator<Item = (K, u64)>) -> Vec<(K, u64)> {
    let mut sums: BTreeMap<K, u64> = BTreeMap::new();
    for (key, cnt) in rows {
        *sums.entry(key).or_insert(0) += cnt;
    }
    sums.into_iter().collect()
}

/// Orders by count descending, then label ascending, and numbers the rows
/// 1..=n. Equal (count, label) pairs keep their incoming order, which for
/// [`aggregate`] output is key order.
pub fn rank<K: GroupKey>(mut groups: Vec<(K, u64)>) -> Vec<RankedRow<K>> {
    groups.sort_by(|(key_a, cnt_a), (key_b, cnt_b)| {
        cnt_b
            .cmp(cnt_a)
            .then_with(|| key_a.label().cmp(key_b.label()))
    });
    groups
        .into_iter()
        .enumerate()
        .map(|(num, (key, cnt))| RankedRow {
            rank: num + 1,
            key,
            cnt,
        })
        .collect()
}
