//! # Derivation Pipeline
//!
//! Filters a canonical collection with a [`PredicateSet`] and partitions the
//! survivors into the buckets a view displays. Both steps are stable: the
//! pipeline never reorders, it only drops and groups. Upstream ordering
//! (usually most recent first) is what the view shows.
//!
//! Views pick their own visible buckets. A record whose key is not among
//! them is left out of every bucket and only counted in
//! [`Buckets::dropped`]; there is no catch-all "other" bucket.

use crate::filter::{Filterable, PredicateSet};

/// Ordered, named partitions of a record collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets<K, R> {
    buckets: Vec<(K, Vec<R>)>,
    dropped: usize,
}

impl<K: PartialEq, R> Buckets<K, R> {
    pub fn get(&self, key: &K) -> &[R] {
        self.buckets
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, records)| records.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[R])> {
        self.buckets.iter().map(|(k, r)| (k, r.as_slice()))
    }

    /// Records placed in some bucket.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, r)| r.len()).sum()
    }

    /// Records that matched the filter but had no visible bucket.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Bucket contents concatenated in bucket order.
    pub fn into_flat(self) -> Vec<R> {
        self.buckets.into_iter().flat_map(|(_, r)| r).collect()
    }
}

/// Keeps the records accepted by `predicates`, in input order.
pub fn filter<R: Filterable + Clone>(records: &[R], predicates: &PredicateSet) -> Vec<R> {
    records
        .iter()
        .filter(|r| predicates.matches(*r))
        .cloned()
        .collect()
}

/// Stable partition of `records` into `keys`, in the order `keys` is given.
pub fn partition<R, K, F>(records: Vec<R>, keys: &[K], key_of: F) -> Buckets<K, R>
where
    K: PartialEq + Clone,
    F: Fn(&R) -> K,
{
    let mut buckets: Vec<(K, Vec<R>)> = keys.iter().map(|k| (k.clone(), Vec::new())).collect();
    let mut dropped = 0;

    for record in records {
        let key = key_of(&record);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, bucket)) => bucket.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "records without a visible bucket");
    }

    Buckets { buckets, dropped }
}

/// Filter then partition.
pub fn derive<R, K, F>(
    records: &[R],
    predicates: &PredicateSet,
    keys: &[K],
    key_of: F,
) -> Buckets<K, R>
where
    R: Filterable + Clone,
    K: PartialEq + Clone,
    F: Fn(&R) -> K,
{
    partition(filter(records, predicates), keys, key_of)
}
