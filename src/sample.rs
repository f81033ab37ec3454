//! Weighted sampling without replacement.
//!
//! Selection uses the Efraimidis–Spirakis A-Res keys: each item draws
//! `u ~ Uniform(0,1)` and gets key `u^(1/w)`; the `count` largest keys win.
//! Keys are compared in the log domain (`ln(u) / w`), which preserves the
//! ordering and avoids the `exp`. A bounded min-heap keeps the running
//! winners, so a draw over `n` candidates costs O(n log count).
//!
//! After selection the winners are shuffled, so the output order carries no
//! information about weight or traversal order. The order assigns output
//! indices downstream; without the shuffle, heavy items would cluster at
//! predictable positions.
//!
//! ## References
//!
//! - Efraimidis & Spirakis (2006): *Weighted random sampling with a
//!   reservoir*.
//!
//! Notes:
//! - `draw_sample_with_rng` exists for deterministic testing; `draw_sample`
//!   is the process-RNG convenience wrapper and is not reproducible across
//!   runs by design.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rand::prelude::*;

/// Draw `count` items without replacement, weighted by `weight_of`.
///
/// Returns all items (shuffled) when `count >= items.len()`. The result
/// order is uniformly random either way.
pub fn draw_sample<T>(items: Vec<T>, weight_of: impl Fn(&T) -> u64, count: usize) -> Vec<T> {
    let mut rng = rand::rng();
    draw_sample_with_rng(items, weight_of, count, &mut rng)
}

/// Like [`draw_sample`], with a caller-supplied RNG.
pub fn draw_sample_with_rng<T, R: Rng + ?Sized>(
    items: Vec<T>,
    weight_of: impl Fn(&T) -> u64,
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    if count == 0 {
        return Vec::new();
    }
    if count >= items.len() {
        let mut all = items;
        all.shuffle(rng);
        return all;
    }

    // Min-heap of the `count` largest keys seen so far.
    let mut heap: BinaryHeap<Reverse<ScoredIndex>> = BinaryHeap::with_capacity(count);
    for (index, item) in items.iter().enumerate() {
        // Weights of 0 are floored to 1; the traverser never emits them.
        let weight = weight_of(item).max(1) as f64;
        let u = rng.random::<f64>().max(f64::MIN_POSITIVE);
        let key = u.ln() / weight;
        let scored = ScoredIndex { key, index };
        if heap.len() < count {
            heap.push(Reverse(scored));
        } else if scored > heap.peek().expect("heap is non-empty").0 {
            heap.pop();
            heap.push(Reverse(scored));
        }
    }

    let mut picked = vec![false; items.len()];
    for Reverse(scored) in heap {
        picked[scored.index] = true;
    }
    let mut selected: Vec<T> = items
        .into_iter()
        .zip(picked)
        .filter_map(|(item, keep)| keep.then_some(item))
        .collect();
    selected.shuffle(rng);
    selected
}

/// Selection key paired with the item's position, ordered by key with the
/// index as a deterministic tie-break.
#[derive(Clone, Copy, Debug)]
struct ScoredIndex {
    key: f64,
    index: usize,
}

impl PartialEq for ScoredIndex {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredIndex {}

impl PartialOrd for ScoredIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| self.index.cmp(&other.index))
    }
}
