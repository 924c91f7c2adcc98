#![cfg(test)]

// Property tests for WordTable kept inside the crate so they can use a
// custom BucketHasher alongside the default one.

use crate::jenkins::BucketHasher;
use crate::word_table::{EntryHandle, WordTable};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// words, the pool shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Increment(usize),
    Get(usize),
    Probe(String),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{1,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            6 => idx.clone().prop_map(OpI::Increment),
            2 => idx.clone().prop_map(OpI::Get),
            1 => "[a-z]{0,5}".prop_map(OpI::Probe),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

#[derive(Default)]
struct Model {
    counts: HashMap<Vec<u8>, u64>,
    first_seen: HashMap<Vec<u8>, u64>,
    live: HashMap<Vec<u8>, EntryHandle>,
    stale: Vec<EntryHandle>,
    seq: u64,
}

// State-machine equivalence against a HashMap model. Invariants:
// - increment returns the same stable handle for the same word and its
//   count matches the model.
// - get/contains parity for present and absent words.
// - iter yields every entry exactly once, bucket index ascending, each
//   entry in its own hash bucket, chains ordered newest first-seen first.
// - clear invalidates every handle; len/is_empty parity after each op.
fn run<H: BucketHasher>(
    mut sut: WordTable<H>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model = Model::default();
    for op in ops {
        match op {
            OpI::Increment(i) => {
                let w = pool[i].as_bytes().to_vec();
                let h = sut.increment(&w).expect("allocation succeeds in tests");
                let c = model.counts.entry(w.clone()).or_insert(0);
                *c += 1;
                prop_assert_eq!(h.count(&sut), Some(*c));
                prop_assert_eq!(h.word(&sut), Some(&w[..]));
                if let Some(&prev) = model.live.get(&w) {
                    prop_assert_eq!(prev, h, "handle must be stable");
                } else {
                    model.live.insert(w.clone(), h);
                    model.first_seen.insert(w, model.seq);
                    model.seq += 1;
                }
            }
            OpI::Get(i) => {
                let w = pool[i].as_bytes();
                prop_assert_eq!(sut.get(w), model.counts.get(w).copied());
                prop_assert_eq!(sut.find(w), model.live.get(w).copied());
            }
            OpI::Probe(s) => {
                prop_assert_eq!(sut.contains(s.as_bytes()), model.counts.contains_key(s.as_bytes()));
            }
            OpI::Iterate => {
                let mut seen = BTreeSet::new();
                let mut last_bucket = 0;
                let mut last_seq: Option<u64> = None;
                for (h, w, c) in sut.iter() {
                    let bucket = sut.bucket_index(w);
                    prop_assert!(bucket >= last_bucket, "buckets must ascend");
                    if bucket != last_bucket {
                        last_seq = None;
                    }
                    let seq = model.first_seen[w];
                    if let Some(prev) = last_seq {
                        prop_assert!(seq < prev, "chain must be newest first");
                    }
                    last_bucket = bucket;
                    last_seq = Some(seq);
                    prop_assert_eq!(Some(&c), model.counts.get(w));
                    prop_assert_eq!(Some(&h), model.live.get(w));
                    prop_assert!(seen.insert(w.to_vec()), "entry yielded twice");
                }
                prop_assert_eq!(seen.len(), model.counts.len());
            }
            OpI::Clear => {
                sut.clear();
                model.stale.extend(model.live.drain().map(|(_, h)| h));
                model.counts.clear();
                model.first_seen.clear();
            }
        }

        for h in &model.stale {
            prop_assert!(h.count(&sut).is_none());
        }
        prop_assert_eq!(sut.len(), model.counts.len());
        prop_assert_eq!(sut.is_empty(), model.counts.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(WordTable::with_buckets(8).unwrap(), &pool, ops)?;
    }
}

// Worst-case collisions: every word shares bucket 0, stressing chain
// walking and byte-equality resolution.
#[derive(Clone, Default)]
struct ConstHasher;
impl BucketHasher for ConstHasher {
    fn hash_bytes(&self, _bytes: &[u8]) -> u32 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run(WordTable::with_hasher(8, ConstHasher).unwrap(), &pool, ops)?;
    }
}
