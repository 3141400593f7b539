use std::{cell::Cell, cmp::Ordering};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};
use rstest::rstest;

use term_index::{
    heap::{BoundedMinHeap, NaturalOrder},
    search::{ScoredDocument, TopK, TopScoredDocuments},
};

#[rstest]
fn test_top_k_matches_sort(
    #[values(1, 3, 10, 100)] top_k: usize,
    #[values(0, 5, 10, 1000)] stream_length: usize,
    #[values(1, 2)] seed: u64,
) {
    let mut rng = StdRng::seed_from_u64(seed);
    let stream: Vec<u32> = (0..stream_length).map(|_| rng.gen_range(0..500)).collect();

    let mut top = TopK::new(top_k, NaturalOrder);
    for &x in stream.iter() {
        top.push(x);
    }

    let mut expected = stream.clone();
    expected.sort_by(|a, b| b.cmp(a));
    expected.truncate(top_k);
    assert_eq!(top.into_sorted_vec(), expected);
}

#[test]
fn test_scored_documents() {
    let top_k = 10;
    let mut rng = StdRng::seed_from_u64(5);
    let log_normal = LogNormal::new(0., 1.).unwrap();

    let mut scored_documents = Vec::new();
    let mut top = TopScoredDocuments::new(top_k);
    let mut threshold = f32::NEG_INFINITY;
    for docid in 0..10000 {
        let score: f32 = log_normal.sample(&mut rng);
        let new_threshold = top.add(docid, score);
        // The lower bound never decreases
        assert!(new_threshold >= threshold);
        threshold = new_threshold;
        scored_documents.push(ScoredDocument { docid, score });
    }

    scored_documents.sort_by(|a, b| b.score.total_cmp(&a.score));
    let observed = top.into_sorted_vec();
    assert_eq!(observed.len(), top_k);
    for (o, e) in observed.iter().zip(scored_documents.iter()) {
        assert!(o.docid == e.docid, "{} vs {}", o, e);
    }
    assert_eq!(threshold, observed[top_k - 1].score);
}

/// Scores are updated in place while the heap is in use, as in
/// accumulator-based query evaluation: the heap holds document ordinals
#[test]
fn test_promote_updated_scores() {
    let mut rng = StdRng::seed_from_u64(11);
    let accumulators: Vec<Cell<u32>> = (0..50).map(|_| Cell::new(rng.gen_range(0..100))).collect();
    let compare = |a: &usize, b: &usize| {
        accumulators[*a]
            .get()
            .cmp(&accumulators[*b].get())
            .then(a.cmp(b))
    };

    let mut buffer: Vec<usize> = (0..5).collect();
    let mut heap = BoundedMinHeap::new(&mut buffer, compare);
    heap.make_heap();
    for docid in 5..accumulators.len() {
        if compare(&docid, heap.peek()) == Ordering::Greater {
            heap.push_back(docid);
        }
    }
    assert!(heap.is_heap());

    for _ in 0..20 {
        let docid = *heap.peek();
        let cell = &accumulators[docid];
        cell.set(cell.get() + rng.gen_range(1..50));
        assert!(heap.promote(docid));
        assert!(heap.is_heap());
    }
    drop(heap);

    // The kept documents are still the best ones
    let mut expected: Vec<usize> = (0..accumulators.len()).collect();
    expected.sort_by(|a, b| compare(b, a));
    let mut observed = buffer.clone();
    observed.sort_by(|a, b| compare(b, a));
    assert_eq!(observed, expected[..5]);
}

#[test]
fn test_shuffled_permutations() {
    let mut rng = StdRng::seed_from_u64(23);
    let mut sequence: Vec<u32> = (0..64).collect();
    for _ in 0..50 {
        sequence.shuffle(&mut rng);
        let mut top = TopK::new(8, NaturalOrder);
        for &x in sequence.iter() {
            top.push(x);
        }
        assert_eq!(top.threshold(), Some(&56));
        assert_eq!(top.into_sorted_vec(), (56..64).rev().collect::<Vec<_>>());
    }
}
