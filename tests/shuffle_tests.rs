//! Distribution checks for the two shuffles
//!
//! Shuffling a three-element queue many times must produce each of the six
//! permutations about equally often.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use ring_queue::Queue;

const TRIALS: usize = 60_000;
const TOLERANCE: usize = 500;

fn permutation_counts<F>(mut shuffle: F) -> HashMap<String, usize>
where
    F: FnMut(&mut Queue),
{
    let mut counts = HashMap::new();
    for _ in 0..TRIALS {
        let mut queue = Queue::try_from_iter(["1", "2", "3"]).unwrap();
        shuffle(&mut queue);
        *counts.entry(queue.to_string()).or_insert(0) += 1;
    }
    counts
}

fn assert_uniform(counts: &HashMap<String, usize>) {
    assert_eq!(counts.len(), 6, "not every permutation appeared: {counts:?}");
    let expected = TRIALS / 6;
    for (permutation, &count) in counts {
        assert!(
            count.abs_diff(expected) <= TOLERANCE,
            "{permutation} seen {count} times, expected about {expected}"
        );
    }
}

#[test]
fn test_shuffle_is_uniform() {
    let mut rng = StdRng::seed_from_u64(0xdecade);
    let counts = permutation_counts(|queue| queue.shuffle(&mut rng));
    assert_uniform(&counts);
}

#[test]
fn test_shuffle_in_place_is_uniform() {
    let mut rng = StdRng::seed_from_u64(0xfacade);
    let counts = permutation_counts(|queue| queue.shuffle_in_place(&mut rng));
    assert_uniform(&counts);
}

#[test]
fn test_two_element_shuffle_flips() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut flipped = 0;
    for _ in 0..10_000 {
        let mut queue = Queue::try_from_iter(["a", "b"]).unwrap();
        queue.shuffle_in_place(&mut rng);
        if queue.to_string() == "[b a]" {
            flipped += 1;
        }
    }
    assert!((4_500..=5_500).contains(&flipped), "flipped {flipped} times");
}
