//! Stress tests that push the queue operations to large sizes
//!
//! These tests run long queues through every operation to catch edge cases
//! in relinking and to check that nothing leaks or corrupts the ring under
//! load.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ring_queue::{Chain, Queue, ReverseStrategy, SortOrder, SortStrategy};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{i:06}")).collect()
}

fn random_values(rng: &mut StdRng, n: usize) -> Vec<String> {
    (0..n).map(|_| format!("{:04}", rng.gen_range(0..1000))).collect()
}

fn contents(queue: &Queue) -> Vec<String> {
    queue.iter().map(str::to_owned).collect()
}

#[test]
fn test_massive_insert_remove() {
    init_tracing();
    let mut queue = Queue::new();
    for value in numbered(100_000) {
        queue.insert_tail(&value).unwrap();
    }
    assert_eq!(queue.size(), 100_000);

    for i in 0..50_000 {
        let head = queue.remove_head(None).unwrap();
        assert_eq!(head.value(), format!("{i:06}"));
    }
    for i in (50_000..100_000).rev() {
        let tail = queue.remove_tail(None).unwrap();
        assert_eq!(tail.value(), format!("{i:06}"));
    }
    assert!(queue.is_empty());
}

#[test]
fn test_alternating_ends() {
    let mut queue = Queue::new();
    for i in 0..5_000 {
        queue.insert_head(&format!("h{i}")).unwrap();
        queue.insert_tail(&format!("t{i}")).unwrap();
        if i % 3 == 0 {
            queue.remove_head(None);
        }
    }
    let expected = 10_000 - (0..5_000).filter(|i| i % 3 == 0).count();
    assert_eq!(queue.size(), expected);
}

#[test]
fn test_large_reversals() {
    init_tracing();
    let values = numbered(50_000);
    let mut reversed = values.clone();
    reversed.reverse();

    let mut queue = Queue::try_from_iter(&values).unwrap();
    queue.reverse();
    assert_eq!(contents(&queue), reversed);
    queue.reverse_bidirectional();
    assert_eq!(contents(&queue), values);

    for strategy in [ReverseStrategy::Iterative, ReverseStrategy::Bidirectional] {
        let mut queue = Queue::try_from_iter(&values).unwrap();
        queue.reverse_k_with(1_000, strategy);
        let mut model = values.clone();
        for group in model.chunks_exact_mut(1_000) {
            group.reverse();
        }
        assert_eq!(contents(&queue), model, "{strategy:?}");
    }
}

/// One stack frame per element, so kept well below default stack limits.
#[test]
fn test_recursive_reverse_moderate() {
    let values = numbered(5_000);
    let mut queue = Queue::try_from_iter(&values).unwrap();
    queue.reverse_recursive();
    queue.reverse_recursive();
    assert_eq!(contents(&queue), values);
}

#[test]
fn test_large_sorts() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let values = random_values(&mut rng, 100_000);
    let mut model = values.clone();
    model.sort();

    let mut top_down = Queue::try_from_iter(&values).unwrap();
    top_down.sort(SortOrder::Ascending);
    assert_eq!(contents(&top_down), model);

    let mut bottom_up = Queue::try_from_iter(&values).unwrap();
    bottom_up.sort_by(&SortOrder::Ascending);
    assert_eq!(contents(&bottom_up), model);

    // Already sorted and reverse sorted inputs.
    top_down.sort(SortOrder::Descending);
    bottom_up.sort_by(&SortOrder::Descending);
    model.reverse();
    assert_eq!(contents(&top_down), model);
    assert_eq!(contents(&bottom_up), model);
}

#[test]
fn test_large_filters() {
    let mut rng = StdRng::seed_from_u64(17);
    let values = random_values(&mut rng, 50_000);

    let mut sorted = Queue::try_from_iter(&values).unwrap();
    sorted.sort(SortOrder::Ascending);
    assert!(sorted.delete_dup());
    let kept = contents(&sorted);
    assert!(kept.windows(2).all(|w| w[0] < w[1]));

    let mut queue = Queue::try_from_iter(&values).unwrap();
    let survivors = queue.ascend();
    let kept = contents(&queue);
    assert_eq!(kept.len(), survivors);
    assert!(kept.windows(2).all(|w| w[0] < w[1]));

    let mut queue = Queue::try_from_iter(&values).unwrap();
    let survivors = queue.descend();
    let kept = contents(&queue);
    assert_eq!(kept.len(), survivors);
    assert!(kept.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(kept.first(), values.iter().max());
}

#[test]
fn test_repeated_delete_mid() {
    let values = numbered(2_001);
    let mut queue = Queue::try_from_iter(&values).unwrap();
    let mut model = values;
    while !model.is_empty() {
        assert!(queue.delete_mid());
        model.remove((model.len() - 1) / 2);
    }
    assert!(queue.is_empty());
    assert!(!queue.delete_mid());
}

#[test]
fn test_wide_chain_merge() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(99);

    for strategy in SortStrategy::ALL {
        let mut chain = Chain::new();
        let mut all = Vec::new();
        let first = chain.new_queue();
        for _ in 0..199 {
            chain.new_queue();
        }
        let ids: Vec<usize> = chain.iter().map(|context| context.id()).collect();
        for id in ids {
            let len = rng.gen_range(0..100);
            let values = random_values(&mut rng, len);
            let queue = chain.get_mut(id).unwrap();
            for value in &values {
                queue.insert_tail(value).unwrap();
            }
            all.extend(values);
        }

        all.sort();
        assert_eq!(chain.merge_with(SortOrder::Ascending, strategy), all.len());
        assert_eq!(contents(chain.get(first).unwrap()), all);
        assert_eq!(chain.total_size(), all.len());
    }
}

#[test]
fn test_many_shuffles() {
    let mut rng = StdRng::seed_from_u64(2024);
    let values = numbered(500);
    let mut queue = Queue::try_from_iter(&values).unwrap();
    for round in 0..50 {
        if round % 2 == 0 {
            queue.shuffle(&mut rng);
        } else {
            queue.shuffle_in_place(&mut rng);
        }
    }
    let mut got = contents(&queue);
    assert_ne!(got, values);
    got.sort();
    assert_eq!(got, values);
}
