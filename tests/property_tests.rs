//! Property-based tests using proptest
//!
//! Every operation is checked against a plain `Vec<String>` model: the
//! queue must end up holding exactly what the model holds, in the same
//! order.

use proptest::prelude::*;
use ring_queue::{Queue, SortOrder};

fn build(values: &[String]) -> Queue {
    Queue::try_from_iter(values).unwrap()
}

fn contents(queue: &Queue) -> Vec<String> {
    queue.iter().map(str::to_owned).collect()
}

/// Short lowercase payloads, so duplicates and ties are common.
fn payloads(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{0,2}", 0..max_len)
}

/// Applies a sequence of head/tail inserts and removals to both the queue
/// and a `Vec` model.
fn test_queue_ops_match_model(ops: Vec<(u8, String)>) -> Result<(), TestCaseError> {
    let mut queue = Queue::new();
    let mut model: Vec<String> = Vec::new();

    for (op, value) in ops {
        match op {
            0 => {
                queue.insert_head(&value).unwrap();
                model.insert(0, value);
            }
            1 => {
                queue.insert_tail(&value).unwrap();
                model.push(value);
            }
            2 => {
                let removed = queue.remove_head(None).map(|e| e.into_value());
                let expected = if model.is_empty() {
                    None
                } else {
                    Some(model.remove(0))
                };
                prop_assert_eq!(removed, expected);
            }
            _ => {
                let removed = queue.remove_tail(None).map(|e| e.into_value());
                prop_assert_eq!(removed, model.pop());
            }
        }
        prop_assert_eq!(queue.size(), model.len());
        prop_assert_eq!(queue.is_empty(), model.is_empty());
    }

    prop_assert_eq!(contents(&queue), model);
    Ok(())
}

fn test_remove_buffer_truncation(value: String, buf_len: usize) -> Result<(), TestCaseError> {
    let mut queue = Queue::new();
    queue.insert_tail(&value).unwrap();

    let mut buf = vec![0xffu8; buf_len];
    queue.remove_head(Some(&mut buf)).unwrap();

    if buf_len > 0 {
        let copied = value.len().min(buf_len - 1);
        prop_assert_eq!(&buf[..copied], &value.as_bytes()[..copied]);
        prop_assert_eq!(buf[copied], 0);
    }
    Ok(())
}

fn test_delete_mid_model(values: Vec<String>) -> Result<(), TestCaseError> {
    let mut queue = build(&values);
    let mut model = values;

    let deleted = queue.delete_mid();
    prop_assert_eq!(deleted, !model.is_empty());
    if !model.is_empty() {
        model.remove((model.len() - 1) / 2);
    }
    prop_assert_eq!(contents(&queue), model);
    Ok(())
}

fn test_delete_dup_model(values: Vec<String>) -> Result<(), TestCaseError> {
    let mut queue = build(&values);

    let mut model = Vec::new();
    let mut i = 0;
    while i < values.len() {
        let mut j = i + 1;
        while j < values.len() && values[j] == values[i] {
            j += 1;
        }
        if j - i == 1 {
            model.push(values[i].clone());
        }
        i = j;
    }

    prop_assert_eq!(queue.delete_dup(), !values.is_empty());
    prop_assert_eq!(contents(&queue), model);
    Ok(())
}

fn test_swap_pairs_model(values: Vec<String>) -> Result<(), TestCaseError> {
    let mut model = values.clone();
    for pair in model.chunks_mut(2) {
        pair.reverse();
    }

    let mut moved = build(&values);
    moved.swap_pairs();
    prop_assert_eq!(contents(&moved), model.clone());

    let mut exchanged = build(&values);
    exchanged.swap_pairs_positional();
    prop_assert_eq!(contents(&exchanged), model);
    Ok(())
}

fn test_reverse_model(values: Vec<String>) -> Result<(), TestCaseError> {
    let mut model = values.clone();
    model.reverse();

    let mut queue = build(&values);
    queue.reverse();
    prop_assert_eq!(contents(&queue), model.clone());

    queue.reverse_recursive();
    prop_assert_eq!(contents(&queue), values.clone());

    queue.reverse_bidirectional();
    prop_assert_eq!(contents(&queue), model);
    Ok(())
}

fn test_reverse_k_model(values: Vec<String>, k: usize) -> Result<(), TestCaseError> {
    let mut model = values.clone();
    if k > 1 {
        for group in model.chunks_exact_mut(k) {
            group.reverse();
        }
    }

    let mut queue = build(&values);
    queue.reverse_k(k);
    prop_assert_eq!(contents(&queue), model);
    Ok(())
}

fn test_sort_model(values: Vec<String>, descend: bool) -> Result<(), TestCaseError> {
    let order = SortOrder::from_descending(descend);
    let mut model = values.clone();
    model.sort();
    if descend {
        model.reverse();
    }

    let mut top_down = build(&values);
    top_down.sort(order);
    prop_assert_eq!(contents(&top_down), model.clone());

    let mut bottom_up = build(&values);
    bottom_up.sort_by(&order);
    prop_assert_eq!(contents(&bottom_up), model.clone());

    // Sorting a sorted queue changes nothing.
    top_down.sort(order);
    prop_assert_eq!(contents(&top_down), model.clone());
    bottom_up.sort_by(&order);
    prop_assert_eq!(contents(&bottom_up), model);
    Ok(())
}

/// Sorting `key:tag` payloads by key must keep tags in insertion order.
fn test_sort_stability(keys: Vec<u8>) -> Result<(), TestCaseError> {
    let values: Vec<String> = keys
        .iter()
        .enumerate()
        .map(|(tag, key)| format!("{key}:{tag:03}"))
        .collect();
    let by_key = |a: &str, b: &str| {
        let key = |s: &str| s.split(':').next().unwrap_or("").to_owned();
        key(a).cmp(&key(b))
    };

    let mut model = values.clone();
    model.sort_by(|a, b| by_key(a.as_str(), b.as_str()));

    let mut top_down = build(&values);
    top_down.merge_sort_by(&by_key);
    prop_assert_eq!(contents(&top_down), model.clone());

    let mut bottom_up = build(&values);
    bottom_up.sort_by(&by_key);
    prop_assert_eq!(contents(&bottom_up), model);
    Ok(())
}

fn test_ascend_model(values: Vec<String>) -> Result<(), TestCaseError> {
    let mut model = Vec::new();
    let mut max = String::new();
    for value in &values {
        if *value > max {
            max = value.clone();
            model.push(value.clone());
        }
    }

    let mut queue = build(&values);
    prop_assert_eq!(queue.ascend(), model.len());
    prop_assert_eq!(contents(&queue), model.clone());
    // Idempotent.
    prop_assert_eq!(queue.ascend(), model.len());
    Ok(())
}

fn test_descend_model(values: Vec<String>) -> Result<(), TestCaseError> {
    let mut model = Vec::new();
    let mut max = String::new();
    for value in values.iter().rev() {
        if *value > max {
            max = value.clone();
            model.push(value.clone());
        }
    }
    model.reverse();

    let mut queue = build(&values);
    prop_assert_eq!(queue.descend(), model.len());
    prop_assert_eq!(contents(&queue), model.clone());
    prop_assert_eq!(queue.descend(), model.len());
    Ok(())
}

proptest! {
    #[test]
    fn test_queue_ops(ops in prop::collection::vec((0u8..4, "[a-z]{0,6}"), 0..100)) {
        test_queue_ops_match_model(ops)?;
    }

    #[test]
    fn test_remove_buffer(value in "[ -~]{0,12}", buf_len in 0usize..16) {
        test_remove_buffer_truncation(value, buf_len)?;
    }

    #[test]
    fn test_delete_mid(values in payloads(40)) {
        test_delete_mid_model(values)?;
    }

    #[test]
    fn test_delete_dup(values in payloads(40)) {
        test_delete_dup_model(values)?;
    }

    #[test]
    fn test_delete_dup_sorted(mut values in payloads(40)) {
        values.sort();
        test_delete_dup_model(values)?;
    }

    #[test]
    fn test_swap_pairs(values in payloads(40)) {
        test_swap_pairs_model(values)?;
    }

    #[test]
    fn test_reverse(values in payloads(60)) {
        test_reverse_model(values)?;
    }

    #[test]
    fn test_reverse_k(values in payloads(60), k in 0usize..10) {
        test_reverse_k_model(values, k)?;
    }

    #[test]
    fn test_sort(values in payloads(80), descend in prop::bool::ANY) {
        test_sort_model(values, descend)?;
    }

    #[test]
    fn test_sort_is_stable(keys in prop::collection::vec(0u8..5, 0..80)) {
        test_sort_stability(keys)?;
    }

    #[test]
    fn test_ascend(values in payloads(40)) {
        test_ascend_model(values)?;
    }

    #[test]
    fn test_descend(values in payloads(40)) {
        test_descend_model(values)?;
    }
}
