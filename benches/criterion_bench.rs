//! Compares the trie against [HashMap] on seeded random keys: insertion,
//! lookup of every key, and collecting every value under a prefix.

use std::collections::HashMap;

use chartrie::Trie;
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const KEY_LENGTH: usize = 10;
const KEY_COUNT: usize = 100_000;
const PREFIX: &str = "abc";

/// Keys and values, duplicates possible.
fn get_random_entries() -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..KEY_COUNT)
        .map(|_| {
            let key = (0..KEY_LENGTH)
                .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
                .collect::<String>();
            let value = format!("{key}_");
            (key, value)
        })
        .collect()
}

fn make_trie(entries: &[(String, String)]) -> Trie<String> {
    entries.iter().cloned().collect()
}

fn make_map(entries: &[(String, String)]) -> HashMap<String, String> {
    entries.iter().cloned().collect()
}

fn insert(b: &mut Criterion) {
    let entries = get_random_entries();
    b.bench_function("chartrie insert", |b| {
        b.iter_batched(|| entries.clone(), |e| make_trie(black_box(&e)), BatchSize::LargeInput)
    });
    b.bench_function("hashmap insert", |b| {
        b.iter_batched(|| entries.clone(), |e| make_map(black_box(&e)), BatchSize::LargeInput)
    });
}

fn get(b: &mut Criterion) {
    let entries = get_random_entries();
    let trie = make_trie(&entries);
    let map = make_map(&entries);
    b.bench_function("chartrie get", |b| {
        b.iter(|| {
            entries
                .iter()
                .filter(|(k, _)| trie.contains_key(black_box(k)))
                .count()
        })
    });
    b.bench_function("hashmap get", |b| {
        b.iter(|| {
            entries
                .iter()
                .filter_map(|(k, _)| map.get(black_box(k)))
                .count()
        })
    });
}

fn prefix(b: &mut Criterion) {
    let entries = get_random_entries();
    let trie = make_trie(&entries);
    let map = make_map(&entries);
    b.bench_function("chartrie prefix", |b| {
        b.iter(|| trie.find_by_prefix(black_box(PREFIX)).enumerate())
    });
    b.bench_function("hashmap prefix", |b| {
        b.iter(|| {
            let mut found = map
                .iter()
                .filter(|(k, _)| k.starts_with(black_box(PREFIX)))
                .map(|(_, v)| v.clone())
                .collect::<Vec<_>>();
            // The trie hands them back in key order.
            found.sort();
            found
        })
    });
}

criterion_group!(benches, insert, get, prefix);

criterion_main!(benches);
