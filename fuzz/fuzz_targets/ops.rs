#![no_main]

use arbitrary::Arbitrary;
use chartrie::Trie;
use libfuzzer_sys::fuzz_target;
use std::collections::HashMap;

#[derive(Arbitrary, Debug)]
pub enum Ops {
    Insert(String, u8),
    Get(String),
    FindByPrefix(String),
    InsertUnderPrefix(String, String, u8),
}

fuzz_target!(|data: Vec<Ops>| {
    let mut trie = Trie::<u8>::new();

    let mut twin = HashMap::<String, u8>::new();

    for datum in data {
        match datum {
            Ops::Insert(key, value) => {
                assert_eq!(trie.insert(&key, value), twin.insert(key, value));
            }
            Ops::Get(key) => {
                assert_eq!(trie.get_cloned(&key).ok(), twin.get(&key).copied());
            }
            Ops::FindByPrefix(prefix) => {
                let mut found = trie.find_by_prefix(&prefix).enumerate();
                let mut expected = twin
                    .iter()
                    .filter(|(k, _)| k.starts_with(&prefix))
                    .map(|(_, v)| *v)
                    .collect::<Vec<_>>();
                found.sort();
                expected.sort();
                assert_eq!(found, expected);
            }
            Ops::InsertUnderPrefix(prefix, rest, value) => {
                let mut sub = trie.find_by_prefix(&prefix);
                let previous = sub.insert(&rest, value);
                // Only a prefix with a path in the tree aliases it.
                if prefix.is_empty() || twin.keys().any(|k| k.starts_with(&prefix)) {
                    assert_eq!(previous, twin.insert(format!("{prefix}{rest}"), value));
                } else {
                    assert_eq!(previous, None);
                }
            }
        }

        assert_eq!(trie.size(), twin.len());
    }
});
