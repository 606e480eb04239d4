#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use chartrie::Trie;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut unstructured = Unstructured::new(data);

    let Ok(mut trie) = Trie::<u64>::arbitrary(&mut unstructured) else {
        return;
    };
    let (Ok(key), Ok(value)) = (
        String::arbitrary(&mut unstructured),
        u64::arbitrary(&mut unstructured),
    ) else {
        return;
    };

    let size = trie.size();
    let previous = trie.insert(&key, value);
    assert_eq!(trie.get_cloned(&key), Ok(value));
    assert_eq!(trie.size(), size + usize::from(previous.is_none()));
});
