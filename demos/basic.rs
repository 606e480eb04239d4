use chartrie::Trie;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = Trie::<String>::new();

    if let Err(error) = tree.get("a") {
        warn!(%error, "lookup before any insert");
    }

    for word in [
        "cane", "cavallo", "cavia", "albero", "alberone", "cavolo", "cani", "22n", "22p", "22n",
    ] {
        tree.insert(word, format!("_{word}_"));
    }
    println!("{tree}\tSize: {}", tree.size());

    match tree.get("cane") {
        Ok(value) => println!("{}", *value),
        Err(error) => warn!(%error, "sample key missing"),
    }

    // Overwriting hands back the old value.
    if let Some(old) = tree.insert("cane", "_cane2_".to_string()) {
        println!("{old}");
    }
    println!("{tree}\tSize: {}", tree.size());

    let by_prefix = tree.find_by_prefix("ca");
    println!("{by_prefix}");
    info!(keys = ?by_prefix.completions(""), "completions of \"ca\"");
}
