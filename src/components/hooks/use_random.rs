use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

const PREFIX: &str = "docflow"; // Must NOT contain "/" or "-"

/// Unique DOM id for one mounted widget instance, e.g. `listbox_docflow_<hash>`.
pub fn use_random_id_for(element: &str) -> String {
    format!("{}_{PREFIX}_{}", element, generate_hash())
}

static COUNTER: AtomicUsize = AtomicUsize::new(1);

fn generate_hash() -> u64 {
    let mut hasher = DefaultHasher::new();
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);
    counter.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_prefixed_and_distinct() {
        let a = use_random_id_for("listbox");
        let b = use_random_id_for("listbox");
        assert!(a.starts_with("listbox_docflow_"));
        assert_ne!(a, b);
    }
}
