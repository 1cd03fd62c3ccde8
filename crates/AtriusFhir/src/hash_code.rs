use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use once_cell::sync::OnceCell;

/// Memoized structural hash of the record that owns it.
///
/// The cell is bookkeeping, not data: it compares equal to every other cell
/// and contributes nothing to `Hash`, so a derived `PartialEq`/`Hash` on the
/// owning struct stays purely structural. Two threads racing on the first
/// call both compute the same value; only one is stored.
#[derive(Clone, Default)]
pub struct HashCode(OnceCell<u64>);

impl HashCode {
    /// Returns the cached hash of `value`, computing it on first use.
    pub fn get_or_compute<T: Hash + ?Sized>(&self, value: &T) -> u64 {
        *self.0.get_or_init(|| {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        })
    }

    pub fn is_computed(&self) -> bool {
        self.0.get().is_some()
    }
}

impl PartialEq for HashCode {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for HashCode {}

impl Hash for HashCode {
    fn hash<H: Hasher>(&self, _: &mut H) {}
}

impl fmt::Debug for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.get() {
            Some(h) => write!(f, "HashCode({h:#x})"),
            None => f.write_str("HashCode(<pending>)"),
        }
    }
}
