use std::fmt::Debug;
use std::hash::Hash;

/// Marker for identifier types usable as entity keys.
///
/// The whole data layer is generic over the key; nothing identifier-specific
/// (string vs integer vs UUID) leaks into it. `Ord` backs the deterministic
/// tie-break in ranked queries, `Hash` backs in-memory indexing.
pub trait EntityKey: Clone + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

impl<T> EntityKey for T where T: Clone + Eq + Ord + Hash + Debug + Send + Sync + 'static {}
