/*!
The length/indexing abstraction that patterns match against.

§6 of the design describes a "process-wide mapping `container-type →
(container → usize)`" as the length registry. The redesign notes (§9) call
for replacing that runtime type-keyed lookup with ordinary trait
resolution, which is what [`Sequence`] does: any container a caller wants to
match against simply implements it, the way `regex-automata`'s engines are
generic over anything that can be viewed as `&[u8]` rather than maintaining
a registry of supported haystack types.
*/

use std::collections::{HashMap, VecDeque};

/// A container that can be walked by a pattern.
///
/// This is the generalization of §6's container-length registry: instead of
/// a dynamic `container-type → usize` table, any type that knows its own
/// length and how to project an element at a given index can be matched
/// against directly.
pub trait Sequence {
    /// The element type yielded by [`Sequence::get`].
    type Item;

    /// The number of elements in this container.
    fn seq_len(&self) -> usize;

    /// Returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `index >= self.seq_len()`. The engine
    /// never calls this out of bounds.
    fn seq_get(&self, index: usize) -> &Self::Item;

    /// Returns the elements in `[start, end)` as a slice-like view, used by
    /// window-style callback atoms.
    fn seq_window(&self, start: usize, end: usize) -> Vec<&Self::Item> {
        (start..end).map(|i| self.seq_get(i)).collect()
    }
}

impl<T> Sequence for Vec<T> {
    type Item = T;

    fn seq_len(&self) -> usize {
        self.len()
    }

    fn seq_get(&self, index: usize) -> &T {
        &self[index]
    }
}

impl<T> Sequence for [T] {
    type Item = T;

    fn seq_len(&self) -> usize {
        self.len()
    }

    fn seq_get(&self, index: usize) -> &T {
        &self[index]
    }
}

impl<T> Sequence for VecDeque<T> {
    type Item = T;

    fn seq_len(&self) -> usize {
        self.len()
    }

    fn seq_get(&self, index: usize) -> &T {
        &self[index]
    }
}

impl<'a, S: Sequence + ?Sized> Sequence for &'a S {
    type Item = S::Item;

    fn seq_len(&self) -> usize {
        (**self).seq_len()
    }

    fn seq_get(&self, index: usize) -> &S::Item {
        (**self).seq_get(index)
    }
}

/// A length adapter for an associative container, matching §6's legacy
/// "length = value under key `length`, else length of an arbitrary value"
/// rule. Kept as an explicit wrapper rather than a blanket impl over `HashMap`
/// so that ordinary maps used as plain [`Sequence`]s aren't silently given
/// this surprising size semantic.
pub struct KeyedLength<'a, K, V> {
    map: &'a HashMap<K, V>,
    length_key: K,
}

impl<'a, K, V> KeyedLength<'a, K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Sequence,
{
    /// Wrap `map`, deriving a length from the value under `length_key` if
    /// present, or else from an arbitrary value in the map.
    pub fn new(map: &'a HashMap<K, V>, length_key: K) -> KeyedLength<'a, K, V> {
        KeyedLength { map, length_key }
    }

    fn canonical_len(&self) -> usize {
        if let Some(v) = self.map.get(&self.length_key) {
            return v.seq_len();
        }
        self.map.values().next().map_or(0, Sequence::seq_len)
    }
}

impl<'a, K, V> Sequence for KeyedLength<'a, K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Sequence,
{
    type Item = ();

    fn seq_len(&self) -> usize {
        self.canonical_len()
    }

    fn seq_get(&self, _index: usize) -> &() {
        &()
    }
}

/// A collection of named sequences, used by the `subset_name`-keyed match
/// entry point of §6: `pattern.match(name1 => data1, name2 => data2, …)`.
///
/// One container is always distinguished as the `primary`: it determines the
/// overall match's length and offsets, and is what any atom with no
/// `subset_name` of its own is matched against. Atoms that do carry a
/// `subset_name` are instead matched against the container registered under
/// that name, at the same `left`/`length` window the primary established.
///
/// All subsets must share the same element type; dispatching a tree of
/// patterns across genuinely heterogeneous container types would require
/// type erasure this crate does not take on (see `SPEC_FULL.md` §4, Open
/// Questions).
pub struct NamedData<'a, S: Sequence> {
    primary: &'a S,
    subsets: HashMap<String, &'a S>,
}

impl<'a, S: Sequence> NamedData<'a, S> {
    /// Creates a named-data bundle whose length/offset space is `primary`'s
    /// own.
    pub fn new(primary: &'a S) -> NamedData<'a, S> {
        NamedData { primary, subsets: HashMap::new() }
    }

    /// Registers `data` under `name`, to be used by any atom whose
    /// `subset_name` equals `name`.
    pub fn insert(mut self, name: impl Into<String>, data: &'a S) -> NamedData<'a, S> {
        self.subsets.insert(name.into(), data);
        self
    }

    /// The container that determines this match's own length/offsets.
    pub fn primary(&self) -> &'a S {
        self.primary
    }

    /// Looks up the subset registered under `name`.
    pub fn get(&self, name: &str) -> Option<&'a S> {
        self.subsets.get(name).copied()
    }

    /// The container an atom carrying `subset_name` should actually read
    /// from: the named subset if one was registered, else `primary`.
    pub(crate) fn resolve(&self, subset_name: Option<&str>) -> &'a S {
        match subset_name.and_then(|name| self.get(name)) {
            Some(s) => s,
            None => self.primary,
        }
    }
}
