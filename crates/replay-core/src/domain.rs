//! Candidate domains.
//!
//! `DomainSet` packs the candidates of one cell into a `u16` bitmask (bit
//! `v - 1` set means value `v` is still possible). `DomainGrid` is the 9x9
//! array-of-domains value type embedded in revert events as a full-state
//! snapshot; both are `Copy` so snapshots never alias live state.

use crate::board::Position;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const ALL_MASK: u16 = 0x1FF;

/// Set of candidate values from `{1..9}` for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomainSet(u16);

impl DomainSet {
    /// The empty set.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The full set `{1..9}`.
    #[inline]
    pub const fn full() -> Self {
        Self(ALL_MASK)
    }

    /// A set holding exactly one value.
    #[inline]
    pub fn singleton(value: u8) -> Self {
        debug_assert!((1..=9).contains(&value));
        Self(1 << (value - 1))
    }

    #[inline]
    pub fn contains(self, value: u8) -> bool {
        (1..=9).contains(&value) && self.0 & (1 << (value - 1)) != 0
    }

    #[inline]
    pub fn insert(&mut self, value: u8) {
        debug_assert!((1..=9).contains(&value));
        self.0 |= 1 << (value - 1);
    }

    /// Remove `value` if present; removing an absent value is a no-op.
    #[inline]
    pub fn remove(&mut self, value: u8) {
        debug_assert!((1..=9).contains(&value));
        self.0 &= !(1 << (value - 1));
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_singleton(self) -> bool {
        self.0.count_ones() == 1
    }

    /// The single remaining value, if the set is a singleton.
    #[inline]
    pub fn sole_value(self) -> Option<u8> {
        if self.is_singleton() {
            Some(self.0.trailing_zeros() as u8 + 1)
        } else {
            None
        }
    }

    /// Iterate the candidates in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (1..=9).filter(move |&v| self.contains(v))
    }

    /// Candidates as an ascending `Vec`.
    pub fn to_vec(self) -> Vec<u8> {
        self.iter().collect()
    }
}

impl Default for DomainSet {
    fn default() -> Self {
        Self::full()
    }
}

impl FromIterator<u8> for DomainSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut set = Self::empty();
        for v in iter {
            set.insert(v);
        }
        set
    }
}

impl std::fmt::Display for DomainSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "}}")
    }
}

// Domains travel as arrays of candidate values on the wire.
impl Serialize for DomainSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len() as usize))?;
        for v in self.iter() {
            seq.serialize_element(&v)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for DomainSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DomainVisitor;

        impl<'de> Visitor<'de> for DomainVisitor {
            type Value = DomainSet;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a sequence of candidate values 1-9")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut set = DomainSet::empty();
                while let Some(v) = seq.next_element::<u8>()? {
                    if !(1..=9).contains(&v) {
                        return Err(serde::de::Error::custom(format!(
                            "candidate value {} out of range 1-9",
                            v
                        )));
                    }
                    set.insert(v);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_seq(DomainVisitor)
    }
}

/// Immutable 9x9 snapshot of every cell's domain, copied by value into
/// revert events and copied out wholesale during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainGrid([[DomainSet; 9]; 9]);

impl DomainGrid {
    /// Every cell at the full `{1..9}` domain.
    pub fn full() -> Self {
        Self([[DomainSet::full(); 9]; 9])
    }

    #[inline]
    pub fn get(&self, pos: Position) -> DomainSet {
        self.0[pos.row][pos.col]
    }

    #[inline]
    pub fn set(&mut self, pos: Position, domain: DomainSet) {
        self.0[pos.row][pos.col] = domain;
    }
}

impl Default for DomainGrid {
    fn default() -> Self {
        Self::full()
    }
}
