//! Batch data model and the sort primitive shared by every executor.
//!
//! A [`Batch`] is an ordered list of integer sequences. Position in the list
//! is the only identity a sequence has: executors read sequence `i` and must
//! publish its sorted copy at index `i` of the [`SortedBatch`] they return.

mod primitive;

pub use primitive::{is_non_decreasing, sort_sequence};

use serde::{Deserialize, Deserializer, Serialize};

/// An ordered list of integers with no uniqueness or sortedness precondition.
pub type Sequence = Vec<i64>;

/// Input to an executor.
///
/// Executors only ever see a shared reference, so the input cannot be
/// mutated while it is being sorted.
///
/// On the wire a batch is a bare array of sequences. A `null` sequence
/// decodes as an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Batch {
    sequences: Vec<Sequence>,
}

impl Batch {
    pub fn new(sequences: Vec<Sequence>) -> Self {
        Self { sequences }
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Sequence at `index`, if the batch is that long.
    pub fn get(&self, index: usize) -> Option<&[i64]> {
        self.sequences.get(index).map(Vec::as_slice)
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }
}

impl<'de> Deserialize<'de> for Batch {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sequences = Vec::<Option<Sequence>>::deserialize(deserializer)?;
        Ok(Self::new(
            sequences.into_iter().map(Option::unwrap_or_default).collect(),
        ))
    }
}

impl From<Vec<Sequence>> for Batch {
    fn from(sequences: Vec<Sequence>) -> Self {
        Self::new(sequences)
    }
}

/// Output of an executor: one sorted sequence per input sequence, same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SortedBatch {
    sequences: Vec<Sequence>,
}

impl SortedBatch {
    pub(crate) fn from_sequences(sequences: Vec<Sequence>) -> Self {
        Self { sequences }
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn into_sequences(self) -> Vec<Sequence> {
        self.sequences
    }

    /// Check that this is a valid sorted rendition of `batch`: same shape,
    /// every sequence non-decreasing and a permutation of its input.
    pub fn is_sorted_rendition_of(&self, batch: &Batch) -> bool {
        self.len() == batch.len()
            && self
                .sequences
                .iter()
                .zip(batch.sequences())
                .all(|(sorted, original)| {
                    is_non_decreasing(sorted) && sort_sequence(original) == *sorted
                })
    }
}
