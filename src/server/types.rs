use crate::executor::Timed;
use crate::sort::{Batch, Sequence, SortedBatch};
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

const TO_SORT_FIELD: &str = "to_sort";

/// Body of a processing request.
///
/// Decoding is lenient in the same places a Go `encoding/json` client
/// expects:
///
/// - a `null` body, a missing `to_sort`, or `to_sort: null` is an empty batch
/// - the `to_sort` key matches ASCII case-insensitively (`TO_SORT`, `To_Sort`)
///   and the last matching key wins
/// - unknown fields are ignored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortRequest {
    pub to_sort: Batch,
}

impl<'de> Deserialize<'de> for SortRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(SortRequestVisitor)
    }
}

struct SortRequestVisitor;

impl<'de> Visitor<'de> for SortRequestVisitor {
    type Value = SortRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with a `to_sort` field, or null")
    }

    fn visit_unit<E>(self) -> Result<SortRequest, E> {
        Ok(SortRequest::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<SortRequest, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut to_sort = Batch::default();
        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case(TO_SORT_FIELD) {
                to_sort = map.next_value::<Option<Batch>>()?.unwrap_or_default();
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(SortRequest { to_sort })
    }
}

/// Body of a successful processing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortResponse {
    pub sorted_arrays: Vec<Sequence>,
    pub time_ns: u64,
}

impl From<Timed<SortedBatch>> for SortResponse {
    fn from(timed: Timed<SortedBatch>) -> Self {
        Self {
            time_ns: timed.elapsed_ns(),
            sorted_arrays: timed.value.into_sequences(),
        }
    }
}
