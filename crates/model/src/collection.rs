use std::{fmt, slice};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
};

use crate::EventRecord;

/// Key holding the record array in the object-wrapped envelope.
pub const TRACKS_FIELD: &str = "tracks";

/// Top-level JSON shape wrapping the record array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Envelope {
    /// `[ {record}, ... ]`
    #[default]
    Array,
    /// `{ "tracks": [ {record}, ... ] }`
    Tracks,
}

/// Ordered playback events decoded from one export file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCollection {
    records: Vec<EventRecord>,
}

impl RecordCollection {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn iter(&self) -> slice::Iter<'_, EventRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }

    /// Encode the collection as JSON in the requested envelope.
    pub fn to_json(&self, envelope: Envelope) -> serde_json::Result<Vec<u8>> {
        match envelope {
            Envelope::Array => serde_json::to_vec(self),
            Envelope::Tracks => serde_json::to_vec(&TracksEnvelope {
                tracks: &self.records,
            }),
        }
    }
}

impl From<Vec<EventRecord>> for RecordCollection {
    fn from(records: Vec<EventRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for RecordCollection {
    type Item = EventRecord;
    type IntoIter = std::vec::IntoIter<EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a EventRecord;
    type IntoIter = slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Serialize)]
struct TracksEnvelope<'a> {
    tracks: &'a [EventRecord],
}

impl Serialize for RecordCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecordCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EnvelopeVisitor)
    }
}

/// Branches on the leading token: a sequence is the bare envelope, a map
/// must carry the `tracks` array. Everything else falls through to the
/// default `invalid_type` errors.
struct EnvelopeVisitor;

impl<'de> Visitor<'de> for EnvelopeVisitor {
    type Value = RecordCollection;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "an array of playback events or an object with a \"{TRACKS_FIELD}\" array"
        )
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        // size_hint comes from untrusted input.
        let mut records = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(record) = seq.next_element::<EventRecord>()? {
            records.push(record);
        }
        Ok(RecordCollection { records })
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut tracks: Option<Vec<EventRecord>> = None;

        while let Some(key) = map.next_key::<String>()? {
            if key == TRACKS_FIELD {
                if tracks.is_some() {
                    return Err(de::Error::duplicate_field(TRACKS_FIELD));
                }
                tracks = Some(map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        let records = tracks.ok_or_else(|| de::Error::missing_field(TRACKS_FIELD))?;
        Ok(RecordCollection { records })
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
