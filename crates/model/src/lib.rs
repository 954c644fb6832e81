mod collection;
mod record;
mod source;

pub use collection::{Envelope, RecordCollection, TRACKS_FIELD};
pub use record::{EventRecord, FIELD_COUNT};
pub use source::{LoadError, load, parse};
