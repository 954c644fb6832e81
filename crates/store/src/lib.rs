mod batch;
mod pg;
mod sink;
mod sql;

pub use batch::{CommitReport, SinkError, commit, effective_batch_size};
pub use pg::{PgSink, PgTransaction};
pub use sink::{DriverError, Sink, Transaction};
pub use sql::{COLUMNS, insert_statement};
