use log::{debug, info, warn};
use thiserror::Error;
use tracksink_model::EventRecord;
use tracksink_runtime::DEFAULT_BATCH_SIZE;

use crate::{DriverError, Sink, Transaction, insert_statement};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to connect to {host}:{port}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: DriverError,
    },

    #[error("failed to open transaction for batch {batch}")]
    Begin {
        batch: usize,
        #[source]
        source: DriverError,
    },

    #[error("failed to prepare insert statement for batch {batch}")]
    Prepare {
        batch: usize,
        #[source]
        source: DriverError,
    },

    /// `record` is the zero-based position in the whole collection.
    #[error("failed to insert record {record} (batch {batch}); batch rolled back")]
    Execute {
        batch: usize,
        record: usize,
        #[source]
        source: DriverError,
    },

    #[error("failed to commit batch {batch}")]
    Commit {
        batch: usize,
        #[source]
        source: DriverError,
    },
}

/// Totals for a run where every batch committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub records: usize,
    pub batches: usize,
}

/// Batch size actually used for a requested value; non-positive means default.
pub fn effective_batch_size(requested: i64) -> usize {
    match usize::try_from(requested) {
        Ok(size) if size > 0 => size,
        _ => DEFAULT_BATCH_SIZE,
    }
}

/// Insert `records` into `sink`, `batch_size` records per transaction.
///
/// Each batch prepares the insert once, executes it for every record in
/// order and commits. The first failure rolls back the open batch and ends
/// the run: batches committed before it stay committed, later batches are
/// never started.
pub fn commit<S>(
    sink: &mut S,
    records: &[EventRecord],
    batch_size: i64,
) -> Result<CommitReport, SinkError>
where
    S: Sink,
{
    let size = effective_batch_size(batch_size);
    let sql = insert_statement();
    let mut report = CommitReport::default();

    debug!(
        "committing {} records in batches of {}",
        records.len(),
        size
    );

    for (batch, chunk) in records.chunks(size).enumerate() {
        commit_batch(sink, &sql, chunk, batch, batch * size)?;

        report.records += chunk.len();
        report.batches += 1;
        info!(
            "committed batch {} ({} records, {}/{} total)",
            batch,
            chunk.len(),
            report.records,
            records.len()
        );
    }

    Ok(report)
}

fn commit_batch<S>(
    sink: &mut S,
    sql: &str,
    chunk: &[EventRecord],
    batch: usize,
    first_record: usize,
) -> Result<(), SinkError>
where
    S: Sink,
{
    let mut tx = sink
        .begin()
        .map_err(|source| SinkError::Begin { batch, source })?;

    let statement = match tx.prepare(sql) {
        Ok(statement) => statement,
        Err(source) => {
            rollback(tx, batch);
            return Err(SinkError::Prepare { batch, source });
        }
    };

    for (offset, record) in chunk.iter().enumerate() {
        if let Err(source) = tx.execute(&statement, record) {
            rollback(tx, batch);
            return Err(SinkError::Execute {
                batch,
                record: first_record + offset,
                source,
            });
        }
    }

    tx.commit()
        .map_err(|source| SinkError::Commit { batch, source })
}

/// Explicit rollback; a failure here is logged and the caller's error wins.
/// Dropping the transaction still discards the batch on the driver side.
fn rollback<T: Transaction>(tx: T, batch: usize) {
    match tx.rollback() {
        Ok(()) => warn!("rolled back batch {batch}"),
        Err(e) => warn!("rollback of batch {batch} failed: {e}"),
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
