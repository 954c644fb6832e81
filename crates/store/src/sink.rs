use tracksink_model::EventRecord;

/// Error type surfaced by sink drivers.
pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

/// A relational destination able to open transactions.
pub trait Sink {
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    fn begin(&mut self) -> Result<Self::Transaction<'_>, DriverError>;
}

/// An open transaction on a [`Sink`].
///
/// `commit` and `rollback` consume the transaction. Implementations must
/// roll back when an unfinished transaction is dropped.
pub trait Transaction {
    /// Prepared statement handle, valid for the lifetime of the transaction.
    type Statement;

    fn prepare(&mut self, sql: &str) -> Result<Self::Statement, DriverError>;

    /// Bind `record` in column order and run `statement` once.
    fn execute(
        &mut self,
        statement: &Self::Statement,
        record: &EventRecord,
    ) -> Result<(), DriverError>;

    fn commit(self) -> Result<(), DriverError>;

    fn rollback(self) -> Result<(), DriverError>;
}
