use std::error::Error;

use bytes::BytesMut;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::info;
use postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use postgres::{Client, Config, NoTls, Statement};
use thiserror::Error;
use tracksink_model::{EventRecord, FIELD_COUNT};
use tracksink_runtime::DbConfig;

use crate::{COLUMNS, DriverError, Sink, SinkError, Transaction};

/// Blocking PostgreSQL connection used as the event sink.
pub struct PgSink {
    client: Client,
}

impl PgSink {
    /// Open a plaintext connection described by `config`.
    pub fn connect(config: &DbConfig) -> Result<Self, SinkError> {
        let client = Config::new()
            .user(&config.user)
            .dbname(&config.dbname)
            .password(&config.password)
            .host(&config.host)
            .port(config.port)
            .connect(NoTls)
            .map_err(|e| SinkError::Connect {
                host: config.host.clone(),
                port: config.port,
                source: e.into(),
            })?;

        info!(
            "connected to {}:{}/{} as {}",
            config.host, config.port, config.dbname, config.user
        );
        Ok(Self { client })
    }
}

impl Sink for PgSink {
    type Transaction<'a> = PgTransaction<'a>;

    fn begin(&mut self) -> Result<PgTransaction<'_>, DriverError> {
        Ok(PgTransaction {
            inner: self.client.transaction()?,
        })
    }
}

/// Open transaction on a [`PgSink`]; `postgres` rolls it back on drop.
pub struct PgTransaction<'a> {
    inner: postgres::Transaction<'a>,
}

impl Transaction for PgTransaction<'_> {
    type Statement = Statement;

    fn prepare(&mut self, sql: &str) -> Result<Statement, DriverError> {
        Ok(self.inner.prepare(sql)?)
    }

    fn execute(&mut self, statement: &Statement, record: &EventRecord) -> Result<(), DriverError> {
        let bound = bind(record, statement.params())?;
        let params: Vec<&(dyn ToSql + Sync)> =
            bound.iter().map(|p| p as &(dyn ToSql + Sync)).collect();
        self.inner.execute(statement, &params)?;
        Ok(())
    }

    fn commit(self) -> Result<(), DriverError> {
        Ok(self.inner.commit()?)
    }

    fn rollback(self) -> Result<(), DriverError> {
        Ok(self.inner.rollback()?)
    }
}

/// A record field before it meets the column type.
#[derive(Debug, Clone, Copy)]
enum Field<'a> {
    Text(Option<&'a str>),
    Int(i64),
    Bool(Option<bool>),
}

fn fields(r: &EventRecord) -> [Field<'_>; FIELD_COUNT] {
    use Field::{Bool, Int, Text};

    [
        Text(Some(&r.ts)),
        Text(Some(&r.username)),
        Text(Some(&r.platform)),
        Int(r.ms_played),
        Text(Some(&r.conn_country)),
        Text(Some(&r.ip_addr_decrypted)),
        Text(Some(&r.user_agent_decrypted)),
        Text(Some(&r.track_name)),
        Text(Some(&r.album_artist_name)),
        Text(Some(&r.album_name)),
        Text(Some(&r.track_uri)),
        Text(r.episode_name.as_deref()),
        Text(r.episode_show_name.as_deref()),
        Text(r.episode_uri.as_deref()),
        Text(Some(&r.reason_start)),
        Text(Some(&r.reason_end)),
        Bool(Some(r.shuffle)),
        Bool(r.skipped),
        Bool(Some(r.offline)),
        Int(r.offline_timestamp),
        Bool(Some(r.incognito_mode)),
    ]
}

/// A parameter value shaped for the column type the server reported.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Param<'a> {
    Text(Option<&'a str>),
    BigInt(i64),
    Int(i32),
    SmallInt(i16),
    Bool(Option<bool>),
    TimestampTz(Option<DateTime<Utc>>),
    Timestamp(Option<NaiveDateTime>),
}

impl ToSql for Param<'_> {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Param::Text(v) => v.to_sql_checked(ty, out),
            Param::BigInt(v) => v.to_sql_checked(ty, out),
            Param::Int(v) => v.to_sql_checked(ty, out),
            Param::SmallInt(v) => v.to_sql_checked(ty, out),
            Param::Bool(v) => v.to_sql_checked(ty, out),
            Param::TimestampTz(v) => v.to_sql_checked(ty, out),
            Param::Timestamp(v) => v.to_sql_checked(ty, out),
        }
    }

    // The wrapped value checks the type itself.
    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

#[derive(Debug, Error)]
pub(crate) enum BindError {
    #[error("insert statement takes {found} parameters but a record has {expected}")]
    Arity { expected: usize, found: usize },

    #[error("{column}: {value} is out of range for {ty}")]
    OutOfRange {
        column: &'static str,
        value: i64,
        ty: Type,
    },

    #[error("{column}: {value:?} is not an RFC 3339 timestamp")]
    Timestamp {
        column: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Shape every field of `record` for the parameter types of a prepared
/// insert. Integer columns narrower than `BIGINT` get a range check and
/// timestamp columns get the text parsed; anything else passes through and
/// the driver reports a mismatch.
pub(crate) fn bind<'a>(
    record: &'a EventRecord,
    types: &[Type],
) -> Result<Vec<Param<'a>>, BindError> {
    if types.len() != FIELD_COUNT {
        return Err(BindError::Arity {
            expected: FIELD_COUNT,
            found: types.len(),
        });
    }

    fields(record)
        .into_iter()
        .zip(types)
        .zip(COLUMNS)
        .map(|((field, ty), column)| adapt(field, ty, column))
        .collect()
}

fn adapt<'a>(field: Field<'a>, ty: &Type, column: &'static str) -> Result<Param<'a>, BindError> {
    let out_of_range = |value: i64| BindError::OutOfRange {
        column,
        value,
        ty: ty.clone(),
    };

    let param = match field {
        Field::Int(v) if *ty == Type::INT4 => {
            Param::Int(i32::try_from(v).map_err(|_| out_of_range(v))?)
        }
        Field::Int(v) if *ty == Type::INT2 => {
            Param::SmallInt(i16::try_from(v).map_err(|_| out_of_range(v))?)
        }
        Field::Int(v) => Param::BigInt(v),
        Field::Text(v) if *ty == Type::TIMESTAMPTZ => Param::TimestampTz(timestamp(v, column)?),
        Field::Text(v) if *ty == Type::TIMESTAMP => {
            Param::Timestamp(timestamp(v, column)?.map(|t| t.naive_utc()))
        }
        Field::Text(v) => Param::Text(v),
        Field::Bool(v) => Param::Bool(v),
    };
    Ok(param)
}

/// Empty text comes from a `null` in the export and binds as NULL.
fn timestamp(
    value: Option<&str>,
    column: &'static str,
) -> Result<Option<DateTime<Utc>>, BindError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|source| BindError::Timestamp {
                column,
                value: raw.to_string(),
                source,
            }),
    }
}

#[cfg(test)]
#[path = "pg_tests.rs"]
mod tests;
