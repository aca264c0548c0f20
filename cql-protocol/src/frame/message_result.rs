use bytes::Bytes;
use derive_more::{Constructor, Display};
use std::convert::TryFrom;
use uuid::Uuid;

use crate::error::Error;
use crate::types::CIntShort;

/// Column type identifiers, as sent in result metadata.
#[derive(Debug, Clone, Copy, PartialEq, Ord, PartialOrd, Eq, Hash, Display)]
pub enum ColumnType {
    Custom,
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Int,
    Timestamp,
    Uuid,
    Varchar,
    Varint,
    Timeuuid,
    Inet,
    Date,
    Time,
    Smallint,
    Tinyint,
    Duration,
    List,
    Map,
    Set,
    Udt,
    Tuple,
}

impl TryFrom<CIntShort> for ColumnType {
    type Error = Error;

    fn try_from(value: CIntShort) -> Result<Self, Self::Error> {
        match value {
            0x0000 => Ok(ColumnType::Custom),
            0x0001 => Ok(ColumnType::Ascii),
            0x0002 => Ok(ColumnType::Bigint),
            0x0003 => Ok(ColumnType::Blob),
            0x0004 => Ok(ColumnType::Boolean),
            0x0005 => Ok(ColumnType::Counter),
            0x0006 => Ok(ColumnType::Decimal),
            0x0007 => Ok(ColumnType::Double),
            0x0008 => Ok(ColumnType::Float),
            0x0009 => Ok(ColumnType::Int),
            0x000B => Ok(ColumnType::Timestamp),
            0x000C => Ok(ColumnType::Uuid),
            0x000D => Ok(ColumnType::Varchar),
            0x000E => Ok(ColumnType::Varint),
            0x000F => Ok(ColumnType::Timeuuid),
            0x0010 => Ok(ColumnType::Inet),
            0x0011 => Ok(ColumnType::Date),
            0x0012 => Ok(ColumnType::Time),
            0x0013 => Ok(ColumnType::Smallint),
            0x0014 => Ok(ColumnType::Tinyint),
            0x0015 => Ok(ColumnType::Duration),
            0x0020 => Ok(ColumnType::List),
            0x0021 => Ok(ColumnType::Map),
            0x0022 => Ok(ColumnType::Set),
            0x0030 => Ok(ColumnType::Udt),
            0x0031 => Ok(ColumnType::Tuple),
            _ => Err(Error::UnexpectedColumnType(value)),
        }
    }
}

/// Single column specification.
#[derive(Debug, Clone, PartialEq, Ord, PartialOrd, Eq, Hash, Constructor)]
pub struct ColumnSpec {
    pub keyspace: String,
    pub table: String,
    pub name: String,
    pub col_type: ColumnType,
}

/// A single row: one raw value per column, `None` for null.
pub type Row = Vec<Option<Bytes>>;

/// Decoded result of a single statement execution. Non-row results (writes, schema changes)
/// carry no columns and no rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Row>,
    /// Opaque continuation token, present when more pages are available.
    pub paging_state: Option<Bytes>,
    /// Set when tracing was requested for the statement.
    pub tracing_id: Option<Uuid>,
}

impl QueryResult {
    /// Result of a statement returning no rows.
    #[inline]
    pub fn void() -> Self {
        Default::default()
    }

    #[inline]
    pub fn new_rows(columns: Vec<ColumnSpec>, rows: Vec<Row>) -> Self {
        QueryResult {
            columns,
            rows,
            paging_state: None,
            tracing_id: None,
        }
    }

    #[must_use]
    pub fn with_paging_state(mut self, paging_state: Option<Bytes>) -> Self {
        self.paging_state = paging_state;
        self
    }

    #[must_use]
    pub fn with_tracing_id(mut self, tracing_id: Option<Uuid>) -> Self {
        self.tracing_id = tracing_id;
        self
    }

    #[inline]
    pub fn has_more_pages(&self) -> bool {
        self.paging_state.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_decode_column_type_ids() {
        assert_eq!(ColumnType::try_from(0x0009).unwrap(), ColumnType::Int);
        assert_eq!(ColumnType::try_from(0x000D).unwrap(), ColumnType::Varchar);
        assert_eq!(ColumnType::try_from(0x0031).unwrap(), ColumnType::Tuple);
        assert!(matches!(
            ColumnType::try_from(0x000A),
            Err(Error::UnexpectedColumnType(0x000A))
        ));
    }

    #[test]
    fn should_report_more_pages() {
        let result = QueryResult::void();
        assert!(!result.has_more_pages());
        assert!(result
            .with_paging_state(Some(Bytes::from_static(b"next")))
            .has_more_pages());
    }
}
