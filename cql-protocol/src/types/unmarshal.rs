//! Type-directed conversion of raw column values into Rust destinations.
//!
//! Scanning a row hands every column to an [`Unmarshal`] destination together with the column
//! metadata, so a destination can reject column types it cannot represent. Use `Option<T>` for
//! nullable columns and [`Skip`] to ignore a column.

use std::net::IpAddr;
use uuid::Uuid;

use crate::error::{column_is_empty_err, Error, Result};
use crate::frame::message_result::{ColumnSpec, ColumnType};
use crate::types::data_serialization_types::*;

/// A destination a single column can be decoded into.
pub trait Unmarshal: Send {
    /// Decodes `bytes` (`None` for null) described by `column` into `self`.
    fn unmarshal(&mut self, column: &ColumnSpec, bytes: Option<&[u8]>) -> Result<()>;
}

/// Conversion of a non-null column value into a Rust type.
pub trait FromColumn: Sized + Send {
    fn from_column(column: &ColumnSpec, bytes: &[u8]) -> Result<Self>;
}

/// Destination which ignores the column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Skip;

impl Unmarshal for Skip {
    #[inline]
    fn unmarshal(&mut self, _column: &ColumnSpec, _bytes: Option<&[u8]>) -> Result<()> {
        Ok(())
    }
}

impl<T: FromColumn> Unmarshal for T {
    fn unmarshal(&mut self, column: &ColumnSpec, bytes: Option<&[u8]>) -> Result<()> {
        let bytes = bytes.ok_or_else(|| column_is_empty_err(&column.name))?;
        *self = T::from_column(column, bytes)?;
        Ok(())
    }
}

impl<T: FromColumn> Unmarshal for Option<T> {
    fn unmarshal(&mut self, column: &ColumnSpec, bytes: Option<&[u8]>) -> Result<()> {
        *self = bytes
            .map(|bytes| T::from_column(column, bytes))
            .transpose()?;
        Ok(())
    }
}

fn unmarshal_error(column: &ColumnSpec, reason: impl ToString) -> Error {
    Error::Unmarshal {
        column: column.name.clone(),
        reason: reason.to_string(),
    }
}

macro_rules! impl_from_column {
    ($t:ty, $decode:ident, $($col_type:pat_param)|+) => {
        impl FromColumn for $t {
            fn from_column(column: &ColumnSpec, bytes: &[u8]) -> Result<Self> {
                match column.col_type {
                    $($col_type)|+ => $decode(bytes).map_err(|error| unmarshal_error(column, error)),
                    other => Err(unmarshal_error(
                        column,
                        format!("can not unmarshal {} into {}", other, stringify!($t)),
                    )),
                }
            }
        }
    };
}

impl_from_column!(i8, decode_tinyint, ColumnType::Tinyint);
impl_from_column!(i16, decode_smallint, ColumnType::Smallint);
impl_from_column!(i32, decode_int, ColumnType::Int | ColumnType::Date);
impl_from_column!(
    i64,
    decode_bigint,
    ColumnType::Bigint | ColumnType::Counter | ColumnType::Timestamp | ColumnType::Time
);
impl_from_column!(f32, decode_float, ColumnType::Float);
impl_from_column!(f64, decode_double, ColumnType::Double);
impl_from_column!(bool, decode_boolean, ColumnType::Boolean);
impl_from_column!(
    String,
    decode_varchar,
    ColumnType::Ascii | ColumnType::Varchar | ColumnType::Custom
);
impl_from_column!(Uuid, decode_timeuuid, ColumnType::Uuid | ColumnType::Timeuuid);
impl_from_column!(IpAddr, decode_inet, ColumnType::Inet);

impl FromColumn for Vec<u8> {
    #[inline]
    fn from_column(_column: &ColumnSpec, bytes: &[u8]) -> Result<Self> {
        decode_blob(bytes).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn column(name: &str, col_type: ColumnType) -> ColumnSpec {
        ColumnSpec::new("ks".into(), "tbl".into(), name.into(), col_type)
    }

    #[test]
    fn should_unmarshal_primitives() {
        let mut id = 0i32;
        id.unmarshal(&column("id", ColumnType::Int), Some(&[0, 0, 0, 42]))
            .unwrap();
        assert_eq!(id, 42);

        let mut name = String::new();
        name.unmarshal(&column("name", ColumnType::Varchar), Some(b"alice"))
            .unwrap();
        assert_eq!(name, "alice");

        let mut addr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
        addr.unmarshal(&column("peer", ColumnType::Inet), Some(&[10, 0, 0, 1]))
            .unwrap();
        assert_eq!(addr, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));

        let mut applied = false;
        applied
            .unmarshal(&column("[applied]", ColumnType::Boolean), Some(&[1]))
            .unwrap();
        assert!(applied);
    }

    #[test]
    fn should_reject_mismatched_column_type() {
        let mut id = 0i32;
        let error = id
            .unmarshal(&column("id", ColumnType::Varchar), Some(b"abc"))
            .unwrap_err();
        assert!(matches!(error, Error::Unmarshal { column, .. } if column == "id"));
        assert_eq!(id, 0);
    }

    #[test]
    fn should_reject_malformed_value() {
        let mut id = 0i64;
        assert!(id
            .unmarshal(&column("id", ColumnType::Bigint), Some(&[0, 1]))
            .is_err());
    }

    #[test]
    fn should_handle_nulls() {
        let mut required = 0i32;
        assert!(matches!(
            required.unmarshal(&column("value", ColumnType::Int), None),
            Err(Error::UnexpectedNull(_))
        ));

        let mut optional = Some(1i32);
        optional
            .unmarshal(&column("value", ColumnType::Int), None)
            .unwrap();
        assert_eq!(optional, None);

        optional
            .unmarshal(&column("value", ColumnType::Int), Some(&[0, 0, 0, 5]))
            .unwrap();
        assert_eq!(optional, Some(5));
    }

    #[test]
    fn should_skip_any_column() {
        let mut skip = Skip;
        skip.unmarshal(&column("value", ColumnType::Map), Some(&[1, 2, 3]))
            .unwrap();
        skip.unmarshal(&column("value", ColumnType::Int), None)
            .unwrap();
    }

    #[test]
    fn should_move_destinations_to_another_thread() {
        let mut dest: Vec<Box<dyn Unmarshal>> =
            vec![Box::new(0i32), Box::new(None::<i32>), Box::new(Skip)];

        let handle = std::thread::spawn(move || {
            for dest in dest.iter_mut() {
                dest.unmarshal(&column("value", ColumnType::Int), Some(&[0, 0, 0, 3]))
                    .unwrap();
            }
        });

        handle.join().unwrap();
    }
}
