use std::collections::HashMap;
use std::hash::Hash;
use std::net::IpAddr;

use derive_more::Constructor;
use uuid::Uuid;

/// Bound statement value which could be an array of bytes, null and non-set values.
#[derive(Debug, Clone, PartialEq, Ord, PartialOrd, Eq, Hash)]
pub enum Value {
    Some(Vec<u8>),
    Null,
    NotSet,
}

impl Value {
    pub fn new<B>(v: B) -> Value
    where
        B: Into<ValueBytes>,
    {
        Value::Some(v.into().0)
    }
}

impl<T: Into<ValueBytes>> From<T> for Value {
    fn from(b: T) -> Value {
        Value::new(b.into())
    }
}

impl<T: Into<ValueBytes>> From<Option<T>> for Value {
    fn from(b: Option<T>) -> Value {
        match b {
            Some(b) => Value::new(b.into()),
            None => Value::Null,
        }
    }
}

/// Big-endian encoding of a single bound value.
#[derive(Debug, Clone, Constructor)]
pub struct ValueBytes(Vec<u8>);

impl ValueBytes {
    /// Consumes `ValueBytes` and returns the inner `Vec<u8>`
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<String> for ValueBytes {
    #[inline]
    fn from(value: String) -> Self {
        ValueBytes(value.into_bytes())
    }
}

impl From<&str> for ValueBytes {
    #[inline]
    fn from(value: &str) -> Self {
        ValueBytes(value.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for ValueBytes {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        ValueBytes(value)
    }
}

macro_rules! impl_be_bytes {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ValueBytes {
                #[inline]
                fn from(value: $t) -> Self {
                    ValueBytes(value.to_be_bytes().to_vec())
                }
            }
        )*
    };
}

impl_be_bytes!(i8, i16, i32, i64, f32, f64);

impl From<bool> for ValueBytes {
    #[inline]
    fn from(value: bool) -> Self {
        ValueBytes(vec![value as u8])
    }
}

impl From<Uuid> for ValueBytes {
    #[inline]
    fn from(value: Uuid) -> Self {
        ValueBytes(value.as_bytes().to_vec())
    }
}

impl From<IpAddr> for ValueBytes {
    #[inline]
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(ip) => ValueBytes(ip.octets().to_vec()),
            IpAddr::V6(ip) => ValueBytes(ip.octets().to_vec()),
        }
    }
}

/// Values bound to a statement, either positionally or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValues {
    SimpleValues(Vec<Value>),
    NamedValues(HashMap<String, Value>),
}

impl Default for QueryValues {
    fn default() -> Self {
        QueryValues::SimpleValues(vec![])
    }
}

impl QueryValues {
    /// Returns `true` if query values is with names and `false` otherwise.
    #[inline]
    pub fn has_names(&self) -> bool {
        !matches!(*self, QueryValues::SimpleValues(_))
    }

    /// Returns the number of values.
    pub fn len(&self) -> usize {
        match *self {
            QueryValues::SimpleValues(ref v) => v.len(),
            QueryValues::NamedValues(ref m) => m.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Into<Value> + Clone> From<Vec<T>> for QueryValues {
    /// It converts values from `Vec` to query values without names `QueryValues::SimpleValues`.
    fn from(values: Vec<T>) -> QueryValues {
        QueryValues::SimpleValues(values.into_iter().map(Into::into).collect())
    }
}

impl<'a, T: Into<Value> + Clone> From<&'a [T]> for QueryValues {
    /// It converts values from a slice to query values without names `QueryValues::SimpleValues`.
    fn from(values: &'a [T]) -> QueryValues {
        QueryValues::SimpleValues(values.iter().map(|v| v.clone().into()).collect())
    }
}

impl<S: ToString + Hash + Eq, V: Into<Value>> From<HashMap<S, V>> for QueryValues {
    /// It converts values from `HashMap` to query values with names `QueryValues::NamedValues`.
    fn from(values: HashMap<S, V>) -> QueryValues {
        QueryValues::NamedValues(
            values
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_primitives() {
        assert_eq!(Value::from(1i32), Value::Some(vec![0, 0, 0, 1]));
        assert_eq!(Value::from(true), Value::Some(vec![1]));
        assert_eq!(Value::from("ab"), Value::Some(vec![97, 98]));
        assert_eq!(Value::from(None::<i16>), Value::Null);
    }

    #[test]
    fn test_query_values_from_vec() {
        let values: QueryValues = vec![1i64, 2i64].into();
        assert_eq!(values.len(), 2);
        assert!(!values.has_names());
        assert_eq!(
            values,
            QueryValues::SimpleValues(vec![
                Value::Some(vec![0, 0, 0, 0, 0, 0, 0, 1]),
                Value::Some(vec![0, 0, 0, 0, 0, 0, 0, 2]),
            ])
        );
    }

    #[test]
    fn test_query_values_named() {
        let mut map = HashMap::new();
        map.insert("id", 7i32);
        let values: QueryValues = map.into();
        assert!(values.has_names());
        assert_eq!(values.len(), 1);
        assert_eq!(
            values,
            QueryValues::NamedValues(HashMap::from([(
                "id".to_string(),
                Value::Some(vec![0, 0, 0, 7])
            )]))
        );
    }
}
