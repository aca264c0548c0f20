use std::convert::TryInto;
use std::io::{self, Write};
use std::io::{Cursor, Read};
use std::net::{IpAddr, SocketAddr};

use crate::error::{Error as CqlError, Result as CqlResult};
use crate::frame::traits::FromCursor;
use crate::frame::Serialize;
use crate::types::data_serialization_types::decode_inet;

pub const SHORT_LEN: usize = 2;
pub const INT_LEN: usize = 4;
pub const LONG_LEN: usize = 8;
pub const UUID_LEN: usize = 16;

pub mod data_serialization_types;
pub mod unmarshal;
pub mod value;

pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::unmarshal::{Skip, Unmarshal};
    pub use crate::types::value::{QueryValues, Value};
}

#[inline]
fn convert_to_array<const S: usize>(bytes: &[u8]) -> Result<[u8; S], io::Error> {
    bytes
        .try_into()
        .map_err(|error| io::Error::new(io::ErrorKind::UnexpectedEof, error))
}

#[inline]
pub fn try_i64_from_bytes(bytes: &[u8]) -> Result<i64, io::Error> {
    Ok(i64::from_be_bytes(convert_to_array(bytes)?))
}

#[inline]
pub fn try_i32_from_bytes(bytes: &[u8]) -> Result<i32, io::Error> {
    Ok(i32::from_be_bytes(convert_to_array(bytes)?))
}

#[inline]
pub fn try_i16_from_bytes(bytes: &[u8]) -> Result<i16, io::Error> {
    Ok(i16::from_be_bytes(convert_to_array(bytes)?))
}

#[inline]
pub fn try_f32_from_bytes(bytes: &[u8]) -> Result<f32, io::Error> {
    Ok(f32::from_be_bytes(convert_to_array(bytes)?))
}

#[inline]
pub fn try_f64_from_bytes(bytes: &[u8]) -> Result<f64, io::Error> {
    Ok(f64::from_be_bytes(convert_to_array(bytes)?))
}

#[inline]
pub fn to_int(int: i32) -> Vec<u8> {
    int.to_be_bytes().into()
}

pub fn serialize_str(cursor: &mut Cursor<&mut Vec<u8>>, value: &str) {
    let len = value.len() as CIntShort;
    len.serialize(cursor);
    let _ = cursor.write(value.as_bytes());
}

pub fn serialize_str_list<'a>(
    cursor: &mut Cursor<&mut Vec<u8>>,
    list: impl ExactSizeIterator<Item = &'a str>,
) {
    let len = list.len() as CIntShort;
    len.serialize(cursor);

    for string in list {
        serialize_str(cursor, string);
    }
}

pub fn from_cursor_str<'a>(cursor: &mut Cursor<&'a [u8]>) -> CqlResult<&'a str> {
    let mut buff = [0; SHORT_LEN];
    cursor.read_exact(&mut buff)?;

    let len = CIntShort::from_be_bytes(buff);
    let body_bytes = cursor_next_value_ref(cursor, len as usize)?;

    std::str::from_utf8(body_bytes).map_err(Into::into)
}

pub fn from_cursor_string_list(cursor: &mut Cursor<&[u8]>) -> CqlResult<Vec<String>> {
    let mut buff = [0; SHORT_LEN];
    cursor.read_exact(&mut buff)?;

    let len = i16::from_be_bytes(buff);
    let mut list = Vec::with_capacity(len.max(0) as usize);
    for _ in 0..len {
        list.push(from_cursor_str(cursor)?.to_string());
    }

    Ok(list)
}

pub type CInt = i32;

impl FromCursor for CInt {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> CqlResult<CInt> {
        let mut buff = [0; INT_LEN];
        cursor.read_exact(&mut buff)?;
        Ok(CInt::from_be_bytes(buff))
    }
}

pub type CIntShort = i16;

impl FromCursor for CIntShort {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> CqlResult<CIntShort> {
        let mut buff = [0; SHORT_LEN];
        cursor.read_exact(&mut buff)?;
        Ok(CIntShort::from_be_bytes(buff))
    }
}

/// Protocol `[inet]`: an address and a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CInet {
    pub addr: SocketAddr,
}

impl CInet {
    #[inline]
    pub fn new(addr: SocketAddr) -> Self {
        CInet { addr }
    }

    #[inline]
    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }
}

impl Serialize for CInet {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        match self.addr.ip() {
            IpAddr::V4(v4) => {
                [4].serialize(cursor);
                v4.octets().serialize(cursor);
            }
            IpAddr::V6(v6) => {
                [16].serialize(cursor);
                v6.octets().serialize(cursor);
            }
        }

        to_int(self.addr.port().into()).serialize(cursor);
    }
}

impl FromCursor for CInet {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> CqlResult<CInet> {
        let mut buff = [0];
        cursor.read_exact(&mut buff)?;

        let n = buff[0];

        let ip = decode_inet(cursor_next_value_ref(cursor, n as usize)?)?;
        let port = CInt::from_cursor(cursor)?;
        let socket_addr = SocketAddr::new(ip, port as u16);

        Ok(CInet { addr: socket_addr })
    }
}

pub fn cursor_next_value(cursor: &mut Cursor<&[u8]>, len: usize) -> CqlResult<Vec<u8>> {
    let mut buff = vec![0u8; len];
    cursor.read_exact(&mut buff)?;
    Ok(buff)
}

pub fn cursor_next_value_ref<'a>(
    cursor: &mut Cursor<&'a [u8]>,
    len: usize,
) -> CqlResult<&'a [u8]> {
    let start = cursor.position() as usize;
    let data: &'a [u8] = *cursor.get_ref();
    let result = data
        .get(start..start + len)
        .ok_or_else(|| {
            CqlError::General("cursor_next_value_ref could not retrieve a full slice".into())
        })?;
    cursor.set_position(cursor.position() + len as u64);

    Ok(result)
}
