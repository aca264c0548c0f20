use std::io;
use std::net;
use std::str::Utf8Error;

use crate::types::{
    try_f32_from_bytes, try_f64_from_bytes, try_i16_from_bytes, try_i32_from_bytes,
    try_i64_from_bytes,
};

// https://github.com/apache/cassandra/blob/trunk/doc/native_protocol_v4.spec#L813

const FALSE_BYTE: u8 = 0;

// Decodes Cassandra `varchar`/`text`/`ascii` data (bytes)
#[inline]
pub fn decode_varchar(bytes: &[u8]) -> Result<String, Utf8Error> {
    std::str::from_utf8(bytes).map(str::to_string)
}

// Decodes Cassandra `bigint`/`counter`/`timestamp` data (bytes)
#[inline]
pub fn decode_bigint(bytes: &[u8]) -> Result<i64, io::Error> {
    try_i64_from_bytes(bytes)
}

// Decodes Cassandra `blob` data (bytes)
#[inline]
pub fn decode_blob(bytes: &[u8]) -> Result<Vec<u8>, io::Error> {
    // in fact we just pass it through.
    Ok(bytes.to_vec())
}

// Decodes Cassandra `boolean` data (bytes)
#[inline]
pub fn decode_boolean(bytes: &[u8]) -> Result<bool, io::Error> {
    match bytes.first() {
        Some(byte) => Ok(*byte != FALSE_BYTE),
        None => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no bytes were found",
        )),
    }
}

// Decodes Cassandra `int` data (bytes)
#[inline]
pub fn decode_int(bytes: &[u8]) -> Result<i32, io::Error> {
    try_i32_from_bytes(bytes)
}

// Decodes Cassandra `double` data (bytes)
#[inline]
pub fn decode_double(bytes: &[u8]) -> Result<f64, io::Error> {
    try_f64_from_bytes(bytes)
}

// Decodes Cassandra `float` data (bytes)
#[inline]
pub fn decode_float(bytes: &[u8]) -> Result<f32, io::Error> {
    try_f32_from_bytes(bytes)
}

// Decodes Cassandra `inet` data (bytes)
pub fn decode_inet(bytes: &[u8]) -> Result<net::IpAddr, io::Error> {
    if let Ok(array) = <[u8; 4]>::try_from(bytes) {
        return Ok(net::IpAddr::V4(net::Ipv4Addr::from(array)));
    }

    if let Ok(array) = <[u8; 16]>::try_from(bytes) {
        return Ok(net::IpAddr::V6(net::Ipv6Addr::from(array)));
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Invalid Ip address {bytes:?}"),
    ))
}

// Decodes Cassandra `smallint` data (bytes)
#[inline]
pub fn decode_smallint(bytes: &[u8]) -> Result<i16, io::Error> {
    try_i16_from_bytes(bytes)
}

// Decodes Cassandra `tinyint` data (bytes)
#[inline]
pub fn decode_tinyint(bytes: &[u8]) -> Result<i8, io::Error> {
    match bytes {
        [byte] => Ok(*byte as i8),
        _ => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("expected 1 byte, got {}", bytes.len()),
        )),
    }
}

// Decodes Cassandra `uuid`/`timeuuid` data (bytes)
#[inline]
pub fn decode_timeuuid(bytes: &[u8]) -> Result<uuid::Uuid, uuid::Error> {
    uuid::Uuid::from_slice(bytes)
}
