//! Protocol-level building blocks shared by the `cql-core` execution engine: consistency levels,
//! the error taxonomy, server event frames, result metadata, query values and column
//! unmarshaling.

pub mod consistency;
pub mod error;
pub mod frame;
pub mod types;

pub type Error = error::Error;
pub type Result<T> = error::Result<T>;
