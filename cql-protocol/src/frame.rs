//! `frame` module contains the parts of response frames the execution core consumes: server
//! event bodies, result metadata and batch kinds.

pub use crate::frame::traits::*;

pub mod events;
pub mod message_batch;
pub mod message_result;
pub mod traits;
