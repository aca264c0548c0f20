use derive_more::Display;
use std::cmp::PartialEq;
use std::io::Cursor;
use std::net::IpAddr;

use crate::error::{self, Error};
use crate::frame::traits::{FromBytes, FromCursor};
use crate::frame::Serialize;
use crate::types::{from_cursor_str, from_cursor_string_list, serialize_str, serialize_str_list, CInet};

// Event types
const TOPOLOGY_CHANGE: &str = "TOPOLOGY_CHANGE";
const STATUS_CHANGE: &str = "STATUS_CHANGE";
const SCHEMA_CHANGE: &str = "SCHEMA_CHANGE";

// Topology changes
const NEW_NODE: &str = "NEW_NODE";
const REMOVED_NODE: &str = "REMOVED_NODE";

// Status changes
const UP: &str = "UP";
const DOWN: &str = "DOWN";

// Schema changes
const CREATED: &str = "CREATED";
const UPDATED: &str = "UPDATED";
const DROPPED: &str = "DROPPED";

// Schema change targets
const KEYSPACE: &str = "KEYSPACE";
const TABLE: &str = "TABLE";
const TYPE: &str = "TYPE";
const FUNCTION: &str = "FUNCTION";
const AGGREGATE: &str = "AGGREGATE";

/// Full server event that contains all details about a concrete change.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum ServerEvent {
    /// Events related to change in the cluster topology
    TopologyChange(TopologyChange),
    /// Events related to change of node status.
    StatusChange(StatusChange),
    /// Events related to schema change.
    SchemaChange(SchemaChange),
}

impl ServerEvent {
    /// Is this a schema change, as opposed to a node-related event.
    #[inline]
    pub fn is_schema_change(&self) -> bool {
        matches!(self, ServerEvent::SchemaChange(_))
    }
}

impl Serialize for ServerEvent {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        match &self {
            ServerEvent::TopologyChange(t) => {
                serialize_str(cursor, TOPOLOGY_CHANGE);
                t.serialize(cursor);
            }
            ServerEvent::StatusChange(s) => {
                serialize_str(cursor, STATUS_CHANGE);
                s.serialize(cursor);
            }
            ServerEvent::SchemaChange(s) => {
                serialize_str(cursor, SCHEMA_CHANGE);
                s.serialize(cursor);
            }
        }
    }
}

impl FromCursor for ServerEvent {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> error::Result<ServerEvent> {
        let event_type = from_cursor_str(cursor)?;
        match event_type {
            TOPOLOGY_CHANGE => Ok(ServerEvent::TopologyChange(TopologyChange::from_cursor(
                cursor,
            )?)),
            STATUS_CHANGE => Ok(ServerEvent::StatusChange(StatusChange::from_cursor(
                cursor,
            )?)),
            SCHEMA_CHANGE => Ok(ServerEvent::SchemaChange(SchemaChange::from_cursor(
                cursor,
            )?)),
            _ => Err(Error::UnknownServerEvent(event_type.into())),
        }
    }
}

impl FromBytes for ServerEvent {
    /// Parses the body of an EVENT frame.
    fn from_bytes(bytes: &[u8]) -> error::Result<ServerEvent> {
        let mut cursor = Cursor::new(bytes);
        ServerEvent::from_cursor(&mut cursor)
    }
}

/// Events related to change in the cluster topology
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopologyChange {
    pub change_type: TopologyChangeType,
    pub addr: CInet,
}

impl Serialize for TopologyChange {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        self.change_type.serialize(cursor);
        self.addr.serialize(cursor);
    }
}

impl FromCursor for TopologyChange {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> error::Result<TopologyChange> {
        let change_type = TopologyChangeType::from_cursor(cursor)?;
        let addr = CInet::from_cursor(cursor)?;

        Ok(TopologyChange { change_type, addr })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Ord, PartialOrd, Eq, Hash, Display)]
pub enum TopologyChangeType {
    NewNode,
    RemovedNode,
}

impl Serialize for TopologyChangeType {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        match &self {
            TopologyChangeType::NewNode => serialize_str(cursor, NEW_NODE),
            TopologyChangeType::RemovedNode => serialize_str(cursor, REMOVED_NODE),
        }
    }
}

impl FromCursor for TopologyChangeType {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> error::Result<TopologyChangeType> {
        from_cursor_str(cursor).and_then(|tc| match tc {
            NEW_NODE => Ok(TopologyChangeType::NewNode),
            REMOVED_NODE => Ok(TopologyChangeType::RemovedNode),
            _ => Err(Error::UnexpectedTopologyChangeType(tc.into())),
        })
    }
}

/// Events related to change of node status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusChange {
    pub change_type: StatusChangeType,
    pub addr: CInet,
}

impl StatusChange {
    /// Address identifying the host. Ports are not part of host identity.
    #[inline]
    pub fn ip(&self) -> IpAddr {
        self.addr.ip()
    }
}

impl Serialize for StatusChange {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        self.change_type.serialize(cursor);
        self.addr.serialize(cursor);
    }
}

impl FromCursor for StatusChange {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> error::Result<StatusChange> {
        let change_type = StatusChangeType::from_cursor(cursor)?;
        let addr = CInet::from_cursor(cursor)?;

        Ok(StatusChange { change_type, addr })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum StatusChangeType {
    Up,
    Down,
}

impl Serialize for StatusChangeType {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        match self {
            StatusChangeType::Up => serialize_str(cursor, UP),
            StatusChangeType::Down => serialize_str(cursor, DOWN),
        }
    }
}

impl FromCursor for StatusChangeType {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> error::Result<StatusChangeType> {
        from_cursor_str(cursor).and_then(|sct| match sct {
            UP => Ok(StatusChangeType::Up),
            DOWN => Ok(StatusChangeType::Down),
            _ => Err(Error::UnexpectedStatusChangeType(sct.into())),
        })
    }
}

/// Events related to schema change. Every variant names the affected keyspace.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum SchemaChange {
    Keyspace {
        change_type: SchemaChangeType,
        keyspace: String,
    },
    Table {
        change_type: SchemaChangeType,
        keyspace: String,
        table: String,
    },
    Type {
        change_type: SchemaChangeType,
        keyspace: String,
        type_name: String,
    },
    Function {
        change_type: SchemaChangeType,
        keyspace: String,
        function: String,
        /// One CQL type name per argument.
        arguments: Vec<String>,
    },
    Aggregate {
        change_type: SchemaChangeType,
        keyspace: String,
        aggregate: String,
        arguments: Vec<String>,
    },
}

impl SchemaChange {
    pub fn keyspace(&self) -> &str {
        match self {
            SchemaChange::Keyspace { keyspace, .. }
            | SchemaChange::Table { keyspace, .. }
            | SchemaChange::Type { keyspace, .. }
            | SchemaChange::Function { keyspace, .. }
            | SchemaChange::Aggregate { keyspace, .. } => keyspace,
        }
    }

    pub fn change_type(&self) -> SchemaChangeType {
        match self {
            SchemaChange::Keyspace { change_type, .. }
            | SchemaChange::Table { change_type, .. }
            | SchemaChange::Type { change_type, .. }
            | SchemaChange::Function { change_type, .. }
            | SchemaChange::Aggregate { change_type, .. } => *change_type,
        }
    }

    pub fn target(&self) -> SchemaChangeTarget {
        match self {
            SchemaChange::Keyspace { .. } => SchemaChangeTarget::Keyspace,
            SchemaChange::Table { .. } => SchemaChangeTarget::Table,
            SchemaChange::Type { .. } => SchemaChangeTarget::Type,
            SchemaChange::Function { .. } => SchemaChangeTarget::Function,
            SchemaChange::Aggregate { .. } => SchemaChangeTarget::Aggregate,
        }
    }
}

impl Serialize for SchemaChange {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        self.change_type().serialize(cursor);
        self.target().serialize(cursor);
        serialize_str(cursor, self.keyspace());

        match self {
            SchemaChange::Keyspace { .. } => {}
            SchemaChange::Table { table: name, .. } | SchemaChange::Type { type_name: name, .. } => {
                serialize_str(cursor, name)
            }
            SchemaChange::Function {
                function: name,
                arguments,
                ..
            }
            | SchemaChange::Aggregate {
                aggregate: name,
                arguments,
                ..
            } => {
                serialize_str(cursor, name);
                serialize_str_list(cursor, arguments.iter().map(String::as_str));
            }
        }
    }
}

impl FromCursor for SchemaChange {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> error::Result<SchemaChange> {
        let change_type = SchemaChangeType::from_cursor(cursor)?;
        let target = SchemaChangeTarget::from_cursor(cursor)?;
        let keyspace = from_cursor_str(cursor)?.to_string();

        Ok(match target {
            SchemaChangeTarget::Keyspace => SchemaChange::Keyspace {
                change_type,
                keyspace,
            },
            SchemaChangeTarget::Table => SchemaChange::Table {
                change_type,
                keyspace,
                table: from_cursor_str(cursor)?.to_string(),
            },
            SchemaChangeTarget::Type => SchemaChange::Type {
                change_type,
                keyspace,
                type_name: from_cursor_str(cursor)?.to_string(),
            },
            SchemaChangeTarget::Function => SchemaChange::Function {
                change_type,
                keyspace,
                function: from_cursor_str(cursor)?.to_string(),
                arguments: from_cursor_string_list(cursor)?,
            },
            SchemaChangeTarget::Aggregate => SchemaChange::Aggregate {
                change_type,
                keyspace,
                aggregate: from_cursor_str(cursor)?.to_string(),
                arguments: from_cursor_string_list(cursor)?,
            },
        })
    }
}

/// Represents type of changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum SchemaChangeType {
    Created,
    Updated,
    Dropped,
}

impl Serialize for SchemaChangeType {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        match self {
            SchemaChangeType::Created => serialize_str(cursor, CREATED),
            SchemaChangeType::Updated => serialize_str(cursor, UPDATED),
            SchemaChangeType::Dropped => serialize_str(cursor, DROPPED),
        }
    }
}

impl FromCursor for SchemaChangeType {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> error::Result<SchemaChangeType> {
        from_cursor_str(cursor).and_then(|ct| match ct {
            CREATED => Ok(SchemaChangeType::Created),
            UPDATED => Ok(SchemaChangeType::Updated),
            DROPPED => Ok(SchemaChangeType::Dropped),
            _ => Err(Error::UnexpectedSchemaChangeType(ct.into())),
        })
    }
}

/// Refers to a target of changes were made.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum SchemaChangeTarget {
    Keyspace,
    Table,
    Type,
    Function,
    Aggregate,
}

impl Serialize for SchemaChangeTarget {
    fn serialize(&self, cursor: &mut Cursor<&mut Vec<u8>>) {
        match self {
            SchemaChangeTarget::Keyspace => serialize_str(cursor, KEYSPACE),
            SchemaChangeTarget::Table => serialize_str(cursor, TABLE),
            SchemaChangeTarget::Type => serialize_str(cursor, TYPE),
            SchemaChangeTarget::Function => serialize_str(cursor, FUNCTION),
            SchemaChangeTarget::Aggregate => serialize_str(cursor, AGGREGATE),
        }
    }
}

impl FromCursor for SchemaChangeTarget {
    fn from_cursor(cursor: &mut Cursor<&[u8]>) -> error::Result<SchemaChangeTarget> {
        from_cursor_str(cursor).and_then(|t| match t {
            KEYSPACE => Ok(SchemaChangeTarget::Keyspace),
            TABLE => Ok(SchemaChangeTarget::Table),
            TYPE => Ok(SchemaChangeTarget::Type),
            FUNCTION => Ok(SchemaChangeTarget::Function),
            AGGREGATE => Ok(SchemaChangeTarget::Aggregate),
            _ => Err(Error::UnexpectedSchemaChangeTarget(t.into())),
        })
    }
}

#[cfg(test)]
fn test_encode_decode(bytes: &[u8], expected: ServerEvent) {
    let event = ServerEvent::from_bytes(bytes).unwrap();
    assert_eq!(expected, event);
    assert_eq!(expected.serialize_to_vec(), bytes);
}
