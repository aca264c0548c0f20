#![warn(missing_docs)]
//! The module contains Rust representation of Cassandra consistency levels.
use crate::error;
use crate::types::*;
use derive_more::Display;
use std::convert::{From, TryFrom};
use std::default::Default;
use std::str::FromStr;

/// `Consistency` is an enum which represents Cassandra's consistency levels.
/// To find more details about each consistency level please refer to the following documentation:
/// <https://docs.datastax.com/en/cql-oss/3.x/cql/cql_reference/cqlshConsistency.html>
///
/// `Display` renders the canonical lowercase name, which `FromStr` accepts back.
#[derive(Debug, PartialEq, Clone, Copy, Display, Ord, PartialOrd, Eq, Hash, Default)]
#[non_exhaustive]
pub enum Consistency {
    /// Closest replica, as determined by the snitch.
    /// Note: this consistency level can only be used for writes.
    #[display("any")]
    Any,
    /// A write must be written to the commit log and memtable of at least one replica node.
    #[display("one")]
    One,
    /// A write must be written to the commit log and memtable of at least two replica nodes.
    #[display("two")]
    Two,
    /// A write must be written to the commit log and memtable of at least three replica nodes.
    #[display("three")]
    Three,
    /// A write must be written to the commit log and memtable on a quorum of replica nodes.
    #[default]
    #[display("quorum")]
    Quorum,
    /// A write must be written to the commit log and memtable on all replica nodes in the cluster
    /// for that partition key.
    #[display("all")]
    All,
    /// A quorum of replica nodes in the same data center as the coordinator node.
    #[display("localquorum")]
    LocalQuorum,
    /// A quorum of replica nodes in all data centers.
    #[display("eachquorum")]
    EachQuorum,
    /// Linearizable consistency for lightweight transactions.
    #[display("serial")]
    Serial,
    /// Same as SERIAL but confined to the data center.
    #[display("localserial")]
    LocalSerial,
    /// At least one replica node in the local data center.
    #[display("localone")]
    LocalOne,
}

impl FromStr for Consistency {
    type Err = error::Error;

    /// Parses a consistency name. Matching ignores case and `_` separators, so `LOCAL_QUORUM`,
    /// `local_quorum` and `localquorum` are equivalent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let consistency = match normalized.as_str() {
            "any" => Consistency::Any,
            "one" => Consistency::One,
            "two" => Consistency::Two,
            "three" => Consistency::Three,
            "quorum" => Consistency::Quorum,
            "all" => Consistency::All,
            "localquorum" => Consistency::LocalQuorum,
            "eachquorum" => Consistency::EachQuorum,
            "serial" => Consistency::Serial,
            "localserial" => Consistency::LocalSerial,
            "localone" => Consistency::LocalOne,
            _ => {
                return Err(error::Error::General(format!(
                    "Invalid consistency provided: {s}"
                )))
            }
        };

        Ok(consistency)
    }
}

impl TryFrom<CIntShort> for Consistency {
    type Error = error::Error;

    fn try_from(value: CIntShort) -> Result<Self, Self::Error> {
        match value {
            0x0000 => Ok(Consistency::Any),
            0x0001 => Ok(Consistency::One),
            0x0002 => Ok(Consistency::Two),
            0x0003 => Ok(Consistency::Three),
            0x0004 => Ok(Consistency::Quorum),
            0x0005 => Ok(Consistency::All),
            0x0006 => Ok(Consistency::LocalQuorum),
            0x0007 => Ok(Consistency::EachQuorum),
            0x0008 => Ok(Consistency::Serial),
            0x0009 => Ok(Consistency::LocalSerial),
            0x000A => Ok(Consistency::LocalOne),
            _ => Err(Self::Error::UnknownConsistency(value)),
        }
    }
}

impl From<Consistency> for CIntShort {
    fn from(value: Consistency) -> Self {
        match value {
            Consistency::Any => 0x0000,
            Consistency::One => 0x0001,
            Consistency::Two => 0x0002,
            Consistency::Three => 0x0003,
            Consistency::Quorum => 0x0004,
            Consistency::All => 0x0005,
            Consistency::LocalQuorum => 0x0006,
            Consistency::EachQuorum => 0x0007,
            Consistency::Serial => 0x0008,
            Consistency::LocalSerial => 0x0009,
            Consistency::LocalOne => 0x000A,
        }
    }
}

impl Consistency {
    /// All defined levels, in wire-code order.
    pub const ALL: [Consistency; 11] = [
        Consistency::Any,
        Consistency::One,
        Consistency::Two,
        Consistency::Three,
        Consistency::Quorum,
        Consistency::All,
        Consistency::LocalQuorum,
        Consistency::EachQuorum,
        Consistency::Serial,
        Consistency::LocalSerial,
        Consistency::LocalOne,
    ];

    /// Does this consistency require local dc.
    #[inline]
    pub fn is_dc_local(self) -> bool {
        matches!(
            self,
            Consistency::LocalOne | Consistency::LocalQuorum | Consistency::LocalSerial
        )
    }

    /// Is this a serial consistency, usable only for conditional updates.
    #[inline]
    pub fn is_serial(self) -> bool {
        matches!(self, Consistency::Serial | Consistency::LocalSerial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_name_round_trip() {
        for consistency in Consistency::ALL {
            let name = consistency.to_string();
            assert_eq!(name, name.to_lowercase());
            assert_eq!(name.parse::<Consistency>().unwrap(), consistency);
        }
    }

    #[test]
    fn test_consistency_from_str_variants() {
        assert_eq!(
            "LOCAL_QUORUM".parse::<Consistency>().unwrap(),
            Consistency::LocalQuorum
        );
        assert_eq!(
            "each_quorum".parse::<Consistency>().unwrap(),
            Consistency::EachQuorum
        );
        assert_eq!(
            "LocalSerial".parse::<Consistency>().unwrap(),
            Consistency::LocalSerial
        );
        assert!("most".parse::<Consistency>().is_err());
    }

    #[test]
    fn test_consistency_wire_code_round_trip() {
        for consistency in Consistency::ALL {
            let code: CIntShort = consistency.into();
            assert_eq!(Consistency::try_from(code).unwrap(), consistency);
        }

        assert_eq!(CIntShort::from(Consistency::Quorum), 0x0004);
        assert_eq!(CIntShort::from(Consistency::LocalOne), 0x000A);

        assert!(matches!(
            Consistency::try_from(0x000B),
            Err(error::Error::UnknownConsistency(0x000B))
        ));
    }

    #[test]
    fn test_default_is_quorum() {
        assert_eq!(Consistency::default(), Consistency::Quorum);
    }

    #[test]
    fn test_is_dc_local() {
        assert!(!Consistency::Any.is_dc_local());
        assert!(!Consistency::One.is_dc_local());
        assert!(Consistency::LocalQuorum.is_dc_local());
        assert!(Consistency::LocalSerial.is_dc_local());
        assert!(Consistency::LocalOne.is_dc_local());
        assert!(Consistency::LocalSerial.is_serial());
        assert!(!Consistency::LocalOne.is_serial());
    }
}
