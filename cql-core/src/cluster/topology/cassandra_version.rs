use derive_more::{Constructor, Display};
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Delay before connecting to a 2.2.x node which reported itself UP. Those versions announce UP
/// before they accept client connections.
const NODE_UP_DELAY_2_2: Duration = Duration::from_secs(10);

/// Release version reported by a node, e.g. `3.11.4`. Qualifiers such as `-SNAPSHOT` are ignored.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default, Display, Constructor)]
#[display("{major}.{minor}.{patch}")]
pub struct CassandraVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl CassandraVersion {
    /// How long to wait after an UP event before asking the pool to connect.
    pub fn node_up_delay(&self) -> Duration {
        if self.major == 2 && self.minor >= 2 {
            NODE_UP_DELAY_2_2
        } else {
            Duration::ZERO
        }
    }
}

impl FromStr for CassandraVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let release = s.split(['-', '+']).next().unwrap_or_default();
        let mut parts = release.split('.').map(|part| {
            part.parse::<u32>()
                .map_err(|_| Error::General(format!("Invalid version: {s}")))
        });

        let major = parts
            .next()
            .ok_or_else(|| Error::General(format!("Invalid version: {s}")))??;
        let minor = parts.next().transpose()?.unwrap_or_default();
        let patch = parts.next().transpose()?.unwrap_or_default();

        Ok(CassandraVersion::new(major, minor, patch))
    }
}
