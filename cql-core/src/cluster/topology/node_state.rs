use bytemuck::NoUninit;
use derive_more::Display;

/// The state of a host, as viewed from the driver.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Display, NoUninit)]
#[repr(u8)]
pub enum NodeState {
    /// No status event or successful connection has been observed for the host yet.
    Unknown,
    /// The pool has established a connection to the host. This is the signal that makes a host
    /// routable; an UP status event alone only requests a connection.
    Up,
    /// The server reported the host as down. The state changes even if the host is excluded by
    /// the host filter, so observers see the transition.
    Down,
}
