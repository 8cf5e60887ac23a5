use core::fmt;
use serde::{Deserialize, Serialize};

/// Numeric CAN bus address of a device.
///
/// Non-negative values are real bus addresses. Negative values are used as a
/// sentinel for "not physically present" and are never registered.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(i32);

impl DeviceId {
    /// Sentinel id for a device that is not on the bus.
    pub const ABSENT: DeviceId = DeviceId(-1);

    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> i32 {
        self.0
    }

    /// True when the id names an actual bus address.
    pub const fn is_addressable(&self) -> bool {
        self.0 >= 0
    }
}

impl From<i32> for DeviceId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_addressable() {
            write!(f, "can#{}", self.0)
        } else {
            write!(f, "can#absent({})", self.0)
        }
    }
}
