use crate::driver::{MotorDriver, NoopDriver};
use core::fmt;
use device_registry::DeviceId;
use serde::Serialize;

/// Which implementation a controller handle is bound to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackingKind {
    /// Disabled or absent device; inert stub.
    Disabled,
    /// Test mode was on at construction; inert stub kept apart for test
    /// bookkeeping.
    TestStub,
    /// Real driver for the device id.
    Hardware,
}

impl BackingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackingKind::Disabled => "disabled",
            BackingKind::TestStub => "test_stub",
            BackingKind::Hardware => "hardware",
        }
    }
}

impl fmt::Display for BackingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backing selection policy, evaluated in priority order: test mode, then an
/// enabled addressable device, then the inert stub.
pub fn select_backing(test_mode: bool, enabled: bool, id: DeviceId) -> BackingKind {
    if test_mode {
        BackingKind::TestStub
    } else if enabled && id.is_addressable() {
        BackingKind::Hardware
    } else {
        BackingKind::Disabled
    }
}

/// The one implementation a handle talks to. Chosen at construction and
/// never replaced.
pub(crate) enum Backing {
    Disabled(NoopDriver),
    TestStub(NoopDriver),
    Hardware(Box<dyn MotorDriver>),
}

impl Backing {
    pub(crate) fn kind(&self) -> BackingKind {
        match self {
            Backing::Disabled(_) => BackingKind::Disabled,
            Backing::TestStub(_) => BackingKind::TestStub,
            Backing::Hardware(_) => BackingKind::Hardware,
        }
    }

    pub(crate) fn driver(&self) -> &dyn MotorDriver {
        match self {
            Backing::Disabled(d) | Backing::TestStub(d) => d,
            Backing::Hardware(d) => d.as_ref(),
        }
    }

    pub(crate) fn driver_mut(&mut self) -> &mut dyn MotorDriver {
        match self {
            Backing::Disabled(d) | Backing::TestStub(d) => d,
            Backing::Hardware(d) => d.as_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_wins_over_everything() {
        for enabled in [true, false] {
            for raw in [-1, 0, 5, 62] {
                assert_eq!(
                    select_backing(true, enabled, DeviceId::new(raw)),
                    BackingKind::TestStub
                );
            }
        }
    }

    #[test]
    fn enabled_addressable_device_binds_hardware() {
        assert_eq!(
            select_backing(false, true, DeviceId::new(5)),
            BackingKind::Hardware
        );
        assert_eq!(
            select_backing(false, true, DeviceId::new(0)),
            BackingKind::Hardware
        );
    }

    #[test]
    fn disabled_or_absent_devices_get_the_stub() {
        assert_eq!(
            select_backing(false, false, DeviceId::new(5)),
            BackingKind::Disabled
        );
        assert_eq!(
            select_backing(false, true, DeviceId::ABSENT),
            BackingKind::Disabled
        );
    }
}
