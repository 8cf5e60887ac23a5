use crate::gains::{GainKind, SlotIndex};
use crate::types::{ControlMode, ErrorCode, InvertType, NeutralMode};
use crate::Result;
use device_registry::DeviceId;

/// Capability set of a vendor motor-controller driver.
///
/// Implementations own all bus traffic and firmware-side control. Every call
/// is synchronous; `timeout_ms` values are forwarded as-is for the driver's
/// own use.
pub trait MotorDriver: Send {
    /// Command the output in `mode` toward `value`.
    fn set(&mut self, mode: ControlMode, value: f64);

    /// Selected sensor position in native units for closed-loop `pid_idx`.
    fn sensor_position(&self, pid_idx: u8) -> i32;

    /// Selected sensor velocity in native units per 100 ms.
    fn sensor_velocity(&self, pid_idx: u8) -> i32;

    fn set_sensor_position(&mut self, value: i32, pid_idx: u8, timeout_ms: i32) -> ErrorCode;

    fn set_neutral_mode(&mut self, mode: NeutralMode);

    fn set_inverted(&mut self, invert: InvertType);

    /// Write one coefficient of one gain slot.
    fn config_gain(
        &mut self,
        slot: SlotIndex,
        kind: GainKind,
        value: f64,
        timeout_ms: i32,
    ) -> ErrorCode;
}

/// Produces hardware drivers for bus addresses.
///
/// This is where a concrete vendor driver plugs in; the wrapper never opens a
/// bus itself.
pub trait HardwareBinder: Send + Sync {
    fn bind(&self, id: DeviceId) -> Result<Box<dyn MotorDriver>>;
}

/// Inert driver: reads return zero, writes are accepted and dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDriver;

impl MotorDriver for NoopDriver {
    fn set(&mut self, _mode: ControlMode, _value: f64) {}

    fn sensor_position(&self, _pid_idx: u8) -> i32 {
        0
    }

    fn sensor_velocity(&self, _pid_idx: u8) -> i32 {
        0
    }

    fn set_sensor_position(&mut self, _value: i32, _pid_idx: u8, _timeout_ms: i32) -> ErrorCode {
        ErrorCode::Ok
    }

    fn set_neutral_mode(&mut self, _mode: NeutralMode) {}

    fn set_inverted(&mut self, _invert: InvertType) {}

    fn config_gain(
        &mut self,
        _slot: SlotIndex,
        _kind: GainKind,
        _value: f64,
        _timeout_ms: i32,
    ) -> ErrorCode {
        ErrorCode::Ok
    }
}
