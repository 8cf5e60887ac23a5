use device_registry::{DeviceId, RegistryError};
use thiserror::Error;

pub type Result<T, E = ControllerError> = core::result::Result<T, E>;

/// Failures of the wrapper itself. Driver status codes are not errors; they
/// come back as [`ErrorCode`](crate::ErrorCode) values.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("gain slot {0} out of range (controllers expose slots 0-3)")]
    InvalidSlot(u8),
    #[error("no hardware binder configured for device {0}")]
    HardwareUnavailable(DeviceId),
    #[error("binding device {id} failed: {reason}")]
    Bind { id: DeviceId, reason: String },
}
