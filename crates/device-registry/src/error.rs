use crate::DeviceId;
use thiserror::Error;

pub type Result<T, E = RegistryError> = core::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("CAN device id {0} is already registered")]
    Duplicate(DeviceId),
}
