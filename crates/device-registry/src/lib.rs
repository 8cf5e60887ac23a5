//! device-registry: process-wide bookkeeping of claimed CAN device identifiers
//!
//! Every physical controller on the bus is addressed by a numeric id. The
//! registry records which ids have been claimed so two wrappers never end up
//! talking to the same address. Ids are never released; the set lives as long
//! as the process (or the [`DeviceRegistry`] instance a test creates).

mod types;
pub use types::DeviceId;

mod error;
pub use error::{RegistryError, Result};

mod registry;
pub use registry::{global, DeviceRegistry};
