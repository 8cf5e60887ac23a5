//! motor-controller: declarative configuration for CAN motor controllers
//!
//! A [`ControllerFactory`] turns a [`ControllerConfig`] into a
//! [`ControllerHandle`] bound to exactly one backing implementation: an inert
//! stub for disabled or absent devices, an inert test stub when test mode is
//! on, or a real driver produced by a [`HardwareBinder`]. The startup
//! configuration (inversion, neutral mode, four gain slots) is pushed once at
//! construction; everything after that is pass-through.
//!
//! The default `mock` feature adds a recording driver so the whole flow can be
//! exercised without hardware.

mod types;
pub use types::{ControlMode, ErrorCode, InvertType, NeutralMode};

mod error;
pub use error::{ControllerError, Result};

mod gains;
pub use gains::{GainKind, GainSlot, PidGains, SlotIndex, SLOT_COUNT};

mod config;
pub use config::{cap_from_sentinel, invert_type_for, ControllerConfig, ControllerConfigBuilder};

mod driver;
pub use driver::{HardwareBinder, MotorDriver, NoopDriver};

mod backing;
pub use backing::{select_backing, BackingKind};

mod report;
pub use report::SlotPushReport;

mod controller;
pub use controller::{ControllerHandle, PRIMARY_PID};

mod factory;
pub use factory::ControllerFactory;

mod metrics;
pub use metrics::{ControllerMetrics, MetricsHub};

mod descriptor;
pub use descriptor::{ControllerDescriptor, SlotDescriptor};

mod loader;
pub use loader::{load_descriptor_file, load_descriptors_dir, parse_descriptor, ControllerSet};

#[cfg(feature = "mock")]
pub mod mock;

pub use device_registry::{DeviceId, DeviceRegistry};
