//! Recording driver for tests and dry runs.
//!
//! [`RecordingDriver`] keeps every call in order together with the state a
//! real controller would hold (per-slot gains, sensor position, last output),
//! so callers can check both sequencing and end state without hardware.

use crate::driver::{HardwareBinder, MotorDriver};
use crate::gains::{GainKind, PidGains, SlotIndex, SLOT_COUNT};
use crate::types::{ControlMode, ErrorCode, InvertType, NeutralMode};
use crate::Result;
use device_registry::DeviceId;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// One call observed by a [`RecordingDriver`].
#[derive(Clone, Debug, PartialEq)]
pub enum DriverCall {
    Set { mode: ControlMode, value: f64 },
    SetSensorPosition { value: i32, pid_idx: u8, timeout_ms: i32 },
    SetNeutralMode(NeutralMode),
    SetInverted(InvertType),
    ConfigGain { slot: SlotIndex, kind: GainKind, value: f64, timeout_ms: i32 },
}

/// Observable state behind a recording driver.
#[derive(Clone, Debug, Default)]
pub struct DriverState {
    pub calls: Vec<DriverCall>,
    pub gains: [PidGains; SLOT_COUNT],
    pub position: i32,
    pub velocity: i32,
    pub neutral_mode: Option<NeutralMode>,
    pub invert: Option<InvertType>,
    pub last_output: Option<(ControlMode, f64)>,
    /// Status code to return for a gain kind instead of `Ok`.
    pub gain_failures: HashMap<GainKind, ErrorCode>,
    /// Status code to return from sensor writes instead of `Ok`.
    pub sensor_failure: Option<ErrorCode>,
}

impl DriverState {
    /// Only the gain writes, in order.
    pub fn gain_calls(&self) -> Vec<(SlotIndex, GainKind, f64)> {
        self.calls
            .iter()
            .filter_map(|c| match *c {
                DriverCall::ConfigGain {
                    slot, kind, value, ..
                } => Some((slot, kind, value)),
                _ => None,
            })
            .collect()
    }
}

pub type SharedState = Arc<Mutex<DriverState>>;

#[derive(Clone, Debug, Default)]
pub struct RecordingDriver {
    state: SharedState,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SharedState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }
}

impl MotorDriver for RecordingDriver {
    fn set(&mut self, mode: ControlMode, value: f64) {
        let mut st = self.state.lock();
        st.calls.push(DriverCall::Set { mode, value });
        st.last_output = Some((mode, value));
    }

    fn sensor_position(&self, _pid_idx: u8) -> i32 {
        self.state.lock().position
    }

    fn sensor_velocity(&self, _pid_idx: u8) -> i32 {
        self.state.lock().velocity
    }

    fn set_sensor_position(&mut self, value: i32, pid_idx: u8, timeout_ms: i32) -> ErrorCode {
        let mut st = self.state.lock();
        st.calls.push(DriverCall::SetSensorPosition {
            value,
            pid_idx,
            timeout_ms,
        });
        if let Some(code) = st.sensor_failure {
            return code;
        }
        st.position = value;
        ErrorCode::Ok
    }

    fn set_neutral_mode(&mut self, mode: NeutralMode) {
        let mut st = self.state.lock();
        st.calls.push(DriverCall::SetNeutralMode(mode));
        st.neutral_mode = Some(mode);
    }

    fn set_inverted(&mut self, invert: InvertType) {
        let mut st = self.state.lock();
        st.calls.push(DriverCall::SetInverted(invert));
        st.invert = Some(invert);
    }

    fn config_gain(
        &mut self,
        slot: SlotIndex,
        kind: GainKind,
        value: f64,
        timeout_ms: i32,
    ) -> ErrorCode {
        let mut st = self.state.lock();
        st.calls.push(DriverCall::ConfigGain {
            slot,
            kind,
            value,
            timeout_ms,
        });
        if let Some(code) = st.gain_failures.get(&kind).copied() {
            return code;
        }
        st.gains[slot.as_usize()].set(kind, value);
        ErrorCode::Ok
    }
}

/// Binder handing out [`RecordingDriver`]s, one shared state per device id.
#[derive(Debug, Default)]
pub struct RecordingBinder {
    states: Mutex<BTreeMap<DeviceId, SharedState>>,
}

impl RecordingBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `id`, created on first use so failures can be injected
    /// before the device is bound.
    pub fn state(&self, id: DeviceId) -> SharedState {
        self.states.lock().entry(id).or_default().clone()
    }

    pub fn is_bound(&self, id: DeviceId) -> bool {
        self.states
            .lock()
            .get(&id)
            .is_some_and(|st| !st.lock().calls.is_empty())
    }

    pub fn devices(&self) -> Vec<DeviceId> {
        self.states.lock().keys().copied().collect()
    }
}

impl HardwareBinder for RecordingBinder {
    fn bind(&self, id: DeviceId) -> Result<Box<dyn MotorDriver>> {
        tracing::debug!(%id, "binding recording driver");
        Ok(Box::new(RecordingDriver::with_state(self.state(id))))
    }
}
