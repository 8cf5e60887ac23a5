//! [`ControllerHandle`]: a configured controller bound to one backing driver.
//!
//! After construction every method is a direct call into the backing driver.
//! Nothing is cached, retried or interpreted; status codes go straight back to
//! the caller.

use crate::backing::{Backing, BackingKind};
use crate::config::ControllerConfig;
use crate::gains::{GainKind, GainSlot, SlotIndex, SLOT_COUNT};
use crate::report::SlotPushReport;
use crate::types::{ControlMode, ErrorCode, InvertType, NeutralMode};
use device_registry::DeviceId;

/// Closed-loop index used by the short-form sensor accessors.
pub const PRIMARY_PID: u8 = 0;

pub struct ControllerHandle {
    id: DeviceId,
    config: ControllerConfig,
    backing: Backing,
    startup: [SlotPushReport; SLOT_COUNT],
}

impl ControllerHandle {
    /// Push the startup configuration and wrap the backing.
    ///
    /// Order: inversion, neutral mode, then slots 0 to 3.
    pub(crate) fn configure(id: DeviceId, config: ControllerConfig, mut backing: Backing) -> Self {
        let driver = backing.driver_mut();
        driver.set_inverted(config.invert_type());
        driver.set_neutral_mode(config.neutral_mode());
        let startup = core::array::from_fn(|i| {
            let slot = SlotIndex::ALL[i];
            push_slot(&mut backing, slot, config.slot(slot))
        });
        Self {
            id,
            config,
            backing,
            startup,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Configuration pushed at construction.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn backing_kind(&self) -> BackingKind {
        self.backing.kind()
    }

    /// Status codes from the construction-time slot writes.
    pub fn startup_report(&self) -> &[SlotPushReport; SLOT_COUNT] {
        &self.startup
    }

    pub fn set_output(&mut self, mode: ControlMode, value: f64) {
        self.backing.driver_mut().set(mode, value);
    }

    pub fn position(&self) -> i32 {
        self.position_at(PRIMARY_PID)
    }

    pub fn position_at(&self, pid_idx: u8) -> i32 {
        self.backing.driver().sensor_position(pid_idx)
    }

    pub fn velocity(&self) -> i32 {
        self.velocity_at(PRIMARY_PID)
    }

    pub fn velocity_at(&self, pid_idx: u8) -> i32 {
        self.backing.driver().sensor_velocity(pid_idx)
    }

    /// Zero the primary sensor. Same as `set_position(0)`.
    pub fn reset_position(&mut self) -> ErrorCode {
        self.reset_position_with(PRIMARY_PID, 0)
    }

    pub fn reset_position_with(&mut self, pid_idx: u8, timeout_ms: i32) -> ErrorCode {
        self.set_position_with(0, pid_idx, timeout_ms)
    }

    pub fn set_position(&mut self, value: i32) -> ErrorCode {
        self.set_position_with(value, PRIMARY_PID, 0)
    }

    pub fn set_position_with(&mut self, value: i32, pid_idx: u8, timeout_ms: i32) -> ErrorCode {
        self.backing
            .driver_mut()
            .set_sensor_position(value, pid_idx, timeout_ms)
    }

    /// Rewrite all four gains of one slot. Other slots are not touched.
    pub fn reconfigure_slot(&mut self, slot: SlotIndex, gains: &GainSlot) -> SlotPushReport {
        push_slot(&mut self.backing, slot, gains)
    }

    /// Write a single coefficient.
    pub fn config_gain(
        &mut self,
        slot: SlotIndex,
        kind: GainKind,
        value: f64,
        timeout_ms: i32,
    ) -> ErrorCode {
        self.backing
            .driver_mut()
            .config_gain(slot, kind, value, timeout_ms)
    }

    pub fn set_neutral_mode(&mut self, mode: NeutralMode) {
        self.backing.driver_mut().set_neutral_mode(mode);
    }

    pub fn set_inverted(&mut self, invert: InvertType) {
        self.backing.driver_mut().set_inverted(invert);
    }
}

impl core::fmt::Debug for ControllerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ControllerHandle")
            .field("id", &self.id)
            .field("backing", &self.backing.kind())
            .field("config", &self.config)
            .finish()
    }
}

fn push_slot(backing: &mut Backing, slot: SlotIndex, gains: &GainSlot) -> SlotPushReport {
    let driver = backing.driver_mut();
    let codes = GainKind::ALL.map(|kind| {
        let code = driver.config_gain(slot, kind, gains.pid.get(kind), 0);
        (kind, code)
    });
    SlotPushReport { slot, codes }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::driver::NoopDriver;
    use crate::gains::PidGains;
    use crate::mock::{DriverCall, RecordingDriver, SharedState};

    fn hardware(config: ControllerConfig) -> (ControllerHandle, SharedState) {
        let driver = RecordingDriver::new();
        let state = driver.state();
        let handle = ControllerHandle::configure(
            DeviceId::new(5),
            config,
            Backing::Hardware(Box::new(driver)),
        );
        state.lock().calls.clear();
        (handle, state)
    }

    fn slot(i: u8) -> SlotIndex {
        SlotIndex::new(i).unwrap()
    }

    #[test]
    fn reset_is_set_position_zero() {
        let (mut h, state) = hardware(ControllerConfig::default());
        state.lock().position = 777;
        assert!(h.reset_position().is_ok());
        assert_eq!(h.position(), 0);

        assert!(h.set_position(0).is_ok());
        let calls = state.lock().calls.clone();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(
            calls[0],
            DriverCall::SetSensorPosition {
                value: 0,
                pid_idx: 0,
                timeout_ms: 0
            }
        );
    }

    #[test]
    fn sensor_calls_forward_index_and_timeout() {
        let (mut h, state) = hardware(ControllerConfig::default());
        assert!(h.set_position_with(250, 1, 30).is_ok());
        assert!(h.reset_position_with(1, 10).is_ok());
        assert_eq!(
            state.lock().calls,
            vec![
                DriverCall::SetSensorPosition {
                    value: 250,
                    pid_idx: 1,
                    timeout_ms: 30
                },
                DriverCall::SetSensorPosition {
                    value: 0,
                    pid_idx: 1,
                    timeout_ms: 10
                },
            ]
        );
    }

    #[test]
    fn sensor_failure_code_is_returned_untouched() {
        let (mut h, state) = hardware(ControllerConfig::default());
        state.lock().sensor_failure = Some(ErrorCode::Other(-321));
        assert_eq!(h.reset_position(), ErrorCode::Other(-321));
    }

    #[test]
    fn reads_requery_the_driver() {
        let (h, state) = hardware(ControllerConfig::default());
        state.lock().velocity = 40;
        assert_eq!(h.velocity(), 40);
        state.lock().velocity = -12;
        assert_eq!(h.velocity(), -12);
        state.lock().position = 9;
        assert_eq!(h.position_at(1), 9);
    }

    #[test]
    fn reconfigure_slot_leaves_other_slots_alone() {
        let cfg = ControllerConfig::builder()
            .pid(PidGains::new(1.0, 0.0, 0.5))
            .slot(slot(2), GainSlot::new(PidGains::new(2.0, 0.1, 0.0)))
            .build();
        let (mut h, state) = hardware(cfg);

        let replacement = GainSlot::new(PidGains::new(5.0, 6.0, 7.0).with_feed_forward(8.0));
        let report = h.reconfigure_slot(slot(1), &replacement);
        assert!(report.is_ok());
        assert_eq!(report.slot, slot(1));

        let st = state.lock();
        assert_eq!(st.gains[0], PidGains::new(1.0, 0.0, 0.5));
        assert_eq!(st.gains[1], replacement.pid);
        assert_eq!(st.gains[2], PidGains::new(2.0, 0.1, 0.0));
        assert_eq!(st.gains[3], PidGains::default());
        assert_eq!(st.gain_calls().len(), 4);
        // The startup config is not rewritten by later changes.
        assert_eq!(h.config().slot(slot(1)).pid, PidGains::default());
    }

    #[test]
    fn single_gain_write_passes_through() {
        let (mut h, state) = hardware(ControllerConfig::default());
        assert!(h.config_gain(slot(3), GainKind::F, 0.07, 25).is_ok());
        assert_eq!(
            state.lock().calls,
            vec![DriverCall::ConfigGain {
                slot: slot(3),
                kind: GainKind::F,
                value: 0.07,
                timeout_ms: 25
            }]
        );
    }

    #[test]
    fn setters_pass_through_last_write_wins() {
        let (mut h, state) = hardware(ControllerConfig::default());
        h.set_output(ControlMode::Position, 4096.0);
        h.set_output(ControlMode::PercentOutput, -0.25);
        h.set_neutral_mode(NeutralMode::Brake);
        h.set_neutral_mode(NeutralMode::Coast);
        h.set_inverted(InvertType::OpposeMaster);

        let st = state.lock();
        assert_eq!(st.last_output, Some((ControlMode::PercentOutput, -0.25)));
        assert_eq!(st.neutral_mode, Some(NeutralMode::Coast));
        assert_eq!(st.invert, Some(InvertType::OpposeMaster));
        assert_eq!(st.calls.len(), 5);
    }

    #[test]
    fn stubs_always_report_success() {
        for backing in [Backing::Disabled(NoopDriver), Backing::TestStub(NoopDriver)] {
            let mut h =
                ControllerHandle::configure(DeviceId::ABSENT, ControllerConfig::default(), backing);
            assert!(h.startup_report().iter().all(SlotPushReport::is_ok));
            assert!(h.reset_position().is_ok());
            assert!(h.reconfigure_slot(slot(0), &GainSlot::default()).is_ok());
            assert_eq!(h.velocity(), 0);
        }
    }
}
