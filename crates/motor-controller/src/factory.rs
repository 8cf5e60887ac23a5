//! [`ControllerFactory`]: the one place controller handles are created.
//!
//! The factory holds the test-mode switch and the id registry. Tests build
//! their own factory with a private registry and never touch shared state.

use crate::backing::{select_backing, Backing, BackingKind};
use crate::config::ControllerConfig;
use crate::controller::ControllerHandle;
use crate::driver::{HardwareBinder, NoopDriver};
use crate::metrics::MetricsHub;
use crate::{ControllerError, Result};
use device_registry::{DeviceId, DeviceRegistry};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ControllerFactory {
    test_mode: bool,
    registry: Arc<DeviceRegistry>,
    binder: Option<Arc<dyn HardwareBinder>>,
    metrics: Option<MetricsHub>,
}

impl Default for ControllerFactory {
    fn default() -> Self {
        Self {
            test_mode: false,
            registry: device_registry::global(),
            binder: None,
            metrics: None,
        }
    }
}

impl ControllerFactory {
    /// Factory using the process-wide registry and no hardware binder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every new handle to an inert test stub.
    pub fn test_mode(mut self, on: bool) -> Self {
        self.test_mode = on;
        self
    }

    pub fn with_registry(mut self, registry: Arc<DeviceRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_binder(mut self, binder: Arc<dyn HardwareBinder>) -> Self {
        self.binder = Some(binder);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHub) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Create a handle for `id` and push `config` to it.
    ///
    /// Addressable ids are claimed in the registry before anything is bound;
    /// a duplicate fails with [`ControllerError::Registry`]. Absent ids
    /// (negative) are never claimed. An id stays claimed even if the binder
    /// then fails, since the registry has no removal.
    pub fn build(
        &self,
        id: impl Into<DeviceId>,
        config: &ControllerConfig,
    ) -> Result<ControllerHandle> {
        let id = id.into();
        let kind = select_backing(self.test_mode, config.enabled(), id);

        let binder = if kind == BackingKind::Hardware {
            let binder = self
                .binder
                .as_deref()
                .ok_or(ControllerError::HardwareUnavailable(id))?;
            Some(binder)
        } else {
            None
        };

        if id.is_addressable() {
            self.registry.try_register(id)?;
        }

        let backing = match binder {
            Some(binder) => Backing::Hardware(binder.bind(id)?),
            None if kind == BackingKind::TestStub => Backing::TestStub(NoopDriver),
            None => Backing::Disabled(NoopDriver),
        };
        debug!(%id, backing = %kind, "binding controller");

        let handle = ControllerHandle::configure(id, config.clone(), backing);
        if let Some(metrics) = &self.metrics {
            metrics.record_build(kind, self.registry.len());
        }
        info!(
            %id,
            backing = %kind,
            neutral = ?config.neutral_mode(),
            invert = ?config.invert_type(),
            "controller configured"
        );
        Ok(handle)
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::gains::{GainKind, GainSlot, PidGains, SlotIndex};
    use crate::mock::{DriverCall, RecordingBinder};
    use crate::types::{ControlMode, ErrorCode, InvertType, NeutralMode};
    use device_registry::RegistryError;

    fn slot(i: u8) -> SlotIndex {
        SlotIndex::new(i).unwrap()
    }

    fn isolated(binder: &Arc<RecordingBinder>) -> ControllerFactory {
        ControllerFactory::new()
            .with_registry(Arc::new(DeviceRegistry::new()))
            .with_binder(binder.clone())
    }

    fn distinct_slots_config() -> ControllerConfig {
        ControllerConfig::builder()
            .inverted(true)
            .neutral_mode(NeutralMode::Brake)
            .pid(PidGains::new(1.0, 2.0, 3.0).with_feed_forward(4.0))
            .slot(
                slot(1),
                GainSlot::new(PidGains::new(11.0, 12.0, 13.0).with_feed_forward(14.0)),
            )
            .slot(
                slot(2),
                GainSlot::new(PidGains::new(21.0, 22.0, 23.0).with_feed_forward(24.0)),
            )
            .slot(
                slot(3),
                GainSlot::new(PidGains::new(31.0, 32.0, 33.0).with_feed_forward(34.0)),
            )
            .build()
    }

    #[test]
    fn enabled_device_binds_hardware_and_pushes_in_order() {
        let binder = Arc::new(RecordingBinder::new());
        let factory = isolated(&binder);
        let handle = factory.build(5, &distinct_slots_config()).unwrap();

        assert_eq!(handle.backing_kind(), BackingKind::Hardware);
        assert!(binder.is_bound(DeviceId::new(5)));

        let state = binder.state(DeviceId::new(5));
        let st = state.lock();
        assert_eq!(st.calls.len(), 2 + 16);
        assert_eq!(st.calls[0], DriverCall::SetInverted(InvertType::InvertMotorOutput));
        assert_eq!(st.calls[1], DriverCall::SetNeutralMode(NeutralMode::Brake));

        let pushed = st.gain_calls();
        let mut expected = Vec::new();
        for s in 0..4u8 {
            for (k, kind) in GainKind::ALL.into_iter().enumerate() {
                let value = if s == 0 {
                    (k + 1) as f64
                } else {
                    f64::from(s) * 10.0 + (k + 1) as f64
                };
                expected.push((slot(s), kind, value));
            }
        }
        assert_eq!(pushed, expected);
        assert!(handle.startup_report().iter().all(|r| r.is_ok()));
    }

    #[test]
    fn each_gain_kind_reaches_its_own_driver_term() {
        let binder = Arc::new(RecordingBinder::new());
        let factory = isolated(&binder);
        factory.build(8, &distinct_slots_config()).unwrap();

        let state = binder.state(DeviceId::new(8));
        let st = state.lock();
        assert_eq!(st.gains[0], PidGains::new(1.0, 2.0, 3.0).with_feed_forward(4.0));
        assert_eq!(st.gains[3], PidGains::new(31.0, 32.0, 33.0).with_feed_forward(34.0));
    }

    #[test]
    fn test_mode_selects_stub_for_any_id() {
        let binder = Arc::new(RecordingBinder::new());
        let factory = isolated(&binder).test_mode(true);
        let enabled = ControllerConfig::default();
        let disabled = ControllerConfig::builder().enabled(false).build();

        for (raw, cfg) in [(5, &enabled), (6, &disabled), (-1, &enabled), (-3, &disabled)] {
            let h = factory.build(raw, cfg).unwrap();
            assert_eq!(h.backing_kind(), BackingKind::TestStub);
            assert_eq!(h.position(), 0);
        }
        assert!(binder.devices().is_empty());
    }

    #[test]
    fn disabled_device_reads_zero() {
        let binder = Arc::new(RecordingBinder::new());
        let factory = isolated(&binder);
        let mut h = factory
            .build(5, &ControllerConfig::builder().enabled(false).build())
            .unwrap();
        assert_eq!(h.backing_kind(), BackingKind::Disabled);

        h.set_output(ControlMode::PercentOutput, 0.5);
        assert_eq!(h.position(), 0);
        assert_eq!(h.velocity(), 0);
        assert_eq!(h.position_at(1), 0);
        assert!(h.set_position(900).is_ok());
        assert_eq!(h.position(), 0);
        assert!(!binder.is_bound(DeviceId::new(5)));
    }

    #[test]
    fn absent_id_gets_stub_and_is_not_registered() {
        let binder = Arc::new(RecordingBinder::new());
        let factory = isolated(&binder);
        let a = factory.build(DeviceId::ABSENT, &ControllerConfig::default()).unwrap();
        let b = factory.build(DeviceId::ABSENT, &ControllerConfig::default()).unwrap();
        assert_eq!(a.backing_kind(), BackingKind::Disabled);
        assert_eq!(b.backing_kind(), BackingKind::Disabled);
        assert!(factory.registry().is_empty());
    }

    #[test]
    fn duplicate_id_fails_before_binding_again() {
        let binder = Arc::new(RecordingBinder::new());
        let factory = isolated(&binder);
        factory.build(5, &ControllerConfig::default()).unwrap();
        let calls_before = binder.state(DeviceId::new(5)).lock().calls.len();

        let err = factory.build(5, &ControllerConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ControllerError::Registry(RegistryError::Duplicate(id)) if id == DeviceId::new(5)
        ));
        assert_eq!(binder.state(DeviceId::new(5)).lock().calls.len(), calls_before);
    }

    #[test]
    fn hardware_without_binder_is_an_error() {
        let factory = ControllerFactory::new().with_registry(Arc::new(DeviceRegistry::new()));
        let err = factory.build(2, &ControllerConfig::default()).unwrap_err();
        assert!(matches!(err, ControllerError::HardwareUnavailable(_)));
        assert!(!factory.registry().is_registered(DeviceId::new(2)));
        // A disabled device still works without one.
        let h = factory
            .build(3, &ControllerConfig::builder().enabled(false).build())
            .unwrap();
        assert_eq!(h.backing_kind(), BackingKind::Disabled);
    }

    #[test]
    fn partial_gain_failure_does_not_stop_the_push() {
        let binder = Arc::new(RecordingBinder::new());
        binder
            .state(DeviceId::new(7))
            .lock()
            .gain_failures
            .insert(GainKind::I, ErrorCode::TxTimeout);
        let factory = isolated(&binder);
        let h = factory.build(7, &distinct_slots_config()).unwrap();

        assert_eq!(binder.state(DeviceId::new(7)).lock().gain_calls().len(), 16);
        for report in h.startup_report() {
            let failed: Vec<_> = report.failures().collect();
            assert_eq!(failed, vec![(GainKind::I, ErrorCode::TxTimeout)]);
        }
    }

    #[test]
    fn metrics_count_builds() {
        let binder = Arc::new(RecordingBinder::new());
        let hub = MetricsHub::new().unwrap();
        let factory = isolated(&binder).with_metrics(hub.clone());
        factory.build(1, &ControllerConfig::default()).unwrap();
        factory
            .build(2, &ControllerConfig::builder().enabled(false).build())
            .unwrap();
        assert_eq!(hub.built(BackingKind::Hardware), 1);
        assert_eq!(hub.built(BackingKind::Disabled), 1);
        assert_eq!(hub.ctl.device_ids_registered.get(), 2);
    }
}
