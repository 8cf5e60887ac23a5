use crate::backing::BackingKind;
use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct ControllerMetrics {
    pub controllers_built: IntCounterVec,
    pub device_ids_registered: IntGauge,
}

#[derive(Clone)]
pub struct MetricsHub {
    pub registry: Registry,
    pub ctl: ControllerMetrics,
}

impl MetricsHub {
    pub fn new() -> Result<Self, String> {
        let registry = Registry::new();
        let controllers_built = IntCounterVec::new(
            Opts::new("mc_controllers_built", "Controllers constructed, by backing"),
            &["backing"],
        )
        .map_err(|e| format!("metrics init error: {e}"))?;
        let device_ids_registered =
            IntGauge::new("mc_device_ids_registered", "CAN device ids currently claimed")
                .map_err(|e| format!("metrics init error: {e}"))?;
        let ctl = ControllerMetrics {
            controllers_built,
            device_ids_registered,
        };
        let _ = registry.register(Box::new(ctl.controllers_built.clone()));
        let _ = registry.register(Box::new(ctl.device_ids_registered.clone()));
        Ok(Self { registry, ctl })
    }

    pub(crate) fn record_build(&self, backing: BackingKind, registered: usize) {
        self.ctl
            .controllers_built
            .with_label_values(&[backing.as_str()])
            .inc();
        self.ctl
            .device_ids_registered
            .set(i64::try_from(registered).unwrap_or(i64::MAX));
    }

    pub fn built(&self, backing: BackingKind) -> u64 {
        self.ctl
            .controllers_built
            .with_label_values(&[backing.as_str()])
            .get()
    }

    pub fn encode_text(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buf) {
            return format!("error encoding metrics: {e}");
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
