use crate::config::{cap_from_sentinel, ControllerConfig};
use crate::gains::{GainSlot, PidGains, SlotIndex};
use crate::types::{InvertType, NeutralMode};
use crate::Result;
use device_registry::DeviceId;
use serde::{Deserialize, Serialize};

/// Declarative description of one controller as written in YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ControllerDescriptor {
    pub name: String,
    /// Bus address; negative for a device that is not fitted.
    pub id: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "unbounded")]
    pub max_velocity: i32,
    #[serde(default = "unbounded")]
    pub max_acceleration: i32,
    #[serde(default)]
    pub invert: Option<bool>,
    #[serde(default)]
    pub invert_type: Option<InvertType>,
    #[serde(default)]
    pub neutral_mode: NeutralMode,
    /// Slot 0 gains unless slot 0 appears in `slots`.
    #[serde(default)]
    pub pid: PidGains,
    #[serde(default)]
    pub slots: Vec<SlotDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct SlotDescriptor {
    pub index: u8,
    #[serde(flatten)]
    pub pid: PidGains,
}

fn default_enabled() -> bool {
    true
}

fn unbounded() -> i32 {
    -1
}

impl ControllerDescriptor {
    pub fn device_id(&self) -> DeviceId {
        DeviceId::new(self.id)
    }

    /// Turn the descriptor into a config, validating slot indices.
    pub fn to_config(&self) -> Result<ControllerConfig> {
        let mut builder = ControllerConfig::builder()
            .enabled(self.enabled)
            .max_velocity(cap_from_sentinel(self.max_velocity))
            .max_acceleration(cap_from_sentinel(self.max_acceleration))
            .neutral_mode(self.neutral_mode)
            .pid(self.pid);
        if let Some(invert) = self.invert {
            builder = builder.inverted(invert);
        }
        if let Some(invert_type) = self.invert_type {
            builder = builder.invert_type(invert_type);
        }
        for slot in &self.slots {
            builder = builder.slot(SlotIndex::new(slot.index)?, GainSlot::new(slot.pid));
        }
        Ok(builder.build())
    }
}
