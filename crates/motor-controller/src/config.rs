//! Startup configuration for one controller.
//!
//! A [`ControllerConfig`] is assembled once through [`ControllerConfigBuilder`]
//! and then only read. It is consumed by
//! [`ControllerFactory::build`](crate::ControllerFactory::build), which pushes
//! it to the selected backing driver exactly once.

use crate::gains::{GainSlot, PidGains, SlotIndex, SLOT_COUNT};
use crate::types::{InvertType, NeutralMode};

/// Convert a legacy integer cap to an optional bound.
///
/// Any negative value (conventionally -1) means "unbounded".
pub fn cap_from_sentinel(raw: i32) -> Option<u32> {
    u32::try_from(raw).ok()
}

/// Derive the inversion mode from an optional inversion flag.
///
/// `Some(true)` inverts the motor output; `Some(false)` and `None` leave it
/// as wired.
pub fn invert_type_for(invert: Option<bool>) -> InvertType {
    match invert {
        Some(true) => InvertType::InvertMotorOutput,
        Some(false) | None => InvertType::None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    enabled: bool,
    max_velocity: Option<u32>,
    max_acceleration: Option<u32>,
    invert: Option<bool>,
    invert_type: InvertType,
    neutral_mode: NeutralMode,
    slots: [GainSlot; SLOT_COUNT],
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfigBuilder::default().build()
    }
}

impl ControllerConfig {
    pub fn builder() -> ControllerConfigBuilder {
        ControllerConfigBuilder::default()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn max_velocity(&self) -> Option<u32> {
        self.max_velocity
    }

    pub fn max_acceleration(&self) -> Option<u32> {
        self.max_acceleration
    }

    /// The inversion flag as given, before derivation.
    pub fn invert(&self) -> Option<bool> {
        self.invert
    }

    pub fn invert_type(&self) -> InvertType {
        self.invert_type
    }

    pub fn neutral_mode(&self) -> NeutralMode {
        self.neutral_mode
    }

    pub fn slot(&self, index: SlotIndex) -> &GainSlot {
        &self.slots[index.as_usize()]
    }

    pub fn slots(&self) -> &[GainSlot; SLOT_COUNT] {
        &self.slots
    }
}

#[derive(Clone, Debug)]
pub struct ControllerConfigBuilder {
    enabled: bool,
    max_velocity: Option<u32>,
    max_acceleration: Option<u32>,
    invert: Option<bool>,
    invert_type: Option<InvertType>,
    neutral_mode: NeutralMode,
    pid: PidGains,
    slots: [Option<GainSlot>; SLOT_COUNT],
}

impl Default for ControllerConfigBuilder {
    fn default() -> Self {
        Self {
            enabled: true,
            max_velocity: None,
            max_acceleration: None,
            invert: None,
            invert_type: None,
            neutral_mode: NeutralMode::default(),
            pid: PidGains::default(),
            slots: [None; SLOT_COUNT],
        }
    }
}

impl ControllerConfigBuilder {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn max_velocity(mut self, cap: Option<u32>) -> Self {
        self.max_velocity = cap;
        self
    }

    pub fn max_acceleration(mut self, cap: Option<u32>) -> Self {
        self.max_acceleration = cap;
        self
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = Some(invert);
        self
    }

    /// Set the inversion mode directly, bypassing [`invert_type_for`].
    pub fn invert_type(mut self, invert_type: InvertType) -> Self {
        self.invert_type = Some(invert_type);
        self
    }

    pub fn neutral_mode(mut self, mode: NeutralMode) -> Self {
        self.neutral_mode = mode;
        self
    }

    /// Gains for slot 0, used unless slot 0 is set explicitly.
    pub fn pid(mut self, pid: PidGains) -> Self {
        self.pid = pid;
        self
    }

    pub fn slot(mut self, index: SlotIndex, slot: GainSlot) -> Self {
        self.slots[index.as_usize()] = Some(slot);
        self
    }

    pub fn build(self) -> ControllerConfig {
        let mut slots = [GainSlot::default(); SLOT_COUNT];
        slots[0] = GainSlot::new(self.pid);
        for (dst, src) in slots.iter_mut().zip(self.slots) {
            if let Some(slot) = src {
                *dst = slot;
            }
        }
        ControllerConfig {
            enabled: self.enabled,
            max_velocity: self.max_velocity,
            max_acceleration: self.max_acceleration,
            invert: self.invert,
            invert_type: self
                .invert_type
                .unwrap_or_else(|| invert_type_for(self.invert)),
            neutral_mode: self.neutral_mode,
            slots,
        }
    }
}
