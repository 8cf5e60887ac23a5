//! Closed-loop gain coefficients and the four firmware gain slots.

use crate::{ControllerError, Result};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Number of independently addressable gain slots on a controller.
pub const SLOT_COUNT: usize = 4;

/// One of the four coefficients stored in a gain slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GainKind {
    P,
    I,
    D,
    F,
}

impl GainKind {
    /// Push order used whenever a whole slot is written.
    pub const ALL: [GainKind; 4] = [GainKind::P, GainKind::I, GainKind::D, GainKind::F];

    pub fn as_str(&self) -> &'static str {
        match self {
            GainKind::P => "kP",
            GainKind::I => "kI",
            GainKind::D => "kD",
            GainKind::F => "kF",
        }
    }
}

/// Proportional, integral, derivative and feed-forward gains.
///
/// No range checks happen here; the driver decides what it accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct PidGains {
    #[serde(default)]
    pub p: f64,
    #[serde(default)]
    pub i: f64,
    #[serde(default)]
    pub d: f64,
    #[serde(default)]
    pub f: f64,
}

impl PidGains {
    pub fn new(p: f64, i: f64, d: f64) -> Self {
        Self { p, i, d, f: 0.0 }
    }

    pub fn with_feed_forward(mut self, f: f64) -> Self {
        self.f = f;
        self
    }

    pub fn get(&self, kind: GainKind) -> f64 {
        match kind {
            GainKind::P => self.p,
            GainKind::I => self.i,
            GainKind::D => self.d,
            GainKind::F => self.f,
        }
    }

    pub fn set(&mut self, kind: GainKind, value: f64) {
        match kind {
            GainKind::P => self.p = value,
            GainKind::I => self.i = value,
            GainKind::D => self.d = value,
            GainKind::F => self.f = value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GainSlot {
    pub pid: PidGains,
}

impl GainSlot {
    pub fn new(pid: PidGains) -> Self {
        Self { pid }
    }
}

impl From<PidGains> for GainSlot {
    fn from(pid: PidGains) -> Self {
        Self { pid }
    }
}

/// Index of a gain slot, always in `0..SLOT_COUNT`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SlotIndex(u8);

impl SlotIndex {
    pub const ALL: [SlotIndex; SLOT_COUNT] =
        [SlotIndex(0), SlotIndex(1), SlotIndex(2), SlotIndex(3)];

    pub fn new(index: u8) -> Result<Self> {
        if usize::from(index) < SLOT_COUNT {
            Ok(Self(index))
        } else {
            Err(ControllerError::InvalidSlot(index))
        }
    }

    /// Slots in push order 0, 1, 2, 3.
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        Self::ALL.into_iter()
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub(crate) fn as_usize(&self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<u8> for SlotIndex {
    type Error = ControllerError;

    fn try_from(index: u8) -> Result<Self> {
        SlotIndex::new(index)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot{}", self.0)
    }
}
