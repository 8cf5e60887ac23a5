use crate::gains::{GainKind, SlotIndex};
use crate::types::ErrorCode;

/// Status codes returned while writing one gain slot, in P, I, D, F order.
///
/// A slot write never stops early: every kind is attempted and its code kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotPushReport {
    pub slot: SlotIndex,
    pub codes: [(GainKind, ErrorCode); 4],
}

impl SlotPushReport {
    pub fn is_ok(&self) -> bool {
        self.codes.iter().all(|(_, code)| code.is_ok())
    }

    /// Kinds whose write did not report `Ok`.
    pub fn failures(&self) -> impl Iterator<Item = (GainKind, ErrorCode)> + '_ {
        self.codes.iter().copied().filter(|(_, code)| !code.is_ok())
    }

    pub fn code(&self, kind: GainKind) -> ErrorCode {
        self.codes
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, code)| *code)
            .unwrap_or_default()
    }
}
