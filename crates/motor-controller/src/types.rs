use core::fmt;
use serde::{Deserialize, Serialize};

/// How the controller interprets the value passed to `set`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Fraction of bus voltage, -1.0..=1.0.
    PercentOutput,
    /// Closed-loop position in native sensor units.
    Position,
    /// Closed-loop velocity in native units per 100 ms.
    Velocity,
    Current,
    /// Mirror the output of the controller whose id is passed as the value.
    Follower,
    MotionProfile,
    MotionMagic,
    Disabled,
}

/// Behavior of the output stage when no command is asserted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum NeutralMode {
    #[default]
    Coast,
    Brake,
    /// Keep whatever is stored in the controller's persistent settings.
    EepromSetting,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum InvertType {
    #[default]
    None,
    InvertMotorOutput,
    FollowMaster,
    OpposeMaster,
}

/// Status code reported by the driver for configuration and sensor writes.
///
/// The wrapper hands these back untouched; it never retries on them.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum ErrorCode {
    #[default]
    Ok,
    CanMsgStale,
    TxFailed,
    InvalidParamValue,
    RxTimeout,
    TxTimeout,
    UnexpectedArbId,
    SensorNotPresent,
    GeneralError,
    Other(i32),
}

impl ErrorCode {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Ok,
            1 => Self::CanMsgStale,
            -1 => Self::TxFailed,
            -2 => Self::InvalidParamValue,
            -3 => Self::RxTimeout,
            -4 => Self::TxTimeout,
            -5 => Self::UnexpectedArbId,
            -9 => Self::SensorNotPresent,
            -100 => Self::GeneralError,
            other => Self::Other(other),
        }
    }

    pub fn raw(&self) -> i32 {
        match *self {
            Self::Ok => 0,
            Self::CanMsgStale => 1,
            Self::TxFailed => -1,
            Self::InvalidParamValue => -2,
            Self::RxTimeout => -3,
            Self::TxTimeout => -4,
            Self::UnexpectedArbId => -5,
            Self::SensorNotPresent => -9,
            Self::GeneralError => -100,
            Self::Other(raw) => raw,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(raw) => write!(f, "driver status {raw}"),
            named => write!(f, "{named:?} ({})", named.raw()),
        }
    }
}
