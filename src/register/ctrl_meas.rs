//! ### CTRL_MEAS - Temperature/pressure oversampling and mode (`0xF4`, 1 byte, R/W)
//!
//! | Bits | Field    |
//! |------|----------|
//! | 7..5 | `osrs_t` |
//! | 4..2 | `osrs_p` |
//! | 1..0 | `mode`   |
//!
//! Changes to [`CtrlHum`](crate::register::ctrl_hum::CtrlHum) only become effective after a
//! write to this register.
//!
//! ### Default values
//! 0x00 (both channels skipped, sleep mode)
#![doc(alias = "CTRL_MEAS")]
use crate::register::{Readable, Reg, Writable};

/// Marker type for CTRL_MEAS (0xF4) register
pub struct CtrlMeas;
impl Reg for CtrlMeas { const ADDR: u8 = 0xF4; }

/// The payload for the CTRL_MEAS (0xF4) register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CtrlMeasFields {
    pub osrs_t: Oversampling,
    pub osrs_p: Oversampling,
    pub mode: PowerMode,
}

impl Readable for CtrlMeas {
    type Out = CtrlMeasFields;

    fn decode(b: &[u8]) -> Self::Out {
        CtrlMeasFields {
            osrs_t: Oversampling::from(b[0] >> 5),
            osrs_p: Oversampling::from(b[0] >> 2),
            mode: PowerMode::from(b[0]),
        }
    }
}

impl Writable for CtrlMeas {
    type In = CtrlMeasFields;

    fn encode(v: &Self::In) -> u8 {
        let osrs_t: u8 = v.osrs_t.into();
        let osrs_p: u8 = v.osrs_p.into();
        let mode: u8 = v.mode.into();
        (osrs_t << 5) | (osrs_p << 2) | mode
    }
}

/// Oversampling setting of one measurement channel.
///
/// Shared by temperature, pressure (CTRL_MEAS) and humidity (CTRL_HUM).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    /// The channel is not measured. Its output reads `0x80000` (`0x8000` for humidity).
    Skipped,
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl Oversampling {
    /// Number of samples averaged for one output, 0 when the channel is skipped.
    pub fn samples(&self) -> u32 {
        match self {
            Oversampling::Skipped => 0,
            Oversampling::X1 => 1,
            Oversampling::X2 => 2,
            Oversampling::X4 => 4,
            Oversampling::X8 => 8,
            Oversampling::X16 => 16,
        }
    }
}

/// Decodes the low three bits. `0b110` and `0b111` also mean x16.
impl From<u8> for Oversampling {
    fn from(field: u8) -> Self {
        match field & 0b111 {
            0b000 => Oversampling::Skipped,
            0b001 => Oversampling::X1,
            0b010 => Oversampling::X2,
            0b011 => Oversampling::X4,
            0b100 => Oversampling::X8,
            _ => Oversampling::X16,
        }
    }
}

impl From<Oversampling> for u8 {
    fn from(osr: Oversampling) -> Self {
        match osr {
            Oversampling::Skipped => 0b000,
            Oversampling::X1 => 0b001,
            Oversampling::X2 => 0b010,
            Oversampling::X4 => 0b011,
            Oversampling::X8 => 0b100,
            Oversampling::X16 => 0b101,
        }
    }
}

/// Describes the power modes that can be set in the CTRL_MEAS register.
///
/// For more information, see section 3.3 in the datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Sleep mode. This is the default mode after power on reset.
    Sleep,
    /// Forced mode. One measurement is performed, then the device returns to Sleep mode.
    Forced,
    /// Normal mode. Measurements run continuously, separated by the configured standby time.
    Normal,
}

impl From<u8> for PowerMode {
    fn from(field: u8) -> Self {
        match field & 0b11 {
            0b00 => PowerMode::Sleep,
            0b01 | 0b10 => PowerMode::Forced,
            _ => PowerMode::Normal,
        }
    }
}

impl From<PowerMode> for u8 {
    fn from(mode: PowerMode) -> Self {
        match mode {
            PowerMode::Sleep => 0b00,
            PowerMode::Forced => 0b01,
            PowerMode::Normal => 0b11,
        }
    }
}
