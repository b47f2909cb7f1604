//! ### CONFIG - Standby time, IIR filter and SPI interface (`0xF5`, 1 byte, R/W)
//!
//! | Bits | Field      |
//! |------|------------|
//! | 7..5 | `t_sb`     |
//! | 4..2 | `filter`   |
//! | 0    | `spi3w_en` |
//!
//! Writes in normal mode may be ignored by the device, write it while sleeping.
//!
//! ### Default values
//! 0x00 (0.5 ms standby, filter off, 4-wire SPI)
#![doc(alias = "CONFIG")]
use crate::register::{Readable, Reg, Writable};

/// Marker type for CONFIG (0xF5) register
pub struct Config;
impl Reg for Config { const ADDR: u8 = 0xF5; }

/// The payload for the CONFIG (0xF5) register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigFields {
    /// Inactive period between two measurements in normal mode.
    pub standby_time: StandbyTime,
    /// The IIR filter coefficient.
    ///
    /// Read more about the IIR filter in the datasheet section 3.4.4
    pub iir_filter: IIRFilterCoefficient,
    pub spi_wires: SpiWires,
}

impl Readable for Config {
    type Out = ConfigFields;

    fn decode(b: &[u8]) -> Self::Out {
        ConfigFields {
            standby_time: StandbyTime::from(b[0] >> 5),
            iir_filter: IIRFilterCoefficient::from(b[0] >> 2),
            spi_wires: SpiWires::from(b[0]),
        }
    }
}

impl Writable for Config {
    type In = ConfigFields;

    fn encode(v: &Self::In) -> u8 {
        let t_sb: u8 = v.standby_time.into();
        let filter: u8 = v.iir_filter.into();
        let spi3w_en: u8 = v.spi_wires.into();
        (t_sb << 5) | (filter << 2) | spi3w_en
    }
}

/// Standby time between two conversions in normal mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StandbyTime {
    Ms0_5,
    Ms62_5,
    Ms125,
    Ms250,
    Ms500,
    Ms1000,
    Ms10,
    Ms20,
}

impl StandbyTime {
    /// The standby period in microseconds.
    pub fn micros(&self) -> u32 {
        match self {
            StandbyTime::Ms0_5 => 500,
            StandbyTime::Ms62_5 => 62_500,
            StandbyTime::Ms125 => 125_000,
            StandbyTime::Ms250 => 250_000,
            StandbyTime::Ms500 => 500_000,
            StandbyTime::Ms1000 => 1_000_000,
            StandbyTime::Ms10 => 10_000,
            StandbyTime::Ms20 => 20_000,
        }
    }
}

impl From<u8> for StandbyTime {
    fn from(field: u8) -> Self {
        match field & 0b111 {
            0b000 => StandbyTime::Ms0_5,
            0b001 => StandbyTime::Ms62_5,
            0b010 => StandbyTime::Ms125,
            0b011 => StandbyTime::Ms250,
            0b100 => StandbyTime::Ms500,
            0b101 => StandbyTime::Ms1000,
            0b110 => StandbyTime::Ms10,
            _ => StandbyTime::Ms20,
        }
    }
}

impl From<StandbyTime> for u8 {
    fn from(t_sb: StandbyTime) -> Self {
        match t_sb {
            StandbyTime::Ms0_5 => 0b000,
            StandbyTime::Ms62_5 => 0b001,
            StandbyTime::Ms125 => 0b010,
            StandbyTime::Ms250 => 0b011,
            StandbyTime::Ms500 => 0b100,
            StandbyTime::Ms1000 => 0b101,
            StandbyTime::Ms10 => 0b110,
            StandbyTime::Ms20 => 0b111,
        }
    }
}

/// This enum holds all configurable IIR filter coefficients.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IIRFilterCoefficient {
    /// Filter off
    Off,
    /// Filter coefficient is 2
    Coef2,
    /// Filter coefficient is 4
    Coef4,
    /// Filter coefficient is 8
    Coef8,
    /// Filter coefficient is 16
    Coef16,
}

/// `0b101` to `0b111` also select coefficient 16.
impl From<u8> for IIRFilterCoefficient {
    fn from(field: u8) -> Self {
        match field & 0b111 {
            0b000 => IIRFilterCoefficient::Off,
            0b001 => IIRFilterCoefficient::Coef2,
            0b010 => IIRFilterCoefficient::Coef4,
            0b011 => IIRFilterCoefficient::Coef8,
            _ => IIRFilterCoefficient::Coef16,
        }
    }
}

impl From<IIRFilterCoefficient> for u8 {
    fn from(filter: IIRFilterCoefficient) -> Self {
        match filter {
            IIRFilterCoefficient::Off => 0b000,
            IIRFilterCoefficient::Coef2 => 0b001,
            IIRFilterCoefficient::Coef4 => 0b010,
            IIRFilterCoefficient::Coef8 => 0b011,
            IIRFilterCoefficient::Coef16 => 0b100,
        }
    }
}

/// Selects the SPI interface flavour (`spi3w_en`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiWires {
    FourWire,
    ThreeWire,
}

impl From<u8> for SpiWires {
    fn from(field: u8) -> Self {
        if field & 0b1 != 0 {
            SpiWires::ThreeWire
        } else {
            SpiWires::FourWire
        }
    }
}

impl From<SpiWires> for u8 {
    fn from(wires: SpiWires) -> Self {
        match wires {
            SpiWires::FourWire => 0,
            SpiWires::ThreeWire => 1,
        }
    }
}
