//! ### CALIB - Factory trimming parameters (`0x88`, `0xA1`, `0xE1`, read-only)
//!
//! The calibration NVM is spread over three non-contiguous blocks:
//!
//! | Marker                 | Address | Length | Content          |
//! |------------------------|---------|--------|------------------|
//! | [`CalibrationTp`]      | 0x88    | 24     | dig_T1..dig_P9   |
//! | [`CalibrationH1`]      | 0xA1    | 1      | dig_H1           |
//! | [`CalibrationH2`]      | 0xE1    | 7      | dig_H2..dig_H6   |
//!
//! The markers return the raw bytes, [`CalibrationData`](crate::CalibrationData) decodes them.
use crate::register::{Readable, Reg};

/// Total length of the three calibration blocks.
pub const CALIBRATION_LEN: usize = CalibrationTp::N + CalibrationH1::N + CalibrationH2::N;

pub struct CalibrationTp;
impl Reg for CalibrationTp { const ADDR: u8 = 0x88; }

impl Readable for CalibrationTp {
    type Out = [u8; 24];
    const N: usize = 24;

    fn decode(b: &[u8]) -> Self::Out {
        let mut out = [0u8; 24];
        out.copy_from_slice(&b[..24]);
        out
    }
}

pub struct CalibrationH1;
impl Reg for CalibrationH1 { const ADDR: u8 = 0xA1; }

impl Readable for CalibrationH1 {
    type Out = u8;

    fn decode(b: &[u8]) -> Self::Out {
        b[0]
    }
}

pub struct CalibrationH2;
impl Reg for CalibrationH2 { const ADDR: u8 = 0xE1; }

impl Readable for CalibrationH2 {
    type Out = [u8; 7];
    const N: usize = 7;

    fn decode(b: &[u8]) -> Self::Out {
        let mut out = [0u8; 7];
        out.copy_from_slice(&b[..7]);
        out
    }
}
