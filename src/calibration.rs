use crate::bus::{Bus, Transport};
use crate::error::Bme280Result;
use crate::register::calibration::{CalibrationH1, CalibrationH2, CalibrationTp, CALIBRATION_LEN};
use log::debug;

/// Factory-trimmed compensation parameters (dig_T1..dig_T3, dig_P1..dig_P9, dig_H1..dig_H6).
///
/// Read once after power-up or reset and never modified afterwards. The compensation
/// formulas are methods on this type, see [`CalibrationData::compensate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationData {
    pub(crate) t1: u16,
    pub(crate) t2: i16,
    pub(crate) t3: i16,
    pub(crate) p1: u16,
    pub(crate) p2: i16,
    pub(crate) p3: i16,
    pub(crate) p4: i16,
    pub(crate) p5: i16,
    pub(crate) p6: i16,
    pub(crate) p7: i16,
    pub(crate) p8: i16,
    pub(crate) p9: i16,
    pub(crate) h1: u8,
    pub(crate) h2: i16,
    pub(crate) h3: u8,
    pub(crate) h4: u16,
    pub(crate) h5: u16,
    pub(crate) h6: i8,
}

impl CalibrationData {
    /// Reads the three calibration blocks and decodes them.
    pub fn load<T: Transport>(bus: &mut Bus<T>) -> Bme280Result<Self, T::Error> {
        let tp = bus.read::<CalibrationTp>()?;
        let h1 = bus.read::<CalibrationH1>()?;
        let h2 = bus.read::<CalibrationH2>()?;

        Ok(Self::from_blocks(&tp, h1, &h2))
    }

    /// Joins the three blocks in read order and decodes them.
    pub(crate) fn from_blocks(tp: &[u8; 24], h1: u8, h2: &[u8; 7]) -> Self {
        let mut raw = [0u8; CALIBRATION_LEN];
        raw[..24].copy_from_slice(tp);
        raw[24] = h1;
        raw[25..].copy_from_slice(h2);

        let calibration = Self::from_bytes(&raw);
        debug!("loaded calibration data: {:?}", calibration);

        calibration
    }

    /// Decodes the concatenation of the 0x88 (24 bytes), 0xA1 (1 byte) and 0xE1 (7 bytes) blocks.
    pub fn from_bytes(b: &[u8; CALIBRATION_LEN]) -> Self {
        Self {
            t1: u16::from_le_bytes([b[0], b[1]]),
            t2: i16::from_le_bytes([b[2], b[3]]),
            t3: i16::from_le_bytes([b[4], b[5]]),
            p1: u16::from_le_bytes([b[6], b[7]]),
            p2: i16::from_le_bytes([b[8], b[9]]),
            p3: i16::from_le_bytes([b[10], b[11]]),
            p4: i16::from_le_bytes([b[12], b[13]]),
            p5: i16::from_le_bytes([b[14], b[15]]),
            p6: i16::from_le_bytes([b[16], b[17]]),
            p7: i16::from_le_bytes([b[18], b[19]]),
            p8: i16::from_le_bytes([b[20], b[21]]),
            p9: i16::from_le_bytes([b[22], b[23]]),
            h1: b[24],
            h2: i16::from_le_bytes([b[25], b[26]]),
            h3: b[27],
            // 0xE5 is shared: bits 3..0 complete dig_H4, bits 7..4 complete dig_H5
            h4: ((b[28] as u16) << 4) | (b[29] & 0x0F) as u16,
            h5: ((b[30] as u16) << 4) | (b[29] >> 4) as u16,
            h6: b[31] as i8,
        }
    }

    pub fn dig_t(&self) -> (u16, i16, i16) {
        (self.t1, self.t2, self.t3)
    }

    pub fn dig_p(&self) -> (u16, [i16; 8]) {
        (self.p1, [self.p2, self.p3, self.p4, self.p5, self.p6, self.p7, self.p8, self.p9])
    }

    pub fn dig_h(&self) -> (u8, i16, u8, u16, u16, i8) {
        (self.h1, self.h2, self.h3, self.h4, self.h5, self.h6)
    }
}
