//! ### CTRL_HUM - Humidity oversampling (`0xF2`, 1 byte, R/W)
//!
//! Only bits 2..0 (`osrs_h`) are used. A new value is latched by the next write to
//! [`CtrlMeas`](crate::register::ctrl_meas::CtrlMeas), so this register is always written first.
//!
//! ### Default values
//! 0x00 (humidity skipped)
#![doc(alias = "CTRL_HUM")]
use crate::register::ctrl_meas::Oversampling;
use crate::register::{Readable, Reg, Writable};

/// Marker type for CTRL_HUM (0xF2) register
pub struct CtrlHum;
impl Reg for CtrlHum { const ADDR: u8 = 0xF2; }

impl Readable for CtrlHum {
    type Out = Oversampling;

    fn decode(b: &[u8]) -> Self::Out {
        Oversampling::from(b[0])
    }
}

impl Writable for CtrlHum {
    type In = Oversampling;

    fn encode(v: &Self::In) -> u8 {
        (*v).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_hum_decode_ignores_reserved_bits() {
        assert_eq!(Oversampling::X1, CtrlHum::decode(&[0b1111_1001]));
        assert_eq!(Oversampling::X16, CtrlHum::decode(&[0b0000_0111]));
    }

    #[test]
    fn ctrl_hum_encode() {
        assert_eq!(0b000, CtrlHum::encode(&Oversampling::Skipped));
        assert_eq!(0b011, CtrlHum::encode(&Oversampling::X4));
        assert_eq!(0b101, CtrlHum::encode(&Oversampling::X16));
    }
}
