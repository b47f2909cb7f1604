//! ### ID - Chip identification number (`0xD0`, 1 byte, R)
//!
//! Always reads `0x60` on a BME280. Readable as soon as the device finished its power-on reset.
#![doc(alias = "ID")]
use crate::register::{Readable, Reg};

/// Chip id reported by every BME280.
pub const BME280_CHIP_ID: u8 = 0x60;

/// Marker struct for the ID (0xD0) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
pub struct ChipId;
impl Reg for ChipId { const ADDR: u8 = 0xD0; }

impl Readable for ChipId {
    type Out = u8;
    fn decode(b: &[u8]) -> Self::Out {
        b[0]
    }
}
