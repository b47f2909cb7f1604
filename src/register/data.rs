use crate::register::{Readable, Reg};

/// Marker struct for the PRESS/TEMP/HUM data registers (0xF7 - 0xFE).
/// The BME280 auto-increments on burst reads, so reading 8 bytes from 0xF7 returns a
/// consistent pressure, temperature and humidity triple as recommended by the datasheet,
/// section 4. The result is the raw uncompensated ADC output, [`Bme280::read_measurement()`]
/// compensates it for you.
///
/// - **Length:** 8 bytes
/// - **Access:** Read-only
///
/// [`Bme280::read_measurement()`]: crate::Bme280::read_measurement
pub struct Data;
impl Reg for Data { const ADDR: u8 = 0xF7; }

/// Raw ADC codes of one measurement cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    pressure: u32,
    temperature: u32,
    humidity: u16,
}

impl RawSample {
    pub fn new(pressure: u32, temperature: u32, humidity: u16) -> Self {
        Self { pressure, temperature, humidity }
    }

    /// Returns the raw 20-bit pressure code from the PRESS_MSB, PRESS_LSB and PRESS_XLSB registers
    pub fn pressure(&self) -> u32 { self.pressure }

    /// Returns the raw 20-bit temperature code from the TEMP_MSB, TEMP_LSB and TEMP_XLSB registers
    pub fn temperature(&self) -> u32 { self.temperature }

    /// Returns the raw 16-bit humidity code from the HUM_MSB and HUM_LSB registers
    pub fn humidity(&self) -> u16 { self.humidity }
}

impl Readable for Data {
    type Out = RawSample;

    const N: usize = 8;

    fn decode(b: &[u8]) -> Self::Out {
        // xlsb holds the 4 least significant bits in its upper nibble
        RawSample {
            pressure: u32::from_be_bytes([0, b[0], b[1], b[2]]) >> 4,
            temperature: u32::from_be_bytes([0, b[3], b[4], b[5]]) >> 4,
            humidity: u16::from_be_bytes([b[6], b[7]]),
        }
    }
}
