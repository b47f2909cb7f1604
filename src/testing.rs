//! Test doubles: a simulated BME280 behind `SpiDevice` and a delay that only counts.

use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use heapless::Vec;

/// Calibration NVM of the reference device: the datasheet's temperature/pressure example
/// (dig_T1 = 27504 .. dig_P9 = 6000) followed by dig_H1 = 75, dig_H2 = 362, dig_H3 = 0,
/// dig_H4 = 313, dig_H5 = 50 and dig_H6 = 30.
pub const REFERENCE_CALIBRATION: [u8; 32] = [
    0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C,
    0x00, 0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17, 0x4B, 0x6A, 0x01, 0x00, 0x13, 0x29,
    0x03, 0x1E,
];

/// Data registers holding adc_P = 415148, adc_T = 519888, adc_H = 30000.
pub const REFERENCE_SAMPLE: [u8; 8] = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FakeSpiError;

impl embedded_hal::spi::Error for FakeSpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Simulated BME280 register file.
///
/// Implements the SPI protocol of the real device: the register address is the low 7 bits
/// of the command byte with bit 7 added back, reads auto-increment, writes go to one register.
pub struct FakeBme280 {
    regs: [u8; 256],
    frames: Vec<(u8, u8), 32>,
    transactions: usize,
    busy_status_reads: u8,
    fail: bool,
}

impl FakeBme280 {
    pub fn new() -> Self {
        let mut fake = FakeBme280 {
            regs: [0u8; 256],
            frames: Vec::new(),
            transactions: 0,
            busy_status_reads: 0,
            fail: false,
        };
        fake.regs[0xD0] = 0x60;
        fake.with_calibration(&REFERENCE_CALIBRATION);
        fake.with_data(&REFERENCE_SAMPLE);
        fake
    }

    pub fn with_calibration(&mut self, calibration: &[u8; 32]) {
        self.regs[0x88..0x88 + 24].copy_from_slice(&calibration[..24]);
        self.regs[0xA1] = calibration[24];
        self.regs[0xE1..0xE1 + 7].copy_from_slice(&calibration[25..]);
    }

    pub fn with_data(&mut self, data: &[u8; 8]) {
        self.regs[0xF7..0xF7 + 8].copy_from_slice(data);
    }

    pub fn with_chip_id(&mut self, id: u8) {
        self.regs[0xD0] = id;
    }

    /// The next `reads` reads of STATUS report a running conversion and NVM copy.
    pub fn with_busy_status(&mut self, reads: u8) {
        self.busy_status_reads = reads;
    }

    /// Every transaction fails from now on.
    pub fn failing(&mut self) {
        self.fail = true;
    }

    pub fn register(&self, address: u8) -> u8 {
        self.regs[address as usize]
    }

    /// Write frames exactly as they appeared on the wire, `(command byte, value)`.
    pub fn write_frames(&self) -> &[(u8, u8)] {
        &self.frames
    }

    pub fn transactions(&self) -> usize {
        self.transactions
    }

    fn read_register(&mut self, address: u8) -> u8 {
        if address == 0xF3 && self.busy_status_reads > 0 {
            self.busy_status_reads -= 1;
            return 0b0000_1001;
        }
        self.regs[address as usize]
    }

    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), FakeSpiError> {
        self.transactions += 1;
        if self.fail {
            return Err(FakeSpiError);
        }

        let command = buf[0];
        let address = (command & 0x7F) | 0x80;

        if command & 0x80 != 0 {
            buf[0] = 0xFF;
            for (i, b) in buf[1..].iter_mut().enumerate() {
                *b = self.read_register(address.wrapping_add(i as u8));
            }
        } else {
            assert_eq!(2, buf.len(), "write frames are two bytes long");
            let value = buf[1];
            self.frames.push((command, value)).unwrap();

            if address == 0xE0 {
                if value == 0xB6 {
                    self.regs[0xF2] = 0;
                    self.regs[0xF4] = 0;
                    self.regs[0xF5] = 0;
                }
            } else {
                self.regs[address as usize] = value;
            }
        }

        Ok(())
    }
}

impl ErrorType for FakeBme280 {
    type Error = FakeSpiError;
}

impl SpiDevice for FakeBme280 {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::TransferInPlace(buf) => self.exchange(buf)?,
                _ => panic!("the BME280 driver only issues in-place transfers"),
            }
        }

        Ok(())
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::spi::SpiDevice for FakeBme280 {
    async fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        SpiDevice::transaction(self, operations)
    }
}

/// Delay that returns immediately and sums up the requested time.
pub struct FakeDelay {
    pub total_ns: u64,
}

impl FakeDelay {
    pub fn new() -> Self {
        FakeDelay { total_ns: 0 }
    }
}

impl embedded_hal::delay::DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}
