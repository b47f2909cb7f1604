//! Register protocol over a full-duplex byte transport.
//!
//! Every transaction starts with a command byte: the low 7 bits carry the register address,
//! bit 7 selects the direction (1 = read, 0 = write).
//!
//! - A burst read of `n` bytes sends `n + 1` bytes (the command byte followed by filler) and
//!   keeps the last `n` bytes of the reply. The first reply byte is clocked out while the
//!   device is still receiving the command and carries no data.
//! - A write sends exactly two bytes, the command byte and the new value.

use crate::error::{Bme280Error, Bme280Result};
use crate::register::{Readable, Writable};
use embedded_hal::spi::SpiDevice;
use heapless::Vec;
use log::trace;

/// The longest burst the codec frames. Covers the largest register block (calibration, 24 bytes).
pub const MAX_BURST_LEN: usize = 32;

pub(crate) const MAX_FRAME_LEN: usize = MAX_BURST_LEN + 1;

const READ_BIT: u8 = 0b1000_0000;
const ADDRESS_MASK: u8 = 0b0111_1111;

/// A full-duplex transport: clocks `buf` out and overwrites it with the bytes clocked in.
///
/// The transport owns chip select, clock configuration and any retry policy. For the BME280
/// the SPI bus must run in mode 3 (CPOL = 1, CPHA = 1) at up to 10 MHz. 1 MHz is a safe choice.
pub trait Transport {
    type Error;

    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).exchange(buf)
    }
}

/// [`Transport`] over an `embedded-hal` [`SpiDevice`].
pub struct Spi<SpiType> {
    spi: SpiType,
}

impl<SpiType> Spi<SpiType> {
    pub fn new(spi: SpiType) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SpiType {
        self.spi
    }

    #[cfg(feature = "async")]
    pub(crate) fn spi_mut(&mut self) -> &mut SpiType {
        &mut self.spi
    }
}

impl<SpiType> Transport for Spi<SpiType>
where
    SpiType: SpiDevice,
{
    type Error = SpiType::Error;

    fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.transfer_in_place(buf)
    }
}

/// Builds the request for a burst read of `count` bytes starting at `address`.
///
/// Returns [`None`] when `count` is 0 or larger than [`MAX_BURST_LEN`].
pub(crate) fn read_frame(address: u8, count: usize) -> Option<Vec<u8, MAX_FRAME_LEN>> {
    if count == 0 || count > MAX_BURST_LEN {
        return None;
    }

    let mut frame: Vec<u8, MAX_FRAME_LEN> = Vec::new();
    frame.resize(count + 1, 0).ok()?;
    frame[0] = (address & ADDRESS_MASK) | READ_BIT;

    Some(frame)
}

/// Builds the request writing `value` to `address`.
pub(crate) fn write_frame(address: u8, value: u8) -> [u8; 2] {
    [address & ADDRESS_MASK, value]
}

/// Register codec on top of a [`Transport`].
pub struct Bus<T> {
    transport: T,
}

impl<T> Bus<T>
where
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Burst reads `out.len()` consecutive registers starting at `address` into `out`.
    pub fn read_into(&mut self, address: u8, out: &mut [u8]) -> Bme280Result<(), T::Error> {
        let mut frame = read_frame(address, out.len())
            .ok_or(Bme280Error::InvalidBurstLength(out.len()))?;

        trace!("read 0x{:02x}, {} byte(s)", address, out.len());
        self.transport.exchange(&mut frame).map_err(Bme280Error::Bus)?;

        out.copy_from_slice(&frame[1..]);

        Ok(())
    }

    /// Writes `value` to the register at `address`.
    pub fn write_register(&mut self, address: u8, value: u8) -> Bme280Result<(), T::Error> {
        let mut frame = write_frame(address, value);

        trace!("write 0x{:02x} <- 0x{:02x}", address, value);
        self.transport.exchange(&mut frame).map_err(Bme280Error::Bus)
    }

    /// Reads and decodes a register using a typed marker from [`crate::register`].
    pub fn read<R: Readable>(&mut self) -> Bme280Result<R::Out, T::Error> {
        let mut buf = [0u8; MAX_BURST_LEN];
        let data = buf
            .get_mut(..R::N)
            .ok_or(Bme280Error::InvalidBurstLength(R::N))?;

        self.read_into(R::ADDR, data)?;

        Ok(R::decode(data))
    }

    /// Encodes and writes a register using a typed marker from [`crate::register`].
    pub fn write<W: Writable>(&mut self, v: &W::In) -> Bme280Result<(), T::Error> {
        self.write_register(W::ADDR, W::encode(v))
    }

    pub fn release(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::ctrl_meas::{CtrlMeas, CtrlMeasFields, Oversampling, PowerMode};
    use crate::register::data::Data;

    /// Records the last request and answers with a fixed byte pattern.
    struct RecordingTransport {
        sent: Vec<u8, MAX_FRAME_LEN>,
        exchanges: usize,
        fail: bool,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self { sent: Vec::new(), exchanges: 0, fail: false }
        }

        fn reply_byte(i: usize) -> u8 {
            0xA0u8.wrapping_add(i as u8)
        }
    }

    impl Transport for RecordingTransport {
        type Error = &'static str;

        fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
            self.exchanges += 1;
            if self.fail {
                return Err("bus fault");
            }

            self.sent.clear();
            self.sent.extend_from_slice(buf).unwrap();
            for (i, b) in buf.iter_mut().enumerate() {
                *b = Self::reply_byte(i);
            }

            Ok(())
        }
    }

    #[test]
    fn read_frame_layout_for_every_address_and_length() {
        for address in 0..=127u8 {
            for count in 1..=MAX_BURST_LEN {
                let frame = read_frame(address, count).unwrap();

                assert_eq!(count + 1, frame.len());
                assert_eq!(0x80, frame[0] & 0x80);
                assert_eq!(address & 0x7F, frame[0] & 0x7F);
                assert!(frame[1..].iter().all(|b| *b == 0));
            }
        }
    }

    #[test]
    fn read_frame_masks_high_register_addresses() {
        assert_eq!(0xF7, read_frame(0xF7, 8).unwrap()[0]);
        assert_eq!(0x88, read_frame(0x88, 24).unwrap()[0]);
        assert_eq!(0x80, read_frame(0x00, 1).unwrap()[0]);
    }

    #[test]
    fn read_frame_rejects_invalid_lengths() {
        assert!(read_frame(0x10, 0).is_none());
        assert!(read_frame(0x10, MAX_BURST_LEN + 1).is_none());
    }

    #[test]
    fn write_frame_layout() {
        assert_eq!([0x72, 0x05], write_frame(0xF2, 0x05));
        assert_eq!([0x74, 0x57], write_frame(0xF4, 0x57));
        assert_eq!([0x60, 0xB6], write_frame(0xE0, 0xB6));
        assert_eq!([0x7F, 0x00], write_frame(0x7F, 0x00));
    }

    #[test]
    fn read_into_returns_the_reply_without_the_command_echo() {
        let mut bus = Bus::new(RecordingTransport::new());
        let mut out = [0u8; 5];

        bus.read_into(0x42, &mut out).unwrap();

        assert_eq!([0xC2, 0, 0, 0, 0, 0], bus.transport.sent.as_slice());
        assert_eq!([0xA1, 0xA2, 0xA3, 0xA4, 0xA5], out);
    }

    #[test]
    fn read_into_single_byte() {
        let mut bus = Bus::new(RecordingTransport::new());
        let mut out = [0u8; 1];

        bus.read_into(0xD0, &mut out).unwrap();

        assert_eq!([0xD0, 0], bus.transport.sent.as_slice());
        assert_eq!([0xA1], out);
    }

    #[test]
    fn read_into_with_invalid_length_never_touches_the_transport() {
        let mut bus = Bus::new(RecordingTransport::new());

        let result = bus.read_into(0x42, &mut []);
        assert_eq!(Err(Bme280Error::InvalidBurstLength(0)), result);

        let mut too_long = [0u8; MAX_BURST_LEN + 1];
        let result = bus.read_into(0x42, &mut too_long);
        assert_eq!(Err(Bme280Error::InvalidBurstLength(MAX_BURST_LEN + 1)), result);

        assert_eq!(0, bus.transport.exchanges);
    }

    #[test]
    fn write_register_sends_two_bytes() {
        let mut bus = Bus::new(RecordingTransport::new());

        bus.write_register(0xF5, 0x10).unwrap();

        assert_eq!([0x75, 0x10], bus.transport.sent.as_slice());
    }

    #[test]
    fn typed_write_encodes_the_payload() {
        let mut bus = Bus::new(RecordingTransport::new());

        bus.write::<CtrlMeas>(&CtrlMeasFields {
            osrs_t: Oversampling::X2,
            osrs_p: Oversampling::X16,
            mode: PowerMode::Normal,
        })
        .unwrap();

        assert_eq!([0x74, 0x57], bus.transport.sent.as_slice());
    }

    #[test]
    fn typed_read_uses_marker_address_and_length() {
        let mut bus = Bus::new(RecordingTransport::new());

        let sample = bus.read::<Data>().unwrap();

        assert_eq!(9, bus.transport.sent.len());
        assert_eq!(0xF7, bus.transport.sent[0]);
        // reply bytes 1..=8 are 0xA1..=0xA8
        assert_eq!(0xA1A2A, sample.pressure());
        assert_eq!(0xA4A5A, sample.temperature());
        assert_eq!(0xA7A8, sample.humidity());
    }

    #[test]
    fn transport_errors_are_propagated() {
        let mut transport = RecordingTransport::new();
        transport.fail = true;
        let mut bus = Bus::new(transport);

        assert_eq!(Err(Bme280Error::Bus("bus fault")), bus.write_register(0xF4, 0));

        let mut out = [0u8; 2];
        assert_eq!(Err(Bme280Error::Bus("bus fault")), bus.read_into(0xF7, &mut out));
        assert_eq!(2, bus.transport.exchanges);
    }
}
