//! Async variant of the driver on top of `embedded-hal-async`.
//!
//! Uses the same register catalog, frame layout, configuration and compensation as the
//! blocking [`Bme280`](crate::Bme280); only the transport and the delays are awaited.

use crate::bme280::STATUS_POLL_LIMIT;
use crate::bus::{read_frame, write_frame, Spi, MAX_BURST_LEN};
use crate::calibration::CalibrationData;
use crate::compensation::Measurement;
use crate::config::Configuration;
use crate::error::{Bme280Error, Bme280Result};
use crate::register::calibration::{CalibrationH1, CalibrationH2, CalibrationTp};
use crate::register::chip_id::{ChipId, BME280_CHIP_ID};
use crate::register::ctrl_meas::{CtrlMeas, PowerMode};
use crate::register::data::{Data, RawSample};
use crate::register::status::{Status, StatusFlags};
use crate::register::{Readable, Writable};
use core::future::Future;
use embedded_hal_async::delay::DelayNs;
use log::{debug, trace, warn};

/// Async counterpart of [`Transport`](crate::bus::Transport).
pub trait AsyncTransport {
    type Error;

    fn exchange(&mut self, buf: &mut [u8]) -> impl Future<Output = Result<(), Self::Error>>;
}

impl<SpiType> AsyncTransport for Spi<SpiType>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    type Error = <SpiType as embedded_hal_async::spi::ErrorType>::Error;

    async fn exchange(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.spi_mut().transfer_in_place(buf).await
    }
}

/// Register codec on top of an [`AsyncTransport`].
pub struct AsyncBus<T> {
    transport: T,
}

impl<T> AsyncBus<T>
where
    T: AsyncTransport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub async fn read_into(&mut self, address: u8, out: &mut [u8]) -> Bme280Result<(), T::Error> {
        let mut frame = read_frame(address, out.len())
            .ok_or(Bme280Error::InvalidBurstLength(out.len()))?;

        trace!("read 0x{:02x}, {} byte(s)", address, out.len());
        self.transport.exchange(&mut frame).await.map_err(Bme280Error::Bus)?;

        out.copy_from_slice(&frame[1..]);

        Ok(())
    }

    pub async fn write_register(&mut self, address: u8, value: u8) -> Bme280Result<(), T::Error> {
        let mut frame = write_frame(address, value);

        trace!("write 0x{:02x} <- 0x{:02x}", address, value);
        self.transport.exchange(&mut frame).await.map_err(Bme280Error::Bus)
    }

    pub async fn read<R: Readable>(&mut self) -> Bme280Result<R::Out, T::Error> {
        let mut buf = [0u8; MAX_BURST_LEN];
        let data = buf
            .get_mut(..R::N)
            .ok_or(Bme280Error::InvalidBurstLength(R::N))?;

        self.read_into(R::ADDR, data).await?;

        Ok(R::decode(data))
    }

    pub async fn write<W: Writable>(&mut self, v: &W::In) -> Bme280Result<(), T::Error> {
        self.write_register(W::ADDR, W::encode(v)).await
    }

    pub fn release(self) -> T {
        self.transport
    }
}

async fn load_calibration<T: AsyncTransport>(
    bus: &mut AsyncBus<T>,
) -> Bme280Result<CalibrationData, T::Error> {
    let tp = bus.read::<CalibrationTp>().await?;
    let h1 = bus.read::<CalibrationH1>().await?;
    let h2 = bus.read::<CalibrationH2>().await?;

    Ok(CalibrationData::from_blocks(&tp, h1, &h2))
}

async fn write_configuration<T: AsyncTransport>(
    bus: &mut AsyncBus<T>,
    config: &Configuration,
) -> Bme280Result<(), T::Error> {
    for (address, value) in config.register_writes() {
        bus.write_register(address, value).await?;
    }

    debug!("applied configuration {:?}", config);

    Ok(())
}

/// Async BME280 driver.
pub struct AsyncBme280<T> {
    bus: AsyncBus<T>,
    calibration_data: CalibrationData,
    max_measurement_time_us: u32,
}

impl<SpiType> AsyncBme280<Spi<SpiType>>
where
    SpiType: embedded_hal_async::spi::SpiDevice,
{
    /// Probes the device, applies `config` and loads the calibration data.
    ///
    /// ```rust,no_run
    /// # use embedded_hal_async::delay::DelayNs;
    /// # use embedded_hal_async::spi::SpiDevice;
    /// # use bme280_rs::Bme280Result;
    ///  use bme280_rs::asynch::AsyncBme280;
    ///  use bme280_rs::config::Configuration;
    /// # async fn demo<S: SpiDevice, D: DelayNs>(spi: S, mut delay: D) -> Bme280Result<(), S::Error> {
    ///
    ///  let mut device = AsyncBme280::new_spi(spi, Configuration::default(), &mut delay).await?;
    ///  let measurement = device.measure_forced(&mut delay).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new_spi<D: DelayNs>(
        spi: SpiType,
        config: Configuration,
        delay: &mut D,
    ) -> Bme280Result<Self, <Spi<SpiType> as AsyncTransport>::Error> {
        Self::new(Spi::new(spi), config, delay).await
    }
}

impl<T> AsyncBme280<T>
where
    T: AsyncTransport,
{
    async fn probe_ready<D: DelayNs>(
        bus: &mut AsyncBus<T>,
        delay: &mut D,
        attempts: u32,
    ) -> Bme280Result<(), T::Error> {
        for _ in 0..attempts {
            let id = bus.read::<ChipId>().await?;
            if id == BME280_CHIP_ID {
                return Ok(());
            }

            warn!("unexpected chip id 0x{:02x}", id);
            delay.delay_ms(1).await;
        }

        Err(Bme280Error::NotConnected)
    }

    pub async fn new<D: DelayNs>(
        transport: T,
        config: Configuration,
        delay: &mut D,
    ) -> Bme280Result<Self, T::Error> {
        let mut bus = AsyncBus::new(transport);

        Self::probe_ready(&mut bus, delay, 5).await?;

        write_configuration(&mut bus, &config).await?;
        let calibration_data = load_calibration(&mut bus).await?;

        Ok(AsyncBme280 {
            bus,
            calibration_data,
            max_measurement_time_us: config.max_measurement_time_us(),
        })
    }

    pub async fn apply_configuration(&mut self, config: &Configuration) -> Bme280Result<(), T::Error> {
        write_configuration(&mut self.bus, config).await?;

        self.max_measurement_time_us = config.max_measurement_time_us();

        Ok(())
    }

    pub async fn read<R: Readable>(&mut self) -> Bme280Result<R::Out, T::Error> {
        self.bus.read::<R>().await
    }

    pub async fn write<W: Writable>(&mut self, v: &W::In) -> Bme280Result<(), T::Error> {
        self.bus.write::<W>(v).await
    }

    pub async fn status(&mut self) -> Bme280Result<StatusFlags, T::Error> {
        self.bus.read::<Status>().await
    }

    pub async fn set_mode(&mut self, mode: PowerMode) -> Bme280Result<(), T::Error> {
        let mut ctrl_meas = self.bus.read::<CtrlMeas>().await?;
        ctrl_meas.mode = mode;
        self.bus.write::<CtrlMeas>(&ctrl_meas).await
    }

    pub async fn read_raw(&mut self) -> Bme280Result<RawSample, T::Error> {
        self.bus.read::<Data>().await
    }

    pub async fn read_measurement(&mut self) -> Bme280Result<Measurement, T::Error> {
        let sample = self.read_raw().await?;

        Ok(self.calibration_data.compensate(&sample))
    }

    async fn wait_while<D: DelayNs>(
        &mut self,
        delay: &mut D,
        busy: fn(&StatusFlags) -> bool,
    ) -> Bme280Result<(), T::Error> {
        for _ in 0..STATUS_POLL_LIMIT {
            if !busy(&self.status().await?) {
                return Ok(());
            }
            delay.delay_ms(1).await;
        }

        Err(Bme280Error::Timeout)
    }

    /// Runs one conversion in forced mode. Waits the maximum measurement time, then polls
    /// the `measuring` flag.
    pub async fn measure_forced<D: DelayNs>(&mut self, delay: &mut D) -> Bme280Result<Measurement, T::Error> {
        self.set_mode(PowerMode::Forced).await?;
        delay.delay_us(self.max_measurement_time_us).await;

        self.wait_while(delay, StatusFlags::measuring).await?;

        self.read_measurement().await
    }

    pub fn calibration(&self) -> &CalibrationData {
        &self.calibration_data
    }

    pub fn max_measurement_time_us(&self) -> u32 {
        self.max_measurement_time_us
    }

    pub fn release(self) -> T {
        self.bus.release()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compensation::tests::assert_close;
    use crate::register::ctrl_meas::Oversampling;
    use crate::testing::{FakeBme280, FakeDelay, FakeSpiError};

    #[tokio::test]
    async fn async_new_writes_configuration() {
        let device = AsyncBme280::new_spi(FakeBme280::new(), Configuration::default(), &mut FakeDelay::new())
            .await
            .unwrap();

        assert_eq!(46100, device.max_measurement_time_us());
        let fake = device.release().release();
        assert_eq!(&[(0x72, 0x01), (0x74, 0x57), (0x75, 0x10)], fake.write_frames());
        assert_eq!(7, fake.transactions());
    }

    #[tokio::test]
    async fn async_read_measurement() {
        let mut device = AsyncBme280::new_spi(FakeBme280::new(), Configuration::default(), &mut FakeDelay::new())
            .await
            .unwrap();

        let measurement = device.read_measurement().await.unwrap();

        assert_close(25.08, measurement.temperature, 1e-2);
        assert_close(1006.53, measurement.pressure, 1e-2);
        assert_close(55.00, measurement.humidity, 1e-2);
    }

    #[tokio::test]
    async fn async_wrong_chip_id() {
        let mut fake = FakeBme280::new();
        fake.with_chip_id(0x58);
        let mut delay = FakeDelay::new();

        let result = AsyncBme280::new_spi(fake, Configuration::default(), &mut delay).await;

        assert!(matches!(result, Err(Bme280Error::NotConnected)));
        assert_eq!(5_000_000, delay.total_ns);
    }

    #[tokio::test]
    async fn async_bus_error() {
        let mut fake = FakeBme280::new();
        fake.failing();

        let result = AsyncBme280::new_spi(fake, Configuration::default(), &mut FakeDelay::new()).await;

        assert!(matches!(result, Err(Bme280Error::Bus(FakeSpiError))));
    }

    #[tokio::test]
    async fn async_measure_forced() {
        let mut fake = FakeBme280::new();
        fake.with_busy_status(1);
        let config = Configuration::default()
            .power_mode(PowerMode::Sleep)
            .temperature_oversampling(Oversampling::X1)
            .pressure_oversampling(Oversampling::X1);
        let mut device = AsyncBme280::new_spi(fake, config, &mut FakeDelay::new()).await.unwrap();
        let mut delay = FakeDelay::new();

        let measurement = device.measure_forced(&mut delay).await.unwrap();

        assert_close(55.00, measurement.humidity, 1e-2);
        assert_eq!((9300 + 1000) * 1000, delay.total_ns);
        assert_eq!(PowerMode::Forced, device.read::<CtrlMeas>().await.unwrap().mode);
    }

    #[tokio::test]
    async fn async_measure_forced_times_out() {
        let mut fake = FakeBme280::new();
        fake.with_busy_status(u8::MAX);
        let mut device = AsyncBme280::new_spi(fake, Configuration::default(), &mut FakeDelay::new()).await.unwrap();
        let mut delay = FakeDelay::new();

        let result = device.measure_forced(&mut delay).await;

        assert!(matches!(result, Err(Bme280Error::Timeout)));
        assert_eq!((46100 + 32 * 1000) * 1000, delay.total_ns);
    }
}
