use crate::bus::{Bus, Spi, Transport};
use crate::calibration::CalibrationData;
use crate::compensation::Measurement;
use crate::config::Configuration;
use crate::error::{Bme280Error, Bme280Result};
use crate::register::chip_id::{ChipId, BME280_CHIP_ID};
use crate::register::ctrl_meas::{CtrlMeas, Oversampling, PowerMode};
use crate::register::data::{Data, RawSample};
use crate::register::reset::{Reset, ResetCommand};
use crate::register::status::{Status, StatusFlags};
use crate::register::{Readable, Writable};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use log::{debug, warn};

/// STATUS is polled at most this many times, 1 ms apart, before giving up with
/// [`Bme280Error::Timeout`].
pub(crate) const STATUS_POLL_LIMIT: u8 = 32;

/// Type alias for a BME280 communicating over SPI
pub type Bme280Spi<T> = Bme280<Spi<T>>;

/// Main BME280 driver struct
///
/// A value of this type always holds the calibration data of the device it talks to, so
/// every measurement it returns is compensated.
pub struct Bme280<T> {
    bus: Bus<T>,
    calibration_data: CalibrationData,
    max_measurement_time_us: u32,
}

impl<T> Bme280Spi<T>
where
    T: SpiDevice,
{
    /// Constructs a new BME280 driver instance with a given configuration that communicates over SPI
    ///
    /// The SPI device must be set up for mode 3 (CPOL = 1, CPHA = 1); 1 MHz is a safe clock.
    ///
    /// This function will:
    /// - Probe for a connected BME280 device.
    /// - Apply the given configuration
    /// - Load calibration coefficients from NVM
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use embedded_hal::delay::DelayNs;
    /// # use embedded_hal::spi::SpiDevice;
    /// # use bme280_rs::Bme280Result;
    ///  use bme280_rs::Bme280;
    ///  use bme280_rs::config::Configuration;
    /// # fn demo<S: SpiDevice, D: DelayNs>(spi: S, mut delay: D) -> Bme280Result<(), S::Error> {
    ///
    ///  let mut device = Bme280::new_spi(spi, Configuration::default(), &mut delay)?;
    ///  delay.delay_us(device.max_measurement_time_us());
    ///  let measurement = device.read_measurement()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new_spi<D: DelayNs>(
        spi: T,
        config: Configuration,
        delay: &mut D,
    ) -> Bme280Result<Self, <Spi<T> as Transport>::Error> {
        Self::new(Spi::new(spi), config, delay)
    }
}

impl<T> Bme280<T>
where
    T: Transport,
{
    /// Probes if the device is ready by reading ChipId up to `attempts` times with a 1 ms delay.
    ///
    /// Returns [`Bme280Error::NotConnected`] if the id never matches.
    fn probe_ready<D: DelayNs>(
        bus: &mut Bus<T>,
        delay: &mut D,
        attempts: u32,
    ) -> Bme280Result<(), T::Error> {
        for _ in 0..attempts {
            let id = bus.read::<ChipId>()?;
            if id == BME280_CHIP_ID {
                return Ok(());
            }

            warn!("unexpected chip id 0x{:02x}", id);
            delay.delay_ms(1);
        }

        Err(Bme280Error::NotConnected)
    }

    /// Creates a new instance of the BME280 driver over any [`Transport`].
    ///
    /// The configuration is applied before the calibration data is read. The first
    /// measurement is available [`max_measurement_time_us`](Self::max_measurement_time_us)
    /// after this returns; waiting for it is up to the caller.
    pub fn new<D: DelayNs>(
        transport: T,
        config: Configuration,
        delay: &mut D,
    ) -> Bme280Result<Self, T::Error> {
        let mut bus = Bus::new(transport);

        // The datasheet (Section 1, table 1) specifies 2ms start-up time
        Self::probe_ready(&mut bus, delay, 5)?;

        write_configuration(&mut bus, &config)?;
        let calibration_data = CalibrationData::load(&mut bus)?;

        Ok(Bme280 {
            bus,
            calibration_data,
            max_measurement_time_us: config.max_measurement_time_us(),
        })
    }

    /// Applies the given configuration by writing CTRL_HUM, CTRL_MEAS and CONFIG, in that order.
    ///
    /// The device needs [`max_measurement_time_us`](Self::max_measurement_time_us) before
    /// data measured with the new settings can be read.
    pub fn apply_configuration(&mut self, config: &Configuration) -> Bme280Result<(), T::Error> {
        write_configuration(&mut self.bus, config)?;

        self.max_measurement_time_us = config.max_measurement_time_us();

        Ok(())
    }

    /// Read a register (or fixed-size register block) using a **typed marker**.
    ///
    /// You pass a marker type from [`crate::register`] (e.g. `register::ctrl_meas::CtrlMeas`),
    /// and you get back its decoded value (`R::Out`).
    ///
    /// ```rust,no_run
    /// # use bme280_rs::{Bme280, Bme280Result};
    /// # use bme280_rs::bus::Transport;
    /// # fn demo<T: Transport>(mut device: Bme280<T>) -> Bme280Result<(), T::Error> {
    /// use bme280_rs::register::ctrl_meas::CtrlMeas;
    /// let fields = device.read::<CtrlMeas>()?;
    /// # Ok(()) }
    /// ```
    pub fn read<R: Readable>(&mut self) -> Bme280Result<R::Out, T::Error> {
        self.bus.read::<R>()
    }

    /// Write a register using a **typed marker**.
    ///
    /// This performs a **direct write**. Writing CTRL_HUM has no effect until CTRL_MEAS is
    /// written, and the cached measurement time is not updated; prefer
    /// [`apply_configuration`](Self::apply_configuration) for settings.
    pub fn write<W: Writable>(&mut self, v: &W::In) -> Bme280Result<(), T::Error> {
        self.bus.write::<W>(v)
    }

    /// Determines if the BME280 is connected by reading the ID (0xD0) register.
    pub fn is_connected(&mut self) -> Bme280Result<bool, T::Error> {
        let id = self.bus.read::<ChipId>()?;

        Ok(id == BME280_CHIP_ID)
    }

    /// Returns the flags of the STATUS (0xF3) register.
    pub fn status(&mut self) -> Bme280Result<StatusFlags, T::Error> {
        self.bus.read::<Status>()
    }

    fn wait_while<D: DelayNs>(
        &mut self,
        delay: &mut D,
        busy: fn(&StatusFlags) -> bool,
    ) -> Bme280Result<(), T::Error> {
        for _ in 0..STATUS_POLL_LIMIT {
            if !busy(&self.status()?) {
                return Ok(());
            }
            delay.delay_ms(1);
        }

        Err(Bme280Error::Timeout)
    }

    /// Triggers a soft reset and reloads the calibration data.
    ///
    /// **Note:** This resets the chip to factory defaults (sleep mode, all channels skipped),
    /// not to the configuration that was provided when constructing the driver.
    pub fn soft_reset<D: DelayNs>(&mut self, delay: &mut D) -> Bme280Result<(), T::Error> {
        self.bus.write::<Reset>(&ResetCommand::SoftReset)?;
        delay.delay_ms(2);

        // Calibration registers are invalid while the NVM is copied
        self.wait_while(delay, StatusFlags::nvm_updating)?;

        self.calibration_data = CalibrationData::load(&mut self.bus)?;
        self.max_measurement_time_us = calculate_maximum_measurement_time(
            Oversampling::Skipped,
            Oversampling::Skipped,
            Oversampling::Skipped,
        );
        debug!("soft reset done");

        Ok(())
    }

    /// Sets the power mode with a read-modify-write of CTRL_MEAS, keeping the oversampling.
    pub fn set_mode(&mut self, mode: PowerMode) -> Bme280Result<(), T::Error> {
        let mut ctrl_meas = self.bus.read::<CtrlMeas>()?;
        ctrl_meas.mode = mode;
        self.bus.write::<CtrlMeas>(&ctrl_meas)
    }

    /// Reads the current power mode from CTRL_MEAS.
    pub fn mode(&mut self) -> Bme280Result<PowerMode, T::Error> {
        Ok(self.bus.read::<CtrlMeas>()?.mode)
    }

    /// Reads the uncompensated ADC codes of the latest measurement with one burst read.
    pub fn read_raw(&mut self) -> Bme280Result<RawSample, T::Error> {
        self.bus.read::<Data>()
    }

    /// Reads the latest measurement and compensates it.
    ///
    /// In normal mode the data registers are refreshed every cycle; reading faster than
    /// that returns the same sample again.
    pub fn read_measurement(&mut self) -> Bme280Result<Measurement, T::Error> {
        let sample = self.read_raw()?;

        Ok(self.calibration_data.compensate(&sample))
    }

    /// Runs one conversion in forced mode and returns the compensated result.
    ///
    /// Waits the maximum measurement time, then polls the `measuring` flag.
    pub fn measure_forced<D: DelayNs>(&mut self, delay: &mut D) -> Bme280Result<Measurement, T::Error> {
        self.set_mode(PowerMode::Forced)?;
        delay.delay_us(self.max_measurement_time_us);

        self.wait_while(delay, StatusFlags::measuring)?;

        self.read_measurement()
    }

    /// The calibration data read from the device.
    pub fn calibration(&self) -> &CalibrationData {
        &self.calibration_data
    }

    /// Returns the maximum measurement time in microseconds for the active oversampling
    /// settings.
    ///
    /// See datasheet section 9.1 ("Measurement time"). In forced mode this is the time
    /// until data is ready, in normal mode it is added to the standby time.
    pub fn max_measurement_time_us(&self) -> u32 {
        self.max_measurement_time_us
    }

    /// Destroys the driver and returns the transport.
    pub fn release(self) -> T {
        self.bus.release()
    }
}

fn write_configuration<T: Transport>(
    bus: &mut Bus<T>,
    config: &Configuration,
) -> Bme280Result<(), T::Error> {
    for (address, value) in config.register_writes() {
        bus.write_register(address, value)?;
    }

    debug!("applied configuration {:?}", config);

    Ok(())
}

/// Calculates the maximum measurement time in microseconds
///
/// Datasheet section 9.1: 1.25 ms + 2.3 ms · T_osr + (2.3 ms · P_osr + 0.575 ms)
/// + (2.3 ms · H_osr + 0.575 ms). Skipped channels do not contribute.
pub(crate) fn calculate_maximum_measurement_time(
    temperature_oversampling: Oversampling,
    pressure_oversampling: Oversampling,
    humidity_oversampling: Oversampling,
) -> u32 {
    let channel = |osr: Oversampling, overhead: u32| match osr.samples() {
        0 => 0,
        samples => 2300 * samples + overhead,
    };

    1250
        + channel(temperature_oversampling, 0)
        + channel(pressure_oversampling, 575)
        + channel(humidity_oversampling, 575)
}
