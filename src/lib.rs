//! Platform-agnostic driver for the Bosch BME280 combined temperature, pressure and humidity
//! sensor over SPI, built on `embedded-hal` 1.0.
//!
//! The driver probes the chip, writes the measurement settings, reads the factory
//! calibration once and turns raw ADC codes into °C, hPa and %RH.
//!
//! ```rust,no_run
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::spi::SpiDevice;
//! use bme280_rs::{Bme280, Bme280Result};
//! use bme280_rs::config::{Configuration, Preset};
//! # fn demo<S: SpiDevice, D: DelayNs>(spi: S, mut delay: D) -> Bme280Result<(), S::Error> {
//!
//! let config = Configuration::from_preset(Preset::WeatherMonitoring);
//! let mut device = Bme280::new_spi(spi, config, &mut delay)?;
//!
//! let m = device.measure_forced(&mut delay)?;
//! log::info!("{} °C, {} hPa, {} %", m.temperature, m.pressure, m.humidity);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//! - `async`: [`asynch::AsyncBme280`] on top of `embedded-hal-async`.
//! - `defmt`: `defmt::Format` for the public data types.
//! - `uom`: [`Measurement::into_uom`] returning typed quantities.

#![no_std]

mod bme280;
pub mod bus;
mod calibration;
mod compensation;
pub mod config;
pub mod error;
pub mod register;

#[cfg(feature = "async")]
pub mod asynch;

#[cfg(test)]
mod testing;

pub use crate::bme280::{Bme280, Bme280Spi};
pub use crate::calibration::CalibrationData;
pub use crate::compensation::{FineTemperature, Measurement};
pub use crate::error::{Bme280Error, Bme280Result};
pub use crate::register::config::{IIRFilterCoefficient, SpiWires, StandbyTime};
pub use crate::register::ctrl_meas::{Oversampling, PowerMode};
pub use crate::register::data::RawSample;

#[cfg(feature = "uom")]
pub use crate::compensation::UnitMeasurement;
