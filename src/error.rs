//! Errors that can occur when using the BME280 device.
//!
//! This module provides an error type that encapsulates all possible errors that can occur during communication with the BME280.
//! It is generic over the error type of the underlying transport.

/// This represents all possible errors that can occur when using the BME280 device.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bme280Error<BusError> {
    /// An error has occurred in the SPI driver (or whatever transport is in use)
    Bus(BusError),

    /// Unable to communicate with the BME280
    ///
    /// Could possibly indicate an error with pin configuration and/or wiring.
    NotConnected,

    /// A burst read of zero bytes, or of more bytes than fit in one frame, was requested.
    ///
    /// This is a bug in the calling code; the sensor was never addressed.
    InvalidBurstLength(usize),

    /// The device did not leave a busy state (NVM copy or conversion) in time.
    Timeout,
}

/// Type alias used to simplify return types throughout the driver
pub type Bme280Result<T, BusError> = Result<T, Bme280Error<BusError>>;
