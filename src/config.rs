use crate::bme280::calculate_maximum_measurement_time;
use crate::register::config::{Config, ConfigFields, IIRFilterCoefficient, SpiWires, StandbyTime};
use crate::register::ctrl_hum::CtrlHum;
use crate::register::ctrl_meas::{CtrlMeas, CtrlMeasFields, Oversampling, PowerMode};
use crate::register::{Reg, Writable};

/// Measurement settings written to CTRL_HUM, CTRL_MEAS and CONFIG.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub(crate) temperature_oversampling: Oversampling,
    pub(crate) pressure_oversampling: Oversampling,
    pub(crate) humidity_oversampling: Oversampling,
    pub(crate) mode: PowerMode,
    pub(crate) standby_time: StandbyTime,
    pub(crate) iir_filter_coefficient: IIRFilterCoefficient,
    pub(crate) spi_wires: SpiWires,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            temperature_oversampling: Oversampling::X2,
            pressure_oversampling: Oversampling::X16,
            humidity_oversampling: Oversampling::X1,
            mode: PowerMode::Normal,
            standby_time: StandbyTime::Ms0_5,
            iir_filter_coefficient: IIRFilterCoefficient::Coef16,
            spi_wires: SpiWires::FourWire,
        }
    }
}

impl Configuration {
    pub fn temperature_oversampling(mut self, temperature_oversampling: Oversampling) -> Self {
        self.temperature_oversampling = temperature_oversampling;

        self
    }

    pub fn pressure_oversampling(mut self, pressure_oversampling: Oversampling) -> Self {
        self.pressure_oversampling = pressure_oversampling;

        self
    }

    /// Sets the humidity oversampling.
    /// The value only takes effect together with the CTRL_MEAS write that follows it, which
    /// [`Bme280::apply_configuration`](crate::Bme280::apply_configuration) takes care of.
    pub fn humidity_oversampling(mut self, humidity_oversampling: Oversampling) -> Self {
        self.humidity_oversampling = humidity_oversampling;

        self
    }

    pub fn power_mode(mut self, power_mode: PowerMode) -> Self {
        self.mode = power_mode;

        self
    }

    /// Sets the inactive period between two measurements. Only used in [`PowerMode::Normal`].
    pub fn standby_time(mut self, standby_time: StandbyTime) -> Self {
        self.standby_time = standby_time;

        self
    }

    pub fn iir_filter_coefficient(mut self, filter_coefficient: IIRFilterCoefficient) -> Self {
        self.iir_filter_coefficient = filter_coefficient;

        self
    }

    pub fn spi_wires(mut self, spi_wires: SpiWires) -> Self {
        self.spi_wires = spi_wires;

        self
    }

    pub(crate) fn ctrl_meas(&self) -> CtrlMeasFields {
        CtrlMeasFields {
            osrs_t: self.temperature_oversampling,
            osrs_p: self.pressure_oversampling,
            mode: self.mode,
        }
    }

    pub(crate) fn config(&self) -> ConfigFields {
        ConfigFields {
            standby_time: self.standby_time,
            iir_filter: self.iir_filter_coefficient,
            spi_wires: self.spi_wires,
        }
    }

    /// `(address, value)` pairs in write order. CTRL_HUM comes first, it is latched by the
    /// CTRL_MEAS write.
    pub(crate) fn register_writes(&self) -> [(u8, u8); 3] {
        [
            (CtrlHum::ADDR, CtrlHum::encode(&self.humidity_oversampling)),
            (CtrlMeas::ADDR, CtrlMeas::encode(&self.ctrl_meas())),
            (Config::ADDR, Config::encode(&self.config())),
        ]
    }

    /// Worst case conversion time in microseconds for these oversampling settings.
    pub fn max_measurement_time_us(&self) -> u32 {
        calculate_maximum_measurement_time(
            self.temperature_oversampling,
            self.pressure_oversampling,
            self.humidity_oversampling,
        )
    }

    /// Period between two samples in normal mode (datasheet section 9.2): measurement time
    /// plus standby time.
    pub fn normal_mode_period_us(&self) -> u32 {
        self.max_measurement_time_us() + self.standby_time.micros()
    }

    /// Recommended settings from section 3.5 of the datasheet.
    pub fn from_preset(p: Preset) -> Self {
        match p {
            Preset::WeatherMonitoring => Configuration::default()
                .power_mode(PowerMode::Forced)
                .temperature_oversampling(Oversampling::X1)
                .pressure_oversampling(Oversampling::X1)
                .humidity_oversampling(Oversampling::X1)
                .iir_filter_coefficient(IIRFilterCoefficient::Off),
            Preset::HumiditySensing => Configuration::default()
                .power_mode(PowerMode::Forced)
                .temperature_oversampling(Oversampling::X1)
                .pressure_oversampling(Oversampling::Skipped)
                .humidity_oversampling(Oversampling::X1)
                .iir_filter_coefficient(IIRFilterCoefficient::Off),
            Preset::IndoorNavigation => Configuration::default(),
            Preset::Gaming => Configuration::default()
                .temperature_oversampling(Oversampling::X1)
                .pressure_oversampling(Oversampling::X4)
                .humidity_oversampling(Oversampling::Skipped),
        }
    }
}

/// Use cases from section 3.5 of the datasheet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Preset {
    /// Forced mode, x1 oversampling on all channels, filter off. Intended for one sample per minute.
    WeatherMonitoring,
    /// Forced mode, pressure skipped, filter off.
    HumiditySensing,
    /// Normal mode with 0.5 ms standby, pressure x16, temperature x2, humidity x1, filter 16.
    IndoorNavigation,
    /// Normal mode with 0.5 ms standby, pressure x4, temperature x1, humidity skipped, filter 16.
    Gaming,
}
