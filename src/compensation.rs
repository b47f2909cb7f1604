//! Compensation formulas (datasheet section 8.1, double precision variant).
//!
//! Pressure and humidity depend on the temperature of the same measurement cycle through
//! [`FineTemperature`], which only [`CalibrationData::compensate_temperature`] can produce.

use crate::calibration::CalibrationData;
use crate::register::data::RawSample;

/// Fine resolution temperature (`t_fine`) of one measurement cycle.
///
/// Carries the temperature dependency into the pressure and humidity formulas. Obtain a
/// fresh value for every sample; it has no meaning outside the cycle it was computed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FineTemperature(i32);

impl FineTemperature {
    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Holds compensated temperature, pressure and humidity.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Degrees Celsius
    pub temperature: f64,
    /// Hectopascal
    pub pressure: f64,
    /// Percent relative humidity, within 0..=100
    pub humidity: f64,
}

impl CalibrationData {
    /// Compensates a full raw sample, temperature first.
    pub fn compensate(&self, raw: &RawSample) -> Measurement {
        let (temperature, t_fine) = self.compensate_temperature(raw.temperature());

        Measurement {
            temperature,
            pressure: self.compensate_pressure(raw.pressure(), t_fine),
            humidity: self.compensate_humidity(raw.humidity(), t_fine),
        }
    }

    /// Returns the temperature in °C together with the fine temperature of this cycle.
    pub fn compensate_temperature(&self, adc_t: u32) -> (f64, FineTemperature) {
        let adc_t = adc_t as f64;
        let t1 = self.t1 as f64;

        let var1 = (adc_t / 16384.0 - t1 / 1024.0) * self.t2 as f64;
        let delta = adc_t / 131072.0 - t1 / 8192.0;
        let var2 = delta * delta * self.t3 as f64;

        let t_fine = var1 + var2;
        (t_fine / 5120.0, FineTemperature(t_fine as i32))
    }

    /// Returns the pressure in hPa.
    ///
    /// Returns `0.0` when the calibration makes the formula divide by zero.
    pub fn compensate_pressure(&self, adc_p: u32, t_fine: FineTemperature) -> f64 {
        let mut var1 = t_fine.0 as f64 / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * self.p6 as f64 / 32768.0;
        var2 += var1 * self.p5 as f64 * 2.0;
        var2 = var2 / 4.0 + self.p4 as f64 * 65536.0;
        var1 = (self.p3 as f64 * var1 * var1 / 524288.0 + self.p2 as f64 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * self.p1 as f64;

        if var1 == 0.0 {
            return 0.0;
        }

        let mut pressure = 1048576.0 - adc_p as f64;
        pressure = (pressure - var2 / 4096.0) * 6250.0 / var1;
        var1 = self.p9 as f64 * pressure * pressure / 2147483648.0;
        var2 = pressure * self.p8 as f64 / 32768.0;
        pressure += (var1 + var2 + self.p7 as f64) / 16.0;

        // Pa
        pressure / 100.0
    }

    /// Returns the relative humidity in %, clamped to 0..=100.
    pub fn compensate_humidity(&self, adc_h: u16, t_fine: FineTemperature) -> f64 {
        let var_h = t_fine.0 as f64 - 76800.0;
        let var_h = (adc_h as f64 - (self.h4 as f64 * 64.0 + self.h5 as f64 / 16384.0 * var_h))
            * (self.h2 as f64 / 65536.0
                * (1.0
                    + self.h6 as f64 / 67108864.0
                        * var_h
                        * (1.0 + self.h3 as f64 / 67108864.0 * var_h)));
        let var_h = var_h * (1.0 - self.h1 as f64 * var_h / 524288.0);

        var_h.clamp(0.0, 100.0)
    }
}

#[cfg(feature = "uom")]
pub use self::units::UnitMeasurement;

#[cfg(feature = "uom")]
mod units {
    use super::Measurement;
    use uom::si::f64::{Pressure, Ratio, ThermodynamicTemperature};
    use uom::si::pressure::hectopascal;
    use uom::si::ratio::percent;
    use uom::si::thermodynamic_temperature::degree_celsius;

    /// [`Measurement`] expressed as `uom` quantities.
    #[derive(Copy, Clone, Debug)]
    pub struct UnitMeasurement {
        pub temperature: ThermodynamicTemperature,
        pub pressure: Pressure,
        pub humidity: Ratio,
    }

    impl Measurement {
        pub fn into_uom(self) -> UnitMeasurement {
            UnitMeasurement {
                temperature: ThermodynamicTemperature::new::<degree_celsius>(self.temperature),
                pressure: Pressure::new::<hectopascal>(self.pressure),
                humidity: Ratio::new::<percent>(self.humidity),
            }
        }
    }
}
