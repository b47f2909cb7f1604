use crate::register::{Readable, Reg};

/// Marker struct for the STATUS (0xF3) register
///
/// - **Length:** 1 byte
/// - **Access:** Read-only
///
/// Used with [`Bme280::read::<Status>()`](crate::Bme280::read) or the convenience method
/// [`Bme280::status`](crate::Bme280::status).
pub struct Status;

impl Reg for Status { const ADDR: u8 = 0xF3; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags {
    measuring: bool,
    im_update: bool,
}

impl StatusFlags {
    /// Is a conversion running?
    ///
    /// Goes back to [`false`] once the results have been transferred to the data registers.
    pub fn measuring(&self) -> bool { self.measuring }

    /// Is the NVM data being copied to the image registers?
    ///
    /// Set after a power-on or soft reset. The calibration registers must not be read while
    /// this is [`true`].
    pub fn nvm_updating(&self) -> bool { self.im_update }
}

impl Readable for Status {
    type Out = StatusFlags;
    fn decode(b: &[u8]) -> Self::Out {
        StatusFlags {
            measuring: (b[0] & 0b0000_1000) != 0,
            im_update: (b[0] & 0b0000_0001) != 0,
        }
    }
}
