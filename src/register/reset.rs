//! ### RESET - Soft reset (`0xE0`, 1 byte, Write-only)
//!
//! Writing `0xB6` runs the complete power-on-reset procedure. Any other value has no effect.
//! Reads always return `0x00`.
//!
//! See also: [`Bme280::soft_reset()`](crate::Bme280::soft_reset)
#![doc(alias = "RESET")]
use crate::register::{Reg, Writable};

/// Marker type for RESET (0xE0) register
pub struct Reset;
impl Reg for Reset { const ADDR: u8 = 0xE0; }

/// The payload for the RESET (0xE0) register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetCommand {
    /// Triggers a power-on reset. All user settings return to their defaults.
    SoftReset,
}

impl From<ResetCommand> for u8 {
    fn from(cmd: ResetCommand) -> Self {
        match cmd {
            ResetCommand::SoftReset => 0xB6,
        }
    }
}

impl Writable for Reset {
    type In = ResetCommand;
    fn encode(v: &Self::In) -> u8 {
        (*v).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_encode() {
        assert_eq!(0xB6, Reset::encode(&ResetCommand::SoftReset));
    }
}
