//! Register catalog of the BME280.
//!
//! Every register (or fixed-size register block) is a zero-sized marker type implementing
//! [`Reg`] plus [`Readable`] and/or [`Writable`]. The marker carries the register address and
//! the burst length, and knows how to decode/encode the raw bytes.
//!
//! Addresses are the datasheet addresses. On SPI only the low 7 bits go on the wire, see
//! [`crate::bus`].

pub mod calibration;
pub mod chip_id;
pub mod config;
pub mod ctrl_hum;
pub mod ctrl_meas;
pub mod data;
pub mod reset;
pub mod status;

pub trait Reg { const ADDR: u8; }

pub trait Readable: Reg {
    type Out;
    const N: usize = 1;
    fn decode(b: &[u8]) -> Self::Out;
}

pub trait Writable: Reg {
    type In;
    fn encode(v: &Self::In) -> u8;
}
