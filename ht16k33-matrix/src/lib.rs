#![cfg_attr(not(test), no_std)]

pub mod ht16k33;
pub mod i2c_device;
pub mod matrix8x8;
