#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod bitbang;
mod driver;
mod error;
mod interface;
mod register;
mod utils;

pub use bitbang::{BitBangError, BitBangSsc};
pub use driver::Tle5012b;
pub use error::Error;
pub use interface::{DataDirection, SscInterface};
pub use register::{Command, Mod1Register, Mod2Register, RegisterSnapshot, SafetyWord};
pub use utils::{crc8, decode_signed_15, decode_signed_9};
