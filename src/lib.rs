//! Driver for Seesaw I2C co-processor chips.
//!
//! Seesaw chips expose GPIO, ADC and status functionality behind a
//! two-level, register-addressed command protocol: every transaction selects
//! a functional module and a function within it, and every multi-byte value
//! is a packed big-endian integer.  This crate translates pin-mode
//! configuration, digital writes, analog reads and hardware identification
//! into correctly framed transactions over any
//! [`embedded_hal::i2c::I2c`] bus, with the protocol's mandatory settle
//! delays driven through [`embedded_hal::delay::DelayNs`].
//!
//! Supported chip families (resolved automatically from the reported chip
//! id): SAMD09, ATtiny8xx and ATtiny16xx based boards.
//!
//! # Example
//!
//! ```ignore
//! use seesaw_i2c::{PinMode, Seesaw};
//! # let (i2c, delay) = todo!();
//!
//! let mut dev = Seesaw::new(i2c, delay, 0x49);
//! let hw = dev.detect_hardware()?;
//! println!("chip 0x{:02x}, firmware {:?}", hw.chip_id, hw.build_date);
//!
//! dev.pin_mode(5, PinMode::Output)?;
//! dev.digital_write(5, true)?;
//! let reading = dev.analog_read_voltage(2)?;
//! ```
//!
//! With the `"async"` feature (on by default), [`SeesawAsync`] offers the
//! same operations over `embedded-hal-async`.
//!
//! The driver assumes a single logical caller per device and does no
//! locking; wrap the device in a mutex of your choice when sharing it.
#![cfg_attr(not(test), no_std)]

mod bits;
mod bus;
mod device;
mod error;
mod masks;
pub mod models;
pub mod regs;

#[cfg(feature = "async")]
mod device_async;

pub use bits::{BitField, FIELD_WIDTH};
pub use bus::{SettleDelays, Transport, MAX_PAYLOAD};
pub use device::{
    BuildDate, HardwareInfo, PinMode, Seesaw, ADC_FULL_SCALE, DEFAULT_ADC_REF_VOLTAGE,
};
pub use error::{Error, SchemaError};
pub use masks::{FieldSchema, NamedBitField, OPTIONS, OPTIONS_KEYS};
pub use models::{AdcAddressing, ChipModel, DuplicateChipId, ModelRegistry, SUPPORTED_CHIPS};

#[cfg(feature = "async")]
pub use device_async::{SeesawAsync, TransportAsync};
