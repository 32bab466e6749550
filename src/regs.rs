//! The seesaw two-level register map.
//!
//! Every transaction addresses a functional module (the register) and a
//! function within it (the sub-register).  The driver only operates on the
//! STATUS, GPIO and ADC modules; the remaining addresses are kept here so
//! raw [`Transport`][crate::Transport] access can reach them.

/// Functional modules of the chip (the first frame byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Module {
    Status = 0x00,
    Gpio = 0x01,
    Sercom0 = 0x02,
    Sercom1 = 0x03,
    Sercom2 = 0x04,
    Sercom3 = 0x05,
    Sercom4 = 0x06,
    Sercom5 = 0x07,
    Timer = 0x08,
    Adc = 0x09,
    Dac = 0x0a,
    Interrupt = 0x0b,
    Dap = 0x0c,
    Eeprom = 0x0d,
    Neopixel = 0x0e,
    Touch = 0x0f,
    Keypad = 0x10,
    Encoder = 0x11,
}

impl From<Module> for u8 {
    fn from(m: Module) -> u8 {
        m as u8
    }
}

/// STATUS module functions.
pub mod status {
    pub const HW_ID: u8 = 0x01;
    pub const VERSION: u8 = 0x02;
    pub const OPTIONS: u8 = 0x03;
    pub const SWRST: u8 = 0x7f;
    /// Sub-register the original firmware answers the chip id on.
    pub const HW_ID_CODE: u8 = 0x55;
    /// Sentinel payload that triggers a software reset.
    pub const SWRST_KEY: u8 = 0xff;
}

/// GPIO module functions.  The bulk registers pack one bit per pin.
pub mod gpio {
    pub const DIRSET_BULK: u8 = 0x02;
    pub const DIRCLR_BULK: u8 = 0x03;
    pub const BULK: u8 = 0x04;
    pub const BULK_SET: u8 = 0x05;
    pub const BULK_CLR: u8 = 0x06;
    pub const BULK_TOGGLE: u8 = 0x07;
    // interrupt flags are addressable but have no driver operation
    pub const INTENSET: u8 = 0x08;
    pub const INTENCLR: u8 = 0x09;
    pub const INTFLAG: u8 = 0x0a;
    pub const PULLENSET: u8 = 0x0b;
    pub const PULLENCLR: u8 = 0x0c;
}

/// TIMER module functions.
pub mod timer {
    pub const STATUS: u8 = 0x00;
    pub const PWM: u8 = 0x01;
    pub const FREQ: u8 = 0x02;
}

/// ADC module functions.
pub mod adc {
    pub const STATUS: u8 = 0x00;
    pub const INTEN: u8 = 0x02;
    pub const INTENCLR: u8 = 0x03;
    pub const WINMODE: u8 = 0x04;
    pub const WINTHRESH: u8 = 0x05;
    /// Base of the per-channel data registers.
    pub const CHANNEL_OFFSET: u8 = 0x07;
}

/// SERCOM module functions (same layout for all six instances).
pub mod sercom {
    pub const STATUS: u8 = 0x00;
    pub const INTEN: u8 = 0x02;
    pub const INTENCLR: u8 = 0x03;
    pub const BAUD: u8 = 0x04;
    pub const DATA: u8 = 0x05;
}

/// NEOPIXEL module functions.
pub mod neopixel {
    pub const STATUS: u8 = 0x00;
    pub const PIN: u8 = 0x01;
    pub const SPEED: u8 = 0x02;
    pub const BUF_LENGTH: u8 = 0x03;
    pub const BUF: u8 = 0x04;
    pub const SHOW: u8 = 0x05;
}

/// TOUCH module functions.
pub mod touch {
    pub const CHANNEL_OFFSET: u8 = 0x10;
}

/// EEPROM module functions.
pub mod eeprom {
    pub const I2C_ADDR: u8 = 0x3f;
}
