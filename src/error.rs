use core::fmt;

/// Errors caused by addressing a bit-field outside its schema.
///
/// These are caller mistakes and are surfaced immediately, never retried and
/// never papered over with a default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaError {
    /// Bit index outside the 32-bit field width.
    BitIndexOutOfRange(u8),
    /// Key not part of the field's key schema.
    UnknownKey(&'static str),
    /// Pin not part of the resolved chip model's ADC pin set.
    AdcPinUnsupported(u8),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::BitIndexOutOfRange(index) => {
                write!(f, "bit index {} out of range (0..32)", index)
            }
            SchemaError::UnknownKey(key) => write!(f, "unknown bit-field key {:?}", key),
            SchemaError::AdcPinUnsupported(pin) => {
                write!(f, "pin {} is not an ADC pin on this chip", pin)
            }
        }
    }
}

/// Errors returned by device operations.
///
/// `E` is the error type of the underlying I2C bus implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Error from the underlying I2C bus.
    ///
    /// Bus errors are propagated as-is.  They are never retried here because
    /// the register protocol is stateful: a failed data-read may follow a
    /// register-select write that already took effect.
    Bus(E),
    /// A bit, key or pin was addressed outside the relevant schema.
    Schema(SchemaError),
    /// Write payload longer than a frame can carry
    /// ([`MAX_PAYLOAD`][crate::MAX_PAYLOAD] bytes).  Carries the offending
    /// payload length.
    PayloadTooLong(usize),
    /// The operation needs resolved chip capabilities.
    ///
    /// Call [`detect_hardware`][crate::Seesaw::detect_hardware] first or
    /// construct the device with an explicit model.
    NotDetected,
    /// The reported chip id is not present in the model registry.
    UnknownChip(u8),
}

impl<E> From<SchemaError> for Error<E> {
    fn from(e: SchemaError) -> Self {
        Error::Schema(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "i2c bus error: {:?}", e),
            Error::Schema(e) => write!(f, "{}", e),
            Error::PayloadTooLong(len) => write!(
                f,
                "payload of {} bytes does not fit a frame (max {})",
                len,
                crate::bus::MAX_PAYLOAD
            ),
            Error::NotDetected => write!(
                f,
                "chip capabilities not resolved, call detect_hardware() or pass a model"
            ),
            Error::UnknownChip(id) => write!(f, "unknown chip id 0x{:02x}", id),
        }
    }
}
