use crate::error::SchemaError;

/// Width of a GPIO bulk register in bits.
pub const FIELD_WIDTH: u8 = 32;

/// Index-addressed 32-bit field, as packed into the chip's bulk registers.
///
/// One bit per physical pin.  Serializes big-endian, matching the wire format
/// of every multi-byte seesaw register.
///
/// ```
/// use seesaw_i2c::BitField;
///
/// let mut field = BitField::new();
/// field.set(5, true)?.set(9, true)?;
/// assert_eq!(field.value(), 0x220);
/// assert_eq!(field.to_be_bytes(), [0x00, 0x00, 0x02, 0x20]);
/// # Ok::<(), seesaw_i2c::SchemaError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitField {
    value: u32,
}

impl BitField {
    pub const fn new() -> Self {
        Self { value: 0 }
    }

    pub const fn with_value(value: u32) -> Self {
        Self { value }
    }

    /// Set or clear the bit at `index`.  Returns `self` again so calls can be
    /// chained with `?`.
    ///
    /// Indices `>= 32` fail with [`SchemaError::BitIndexOutOfRange`] instead
    /// of wrapping.
    pub fn set(&mut self, index: u8, bit: bool) -> Result<&mut Self, SchemaError> {
        let mask = Self::mask(index)?;
        if bit {
            self.value |= mask;
        } else {
            self.value &= !mask;
        }
        Ok(self)
    }

    /// Read the bit at `index` without mutating the field.
    pub fn read(&self, index: u8) -> Result<bool, SchemaError> {
        Ok(self.value & Self::mask(index)? != 0)
    }

    /// Bulk-replace the packed value, e.g. when decoding a register read.
    pub fn set_value(&mut self, value: u32) {
        self.value = value;
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Big-endian serialization for transmission.
    pub fn to_be_bytes(&self) -> [u8; 4] {
        self.value.to_be_bytes()
    }

    fn mask(index: u8) -> Result<u32, SchemaError> {
        if index < FIELD_WIDTH {
            Ok(1 << index)
        } else {
            Err(SchemaError::BitIndexOutOfRange(index))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_read() {
        let mut field = BitField::new();
        for index in 0..FIELD_WIDTH {
            field.set(index, true).unwrap();
            assert!(field.read(index).unwrap());
            field.set(index, false).unwrap();
            assert!(!field.read(index).unwrap());
        }
    }

    #[test]
    fn set_leaves_other_bits_alone() {
        let mut field = BitField::with_value(0xdead_beef);
        field.set(12, true).unwrap();
        for index in 0..FIELD_WIDTH {
            let expected = index == 12 || 0xdead_beefu32 & (1 << index) != 0;
            assert_eq!(field.read(index).unwrap(), expected, "bit {}", index);
        }
    }

    #[test]
    fn chaining() {
        let mut field = BitField::new();
        field.set(0, true).unwrap().set(31, true).unwrap();
        assert_eq!(field.value(), 0x8000_0001);
    }

    #[test]
    fn out_of_range_index() {
        let mut field = BitField::new();
        assert_eq!(
            field.set(32, true).unwrap_err(),
            SchemaError::BitIndexOutOfRange(32)
        );
        assert_eq!(
            field.read(200).unwrap_err(),
            SchemaError::BitIndexOutOfRange(200)
        );
        // failed set must not touch the value
        assert_eq!(field.value(), 0);
    }

    #[test]
    fn big_endian_bytes() {
        assert_eq!(
            BitField::with_value(0x0102_0304).to_be_bytes(),
            [0x01, 0x02, 0x03, 0x04]
        );

        let mut field = BitField::new();
        field.set_value(u32::from_be_bytes([0xa0, 0x00, 0x00, 0x01]));
        assert!(field.read(0).unwrap());
        assert!(field.read(31).unwrap());
        assert!(field.read(29).unwrap());
        assert!(!field.read(1).unwrap());
    }
}
