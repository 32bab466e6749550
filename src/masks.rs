use crate::bits::BitField;
use crate::error::SchemaError;

/// Key order of the STATUS options register: one capability bit per on-chip
/// module, LSB first.
pub const OPTIONS_KEYS: &[&str] = &[
    "STATUS",
    "GPIO",
    "SERCOM0",
    "SERCOM1",
    "SERCOM2",
    "SERCOM3",
    "SERCOM4",
    "SERCOM5",
    "TIMER",
    "ADC",
    "DAC",
    "INTERRUPT",
    "DAP",
    "EEPROM",
    "NEOPIXEL",
    "TOUCH",
    "KEYPAD",
    "ENCODER",
];

/// Schema for the options register read during hardware detection.
pub const OPTIONS: FieldSchema = FieldSchema::new(OPTIONS_KEYS);

/// A fixed, ordered set of bit names shared by any number of
/// [`NamedBitField`] instances.
///
/// The position of a key in the slice is the bit index it addresses.  Keys
/// must be distinct; a duplicate would shadow every later occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    keys: &'static [&'static str],
}

impl FieldSchema {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    /// A zero-initialized field bound to this schema.
    pub fn zeroed(&self) -> NamedBitField {
        NamedBitField::new(self.keys)
    }

    /// A field bound to this schema holding `value`.
    pub fn with_value(&self, value: u32) -> NamedBitField {
        let mut field = self.zeroed();
        field.set_value(value);
        field
    }
}

/// Key-addressed bit container.
///
/// Same packing and wire format as [`BitField`], but bits are addressed by
/// symbolic name so call sites stay self-documenting and a typo is an
/// explicit [`SchemaError::UnknownKey`] instead of a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedBitField {
    keys: &'static [&'static str],
    field: BitField,
}

impl NamedBitField {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self {
            keys,
            field: BitField::new(),
        }
    }

    pub fn keys(&self) -> &'static [&'static str] {
        self.keys
    }

    /// Set or clear the bit named `key`.  Chainable like [`BitField::set`].
    pub fn set(&mut self, key: &'static str, bit: bool) -> Result<&mut Self, SchemaError> {
        let index = self.index_of(key)?;
        self.field.set(index, bit)?;
        Ok(self)
    }

    /// Read the bit named `key`.
    pub fn read(&self, key: &'static str) -> Result<bool, SchemaError> {
        self.field.read(self.index_of(key)?)
    }

    /// Bulk-replace the packed value, e.g. when decoding a register read.
    pub fn set_value(&mut self, value: u32) {
        self.field.set_value(value);
    }

    pub fn value(&self) -> u32 {
        self.field.value()
    }

    /// Big-endian serialization of the packed value for transmission.
    pub fn to_be_bytes(&self) -> [u8; 4] {
        self.field.to_be_bytes()
    }

    /// View of the field as `(key, bit)` pairs, derived from the current
    /// value on each call.
    pub fn bits(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, key)| (*key, self.field.value() & (1 << index) != 0))
    }

    fn index_of(&self, key: &'static str) -> Result<u8, SchemaError> {
        match self.keys.iter().position(|k| *k == key) {
            // a key past position 255 cannot address a field bit; the
            // reported index saturates
            Some(index) => {
                u8::try_from(index).map_err(|_| SchemaError::BitIndexOutOfRange(u8::MAX))
            }
            None => Err(SchemaError::UnknownKey(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEYS: &[&str] = &["RED", "GREEN", "BLUE"];

    #[test]
    fn set_then_read_by_key() {
        let mut field = FieldSchema::new(TEST_KEYS).zeroed();
        field.set("GREEN", true).unwrap();
        assert!(field.read("GREEN").unwrap());
        assert!(!field.read("RED").unwrap());
        assert!(!field.read("BLUE").unwrap());
        assert_eq!(field.value(), 0b010);
    }

    #[test]
    fn unknown_key_is_an_error() {
        let mut field = FieldSchema::new(TEST_KEYS).zeroed();
        assert_eq!(
            field.set("YELLOW", true).unwrap_err(),
            SchemaError::UnknownKey("YELLOW")
        );
        assert_eq!(
            field.read("YELLOW").unwrap_err(),
            SchemaError::UnknownKey("YELLOW")
        );
        // nothing changed
        assert_eq!(field.value(), 0);
    }

    #[test]
    fn value_reproduces_every_key_bit() {
        let mut field = OPTIONS.zeroed();
        let value = 0b10_1100_1010_0101_1001;
        field.set_value(value);
        for (index, key) in OPTIONS_KEYS.iter().copied().enumerate() {
            assert_eq!(
                field.read(key).unwrap(),
                value & (1 << index) != 0,
                "key {}",
                key
            );
        }
        assert_eq!(u32::from_be_bytes(field.to_be_bytes()), value);
    }

    #[test]
    fn view_matches_value() {
        let field = FieldSchema::new(TEST_KEYS).with_value(0b101);
        let view: std::vec::Vec<_> = field.bits().collect();
        assert_eq!(view, [("RED", true), ("GREEN", false), ("BLUE", true)]);
    }

    #[test]
    fn key_past_position_255_does_not_alias_a_low_bit() {
        let keys: std::vec::Vec<&'static str> = (0..=260)
            .map(|i| &*std::boxed::Box::leak(std::format!("K{}", i).into_boxed_str()))
            .collect();
        let keys: &'static [&'static str] =
            std::boxed::Box::leak(keys.into_boxed_slice());

        // position 260 would wrap to bit 4 as a u8
        let mut field = FieldSchema::new(keys).zeroed();
        assert_eq!(
            field.set("K260", true).unwrap_err(),
            SchemaError::BitIndexOutOfRange(u8::MAX)
        );
        assert_eq!(
            field.read("K260").unwrap_err(),
            SchemaError::BitIndexOutOfRange(u8::MAX)
        );
        assert_eq!(field.value(), 0);
        assert!(!field.read("K4").unwrap());
    }

    #[test]
    fn schema_mints_independent_instances() {
        let mut a = OPTIONS.zeroed();
        let b = OPTIONS.zeroed();
        a.set("ADC", true).unwrap();
        assert!(!b.read("ADC").unwrap());
        assert_eq!(a.keys(), b.keys());
    }
}
