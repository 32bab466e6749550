//! Static capability tables for the supported seesaw chip families.
use core::fmt;

/// How a chip family maps an ADC pin to its channel offset in the ADC
/// register block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcAddressing {
    /// The channel offset is the raw pin number (ATtiny firmware).
    ByPinNumber,
    /// The channel offset is the pin's index within the model's `adc_pins`
    /// table (SAMD09 firmware).
    ByChannelIndex,
}

/// Immutable pin/capability record for one chip family.
///
/// A family may span several silicon revisions with identical pin maps, so
/// `chip_ids` is a set.  A device resolves to exactly one model during
/// hardware detection.
#[derive(Debug, PartialEq, Eq)]
pub struct ChipModel {
    pub chip_ids: &'static [u8],
    pub adc_pins: &'static [u8],
    pub dac_pins: &'static [u8],
    pub touch_pins: &'static [u8],
    pub pwm_pins: &'static [u8],
    /// PWM resolution in bits.
    pub pwm_width: u8,
    pub adc_addressing: AdcAddressing,
}

impl ChipModel {
    /// Whether this model covers the given chip id.
    pub fn is(&self, chip_id: u8) -> bool {
        self.chip_ids.contains(&chip_id)
    }
}

/// ATtiny817/816/807/806 based boards.
pub static ATTINY8XX: ChipModel = ChipModel {
    chip_ids: &[0x84, 0x85, 0x86, 0x87],
    adc_pins: &[0, 1, 2, 3, 6, 7, 18, 19, 20],
    dac_pins: &[],
    touch_pins: &[],
    // pins 6, 7, 8 are 16 bit, the rest 8 bit
    pwm_pins: &[0, 1, 9, 12, 13, 6, 7, 8],
    pwm_width: 16,
    adc_addressing: AdcAddressing::ByPinNumber,
};

/// ATtiny1616/1617 based boards.
pub static ATTINY16XX: ChipModel = ChipModel {
    chip_ids: &[0x88, 0x89],
    adc_pins: &[0, 1, 2, 3, 4, 5, 14, 15, 16],
    dac_pins: &[],
    touch_pins: &[],
    // pins 4, 5, 6 are 16 bit, the rest 8 bit
    pwm_pins: &[0, 1, 7, 11, 16, 4, 5, 6],
    pwm_width: 16,
    adc_addressing: AdcAddressing::ByPinNumber,
};

/// SAMD09 based boards.
pub static SAMD09: ChipModel = ChipModel {
    chip_ids: &[0x55],
    adc_pins: &[2, 3, 4, 5],
    dac_pins: &[],
    touch_pins: &[],
    pwm_pins: &[4, 5, 6, 7],
    pwm_width: 8,
    adc_addressing: AdcAddressing::ByChannelIndex,
};

/// The chip families this crate knows out of the box.
pub static SUPPORTED_CHIPS: &[&ChipModel] = &[&ATTINY8XX, &ATTINY16XX, &SAMD09];

/// A chip id claimed by more than one model in a registry table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateChipId(pub u8);

impl fmt::Display for DuplicateChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chip id 0x{:02x} is claimed by two models", self.0)
    }
}

/// Lookup table from chip id to [`ChipModel`].
#[derive(Debug, Clone, Copy)]
pub struct ModelRegistry {
    models: &'static [&'static ChipModel],
}

impl ModelRegistry {
    /// Build a registry from a custom model table.
    ///
    /// Fails if any chip id appears in more than one model, because
    /// resolution for that id would silently depend on table order.
    pub fn new(models: &'static [&'static ChipModel]) -> Result<Self, DuplicateChipId> {
        for (i, model) in models.iter().enumerate() {
            for id in model.chip_ids {
                for other in &models[i + 1..] {
                    if other.is(*id) {
                        return Err(DuplicateChipId(*id));
                    }
                }
            }
        }
        Ok(Self { models })
    }

    /// The registry of the built-in [`SUPPORTED_CHIPS`].
    pub fn builtin() -> Self {
        // known-consistent table, checked by test
        Self {
            models: SUPPORTED_CHIPS,
        }
    }

    /// Look up the model covering `chip_id`.
    pub fn resolve(&self, chip_id: u8) -> Option<&'static ChipModel> {
        self.models.iter().copied().find(|m| m.is(chip_id))
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_is_consistent() {
        ModelRegistry::new(SUPPORTED_CHIPS).unwrap();
    }

    #[test]
    fn resolve_family_ids() {
        let registry = ModelRegistry::builtin();
        for id in [0x84, 0x85, 0x86, 0x87] {
            assert!(core::ptr::eq(registry.resolve(id).unwrap(), &ATTINY8XX));
        }
        for id in [0x88, 0x89] {
            assert!(core::ptr::eq(registry.resolve(id).unwrap(), &ATTINY16XX));
        }
        assert!(core::ptr::eq(registry.resolve(0x55).unwrap(), &SAMD09));
    }

    #[test]
    fn unknown_id_resolves_to_nothing() {
        assert_eq!(ModelRegistry::builtin().resolve(0x13), None);
    }

    #[test]
    fn duplicate_id_rejected_at_registration() {
        static CLASH: ChipModel = ChipModel {
            chip_ids: &[0x55, 0x99],
            adc_pins: &[],
            dac_pins: &[],
            touch_pins: &[],
            pwm_pins: &[],
            pwm_width: 8,
            adc_addressing: AdcAddressing::ByPinNumber,
        };
        static MODELS: &[&ChipModel] = &[&SAMD09, &CLASH];
        assert_eq!(
            ModelRegistry::new(MODELS).unwrap_err(),
            DuplicateChipId(0x55)
        );
    }
}
