use crate::bits::BitField;
use crate::bus::{SettleDelays, Transport};
use crate::error::{Error, SchemaError};
use crate::masks::{NamedBitField, OPTIONS};
use crate::models::{AdcAddressing, ChipModel, ModelRegistry};
use crate::regs::{adc, gpio, status, Module};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Full-scale reading of the 10-bit ADC.
pub const ADC_FULL_SCALE: u16 = 1023;

/// Default ADC reference voltage in volts.
pub const DEFAULT_ADC_REF_VOLTAGE: f32 = 3.3;

/// GPIO pin configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Output,
    Input,
    InputPullup,
    InputPulldown,
}

/// Firmware build date, unpacked from the 16-bit datecode of the version
/// register (5 bits day, 4 bits month, 7 bits year).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildDate {
    /// Years since 2000.
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

impl BuildDate {
    pub fn from_code(code: u16) -> Self {
        Self {
            day: (code & 0x1f) as u8,
            month: ((code >> 5) & 0x0f) as u8,
            year: ((code >> 9) & 0x7f) as u8,
        }
    }

    /// Exact inverse of [`from_code`][Self::from_code] for valid dates.
    pub fn code(&self) -> u16 {
        (((self.year % 100) as u16) << 9) | (((self.month & 0x0f) as u16) << 5) | ((self.day & 0x1f) as u16)
    }
}

/// Identity of a detected chip, immutable once detection completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareInfo {
    pub chip_id: u8,
    pub serial: i16,
    pub build_date: BuildDate,
}

/// A seesaw co-processor on an I2C bus.
///
/// The device starts out *uninitialized*: operations that need chip-specific
/// knowledge (currently the ADC) fail with [`Error::NotDetected`] until
/// capabilities are resolved, either by [`detect_hardware`][Self::detect_hardware]
/// or by constructing with an explicit model via [`with_model`][Self::with_model].
///
/// All operations are strictly sequential blocking calls.  The driver itself
/// does no locking; if several logical callers share one device, serialize
/// access externally (`toggle` in particular is a non-atomic
/// read-modify-write).
pub struct Seesaw<I2C, D> {
    transport: Transport<I2C, D>,
    hardware: Option<HardwareInfo>,
    model: Option<&'static ChipModel>,
    options: NamedBitField,
    registry: ModelRegistry,
    adc_ref_voltage: f32,
}

impl<I2C, D> Seesaw<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Driver for the device at `address`, with capabilities still
    /// unresolved.
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            transport: Transport::new(i2c, delay, address),
            hardware: None,
            model: None,
            options: OPTIONS.zeroed(),
            registry: ModelRegistry::builtin(),
            adc_ref_voltage: DEFAULT_ADC_REF_VOLTAGE,
        }
    }

    /// Driver with capabilities supplied up front instead of detected.
    ///
    /// The hardware info is seeded from the model's first chip id; serial
    /// and build date stay zero until [`detect_hardware`][Self::detect_hardware]
    /// fills them in.
    pub fn with_model(i2c: I2C, delay: D, address: u8, model: &'static ChipModel) -> Self {
        let mut dev = Self::new(i2c, delay, address);
        dev.model = Some(model);
        dev.hardware = Some(HardwareInfo {
            chip_id: model.chip_ids.first().copied().unwrap_or(0),
            serial: 0,
            build_date: BuildDate::from_code(0),
        });
        dev
    }

    /// Replace the registry consulted during detection, e.g. to add custom
    /// firmware ids.
    pub fn set_registry(&mut self, registry: ModelRegistry) {
        self.registry = registry;
    }

    /// Reference voltage used by [`analog_read_voltage`][Self::analog_read_voltage].
    pub fn set_adc_ref_voltage(&mut self, volts: f32) {
        self.adc_ref_voltage = volts;
    }

    pub fn set_delays(&mut self, delays: SettleDelays) {
        self.transport.set_delays(delays);
    }

    pub fn hardware_info(&self) -> Option<&HardwareInfo> {
        self.hardware.as_ref()
    }

    pub fn model(&self) -> Option<&'static ChipModel> {
        self.model
    }

    /// Feature options reported by the chip, zero until detection ran.
    pub fn options(&self) -> &NamedBitField {
        &self.options
    }

    /// Raw access to the register transport, for registers this driver has
    /// no operation for.
    pub fn transport(&mut self) -> &mut Transport<I2C, D> {
        &mut self.transport
    }

    /// Identify the chip and resolve its capabilities.
    ///
    /// Reads chip id, serial/build datecode and the options register, then
    /// resolves the model from the registry.  An id missing from the
    /// registry fails with [`Error::UnknownChip`]; no fallback model is
    /// guessed.
    pub fn detect_hardware(&mut self) -> Result<HardwareInfo, Error<I2C::Error>> {
        let chip_id = self.read_chip_id()?;
        let (serial, build_date) = self.read_version()?;
        self.options = self.read_options()?;
        self.model = Some(
            self.registry
                .resolve(chip_id)
                .ok_or(Error::UnknownChip(chip_id))?,
        );

        let hardware = HardwareInfo {
            chip_id,
            serial,
            build_date,
        };
        self.hardware = Some(hardware);
        Ok(hardware)
    }

    /// Read the hardware id byte.
    pub fn read_chip_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.transport
            .read(Module::Status, status::HW_ID_CODE, &mut buf)?;
        Ok(buf[0])
    }

    /// Read serial number and firmware build date from the version register.
    pub fn read_version(&mut self) -> Result<(i16, BuildDate), Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.transport
            .read(Module::Status, status::VERSION, &mut buf)?;
        let serial = i16::from_be_bytes([buf[0], buf[1]]);
        let date = BuildDate::from_code(u16::from_be_bytes([buf[2], buf[3]]));
        Ok((serial, date))
    }

    /// Read the options register into its named field.
    pub fn read_options(&mut self) -> Result<NamedBitField, Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.transport
            .read(Module::Status, status::OPTIONS, &mut buf)?;
        Ok(OPTIONS.with_value(u32::from_be_bytes(buf)))
    }

    /// Read the whole GPIO bank, one bit per pin.
    pub fn read_gpio_bulk(&mut self) -> Result<BitField, Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.transport
            .read(Module::Gpio, gpio::BULK, &mut buf)?;
        Ok(BitField::with_value(u32::from_be_bytes(buf)))
    }

    /// Write a whole GPIO bank image at once.
    pub fn write_gpio_bulk(&mut self, field: &BitField) -> Result<(), Error<I2C::Error>> {
        self.transport
            .write(Module::Gpio, gpio::BULK, &field.to_be_bytes())
    }

    /// Drive a single output pin high or low.
    ///
    /// Writes a one-bit mask to the bulk set/clear register, then waits the
    /// GPIO settle delay so a following read sees the new pin state.
    pub fn digital_write(&mut self, pin: u8, value: bool) -> Result<(), Error<I2C::Error>> {
        let mask = pin_mask(pin)?;
        let function = if value { gpio::BULK_SET } else { gpio::BULK_CLR };
        self.transport
            .write(Module::Gpio, function, &mask.to_be_bytes())?;
        let ms = self.transport.delays().gpio_write_ms;
        self.transport.settle_ms(ms);
        Ok(())
    }

    /// Invert a pin: bulk read, then write the negation.
    ///
    /// Not atomic; a concurrent writer on the same address can interleave
    /// between the read and the write.
    pub fn toggle(&mut self, pin: u8) -> Result<(), Error<I2C::Error>> {
        let state = self.read_gpio_bulk()?;
        self.digital_write(pin, !state.read(pin)?)
    }

    /// Software-reset the chip.
    ///
    /// Waits the reset settle delay afterwards; issuing any transaction to
    /// the chip before that delay has elapsed is undefined.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.transport
            .write(Module::Status, status::SWRST, &[status::SWRST_KEY])?;
        let ms = self.transport.delays().reset_ms;
        self.transport.settle_ms(ms);
        Ok(())
    }

    /// Configure a pin's direction and pull.
    ///
    /// The write order is fixed: direction before pull-enable, and for the
    /// pull modes the bulk register is seeded to the matching rail only
    /// after pull-enable is asserted.  Reordering leaves the pin in a
    /// transient wrong electrical state on real hardware.
    pub fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Error<I2C::Error>> {
        let mask = pin_mask(pin)?.to_be_bytes();
        let mut write = |function| self.transport.write(Module::Gpio, function, &mask);

        match mode {
            PinMode::Output => {
                write(gpio::DIRSET_BULK)?;
            }
            PinMode::Input => {
                write(gpio::DIRCLR_BULK)?;
                write(gpio::PULLENCLR)?;
            }
            PinMode::InputPullup => {
                write(gpio::DIRCLR_BULK)?;
                write(gpio::PULLENSET)?;
                write(gpio::BULK_SET)?;
            }
            PinMode::InputPulldown => {
                write(gpio::DIRCLR_BULK)?;
                write(gpio::PULLENSET)?;
                write(gpio::BULK_CLR)?;
            }
        }
        Ok(())
    }

    /// Sample an ADC pin.
    ///
    /// Fails before touching the bus if no model is resolved or the pin is
    /// not in the model's ADC pin set.  The channel offset follows the
    /// model's addressing policy: raw pin number on the ATtiny families,
    /// index into the ADC pin table on SAMD09.
    pub fn analog_read(&mut self, pin: u8) -> Result<i16, Error<I2C::Error>> {
        let model = self.model.ok_or(Error::NotDetected)?;
        let index = model
            .adc_pins
            .iter()
            .position(|p| *p == pin)
            .ok_or(SchemaError::AdcPinUnsupported(pin))?;
        let offset = match model.adc_addressing {
            AdcAddressing::ByPinNumber => pin,
            AdcAddressing::ByChannelIndex => index as u8,
        };

        let mut buf = [0u8; 2];
        self.transport
            .read(Module::Adc, adc::CHANNEL_OFFSET + offset, &mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Sample an ADC pin and scale to volts against the reference voltage.
    pub fn analog_read_voltage(&mut self, pin: u8) -> Result<f32, Error<I2C::Error>> {
        let raw = self.analog_read(pin)?;
        Ok(raw as f32 / ADC_FULL_SCALE as f32 * self.adc_ref_voltage)
    }
}

/// One-bit field for `pin`, the payload of every per-pin bulk write.
pub(crate) fn pin_mask(pin: u8) -> Result<BitField, SchemaError> {
    let mut field = BitField::new();
    field.set(pin, true)?;
    Ok(field)
}
