//! Async variant of the driver, using `embedded-hal-async`'s `I2c` and
//! `DelayNs` traits.  Only built with the `"async"` feature.
//!
//! Framing, settle delays, capability resolution and error behavior are
//! identical to the blocking [`Seesaw`][crate::Seesaw]; see its
//! documentation for the semantics of each operation.  Transactions stay
//! strictly sequential per device, awaiting each one to completion before
//! the next is issued.

use crate::bits::BitField;
use crate::bus::{frame, SettleDelays};
use crate::device::{
    pin_mask, BuildDate, HardwareInfo, PinMode, ADC_FULL_SCALE, DEFAULT_ADC_REF_VOLTAGE,
};
use crate::error::{Error, SchemaError};
use crate::masks::{NamedBitField, OPTIONS};
use crate::models::{AdcAddressing, ChipModel, ModelRegistry};
use crate::regs::{adc, gpio, status, Module};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

/// Async register-addressed transaction layer.
pub struct TransportAsync<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    delays: SettleDelays,
}

impl<I2C, D> TransportAsync<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
            delays: SettleDelays::default(),
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn delays(&self) -> &SettleDelays {
        &self.delays
    }

    pub fn set_delays(&mut self, delays: SettleDelays) {
        self.delays = delays;
    }

    /// Payloads longer than [`MAX_PAYLOAD`][crate::MAX_PAYLOAD] fail with
    /// [`Error::PayloadTooLong`] before anything reaches the bus.
    pub async fn write(
        &mut self,
        module: Module,
        function: u8,
        payload: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        let (buf, len) =
            frame(module, function, payload).ok_or(Error::PayloadTooLong(payload.len()))?;
        self.i2c
            .write(self.address, &buf[..len])
            .await
            .map_err(Error::Bus)
    }

    pub async fn read(
        &mut self,
        module: Module,
        function: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.write(module, function, &[]).await?;
        self.delay.delay_ms(self.delays.read_ms).await;
        self.i2c.read(self.address, buf).await.map_err(Error::Bus)
    }

    async fn settle_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }
}

/// Async counterpart of [`Seesaw`][crate::Seesaw].
pub struct SeesawAsync<I2C, D> {
    transport: TransportAsync<I2C, D>,
    hardware: Option<HardwareInfo>,
    model: Option<&'static ChipModel>,
    options: NamedBitField,
    registry: ModelRegistry,
    adc_ref_voltage: f32,
}

impl<I2C, D> SeesawAsync<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            transport: TransportAsync::new(i2c, delay, address),
            hardware: None,
            model: None,
            options: OPTIONS.zeroed(),
            registry: ModelRegistry::builtin(),
            adc_ref_voltage: DEFAULT_ADC_REF_VOLTAGE,
        }
    }

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

    pub fn set_registry(&mut self, registry: ModelRegistry) {
        self.registry = registry;
    }

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

    pub fn options(&self) -> &NamedBitField {
        &self.options
    }

    pub fn transport(&mut self) -> &mut TransportAsync<I2C, D> {
        &mut self.transport
    }

    pub async fn detect_hardware(&mut self) -> Result<HardwareInfo, Error<I2C::Error>> {
        let chip_id = self.read_chip_id().await?;
        let (serial, build_date) = self.read_version().await?;
        self.options = self.read_options().await?;
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

    pub async fn read_chip_id(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.transport
            .read(Module::Status, status::HW_ID_CODE, &mut buf)
            .await?;
        Ok(buf[0])
    }

    pub async fn read_version(&mut self) -> Result<(i16, BuildDate), Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.transport
            .read(Module::Status, status::VERSION, &mut buf)
            .await?;
        let serial = i16::from_be_bytes([buf[0], buf[1]]);
        let date = BuildDate::from_code(u16::from_be_bytes([buf[2], buf[3]]));
        Ok((serial, date))
    }

    pub async fn read_options(&mut self) -> Result<NamedBitField, Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.transport
            .read(Module::Status, status::OPTIONS, &mut buf)
            .await?;
        Ok(OPTIONS.with_value(u32::from_be_bytes(buf)))
    }

    pub async fn read_gpio_bulk(&mut self) -> Result<BitField, Error<I2C::Error>> {
        let mut buf = [0u8; 4];
        self.transport
            .read(Module::Gpio, gpio::BULK, &mut buf)
            .await?;
        Ok(BitField::with_value(u32::from_be_bytes(buf)))
    }

    pub async fn write_gpio_bulk(&mut self, field: &BitField) -> Result<(), Error<I2C::Error>> {
        self.transport
            .write(Module::Gpio, gpio::BULK, &field.to_be_bytes())
            .await
    }

    pub async fn digital_write(&mut self, pin: u8, value: bool) -> Result<(), Error<I2C::Error>> {
        let mask = pin_mask(pin)?;
        let function = if value { gpio::BULK_SET } else { gpio::BULK_CLR };
        self.transport
            .write(Module::Gpio, function, &mask.to_be_bytes())
            .await?;
        let ms = self.transport.delays().gpio_write_ms;
        self.transport.settle_ms(ms).await;
        Ok(())
    }

    pub async fn toggle(&mut self, pin: u8) -> Result<(), Error<I2C::Error>> {
        let state = self.read_gpio_bulk().await?;
        self.digital_write(pin, !state.read(pin)?).await
    }

    pub async fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.transport
            .write(Module::Status, status::SWRST, &[status::SWRST_KEY])
            .await?;
        let ms = self.transport.delays().reset_ms;
        self.transport.settle_ms(ms).await;
        Ok(())
    }

    pub async fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), Error<I2C::Error>> {
        let mask = pin_mask(pin)?.to_be_bytes();

        // direction first, pulls after, bulk seed last
        match mode {
            PinMode::Output => {
                self.write_masked(gpio::DIRSET_BULK, &mask).await?;
            }
            PinMode::Input => {
                self.write_masked(gpio::DIRCLR_BULK, &mask).await?;
                self.write_masked(gpio::PULLENCLR, &mask).await?;
            }
            PinMode::InputPullup => {
                self.write_masked(gpio::DIRCLR_BULK, &mask).await?;
                self.write_masked(gpio::PULLENSET, &mask).await?;
                self.write_masked(gpio::BULK_SET, &mask).await?;
            }
            PinMode::InputPulldown => {
                self.write_masked(gpio::DIRCLR_BULK, &mask).await?;
                self.write_masked(gpio::PULLENSET, &mask).await?;
                self.write_masked(gpio::BULK_CLR, &mask).await?;
            }
        }
        Ok(())
    }

    async fn write_masked(&mut self, function: u8, mask: &[u8; 4]) -> Result<(), Error<I2C::Error>> {
        self.transport.write(Module::Gpio, function, mask).await
    }

    pub async fn analog_read(&mut self, pin: u8) -> Result<i16, Error<I2C::Error>> {
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
            .read(Module::Adc, adc::CHANNEL_OFFSET + offset, &mut buf)
            .await?;
        Ok(i16::from_be_bytes(buf))
    }

    pub async fn analog_read_voltage(&mut self, pin: u8) -> Result<f32, Error<I2C::Error>> {
        let raw = self.analog_read(pin).await?;
        Ok(raw as f32 / ADC_FULL_SCALE as f32 * self.adc_ref_voltage)
    }
}
