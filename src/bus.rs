use crate::error::Error;
use crate::regs::Module;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Largest payload one frame can carry.
///
/// The chip's I2C receive buffer is 32 bytes, two of which are the
/// module/function header.  The driver's own operations use at most 4
/// bytes (one bulk register); the rest of the capacity exists for raw
/// [`Transport`] access to registers like the neopixel buffer.  Longer
/// payloads fail with [`Error::PayloadTooLong`].
pub const MAX_PAYLOAD: usize = 30;

/// Settle delays between transactions, in milliseconds.
///
/// The chip firmware offers no ready/busy handshake, so the protocol relies
/// on fixed waits.  The defaults are the empirically-observed values from
/// the reference implementation, not a guarantee; a loaded chip may need
/// more.  They are fields rather than constants so callers targeting slow
/// boards can lengthen them deliberately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelays {
    /// Between a register-select write and the following data read.
    pub read_ms: u32,
    /// After a GPIO bulk set/clear, before the pin state is trustworthy.
    pub gpio_write_ms: u32,
    /// After a software reset, before the chip accepts transactions again.
    pub reset_ms: u32,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            read_ms: 5,
            gpio_write_ms: 10,
            reset_ms: 100,
        }
    }
}

/// Assemble a `[module, function, ...payload]` frame in a stack buffer.
/// `None` when the payload exceeds [`MAX_PAYLOAD`].
pub(crate) fn frame(
    module: Module,
    function: u8,
    payload: &[u8],
) -> Option<([u8; 2 + MAX_PAYLOAD], usize)> {
    if payload.len() > MAX_PAYLOAD {
        return None;
    }
    let mut buf = [0u8; 2 + MAX_PAYLOAD];
    buf[0] = module.into();
    buf[1] = function;
    buf[2..2 + payload.len()].copy_from_slice(payload);
    Some((buf, 2 + payload.len()))
}

/// The register-addressed transaction layer.
///
/// Owns the bus and sleep capabilities plus the device address, and is the
/// single place frames are built: a write is one bus write of
/// `[module, function, ...payload]`; a read is the same frame without
/// payload, the read settle delay, then a bus read of the requested length.
/// All multi-byte register values are big-endian on the wire.
///
/// Transactions are strictly sequential; the `&mut self` receivers make an
/// overlapping write/read pair impossible on a single transport.
pub struct Transport<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    delays: SettleDelays,
}

impl<I2C, D> Transport<I2C, D>
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

    /// Write `payload` to a module function.  One bus transaction, no
    /// response.
    ///
    /// Payloads longer than [`MAX_PAYLOAD`] fail with
    /// [`Error::PayloadTooLong`] before anything reaches the bus.
    pub fn write(
        &mut self,
        module: Module,
        function: u8,
        payload: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        let (buf, len) =
            frame(module, function, payload).ok_or(Error::PayloadTooLong(payload.len()))?;
        self.i2c.write(self.address, &buf[..len]).map_err(Error::Bus)
    }

    /// Read `buf.len()` bytes from a module function.
    ///
    /// Select, wait for the firmware to prepare its response buffer, read.
    pub fn read(
        &mut self,
        module: Module,
        function: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.write(module, function, &[])?;
        self.delay.delay_ms(self.delays.read_ms);
        self.i2c.read(self.address, buf).map_err(Error::Bus)
    }

    pub(crate) fn settle_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c as mock_i2c;

    #[test]
    fn write_frames_module_function_payload() {
        let expectations = [mock_i2c::Transaction::write(
            0x49,
            vec![0x01, 0x05, 0x00, 0x00, 0x02, 0x20],
        )];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut transport = Transport::new(bus.clone(), NoopDelay::new(), 0x49);
        transport
            .write(
                Module::Gpio,
                crate::regs::gpio::BULK_SET,
                &[0x00, 0x00, 0x02, 0x20],
            )
            .unwrap();

        bus.done();
    }

    #[test]
    fn empty_payload_writes_only_the_header() {
        let expectations = [mock_i2c::Transaction::write(0x49, vec![0x00, 0x7f])];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut transport = Transport::new(bus.clone(), NoopDelay::new(), 0x49);
        transport
            .write(Module::Status, crate::regs::status::SWRST, &[])
            .unwrap();

        bus.done();
    }

    #[test]
    fn read_selects_then_reads() {
        let expectations = [
            mock_i2c::Transaction::write(0x36, vec![0x00, 0x02]),
            mock_i2c::Transaction::read(0x36, vec![0x12, 0x34, 0x19, 0x0c]),
        ];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut transport = Transport::new(bus.clone(), NoopDelay::new(), 0x36);
        let mut buf = [0u8; 4];
        transport
            .read(Module::Status, crate::regs::status::VERSION, &mut buf)
            .unwrap();
        assert_eq!(buf, [0x12, 0x34, 0x19, 0x0c]);

        bus.done();
    }

    #[test]
    fn overlong_payload_is_an_error_not_a_bus_write() {
        let mut bus = mock_i2c::Mock::new(&[]);

        let mut transport = Transport::new(bus.clone(), NoopDelay::new(), 0x49);
        let payload = [0u8; MAX_PAYLOAD + 1];
        assert_eq!(
            transport
                .write(Module::Neopixel, crate::regs::neopixel::BUF, &payload)
                .unwrap_err(),
            Error::PayloadTooLong(MAX_PAYLOAD + 1)
        );

        bus.done();
    }

    #[test]
    fn full_capacity_payload_goes_through() {
        let payload = [0xabu8; MAX_PAYLOAD];
        let mut expected = vec![0x0e, 0x04];
        expected.extend_from_slice(&payload);
        let expectations = [mock_i2c::Transaction::write(0x49, expected)];
        let mut bus = mock_i2c::Mock::new(&expectations);

        let mut transport = Transport::new(bus.clone(), NoopDelay::new(), 0x49);
        transport
            .write(Module::Neopixel, crate::regs::neopixel::BUF, &payload)
            .unwrap();

        bus.done();
    }
}
