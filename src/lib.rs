#![no_std]

mod constants;

pub use constants::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use num_traits::ToPrimitive;

/// Bit-banged driver for the HT1621 over its 3-wire write-only interface.
///
/// The controller never answers, so every operation is a blind transmission.
/// Pins must already be configured as push-pull outputs.
pub struct HT1621<CS, WR, DATA, DELAY> {
    cs: CS,
    wr: WR,
    data: DATA,
    delay: DELAY,
}

impl<CS, WR, DATA, DELAY, E> HT1621<CS, WR, DATA, DELAY>
where
    CS: OutputPin<Error = E>,
    WR: OutputPin<Error = E>,
    DATA: OutputPin<Error = E>,
    DELAY: DelayNs,
{
    pub fn new(cs: CS, wr: WR, data: DATA, delay: DELAY) -> Self {
        Self {
            cs,
            wr,
            data,
            delay,
        }
    }

    pub fn destroy(self) -> (CS, WR, DATA, DELAY) {
        (self.cs, self.wr, self.data, self.delay)
    }

    /// Idles chip-select high and runs the power-up command sequence.
    pub fn init(&mut self) -> Result<(), HT1621Error<E>> {
        self.cs.set_high()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("ht1621 init");

        for command in INIT_SEQUENCE {
            self.send_command(command)?;
        }
        Ok(())
    }

    pub fn display_on(&mut self) -> Result<(), HT1621Error<E>> {
        self.send_command(Command::LcdOn)
    }

    pub fn display_off(&mut self) -> Result<(), HT1621Error<E>> {
        self.send_command(Command::LcdOff)
    }

    pub fn system_on(&mut self) -> Result<(), HT1621Error<E>> {
        self.send_command(Command::SystemEnable)
    }

    pub fn system_off(&mut self) -> Result<(), HT1621Error<E>> {
        self.send_command(Command::SystemDisable)
    }

    pub fn clear(&mut self) -> Result<(), HT1621Error<E>> {
        self.fill(0x00)
    }

    /// Lights every segment, useful to check the glass and wiring.
    pub fn all_segments_on(&mut self) -> Result<(), HT1621Error<E>> {
        self.fill(0xFF)
    }

    /// Clears the display, then renders `number` as up to two digits in
    /// positions 0 and 1 without a leading zero.
    ///
    /// Numbers outside 0..=99 leave the display blank and return
    /// [`HT1621Error::InvalidNumber`].
    pub fn display_number<T>(&mut self, number: T) -> Result<(), HT1621Error<E>>
    where
        T: ToPrimitive,
    {
        self.clear()?;

        let number = number
            .to_u8()
            .filter(|n| *n <= 99)
            .ok_or(HT1621Error::InvalidNumber)?;

        if number > 9 {
            self.write_digit(0, number / 10, false)?;
        }
        self.write_digit(1, number % 10, false)
    }

    /// Writes the segment pattern for `digit` to the given digit slot.
    /// Nothing is sent when the digit or position is out of range.
    pub fn write_digit(
        &mut self,
        position: u8,
        digit: u8,
        colon: bool,
    ) -> Result<(), HT1621Error<E>> {
        let pattern = encode_digit(digit, colon).ok_or(HT1621Error::InvalidDigit(digit))?;
        self.write_segments(position, pattern)
    }

    pub fn write_segments(&mut self, position: u8, pattern: u8) -> Result<(), HT1621Error<E>> {
        if position >= MAX_DIGITS {
            return Err(HT1621Error::InvalidLocation(position));
        }
        self.write_frame(position * 2, pattern)
    }

    /// Raw write of one byte, spanning the two 4-bit cells at `address` and
    /// `address + 1`. The address must be even and inside display RAM.
    pub fn write_memory(&mut self, address: u8, data: u8) -> Result<(), HT1621Error<E>> {
        if address >= RAM_CELLS || address % 2 != 0 {
            return Err(HT1621Error::InvalidLocation(address));
        }
        self.write_frame(address, data)
    }

    pub fn send_command(&mut self, command: Command) -> Result<(), HT1621Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("ht1621 command {}", command);

        self.cs.set_low()?;
        self.write_bits(frame::COMMAND_MODE as u16, frame::MODE_BITS)?;
        self.write_bits(command.code() as u16, frame::COMMAND_BITS)?;
        self.write_bits(0, frame::DONT_CARE_BITS)?;
        self.cs.set_high()?;
        Ok(())
    }

    fn fill(&mut self, data: u8) -> Result<(), HT1621Error<E>> {
        for address in (0..RAM_CELLS).step_by(2) {
            self.write_frame(address, data)?;
        }
        Ok(())
    }

    fn write_frame(&mut self, address: u8, data: u8) -> Result<(), HT1621Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("ht1621 write {=u8} <- {=u8:#x}", address, data);

        self.cs.set_low()?;
        self.write_bits(frame::WRITE_MODE as u16, frame::MODE_BITS)?;
        self.write_bits(address as u16, frame::ADDRESS_BITS)?;
        self.write_bits(data as u16, frame::DATA_BITS)?;
        self.cs.set_high()?;
        Ok(())
    }

    // MSB first, data is sampled by the chip on the WR rising edge
    fn write_bits(&mut self, value: u16, bits: u8) -> Result<(), HT1621Error<E>> {
        for i in (0..bits).rev() {
            self.wr.set_low()?;
            self.delay.delay_us(BIT_DELAY_US);
            if value & (1 << i) != 0 {
                self.data.set_high()?;
            } else {
                self.data.set_low()?;
            }
            self.wr.set_high()?;
            self.delay.delay_us(BIT_DELAY_US);
        }
        Ok(())
    }
}

/// Segment pattern for a decimal digit, with the colon bit optionally set.
/// Returns `None` for anything above 9.
pub fn encode_digit(digit: u8, colon: bool) -> Option<u8> {
    NUMBERS.get(digit as usize).map(|&pattern| {
        if colon {
            pattern | COLON_MASK
        } else {
            pattern
        }
    })
}

#[derive(Clone, Copy, Debug)]
pub enum HT1621Error<E> {
    Pin(E),
    InvalidDigit(u8),
    InvalidNumber,
    InvalidLocation(u8),
}

impl<E> From<E> for HT1621Error<E> {
    fn from(error: E) -> Self {
        HT1621Error::Pin(error)
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for HT1621Error<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            HT1621Error::Pin(_e) => defmt::write!(fmt, "pin error"),
            HT1621Error::InvalidDigit(digit) => defmt::write!(fmt, "invalid digit {=u8}", digit),
            HT1621Error::InvalidNumber => defmt::write!(fmt, "number out of range"),
            HT1621Error::InvalidLocation(location) => {
                defmt::write!(fmt, "invalid location {=u8}", location)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        digital::{Mock as PinMock, State, Transaction as PinTransaction},
    };
    use std::vec::Vec;

    fn level(bit: u8) -> PinTransaction {
        PinTransaction::set(if bit != 0 { State::High } else { State::Low })
    }

    // one low/high pulse per clocked bit or per chip-select bracket
    fn pulses(count: usize) -> Vec<PinTransaction> {
        (0..count)
            .flat_map(|_| [PinTransaction::set(State::Low), PinTransaction::set(State::High)])
            .collect()
    }

    fn finish(lcd: HT1621<PinMock, PinMock, PinMock, NoopDelay>) {
        let (mut cs, mut wr, mut data, _) = lcd.destroy();
        cs.done();
        wr.done();
        data.done();
    }

    #[test]
    fn display_on_sends_command_frame() {
        let bits = [1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0];
        let data: Vec<_> = bits.iter().map(|&b| level(b)).collect();

        let mut lcd = HT1621::new(
            PinMock::new(&pulses(1)),
            PinMock::new(&pulses(12)),
            PinMock::new(&data),
            NoopDelay::new(),
        );
        assert!(lcd.display_on().is_ok());

        finish(lcd);
    }

    #[test]
    fn write_digit_sends_write_frame() {
        // prefix 101, address 000100, data 10101111
        let bits = [1, 0, 1, 0, 0, 0, 1, 0, 0, 1, 0, 1, 0, 1, 1, 1, 1];
        let data: Vec<_> = bits.iter().map(|&b| level(b)).collect();

        let mut lcd = HT1621::new(
            PinMock::new(&pulses(1)),
            PinMock::new(&pulses(17)),
            PinMock::new(&data),
            NoopDelay::new(),
        );
        assert!(lcd.write_digit(2, 0, false).is_ok());

        finish(lcd);
    }

    #[test]
    fn init_idles_chip_select_high_first() {
        let mut cs = std::vec![PinTransaction::set(State::High)];
        cs.extend(pulses(INIT_SEQUENCE.len()));

        let mut data = Vec::new();
        for command in INIT_SEQUENCE {
            data.extend([level(1), level(0), level(0)]);
            data.extend((0..8).rev().map(|i| level((command.code() >> i) & 1)));
            data.push(level(0));
        }

        let mut lcd = HT1621::new(
            PinMock::new(&cs),
            PinMock::new(&pulses(12 * INIT_SEQUENCE.len())),
            PinMock::new(&data),
            NoopDelay::new(),
        );
        assert!(lcd.init().is_ok());

        finish(lcd);
    }

    #[test]
    fn rejected_input_touches_no_pins() {
        let mut lcd = HT1621::new(
            PinMock::new(&[]),
            PinMock::new(&[]),
            PinMock::new(&[]),
            NoopDelay::new(),
        );

        assert!(matches!(
            lcd.write_digit(0, 10, false),
            Err(HT1621Error::InvalidDigit(10))
        ));
        assert!(matches!(
            lcd.write_digit(MAX_DIGITS, 1, false),
            Err(HT1621Error::InvalidLocation(MAX_DIGITS))
        ));
        assert!(matches!(
            lcd.write_memory(3, 0xFF),
            Err(HT1621Error::InvalidLocation(3))
        ));
        assert!(matches!(
            lcd.write_memory(RAM_CELLS, 0xFF),
            Err(HT1621Error::InvalidLocation(RAM_CELLS))
        ));

        finish(lcd);
    }

    #[test]
    fn encode_digit_table() {
        let expected = [0xAF, 0xA0, 0xCB, 0xE9, 0xE4, 0x6D, 0x6F, 0xA8, 0xEF, 0xED];
        for (digit, &pattern) in expected.iter().enumerate() {
            assert_eq!(encode_digit(digit as u8, false), Some(pattern));
            assert_eq!(encode_digit(digit as u8, true), Some(pattern | 0x10));
        }
        assert_eq!(encode_digit(10, false), None);
        assert_eq!(encode_digit(255, true), None);
    }
}
