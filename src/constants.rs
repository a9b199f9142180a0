pub const BIT_DELAY_US: u32 = 2; // WR low/high hold time
pub const MAX_DIGITS: u8 = 16; // one digit per byte of display RAM
pub const RAM_CELLS: u8 = 32; // 4 bits each
pub const COLON_MASK: u8 = 0x10;

// bit layout, MSB to LSB: B G C Colon A F E D
pub const NUMBERS: [u8; 10] = [0xAF, 0xA0, 0xCB, 0xE9, 0xE4, 0x6D, 0x6F, 0xA8, 0xEF, 0xED];

pub mod frame {
    pub const COMMAND_MODE: u8 = 0b100;
    pub const WRITE_MODE: u8 = 0b101;
    pub const MODE_BITS: u8 = 3;
    pub const COMMAND_BITS: u8 = 8;
    pub const ADDRESS_BITS: u8 = 6;
    pub const DATA_BITS: u8 = 8;
    pub const DONT_CARE_BITS: u8 = 1;
}

/// Command codes understood by the controller, as sent after the `100` mode prefix.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SystemDisable = 0x00,
    SystemEnable = 0x01,
    LcdOff = 0x02,
    LcdOn = 0x03,
    WatchdogDisable = 0x06,
    RcOscillator = 0x18,
    Bias13Com4 = 0x28,
}

impl Command {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Power-up sequence issued by `init`, in order.
pub const INIT_SEQUENCE: [Command; 5] = [
    Command::SystemEnable,
    Command::Bias13Com4,
    Command::RcOscillator,
    Command::WatchdogDisable,
    Command::LcdOn,
];
