#![no_std]
#![no_main]

use arduino_hal::prelude::*;
use ht1621::HT1621;
use panic_halt as _;

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);
    let mut serial = arduino_hal::default_serial!(dp, pins, 57600);

    let cs = pins.d4.into_output();
    let wr = pins.d3.into_output();
    let data = pins.d2.into_output();

    let mut display = HT1621::new(cs, wr, data, arduino_hal::Delay::new());
    display.init().unwrap();

    ufmt::uwriteln!(&mut serial, "Segment test...").unwrap_infallible();
    display.all_segments_on().unwrap();
    arduino_hal::delay_ms(1000);
    display.clear().unwrap();

    ufmt::uwriteln!(&mut serial, "Blinking colon...").unwrap_infallible();
    for i in 0..6 {
        display.write_digit(0, 1, i % 2 == 0).unwrap();
        display.write_digit(1, 2, false).unwrap();
        arduino_hal::delay_ms(500);
    }

    ufmt::uwriteln!(&mut serial, "Counting up...").unwrap_infallible();
    let mut i: u8 = 0;
    loop {
        display.display_number(i).unwrap();
        i = (i + 1) % 100;

        arduino_hal::delay_ms(300);
    }
}
