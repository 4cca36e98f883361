#![no_std]
#![no_main]

use cortex_m_rt::entry;
use defmt::info;
use defmt_rtt as _;
use panic_probe as _;

use bringup_hal as hal;
use hal::timebase::delay_ms;

#[entry]
fn main() -> ! {
    // This profile keeps the reset-default clock, so there is no bring-up
    // to hang; the early signature still marks "reached main".
    let mut board = hal::init(hal::Config::new().with_early_signature(true));
    info!("heartbeat starting");

    // Guard window: prove the tick interrupt is alive.
    board.led_on();
    delay_ms(150);
    board.led_off();
    delay_ms(150);

    // Signature: solid on, pause, then the steady heartbeat.
    board.led_on();
    delay_ms(500);
    board.led_off();
    delay_ms(250);

    loop {
        board.led_toggle();
        delay_ms(500);
    }
}
