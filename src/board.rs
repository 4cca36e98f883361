//! Board abstraction: the indicator pin and the chip pieces sharing it.
//!
//! The only component that knows which physical bank/pin is "the
//! indicator"; clock bring-up and the timebase never reference a pin.
//! Retargeting to another board replaces this layer's support impl and the
//! register profile it sits on, nothing else.

use core::convert::Infallible;

use embedded_hal_1::digital::{ErrorType, OutputPin, StatefulOutputPin};

use crate::gpio::{GpioBank, Level, PinMode};

/// Chip-side support the board layer needs.
pub trait BoardSupport {
    /// GPIO bank hosting the indicator.
    type Bank: GpioBank;

    /// Indicator pin number within [`Self::Bank`].
    const LED_PIN: u8;

    /// Enable the bank's clock and any auxiliary peripheral needed to
    /// release the pin.
    fn enable_clocks(&mut self);

    /// Disable a competing on-chip function sharing the pin (e.g. a trace
    /// output). Profiles without one keep the default no-op.
    fn release_pin(&mut self) {}

    /// Access the bank.
    fn bank(&mut self) -> &mut Self::Bank;
}

/// The board's indicator LED.
pub struct Board<S: BoardSupport> {
    support: S,
}

impl<S: BoardSupport> Board<S> {
    fn configure(support: &mut S) {
        support.enable_clocks();
        support.release_pin();
        support.bank().set_mode(S::LED_PIN, PinMode::Output);
    }

    /// Configure the indicator and drive it ON immediately.
    ///
    /// Intended to run before clock bring-up: proves execution reached this
    /// point even if bring-up then hangs forever.
    pub fn early_signature(support: &mut S) {
        Self::configure(support);
        support.bank().set(S::LED_PIN);
    }

    /// Configure the indicator and leave it OFF.
    ///
    /// Overrides any prior state, including a prior
    /// [`early_signature`](Self::early_signature).
    pub fn init(mut support: S) -> Self {
        Self::configure(&mut support);
        support.bank().clear(S::LED_PIN);
        Self { support }
    }

    /// Drive the LED on. Single set/clear-register write.
    pub fn led_on(&mut self) {
        self.support.bank().set(S::LED_PIN);
    }

    /// Drive the LED off. Single set/clear-register write.
    pub fn led_off(&mut self) {
        self.support.bank().clear(S::LED_PIN);
    }

    /// Toggle the LED via the level register.
    ///
    /// Read-modify-write; valid only while the foreground is the pin's sole
    /// writer, which holds because no interrupt handler touches this pin.
    pub fn led_toggle(&mut self) {
        self.support.bank().toggle(S::LED_PIN);
    }

    /// Current LED level.
    pub fn led_level(&mut self) -> Level {
        self.support.bank().output_level(S::LED_PIN)
    }

    /// Release the underlying support value.
    pub fn free(self) -> S {
        self.support
    }
}

impl<S: BoardSupport> ErrorType for Board<S> {
    type Error = Infallible;
}

impl<S: BoardSupport> OutputPin for Board<S> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.led_off();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.led_on();
        Ok(())
    }
}

impl<S: BoardSupport> StatefulOutputPin for Board<S> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.led_level().into())
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!bool::from(self.led_level()))
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.led_toggle();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal_1::digital::StatefulOutputPin;

    use super::{Board, BoardSupport};
    use crate::gpio::{GpioBank, Level, PinMode};
    use crate::sim::SimSupport;

    #[test]
    fn early_signature_configures_and_drives_on() {
        let mut support = SimSupport::new();
        Board::early_signature(&mut support);
        assert!(support.clocks_enabled);
        assert!(support.pin_released);
        assert_eq!(support.bank.mode_of(SimSupport::LED_PIN), PinMode::Output);
        assert_eq!(support.bank.output_level(SimSupport::LED_PIN), Level::High);
    }

    #[test]
    fn init_after_early_signature_leaves_led_off() {
        let mut support = SimSupport::new();
        Board::early_signature(&mut support);
        let mut board = Board::init(support);
        assert_eq!(board.led_level(), Level::Low);
    }

    #[test]
    fn toggle_matches_level_reads() {
        let mut board = Board::init(SimSupport::new());
        board.led_toggle();
        assert_eq!(board.led_level(), Level::High);
        assert!(board.is_set_high().unwrap());
        board.led_toggle();
        assert_eq!(board.led_level(), Level::Low);
    }

    #[test]
    fn on_off_are_single_bsrr_writes() {
        let mut board = Board::init(SimSupport::new());
        board.led_on();
        let support = board.free();
        assert_eq!(support.bank.last_bsrr, Some(1 << SimSupport::LED_PIN));
    }
}
