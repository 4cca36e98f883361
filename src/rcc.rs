//! Clock control: the bring-up state machine and the post-init clock record.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::time::Hertz;

/// Clock-controller fields the bring-up sequence drives.
///
/// Implemented once per chip family that needs driving, and by the simulated
/// controller in host tests.
pub trait ClockController {
    /// System clock frequency guaranteed once [`bring_up`] returns.
    const SYSCLK: Hertz;

    /// Enable the internal oscillator.
    fn enable_oscillator(&mut self);

    /// Whether the oscillator's ready flag has asserted.
    fn oscillator_ready(&self) -> bool;

    /// Program the oscillator's frequency-range field to the one supported
    /// target range.
    fn set_frequency_range(&mut self);

    /// Select the oscillator as system clock source by clearing the
    /// source-select field.
    fn select_oscillator(&mut self);

    /// Whether the switch-status field reads back the oscillator as the
    /// active source.
    fn oscillator_selected(&self) -> bool;

    /// Whether the secondary multiplier (PLL) is enabled.
    fn pll_enabled(&self) -> bool;

    /// Disable the secondary multiplier.
    fn disable_pll(&mut self);

    /// Whether the secondary multiplier's ready flag is still asserted.
    fn pll_ready(&self) -> bool;
}

/// Bring the system clock to `C::SYSCLK`.
///
/// Every wait is an unbounded poll of a hardware status bit; this early
/// there is no interrupt or timebase, so busy-polling is the only available
/// synchronization. A flag that never asserts halts progress here rather
/// than letting later stages run on an unverified clock.
pub fn bring_up<C: ClockController>(clk: &mut C) {
    clk.enable_oscillator();
    while !clk.oscillator_ready() {}

    clk.set_frequency_range();

    // Select explicitly: a debugger or earlier boot stage may have left a
    // different source (e.g. the PLL) selected.
    clk.select_oscillator();
    while !clk.oscillator_selected() {}

    // The multiplier must be off and observed not-ready before returning.
    if clk.pll_enabled() {
        clk.disable_pll();
        while clk.pll_ready() {}
    }
}

/// Clock frequencies recorded after init.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clocks {
    /// System clock frequency.
    pub sysclk: Hertz,
}

impl Clocks {
    const ZERO: Clocks = Clocks { sysclk: Hertz(0) };
}

/// Whether `CLOCK_FREQS` has been initialized by `set_freqs()`.
static CLOCK_FREQS_INIT: AtomicBool = AtomicBool::new(false);

static mut CLOCK_FREQS: Clocks = Clocks::ZERO;

/// Record the clock frequencies.
///
/// Safety: writes a mutable global; called from init while still
/// single-threaded with interrupts masked.
pub(crate) unsafe fn set_freqs(freqs: Clocks) {
    debug!("rcc: sysclk {} Hz", freqs.sysclk.0);
    unsafe { CLOCK_FREQS = freqs };
    CLOCK_FREQS_INIT.store(true, Ordering::Release);
}

/// The recorded clock frequencies.
///
/// # Panics
///
/// Panics if called before `init()`.
pub fn clocks() -> &'static Clocks {
    assert!(
        CLOCK_FREQS_INIT.load(Ordering::Acquire),
        "rcc: clocks() called before init()"
    );
    unsafe { &*core::ptr::addr_of!(CLOCK_FREQS) }
}

/// The system clock frequency fixed by init.
pub fn sysclk() -> Hertz {
    clocks().sysclk
}

#[cfg(test)]
mod tests {
    use super::bring_up;
    use crate::sim::{ClockOp, SimClock};

    #[test]
    fn bring_up_runs_the_documented_sequence() {
        let mut clk = SimClock::with_pll_left_on();
        bring_up(&mut clk);
        assert_eq!(
            clk.ops(),
            [
                ClockOp::EnableOsc,
                ClockOp::SetRange,
                ClockOp::SelectSource,
                ClockOp::DisablePll,
            ]
        );
        // The range is programmed only after the ready flag was observed,
        // and the PLL only touched after the switch status read back.
        assert!(clk.ready_when_range_set());
        assert!(clk.switched_when_pll_disabled());
        assert!(clk.oscillator_enabled());
        assert_eq!(clk.source(), 0);
        assert!(!clk.pll_on());
    }

    #[test]
    fn bring_up_leaves_a_disabled_pll_alone() {
        let mut clk = SimClock::new();
        bring_up(&mut clk);
        assert_eq!(
            clk.ops(),
            [ClockOp::EnableOsc, ClockOp::SetRange, ClockOp::SelectSource]
        );
    }

    #[test]
    fn bring_up_never_returns_when_oscillator_stays_dead() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::time::Duration;

        let returned = Arc::new(AtomicBool::new(false));
        let flag = returned.clone();
        // Detached on purpose: the spin is the behavior under test.
        std::thread::spawn(move || {
            let mut clk = SimClock::never_ready();
            bring_up(&mut clk);
            flag.store(true, Ordering::SeqCst);
        });
        std::thread::sleep(Duration::from_millis(100));
        assert!(!returned.load(Ordering::SeqCst));
    }
}
