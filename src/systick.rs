//! Core periodic timer: capability interface and the SysTick backing it.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

/// The periodic timer feeding the millisecond timebase.
///
/// Implemented by [`CoreSysTick`] on the target and by the simulated timer
/// in host tests.
pub trait PeriodicTimer {
    /// Stop the timer and zero its control, reload and current values.
    ///
    /// Runs before reconfiguration: state left by a previous run or a
    /// debugger must not produce a spurious or mistimed first tick.
    fn stop(&mut self);

    /// Program the reload value.
    fn set_reload(&mut self, ticks: u32);

    /// Zero the current counter value.
    fn clear_current(&mut self);

    /// Enable the timer with its interrupt and the core clock as tick
    /// source.
    fn start(&mut self);
}

/// The Cortex-M SysTick timer.
pub struct CoreSysTick {
    syst: SYST,
}

impl CoreSysTick {
    pub(crate) unsafe fn steal() -> Self {
        Self {
            syst: unsafe { cortex_m::Peripherals::steal() }.SYST,
        }
    }
}

impl PeriodicTimer for CoreSysTick {
    fn stop(&mut self) {
        self.syst.disable_counter();
        self.syst.disable_interrupt();
        self.syst.set_reload(0);
        self.syst.clear_current();
    }

    fn set_reload(&mut self, ticks: u32) {
        self.syst.set_reload(ticks);
    }

    fn clear_current(&mut self) {
        self.syst.clear_current();
    }

    fn start(&mut self) {
        self.syst.set_clock_source(SystClkSource::Core);
        self.syst.enable_interrupt();
        self.syst.enable_counter();
    }
}
