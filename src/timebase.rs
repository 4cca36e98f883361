//! Millisecond timebase: the monotonic tick counter, the blocking delay and
//! the critical-section toggles.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::arch;
use crate::systick::PeriodicTimer;
use crate::time::Hertz;

/// Monotonic tick counter.
///
/// Single writer (the periodic timer interrupt), any number of readers; a
/// machine-word counter needs no further locking. Comparisons must use the
/// modular [`elapsed_since`](Self::elapsed_since), never direct ordering.
pub struct Timebase {
    ticks: AtomicU32,
}

impl Timebase {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU32::new(0),
        }
    }

    #[cfg(any(test, feature = "sim"))]
    pub const fn with_ticks(ticks: u32) -> Self {
        Self {
            ticks: AtomicU32::new(ticks),
        }
    }

    /// One periodic timer event: increment by exactly 1, wrapping at the
    /// counter width.
    pub fn on_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the counter; may be stale by a sub-tick amount.
    pub fn millis(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Ticks elapsed since `start`, modular across counter wrap.
    pub fn elapsed_since(&self, start: u32) -> u32 {
        self.millis().wrapping_sub(start)
    }

    /// Block for at least `ms` ticks.
    ///
    /// Spins in the calling context; there is nothing to yield to. If the
    /// caller has interrupts masked the counter never advances and this
    /// never returns; that is the caller's contract, not a detectable
    /// fault.
    pub fn delay_ms(&self, ms: u32) {
        let start = self.millis();
        while self.elapsed_since(start) < ms {
            core::hint::spin_loop();
        }
    }

    fn reset(&self) {
        self.ticks.store(0, Ordering::Relaxed);
    }
}

static TIMEBASE: Timebase = Timebase::new();

/// Program the periodic timer for a 1 kHz tick from a `sysclk` known to be
/// exact.
///
/// The counter restarts at 0. Precondition: the clock really runs at
/// `sysclk`; a wrong value silently yields a wrong tick period with no
/// detection.
pub fn init<T: PeriodicTimer>(timer: &mut T, sysclk: Hertz) {
    timer.stop();
    let reload = sysclk.0 / 1_000 - 1;
    timer.set_reload(reload);
    timer.clear_current();
    TIMEBASE.reset();
    timer.start();
    debug!("timebase: 1 kHz tick, reload {}", reload);
}

/// Milliseconds since [`init`].
pub fn millis() -> u32 {
    TIMEBASE.millis()
}

/// Block for at least `ms` milliseconds. See [`Timebase::delay_ms`].
pub fn delay_ms(ms: u32) {
    TIMEBASE.delay_ms(ms)
}

/// Globally unmask interrupts.
///
/// A plain toggle, not a nesting counter: an enable from any caller ends
/// every caller's critical section. Nested disable/enable pairs across two
/// call sites will re-enable interrupts the inner caller did not intend to.
pub fn irq_enable() {
    unsafe { arch::irq_unmask() }
}

/// Globally mask interrupts. See [`irq_enable`] for the toggle contract.
pub fn irq_disable() {
    arch::irq_mask()
}

// SysTick vector. Only bumps the counter: anything more would stretch
// interrupt latency and skew the delay granularity.
#[cfg(feature = "rt")]
#[no_mangle]
extern "C" fn SysTick() {
    TIMEBASE.on_tick();
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::{init, Timebase};
    use crate::sim::{SimTimer, TimerOp};
    use crate::time::Hertz;

    #[test]
    fn reload_is_exact_for_supported_frequencies() {
        let mut timer = SimTimer::new();
        init(&mut timer, Hertz(4_000_000));
        assert_eq!(timer.reload, 3_999);

        let mut timer = SimTimer::new();
        init(&mut timer, Hertz(8_000_000));
        assert_eq!(timer.reload, 7_999);
    }

    #[test]
    fn timer_is_reprogrammed_from_zeroed_state() {
        let mut timer = SimTimer::new();
        // Stale state as a debugger could leave it.
        timer.reload = 0xDEAD;
        timer.running = true;
        init(&mut timer, Hertz(4_000_000));
        assert_eq!(
            timer.ops(),
            [
                TimerOp::Stop,
                TimerOp::SetReload(3_999),
                TimerOp::ClearCurrent,
                TimerOp::Start,
            ]
        );
        assert!(timer.running);
        assert!(timer.interrupt_enabled);
    }

    #[test]
    fn ticks_increment_by_one() {
        let tb = Timebase::new();
        assert_eq!(tb.millis(), 0);
        tb.on_tick();
        tb.on_tick();
        assert_eq!(tb.millis(), 2);
    }

    #[test]
    fn counter_wraps_without_appearing_to_go_backwards() {
        let tb = Timebase::with_ticks(u32::MAX);
        let start = tb.millis();
        tb.on_tick();
        assert_eq!(tb.millis(), 0);
        assert_eq!(tb.elapsed_since(start), 1);
    }

    #[test]
    fn delay_zero_returns_without_a_tick() {
        let tb = Timebase::new();
        tb.delay_ms(0);
    }

    #[test]
    fn delay_blocks_for_the_requested_ticks_and_little_more() {
        let tb = Timebase::new();
        let stop = AtomicBool::new(false);
        std::thread::scope(|s| {
            s.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    std::thread::sleep(Duration::from_millis(5));
                    tb.on_tick();
                }
            });
            let start = tb.millis();
            tb.delay_ms(10);
            let elapsed = tb.elapsed_since(start);
            stop.store(true, Ordering::Relaxed);
            assert!(elapsed >= 10);
            assert!(elapsed <= 11);
        });
    }

    #[test]
    fn delay_spans_the_counter_wrap() {
        let tb = Timebase::with_ticks(u32::MAX - 2);
        let stop = AtomicBool::new(false);
        std::thread::scope(|s| {
            s.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    std::thread::sleep(Duration::from_millis(1));
                    tb.on_tick();
                }
            });
            let start = tb.millis();
            tb.delay_ms(10);
            let elapsed = tb.elapsed_since(start);
            stop.store(true, Ordering::Relaxed);
            assert!(elapsed >= 10);
        });
    }
}
