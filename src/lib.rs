#![no_std]
#![doc = include_str!("../README.md")]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

#[cfg(test)]
extern crate std;

pub mod arch;
pub mod board;
pub mod build_id;
pub mod gpio;
pub mod rcc;
pub mod systick;
pub mod time;
pub mod timebase;

#[cfg(any(feature = "nucleo-l432kc", feature = "stm32f3discovery"))]
pub mod chips;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

pub use board::Board;
pub use time::Hertz;

/// HAL configuration passed to [`init`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    /// Drive the indicator ON before clock bring-up, so a bring-up that
    /// hangs forever is distinguishable from code that never ran.
    pub early_signature: bool,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            early_signature: false,
        }
    }

    pub const fn with_early_signature(mut self, early_signature: bool) -> Self {
        self.early_signature = early_signature;
        self
    }
}

cfg_if::cfg_if! {
    if #[cfg(any(feature = "nucleo-l432kc", feature = "stm32f3discovery"))] {
        use core::sync::atomic::{AtomicBool, Ordering};

        use crate::chips::active as chip;

        /// The chip singletons: clock controller, board support, core timer.
        ///
        /// One owned value for everything this crate touches; components
        /// borrow only the piece they drive.
        pub struct Peripherals {
            pub clock: chip::Clock,
            pub led: chip::LedSupport,
            pub systick: systick::CoreSysTick,
        }

        static PERIPHERALS_TAKEN: AtomicBool = AtomicBool::new(false);

        impl Peripherals {
            /// Take the peripheral singletons.
            ///
            /// # Panics
            ///
            /// Panics if called more than once.
            pub fn take() -> Self {
                critical_section::with(|_| {
                    if PERIPHERALS_TAKEN.swap(true, Ordering::Relaxed) {
                        panic!("peripherals taken more than once");
                    }
                });
                unsafe { Self::steal() }
            }

            /// Unconditionally create the singletons.
            ///
            /// # Safety
            ///
            /// Must not alias a previously taken set.
            pub unsafe fn steal() -> Self {
                Self {
                    clock: unsafe { chip::Clock::steal() },
                    led: unsafe { chip::LedSupport::steal() },
                    systick: unsafe { systick::CoreSysTick::steal() },
                }
            }
        }

        /// Initialize the HAL: clock bring-up, board, millisecond timebase.
        ///
        /// On return the system clock is fixed at the profile's known
        /// frequency for the remainder of execution, the indicator is OFF,
        /// the 1 kHz tick is running and interrupts are unmasked.
        ///
        /// This should only be called once at startup, otherwise it panics.
        pub fn init(config: Config) -> Board<chip::LedSupport> {
            let mut p = Peripherals::take();

            if config.early_signature {
                Board::early_signature(&mut p.led);
            }

            // Masked until SysTick has been reprogrammed from explicitly
            // zeroed state; a stale configuration left by a debugger must
            // not produce a mistimed first tick.
            timebase::irq_disable();

            chip::init_clock(&mut p.clock);
            let board = Board::init(p.led);
            timebase::init(&mut p.systick, rcc::sysclk());

            timebase::irq_enable();

            info!("bring-up complete: sysclk {} Hz", rcc::sysclk().0);
            board
        }
    }
}
