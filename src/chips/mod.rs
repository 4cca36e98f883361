//! Per-family register profiles.
//!
//! Exactly one board-profile feature selects the active chip. Only the
//! register subset this crate touches is mapped; addresses and bit layouts
//! are the bit-exact boundary against the silicon.

use volatile_register::{RW, WO};

#[cfg(all(feature = "nucleo-l432kc", feature = "stm32f3discovery"))]
compile_error!(
    "Select exactly one board profile: `nucleo-l432kc` or `stm32f3discovery`."
);

#[cfg(feature = "nucleo-l432kc")]
pub mod stm32l4;

#[cfg(feature = "stm32f3discovery")]
pub mod stm32f3;

cfg_if::cfg_if! {
    if #[cfg(feature = "nucleo-l432kc")] {
        pub use stm32l4 as active;
    } else if #[cfg(feature = "stm32f3discovery")] {
        pub use stm32f3 as active;
    }
}

/// STM32 GPIO register block; both supported families share the layout.
#[repr(C)]
pub(crate) struct GpioRegs {
    /// MODER: 2-bit mode field per pin.
    pub moder: RW<u32>,
    _reserved: [u32; 4],
    /// ODR: output levels.
    pub odr: RW<u32>,
    /// BSRR: bit `n` sets pin `n`, bit `n + 16` clears it.
    pub bsrr: WO<u32>,
}

macro_rules! impl_gpio_bank {
    ($bank:ty, $base:expr) => {
        impl $bank {
            fn regs(&self) -> &'static $crate::chips::GpioRegs {
                unsafe { &*($base as *const $crate::chips::GpioRegs) }
            }
        }

        impl $crate::gpio::GpioBank for $bank {
            fn set_mode(&mut self, pin: u8, mode: $crate::gpio::PinMode) {
                let shift = u32::from(pin) * 2;
                unsafe {
                    self.regs()
                        .moder
                        .modify(|v| (v & !(0b11 << shift)) | ((mode as u32) << shift));
                }
            }

            fn set(&mut self, pin: u8) {
                unsafe { self.regs().bsrr.write(1 << u32::from(pin)) };
            }

            fn clear(&mut self, pin: u8) {
                unsafe { self.regs().bsrr.write(1 << (u32::from(pin) + 16)) };
            }

            fn toggle(&mut self, pin: u8) {
                unsafe { self.regs().odr.modify(|v| v ^ (1 << u32::from(pin))) };
            }

            fn output_level(&self, pin: u8) -> $crate::gpio::Level {
                ((self.regs().odr.read() >> u32::from(pin)) & 1 == 1).into()
            }
        }
    };
}
pub(crate) use impl_gpio_bank;
