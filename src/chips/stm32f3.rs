//! STM32F3 profile (STM32F3DISCOVERY).
//!
//! This family accepts the reset-default clock (HSI); there is no bring-up
//! to run. The indicator is one of the discovery's LED-ring pins, PE12.

use volatile_register::RW;

use crate::board::BoardSupport;
use crate::chips::impl_gpio_bank;
use crate::rcc::{self, Clocks};
use crate::time::Hertz;

/// System clock: HSI at its reset default.
pub const SYSCLK: Hertz = Hertz(8_000_000);

const RCC_BASE: usize = 0x4002_1000;
const GPIOE_BASE: usize = 0x4800_1000;

const AHBENR_GPIOEEN: u32 = 1 << 21;

/// Indicator pin: PE12 (LD9).
const LED_PIN: u8 = 12;

#[repr(C)]
struct RccRegs {
    _reserved0: [u32; 5],
    ahbenr: RW<u32>,
}

fn rcc_regs() -> &'static RccRegs {
    unsafe { &*(RCC_BASE as *const RccRegs) }
}

/// RCC clock controller. Nothing to drive on this profile.
pub struct Clock {
    _private: (),
}

impl Clock {
    pub(crate) unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

/// Record the reset-default frequency; no state machine runs here.
pub(crate) fn init_clock(_clock: &mut Clock) {
    unsafe { rcc::set_freqs(Clocks { sysclk: SYSCLK }) };
}

/// GPIOE, host bank of the indicator.
pub struct LedBank {
    _private: (),
}

impl_gpio_bank!(LedBank, GPIOE_BASE);

/// Board support: LED on PE12; no competing pin function on this board.
pub struct LedSupport {
    bank: LedBank,
}

impl LedSupport {
    pub(crate) unsafe fn steal() -> Self {
        Self {
            bank: LedBank { _private: () },
        }
    }
}

impl BoardSupport for LedSupport {
    type Bank = LedBank;

    const LED_PIN: u8 = LED_PIN;

    fn enable_clocks(&mut self) {
        critical_section::with(|_| unsafe {
            rcc_regs().ahbenr.modify(|v| v | AHBENR_GPIOEEN);
        });
    }

    fn bank(&mut self) -> &mut LedBank {
        &mut self.bank
    }
}
