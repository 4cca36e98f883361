//! STM32L4 profile (NUCLEO-L432KC).
//!
//! Register subset per RM0394 as used here: RCC for the MSI bring-up and
//! peripheral clock enables, GPIOB for the indicator on PB3, SYSCFG to
//! disable the SWO trace output that shares PB3.

use volatile_register::RW;

use crate::board::BoardSupport;
use crate::chips::impl_gpio_bank;
use crate::rcc::{self, ClockController, Clocks};
use crate::time::Hertz;

/// System clock after bring-up: MSI at range 6.
pub const SYSCLK: Hertz = Hertz(4_000_000);

const RCC_BASE: usize = 0x4002_1000;
const GPIOB_BASE: usize = 0x4800_0400;
const SYSCFG_BASE: usize = 0x4001_0000;

const CR_MSION: u32 = 1 << 0;
const CR_MSIRDY: u32 = 1 << 1;
const CR_PLLON: u32 = 1 << 24;
const CR_PLLRDY: u32 = 1 << 25;

// CFGR SW[1:0] system clock switch: 00 = MSI, read back in SWS[3:2].
const CFGR_SW_MASK: u32 = 0b11;
const CFGR_SWS_MASK: u32 = 0b11 << 2;

// ICSCR MSIRANGE[7:4], range 6 = 4 MHz.
const ICSCR_MSIRANGE_MASK: u32 = 0xF << 4;
const ICSCR_MSIRANGE_4MHZ: u32 = 6 << 4;

const AHB2ENR_GPIOBEN: u32 = 1 << 1;
const APB2ENR_SYSCFGEN: u32 = 1 << 0;
const CFGR1_TRACESWO_DISABLE: u32 = 1 << 24;

/// Indicator pin: PB3, shared with the SWO trace output.
const LED_PIN: u8 = 3;

#[repr(C)]
struct RccRegs {
    cr: RW<u32>,
    icscr: RW<u32>,
    cfgr: RW<u32>,
    _reserved0: [u32; 16],
    ahb2enr: RW<u32>,
    _reserved1: [u32; 4],
    apb2enr: RW<u32>,
}

#[repr(C)]
struct SyscfgRegs {
    cfgr1: RW<u32>,
}

fn rcc_regs() -> &'static RccRegs {
    unsafe { &*(RCC_BASE as *const RccRegs) }
}

fn syscfg_regs() -> &'static SyscfgRegs {
    unsafe { &*(SYSCFG_BASE as *const SyscfgRegs) }
}

/// RCC clock controller.
pub struct Clock {
    _private: (),
}

impl Clock {
    pub(crate) unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl ClockController for Clock {
    const SYSCLK: Hertz = SYSCLK;

    fn enable_oscillator(&mut self) {
        unsafe { rcc_regs().cr.modify(|v| v | CR_MSION) };
    }

    fn oscillator_ready(&self) -> bool {
        rcc_regs().cr.read() & CR_MSIRDY != 0
    }

    fn set_frequency_range(&mut self) {
        unsafe {
            rcc_regs()
                .icscr
                .modify(|v| (v & !ICSCR_MSIRANGE_MASK) | ICSCR_MSIRANGE_4MHZ);
        }
    }

    fn select_oscillator(&mut self) {
        unsafe { rcc_regs().cfgr.modify(|v| v & !CFGR_SW_MASK) };
    }

    fn oscillator_selected(&self) -> bool {
        rcc_regs().cfgr.read() & CFGR_SWS_MASK == 0
    }

    fn pll_enabled(&self) -> bool {
        rcc_regs().cr.read() & CR_PLLON != 0
    }

    fn disable_pll(&mut self) {
        unsafe { rcc_regs().cr.modify(|v| v & !CR_PLLON) };
    }

    fn pll_ready(&self) -> bool {
        rcc_regs().cr.read() & CR_PLLRDY != 0
    }
}

/// Run the MSI bring-up and record the resulting frequency.
pub(crate) fn init_clock(clock: &mut Clock) {
    rcc::bring_up(clock);
    unsafe { rcc::set_freqs(Clocks { sysclk: SYSCLK }) };
}

/// GPIOB, host bank of the indicator.
pub struct LedBank {
    _private: (),
}

impl_gpio_bank!(LedBank, GPIOB_BASE);

/// Board support: LED on PB3, which resets to the SWO trace function.
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
            rcc_regs().ahb2enr.modify(|v| v | AHB2ENR_GPIOBEN);
            rcc_regs().apb2enr.modify(|v| v | APB2ENR_SYSCFGEN);
        });
    }

    fn release_pin(&mut self) {
        unsafe { syscfg_regs().cfgr1.modify(|v| v | CFGR1_TRACESWO_DISABLE) };
    }

    fn bank(&mut self) -> &mut LedBank {
        &mut self.bank
    }
}
