//! Architecture layer: the global interrupt mask (Cortex-M PRIMASK).
//!
//! A single flag, not a nesting counter; see [`crate::timebase::irq_enable`]
//! for the caller contract. Off-target builds compile these to no-ops so the
//! simulated backend can run; the sim models its own mask flag.

/// Globally mask interrupts.
#[inline]
pub fn irq_mask() {
    #[cfg(target_arch = "arm")]
    cortex_m::interrupt::disable();
}

/// Globally unmask interrupts.
///
/// # Safety
///
/// May end a critical section another caller still relies on; the mask is a
/// plain toggle.
#[inline]
pub unsafe fn irq_unmask() {
    #[cfg(target_arch = "arm")]
    unsafe {
        cortex_m::interrupt::enable()
    };
}
