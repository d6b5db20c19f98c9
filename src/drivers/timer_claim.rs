//! One-shot claim on a hardware timer.
//!
//! The claim flag is only set once setup has fully succeeded.  A failed
//! setup leaves the timer unclaimed so start-up can be retried, and a setup
//! that loses the race to another claimant hands its resource back through
//! `discard`.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::app::ports::PortError;

/// Run `setup` and claim `flag` if it succeeds.
///
/// `setup` reports failure as a raw ESP-IDF return code and must release
/// anything it created before returning it.
pub fn claim_after_setup<H>(
    flag: &AtomicBool,
    setup: impl FnOnce() -> Result<H, i32>,
    discard: impl FnOnce(H),
) -> Result<H, PortError> {
    if flag.load(Ordering::Acquire) {
        return Err(PortError::TimerUnavailable);
    }
    let resource = setup().map_err(PortError::InvalidTimerConfig)?;
    if flag
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        discard(resource);
        return Err(PortError::TimerUnavailable);
    }
    Ok(resource)
}
