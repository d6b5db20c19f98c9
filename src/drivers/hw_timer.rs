//! Periodic timer with overflow and compare channels on one GPTimer.
//!
//! The ESP32-S3 GPTimer has a single alarm, so the two channels are
//! emulated by re-targeting that alarm from its own ISR:
//!
//! ```text
//!   count  0 ─────── compare ─────────────── period ─▶ (reload to 0)
//!   alarm            ▲ compare phase          ▲ overflow phase
//!   action           compare handler,         overflow handler,
//!                    arm period + reload      arm compare
//! ```
//!
//! The compare value is read when the overflow phase re-arms the alarm, so
//! [`set_compare`] called from the overflow handler takes effect in the
//! same period.

use core::ffi::c_void;
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::OnceLock;

use esp_idf_svc::sys::*;
use log::{error, info, warn};

use super::timer_claim::claim_after_setup;
use crate::app::ports::{IsrHandler, PortError, TimerHandle};

static CONFIGURED: AtomicBool = AtomicBool::new(false);
static PERIOD_TICKS: AtomicU16 = AtomicU16::new(0);
static COMPARE_TICKS: AtomicU16 = AtomicU16::new(0);
/// `true` while the alarm is armed for the compare count.
static AWAITING_COMPARE: AtomicBool = AtomicBool::new(true);

static OVERFLOW_HANDLER: OnceLock<IsrHandler> = OnceLock::new();
static COMPARE_HANDLER: OnceLock<IsrHandler> = OnceLock::new();

static mut GPTIMER: gptimer_handle_t = core::ptr::null_mut();

/// SAFETY: GPTIMER is written once in `configure()` before the timer is
/// enabled; afterwards it is only read.
unsafe fn gptimer() -> gptimer_handle_t {
    unsafe { GPTIMER }
}

/// The only timer this adapter hands out.
const HANDLE: TimerHandle = TimerHandle::new(0);

/// SAFETY: must run in the GPTimer ISR or before the timer starts.
unsafe fn arm(timer: gptimer_handle_t, count: u16, reload: bool) -> esp_err_t {
    let mut alarm = gptimer_alarm_config_t {
        alarm_count: u64::from(count),
        reload_count: 0,
        ..Default::default()
    };
    alarm.flags.set_auto_reload_on_alarm(u32::from(reload));
    unsafe { gptimer_set_alarm_action(timer, &alarm) }
}

unsafe extern "C" fn on_alarm(
    timer: gptimer_handle_t,
    _edata: *const gptimer_alarm_event_data_t,
    _ctx: *mut c_void,
) -> bool {
    // No logging in ISR context; the re-arm rc is dropped.
    if AWAITING_COMPARE.load(Ordering::Relaxed) {
        if let Some(handler) = COMPARE_HANDLER.get() {
            handler();
        }
        AWAITING_COMPARE.store(false, Ordering::Relaxed);
        // SAFETY: ISR context of this timer.
        let _ = unsafe { arm(timer, PERIOD_TICKS.load(Ordering::Relaxed), true) };
    } else {
        if let Some(handler) = OVERFLOW_HANDLER.get() {
            handler();
        }
        AWAITING_COMPARE.store(true, Ordering::Relaxed);
        // SAFETY: ISR context of this timer.
        let _ = unsafe { arm(timer, COMPARE_TICKS.load(Ordering::Relaxed), false) };
    }
    // No task woken.
    false
}

/// SAFETY: `timer` was created by `gptimer_new_timer` and is not running.
unsafe fn discard(timer: gptimer_handle_t) {
    let ret = unsafe { gptimer_del_timer(timer) };
    if ret != ESP_OK {
        warn!("hw_timer: gptimer_del_timer failed (rc={})", ret);
    }
}

/// Create the GPTimer at `tick_hz` with the given period and compare.
///
/// A failed attempt deletes whatever it created and leaves the timer free
/// for a retry.
pub fn configure(tick_hz: u32, period_ticks: u16, compare_ticks: u16) -> Result<TimerHandle, PortError> {
    if compare_ticks == 0 || compare_ticks >= period_ticks {
        return Err(PortError::InvalidTimerConfig(ESP_ERR_INVALID_ARG));
    }

    let cfg = gptimer_config_t {
        clk_src: soc_periph_gptimer_clk_src_t_GPTIMER_CLK_SRC_DEFAULT,
        direction: gptimer_count_direction_t_GPTIMER_COUNT_UP,
        resolution_hz: tick_hz,
        ..Default::default()
    };
    let callbacks = gptimer_event_callbacks_t {
        on_alarm: Some(on_alarm),
    };

    // SAFETY: the new handle stays local until claimed; no callback fires
    // before the timer is enabled.
    let setup = || unsafe {
        let mut timer: gptimer_handle_t = core::ptr::null_mut();
        let ret = gptimer_new_timer(&cfg, &mut timer);
        if ret != ESP_OK {
            error!("hw_timer: gptimer_new_timer failed (rc={})", ret);
            return Err(ret);
        }
        let ret = gptimer_register_event_callbacks(timer, &callbacks, core::ptr::null_mut());
        if ret != ESP_OK {
            error!("hw_timer: callback registration failed (rc={})", ret);
            discard(timer);
            return Err(ret);
        }
        let ret = arm(timer, compare_ticks, false);
        if ret != ESP_OK {
            error!("hw_timer: gptimer_set_alarm_action failed (rc={})", ret);
            discard(timer);
            return Err(ret);
        }
        Ok(timer)
    };
    // SAFETY: a handle that lost the claim was never enabled.
    let timer = claim_after_setup(&CONFIGURED, setup, |t| unsafe { discard(t) })?;

    PERIOD_TICKS.store(period_ticks, Ordering::Relaxed);
    COMPARE_TICKS.store(compare_ticks, Ordering::Relaxed);
    AWAITING_COMPARE.store(true, Ordering::Relaxed);
    // SAFETY: the only write to GPTIMER, after the claim and before the
    // timer is enabled.
    unsafe { GPTIMER = timer };

    info!(
        "hw_timer: GPTimer @ {} Hz, period={} compare={}",
        tick_hz, period_ticks, compare_ticks
    );
    Ok(HANDLE)
}

pub fn register_overflow(timer: TimerHandle, handler: IsrHandler) {
    if timer != HANDLE || OVERFLOW_HANDLER.set(handler).is_err() {
        warn!("hw_timer: overflow handler already registered");
    }
}

pub fn register_compare(timer: TimerHandle, handler: IsrHandler) {
    if timer != HANDLE || COMPARE_HANDLER.set(handler).is_err() {
        warn!("hw_timer: compare handler already registered");
    }
}

pub fn set_compare(_timer: TimerHandle, compare_ticks: u16) {
    COMPARE_TICKS.store(compare_ticks, Ordering::Relaxed);
}

pub fn enable(_timer: TimerHandle) {
    // SAFETY: gptimer() contract: written once before this point.
    unsafe {
        let t = gptimer();
        if t.is_null() {
            warn!("hw_timer: enable before configure");
            return;
        }
        let ret = gptimer_enable(t);
        if ret != ESP_OK {
            error!("hw_timer: gptimer_enable failed (rc={})", ret);
            return;
        }
        let ret = gptimer_start(t);
        if ret != ESP_OK {
            error!("hw_timer: gptimer_start failed (rc={})", ret);
            return;
        }
    }
    info!("hw_timer: started");
}

pub fn disable(_timer: TimerHandle) {
    // SAFETY: gptimer() contract; null-check prevents use before configure.
    unsafe {
        let t = gptimer();
        if t.is_null() {
            return;
        }
        let ret = gptimer_stop(t);
        if ret != ESP_OK {
            error!("hw_timer: gptimer_stop failed (rc={})", ret);
        }
        let ret = gptimer_disable(t);
        if ret != ESP_OK {
            error!("hw_timer: gptimer_disable failed (rc={})", ret);
            return;
        }
    }
    info!("hw_timer: stopped");
}
