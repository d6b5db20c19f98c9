//! GPIO configuration and line access.
//!
//! Thin wrappers over the raw ESP-IDF GPIO calls, used by
//! [`EspPeripherals`](crate::adapters::hardware::EspPeripherals).
//! `gpio_set_level` / `gpio_get_level` are plain register accesses and are
//! safe to call from the timer ISR.

use esp_idf_svc::sys::*;
use log::{error, info};

use crate::app::ports::{LineId, PortError, PullBias};

/// Highest GPIO number on the ESP32-S3.
const MAX_GPIO: LineId = 48;

fn check_line(pin: LineId) -> Result<(), PortError> {
    if (0..=MAX_GPIO).contains(&pin) {
        Ok(())
    } else {
        Err(PortError::LineUnavailable(pin))
    }
}

fn apply(pin: LineId, cfg: &gpio_config_t) -> Result<(), PortError> {
    // SAFETY: gpio_config only touches the IO-mux/GPIO registers of the
    // pins in `pin_bit_mask`; called from the single start-up path.
    let ret = unsafe { gpio_config(cfg) };
    if ret != ESP_OK as i32 {
        error!("hw_init: gpio_config({}) failed (rc={})", pin, ret);
        return Err(PortError::LineUnavailable(pin));
    }
    Ok(())
}

pub fn configure_output(pin: LineId) -> Result<(), PortError> {
    check_line(pin)?;
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        ..Default::default()
    };
    apply(pin, &cfg)?;
    gpio_write(pin, false);
    info!("hw_init: GPIO{} → output", pin);
    Ok(())
}

pub fn configure_input(pin: LineId, bias: PullBias) -> Result<(), PortError> {
    check_line(pin)?;
    let (up, down) = match bias {
        PullBias::None => (
            gpio_pullup_t_GPIO_PULLUP_DISABLE,
            gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        ),
        PullBias::Up => (
            gpio_pullup_t_GPIO_PULLUP_ENABLE,
            gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        ),
        PullBias::Down => (
            gpio_pullup_t_GPIO_PULLUP_DISABLE,
            gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        ),
    };
    // Polled only: no GPIO interrupt.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: up,
        pull_down_en: down,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        ..Default::default()
    };
    apply(pin, &cfg)?;
    info!("hw_init: GPIO{} → input ({:?})", pin, bias);
    Ok(())
}

pub fn gpio_read(pin: LineId) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

pub fn gpio_write(pin: LineId, high: bool) {
    // SAFETY: gpio_set_level writes the output register of a pin validated
    // by configure_output(); ISR-safe.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}
