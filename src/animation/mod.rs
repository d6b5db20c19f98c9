//! LED ring animation core.
//!
//! ```text
//!  overflow ISR ──▶ Animator ──▶ RotationEngine ─┐
//!                     │                          ├──▶ AnimationState (atomics)
//!  compare ISR ──▶    └──▶ BrightnessModulator   │
//!                                                │
//!  main loop ────▶ ModeController ───────────────┘
//! ```
//!
//! ## Scheduling contract
//!
//! Single core.  The overflow and compare ISRs share the highest priority
//! and cannot preempt each other; the main loop never preempts either.
//! Within one period the overflow ISR runs first because every compare
//! threshold is below the period.
//!
//! Known hazard: with equal priorities nothing stops a compare interrupt
//! that keeps re-firing from delaying the overflow interrupt.  Not handled.

pub mod animator;
pub mod brightness;
pub mod controller;
pub mod rotation;
pub mod state;

pub use animator::Animator;
pub use controller::{ModeController, ModeInputs};
pub use state::{AnimationState, BrightnessLevel, Color, PositionMask, RotationPeriod, Snapshot};
