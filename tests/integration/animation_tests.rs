//! Integration tests: rotation and brightness driven through the ISR half,
//! with mode changes coming in through the button lines.

use ledring::animation::{
    AnimationState, BrightnessLevel, Color, ModeController, PositionMask, RotationPeriod,
};
use ledring::app::ports::LineId;
use ledring::app::service::{ANIMATION, start};
use ledring::config::RingConfig;
use ledring::pins::PinMap;

use crate::mock_hw::{RecordingSink, SimBoard, rig, run_periods};

/// Press `button` at `now_ms` and release it 10 ms later.
fn press(board: &SimBoard, controller: &mut ModeController<'_>, button: LineId, now_ms: u32) {
    let mut sink = RecordingSink::new();
    board.set_input(button, false);
    controller.poll(board, now_ms, &mut sink);
    board.set_input(button, true);
    controller.poll(board, now_ms + 10, &mut sink);
}

#[test]
fn ring_starts_dark_on_leftmost_position() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (animator, _controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();

    assert_eq!(animator.state().mask(), PositionMask::from_bits(0x8000));
    assert_eq!(animator.state().ticks(), 0);
    assert_eq!(board.ring_bits(&pins), 0);
    assert!(!board.level(pins.red));
    assert_eq!(board.period(), Some(1000));
    assert_eq!(board.compare(), Some(999));
}

#[test]
fn one_step_per_251_overflows_at_fastest_speed() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, _controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();

    assert_eq!(run_periods(&mut animator, &board, 250), 0);
    assert_eq!(state.mask().bits(), 0x8000);
    assert_eq!(state.ticks(), 250);

    assert!(animator.on_overflow(&board));
    assert_eq!(state.mask().bits(), 0x4000);
    assert_eq!(state.ticks(), 0);
    // D15 is lit in the same period that moved the mask.
    assert_eq!(board.ring_bits(&pins), 0x4000);

    assert_eq!(state.color(), Color::Red);
    assert_eq!(state.brightness(), BrightnessLevel::Full);
}

#[test]
fn full_lap_wraps_back_to_start() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, _controller) = rig(&board, &state, &RingConfig::default());

    let steps = run_periods(&mut animator, &board, 16 * 251);
    assert_eq!(steps, 16);
    assert_eq!(state.mask().bits(), 0x8000);
}

#[test]
fn short_ring_uses_its_own_start_position() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let config = RingConfig {
        ring_size: 8,
        ..RingConfig::default()
    };
    let (mut animator, _controller) = rig(&board, &state, &config);
    let pins = PinMap::board();

    assert_eq!(state.mask().bits(), 0x80);
    animator.on_overflow(&board);
    assert_eq!(board.ring_bits(&pins), 0x80);
    assert!(!board.is_output(pins.ring[8]));

    run_periods(&mut animator, &board, 8 * 251);
    assert_eq!(state.mask().bits(), 0x80);
}

#[test]
fn exactly_one_position_lit_while_on() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, _controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();

    for _ in 0..(3 * 251) {
        animator.on_overflow(&board);
        assert_eq!(board.ring_bits(&pins).count_ones(), 1);
        assert_eq!(board.ring_bits(&pins), state.mask().bits());
        animator.on_compare(&board);
        assert_eq!(board.ring_bits(&pins), 0);
    }
}

#[test]
fn compare_threshold_tracks_each_brightness_level() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();

    let expected = [
        (BrightnessLevel::Full, 999),
        (BrightnessLevel::ThreeQuarter, 750),
        (BrightnessLevel::Half, 500),
        (BrightnessLevel::Quarter, 250),
    ];
    for (i, (level, compare)) in expected.into_iter().enumerate() {
        if i > 0 {
            press(&board, &mut controller, pins.brightness_button, i as u32 * 1000);
        }
        assert_eq!(state.brightness(), level);

        animator.on_overflow(&board);
        assert_eq!(board.compare(), Some(compare), "{level}");
        assert_ne!(board.ring_bits(&pins), 0, "on before compare at {level}");

        animator.on_compare(&board);
        assert_eq!(board.ring_bits(&pins), 0, "off after compare at {level}");
        // Color select stays driven while the ring is blanked.
        assert!(board.level(pins.red));
    }

    // Fourth press wraps back to full.
    press(&board, &mut controller, pins.brightness_button, 5000);
    animator.on_overflow(&board);
    assert_eq!(board.compare(), Some(999));
}

#[test]
fn color_change_switches_color_lines_on_next_overflow() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();

    animator.on_overflow(&board);
    assert!(board.level(pins.red));
    assert!(!board.level(pins.green));

    press(&board, &mut controller, pins.color_button, 0);
    assert_eq!(state.color(), Color::Green);
    // Nothing changes until the ISR picks it up.
    assert!(board.level(pins.red));

    animator.on_compare(&board);
    animator.on_overflow(&board);
    assert!(!board.level(pins.red));
    assert!(board.level(pins.green));
    assert!(!board.level(pins.blue));
}

#[test]
fn mode_changes_do_not_disturb_rotation() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();

    run_periods(&mut animator, &board, 100);
    press(&board, &mut controller, pins.color_button, 0);
    press(&board, &mut controller, pins.brightness_button, 0);
    assert_eq!(state.ticks(), 100);
    assert_eq!(state.mask().bits(), 0x8000);

    assert_eq!(run_periods(&mut animator, &board, 151), 1);
    assert_eq!(state.mask().bits(), 0x4000);
}

#[test]
fn steady_ring_only_toggles_the_lit_line() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, _controller) = rig(&board, &state, &RingConfig::default());

    // First period drives the color lines and D16.
    run_periods(&mut animator, &board, 1);
    let before = board.output_writes();

    // Same mask and color: one write on, one write off per period.
    run_periods(&mut animator, &board, 10);
    assert_eq!(board.output_writes() - before, 20);
}

#[test]
fn faster_speed_mid_count_steps_on_next_overflow() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();
    let mut sink = RecordingSink::new();

    board.set_input(pins.speed_sw1, false);
    board.set_input(pins.speed_sw2, false);
    controller.poll(&board, 0, &mut sink);
    assert_eq!(state.speed(), RotationPeriod::Slowest);

    assert_eq!(run_periods(&mut animator, &board, 600), 0);
    assert_eq!(state.ticks(), 600);

    board.set_input(pins.speed_sw1, true);
    board.set_input(pins.speed_sw2, true);
    controller.poll(&board, 5, &mut sink);
    assert_eq!(state.speed(), RotationPeriod::Fastest);

    // 601 already exceeds the fastest threshold.
    assert!(animator.on_overflow(&board));
    assert_eq!(state.ticks(), 0);
    assert_eq!(state.mask().bits(), 0x4000);

    // From here on the normal fastest cadence applies.
    animator.on_compare(&board);
    assert_eq!(run_periods(&mut animator, &board, 250), 0);
    assert_eq!(run_periods(&mut animator, &board, 1), 1);
    assert_eq!(state.mask().bits(), 0x2000);
}

/// The only test in this binary that goes through the global slot.
#[test]
fn start_reseeds_global_state_for_a_short_ring() {
    let board: &'static SimBoard = Box::leak(Box::new(SimBoard::new()));
    let pins = PinMap::board();
    let config = RingConfig {
        ring_size: 8,
        ..RingConfig::default()
    };
    assert_eq!(ANIMATION.mask().bits(), 0x8000);

    let _controller = start(board, &ANIMATION, &config, &pins).unwrap();
    assert_eq!(ANIMATION.mask().bits(), 0x80);
    assert_eq!(ANIMATION.ticks(), 0);
    assert!(board.timer_enabled());
    assert!(board.is_output(pins.ring[7]));
    assert!(!board.is_output(pins.ring[8]));

    for _ in 0..251 {
        board.run_period();
    }
    assert_eq!(ANIMATION.mask().bits(), 0x40);

    for _ in 0..7 * 251 {
        board.run_period();
    }
    assert_eq!(ANIMATION.mask().bits(), 0x80);
    assert_eq!(board.ring_bits(&pins) & 0xff00, 0);
}
