//! Integration tests: mode controller and main-loop polling.

use ledring::animation::{AnimationState, BrightnessLevel, Color, RotationPeriod};
use ledring::app::events::AppEvent;
use ledring::app::ports::TimePort;
use ledring::app::service::PollLoop;
use ledring::config::RingConfig;
use ledring::pins::PinMap;

use crate::mock_hw::{FakeClock, RecordingSink, SimBoard, rig, run_periods};

#[test]
fn inputs_are_pulled_up() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let _rig = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();

    for line in [pins.brightness_button, pins.color_button, pins.speed_sw1, pins.speed_sw2] {
        assert_eq!(board.bias(line), Some(ledring::app::ports::PullBias::Up));
    }
}

#[test]
fn idle_inputs_emit_nothing() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (_animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let mut sink = RecordingSink::new();

    for t in (0..2000).step_by(5) {
        controller.poll(&board, t, &mut sink);
    }
    assert!(sink.events.is_empty());
    assert_eq!(state.speed(), RotationPeriod::Fastest);
}

#[test]
fn brightness_button_cycles_four_levels() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (_animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();
    let mut sink = RecordingSink::new();

    let mut seen = Vec::new();
    for i in 0..4u32 {
        let t = i * 500;
        board.set_input(pins.brightness_button, false);
        controller.poll(&board, t, &mut sink);
        board.set_input(pins.brightness_button, true);
        controller.poll(&board, t + 50, &mut sink);
        seen.push(state.brightness());
    }

    assert_eq!(
        seen,
        [
            BrightnessLevel::ThreeQuarter,
            BrightnessLevel::Half,
            BrightnessLevel::Quarter,
            BrightnessLevel::Full,
        ]
    );
    let compares: Vec<u16> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::BrightnessChanged { compare_ticks, .. } => Some(*compare_ticks),
            _ => None,
        })
        .collect();
    assert_eq!(compares, [750, 500, 250, 999]);
}

#[test]
fn color_button_cycles_three_colors() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (_animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();
    let mut sink = RecordingSink::new();

    for i in 0..3u32 {
        board.set_input(pins.color_button, false);
        controller.poll(&board, i * 400, &mut sink);
        board.set_input(pins.color_button, true);
        controller.poll(&board, i * 400 + 20, &mut sink);
    }

    assert_eq!(
        sink.take(),
        [
            AppEvent::ColorChanged(Color::Green),
            AppEvent::ColorChanged(Color::Blue),
            AppEvent::ColorChanged(Color::Red),
        ]
    );
    assert_eq!(state.brightness(), BrightnessLevel::Full);
}

#[test]
fn contact_bounce_counts_as_one_press() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (_animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();
    let mut sink = RecordingSink::new();

    // Bouncing for 40 ms, then released well inside the settle window.
    for (t, pressed) in [(0, true), (5, false), (10, true), (20, false), (40, true), (60, false)] {
        board.set_input(pins.color_button, !pressed);
        controller.poll(&board, t, &mut sink);
    }
    controller.poll(&board, 1000, &mut sink);

    assert_eq!(sink.events, [AppEvent::ColorChanged(Color::Green)]);
}

#[test]
fn buttons_settle_independently() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (_animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();
    let mut sink = RecordingSink::new();

    board.set_input(pins.brightness_button, false);
    controller.poll(&board, 0, &mut sink);
    board.set_input(pins.brightness_button, true);

    // SB2 pressed while SB1 is still settling.
    board.set_input(pins.color_button, false);
    controller.poll(&board, 100, &mut sink);

    assert_eq!(state.brightness(), BrightnessLevel::ThreeQuarter);
    assert_eq!(state.color(), Color::Green);
    assert_eq!(sink.events.len(), 2);
}

#[test]
fn held_button_repeats_at_settle_rate() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (_animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();
    let mut sink = RecordingSink::new();

    board.set_input(pins.color_button, false);
    for t in (0..=600).step_by(5) {
        controller.poll(&board, t, &mut sink);
    }
    // Presses at 0, 300 and 600.
    assert_eq!(sink.events.len(), 3);
    assert_eq!(state.color(), Color::Red);
}

#[test]
fn speed_selector_maps_all_four_positions() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (_animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();
    let mut sink = RecordingSink::new();

    let cases = [
        (false, true, RotationPeriod::Fast, 416),
        (true, false, RotationPeriod::Slow, 583),
        (false, false, RotationPeriod::Slowest, 750),
        (true, true, RotationPeriod::Fastest, 250),
    ];
    for (t, (sw1, sw2, period, threshold)) in cases.into_iter().enumerate() {
        board.set_input(pins.speed_sw1, sw1);
        board.set_input(pins.speed_sw2, sw2);
        controller.poll(&board, t as u32, &mut sink);
        assert_eq!(state.speed(), period);
        assert_eq!(sink.take(), [AppEvent::SpeedChanged { period, threshold }]);

        // Level inputs: no repeat while the selector holds still.
        controller.poll(&board, t as u32 + 1, &mut sink);
        assert!(sink.events.is_empty());
    }
}

#[test]
fn slowest_speed_steps_every_751_overflows() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let (mut animator, mut controller) = rig(&board, &state, &RingConfig::default());
    let pins = PinMap::board();
    let mut sink = RecordingSink::new();

    board.set_input(pins.speed_sw1, false);
    board.set_input(pins.speed_sw2, false);
    controller.poll(&board, 0, &mut sink);

    assert_eq!(run_periods(&mut animator, &board, 750), 0);
    assert_eq!(run_periods(&mut animator, &board, 1), 1);
    assert_eq!(state.mask().bits(), 0x4000);
}

#[test]
fn poll_loop_reports_status_on_interval() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let config = RingConfig {
        status_interval_ms: 1000,
        ..RingConfig::default()
    };
    let (_animator, controller) = rig(&board, &state, &config);
    let clock = FakeClock::at(0);
    let mut sink = RecordingSink::new();
    let mut main_loop = PollLoop::new(controller, &config, clock.now_ms());

    while clock.now_ms() < 2500 {
        main_loop.step(&board, clock.now_ms(), &mut sink);
        clock.advance(config.poll_interval_ms);
    }

    let statuses: Vec<_> = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::Status(_)))
        .collect();
    assert_eq!(statuses.len(), 2);
    assert_eq!(*statuses[0], AppEvent::Status(state.snapshot()));
}

#[test]
fn poll_loop_survives_clock_wrap() {
    let board = SimBoard::new();
    let state = AnimationState::new(16);
    let config = RingConfig {
        status_interval_ms: 100,
        ..RingConfig::default()
    };
    let (_animator, controller) = rig(&board, &state, &config);
    let clock = FakeClock::at(u32::MAX - 50);
    let mut sink = RecordingSink::new();
    let mut main_loop = PollLoop::new(controller, &config, clock.now_ms());

    for _ in 0..30 {
        clock.advance(5);
        main_loop.step(&board, clock.now_ms(), &mut sink);
    }
    // 150 ms elapsed across the wrap.
    assert_eq!(sink.events.len(), 1);
}
