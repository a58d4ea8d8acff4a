use jumpy_core::{MovementInput, UiEvent};
use jumpy_rendering_macroquad::{TickScheduler, MAX_TICKS_PER_FRAME};

const STEP: f32 = TickScheduler::STEP_SECONDS;

fn run_frames(frame_times: &[f32]) -> Vec<usize> {
    let mut scheduler = TickScheduler::default();
    frame_times
        .iter()
        .map(|&elapsed| scheduler.advance(elapsed, MovementInput::IDLE).len())
        .collect()
}

#[test]
fn sixty_hertz_frames_run_one_tick_each() {
    let ticks = run_frames(&[STEP * 1.01; 10]);
    assert!(ticks.iter().all(|&count| count == 1), "{ticks:?}");
}

#[test]
fn fast_frames_accumulate_before_ticking() {
    assert_eq!(run_frames(&[STEP * 0.4, STEP * 0.4, STEP * 0.4]), vec![0, 0, 1]);
}

#[test]
fn long_stalls_are_capped() {
    let ticks = run_frames(&[1.0, 0.0]);
    assert_eq!(ticks[0], MAX_TICKS_PER_FRAME as usize);
    assert!(ticks[1] <= 1, "backlog must be dropped: {ticks:?}");
}

#[test]
fn negative_frame_times_are_ignored() {
    assert_eq!(run_frames(&[-1.0, STEP * 1.01]), vec![0, 1]);
}

#[test]
fn interface_events_wait_for_the_next_tick() {
    let mut scheduler = TickScheduler::default();
    scheduler.queue([UiEvent::PrimaryClick { x: 200.0, y: 410.0 }]);

    assert!(scheduler.advance(STEP * 0.5, MovementInput::LEFT).is_empty());
    assert_eq!(scheduler.pending_events(), 1);

    scheduler.queue([UiEvent::Quit]);
    let inputs = scheduler.advance(STEP * 2.0, MovementInput::LEFT);

    assert_eq!(inputs.len(), 2);
    assert_eq!(
        inputs[0].ui_events,
        vec![UiEvent::PrimaryClick { x: 200.0, y: 410.0 }, UiEvent::Quit]
    );
    assert!(inputs[1].ui_events.is_empty());
    assert!(inputs.iter().all(|input| input.movement == MovementInput::LEFT));
    assert_eq!(scheduler.pending_events(), 0);
}
