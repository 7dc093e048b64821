use chess_with_guns_rendering_macroquad::RestartLatch;

fn run_sequence(sequence: &[bool]) -> Vec<bool> {
    let mut latch = RestartLatch::default();
    let mut restarts = Vec::new();
    for &pressed in sequence {
        restarts.push(latch.take());
        if pressed {
            latch.register();
        }
    }

    // Flush any trailing latched press so the harness observes the final request.
    restarts.push(latch.take());
    restarts
}

#[test]
fn restart_button_sequence_is_deterministic() {
    let button_sequence = [false, true, false, true, true, false];
    let expected = vec![false, false, true, false, true, true, false];

    let first_run = run_sequence(&button_sequence);
    let second_run = run_sequence(&button_sequence);

    assert_eq!(first_run, expected);
    assert_eq!(first_run, second_run);
}

#[test]
fn repeated_presses_within_a_frame_collapse_into_one_request() {
    let mut latch = RestartLatch::default();
    latch.register();
    latch.register();

    assert!(latch.take());
    assert!(!latch.take());
}
