use std::{fs, process::Command};

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chess-with-guns"))
}

#[test]
fn headless_ai_match_reports_a_winner_and_writes_statistics() {
    let stats = std::env::temp_dir().join(format!(
        "chess-with-guns-headless-{}.csv",
        std::process::id()
    ));
    let output = binary()
        .args(["--headless", "--seed", "17", "--white-ai", "--black-ai"])
        .arg("--stats")
        .arg(&stats)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the chess-with-guns binary");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(" won after "), "unexpected output: {stdout}");

    let csv = fs::read_to_string(&stats).expect("statistics file written");
    let _ = fs::remove_file(&stats);
    assert!(csv.starts_with("turn,white_health,white_damage,black_health,black_damage,distance\n"));
    assert!(csv.lines().count() > 1);
}

#[test]
fn headless_mode_refuses_human_players() {
    let output = binary()
        .args(["--headless", "--white-ai", "false"])
        .output()
        .expect("failed to launch the chess-with-guns binary");

    assert!(!output.status.success());
}

#[test]
fn identical_seeds_replay_identically() {
    let run = || {
        binary()
            .args([
                "--headless",
                "--seed",
                "4",
                "--white-ai",
                "--black-ai",
                "--targeting",
                "nearest",
            ])
            .env("RUST_LOG", "off")
            .output()
            .expect("failed to launch the chess-with-guns binary")
    };

    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}
