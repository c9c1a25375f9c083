use std::{
    fs,
    path::PathBuf,
    process::{Command, Output},
};

fn snake_arcade(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snake-arcade"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["--headless", "--log-level", "warn"])
        .args(args)
        .output()
        .expect("failed to launch snake-arcade")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn headless_run_prints_banner_and_score() {
    let output = snake_arcade(&["--max-ticks", "5", "--seed", "1"]);
    assert!(output.status.success(), "{output:?}");

    let text = stdout(&output);
    assert!(text.contains("SNAKE ARCADE"), "{text}");
    assert!(text.contains("Score:"), "{text}");
    assert!(text.contains("after 5 ticks"), "{text}");
}

#[test]
fn config_file_shrinks_the_board_until_the_wall_is_hit() {
    let path: PathBuf =
        std::env::temp_dir().join(format!("snake-arcade-{}.toml", std::process::id()));
    fs::write(&path, "seed = 3\n\n[board]\ncolumns = 12\nrows = 12\n").expect("write config");

    let config = path.to_str().expect("utf-8 path");
    let output = snake_arcade(&["--max-ticks", "40", "--config", config]);
    let _ = fs::remove_file(&path);
    assert!(output.status.success(), "{output:?}");

    let text = stdout(&output);
    assert!(text.contains("GAME OVER"), "{text}");
    assert!(text.contains("Score:"), "{text}");
}

#[test]
fn missing_config_file_is_reported() {
    let output = snake_arcade(&["--config", "does-not-exist.toml"]);

    assert!(!output.status.success());
    let errors = String::from_utf8_lossy(&output.stderr);
    assert!(errors.contains("failed to read config"), "{errors}");
}
