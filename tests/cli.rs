use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

const PACK_URL: &str = "https://t.me/addstickers/examplepack";

fn combined_output(output: &std::process::Output) -> String {
    format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn stickerdl(workdir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("stickerdl"));
    cmd.current_dir(workdir)
        .env_remove("TELEGRAM_BOT_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_documented_flags() {
    let tmp = TempDir::new().unwrap();
    let output = stickerdl(tmp.path())
        .arg("--help")
        .output()
        .expect("--help runs");

    assert!(output.status.success());
    let text = combined_output(&output);
    for flag in ["--static-format", "--convert-tgs", "--output-dir", "--token"] {
        assert!(text.contains(flag), "help text missing {flag}: {text}");
    }
}

#[test]
fn invalid_url_fails_before_creating_anything() {
    let tmp = TempDir::new().unwrap();
    let output = stickerdl(tmp.path())
        .env("TELEGRAM_BOT_TOKEN", "123:abc")
        .args(["https://example.com/notapack", "--api-url", "http://127.0.0.1:9"])
        .output()
        .expect("stickerdl runs");

    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("invalid sticker pack URL"), "{text}");
    assert!(!tmp.path().join("downloads").exists());
}

#[test]
fn missing_token_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let output = stickerdl(tmp.path())
        .arg(PACK_URL)
        .output()
        .expect("stickerdl runs");

    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("no bot token found"), "{text}");
    assert!(!tmp.path().join("downloads").exists());
}

#[test]
fn malformed_config_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("config.toml"), "bot_token = [").unwrap();
    let output = stickerdl(tmp.path())
        .arg(PACK_URL)
        .output()
        .expect("stickerdl runs");

    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("could not read config file"), "{text}");
}

#[test]
fn unreachable_api_is_a_setup_error() {
    let tmp = TempDir::new().unwrap();
    let output = stickerdl(tmp.path())
        .args([
            PACK_URL,
            "--token",
            "123:abc",
            "--api-url",
            "http://127.0.0.1:9",
            "--timeout",
            "5",
        ])
        .output()
        .expect("stickerdl runs");

    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("could not reach the Bot API"), "{text}");
    assert!(!text.contains("123:abc"), "token leaked: {text}");
    assert!(!tmp.path().join("downloads").exists());
}
