//! End-to-end runs against local mock APIs, configured through a config file.

use std::path::{Path, PathBuf};

use assert_cmd::assert::{Assert, OutputAssertExt};
use assert_cmd::Command;
use base64::Engine;
use predicates::prelude::*;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &Path, server: &MockServer) -> PathBuf {
    let config = dir.join("config.toml");
    std::fs::write(
        &config,
        format!(
            "[defaults]\noutput_dir = \"{out}\"\n\n[endpoints]\nopenai = \"{uri}\"\nstability = \"{uri}\"\n",
            out = dir.join("pics").display(),
            uri = server.uri(),
        ),
    )
    .unwrap();
    config
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: Command) -> Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap()).await.unwrap();
    output.assert()
}

fn base_cmd(work: &Path, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("genimg").unwrap();
    cmd.current_dir(work)
        .env_remove("GENIMG_REPLAY")
        .env_remove("GENIMG_REC")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn bogus_aspect_falls_back_to_square() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("Authorization", "Bearer sk-openai-test"))
        .and(body_partial_json(serde_json::json!({ "size": "1024x1024", "quality": "standard" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "url": format!("{}/files/out.png", server.uri()) }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"square".to_vec()))
        .mount(&server)
        .await;

    let work = tempfile::tempdir().unwrap();
    let config = write_config(work.path(), &server);
    let mut cmd = base_cmd(work.path(), &config);
    cmd.env("OPENAI_API_KEY", "sk-openai-test")
        .args(["--engine", "dalle", "--prompt", "a dog", "--aspect", "bogus"]);

    run(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("Aspect ratio 'bogus' is not supported"));

    let files: Vec<_> = std::fs::read_dir(work.path().join("pics")).unwrap().flatten().collect();
    assert_eq!(files.len(), 1);
    assert_eq!(std::fs::read(files[0].path()).unwrap(), b"square");
}

#[tokio::test(flavor = "multi_thread")]
async fn stable_failures_do_not_change_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/generation/stable-diffusion-v1-5/text-to-image"))
        .respond_with(ResponseTemplate::new(401).set_body_string("missing authorization"))
        .expect(2)
        .mount(&server)
        .await;

    let work = tempfile::tempdir().unwrap();
    let config = write_config(work.path(), &server);
    let mut cmd = base_cmd(work.path(), &config);
    cmd.env("STABILITY_API_KEY", "")
        .args(["--engine", "stable", "--prompt", "a cat", "--n", "2"]);

    run(cmd)
        .await
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No API key for Stable Diffusion"))
        .stderr(predicate::str::contains("Synthesis failed (401): missing authorization"))
        .stderr(predicate::str::contains("2 of 2 image(s) skipped"));

    assert_eq!(std::fs::read_dir(work.path().join("pics")).unwrap().count(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn stable_payload_carries_negative_prompt_and_seed() {
    let server = MockServer::start().await;
    let b64 = base64::engine::general_purpose::STANDARD.encode(b"seeded");
    Mock::given(method("POST"))
        .and(path("/v1/generation/stable-diffusion-v1-5/text-to-image"))
        .and(header("Authorization", "Bearer sk-stability-test"))
        .and(body_partial_json(serde_json::json!({
            "text_prompts": [
                { "text": "a cat", "weight": 1.0 },
                { "text": "blurry", "weight": -1.0 },
            ],
            "seed": 1234,
            "cfg_scale": 7,
            "clip_guidance_preset": "FAST_BLUE",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "artifacts": [{ "base64": b64 }] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let work = tempfile::tempdir().unwrap();
    let config = write_config(work.path(), &server);
    let mut cmd = base_cmd(work.path(), &config);
    cmd.env("STABILITY_API_KEY", "sk-stability-test").args([
        "--engine",
        "stable",
        "--prompt",
        "a cat",
        "--negative_prompt",
        "blurry",
        "--seed",
        "1234",
    ]);

    run(cmd).await.success().stdout(predicate::str::contains("local file, seed=1234"));

    let files: Vec<_> = std::fs::read_dir(work.path().join("pics")).unwrap().flatten().collect();
    assert_eq!(files.len(), 1);
    assert_eq!(std::fs::read(files[0].path()).unwrap(), b"seeded");
}
