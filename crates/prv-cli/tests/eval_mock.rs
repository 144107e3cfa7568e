use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn text_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/plain; charset=utf-8")
        .set_body_string(body.to_string())
}

#[tokio::test]
async fn test_eval_typesets_response() {
    let mock_server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/eval"))
        .and(header("content-type", "text/plain; charset=utf-8"))
        .and(body_string("theorem and_comm"))
        .respond_with(text_response("goal: $P \\land Q \\vdash Q \\land P$"))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("prv")
        .env("PRV_HOME", home.path())
        .env("PRV_BACKEND_URL", mock_server.uri())
        .args(["eval", "theorem and_comm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("goal: P ∧ Q ⊢ Q ∧ P"));
}

#[tokio::test]
async fn test_eval_raw_skips_typesetting() {
    let mock_server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/eval"))
        .respond_with(text_response("$1+1$"))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("prv")
        .env("PRV_HOME", home.path())
        .env("PRV_BACKEND_URL", mock_server.uri())
        .args(["eval", "--raw", "compute 1+1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$1+1$"));
}

#[tokio::test]
async fn test_eval_malformed_math_falls_back_to_literal() {
    let mock_server = MockServer::start().await;
    let home = tempdir().unwrap();

    // One good span, one unterminated one: the good span renders and the
    // bad one passes through untouched.
    Mock::given(method("POST"))
        .and(path("/eval"))
        .respond_with(text_response("$1+1$ and $bad"))
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("prv")
        .env("PRV_HOME", home.path())
        .env("PRV_BACKEND_URL", mock_server.uri())
        .args(["eval", "q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1+1 and $bad"));
}

#[tokio::test]
async fn test_eval_reports_http_error_from_json_body() {
    let mock_server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/eval"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("content-type", "application/json")
                .set_body_string(r#"{"error":"evaluator crashed"}"#),
        )
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("prv")
        .env("PRV_HOME", home.path())
        .env("PRV_BACKEND_URL", mock_server.uri())
        .args(["eval", "q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 500: evaluator crashed"));
}

#[tokio::test]
async fn test_eval_reports_unreachable_backend() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("prv")
        .env("PRV_HOME", home.path())
        // Port 9 (discard) is about as refusable as it gets.
        .env("PRV_BACKEND_URL", "http://127.0.0.1:9")
        .args(["eval", "q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not reach evaluator"));
}

#[tokio::test]
async fn test_backend_url_flag_overrides_env_and_config() {
    let mock_server = MockServer::start().await;
    let home = tempdir().unwrap();
    std::fs::write(
        home.path().join("config.toml"),
        "backend_url = \"http://127.0.0.1:9\"\n",
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/eval"))
        .respond_with(text_response("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("prv")
        .env("PRV_HOME", home.path())
        // Both env and config point somewhere dead; the flag wins.
        .env("PRV_BACKEND_URL", "http://127.0.0.1:9")
        .args(["--backend-url", &mock_server.uri(), "eval", "q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}
