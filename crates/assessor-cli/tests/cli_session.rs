//! Integration tests for login, status and logout through the binary.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn alice_json() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "alice",
        "email": "alice@example.com",
        "is_active": true,
        "role": "user"
    })
}

async fn mount_backend(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok1", "token_type": "bearer"})),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/users/me"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(alice_json()))
        .mount(server)
        .await;
}

/// The binary as a user would run it, with only the environment set
fn assessor_default(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("assessor");
    cmd.env("ASSESSOR_HOME", home.path())
        .env("ASSESSOR_API_URL", server.uri())
        .env("ASSESSOR_PASSWORD", "pw123")
        .env_remove("ASSESSOR_EMAIL");
    cmd
}

fn assessor(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = assessor_default(home, server);
    cmd.args(["--token-store", "file"]);
    cmd
}

#[tokio::test]
async fn test_login_status_logout() {
    let server = MockServer::start().await;
    mount_backend(&server).await;
    let home = TempDir::new().unwrap();

    assessor(&home, &server)
        .args(["login", "--email", "alice@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice (alice@example.com)"));

    let token_file = home.path().join("token.json");
    assert!(token_file.exists(), "token should be persisted");

    let config: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(home.path().join("config.json")).unwrap())
            .unwrap();
    assert_eq!(config["last_email"], "alice@example.com");

    assessor(&home, &server)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Username:       alice"))
        .stdout(predicate::str::contains("Account Status: Active"));

    assessor(&home, &server)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!token_file.exists(), "logout should remove the token");

    assessor(&home, &server)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[tokio::test]
async fn test_failed_login_reports_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    assessor(&home, &server)
        .args(["login", "--email", "alice@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect username or password"));

    assert!(!home.path().join("token.json").exists());
}

#[tokio::test]
async fn test_rejected_token_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/users/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("token.json"),
        r#"{"token": "expired", "stored_at": "2024-01-01T00:00:00Z"}"#,
    )
    .unwrap();

    assessor(&home, &server)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));

    assert!(!home.path().join("token.json").exists());
}

#[tokio::test]
async fn test_default_token_store_keeps_session_between_runs() {
    let server = MockServer::start().await;
    mount_backend(&server).await;
    let home = TempDir::new().unwrap();

    assessor_default(&home, &server)
        .args(["login", "--email", "alice@example.com"])
        .assert()
        .success();
    assert!(home.path().join("token.json").exists());

    assessor_default(&home, &server)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Username:       alice"))
        .stdout(predicate::str::contains("Logged In:      just now"));

    assessor_default(&home, &server).arg("logout").assert().success();
    assert!(!home.path().join("token.json").exists());
}

#[tokio::test]
async fn test_status_reports_uploaded_resume() {
    let server = MockServer::start().await;
    mount_backend(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/assessments/current"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "candidate_id": 1,
            "status": "pending",
            "resume_file_path": "uploads/resumes/1_cv.pdf",
            "created_at": "2024-05-01T10:00:00"
        })))
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    assessor(&home, &server)
        .args(["login", "--email", "alice@example.com"])
        .assert()
        .success();

    assessor(&home, &server)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Uploaded Resume: 1_cv.pdf (assessment #7)"));
}

#[tokio::test]
async fn test_status_without_assessment() {
    let server = MockServer::start().await;
    mount_backend(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/assessments/current"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"detail": "404: No assessment found for current user"})),
        )
        .mount(&server)
        .await;
    let home = TempDir::new().unwrap();

    assessor(&home, &server)
        .args(["login", "--email", "alice@example.com"])
        .assert()
        .success();

    assessor(&home, &server)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active assessment found"));
}
