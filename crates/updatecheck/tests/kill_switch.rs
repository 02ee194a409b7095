use updatecheck::{Application, CheckOptions, CheckOutcome, Ledger, UpdateNotifier};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn engaged_kill_switch_skips_all_io() {
    // SAFETY: single test in this binary on a current-thread runtime; nothing
    // else touches the environment while it runs.
    unsafe {
        std::env::set_var("GRANTED_DISABLE_UPDATE_CHECK", "true");
        std::env::set_var("HOST_NO_UPDATE_CHECKS", "true");
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
    let ledger_dir = temp_dir.path().join("commonfate");
    let notifier = UpdateNotifier::with_ledger(Ledger::at(&ledger_dir));

    let default_switch = notifier.check(
        &Application::new("granted"),
        "1.0.0",
        true,
        &CheckOptions::new().endpoint(server.uri()),
    );
    let other_app = notifier.check(
        &Application::new("cf"),
        "1.0.0",
        true,
        &CheckOptions::new().endpoint(server.uri()),
    );
    let custom_switch = notifier.check(
        &Application::new("granted"),
        "1.0.0",
        true,
        &CheckOptions::new()
            .endpoint(server.uri())
            .kill_switch("HOST_NO_UPDATE_CHECKS"),
    );

    assert_eq!(default_switch, CheckOutcome::Disabled);
    assert_eq!(other_app, CheckOutcome::Disabled);
    assert_eq!(custom_switch, CheckOutcome::Disabled);
    assert!(!ledger_dir.exists());
    assert!(notifier.drain().await.is_empty());
}
