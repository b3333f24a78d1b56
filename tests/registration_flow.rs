// Integration tests for the registration handshake: the mount-time
// capability gate, challenge request, local creation, and the verdict.

use std::sync::Arc;

use passlink::codec;
use passlink::testing::constants::{TEST_CHALLENGE, TEST_CREDENTIAL_ID, TEST_USER_HANDLE};
use passlink::testing::{
    MockAuthenticator, MockPage, RecordingView, ScriptedTransport, TestFixtures, ViewEvent,
};
use passlink::{AuthenticatorError, BeginRegistration, FlowOutcome, PasskeyRegistration};

struct Harness {
    transport: Arc<ScriptedTransport>,
    authenticator: Arc<MockAuthenticator>,
    view: Arc<RecordingView>,
    component: PasskeyRegistration,
}

fn harness(authenticator: MockAuthenticator) -> Harness {
    let transport = Arc::new(ScriptedTransport::new());
    let authenticator = Arc::new(authenticator);
    let view = Arc::new(RecordingView::new());
    let component = PasskeyRegistration::attach(
        TestFixtures::relying_party_settings(),
        transport.clone(),
        authenticator.clone(),
        Arc::new(MockPage::with_token("csrf-1")),
        view.clone(),
    );
    Harness {
        transport,
        authenticator,
        view,
        component,
    }
}

fn supported_harness() -> Harness {
    harness(MockAuthenticator::supported())
}

fn label(value: &str) -> BeginRegistration {
    BeginRegistration {
        label: Some(value.to_string()),
    }
}

#[tokio::test]
async fn unsupported_platform_disables_the_flow_permanently() {
    let h = harness(MockAuthenticator::unsupported());

    assert!(!h.component.is_armed());
    assert_eq!(h.view.events(), vec![ViewEvent::PasskeysUnsupported]);

    // A begin-signal after an unsupported mount is a no-op: no outcome, no
    // outbound network call, no further events.
    let outcome = h.component.begin(label("Phone")).await;
    assert_eq!(outcome, None);
    assert_eq!(h.transport.request_count(), 0);
    assert_eq!(h.view.events(), vec![ViewEvent::PasskeysUnsupported]);
}

#[tokio::test]
async fn supported_platform_arms_the_flow_silently() {
    let h = supported_harness();

    assert!(h.component.is_armed());
    assert!(h.view.events().is_empty());
}

#[tokio::test]
async fn begin_error_passes_server_message_through() {
    let h = supported_harness();
    h.transport.enqueue(429, r#"{"error": "rate limited"}"#);

    let outcome = h.component.begin(label("Phone")).await;

    assert_eq!(
        outcome,
        Some(FlowOutcome::Errored("rate limited".to_string()))
    );
    assert_eq!(
        h.view.events(),
        vec![ViewEvent::RegisterError("rate limited".to_string())]
    );
}

#[tokio::test]
async fn begin_error_with_unparsable_body_falls_back() {
    let h = supported_harness();
    h.transport.enqueue(500, "<html>Internal Server Error</html>");

    let outcome = h.component.begin(label("Phone")).await;

    assert_eq!(
        outcome,
        Some(FlowOutcome::Errored("Failed to start registration".to_string()))
    );
}

#[tokio::test]
async fn successful_enrollment_emits_exactly_one_registered_event() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Ok(TestFixtures::attestation()));
    h.transport
        .enqueue(200, r#"{"ok": true, "id": "abc", "label": "Phone"}"#);

    let outcome = h.component.begin(label("Phone")).await;

    assert_eq!(
        outcome,
        Some(FlowOutcome::Registered {
            id: "abc".to_string(),
            label: Some("Phone".to_string()),
        })
    );
    assert_eq!(
        h.view.events(),
        vec![ViewEvent::Registered {
            id: "abc".to_string(),
            label: Some("Phone".to_string()),
        }]
    );
}

#[tokio::test]
async fn challenge_options_reach_the_platform_decoded_and_verbatim() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Ok(TestFixtures::attestation()));
    h.transport.enqueue(200, r#"{"ok": true, "id": "abc"}"#);

    h.component.begin(label("Phone")).await;

    let requests = h.authenticator.creation_requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    // Decoded by the codec
    assert_eq!(request.challenge, TEST_CHALLENGE.to_vec());
    assert_eq!(request.user.id, TEST_USER_HANDLE.to_vec());
    assert_eq!(
        request.exclude_credentials,
        vec![TEST_CREDENTIAL_ID.to_vec()]
    );
    // Passed through verbatim
    assert_eq!(request.rp.id, "example.com");
    assert_eq!(request.user.display_name, "Test User");
    assert_eq!(request.attestation, "none");
    let algs: Vec<i32> = request.pub_key_cred_params.iter().map(|p| p.alg).collect();
    assert_eq!(algs, vec![-7, -257]);
    assert_eq!(
        request.authenticator_selection.resident_key.as_deref(),
        Some("preferred")
    );
}

#[tokio::test]
async fn completion_body_carries_encoded_attestation_and_label() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Ok(TestFixtures::attestation()));
    h.transport
        .enqueue(200, r#"{"ok": true, "id": "abc", "label": "Phone"}"#);

    h.component.begin(label("Phone")).await;

    let requests = h.transport.requests();
    assert_eq!(requests[0].path, "/webauthn/register/begin");
    assert_eq!(requests[1].path, "/webauthn/register/complete");

    let body = requests[1].body.as_ref().expect("completion body");
    let attestation = TestFixtures::attestation();
    assert_eq!(
        body["attestation_object"],
        codec::encode(&attestation.attestation_object)
    );
    assert_eq!(
        body["client_data_json"],
        codec::encode(&attestation.client_data_json)
    );
    assert_eq!(body["label"], "Phone");
}

#[tokio::test]
async fn absent_label_is_posted_as_null() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Ok(TestFixtures::attestation()));
    h.transport.enqueue(200, r#"{"ok": true, "id": "abc"}"#);

    let outcome = h.component.begin(BeginRegistration::default()).await;

    let requests = h.transport.requests();
    let body = requests[1].body.as_ref().expect("completion body");
    assert!(body["label"].is_null());
    assert_eq!(
        outcome,
        Some(FlowOutcome::Registered {
            id: "abc".to_string(),
            label: None,
        })
    );
}

#[tokio::test]
async fn cancellation_surfaces_fixed_reason() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Err(AuthenticatorError::Cancelled));

    let outcome = h.component.begin(label("Phone")).await;

    assert_eq!(outcome, Some(FlowOutcome::Errored("cancelled".to_string())));
    assert_eq!(
        h.view.events(),
        vec![ViewEvent::RegisterError("cancelled".to_string())]
    );
}

#[tokio::test]
async fn platform_failure_without_message_falls_back() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Err(AuthenticatorError::Failed(None)));

    let outcome = h.component.begin(label("Phone")).await;

    assert_eq!(
        outcome,
        Some(FlowOutcome::Errored("Registration failed".to_string()))
    );
}

#[tokio::test]
async fn unparsable_verdict_reports_server_error_with_status() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Ok(TestFixtures::attestation()));
    h.transport.enqueue(502, "<html>Bad Gateway</html>");

    let outcome = h.component.begin(label("Phone")).await;

    assert_eq!(
        outcome,
        Some(FlowOutcome::Errored("Server error (502)".to_string()))
    );
}

#[tokio::test]
async fn rejected_verdict_passes_server_message_through() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Ok(TestFixtures::attestation()));
    h.transport
        .enqueue(422, r#"{"ok": false, "error": "credential already registered"}"#);

    let outcome = h.component.begin(label("Phone")).await;

    assert_eq!(
        outcome,
        Some(FlowOutcome::Errored(
            "credential already registered".to_string()
        ))
    );
}

#[tokio::test]
async fn rejected_verdict_without_message_falls_back() {
    let h = supported_harness();
    h.transport
        .enqueue(200, &TestFixtures::registration_challenge_body());
    h.authenticator
        .script_attestation(Ok(TestFixtures::attestation()));
    h.transport.enqueue(200, r#"{"ok": false}"#);

    let outcome = h.component.begin(label("Phone")).await;

    assert_eq!(
        outcome,
        Some(FlowOutcome::Errored("Registration failed".to_string()))
    );
}
