use crate::mock_server::MockServerFixture;
use medvise_client::types::HistoryEntry;
use medvise_client::{Backend, Conversation, Error, Locale, MessageKind, Phase};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn chat_sends_message_with_prior_history() {
    let mut fixture = MockServerFixture::new().await;
    let greeting = Locale::English.strings().greeting;
    let mock = fixture
        .mock_chat(
            json!({
                "message": "Glucose 130, albumin 2.9",
                "history": [{"type": "assistant", "content": greeting}]
            }),
            200,
            r#"{
                "response": "**TPN plan**\n- Protein: 70 g",
                "prediction": {"Total Calorie": 1800, "Protein": 70.5, "Lipid": 50},
                "references": [
                    {"source": "/data/uploads/aspen.pdf", "content": "Critically ill adults..."},
                    {"filename": "espen.md", "source": "x", "content": "ESPEN"}
                ]
            }"#,
        )
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::with_greeting(Locale::English);
    conversation.set_input("Glucose 130, albumin 2.9");
    let reply = conversation.send(&client).await.unwrap().clone();

    mock.assert_async().await;
    assert_eq!(reply.kind, MessageKind::Assistant);
    assert_eq!(reply.content, "**TPN plan**\n- Protein: 70 g");
    let keys: Vec<&str> = reply.prediction.as_ref().unwrap().iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["Total Calorie", "Protein", "Lipid"]);
    let refs = reply.references.unwrap();
    assert_eq!(refs[0].display_name(), "aspen.pdf");
    assert_eq!(refs[1].display_name(), "espen.md");
    assert_eq!(conversation.messages().len(), 3);
    assert!(!conversation.is_awaiting());
}

#[tokio::test]
async fn second_turn_carries_whole_log() {
    let mut fixture = MockServerFixture::new().await;
    let _first = fixture
        .mock_chat(
            json!({"message": "first", "history": []}),
            200,
            r#"{"response": "one"}"#,
        )
        .await;
    let second = fixture
        .mock_chat(
            json!({
                "message": "second",
                "history": [
                    {"type": "user", "content": "first"},
                    {"type": "assistant", "content": "one"}
                ]
            }),
            200,
            r#"{"response": "two"}"#,
        )
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new(Locale::English);
    conversation.set_input("first");
    conversation.send(&client).await.unwrap();
    conversation.set_input("second");
    let reply = conversation.send(&client).await.unwrap();

    assert_eq!(reply.content, "two");
    second.assert_async().await;
}

#[tokio::test]
async fn server_error_message_comes_from_body() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "POST",
            "/api/chat",
            500,
            r#"{"error": "Failed to get response from ML backend"}"#,
        )
        .await;

    let err = fixture.client().send_message("hi", &[]).await.unwrap_err();
    match err {
        Error::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Failed to get response from ML backend");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_json_uses_generic_message() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("POST", "/api/chat")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = fixture.client().send_message("hi", &[]).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Server { status: 502, ref message } if message == "The server returned an error"
    ));
}

#[tokio::test]
async fn failed_chat_becomes_apology() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("POST", "/api/chat", 503, r#"{"error": "busy"}"#)
        .await;

    let client = fixture.client();
    let mut conversation = Conversation::new(Locale::Korean);
    conversation.set_input("질문");
    let reply = conversation.send(&client).await.unwrap();
    assert_eq!(reply.content, Locale::Korean.strings().apology);
    assert!(reply.prediction.is_none());
    assert_eq!(conversation.messages().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn timeout_is_a_network_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_stalled("POST", "/api/chat", 200, Duration::from_secs(2))
        .await;

    let client = fixture.client_with_timeout(Duration::from_millis(200));
    let err = client.send_message("slow", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }), "got {err:?}");

    let mut conversation = Conversation::new(Locale::English);
    conversation.set_input("slow");
    let reply = conversation.send(&client).await.unwrap();
    assert_eq!(reply.content, Locale::English.strings().apology);
    assert_eq!(reply.kind, MessageKind::Assistant);
    assert_eq!(conversation.messages().len(), 2);
    assert_eq!(conversation.phase(), Phase::Idle);
}

#[tokio::test(flavor = "multi_thread")]
async fn error_status_with_stalled_body_is_a_server_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_stalled("POST", "/api/chat", 500, Duration::from_secs(2))
        .await;

    let client = fixture.client_with_timeout(Duration::from_millis(200));
    let err = client.send_message("hi", &[]).await.unwrap_err();
    assert!(
        matches!(
            err,
            Error::Server { status: 500, ref message } if message == "The server returned an error"
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn degraded_answer_is_still_an_answer() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "POST",
            "/api/chat",
            200,
            r#"{"response": "Partial answer", "error": "prediction unavailable"}"#,
        )
        .await;

    let history = [HistoryEntry {
        kind: MessageKind::User,
        content: "earlier".into(),
    }];
    let response = fixture.client().send_message("hi", &history).await.unwrap();
    assert_eq!(response.response, "Partial answer");
    assert_eq!(response.error.as_deref(), Some("prediction unavailable"));
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let client = medvise_client::ApiClient::builder()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    let err = client.check_health().await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
}
