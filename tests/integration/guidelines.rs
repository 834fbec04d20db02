use crate::mock_server::MockServerFixture;
use medvise_client::guidelines::GuidelineManager;
use medvise_client::{Backend, Error, Guideline, Locale, UploadFile};
use mockito::Matcher;
use std::sync::Arc;

fn manager(fixture: &MockServerFixture) -> GuidelineManager {
    GuidelineManager::new(Arc::new(fixture.client()), Locale::English)
}

#[tokio::test]
async fn lists_guidelines() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "GET",
            "/api/guidelines",
            200,
            r#"{"guidelines": [{"filename": "espen.md", "size": 512}, {"filename": "aspen.pdf", "size": 3145728}]}"#,
        )
        .await;

    let list = fixture.client().list_guidelines().await.unwrap();
    assert_eq!(
        list,
        vec![
            Guideline::new("espen.md", 512),
            Guideline::new("aspen.pdf", 3_145_728)
        ]
    );
    assert_eq!(list[1].display_size(), "3.0 MB");
}

#[tokio::test]
async fn upload_sends_one_multipart_request_then_refreshes() {
    let mut fixture = MockServerFixture::new().await;
    let upload = fixture
        .server
        .mock("POST", "/api/guidelines")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::Regex(r#"name="file"; filename="notes.pdf""#.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "File uploaded successfully", "filename": "notes.pdf"}"#)
        .expect(1)
        .create_async()
        .await;
    let list = fixture
        .mock_json(
            "GET",
            "/api/guidelines",
            200,
            r#"{"guidelines": [{"filename": "notes.pdf", "size": 13}]}"#,
        )
        .await;

    let m = manager(&fixture);
    let result = m
        .upload_file(UploadFile::new("notes.pdf", b"%PDF-1.4 test".to_vec()))
        .await
        .unwrap();

    upload.assert_async().await;
    list.assert_async().await;
    assert_eq!(result.filename.as_deref(), Some("notes.pdf"));
    assert_eq!(m.guidelines(), vec![Guideline::new("notes.pdf", 13)]);
    assert_eq!(m.selected_name(), None);
    assert_eq!(
        m.success_notice().as_deref(),
        Some(Locale::English.strings().upload_succeeded)
    );
}

#[tokio::test]
async fn rejected_extension_never_reaches_the_server() {
    let mut fixture = MockServerFixture::new().await;
    let upload = fixture
        .server
        .mock("POST", "/api/guidelines")
        .expect(0)
        .create_async()
        .await;

    let m = manager(&fixture);
    let err = m
        .upload_file(UploadFile::new("notes.docx", b"PK".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedFileType { ref filename, .. } if filename == "notes.docx"));
    upload.assert_async().await;
}

#[tokio::test]
async fn failed_upload_keeps_selection_and_reports() {
    let mut fixture = MockServerFixture::new().await;
    let _upload = fixture
        .mock_json(
            "POST",
            "/api/guidelines",
            400,
            r#"{"error": "File type not allowed"}"#,
        )
        .await;

    let m = manager(&fixture);
    let err = m
        .upload_file(UploadFile::new("notes.md", b"# x".to_vec()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Server { status: 400, .. }));
    assert_eq!(m.selected_name().as_deref(), Some("notes.md"));
    assert_eq!(
        m.error_notice().as_deref(),
        Some(Locale::English.strings().upload_failed)
    );
}

#[tokio::test]
async fn delete_encodes_filename_as_one_segment() {
    let mut fixture = MockServerFixture::new().await;
    let delete = fixture
        .mock_json(
            "DELETE",
            "/api/guidelines/my%20notes.md",
            200,
            r#"{"message": "Guideline deleted successfully"}"#,
        )
        .await;
    let _list = fixture
        .mock_json("GET", "/api/guidelines", 200, r#"{"guidelines": []}"#)
        .await;

    let m = manager(&fixture);
    m.delete("my notes.md", &true).await.unwrap();

    delete.assert_async().await;
    assert_eq!(
        m.success_notice(),
        Some(Locale::English.strings().delete_succeeded_for("my notes.md"))
    );
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let mut fixture = MockServerFixture::new().await;
    let delete = fixture
        .server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let m = manager(&fixture);
    let err = m.delete("espen.md", &false).await.unwrap_err();
    assert!(err.is_cancellation());
    delete.assert_async().await;
}

#[tokio::test]
async fn missing_guideline_delete_is_a_server_error() {
    let mut fixture = MockServerFixture::new().await;
    let _delete = fixture
        .mock_json(
            "DELETE",
            "/api/guidelines/gone.md",
            404,
            r#"{"error": "Guideline not found"}"#,
        )
        .await;

    let m = manager(&fixture);
    let err = m.delete("gone.md", &true).await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 404, ref message } if message == "Guideline not found"));
    assert_eq!(
        m.error_notice().as_deref(),
        Some(Locale::English.strings().delete_failed)
    );
}

#[tokio::test]
async fn fetches_raw_content() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("GET", "/api/guidelines/espen.md")
        .with_status(200)
        .with_header("content-type", "text/plain; charset=utf-8")
        .with_body("# ESPEN\n\nProtein 1.3 g/kg")
        .create_async()
        .await;

    let content = fixture
        .client()
        .fetch_guideline_content("espen.md")
        .await
        .unwrap();
    assert_eq!(content, "# ESPEN\n\nProtein 1.3 g/kg");
}

#[tokio::test]
async fn failed_refresh_keeps_previous_list() {
    let mut fixture = MockServerFixture::new().await;
    let ok = fixture
        .mock_json(
            "GET",
            "/api/guidelines",
            200,
            r#"{"guidelines": [{"filename": "a.md", "size": 1}]}"#,
        )
        .await;

    let m = manager(&fixture);
    assert!(m.refresh().await.unwrap());
    ok.remove_async().await;

    let _broken = fixture
        .mock_json("GET", "/api/guidelines", 500, r#"{"error": "disk"}"#)
        .await;
    assert!(m.refresh().await.is_err());
    assert_eq!(m.guidelines(), vec![Guideline::new("a.md", 1)]);
    assert_eq!(
        m.error_notice().as_deref(),
        Some(Locale::English.strings().list_failed)
    );
}

#[tokio::test]
async fn health_keeps_extra_fields() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "GET",
            "/api/health",
            200,
            r#"{"status": "healthy", "guidelines_count": 2}"#,
        )
        .await;

    let health = fixture.client().check_health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.extra.get("guidelines_count"), Some(&serde_json::json!(2)));
}
