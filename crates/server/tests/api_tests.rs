#![cfg(feature = "db-tests")]

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::*;
use serde_json::{json, Value};

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("invalid JSON ({e}): {body}"))
}

fn full_draft() -> Value {
    json!({
        "court_level": "supreme",
        "filing_type": "petition",
        "petitioner_name": "Asha Verma",
        "respondent_name": "State of Kerala",
        "case_subject": "Land acquisition compensation",
        "advocate_name": "R. Nair",
        "enrollment_number": "KL/1234/2015",
        "email": "asha@example.com",
        "phone": "+91 98765 43210"
    })
}

/// Upload one PDF and return the attachment entry a draft would carry.
async fn upload_one(app: &Router, user: &str) -> Value {
    let (status, body) =
        upload_files(app, &[("petition.pdf", "application/pdf", b"%PDF-1.4 test")], user).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let uploaded = &parse(&body)["files"][0];
    json!({
        "file_id": uploaded["id"],
        "file_name": uploaded["filename"],
        "original_name": uploaded["original_name"],
        "file_size": uploaded["size"],
        "upload_date": uploaded["upload_date"]
    })
}

/// Drive a draft through save + upload + submit; returns (draft_id, total_amount).
async fn submitted_draft(app: &Router, user: &str) -> (String, i64) {
    let attachment = upload_one(app, user).await;

    let mut draft = full_draft();
    draft["uploaded_files"] = json!([attachment]);
    let (status, body) =
        post_json_as(app, "/api/efiling/drafts", &draft.to_string(), user).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft_id = parse(&body)["draft_id"].as_str().unwrap().to_string();

    let (status, body) = post_json_as(
        app,
        &format!("/api/efiling/drafts/{draft_id}/submit"),
        "",
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let submitted = parse(&body);
    assert!(submitted["filing_reference"]
        .as_str()
        .unwrap()
        .starts_with("FL"));
    (draft_id, submitted["total_amount"].as_i64().unwrap())
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = test_app().await;
    let (status, body) = get_as(&app, "/health", "health-user").await;
    assert_eq!(status, StatusCode::OK);
    let health = parse(&body);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["db"], "connected");
    assert!(health["drafts"].as_i64().unwrap() >= 0);
    assert!(health["files"].as_i64().unwrap() >= 0);
    assert!(health["version"].is_string());
}

#[tokio::test]
async fn partial_save_creates_draft_with_computed_fees() {
    let app = test_app().await;
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "court_level": "supreme", "filing_type": "petition" })
            .to_string(),
        "fees-user",
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft = parse(&body);
    assert!(draft["draft_id"].as_str().unwrap().starts_with("DRAFT"));
    assert_eq!(draft["status"], "draft");
    assert_eq!(draft["estimated_fee"], 5000);
    assert_eq!(draft["service_charge"], 50);
    assert_eq!(draft["total_amount"], 5050);
}

#[tokio::test]
async fn partial_save_with_no_content_is_rejected() {
    let app = test_app().await;
    let (status, _) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true }).to_string(),
        "empty-user",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_save_reports_every_missing_core_field() {
    let app = test_app().await;
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "court_level": "high" }).to_string(),
        "missing-user",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &parse(&body)["field_errors"];
    assert!(errors["filing_type"].is_string());
    assert!(errors["petitioner_name"].is_string());
    assert!(errors["enrollment_number"].is_string());
    assert!(errors.get("court_level").is_none());
}

#[tokio::test]
async fn malformed_email_and_phone_are_rejected() {
    let app = test_app().await;
    let mut draft = full_draft();
    draft["email"] = json!("not-an-email");
    draft["phone"] = json!("hello");
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &draft.to_string(),
        "invalid-user",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &parse(&body)["field_errors"];
    assert!(errors["email"].is_string());
    assert!(errors["phone"].is_string());
}

#[tokio::test]
async fn update_replaces_the_whole_form() {
    let app = test_app().await;
    let user = "replace-user";

    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "petitioner_name": "First Name", "notes": "keep?" })
            .to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft_id = parse(&body)["draft_id"].as_str().unwrap().to_string();

    // Re-save without petitioner_name or notes: both clear.
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "draft_id": draft_id, "case_subject": "New subject" })
            .to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let updated = parse(&body);
    assert_eq!(updated["case_subject"], "New subject");
    assert!(updated["petitioner_name"].is_null());
    assert!(updated["notes"].is_null());
}

#[tokio::test]
async fn updating_a_missing_draft_is_not_found() {
    let app = test_app().await;
    let (status, _) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "draft_id": "DRAFT0000000000000XXXXXX", "notes": "hi" })
            .to_string(),
        "ghost-user",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn drafts_are_scoped_to_their_owner() {
    let app = test_app().await;
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "notes": "mine" }).to_string(),
        "owner-a",
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft_id = parse(&body)["draft_id"].as_str().unwrap().to_string();

    let (status, _) = get_as(&app, &format!("/api/efiling/drafts/{draft_id}"), "owner-b").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_as(&app, &format!("/api/efiling/drafts/{draft_id}"), "owner-a").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn draft_list_paginates_and_filters_by_status() {
    let app = test_app().await;
    let user = "list-user";

    for i in 0..3 {
        let (status, _) = post_json_as(
            &app,
            "/api/efiling/drafts",
            &json!({ "partial": true, "notes": format!("draft {i}") }).to_string(),
            user,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_as(&app, "/api/efiling/drafts?page=1&limit=2", user).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let list = parse(&body);
    assert_eq!(list["drafts"].as_array().unwrap().len(), 2);
    assert_eq!(list["pagination"]["total_records"], 3);
    assert_eq!(list["pagination"]["total_pages"], 2);
    assert_eq!(list["pagination"]["current"], 1);

    let (status, body) = get_as(&app, "/api/efiling/drafts?status=submitted", user).await;
    assert_eq!(status, StatusCode::OK);
    assert!(parse(&body)["drafts"].as_array().unwrap().is_empty());

    let (status, _) = get_as(&app, "/api/efiling/drafts?status=bogus", user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_an_editable_draft_removes_it() {
    let app = test_app().await;
    let user = "delete-user";
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "notes": "ephemeral" }).to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft_id = parse(&body)["draft_id"].as_str().unwrap().to_string();

    let (status, _) = delete_as(&app, &format!("/api/efiling/drafts/{draft_id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_as(&app, &format!("/api/efiling/drafts/{draft_id}"), user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete_as(&app, &format!("/api/efiling/drafts/{draft_id}"), user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_rejects_incomplete_drafts() {
    let app = test_app().await;
    let user = "incomplete-user";
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "court_level": "high", "petitioner_name": "Solo" })
            .to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft_id = parse(&body)["draft_id"].as_str().unwrap().to_string();

    let (status, body) = post_json_as(
        &app,
        &format!("/api/efiling/drafts/{draft_id}/submit"),
        "",
        user,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &parse(&body)["field_errors"];
    assert!(errors["filing_type"].is_string());
    assert!(errors["respondent_name"].is_string());
    assert!(errors.get("court_level").is_none());
    assert!(errors.get("petitioner_name").is_none());
}

#[tokio::test]
async fn complete_draft_submits_without_attachments() {
    let app = test_app().await;
    let user = "no-attachment-user";
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &full_draft().to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft_id = parse(&body)["draft_id"].as_str().unwrap().to_string();

    // Documents can be filed physically; the form alone is enough.
    let (status, body) = post_json_as(
        &app,
        &format!("/api/efiling/drafts/{draft_id}/submit"),
        "",
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let submitted = parse(&body);
    assert_eq!(submitted["status"], "submitted");
    assert!(submitted["filing_reference"]
        .as_str()
        .unwrap()
        .starts_with("FL"));
}

#[tokio::test]
async fn submitted_drafts_are_frozen() {
    let app = test_app().await;
    let user = "frozen-user";
    let (draft_id, _) = submitted_draft(&app, user).await;

    // Second submit loses.
    let (status, _) = post_json_as(
        &app,
        &format!("/api/efiling/drafts/{draft_id}/submit"),
        "",
        user,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // No more edits.
    let (status, _) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "draft_id": draft_id, "notes": "late edit" }).to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // No deletion either.
    let (status, _) = delete_as(&app, &format!("/api/efiling/drafts/{draft_id}"), user).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn payment_flow_settles_and_is_idempotent() {
    let app = test_app().await;
    let user = "payment-user";
    let (draft_id, total) = submitted_draft(&app, user).await;

    let (status, body) = post_json_as(
        &app,
        "/api/payments/orders",
        &json!({ "draft_id": draft_id }).to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order = parse(&body);
    let order_id = order["order_id"].as_str().unwrap().to_string();
    assert!(order_id.starts_with("EFILING_"));
    assert_eq!(order["amount"].as_i64().unwrap(), total * 100);
    assert_eq!(order["currency"], "INR");
    assert_eq!(order["status"], "created");
    assert_eq!(order["receipt"], format!("receipt_{order_id}").as_str());

    let callback = json!({
        "order_id": order_id,
        "payment_id": "pay_test_001",
        "signature": sign(&order_id, "pay_test_001")
    });
    let (status, body) = post_json(&app, "/api/payments/callback", &callback.to_string()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let settled = parse(&body);
    let filing_number = settled["filing_number"].as_str().unwrap().to_string();
    assert!(filing_number.starts_with("EF"));
    assert_eq!(settled["status"], "paid");
    assert_eq!(settled["draft_id"], draft_id.as_str());

    // Replay returns the recorded outcome, not a second filing number.
    let (status, body) = post_json(&app, "/api/payments/callback", &callback.to_string()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(parse(&body)["filing_number"], filing_number.as_str());

    // The draft is now paid; further orders are refused.
    let (status, body) = get_as(&app, &format!("/api/efiling/drafts/{draft_id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["status"], "paid");

    let (status, _) = post_json_as(
        &app,
        "/api/payments/orders",
        &json!({ "draft_id": draft_id }).to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn callback_with_bad_signature_is_payment_required() {
    let app = test_app().await;
    let user = "badsig-user";
    let (draft_id, _) = submitted_draft(&app, user).await;

    let (status, body) = post_json_as(
        &app,
        "/api/payments/orders",
        &json!({ "draft_id": draft_id }).to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = parse(&body)["order_id"].as_str().unwrap().to_string();

    let callback = json!({
        "order_id": order_id,
        "payment_id": "pay_test_002",
        "signature": "deadbeef"
    });
    let (status, _) = post_json(&app, "/api/payments/callback", &callback.to_string()).await;
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);

    // Failed callbacks leave the draft submitted.
    let (status, body) = get_as(&app, &format!("/api/efiling/drafts/{draft_id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse(&body)["status"], "submitted");
}

#[tokio::test]
async fn callback_for_unknown_order_is_not_found() {
    let app = test_app().await;
    let callback = json!({
        "order_id": "EFILING_0_NOSUCHORD",
        "payment_id": "pay_test_003",
        "signature": sign("EFILING_0_NOSUCHORD", "pay_test_003")
    });
    let (status, _) = post_json(&app, "/api/payments/callback", &callback.to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_require_a_submitted_draft() {
    let app = test_app().await;
    let user = "unsubmitted-user";
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "notes": "still editing" }).to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft_id = parse(&body)["draft_id"].as_str().unwrap().to_string();

    let (status, _) = post_json_as(
        &app,
        "/api/payments/orders",
        &json!({ "draft_id": draft_id }).to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn upload_rejects_invalid_batches() {
    let app = test_app().await;
    let user = "upload-reject-user";

    let (status, _) = upload_files(&app, &[], user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        upload_files(&app, &[("movie.mp4", "video/mp4", b"frames")], user).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let oversize = vec![0u8; 10 * 1024 * 1024 + 1];
    let (status, _) =
        upload_files(&app, &[("big.pdf", "application/pdf", &oversize)], user).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let many: Vec<(&str, &str, &[u8])> = (0..11)
        .map(|_| ("page.txt", "text/plain", b"x".as_slice()))
        .collect();
    let (status, _) = upload_files(&app, &many, user).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn upload_requires_valid_declared_metadata() {
    let app = test_app().await;
    let user = "metadata-user";
    let pdf: &[(&str, &str, &[u8])] = &[("writ.pdf", "application/pdf", b"%PDF-1.4")];

    // No metadata at all.
    let (status, body) = upload_files_with(&app, pdf, &[], user).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    // Filing type outside the vocabulary.
    let (status, _) = upload_files_with(
        &app,
        pdf,
        &[
            ("filing_type", "memo"),
            ("court_level", "supreme"),
            ("category", "petition"),
        ],
        user,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown court level.
    let (status, _) = upload_files_with(
        &app,
        pdf,
        &[
            ("filing_type", "petition"),
            ("court_level", "tribunal"),
            ("category", "petition"),
        ],
        user,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown category.
    let (status, _) = upload_files_with(
        &app,
        pdf,
        &[
            ("filing_type", "petition"),
            ("court_level", "supreme"),
            ("category", "misc"),
        ],
        user,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Description over the cap.
    let long = "x".repeat(501);
    let (status, _) = upload_files_with(
        &app,
        pdf,
        &[
            ("filing_type", "petition"),
            ("court_level", "supreme"),
            ("category", "petition"),
            ("description", long.as_str()),
        ],
        user,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_records_declared_metadata() {
    let app = test_app().await;
    let user = "declared-user";
    let (status, body) = upload_files_with(
        &app,
        &[("affidavit.pdf", "application/pdf", b"%PDF-1.4 sworn")],
        &[
            ("filing_type", "appeal"),
            ("court_level", "high"),
            ("category", "affidavit"),
            ("description", "Sworn statement"),
            ("tags", "sworn, statement"),
        ],
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let file_id = parse(&body)["files"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = get_as(&app, &format!("/api/files/{file_id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    let details = parse(&body);
    assert_eq!(details["filing_type"], "appeal");
    assert_eq!(details["court_level"], "high");
    assert_eq!(details["category"], "affidavit");
    assert_eq!(details["description"], "Sworn statement");
    assert_eq!(details["tags"], json!(["sworn", "statement"]));
}

#[tokio::test]
async fn upload_download_and_delete_roundtrip() {
    let app = test_app().await;
    let user = "roundtrip-user";

    let (status, body) =
        upload_files(&app, &[("evidence.txt", "text/plain", b"exhibit A")], user).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let upload = parse(&body);
    assert_eq!(upload["summary"]["succeeded"], 1);
    assert_eq!(upload["summary"]["failed"], 0);
    let file = &upload["files"][0];
    let file_id = file["id"].as_str().unwrap().to_string();
    assert!(file["filename"].as_str().unwrap().starts_with("files-"));
    assert!(file["filename"].as_str().unwrap().ends_with(".txt"));
    assert_eq!(file["original_name"], "evidence.txt");

    let (status, body) = get_as(&app, &format!("/api/files/{file_id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    let details = parse(&body);
    assert_eq!(details["file_type"], "document");
    assert_eq!(details["status"], "uploaded");
    assert_eq!(details["extension"], ".txt");
    assert_eq!(details["readable_size"], "9 Bytes");
    assert_eq!(details["download_count"], 0);

    let (status, body) = get_as(&app, &format!("/api/files/{file_id}/download"), user).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "exhibit A");

    // Downloads are counted.
    let (status, body) = get_as(&app, &format!("/api/files/{file_id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    let details = parse(&body);
    assert_eq!(details["download_count"], 1);
    assert!(details["last_accessed"].is_string());

    let (status, _) = delete_as(&app, &format!("/api/files/{file_id}"), user).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_as(&app, &format!("/api/files/{file_id}/download"), user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = delete_as(&app, &format!("/api/files/{file_id}"), user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn files_attached_to_a_draft_cannot_be_deleted() {
    let app = test_app().await;
    let user = "attached-user";

    let attachment = upload_one(&app, user).await;
    let file_id = attachment["file_id"].as_str().unwrap().to_string();

    let mut draft = full_draft();
    draft["partial"] = json!(true);
    draft["uploaded_files"] = json!([attachment]);
    let (status, body) =
        post_json_as(&app, "/api/efiling/drafts", &draft.to_string(), user).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = delete_as(&app, &format!("/api/files/{file_id}"), user).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn draft_response_resolves_attachment_status() {
    let app = test_app().await;
    let user = "resolve-user";

    let attachment = upload_one(&app, user).await;
    let (status, body) = post_json_as(
        &app,
        "/api/efiling/drafts",
        &json!({ "partial": true, "uploaded_files": [attachment] }).to_string(),
        user,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let draft = parse(&body);
    assert_eq!(draft["uploaded_files"][0]["file_status"], "uploaded");
}

#[tokio::test]
async fn analytics_summary_has_totals_and_type_breakdown() {
    let app = test_app().await;
    let user = "analytics-user";
    upload_one(&app, user).await;

    let (status, body) = get_as(&app, "/api/files/analytics/summary", user).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let analytics = parse(&body);
    assert!(analytics["total_files"].as_i64().unwrap() >= 1);
    assert!(analytics["total_size"].as_i64().unwrap() >= 1);
    assert!(analytics["readable_total_size"].is_string());
    assert!(analytics["types"].as_array().unwrap().iter().any(|t| {
        t["file_type"] == "pdf" && t["count"].as_i64().unwrap() >= 1
    }));
    assert!(analytics["statuses"].as_array().unwrap().iter().any(|s| {
        s["status"] == "uploaded" && s["count"].as_i64().unwrap() >= 1
    }));
    assert!(analytics["categories"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["category"] == "petition"));
    let recent = analytics["recent_uploads"].as_array().unwrap();
    assert!(!recent.is_empty() && recent.len() <= 10);
    assert!(recent[0]["original_name"].is_string());
    assert!(recent[0]["days_since_upload"].as_i64().unwrap() >= 0);
}
