use anyhow::Result;
use reqwest::{header::LOCATION, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{any, bearer_token, body_json, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{TestApp, TEST_API_KEY, TEST_AUDIENCE};

fn contacts_path() -> String {
    format!("/audiences/{TEST_AUDIENCE}/contacts")
}

fn created() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"object": "contact", "id": "c_123"}))
}

fn assert_redirected_to_thanks(res: &reqwest::Response) {
    assert_eq!(
        res.status(),
        StatusCode::SEE_OTHER,
        "Wrong response StatusCode: {}",
        res.status()
    );
    assert_eq!(
        res.headers().get(LOCATION).and_then(|l| l.to_str().ok()),
        Some("/thanks")
    );
}

#[tokio::test]
async fn subscribe_valid_email_adds_contact_and_redirects() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(contacts_path()))
        .and(method("POST"))
        .and(bearer_token(TEST_API_KEY))
        .and(body_json(
            json!({"email": "legion@rome.com", "unsubscribed": false}),
        ))
        .respond_with(created())
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscriptions(&[("email", "legion@rome.com"), ("honeypot-email", "")])
        .await?;

    assert_redirected_to_thanks(&res);

    Ok(())
}

#[tokio::test]
async fn subscribe_filled_honeypot_redirects_without_contacting_provider() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(created())
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let cases = [
        ("legion@rome.com", "bot@spam.com"),
        ("not an email", "anything"),
        ("", "x"),
    ];

    for (email, honeypot) in cases {
        let res = app
            .post_subscriptions(&[("email", email), ("honeypot-email", honeypot)])
            .await?;
        assert_redirected_to_thanks(&res);
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_400_when_email_is_missing_or_invalid() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(created())
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let cases: Vec<(Vec<(&str, &str)>, &str)> = vec![
        (vec![("email", ""), ("honeypot-email", "")], "Empty email"),
        (vec![("honeypot-email", "")], "Missing email"),
        (vec![("email", "legion")], "No at symbol"),
        (vec![("email", "legion@rome")], "No dot in domain"),
        (vec![("email", "@rome.com")], "No local part"),
        (vec![("email", "not an email")], "Plain text"),
    ];

    for (form, description) in cases {
        let res = app.post_subscriptions(&form).await?;
        assert_eq!(
            400,
            res.status().as_u16(),
            "The API did not return a 400 BAD REQUEST when the payload was: {description}."
        );
        let body: Value = res.json().await?;
        assert_eq!(body, json!({"error": "Invalid email address"}));
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_400_for_an_unparseable_body() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(created())
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let cases = [
        ("text/plain", "email=legion@rome.com"),
        ("application/json", r#"{"email": "legion@rome.com"}"#),
        ("multipart/form-data", "no boundary at all"),
    ];

    for (content_type, body) in cases {
        let res = app.post_subscriptions_raw(content_type, body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong status for content type: {content_type}"
        );
        let body: Value = res.json().await?;
        assert_eq!(body["error"], "Invalid request");
        assert!(body["details"].is_string());
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_accepts_multipart_form_data() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(contacts_path()))
        .and(method("POST"))
        .and(body_json(
            json!({"email": "legion@rome.com", "unsubscribed": false}),
        ))
        .respond_with(created())
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscriptions_multipart("legion@rome.com", "")
        .await?;

    assert_redirected_to_thanks(&res);

    Ok(())
}

#[tokio::test]
async fn subscribe_repeated_fields_keep_their_first_value() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(contacts_path()))
        .and(method("POST"))
        .and(body_json(
            json!({"email": "legion@rome.com", "unsubscribed": false}),
        ))
        .respond_with(created())
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscriptions(&[
            ("email", "legion@rome.com"),
            ("email", "other@rome.com"),
            ("honeypot-email", ""),
            ("honeypot-email", "bot@spam.com"),
        ])
        .await?;

    assert_redirected_to_thanks(&res);

    Ok(())
}

#[tokio::test]
async fn subscribe_same_email_twice_redirects_both_times() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(contacts_path()))
        .and(method("POST"))
        .respond_with(created())
        .expect(2)
        .mount(&app.provider_server)
        .await;

    for _ in 0..2 {
        let res = app
            .post_subscriptions(&[("email", "legion@rome.com"), ("honeypot-email", "")])
            .await?;
        assert_redirected_to_thanks(&res);
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_500_with_details_on_provider_error() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path(contacts_path()))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "statusCode": 422,
            "name": "validation_error",
            "message": "Duplicate contact"
        })))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscriptions(&[("email", "legion@rome.com"), ("honeypot-email", "")])
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        res.headers().contains_key("x-request-id"),
        "error responses keep the request id"
    );
    let body: Value = res.json().await?;
    assert_eq!(
        body,
        json!({"error": "Failed to subscribe email.", "details": "Duplicate contact"})
    );

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_500_when_provider_hangs() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(created().set_delay(Duration::from_secs(30)))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscriptions(&[("email", "legion@rome.com"), ("honeypot-email", "")])
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(
        body["error"],
        "An unexpected error occurred with the email service."
    );
    assert!(body["details"].is_string());

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_500_when_api_key_is_missing() -> Result<()> {
    let app = TestApp::spawn_with(|config| config.provider_config.api_key = None).await?;

    Mock::given(any())
        .respond_with(created())
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscriptions(&[("email", "legion@rome.com"), ("honeypot-email", "")])
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({"error": "Email service configuration error."}));

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_a_500_when_audience_id_is_blank() -> Result<()> {
    let app = TestApp::spawn_with(|config| {
        config.provider_config.audience_id = Some("  ".to_string())
    })
    .await?;

    Mock::given(any())
        .respond_with(created())
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscriptions(&[("email", "legion@rome.com"), ("honeypot-email", "")])
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(
        body,
        json!({"error": "Email service configuration error (missing list ID)."})
    );

    Ok(())
}
