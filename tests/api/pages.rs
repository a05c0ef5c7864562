//! The landing and confirmation pages.

use anyhow::Result;
use reqwest::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn home_renders_the_subscription_form() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/").await?;
    assert_eq!(res.status(), StatusCode::OK);

    let html = res.text().await?;
    assert!(html.contains(r#"action="/api/subscribe""#));
    assert!(html.contains(r#"name="email""#));
    assert!(html.contains(r#"name="honeypot-email""#));

    Ok(())
}

#[tokio::test]
async fn thanks_page_is_served() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/thanks").await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await?.contains("on the list"));

    Ok(())
}

#[tokio::test]
async fn subscribe_only_accepts_post() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app.get("/api/subscribe").await?;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    Ok(())
}
