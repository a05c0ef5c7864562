use axum::{extract::State, response::Html};

use crate::{
    web::{
        types::{EMAIL_FIELD, HONEYPOT_FIELD},
        WebResult,
    },
    AppState,
};

/// The landing page with the subscription form.
pub async fn home(State(app_state): State<AppState>) -> WebResult<Html<String>> {
    let mut ctx = tera::Context::new();
    ctx.insert("subscribe_action", "/api/subscribe");
    ctx.insert("email_field", EMAIL_FIELD);
    ctx.insert("honeypot_field", HONEYPOT_FIELD);

    let body = app_state
        .templ_mgr
        .render_html_to_string(&ctx, "home.html")?;

    Ok(Html(body))
}

/// Where subscribers end up after submitting the form.
pub async fn thanks(State(app_state): State<AppState>) -> WebResult<Html<String>> {
    let body = app_state
        .templ_mgr
        .render_html_to_string(&tera::Context::new(), "thanks.html")?;

    Ok(Html(body))
}
