use axum::http::{Method, StatusCode};

use crate::helpers::{jan_15, session_cookie, TestApp, PASSWORD};

#[tokio::test]
async fn should_sign_up_then_sign_in_and_resolve_the_current_user() {
    let app = TestApp::at(jan_15(8, 0));

    let reply = app.signup("priya@example.com", "Priya Sharma", "admin").await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["user"]["role"], "admin");
    assert!(reply.headers.get("set-cookie").is_none());

    let reply = app.login("priya@example.com", PASSWORD).await;
    assert_eq!(reply.status, StatusCode::OK);
    let cookie = session_cookie(&reply.headers);
    assert!(cookie.starts_with("session="));

    let me = app.get("/auth/me", &cookie).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["full_name"], "Priya Sharma");
    assert_eq!(me.body["user"]["email"], "priya@example.com");
}

#[tokio::test]
async fn should_default_new_accounts_to_employee() {
    let app = TestApp::at(jan_15(8, 0));

    let reply = app
        .request(
            Method::POST,
            "/auth/signup",
            None,
            Some(serde_json::json!({
                "email": "rahul@example.com",
                "password": PASSWORD,
                "full_name": "Rahul",
            })),
        )
        .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["user"]["role"], "employee");
}

#[tokio::test]
async fn should_reject_duplicate_and_incomplete_signups() {
    let app = TestApp::at(jan_15(8, 0));
    app.signup("dup@example.com", "First", "employee").await;

    let reply = app.signup("dup@example.com", "Second", "employee").await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let reply = app.signup("blank@example.com", "  ", "employee").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_bad_credentials() {
    let app = TestApp::at(jan_15(8, 0));
    app.signup("asha@example.com", "Asha", "employee").await;

    assert_eq!(
        app.login("asha@example.com", "wrong").await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.login("nobody@example.com", PASSWORD).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn should_guard_protected_routes() {
    let app = TestApp::at(jan_15(8, 0));

    for uri in ["/auth/me", "/dashboard", "/attendance", "/inventory", "/activity"] {
        let reply = app.request(Method::GET, uri, None, None).await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED, "{}", uri);
    }
    let reply = app.get("/dashboard", "session=forged").await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_invalidate_the_session_on_logout() {
    let app = TestApp::at(jan_15(8, 0));
    let cookie = app.signed_in("dev@example.com", "Dev").await;

    let reply = app.post("/auth/logout", &cookie, None).await;
    assert_eq!(reply.status, StatusCode::OK);

    assert_eq!(
        app.get("/auth/me", &cookie).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn should_serve_health_and_the_openapi_document() {
    let app = TestApp::at(jan_15(8, 0));

    let health = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);

    let doc = app
        .request(Method::GET, "/api-docs/openapi.json", None, None)
        .await;
    assert_eq!(doc.status, StatusCode::OK);
    assert!(doc.body["paths"]["/attendance/mark"].is_object());
    assert!(doc.body["paths"]["/products/{id}"].is_object());
}

#[tokio::test]
async fn should_treat_email_case_as_the_same_account() {
    let app = TestApp::at(jan_15(8, 0));

    let first = app.signup("Priya@Example.com", "Priya", "employee").await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["user"]["email"], "priya@example.com");

    let second = app.signup("priya@example.com", "Impostor", "admin").await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    let login = app.login("PRIYA@example.com", PASSWORD).await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["user"]["full_name"], "Priya");
}
