use axum::http::StatusCode;

use crate::helpers::{jan_15, TestApp};

#[tokio::test]
async fn should_mark_late_once_per_day_and_report_it_on_the_page() {
    let app = TestApp::at(jan_15(9, 30));
    let cookie = app.signed_in("priya@example.com", "Priya").await;

    let first = app.post("/attendance/mark", &cookie, None).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["outcome"]["success"], true);
    assert_eq!(first.body["records"][0]["status"], "late");

    let second = app.post("/attendance/mark", &cookie, None).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["records"].as_array().unwrap().len(), 1);

    let page = app.get("/attendance", &cookie).await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["date"], "2024-01-15");
    assert_eq!(page.body["today"]["present"], 1);
    assert_eq!(page.body["today"]["late"], 1);
    assert_eq!(page.body["today"]["absent"], 0);
    assert_eq!(page.body["total_employees"], 1);
    assert_eq!(page.body["own"]["has_marked_today"], true);
    assert_eq!(page.body["own"]["can_check_out"], true);
}

#[tokio::test]
async fn should_mark_present_before_the_threshold() {
    let app = TestApp::at(jan_15(9, 15));
    let cookie = app.signed_in("rahul@example.com", "Rahul").await;

    let reply = app.post("/attendance/mark", &cookie, None).await;

    assert_eq!(reply.body["records"][0]["status"], "present");
}

#[tokio::test]
async fn should_check_out_and_show_working_hours() {
    let app = TestApp::at(jan_15(8, 0));
    let cookie = app.signed_in("asha@example.com", "Asha").await;
    app.post("/attendance/mark", &cookie, None).await;

    let reply = app.post("/attendance/check-out", &cookie, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["records"][0]["check_out"].is_string());

    let page = app.get("/attendance?date=2024-01-15", &cookie).await;
    assert_eq!(page.body["own"]["can_check_out"], false);
    // The fixed clock checks in and out at the same instant.
    assert_eq!(page.body["records"][0]["working_hours"], "0h 0m");
}

#[tokio::test]
async fn should_filter_the_table_by_employee_and_date() {
    let app = TestApp::at(jan_15(8, 0));
    let priya = app.signed_in("priya@example.com", "Priya").await;
    let rahul = app.signed_in("rahul@example.com", "Rahul").await;
    app.post("/attendance/mark", &priya, None).await;
    app.post("/attendance/mark", &rahul, None).await;

    let me = app.get("/auth/me", &rahul).await;
    let rahul_id = me.body["user"]["id"].as_str().unwrap().to_string();

    let all = app.get("/attendance?employee=all", &priya).await;
    assert_eq!(all.body["records"].as_array().unwrap().len(), 2);
    assert_eq!(all.body["today"]["present"], 2);

    let only = app
        .get(&format!("/attendance?employee={}", rahul_id), &priya)
        .await;
    let rows = only.body["records"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["record"]["user"]["full_name"], "Rahul");

    let other_day = app.get("/attendance?date=2024-01-14", &priya).await;
    assert!(other_day.body["records"].as_array().unwrap().is_empty());

    let bad = app.get("/attendance?employee=rahul", &priya).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_succeed_checking_out_without_a_checkin() {
    let app = TestApp::at(jan_15(17, 0));
    let cookie = app.signed_in("late@example.com", "Late").await;

    let reply = app.post("/attendance/check-out", &cookie, None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["records"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn should_summarise_attendance_and_activity_on_the_dashboard() {
    let app = TestApp::at(jan_15(8, 45));
    let priya = app.signed_in("priya@example.com", "Priya").await;
    app.post("/attendance/mark", &priya, None).await;

    let dashboard = app.get("/dashboard", &priya).await;

    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.body["total_employees"], 1);
    assert_eq!(dashboard.body["present_today"], 1);
    assert_eq!(dashboard.body["low_stock_count"], 0);
    assert_eq!(
        dashboard.body["recent_activity"][0]["details"],
        "Marked attendance as present at 08:45:00"
    );

    let feed = app.get("/activity?limit=1", &priya).await;
    assert_eq!(feed.body.as_array().unwrap().len(), 1);
    assert_eq!(feed.body[0]["action"], "Mark Attendance");
}

#[tokio::test]
async fn should_answer_unavailable_when_attendance_cannot_load() {
    let app = TestApp::at(jan_15(9, 0));
    let cookie = app.signed_in("priya@example.com", "Priya").await;

    app.backend.fail_reads(true);
    let page = app.get("/attendance", &cookie).await;

    assert_eq!(page.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_list_attendance_once_per_mutation() {
    let app = TestApp::at(jan_15(9, 0));
    let cookie = app.signed_in("priya@example.com", "Priya").await;

    let before = app.backend.list_calls();
    app.post("/attendance/mark", &cookie, None).await;
    assert_eq!(app.backend.list_calls() - before, 1);

    let before = app.backend.list_calls();
    app.post("/attendance/check-out", &cookie, None).await;
    assert_eq!(app.backend.list_calls() - before, 1);
}
