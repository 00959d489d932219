use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{test, App};
use chrono::Local;

use rollbookd::db::open_db;
use rollbookd::store::{self, AttendanceStatus};
use rollbookd::web::{configure, AppState};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn test_state(prefix: &str) -> Data<AppState> {
    let conn = open_db(&temp_dir(prefix)).expect("open db");
    Data::new(AppState::new(conn))
}

fn seed_student(state: &Data<AppState>, roll: &str) -> store::Student {
    store::insert_student(&state.conn(), roll, "Test Student", 3).expect("seed student")
}

#[actix_web::test]
async fn marking_twice_keeps_one_row_with_latest_status() {
    let state = test_state("rollbook-att-upsert");
    let student = seed_student(&state, "T1");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/attendance/mark/")
        .set_form([
            ("roll_no", "T1"),
            ("date", "2026-03-02"),
            ("status", "Present"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = test::TestRequest::post()
        .uri("/attendance/mark/")
        .set_form([
            ("roll_no", "T1"),
            ("date", "2026-03-02"),
            ("status", "Absent"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let records = store::recent_attendance(&state.conn(), &student.id, 20).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, "2026-03-02");
    assert_eq!(records[0].status, AttendanceStatus::Absent);
}

#[actix_web::test]
async fn unknown_student_aborts_without_writing() {
    let state = test_state("rollbook-att-unknown");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/attendance/mark/")
        .set_form([
            ("roll_no", "ZZ99"),
            ("date", "2026-03-02"),
            ("status", "Present"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("not found"));

    let rows: i64 = state
        .conn()
        .query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[actix_web::test]
async fn invalid_date_aborts_without_writing() {
    let state = test_state("rollbook-att-bad-date");
    let student = seed_student(&state, "T1");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/attendance/mark/")
        .set_form([
            ("roll_no", "T1"),
            ("date", "02/03/2026"),
            ("status", "Present"),
        ])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("Invalid date format"));

    let records = store::recent_attendance(&state.conn(), &student.id, 20).unwrap();
    assert!(records.is_empty());
}

#[actix_web::test]
async fn invalid_status_aborts_without_writing() {
    let state = test_state("rollbook-att-bad-status");
    let student = seed_student(&state, "T1");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/attendance/mark/")
        .set_form([
            ("roll_no", "T1"),
            ("date", "2026-03-02"),
            ("status", "Late"),
        ])
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("Invalid attendance status"));

    let records = store::recent_attendance(&state.conn(), &student.id, 20).unwrap();
    assert!(records.is_empty());
}

#[actix_web::test]
async fn missing_date_defaults_to_today() {
    let state = test_state("rollbook-att-default-date");
    let student = seed_student(&state, "T1");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/attendance/mark/")
        .set_form([("roll_no", "T1"), ("status", "Present")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let records = store::recent_attendance(&state.conn(), &student.id, 20).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, Local::now().date_naive().to_string());
}
