use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{test, App};
use chrono::{Datelike, NaiveDate, Weekday};

use rollbookd::db::open_db;
use rollbookd::store;
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

#[actix_web::test]
async fn overlapping_ranges_create_no_duplicates() {
    let state = test_state("rollbook-sample-idempotent");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/generate-sample-data/")
        .set_form([("count", "3")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(store::count_students(&state.conn()).unwrap(), 3);

    // STU100..STU102 collide with the first batch; only STU103..STU104 are new.
    let req = test::TestRequest::post()
        .uri("/generate-sample-data/")
        .set_form([("count", "5")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let conn = state.conn();
    assert_eq!(store::count_students(&conn).unwrap(), 5);
    for roll in ["STU100", "STU101", "STU102", "STU103", "STU104"] {
        assert!(
            store::find_student_by_roll(&conn, roll).unwrap().is_some(),
            "missing {}",
            roll
        );
    }
}

#[actix_web::test]
async fn generated_students_carry_attendance_and_marks() {
    let state = test_state("rollbook-sample-shape");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/generate-sample-data/")
        .set_form([("count", "2")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let conn = state.conn();
    for student in store::list_students(&conn, None).unwrap() {
        assert!((1..=8).contains(&student.semester));

        let records = store::recent_attendance(&conn, &student.id, 30).unwrap();
        assert!(!records.is_empty(), "{} has no attendance", student.roll_no);
        for record in &records {
            let date =
                NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").expect("stored date parses");
            assert!(
                !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
                "{} attendance on a weekend",
                student.roll_no
            );
        }

        let marks = store::marks_for_student(&conn, &student.id).unwrap();
        assert_eq!(marks.len(), 1, "{} marks rows", student.roll_no);
        assert_eq!(marks[0].subject, "General");
        assert!(
            (40.0..=95.0).contains(&marks[0].marks),
            "{} marks {}",
            student.roll_no,
            marks[0].marks
        );
    }
}

#[actix_web::test]
async fn count_defaults_to_five_when_absent() {
    let state = test_state("rollbook-sample-default");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/generate-sample-data/")
        .set_form([("count", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(store::count_students(&state.conn()).unwrap(), 5);
}

#[actix_web::test]
async fn invalid_count_aborts_without_writing() {
    let state = test_state("rollbook-sample-bad-count");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/generate-sample-data/")
        .set_form([("count", "lots")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("Invalid count"));
    assert_eq!(store::count_students(&state.conn()).unwrap(), 0);
}

#[actix_web::test]
async fn collisions_keep_existing_student_untouched() {
    let state = test_state("rollbook-sample-keep");
    store::insert_student(&state.conn(), "STU100", "Handmade Student", 12).expect("seed");
    let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/generate-sample-data/")
        .set_form([("count", "2")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let conn = state.conn();
    assert_eq!(store::count_students(&conn).unwrap(), 2);
    let kept = store::find_student_by_roll(&conn, "STU100").unwrap().unwrap();
    assert_eq!(kept.name, "Handmade Student");
    assert_eq!(kept.semester, 12);
    // The colliding roll gets no synthetic attendance either.
    assert!(store::recent_attendance(&conn, &kept.id, 5).unwrap().is_empty());
}
