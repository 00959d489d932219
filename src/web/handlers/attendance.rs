use actix_web::{get, post, web, HttpResponse};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use serde::Deserialize;

use crate::store::{self, AttendanceStatus, UpsertOutcome};
use crate::validate;
use crate::web::error::AppError;
use crate::web::templates::{base_context, page, redirect_with_msg};
use crate::web::AppState;

fn render_form(
    conn: &Connection,
    error: &str,
    msg: &str,
) -> Result<HttpResponse, AppError> {
    let students = store::list_students(conn, None)?;
    let mut ctx = base_context();
    ctx.insert("students", &students);
    ctx.insert("error", error);
    ctx.insert("msg", msg);
    page("mark_attendance.html", &ctx)
}

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    msg: Option<String>,
}

#[get("/attendance/mark/")]
pub async fn mark_attendance_form(
    state: web::Data<AppState>,
    query: web::Query<FormQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = state.conn();
    render_form(&conn, "", query.msg.as_deref().unwrap_or(""))
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendanceForm {
    #[serde(default)]
    roll_no: String,
    #[serde(default)]
    date: String,
    #[serde(default = "default_status")]
    status: String,
}

fn default_status() -> String {
    "Present".to_string()
}

#[post("/attendance/mark/")]
pub async fn mark_attendance_submit(
    state: web::Data<AppState>,
    form: web::Form<MarkAttendanceForm>,
) -> Result<HttpResponse, AppError> {
    let conn = state.conn();

    let roll_no = match validate::validate_roll_no(&form.roll_no) {
        Ok(v) => v,
        Err(message) => return render_form(&conn, &message, ""),
    };
    let Some(student) = store::find_student_by_roll(&conn, &roll_no)? else {
        return render_form(
            &conn,
            &format!("Student with Roll No {} not found", roll_no),
            "",
        );
    };

    // Absent date field means "today".
    let date = if form.date.trim().is_empty() {
        Local::now().date_naive()
    } else {
        match NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => return render_form(&conn, "Invalid date format", ""),
        }
    };
    let Some(status) = AttendanceStatus::parse(form.status.trim()) else {
        return render_form(&conn, "Invalid attendance status", "");
    };

    let outcome = store::upsert_attendance(&conn, &student.id, date, status)?;
    let msg = match outcome {
        UpsertOutcome::Created => format!(
            "Attendance marked successfully for {} on {}",
            student.name, date
        ),
        UpsertOutcome::Updated => {
            format!("Attendance updated for {} on {}", student.name, date)
        }
    };
    redirect_with_msg("/attendance/mark/", &msg)
}
