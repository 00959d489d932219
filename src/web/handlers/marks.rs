use actix_web::{get, post, web, HttpResponse};
use rusqlite::Connection;
use serde::Deserialize;

use crate::store::{self, UpsertOutcome};
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
    page("enter_marks.html", &ctx)
}

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    msg: Option<String>,
}

#[get("/marks/enter/")]
pub async fn enter_marks_form(
    state: web::Data<AppState>,
    query: web::Query<FormQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = state.conn();
    render_form(&conn, "", query.msg.as_deref().unwrap_or(""))
}

#[derive(Debug, Deserialize)]
pub struct EnterMarksForm {
    #[serde(default)]
    roll_no: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    marks: String,
}

#[post("/marks/enter/")]
pub async fn enter_marks_submit(
    state: web::Data<AppState>,
    form: web::Form<EnterMarksForm>,
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

    let subject = form.subject.trim();
    let subject = if subject.is_empty() { "General" } else { subject };

    // `contains` also rejects NaN, which parses fine.
    let marks = match form.marks.trim().parse::<f64>() {
        Ok(v) if (0.0..=100.0).contains(&v) => v,
        Ok(_) => return render_form(&conn, "Marks must be between 0 and 100", ""),
        Err(_) => return render_form(&conn, "Invalid marks value", ""),
    };

    let outcome = store::upsert_marks(&conn, &student.id, subject, marks)?;
    let msg = match outcome {
        UpsertOutcome::Created => format!("Marks saved successfully for {}!", student.name),
        UpsertOutcome::Updated => format!("Marks updated successfully for {}!", student.name),
    };
    redirect_with_msg("/marks/enter/", &msg)
}
