use actix_web::{get, post, web, HttpResponse};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::web::error::AppError;
use crate::web::templates::{base_context, not_found_page, page, redirect_with_msg};
use crate::web::AppState;
use crate::{calc, store, validate};

#[derive(Debug, Serialize)]
struct StudentRow {
    student: store::Student,
    attendance_pct: f64,
    avg_marks: f64,
    warning: calc::AttendanceWarning,
    remark: calc::Remark,
}

/// (attendance percentage, average marks) aggregated from the store.
fn metrics_for(conn: &Connection, student_id: &str) -> anyhow::Result<(f64, f64)> {
    let (present, total) = store::attendance_counts(conn, student_id)?;
    let pct = calc::attendance_percentage(present, total);
    let values: Vec<f64> = store::marks_for_student(conn, student_id)?
        .iter()
        .map(|m| m.marks)
        .collect();
    Ok((pct, calc::average_marks(&values)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    search: Option<String>,
    msg: Option<String>,
}

#[get("/students/")]
pub async fn student_list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = state.conn();
    let students = store::list_students(&conn, query.search.as_deref())?;

    let mut student_data = Vec::new();
    for student in students {
        let (attendance_pct, avg_marks) = metrics_for(&conn, &student.id)?;
        student_data.push(StudentRow {
            attendance_pct,
            avg_marks,
            warning: calc::attendance_warning(attendance_pct),
            remark: calc::performance_remark(avg_marks),
            student,
        });
    }

    let mut ctx = base_context();
    ctx.insert("student_data", &student_data);
    ctx.insert("search_query", query.search.as_deref().unwrap_or(""));
    if let Some(msg) = &query.msg {
        ctx.insert("msg", msg);
    }
    page("student_list.html", &ctx)
}

#[get("/students/add/")]
pub async fn add_student_form() -> Result<HttpResponse, AppError> {
    page("add_student.html", &base_context())
}

#[derive(Debug, Deserialize)]
pub struct AddStudentForm {
    #[serde(default)]
    roll_no: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    semester: String,
}

fn render_add_form(error: &str) -> Result<HttpResponse, AppError> {
    let mut ctx = base_context();
    ctx.insert("error", error);
    page("add_student.html", &ctx)
}

#[post("/students/add/")]
pub async fn add_student_submit(
    state: web::Data<AppState>,
    form: web::Form<AddStudentForm>,
) -> Result<HttpResponse, AppError> {
    let roll_no = match validate::validate_roll_no(&form.roll_no) {
        Ok(v) => v,
        Err(message) => return render_add_form(&message),
    };
    let name = form.name.trim();
    if name.is_empty() {
        return render_add_form("Name cannot be empty");
    }
    let semester = match form.semester.trim().parse::<i64>() {
        Ok(v) if (1..=12).contains(&v) => v,
        Ok(_) => return render_add_form("Semester must be between 1 and 12"),
        Err(_) => return render_add_form("Invalid semester number"),
    };

    let conn = state.conn();
    if store::find_student_by_roll(&conn, &roll_no)?.is_some() {
        return render_add_form(&format!("Student with Roll No {} already exists", roll_no));
    }
    let student = store::insert_student(&conn, &roll_no, name, semester)?;

    redirect_with_msg(
        "/students/",
        &format!(
            "Student {} (Roll No: {}) added successfully!",
            student.name, student.roll_no
        ),
    )
}

#[get("/students/{roll_no}/report/")]
pub async fn student_report(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let roll_no = path.into_inner();
    let conn = state.conn();
    let Some(student) = store::find_student_by_roll(&conn, &roll_no)? else {
        return not_found_page(&format!("Student with Roll No {} not found", roll_no));
    };

    let (attendance_pct, avg_marks) = metrics_for(&conn, &student.id)?;
    let warning = calc::attendance_warning(attendance_pct);
    let remark = calc::performance_remark(avg_marks);
    let attendance_records = store::recent_attendance(&conn, &student.id, 20)?;
    let marks_records = store::marks_for_student(&conn, &student.id)?;

    let mut ctx = base_context();
    ctx.insert("student", &student);
    ctx.insert("attendance_pct", &attendance_pct);
    ctx.insert("avg_marks", &avg_marks);
    ctx.insert("warning", &warning);
    ctx.insert("remark", &remark);
    ctx.insert("attendance_records", &attendance_records);
    ctx.insert("marks_records", &marks_records);
    page("student_report.html", &ctx)
}
