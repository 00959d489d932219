use actix_web::{get, post, web, HttpResponse};
use chrono::Local;
use serde::Deserialize;

use crate::web::error::AppError;
use crate::web::templates::{base_context, page, redirect_with_msg};
use crate::web::AppState;
use crate::{sample, store};

const SAMPLE_DAYS_BACK: u32 = 20;

fn render_form(error: &str) -> Result<HttpResponse, AppError> {
    let mut ctx = base_context();
    ctx.insert("error", error);
    page("generate_sample_data.html", &ctx)
}

#[get("/generate-sample-data/")]
pub async fn generate_sample_form() -> Result<HttpResponse, AppError> {
    render_form("")
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    count: String,
}

#[post("/generate-sample-data/")]
pub async fn generate_sample_submit(
    state: web::Data<AppState>,
    form: web::Form<GenerateForm>,
) -> Result<HttpResponse, AppError> {
    let count = if form.count.trim().is_empty() {
        5
    } else {
        match form.count.trim().parse::<usize>() {
            Ok(v) => v,
            Err(_) => return render_form("Invalid count"),
        }
    };

    let conn = state.conn();
    let mut rng = rand::thread_rng();
    let today = Local::now().date_naive();

    // One transaction for the whole batch; a roll collision skips the
    // student without touching the existing rows.
    let tx = conn.unchecked_transaction()?;
    let mut created_count = 0usize;
    for s in sample::sample_students(&mut rng, count) {
        let Some(student) =
            store::insert_student_if_absent(&tx, &s.roll_no, &s.name, s.semester)?
        else {
            continue;
        };
        for (date, status) in sample::sample_attendance(&mut rng, today, SAMPLE_DAYS_BACK) {
            store::attendance_insert_if_absent(&tx, &student.id, date, status)?;
        }
        let m = sample::sample_marks(&mut rng);
        store::marks_insert_if_absent(&tx, &student.id, &m.subject, m.marks)?;
        created_count += 1;
    }
    tx.commit()?;

    redirect_with_msg(
        "/students/",
        &format!(
            "Generated {} sample students with attendance and marks data!",
            created_count
        ),
    )
}
