use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::web::error::AppError;
use crate::web::templates::{base_context, page};
use crate::web::AppState;
use crate::{calc, store};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    msg: Option<String>,
}

#[get("/")]
pub async fn home(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = state.conn();
    let students = store::list_students(&conn, None)?;

    // Below 75% counts as a shortage; students with no attendance at all
    // sit at 0% and are included.
    let mut warning_count = 0usize;
    for student in &students {
        let (present, total) = store::attendance_counts(&conn, &student.id)?;
        if calc::attendance_percentage(present, total) < 75.0 {
            warning_count += 1;
        }
    }
    let recent_students = store::recent_students(&conn, 5)?;

    let mut ctx = base_context();
    ctx.insert("total_students", &students.len());
    ctx.insert("warning_count", &warning_count);
    ctx.insert("recent_students", &recent_students);
    if let Some(msg) = &query.msg {
        ctx.insert("msg", msg);
    }
    page("home.html", &ctx)
}
