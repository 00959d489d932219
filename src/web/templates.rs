use actix_web::HttpResponse;
use once_cell::sync::Lazy;
use tera::{Context, Tera};

use super::error::AppError;

/// All pages ship compiled into the binary. Registration failure here is
/// a build defect, not a runtime condition.
static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates([
        ("base.html", include_str!("../../templates/base.html")),
        ("home.html", include_str!("../../templates/home.html")),
        (
            "student_list.html",
            include_str!("../../templates/student_list.html"),
        ),
        (
            "add_student.html",
            include_str!("../../templates/add_student.html"),
        ),
        (
            "mark_attendance.html",
            include_str!("../../templates/mark_attendance.html"),
        ),
        (
            "enter_marks.html",
            include_str!("../../templates/enter_marks.html"),
        ),
        (
            "student_report.html",
            include_str!("../../templates/student_report.html"),
        ),
        (
            "generate_sample_data.html",
            include_str!("../../templates/generate_sample_data.html"),
        ),
        (
            "not_found.html",
            include_str!("../../templates/not_found.html"),
        ),
    ])
    .expect("register templates");
    tera
});

/// Fresh context with the message slots every page reads pre-cleared.
pub fn base_context() -> Context {
    let mut ctx = Context::new();
    ctx.insert("msg", "");
    ctx.insert("error", "");
    ctx
}

pub fn page(name: &str, ctx: &Context) -> Result<HttpResponse, AppError> {
    let body = TEMPLATES.render(name, ctx)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

pub fn not_found_page(message: &str) -> Result<HttpResponse, AppError> {
    let mut ctx = base_context();
    ctx.insert("message", message);
    let body = TEMPLATES.render("not_found.html", &ctx)?;
    Ok(HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(body))
}

/// 303 redirect carrying a success message as the `msg` query parameter;
/// the target page renders it once. Stands in for session flash.
pub fn redirect_with_msg(path: &str, msg: &str) -> Result<HttpResponse, AppError> {
    let query = serde_urlencoded::to_string([("msg", msg)])?;
    Ok(HttpResponse::SeeOther()
        .insert_header(("Location", format!("{}?{}", path, query)))
        .finish())
}
