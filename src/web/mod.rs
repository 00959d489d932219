pub mod error;
pub mod handlers;
pub mod templates;

use std::sync::{Mutex, MutexGuard, PoisonError};

use actix_web::web::ServiceConfig;
use rusqlite::Connection;

/// Shared application state: one serialized SQLite connection. All
/// ordering and atomicity beyond that is the store's own.
pub struct AppState {
    db: Mutex<Connection>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Mutex::new(conn),
        }
    }

    /// A poisoned lock only means an earlier handler panicked mid-request;
    /// the connection itself is still usable.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(handlers::dashboard::home)
        .service(handlers::students::student_list)
        .service(handlers::students::add_student_form)
        .service(handlers::students::add_student_submit)
        .service(handlers::students::student_report)
        .service(handlers::attendance::mark_attendance_form)
        .service(handlers::attendance::mark_attendance_submit)
        .service(handlers::marks::enter_marks_form)
        .service(handlers::marks::enter_marks_submit)
        .service(handlers::sample::generate_sample_form)
        .service(handlers::sample::generate_sample_submit);
}
