use chrono::{NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: String,
    pub roll_no: String,
    pub name: String,
    pub semester: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Present" => Some(AttendanceStatus::Present),
            "Absent" => Some(AttendanceStatus::Absent),
            _ => None,
        }
    }
}

impl ToSql for AttendanceStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for AttendanceStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        AttendanceStatus::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    pub date: String,
    pub status: AttendanceStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarksRecord {
    pub subject: String,
    pub marks: f64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

fn now_ts() -> String {
    Utc::now().to_rfc3339()
}

fn map_student(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        roll_no: row.get(1)?,
        name: row.get(2)?,
        semester: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

const STUDENT_COLUMNS: &str = "id, roll_no, name, semester, created_at, updated_at";

pub fn insert_student(
    conn: &Connection,
    roll_no: &str,
    name: &str,
    semester: i64,
) -> anyhow::Result<Student> {
    let student = Student {
        id: Uuid::new_v4().to_string(),
        roll_no: roll_no.to_string(),
        name: name.to_string(),
        semester,
        created_at: now_ts(),
        updated_at: now_ts(),
    };
    conn.execute(
        "INSERT INTO students(id, roll_no, name, semester, created_at, updated_at)
         VALUES(?, ?, ?, ?, ?, ?)",
        (
            &student.id,
            &student.roll_no,
            &student.name,
            student.semester,
            &student.created_at,
            &student.updated_at,
        ),
    )?;
    Ok(student)
}

pub fn find_student_by_roll(conn: &Connection, roll_no: &str) -> anyhow::Result<Option<Student>> {
    let found = conn
        .query_row(
            &format!("SELECT {} FROM students WHERE roll_no = ?", STUDENT_COLUMNS),
            [roll_no],
            map_student,
        )
        .optional()?;
    Ok(found)
}

/// Roll-ordered listing; `search` narrows to a case-insensitive substring
/// match on roll identifier or display name.
pub fn list_students(conn: &Connection, search: Option<&str>) -> anyhow::Result<Vec<Student>> {
    let mut out = Vec::new();
    match search.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            let needle = format!("%{}%", q);
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM students
                 WHERE roll_no LIKE ?1 OR name LIKE ?1
                 ORDER BY roll_no",
                STUDENT_COLUMNS
            ))?;
            let rows = stmt.query_map([&needle], map_student)?;
            for row in rows {
                out.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM students ORDER BY roll_no",
                STUDENT_COLUMNS
            ))?;
            let rows = stmt.query_map([], map_student)?;
            for row in rows {
                out.push(row?);
            }
        }
    }
    Ok(out)
}

pub fn recent_students(conn: &Connection, limit: i64) -> anyhow::Result<Vec<Student>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM students ORDER BY created_at DESC, rowid DESC LIMIT ?",
        STUDENT_COLUMNS
    ))?;
    let rows = stmt.query_map([limit], map_student)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn count_students(conn: &Connection) -> anyhow::Result<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
    Ok(n)
}

/// (present, total) attendance row counts for one student.
pub fn attendance_counts(conn: &Connection, student_id: &str) -> anyhow::Result<(usize, usize)> {
    let (present, total): (i64, i64) = conn.query_row(
        "SELECT COALESCE(SUM(CASE WHEN status = 'Present' THEN 1 ELSE 0 END), 0), COUNT(*)
         FROM attendance WHERE student_id = ?",
        [student_id],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;
    Ok((present as usize, total as usize))
}

pub fn upsert_attendance(
    conn: &Connection,
    student_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> anyhow::Result<UpsertOutcome> {
    let date_s = date.to_string();
    let existing = conn
        .query_row(
            "SELECT 1 FROM attendance WHERE student_id = ? AND date = ?",
            (student_id, date_s.as_str()),
            |r| r.get::<_, i64>(0),
        )
        .optional()?;
    conn.execute(
        "INSERT INTO attendance(id, student_id, date, status, created_at)
         VALUES(?, ?, ?, ?, ?)
         ON CONFLICT(student_id, date) DO UPDATE SET
           status = excluded.status",
        (
            Uuid::new_v4().to_string(),
            student_id,
            &date_s,
            status,
            now_ts(),
        ),
    )?;
    Ok(if existing.is_some() {
        UpsertOutcome::Updated
    } else {
        UpsertOutcome::Created
    })
}

pub fn recent_attendance(
    conn: &Connection,
    student_id: &str,
    limit: i64,
) -> anyhow::Result<Vec<AttendanceRecord>> {
    let mut stmt = conn.prepare(
        "SELECT date, status, created_at FROM attendance
         WHERE student_id = ?
         ORDER BY date DESC
         LIMIT ?",
    )?;
    let rows = stmt.query_map((student_id, limit), |r| {
        Ok(AttendanceRecord {
            date: r.get(0)?,
            status: r.get(1)?,
            created_at: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn upsert_marks(
    conn: &Connection,
    student_id: &str,
    subject: &str,
    marks: f64,
) -> anyhow::Result<UpsertOutcome> {
    let existing = conn
        .query_row(
            "SELECT 1 FROM marks WHERE student_id = ? AND subject = ?",
            (student_id, subject),
            |r| r.get::<_, i64>(0),
        )
        .optional()?;
    conn.execute(
        "INSERT INTO marks(id, student_id, subject, marks, created_at, updated_at)
         VALUES(?, ?, ?, ?, ?, ?)
         ON CONFLICT(student_id, subject) DO UPDATE SET
           marks = excluded.marks,
           updated_at = excluded.updated_at",
        (
            Uuid::new_v4().to_string(),
            student_id,
            subject,
            marks,
            now_ts(),
            now_ts(),
        ),
    )?;
    Ok(if existing.is_some() {
        UpsertOutcome::Updated
    } else {
        UpsertOutcome::Created
    })
}

pub fn marks_for_student(conn: &Connection, student_id: &str) -> anyhow::Result<Vec<MarksRecord>> {
    let mut stmt = conn.prepare(
        "SELECT subject, marks, created_at, updated_at FROM marks
         WHERE student_id = ?
         ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map([student_id], |r| {
        Ok(MarksRecord {
            subject: r.get(0)?,
            marks: r.get(1)?,
            created_at: r.get(2)?,
            updated_at: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Insert-if-absent keyed on roll_no; Ok(None) means the identifier was
/// already taken and the existing row is kept untouched.
pub fn insert_student_if_absent(
    conn: &Connection,
    roll_no: &str,
    name: &str,
    semester: i64,
) -> anyhow::Result<Option<Student>> {
    if find_student_by_roll(conn, roll_no)?.is_some() {
        return Ok(None);
    }
    Ok(Some(insert_student(conn, roll_no, name, semester)?))
}

pub fn attendance_insert_if_absent(
    conn: &Connection,
    student_id: &str,
    date: NaiveDate,
    status: AttendanceStatus,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO attendance(id, student_id, date, status, created_at)
         VALUES(?, ?, ?, ?, ?)
         ON CONFLICT(student_id, date) DO NOTHING",
        (
            Uuid::new_v4().to_string(),
            student_id,
            date.to_string(),
            status,
            now_ts(),
        ),
    )?;
    Ok(())
}

pub fn marks_insert_if_absent(
    conn: &Connection,
    student_id: &str,
    subject: &str,
    marks: f64,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO marks(id, student_id, subject, marks, created_at, updated_at)
         VALUES(?, ?, ?, ?, ?, ?)
         ON CONFLICT(student_id, subject) DO NOTHING",
        (
            Uuid::new_v4().to_string(),
            student_id,
            subject,
            marks,
            now_ts(),
            now_ts(),
        ),
    )?;
    Ok(())
}
