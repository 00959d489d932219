use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::Rng;

use crate::calc::round2;
use crate::store::AttendanceStatus;

pub const ROLL_PREFIX: &str = "STU";
pub const ROLL_SEQ_START: usize = 100;

const FIRST_NAMES: &[&str] = &[
    "Rahul", "Priya", "Amit", "Sneha", "Vikram", "Anjali", "Rohan", "Kavya", "Arjun", "Divya",
    "Siddharth", "Meera", "Karan", "Pooja", "Aditya", "Shreya", "Neeraj", "Radha",
];

const LAST_NAMES: &[&str] = &[
    "Shah", "Patel", "Kumar", "Singh", "Sharma", "Verma", "Gupta", "Reddy", "Rao", "Nair",
    "Mehta", "Joshi", "Desai", "Malhotra", "Agarwal", "Iyer", "Menon", "Pillai",
];

// Uniform draw over this multiset: Present with probability 3/4.
const STATUS_POOL: [AttendanceStatus; 4] = [
    AttendanceStatus::Present,
    AttendanceStatus::Present,
    AttendanceStatus::Present,
    AttendanceStatus::Absent,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleStudent {
    pub roll_no: String,
    pub name: String,
    pub semester: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleMarks {
    pub subject: String,
    pub marks: f64,
}

/// Synthetic students with sequential roll identifiers. The sequence
/// restarts at the same offset on every call, so repeated invocations
/// collide on roll_no; insertion treats that as insert-if-absent.
pub fn sample_students(rng: &mut impl Rng, count: usize) -> Vec<SampleStudent> {
    (0..count)
        .map(|i| {
            let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
            SampleStudent {
                roll_no: format!("{}{:03}", ROLL_PREFIX, ROLL_SEQ_START + i),
                name: format!("{} {}", first, last),
                semester: rng.gen_range(1..=8),
            }
        })
        .collect()
}

/// Attendance for the trailing `days_back` calendar days ending `today`,
/// weekends skipped, each weekday independently Present with probability 3/4.
pub fn sample_attendance(
    rng: &mut impl Rng,
    today: NaiveDate,
    days_back: u32,
) -> Vec<(NaiveDate, AttendanceStatus)> {
    let mut out = Vec::new();
    for i in 0..days_back {
        let day = today - Duration::days(i64::from(i));
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }
        let status = STATUS_POOL[rng.gen_range(0..STATUS_POOL.len())];
        out.push((day, status));
    }
    out
}

/// One "General" marks record with a score uniform in [40, 95].
pub fn sample_marks(rng: &mut impl Rng) -> SampleMarks {
    SampleMarks {
        subject: "General".to_string(),
        marks: round2(rng.gen_range(40.0..=95.0)),
    }
}
