use serde::Serialize;

/// Badge severity for rendered metrics. Serializes to the lowercase
/// contextual class name the templates splice into `bg-*` / `alert-*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

/// Two-decimal rounding used for every displayed metric:
/// `round(100*x) / 100`, half away from zero.
pub fn round2(x: f64) -> f64 {
    (100.0 * x).round() / 100.0
}

/// 0.0 when no lectures were held at all.
pub fn attendance_percentage(present_count: usize, total_count: usize) -> f64 {
    if total_count == 0 {
        return 0.0;
    }
    round2(100.0 * present_count as f64 / total_count as f64)
}

/// 0.0 when the student has no marks records.
pub fn average_marks(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round2(values.iter().sum::<f64>() / values.len() as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remark {
    pub label: &'static str,
    pub severity: Severity,
}

/// Coarse performance band from average marks. Band lower bounds are
/// inclusive: 75 is "Good", 50 is "Average".
pub fn performance_remark(avg_marks: f64) -> Remark {
    if avg_marks >= 75.0 {
        Remark {
            label: "Good",
            severity: Severity::Success,
        }
    } else if avg_marks >= 50.0 {
        Remark {
            label: "Average",
            severity: Severity::Warning,
        }
    } else {
        Remark {
            label: "Needs Improvement",
            severity: Severity::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceWarning {
    pub is_warning: bool,
    pub message: String,
    pub severity: Severity,
}

/// Attendance shortage classification. 75 falls in the [75, 85) band,
/// 85 starts the no-warning band.
pub fn attendance_warning(pct: f64) -> AttendanceWarning {
    if pct < 75.0 {
        AttendanceWarning {
            is_warning: true,
            message: format!("Attendance Shortage: {}% (Below 75%)", pct),
            severity: Severity::Danger,
        }
    } else if pct < 85.0 {
        AttendanceWarning {
            is_warning: true,
            message: format!("Low Attendance: {}% (Below 85%)", pct),
            severity: Severity::Warning,
        }
    } else {
        AttendanceWarning {
            is_warning: false,
            message: format!("Good Attendance: {}%", pct),
            severity: Severity::Success,
        }
    }
}
