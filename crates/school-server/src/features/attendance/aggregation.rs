//! Attendance aggregation
//!
//! Partitions attendance entries by calendar date and by student, counting
//! Present, Late and Absent for every grouping key. All functions here are
//! pure; the report query loads the rows and hands them over.
//!
//! For every [`StatusCounts`], `present + late + absent == total`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::AttendanceStatus;

/// One attendance row joined with the student's display name
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AttendanceEntry {
    pub student_id: Uuid,
    pub student_name: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

/// A student expected in the report even without any records
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RosterStudent {
    pub student_id: Uuid,
    pub student_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub total: i64,
}

impl StatusCounts {
    pub fn record(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
        self.total += 1;
    }

    pub fn merge(&mut self, other: &StatusCounts) {
        self.present += other.present;
        self.late += other.late;
        self.absent += other.absent;
        self.total += other.total;
    }

    pub fn rate(&self) -> f64 {
        attendance_rate(self.present, self.late, self.total)
    }
}

/// Percentage of records that were Present or Late
///
/// Returns 0 when there are no records; otherwise rounded to two decimals.
///
/// ```rust
/// use school_server::features::attendance::aggregation::attendance_rate;
///
/// assert_eq!(attendance_rate(8, 1, 10), 90.0);
/// assert_eq!(attendance_rate(0, 0, 0), 0.0);
/// ```
pub fn attendance_rate(present: i64, late: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let rate = (present + late) as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentMark {
    pub student_id: Uuid,
    pub student_name: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendance {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub students: Vec<StudentMark>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendance {
    pub student_id: Uuid,
    pub student_name: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub attendance_rate: f64,
}

impl StudentAttendance {
    pub fn new(student_id: Uuid, student_name: String, counts: StatusCounts) -> Self {
        Self {
            student_id,
            student_name,
            attendance_rate: counts.rate(),
            counts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[serde(flatten)]
    pub counts: StatusCounts,
    pub attendance_rate: f64,
    pub students: usize,
    pub days_recorded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
    pub by_date: Vec<DailyAttendance>,
    pub by_student: Vec<StudentAttendance>,
    pub summary: ReportSummary,
}

fn by_name_then_id(a_name: &str, a_id: Uuid, b_name: &str, b_id: Uuid) -> std::cmp::Ordering {
    a_name.cmp(b_name).then(a_id.cmp(&b_id))
}

/// Build a report from a class roster and the entries in range
///
/// Roster students without entries appear in `by_student` with a 0% rate.
/// Entries for students missing from the roster (moved to another class
/// since) are still counted.
pub fn aggregate(roster: &[RosterStudent], entries: &[AttendanceEntry]) -> AttendanceReport {
    let mut students: BTreeMap<Uuid, (String, StatusCounts)> = roster
        .iter()
        .map(|s| (s.student_id, (s.student_name.clone(), StatusCounts::default())))
        .collect();
    let mut days: BTreeMap<NaiveDate, DailyAttendance> = BTreeMap::new();

    for entry in entries {
        students
            .entry(entry.student_id)
            .or_insert_with(|| (entry.student_name.clone(), StatusCounts::default()))
            .1
            .record(entry.status);

        let day = days.entry(entry.date).or_insert_with(|| DailyAttendance {
            date: entry.date,
            counts: StatusCounts::default(),
            students: Vec::new(),
        });
        day.counts.record(entry.status);
        day.students.push(StudentMark {
            student_id: entry.student_id,
            student_name: entry.student_name.clone(),
            status: entry.status,
        });
    }

    let mut by_date: Vec<DailyAttendance> = days.into_values().collect();
    for day in &mut by_date {
        day.students.sort_by(|a, b| {
            by_name_then_id(&a.student_name, a.student_id, &b.student_name, b.student_id)
        });
    }

    let mut by_student: Vec<StudentAttendance> = students
        .into_iter()
        .map(|(id, (name, counts))| StudentAttendance::new(id, name, counts))
        .collect();
    by_student.sort_by(|a, b| {
        by_name_then_id(&a.student_name, a.student_id, &b.student_name, b.student_id)
    });

    let mut overall = StatusCounts::default();
    for day in &by_date {
        overall.merge(&day.counts);
    }

    AttendanceReport {
        summary: ReportSummary {
            counts: overall,
            attendance_rate: overall.rate(),
            students: by_student.len(),
            days_recorded: by_date.len(),
        },
        by_date,
        by_student,
    }
}
