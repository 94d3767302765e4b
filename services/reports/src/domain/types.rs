use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use classnote_domain::assignment::{AssignmentStatus, ReportType};
use classnote_domain::id::{AssignmentId, ClassId, UserId};

/// A report as it arrived, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawReport {
    pub directory_id: String,
    pub assignment_id: String,
    pub report_type: String,
    pub open_at: Option<String>,
    pub due_at: Option<String>,
}

/// A validated report about one LMS assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub directory_id: String,
    pub external_assignment_id: String,
    pub report_type: ReportType,
    pub open_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
}

/// Assignment aggregate, unique per `(directory_id, external_assignment_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub class_id: ClassId,
    pub directory_id: String,
    pub external_assignment_id: String,
    pub open_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// First sighting of an assignment in `class_id`.
    pub fn from_report(class_id: ClassId, report: &Report, now: DateTime<Utc>) -> Self {
        Self {
            id: AssignmentId(Uuid::now_v7()),
            class_id,
            directory_id: report.directory_id.clone(),
            external_assignment_id: report.external_assignment_id.clone(),
            open_at: report.open_at,
            due_at: report.due_at,
            status: AssignmentStatus::initial(report.report_type),
            created_at: now,
            updated_at: now,
        }
    }

    /// Partial update: absent dates leave the stored value untouched.
    pub fn apply(&mut self, report: &Report, now: DateTime<Utc>) {
        if let Some(open_at) = report.open_at {
            self.open_at = Some(open_at);
        }
        if let Some(due_at) = report.due_at {
            self.due_at = Some(due_at);
        }
        self.status = self.status.apply(report.report_type);
        self.updated_at = now;
    }
}

/// One term's offering of a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub id: ClassId,
    pub term: String,
    pub external_class_id: String,
    pub course_id: Option<Uuid>,
}

impl Class {
    /// The class of the most recent term among those sharing an external id.
    pub fn latest(classes: impl IntoIterator<Item = Class>) -> Option<Class> {
        classes
            .into_iter()
            .max_by(|a, b| term_order(&a.term).cmp(&term_order(&b.term)))
    }
}

/// Terms are a year followed by a season: `2025S` (spring), `2025U` (summer),
/// `2025F` (fall), `2025W` (winter). Unknown seasons sort after the known
/// ones of the same year; a term without a leading year sorts first.
fn term_order(term: &str) -> (u32, u8, &str) {
    let split = term
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(term.len());
    let (year, season) = term.split_at(split);
    let year = year.parse().unwrap_or(0);
    let rank = match season.to_ascii_uppercase().as_str() {
        "S" | "SP" => 0,
        "U" | "SU" => 1,
        "F" | "FA" | "A" => 2,
        "W" | "WI" => 3,
        _ => 4,
    };
    (year, rank, season)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub lead_instructor: String,
}

/// Audit row for one ingested report. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReport {
    pub id: Uuid,
    pub user_id: UserId,
    pub assignment_id: AssignmentId,
    pub report_type: ReportType,
    pub created_at: DateTime<Utc>,
}

/// A device token belonging to a user subscribed to a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub user_id: UserId,
    pub fcm_token: String,
    pub device_os: String,
}

/// Committed outcome of reconciling one report.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub assignment: Assignment,
    pub report: NotificationReport,
    pub class: Class,
    pub course: Option<Course>,
}

/// Emitted once a reconciliation has committed; drives subscriber fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentChanged {
    pub assignment: Assignment,
    pub report_type: ReportType,
    pub course_title: Option<String>,
}

impl From<&Reconciled> for AssignmentChanged {
    fn from(reconciled: &Reconciled) -> Self {
        Self {
            assignment: reconciled.assignment.clone(),
            report_type: reconciled.report.report_type,
            course_title: reconciled.course.as_ref().map(|c| c.title.clone()),
        }
    }
}

/// Language of notification text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

/// A composed push notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
}

/// Provider verdict for a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub token: String,
    pub success: bool,
    pub error_message: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            success: true,
            error_message: None,
        }
    }

    pub fn failed(token: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            success: false,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}
