use std::collections::BTreeMap;

use classnote_domain::assignment::ReportType;

use crate::domain::types::{AssignmentChanged, Locale, PushMessage};

/// Build the push notification announcing `event`.
///
/// The title is the course name; classes without a course get a generic
/// title. `data` carries the ids a client needs to open the assignment.
pub fn compose(event: &AssignmentChanged, locale: Locale) -> PushMessage {
    let title = match event.course_title.as_deref() {
        Some(title) if !title.trim().is_empty() => title.to_owned(),
        _ => fallback_title(locale).to_owned(),
    };
    let body = body(event.report_type, locale).to_owned();

    let data = BTreeMap::from([
        (
            "assignmentId".to_owned(),
            event.assignment.id.to_string(),
        ),
        ("classId".to_owned(), event.assignment.class_id.to_string()),
        (
            "reportType".to_owned(),
            event.report_type.as_str().to_owned(),
        ),
    ]);

    PushMessage { title, body, data }
}

fn fallback_title(locale: Locale) -> &'static str {
    match locale {
        Locale::Ja => "授業のお知らせ",
        Locale::En => "Class update",
    }
}

fn body(report_type: ReportType, locale: Locale) -> &'static str {
    match (report_type, locale) {
        (ReportType::Appeared, Locale::Ja) => "新しい課題が公開されました",
        (ReportType::Changed, Locale::Ja) => "課題の内容が変更されました",
        (ReportType::Disappeared, Locale::Ja) => "課題が削除されました",
        (ReportType::Appeared, Locale::En) => "A new assignment has been posted",
        (ReportType::Changed, Locale::En) => "An assignment has been updated",
        (ReportType::Disappeared, Locale::En) => "An assignment has been removed",
    }
}
