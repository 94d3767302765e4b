use chrono::{DateTime, Utc};

use classnote_domain::assignment::ReportType;

use crate::domain::types::{RawReport, Report};
use crate::error::ReportsServiceError;

/// Validate a raw report and convert it into typed form. No side effects.
pub fn normalize(raw: RawReport) -> Result<Report, ReportsServiceError> {
    let directory_id = required("directoryId", &raw.directory_id)?;
    let external_assignment_id = required("assignmentId", &raw.assignment_id)?;
    let report_type = raw
        .report_type
        .parse::<ReportType>()
        .map_err(|e| ReportsServiceError::InvalidInput(format!("reportType: {e}")))?;
    let open_at = optional_timestamp("openAt", raw.open_at.as_deref())?;
    let due_at = optional_timestamp("dueAt", raw.due_at.as_deref())?;

    Ok(Report {
        directory_id,
        external_assignment_id,
        report_type,
        open_at,
        due_at,
    })
}

fn required(field: &str, value: &str) -> Result<String, ReportsServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ReportsServiceError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    Ok(value.to_owned())
}

fn optional_timestamp(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ReportsServiceError> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    ReportsServiceError::InvalidInput(format!(
                        "{field}: {s:?} is not an RFC 3339 timestamp ({e})"
                    ))
                })
        })
        .transpose()
}
