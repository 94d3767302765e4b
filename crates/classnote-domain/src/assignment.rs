//! Assignment lifecycle vocabulary: report kinds and assignment status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Returned when a wire string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// What the LMS crawler observed about an assignment.
///
/// Wire format: `"appeared" | "changed" | "disappeared"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Appeared,
    Changed,
    Disappeared,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Appeared => "appeared",
            Self::Changed => "changed",
            Self::Disappeared => "disappeared",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "appeared" => Ok(Self::Appeared),
            "changed" => Ok(Self::Changed),
            "disappeared" => Ok(Self::Disappeared),
            _ => Err(UnknownVariant {
                kind: "report type",
                value: s.to_owned(),
            }),
        }
    }
}

/// Visibility of an assignment in the LMS. Rows are never removed;
/// a disappeared assignment is kept as `Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Opened,
    Deleted,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Deleted => "deleted",
        }
    }

    /// Status of an assignment first seen through `report`.
    pub fn initial(report: ReportType) -> Self {
        match report {
            ReportType::Appeared | ReportType::Changed => Self::Opened,
            ReportType::Disappeared => Self::Deleted,
        }
    }

    /// Status after applying `report` to an assignment currently in `self`.
    /// `Changed` carries no visibility information and keeps the status.
    pub fn apply(self, report: ReportType) -> Self {
        match report {
            ReportType::Appeared => Self::Opened,
            ReportType::Changed => self,
            ReportType::Disappeared => Self::Deleted,
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opened" => Ok(Self::Opened),
            "deleted" => Ok(Self::Deleted),
            _ => Err(UnknownVariant {
                kind: "assignment status",
                value: s.to_owned(),
            }),
        }
    }
}
