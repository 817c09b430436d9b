// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use doctor_cell::Doctor;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<Doctor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummary>,
}

impl Appointment {
    /// Calendar day of the appointment; the backend sends either a bare date
    /// or a full RFC 3339 timestamp.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.date_naive());
        }
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(AppointmentStatus::Pending),
            "COMPLETED" => Some(AppointmentStatus::Completed),
            "CANCELLED" | "CANCELED" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Status changes a user can ask for from an appointment card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentAction {
    Complete,
    Cancel,
}

impl AppointmentAction {
    pub fn target_status(&self) -> AppointmentStatus {
        match self {
            AppointmentAction::Complete => AppointmentStatus::Completed,
            AppointmentAction::Cancel => AppointmentStatus::Cancelled,
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CreateAppointmentRequest {
    pub doctor_id: String,
    pub date: NaiveDate,
}

impl CreateAppointmentRequest {
    pub fn to_body(&self) -> Value {
        json!({
            "doctorId": self.doctor_id,
            "date": self.date.format("%Y-%m-%d").to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatusRequest {
    pub appointment_id: String,
    pub status: AppointmentStatus,
}

impl UpdateStatusRequest {
    pub fn to_body(&self) -> Value {
        json!({
            "status": self.status.as_wire(),
            "appointment_id": self.appointment_id,
        })
    }
}

/// Filters of an appointment list. `date` is only honoured for doctors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub page: u32,
}

impl Default for AppointmentFilter {
    fn default() -> Self {
        Self {
            status: None,
            date: None,
            page: 1,
        }
    }
}

// ==============================================================================
// STATISTICS
// ==============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentStats {
    pub pending: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl AppointmentStats {
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        appointments.iter().fold(Self::default(), |mut stats, appointment| {
            match appointment.status {
                AppointmentStatus::Pending => stats.pending += 1,
                AppointmentStatus::Completed => stats.completed += 1,
                AppointmentStatus::Cancelled => stats.cancelled += 1,
            }
            stats
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(date: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: "a1".into(),
            patient_id: "p1".into(),
            doctor_id: "d1".into(),
            date: date.into(),
            status,
            doctor: None,
            patient: None,
        }
    }

    #[test]
    fn test_calendar_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2030, 1, 15);
        assert_eq!(appointment("2030-01-15", AppointmentStatus::Pending).calendar_date(), expected);
        assert_eq!(appointment("2030-01-15T00:00:00.000Z", AppointmentStatus::Pending).calendar_date(), expected);
        assert_eq!(appointment("2030-01-15T09:30:00", AppointmentStatus::Pending).calendar_date(), expected);
        assert_eq!(appointment("soon", AppointmentStatus::Pending).calendar_date(), None);
    }

    #[test]
    fn test_status_wire_format() {
        let status: AppointmentStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);
        assert_eq!(AppointmentStatus::parse("completed"), Some(AppointmentStatus::Completed));
        assert_eq!(AppointmentStatus::parse("all"), None);
    }

    #[test]
    fn test_request_bodies() {
        let create = CreateAppointmentRequest {
            doctor_id: "d1".into(),
            date: NaiveDate::from_ymd_opt(2030, 3, 9).unwrap(),
        };
        assert_eq!(create.to_body(), json!({"doctorId": "d1", "date": "2030-03-09"}));

        let update = UpdateStatusRequest {
            appointment_id: "a1".into(),
            status: AppointmentStatus::Completed,
        };
        assert_eq!(update.to_body(), json!({"status": "COMPLETED", "appointment_id": "a1"}));
    }

    #[test]
    fn test_stats_counts_by_status() {
        let list = vec![
            appointment("2030-01-15", AppointmentStatus::Pending),
            appointment("2030-01-15", AppointmentStatus::Pending),
            appointment("2030-01-15", AppointmentStatus::Cancelled),
        ];
        assert_eq!(
            AppointmentStats::from_appointments(&list),
            AppointmentStats { pending: 2, completed: 0, cancelled: 1 }
        );
    }
}
