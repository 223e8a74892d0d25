use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{
    format_description::{well_known::Rfc3339, FormatItem},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

static NAIVE_FMT: &[FormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
);

/// A booked pet-service appointment as exported by the marketplace backend.
///
/// Only the fields the calendar displays are read; anything else in the
/// record is ignored.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct Appointment {
    pub(crate) id: String,
    #[serde(rename = "appointment_date", deserialize_with = "deserialize_timestamp")]
    pub(crate) scheduled_at: PrimitiveDateTime,
    pub(crate) status: AppointmentStatus,
    #[serde(default)]
    pub(crate) business_name: Option<String>,
    #[serde(default)]
    pub(crate) service_type: Option<String>,
    #[serde(default)]
    pub(crate) pet_name: Option<String>,
    #[serde(default)]
    pub(crate) client_email: Option<String>,
}

impl Appointment {
    pub(crate) fn date(&self) -> Date {
        self.scheduled_at.date()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

/// Parses an appointment timestamp without any timezone conversion: an
/// RFC 3339 offset is discarded and the wall-clock date & time are kept as
/// written.
pub(crate) fn parse_timestamp(s: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(PrimitiveDateTime::new(dt.date(), dt.time()));
    }
    if let Ok(d) = Date::parse(s, &YMD_FMT) {
        return Ok(d.midnight());
    }
    PrimitiveDateTime::parse(s, &NAIVE_FMT)
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_timestamp(&s).map_err(|e| {
        serde::de::Error::custom(format!("invalid appointment date {s:?}: {e}"))
    })
}

/// Something that can hand over a fresh snapshot of appointments
pub(crate) trait AppointmentSource {
    fn fetch(&self) -> Result<Vec<Appointment>, LoadError>;

    /// Human-readable description of where the appointments come from
    fn describe(&self) -> String;
}

/// Reads a JSON array of appointment records from a file, optionally keeping
/// only those booked by a given client.  Results are sorted newest first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct JsonFileSource {
    path: PathBuf,
    client_email: Option<String>,
}

impl JsonFileSource {
    pub(crate) fn new<P: Into<PathBuf>>(path: P) -> JsonFileSource {
        JsonFileSource {
            path: path.into(),
            client_email: None,
        }
    }

    pub(crate) fn client_email(mut self, email: Option<String>) -> JsonFileSource {
        self.client_email = email;
        self
    }
}

impl AppointmentSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<Appointment>, LoadError> {
        let src = fs::read_to_string(&self.path).map_err(|source| LoadError::Read {
            path: self.path.clone(),
            source,
        })?;
        let mut appointments =
            serde_json::from_str::<Vec<Appointment>>(&src).map_err(|source| LoadError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if let Some(email) = self.client_email.as_deref() {
            appointments.retain(|appt| {
                appt.client_email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            });
        }
        appointments.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
        tracing::info!(
            path = %self.path.display(),
            count = appointments.len(),
            "Loaded appointments"
        );
        Ok(appointments)
    }

    fn describe(&self) -> String {
        if let Some(ref email) = self.client_email {
            format!("{} ({email})", self.path.display())
        } else {
            self.path.display().to_string()
        }
    }
}

/// Used when no appointments file was given; always yields an empty list
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct NoAppointments;

impl AppointmentSource for NoAppointments {
    fn fetch(&self) -> Result<Vec<Appointment>, LoadError> {
        Ok(Vec::new())
    }

    fn describe(&self) -> String {
        String::from("no appointments file")
    }
}

#[derive(Debug, Error)]
pub(crate) enum LoadError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse appointments in {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl LoadError {
    pub(crate) fn path(&self) -> &Path {
        match self {
            LoadError::Read { path, .. } | LoadError::Parse { path, .. } => path,
        }
    }
}
