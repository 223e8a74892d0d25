use crate::appointment::AppointmentStatus;
use ratatui::style::Color;
use std::borrow::Cow;

/// The kinds of service a business on the marketplace can offer
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum ServiceCategory {
    Grooming,
    Veterinary,
    Boarding,
    Daycare,
    Training,
    Walking,
    PetSitting,
    PetTaxi,
}

impl ServiceCategory {
    // (key, variant, label, color)
    const TABLE: [(&'static str, ServiceCategory, &'static str, Color); 8] = [
        ("grooming", ServiceCategory::Grooming, "Grooming", Color::LightMagenta),
        ("veterinary", ServiceCategory::Veterinary, "Veterinary", Color::LightRed),
        ("boarding", ServiceCategory::Boarding, "Boarding", Color::LightBlue),
        ("daycare", ServiceCategory::Daycare, "Daycare", Color::LightYellow),
        ("training", ServiceCategory::Training, "Training", Color::LightGreen),
        ("walking", ServiceCategory::Walking, "Dog Walking", Color::LightCyan),
        ("pet_sitting", ServiceCategory::PetSitting, "Pet Sitting", Color::Cyan),
        ("pet_taxi", ServiceCategory::PetTaxi, "Pet Taxi", Color::Yellow),
    ];

    pub(crate) fn from_key(key: &str) -> Option<ServiceCategory> {
        Self::TABLE
            .iter()
            .find(|(k, ..)| k.eq_ignore_ascii_case(key))
            .map(|&(_, cat, ..)| cat)
    }

    fn entry(self) -> (&'static str, ServiceCategory, &'static str, Color) {
        Self::TABLE
            .into_iter()
            .find(|&(_, cat, ..)| cat == self)
            .unwrap_or(("", self, "", Color::Reset))
    }

    pub(crate) fn label(self) -> &'static str {
        self.entry().2
    }

    pub(crate) fn color(self) -> Color {
        self.entry().3
    }
}

/// Display label for a service-type key.  Unknown keys are shown as-is with
/// underscores turned into spaces.
pub(crate) fn service_label(key: &str) -> Cow<'_, str> {
    ServiceCategory::from_key(key)
        .map_or_else(|| humanize(key), |cat| Cow::Borrowed(cat.label()))
}

pub(crate) fn service_color(key: &str) -> Color {
    ServiceCategory::from_key(key).map_or(Color::Reset, ServiceCategory::color)
}

fn humanize(key: &str) -> Cow<'_, str> {
    if key.contains('_') {
        Cow::Owned(key.replace('_', " "))
    } else {
        Cow::Borrowed(key)
    }
}

pub(crate) fn status_label(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Pending => "pending",
        AppointmentStatus::Confirmed => "confirmed",
        AppointmentStatus::Completed => "completed",
        AppointmentStatus::Cancelled => "cancelled",
        AppointmentStatus::Other => "other",
    }
}
