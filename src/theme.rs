use crate::appointment::AppointmentStatus;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const TODAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

pub(crate) const ZERO_COUNT_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const PENDING_STYLE: Style = BASE_STYLE.fg(Color::LightYellow);

pub(crate) const CONFIRMED_STYLE: Style = BASE_STYLE.fg(Color::LightGreen);

pub(crate) const COMPLETED_STYLE: Style = BASE_STYLE.fg(Color::LightBlue);

pub(crate) const CANCELLED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const HELP_KEY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const STATUS_LINE_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const ERROR_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) fn status_style(status: AppointmentStatus) -> Style {
    match status {
        AppointmentStatus::Pending => PENDING_STYLE,
        AppointmentStatus::Confirmed => CONFIRMED_STYLE,
        AppointmentStatus::Completed => COMPLETED_STYLE,
        AppointmentStatus::Cancelled | AppointmentStatus::Other => CANCELLED_STYLE,
    }
}

pub(crate) mod goto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
