mod grid;
mod widget;
pub(crate) use self::grid::{advance_month, appointments_on, MonthGrid};
pub(crate) use self::widget::MonthCalendar;
