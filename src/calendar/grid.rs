use crate::appointment::{Appointment, AppointmentStatus};
use std::iter::successors;
use thiserror::Error;
use time::{Date, Month};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// The first & last days of the calendar month containing some reference
/// date
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct MonthWindow {
    start: Date,
    end: Date,
}

impl MonthWindow {
    pub(crate) fn containing(reference: Date) -> MonthWindow {
        let start = reference.replace_day(1).unwrap_or(reference);
        let last = reference.month().length(reference.year());
        let end = reference.replace_day(last).unwrap_or(reference);
        MonthWindow { start, end }
    }

    pub(crate) fn start(&self) -> Date {
        self.start
    }

    pub(crate) fn end(&self) -> Date {
        self.end
    }

    pub(crate) fn year(&self) -> i32 {
        self.start.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.start.month()
    }

    /// Number of days in the month
    pub(crate) fn len(&self) -> usize {
        usize::from(self.end().day())
    }

    /// Every day of the month in order, both ends included
    pub(crate) fn days(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        successors(Some(self.start), move |&d| {
            if d < end {
                d.next_day()
            } else {
                None
            }
        })
    }
}

/// Number of blank cells needed before `month_start` so that it lands in its
/// weekday's column of a Monday-first week.  Sunday gives 6.
pub(crate) fn padding_for(month_start: Date) -> usize {
    usize::from(month_start.weekday().number_days_from_monday())
}

/// Appointment counts for a single day, split by the statuses shown on the
/// calendar
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) struct DayAggregate {
    pub(crate) pending: usize,
    pub(crate) confirmed: usize,
    pub(crate) completed: usize,
}

impl DayAggregate {
    pub(crate) fn total(&self) -> usize {
        self.pending + self.confirmed + self.completed
    }

    pub(crate) fn has_appointments(&self) -> bool {
        self.total() > 0
    }

    fn tally(&mut self, status: AppointmentStatus) {
        match status {
            AppointmentStatus::Pending => self.pending += 1,
            AppointmentStatus::Confirmed => self.confirmed += 1,
            AppointmentStatus::Completed => self.completed += 1,
            AppointmentStatus::Cancelled | AppointmentStatus::Other => (),
        }
    }
}

/// Counts the appointments falling on `day` by status.  A padding cell
/// (`None`) is always all zeroes.
pub(crate) fn aggregate_day(day: Option<Date>, appointments: &[Appointment]) -> DayAggregate {
    let mut agg = DayAggregate::default();
    if let Some(day) = day {
        for appt in appointments.iter().filter(|a| a.date() == day) {
            agg.tally(appt.status);
        }
    }
    agg
}

/// The appointments on `day`, earliest first
pub(crate) fn appointments_on(day: Date, appointments: &[Appointment]) -> Vec<&Appointment> {
    let mut appts = appointments
        .iter()
        .filter(|a| a.date() == day)
        .collect::<Vec<_>>();
    appts.sort_by(|a, b| {
        a.scheduled_at
            .cmp(&b.scheduled_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    appts
}

/// Moves `current` by `delta` whole months.  The day of the month is kept
/// when the target month is long enough and is otherwise clamped to the
/// target month's last day.
pub(crate) fn advance_month(current: Date, delta: i32) -> Result<Date, OutOfTimeError> {
    let month0 = i32::from(u8::from(current.month())) - 1;
    let total = current
        .year()
        .checked_mul(12)
        .and_then(|m| m.checked_add(month0))
        .and_then(|m| m.checked_add(delta))
        .ok_or(OutOfTimeError)?;
    let year = total.div_euclid(12);
    let month = u8::try_from(total.rem_euclid(12) + 1)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(OutOfTimeError)?;
    let day = current.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).map_err(|_| OutOfTimeError)
}

pub(crate) fn is_today(day: Date, today: Date) -> bool {
    day == today
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) aggregate: DayAggregate,
}

/// A month laid out in Monday-first rows of seven cells.  The cells before
/// the first of the month are `None`; there is no padding after the last
/// day, so the final row may be short.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    window: MonthWindow,
    padding: usize,
    cells: Vec<Option<DayCell>>,
}

impl MonthGrid {
    pub(crate) fn build(reference: Date, appointments: &[Appointment]) -> MonthGrid {
        let window = MonthWindow::containing(reference);
        let padding = padding_for(window.start());
        let mut cells = Vec::with_capacity(padding + window.len());
        cells.resize(padding, None);
        cells.extend(window.days().map(|date| {
            Some(DayCell {
                date,
                aggregate: aggregate_day(Some(date), appointments),
            })
        }));
        MonthGrid {
            window,
            padding,
            cells,
        }
    }

    pub(crate) fn window(&self) -> MonthWindow {
        self.window
    }

    pub(crate) fn padding(&self) -> usize {
        self.padding
    }

    pub(crate) fn cells(&self) -> &[Option<DayCell>] {
        &self.cells
    }

    pub(crate) fn rows(&self) -> std::slice::Chunks<'_, Option<DayCell>> {
        self.cells.chunks(DAYS_IN_WEEK)
    }

    pub(crate) fn row_qty(&self) -> usize {
        self.cells().len().div_ceil(DAYS_IN_WEEK)
    }

    /// The counts for `date`, or `None` if it lies outside the grid's month
    pub(crate) fn aggregate(&self, date: Date) -> Option<DayAggregate> {
        if date < self.window.start() || date > self.window.end() {
            return None;
        }
        let i = self.padding + usize::from(date.day()) - 1;
        self.cells.get(i).copied().flatten().map(|c| c.aggregate)
    }

    /// Totals across the whole month
    pub(crate) fn month_totals(&self) -> DayAggregate {
        self.cells
            .iter()
            .flatten()
            .fold(DayAggregate::default(), |acc, c| DayAggregate {
                pending: acc.pending + c.aggregate.pending,
                confirmed: acc.confirmed + c.aggregate.confirmed,
                completed: acc.completed + c.aggregate.completed,
            })
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointment::testing::appt;
    use time::macros::{date, datetime};
    use time::Weekday;

    fn scenario() -> Vec<Appointment> {
        vec![
            appt("1", datetime!(2024-03-10 9:00), AppointmentStatus::Pending),
            appt("2", datetime!(2024-03-10 15:30), AppointmentStatus::Confirmed),
            appt("3", datetime!(2024-03-11 11:00), AppointmentStatus::Completed),
        ]
    }

    #[test]
    fn test_month_window() {
        let w = MonthWindow::containing(date!(2024 - 02 - 17));
        assert_eq!(w.start(), date!(2024 - 02 - 01));
        assert_eq!(w.end(), date!(2024 - 02 - 29));
        assert_eq!(w.len(), 29);
        let days = w.days().collect::<Vec<_>>();
        assert_eq!(days.len(), 29);
        assert_eq!(days.first(), Some(&date!(2024 - 02 - 01)));
        assert_eq!(days.last(), Some(&date!(2024 - 02 - 29)));
    }

    #[test]
    fn test_month_window_february_lengths() {
        assert_eq!(MonthWindow::containing(date!(2023 - 02 - 10)).len(), 28);
        assert_eq!(MonthWindow::containing(date!(1900 - 02 - 10)).len(), 28);
        assert_eq!(MonthWindow::containing(date!(2000 - 02 - 10)).len(), 29);
        assert_eq!(
            MonthWindow::containing(date!(1900 - 02 - 10)).end(),
            date!(1900 - 02 - 28)
        );
    }

    #[test]
    fn test_month_window_end_of_time() {
        let w = MonthWindow::containing(date!(9999 - 12 - 25));
        assert_eq!(w.end(), date!(9999 - 12 - 31));
        assert_eq!(w.days().count(), 31);
    }

    #[test]
    fn test_padding() {
        // 2024-01-01 is a Monday
        assert_eq!(padding_for(date!(2024 - 01 - 01)), 0);
        // 2024-10-01 is a Tuesday
        assert_eq!(padding_for(date!(2024 - 10 - 01)), 1);
        // 2024-09-01 is a Sunday
        assert_eq!(padding_for(date!(2024 - 09 - 01)), 6);
        // 2025-03-01 is a Saturday
        assert_eq!(padding_for(date!(2025 - 03 - 01)), 5);
    }

    #[test]
    fn test_padding_matches_sunday_zero_rule() {
        let mut d = date!(2023 - 12 - 25);
        for _ in 0..14 {
            let wd = d.weekday().number_days_from_sunday();
            let expected = if wd == 0 { 6 } else { wd - 1 };
            assert_eq!(padding_for(d), usize::from(expected));
            assert!(padding_for(d) <= 6);
            d = d.next_day().unwrap();
        }
    }

    #[test]
    fn test_saturday_start_grid() {
        let grid = MonthGrid::build(date!(2025 - 03 - 20), &[]);
        assert_eq!(grid.window().start().weekday(), Weekday::Saturday);
        assert_eq!(grid.padding(), 5);
        assert_eq!(grid.cells().len(), 36);
        assert!(grid.cells()[..5].iter().all(Option::is_none));
        assert_eq!(
            grid.cells()[5].map(|c| c.date),
            Some(date!(2025 - 03 - 01))
        );
        assert_eq!(grid.row_qty(), 6);
        let rows = grid.rows().map(<[_]>::len).collect::<Vec<_>>();
        assert_eq!(rows, [7, 7, 7, 7, 7, 1]);
    }

    #[test]
    fn test_march_2024_grid() {
        // March 2024 begins on a Friday
        let grid = MonthGrid::build(date!(2024 - 03 - 20), &[]);
        assert_eq!(grid.window().start().weekday(), Weekday::Friday);
        assert_eq!(grid.padding(), 4);
        assert_eq!(grid.cells().len(), 35);
        assert_eq!(grid.row_qty(), 5);
    }

    #[test]
    fn test_grid_len_every_month() {
        let mut d = date!(2023 - 01 - 15);
        for _ in 0..36 {
            let grid = MonthGrid::build(d, &[]);
            let window = MonthWindow::containing(d);
            assert_eq!(grid.cells().len(), padding_for(window.start()) + window.len());
            assert!(grid.cells()[..grid.padding()].iter().all(Option::is_none));
            assert!(grid.cells()[grid.padding()..].iter().all(Option::is_some));
            d = advance_month(d, 1).unwrap();
        }
    }

    #[test]
    fn test_aggregate_scenario() {
        let appts = scenario();
        assert_eq!(
            aggregate_day(Some(date!(2024 - 03 - 10)), &appts),
            DayAggregate {
                pending: 1,
                confirmed: 1,
                completed: 0
            }
        );
        assert_eq!(
            aggregate_day(Some(date!(2024 - 03 - 11)), &appts),
            DayAggregate {
                pending: 0,
                confirmed: 0,
                completed: 1
            }
        );
        assert_eq!(
            aggregate_day(Some(date!(2024 - 03 - 12)), &appts),
            DayAggregate::default()
        );
        assert_eq!(aggregate_day(None, &appts), DayAggregate::default());
    }

    #[test]
    fn test_aggregate_ignores_other_statuses() {
        let mut appts = scenario();
        appts.push(appt("4", datetime!(2024-03-10 10:00), AppointmentStatus::Cancelled));
        appts.push(appt("5", datetime!(2024-03-10 11:00), AppointmentStatus::Other));
        let agg = aggregate_day(Some(date!(2024 - 03 - 10)), &appts);
        assert_eq!(agg.total(), 2);
        let on_day = appts
            .iter()
            .filter(|a| a.date() == date!(2024 - 03 - 10))
            .count();
        assert!(agg.total() <= on_day);
    }

    #[test]
    fn test_empty_list_all_zero() {
        let grid = MonthGrid::build(date!(2024 - 03 - 01), &[]);
        for cell in grid.cells().iter().flatten() {
            assert_eq!(cell.aggregate, DayAggregate::default());
            assert!(!cell.aggregate.has_appointments());
        }
        assert_eq!(grid.month_totals(), DayAggregate::default());
    }

    #[test]
    fn test_grid_aggregates() {
        let grid = MonthGrid::build(date!(2024 - 03 - 01), &scenario());
        assert_eq!(grid.aggregate(date!(2024 - 03 - 10)).unwrap().total(), 2);
        assert!(grid.aggregate(date!(2024 - 03 - 11))
            .unwrap()
            .has_appointments());
        assert!(!grid.aggregate(date!(2024 - 03 - 12))
            .unwrap()
            .has_appointments());
        assert_eq!(grid.aggregate(date!(2024 - 04 - 10)), None);
        assert_eq!(
            grid.month_totals(),
            DayAggregate {
                pending: 1,
                confirmed: 1,
                completed: 1
            }
        );
        let other_month = MonthGrid::build(date!(2024 - 04 - 01), &scenario());
        assert_eq!(other_month.month_totals(), DayAggregate::default());
    }

    #[test]
    fn test_build_idempotent() {
        let appts = scenario();
        assert_eq!(
            MonthGrid::build(date!(2024 - 03 - 05), &appts),
            MonthGrid::build(date!(2024 - 03 - 05), &appts)
        );
        // Any reference date in the same month gives the same grid
        assert_eq!(
            MonthGrid::build(date!(2024 - 03 - 05), &appts),
            MonthGrid::build(date!(2024 - 03 - 31), &appts)
        );
    }

    #[test]
    fn test_appointments_on() {
        let appts = scenario();
        let ids = appointments_on(date!(2024 - 03 - 10), &appts)
            .into_iter()
            .map(|a| a.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2"]);
        assert!(appointments_on(date!(2024 - 03 - 12), &appts).is_empty());
    }

    #[test]
    fn test_advance_month() {
        assert_eq!(
            advance_month(date!(2024 - 03 - 15), 1),
            Ok(date!(2024 - 04 - 15))
        );
        assert_eq!(
            advance_month(date!(2024 - 03 - 15), -1),
            Ok(date!(2024 - 02 - 15))
        );
        assert_eq!(
            advance_month(date!(2024 - 01 - 31), 1),
            Ok(date!(2024 - 02 - 29))
        );
        assert_eq!(
            advance_month(date!(2023 - 03 - 31), -1),
            Ok(date!(2023 - 02 - 28))
        );
        assert_eq!(
            advance_month(date!(2024 - 12 - 31), 1),
            Ok(date!(2025 - 01 - 31))
        );
        assert_eq!(
            advance_month(date!(2024 - 01 - 10), -1),
            Ok(date!(2023 - 12 - 10))
        );
        assert_eq!(advance_month(date!(9999 - 12 - 01), 1), Err(OutOfTimeError));
        assert_eq!(advance_month(Date::MIN, -1), Err(OutOfTimeError));
    }

    #[test]
    fn test_advance_month_round_trip() {
        let mut d = date!(2023 - 01 - 31);
        while d < date!(2025 - 01 - 01) {
            let back = advance_month(advance_month(d, 1).unwrap(), -1).unwrap();
            assert_eq!((back.year(), back.month()), (d.year(), d.month()));
            d = d.next_day().unwrap();
        }
    }

    #[test]
    fn test_is_today() {
        let today = date!(2024 - 03 - 10);
        assert!(is_today(date!(2024 - 03 - 10), today));
        assert!(!is_today(date!(2024 - 03 - 11), today));
    }
}
