use super::grid::{is_today, DayAggregate, DayCell, MonthGrid};
use crate::theme::{
    BASE_STYLE, COMPLETED_STYLE, CONFIRMED_STYLE, PENDING_STYLE, SELECTED_STYLE, TITLE_STYLE,
    TODAY_STYLE, WEEKDAY_STYLE, ZERO_COUNT_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use time::Date;

static HEADER: &str = " Mo     Tu     We     Th     Fr     Sa     Su ";

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = 46;

/// Number of lines taken up by the month title, the weekday header, and its
/// rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar: one for the day
/// numbers and one for the status counts beneath them
const WEEK_LINES: u16 = 2;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Status counts are drawn this many columns to the right of the left edge
/// of the day above them
const COUNTS_OFFSET: u16 = 1;

const ACS_HLINE: char = '─';

/// A single month of appointments.  Each day shows, on the line below its
/// number, one glyph per status (pending, confirmed, completed): `·` for
/// none, the count for 1 through 9, and `+` for more.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthCalendar<'a> {
    grid: &'a MonthGrid,
    today: Date,
    selected: Date,
}

impl<'a> MonthCalendar<'a> {
    pub(crate) fn new(grid: &'a MonthGrid, today: Date, selected: Date) -> MonthCalendar<'a> {
        MonthCalendar {
            grid,
            today,
            selected,
        }
    }

    /// Number of lines needed to draw `grid` in full
    pub(crate) fn height(grid: &MonthGrid) -> u16 {
        let rows = u16::try_from(grid.row_qty()).unwrap_or(u16::MAX);
        rows.saturating_mul(WEEK_LINES).saturating_add(HEADER_LINES)
    }
}

impl Widget for MonthCalendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(left),
                Constraint::Length(MAIN_WIDTH.min(area.width)),
                Constraint::Min(0),
            ])
            .split(area);
        let mut canvas = BufferCanvas::new(chunks[1], buf);
        let window = self.grid.window();
        canvas.draw_title(&format!("{} {}", window.month(), window.year()));
        canvas.draw_header();
        for (week_no, row) in std::iter::zip(0u16.., self.grid.rows()) {
            for (col, cell) in std::iter::zip(0u16.., row) {
                let Some(DayCell { date, aggregate }) = *cell else {
                    continue;
                };
                let today = is_today(date, self.today);
                let style = if date == self.selected {
                    SELECTED_STYLE
                } else if today {
                    TODAY_STYLE
                } else {
                    BASE_STYLE
                };
                let label = if today {
                    format!("[{:2}]", date.day())
                } else {
                    format!(" {:2} ", date.day())
                };
                canvas.draw_day(week_no, col, Span::styled(label, style));
                if aggregate.has_appointments() {
                    canvas.draw_counts(week_no, col, aggregate);
                }
            }
        }
    }
}

fn count_glyph(qty: usize) -> char {
    match qty {
        0 => '·',
        1..=9 => u32::try_from(qty)
            .ok()
            .and_then(|q| char::from_digit(q, 10))
            .unwrap_or('+'),
        _ => '+',
    }
}

fn count_span(qty: usize, style: Style) -> Span<'static> {
    let style = if qty == 0 { ZERO_COUNT_STYLE } else { style };
    Span::styled(String::from(count_glyph(qty)), style)
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str) {
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        let x = MAIN_WIDTH.saturating_sub(width) / 2;
        self.mvprint(0, x, Line::styled(title, TITLE_STYLE));
    }

    fn draw_header(&mut self) {
        self.mvprint(1, 0, Line::styled(HEADER, WEEKDAY_STYLE));
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, col: u16, s: Span<'_>) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES,
            DAY_WIDTH * col,
            Line::from(s),
        );
    }

    fn draw_counts(&mut self, week_no: u16, col: u16, agg: DayAggregate) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES + 1,
            DAY_WIDTH * col + COUNTS_OFFSET,
            Line::from_iter([
                count_span(agg.pending, PENDING_STYLE),
                count_span(agg.confirmed, CONFIRMED_STYLE),
                count_span(agg.completed, COMPLETED_STYLE),
            ]),
        );
    }

    fn mvprint(&mut self, y: u16, x: u16, line: Line<'_>) {
        if y < self.area.height && x < self.area.width {
            let width = u16::try_from(line.width()).unwrap_or(u16::MAX);
            // The Rect passed to the Paragraph must lie entirely within the
            // frame lest a panic result.
            Paragraph::new(line).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(
            y,
            x,
            Line::styled(String::from(ch).repeat(length.into()), BASE_STYLE),
        );
    }
}
