use crate::appointment::{Appointment, AppointmentSource};
use crate::clock::Clock;
use crate::calendar::{advance_month, appointments_on, MonthCalendar, MonthGrid};
use crate::details::DayDetails;
use crate::goto::{GoTo, GoToInput, GoToOutput, GoToState};
use crate::help::Help;
use crate::theme::{
    BASE_STYLE, COMPLETED_STYLE, CONFIRMED_STYLE, ERROR_STYLE, PENDING_STYLE, STATUS_LINE_STYLE,
};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{Date, Duration};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<S, C> {
    source: S,
    clock: C,
    appointments: Vec<Appointment>,
    /// The selected day; the month containing it is the one displayed
    reference: Date,
    state: AppState,
    notice: Option<Notice>,
}

impl<S: AppointmentSource, C: Clock> App<S, C> {
    pub(crate) fn new(source: S, clock: C, appointments: Vec<Appointment>) -> App<S, C> {
        let reference = clock.today();
        App {
            source,
            clock,
            appointments,
            reference,
            state: AppState::Calendar,
            notice: None,
        }
    }

    pub(crate) fn reference_date(mut self, date: Date) -> Self {
        self.reference = date;
        self
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_days(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_days(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_days(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_days(7),
                KeyCode::Char('p') | KeyCode::PageUp => self.move_months(-1),
                KeyCode::Char('n') | KeyCode::PageDown => self.move_months(1),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.reference = self.clock.today();
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::GoingTo(GoToState::new());
                    true
                }
                KeyCode::Char('r') => self.reload(),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::GoingTo(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char(c) => c
                            .to_digit(10)
                            .and_then(|d| u8::try_from(d).ok())
                            .map_or(GoToOutput::Invalid, |d| {
                                state.handle_input(GoToInput::Digit(d))
                            }),
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(GoToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(GoToInput::Enter),
                        _ => GoToOutput::Invalid,
                    };
                    match output {
                        GoToOutput::Ok => true,
                        GoToOutput::Invalid => false,
                        GoToOutput::Go(date) => {
                            self.state = AppState::Calendar;
                            self.reference = date;
                            true
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn move_days(&mut self, days: i64) -> bool {
        if let Some(date) = self.reference.checked_add(Duration::days(days)) {
            self.reference = date;
            true
        } else {
            false
        }
    }

    fn move_months(&mut self, delta: i32) -> bool {
        match advance_month(self.reference, delta) {
            Ok(date) => {
                tracing::debug!(from = %self.reference, to = %date, "Changed month");
                self.reference = date;
                true
            }
            Err(e) => {
                tracing::debug!(from = %self.reference, delta, error = %e, "Cannot change month");
                false
            }
        }
    }

    /// Replaces the appointment snapshot with a fresh one from the source.  On
    /// failure the old snapshot is kept.
    fn reload(&mut self) -> bool {
        match self.source.fetch() {
            Ok(appointments) => {
                self.notice = Some(Notice::Info(format!(
                    "Reloaded {} appointments from {}",
                    appointments.len(),
                    self.source.describe()
                )));
                self.appointments = appointments;
                true
            }
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = ?e, "Failed to reload appointments");
                self.notice = Some(Notice::Error(format!("{:#}", anyhow::Error::new(e))));
                false
            }
        }
    }

    fn status_line(&self) -> Line<'_> {
        match self.notice {
            Some(Notice::Info(ref msg)) => Line::styled(msg.as_str(), STATUS_LINE_STYLE),
            Some(Notice::Error(ref msg)) => Line::styled(msg.as_str(), ERROR_STYLE),
            None => Line::styled(
                format!(
                    "{}: {} appointments  (? for help)",
                    self.source.describe(),
                    self.appointments.len()
                ),
                STATUS_LINE_STYLE,
            ),
        }
    }
}

fn totals_line(grid: &MonthGrid) -> Line<'static> {
    let totals = grid.month_totals();
    Line::from_iter([
        Span::styled(format!("{} pending", totals.pending), PENDING_STYLE),
        Span::styled("   ", BASE_STYLE),
        Span::styled(format!("{} confirmed", totals.confirmed), CONFIRMED_STYLE),
        Span::styled("   ", BASE_STYLE),
        Span::styled(format!("{} completed", totals.completed), COMPLETED_STYLE),
    ])
    .centered()
}

impl<S: AppointmentSource, C: Clock> Widget for &mut App<S, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        // Rebuilt from scratch on every draw so that month changes and
        // reloads are always reflected
        let grid = MonthGrid::build(self.reference, &self.appointments);
        let today = self.clock.today();
        tracing::trace!(
            reference = %self.reference,
            %today,
            padding = grid.padding(),
            cells = grid.cells().len(),
            selected = ?grid.aggregate(self.reference),
            "Built month grid"
        );
        let [cal_area, totals_area, details_area, status_area] = Layout::vertical([
            Constraint::Length(MonthCalendar::height(&grid)),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        MonthCalendar::new(&grid, today, self.reference).render(cal_area, buf);
        totals_line(&grid).render(totals_area, buf);
        DayDetails::new(
            self.reference,
            appointments_on(self.reference, &self.appointments),
        )
        .render(details_area, buf);
        self.status_line().render(status_area, buf);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::GoingTo(ref mut state) = self.state {
            GoTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    GoingTo(GoToState),
    Quitting,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Notice {
    Info(String),
    Error(String),
}
