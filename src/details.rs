use crate::appointment::Appointment;
use crate::labels::{service_color, service_label, status_label};
use crate::theme::{status_style, BASE_STYLE, ZERO_COUNT_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Widget},
};
use time::Date;

const PANEL_WIDTH: u16 = 60;

/// Longest status label ("confirmed", "completed", "cancelled")
const STATUS_WIDTH: usize = 9;

/// The list of appointments booked on a single day
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayDetails<'a> {
    date: Date,
    appointments: Vec<&'a Appointment>,
}

impl<'a> DayDetails<'a> {
    pub(crate) fn new(date: Date, appointments: Vec<&'a Appointment>) -> DayDetails<'a> {
        DayDetails { date, appointments }
    }

    fn title(&self) -> String {
        format!(
            " {} {} {} {} ",
            self.date.weekday(),
            self.date.day(),
            self.date.month(),
            self.date.year()
        )
    }

    fn to_text(&self) -> Text<'a> {
        if self.appointments.is_empty() {
            return Text::from(Line::styled("No appointments", ZERO_COUNT_STYLE));
        }
        Text::from_iter(self.appointments.iter().map(|&appt| appointment_line(appt)))
    }
}

fn appointment_line(appt: &Appointment) -> Line<'_> {
    let time = appt.scheduled_at.time();
    let mut spans = vec![
        Span::styled(
            format!("{:02}:{:02}  ", time.hour(), time.minute()),
            BASE_STYLE,
        ),
        Span::styled(
            format!("{:<STATUS_WIDTH$}  ", status_label(appt.status)),
            status_style(appt.status),
        ),
    ];
    if let Some(service) = appt.service_type.as_deref() {
        spans.push(Span::styled(
            service_label(service),
            Style::new().fg(service_color(service)),
        ));
    }
    let mut who = Vec::new();
    if let Some(business) = appt.business_name.as_deref() {
        who.push(business.to_owned());
    }
    if let Some(pet) = appt.pet_name.as_deref() {
        who.push(format!("({pet})"));
    }
    if !who.is_empty() {
        if appt.service_type.is_some() {
            spans.push(Span::styled(" at ", BASE_STYLE));
        }
        spans.push(Span::styled(who.join(" "), BASE_STYLE));
    }
    Line::from(spans)
}

impl Widget for DayDetails<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [panel_area] = Layout::horizontal([PANEL_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let block = Block::bordered()
            .title(self.title())
            .title_alignment(Alignment::Left)
            .style(BASE_STYLE);
        Paragraph::new(self.to_text())
            .block(block)
            .render(panel_area, buf);
    }
}
