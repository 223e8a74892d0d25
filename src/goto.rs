use crate::theme::{
    goto::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use time::{Date, Month};

const OUTER_WIDTH: u16 = 16;
const OUTER_HEIGHT: u16 = 8;
const ENTER_POS: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GoTo;

impl StatefulWidget for GoTo {
    type State = GoToState;

    /*
     * ................
     * .┌─ Go To… ───┐.
     * .│            │.
     * .│ YYYY-MM-DD │.
     * .│            │.
     * .│  [ENTER]   │.
     * .└────────────┘.
     * ................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Go To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// Digits typed so far into the go-to-date popup
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct GoToState {
    digits: [Option<u8>; ENTER_POS],
    pos: usize,
}

impl GoToState {
    pub(crate) fn new() -> GoToState {
        GoToState::default()
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == ENTER_POS {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, (dg, fallback)) in std::iter::zip(self.digits, "YYYYMMDD".chars()).enumerate() {
            if i == 4 || i == 6 {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            spans.push(match dg {
                Some(d) => Span::styled(format!("{d}"), BASE_STYLE),
                None => Span::styled(String::from(fallback), UNFILLED_CELL_STYLE),
            });
        }
        Line::from_iter(spans)
    }

    fn number(&self, range: std::ops::Range<usize>) -> u16 {
        self.digits
            .get(range)
            .unwrap_or_default()
            .iter()
            .map(|d| u16::from(d.unwrap_or(0)))
            .fold(0, |acc, d| acc * 10 + d)
    }

    pub(crate) fn handle_input(&mut self, input: GoToInput) -> GoToOutput {
        match input {
            GoToInput::Digit(d) if self.pos < ENTER_POS && d < 10 => {
                if let Some(slot) = self.digits.get_mut(self.pos) {
                    *slot = Some(d);
                }
                self.pos += 1;
                GoToOutput::Ok
            }
            GoToInput::Backspace if self.pos > 0 => {
                self.pos -= 1;
                if let Some(slot) = self.digits.get_mut(self.pos) {
                    *slot = None;
                }
                GoToOutput::Ok
            }
            GoToInput::Enter if self.pos == ENTER_POS => {
                let year = i32::from(self.number(0..4));
                let Some(month) = u8::try_from(self.number(4..6))
                    .ok()
                    .and_then(|m| Month::try_from(m).ok())
                else {
                    return GoToOutput::Invalid;
                };
                let Ok(day) = u8::try_from(self.number(6..8)) else {
                    return GoToOutput::Invalid;
                };
                match Date::from_calendar_date(year, month, day) {
                    Ok(date) => GoToOutput::Go(date),
                    Err(_) => GoToOutput::Invalid,
                }
            }
            _ => GoToOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GoToInput {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GoToOutput {
    Ok,
    Invalid,
    Go(Date),
}
