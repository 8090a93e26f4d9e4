use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::session::answer::AnswerMode;
use crate::session::timing::format_clock;
use crate::ui::theme::Theme;

/// One-row header: app name, answer mode, request status, question timer and
/// running average.
pub struct StatusBar<'a> {
    pub mode: AnswerMode,
    pub status: &'a str,
    pub elapsed: Option<Duration>,
    pub average: Option<f64>,
    pub answered: usize,
    pub theme: &'a Theme,
}

pub fn timer_text(elapsed: Option<Duration>) -> String {
    match elapsed {
        Some(d) => format!("Timer: {}", format_clock(d)),
        None => "Timer: --:--:--".to_string(),
    }
}

pub fn average_text(average: Option<f64>, answered: usize) -> String {
    match average {
        Some(avg) => format!("Avg {avg:.2}s over {answered}"),
        None => "Avg --".to_string(),
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let base = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

        let status_color = match self.status {
            s if s.starts_with("Failed") => colors.error(),
            s if s.starts_with("Sending") => colors.warning(),
            _ => colors.success(),
        };

        let line = Line::from(vec![
            Span::styled(" speedmath ", base.add_modifier(Modifier::BOLD)),
            Span::styled(format!("| {} ", self.mode.as_str()), base),
            Span::styled("| ", base),
            Span::styled(self.status.to_string(), base.fg(status_color)),
            Span::styled(" | ", base),
            Span::styled(timer_text(self.elapsed), base.fg(colors.timer())),
            Span::styled(" | ", base),
            Span::styled(average_text(self.average, self.answered), base),
        ]);

        Paragraph::new(line).style(base).render(area, buf);
    }
}
