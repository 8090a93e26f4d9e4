use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::transcript::{Speaker, Transcript};
use crate::ui::theme::Theme;

/// Scrollable chat transcript, pinned to the newest line unless the user has
/// scrolled back.
pub struct ChatArea<'a> {
    transcript: &'a Transcript,
    theme: &'a Theme,
    scroll_back: u16,
}

impl<'a> ChatArea<'a> {
    pub fn new(transcript: &'a Transcript, theme: &'a Theme, scroll_back: u16) -> Self {
        Self {
            transcript,
            theme,
            scroll_back,
        }
    }

    /// How far the view can scroll back in an area of this size.
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let (inner_width, inner_height) = inner_size(area);
        let total = self.body().line_count(inner_width);
        clamp_u16(total.saturating_sub(inner_height as usize))
    }

    /// The transcript as a word-wrapped paragraph without its border. Row
    /// counts come from this so they match what is drawn.
    fn body(&self) -> Paragraph<'static> {
        let colors = &self.theme.colors;
        let mut lines: Vec<Line<'static>> = Vec::new();

        for chat_line in self.transcript.lines() {
            let speaker_color = match chat_line.speaker {
                Speaker::User => colors.user(),
                Speaker::Bot => colors.bot(),
                Speaker::System => colors.system(),
            };
            let body_style = match chat_line.speaker {
                Speaker::System => Style::default().fg(colors.system()),
                _ => Style::default().fg(colors.fg()),
            };

            let mut body = chat_line.text.lines();
            let first = body.next().unwrap_or("");
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", chat_line.at.format("%H:%M")),
                    Style::default().fg(colors.text_dim()),
                ),
                Span::styled(
                    format!("{}: ", chat_line.speaker.label()),
                    Style::default()
                        .fg(speaker_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(first.to_string(), body_style),
            ]));
            for rest in body {
                lines.push(Line::from(Span::styled(rest.to_string(), body_style)));
            }
        }

        Paragraph::new(lines).wrap(Wrap { trim: false })
    }
}

fn inner_size(area: Rect) -> (u16, u16) {
    (area.width.saturating_sub(2), area.height.saturating_sub(2))
}

fn clamp_u16(n: usize) -> u16 {
    n.min(u16::MAX as usize) as u16
}

impl Widget for ChatArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (inner_width, inner_height) = inner_size(area);

        let body = self.body();
        let total = body.line_count(inner_width);
        let bottom = total.saturating_sub(inner_height as usize);
        let offset = bottom.saturating_sub(self.scroll_back as usize);

        let title = if self.scroll_back > 0 {
            " Chat (scrolled, End to follow) "
        } else {
            " Chat "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        body.block(block)
            .scroll((clamp_u16(offset), 0))
            .render(area, buf);
    }
}
