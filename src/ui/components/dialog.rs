use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::app::Dialog;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Modal overlay for warnings and the quit confirmation.
pub struct DialogView<'a> {
    dialog: &'a Dialog,
    theme: &'a Theme,
}

impl<'a> DialogView<'a> {
    pub fn new(dialog: &'a Dialog, theme: &'a Theme) -> Self {
        Self { dialog, theme }
    }
}

impl Widget for DialogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let (title, message, hint, border) = match self.dialog {
            Dialog::Warning { title, message } => (
                format!(" {title} "),
                message.as_str(),
                "[Enter] OK",
                colors.warning(),
            ),
            Dialog::ConfirmQuit => (
                " Quit ".to_string(),
                "Do you really want to quit?",
                "[y] Yes  [n] No",
                colors.error(),
            ),
        };

        let dialog_area = centered_rect(50, 25, area);
        Clear.render(dialog_area, buf);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(message.to_string(), Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(Span::styled(
                hint,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(colors.bg()))
            .block(
                Block::bordered()
                    .title(title)
                    .border_style(Style::default().fg(border))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(dialog_area, buf);
    }
}
