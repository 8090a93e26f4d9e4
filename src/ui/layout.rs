use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions for the chat view. Footer hints may wrap onto a second
/// line on narrow terminals.
pub struct ChatLayout {
    pub header: Rect,
    pub chat: Rect,
    pub input: Rect,
    pub footer: Rect,
}

impl ChatLayout {
    pub fn new(area: Rect, footer_lines: u16) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(footer_lines.max(1)),
            ])
            .split(area);

        Self {
            header: vertical[0],
            chat: vertical[1],
            input: vertical[2],
            footer: vertical[3],
        }
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 40;
    const MIN_POPUP_HEIGHT: u16 = 7;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_hint_lines_wraps() {
        let hints = ["[Enter] Send", "[Ctrl+R] Restart", "[Esc] Quit"];
        assert_eq!(pack_hint_lines(&hints, 80).len(), 1);
        let narrow = pack_hint_lines(&hints, 20);
        assert_eq!(narrow.len(), 3);
        assert!(narrow.iter().all(|l| l.chars().count() <= 20));
        assert!(pack_hint_lines(&hints, 0).is_empty());
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 30, 5);
        let popup = centered_rect(50, 50, area);
        assert!(popup.width <= area.width && popup.height <= area.height);

        let big = Rect::new(0, 0, 200, 60);
        let popup = centered_rect(50, 20, big);
        assert_eq!(popup, Rect::new(50, 24, 100, 12));
    }

    #[test]
    fn test_chat_layout_regions() {
        let layout = ChatLayout::new(Rect::new(0, 0, 80, 24), 1);
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.input.height, 3);
        assert_eq!(layout.footer.height, 1);
        assert_eq!(layout.chat.height, 19);
    }
}
