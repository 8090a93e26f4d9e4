use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use speedmath::app::{App, Dialog};
use speedmath::config::Config;
use speedmath::event::{AppEvent, EventHandler};
use speedmath::logging;
use speedmath::service::gemini::GeminiClient;
use speedmath::service::{self, TextService};
use speedmath::session::answer::AnswerMode;
use speedmath::store::json_store::{JsonStore, default_data_dir};
use speedmath::ui::components::chat_area::ChatArea;
use speedmath::ui::components::dialog::DialogView;
use speedmath::ui::components::status_bar::StatusBar;
use speedmath::ui::layout::{ChatLayout, pack_hint_lines};
use speedmath::ui::line_input::InputResult;
use speedmath::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "speedmath",
    version,
    about = "Terminal speed-math practice with questions from Gemini"
)]
struct Cli {
    #[arg(short, long, value_enum, help = "How answers are checked before sending")]
    mode: Option<AnswerMode>,

    #[arg(long, help = "Gemini model name")]
    model: Option<String>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Ignore the saved session and start with a new question")]
    fresh: bool,

    #[arg(long, help = "Write the current configuration to disk and exit")]
    init_config: bool,
}

const HINTS: [&str; 6] = [
    "[Enter] Send",
    "[Ctrl+N] New question",
    "[Ctrl+R] Restart",
    "[Ctrl+T] Theme",
    "[PgUp/PgDn] Scroll",
    "[Esc] Quit",
];

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = default_data_dir();
    if let Err(e) = logging::init(&data_dir) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        log::warn!("could not read {}: {e:#}", Config::config_path().display());
        Config::default()
    });
    if let Some(mode) = cli.mode {
        config.answer_mode = mode;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    config.validate(&Theme::available_themes());

    if cli.init_config {
        let path = config.save()?;
        println!("Wrote {}", path.display());
        return Ok(());
    }
    if cli.fresh {
        config.resume_session = false;
    }

    let api_key = service::api_key_from_env(&config.api_key_env);
    let service: Arc<dyn TextService> = Arc::new(GeminiClient::new(
        &config.api_base_url,
        &config.model,
        api_key,
        &config.api_key_env,
        config.request_timeout(),
    )?);

    let store = if config.persist_session || config.resume_session {
        match JsonStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                log::error!("session store unavailable: {e:#}");
                None
            }
        }
    } else {
        None
    };

    log::info!(
        "starting: model={} mode={} theme={}",
        config.model,
        config.answer_mode.as_str(),
        config.theme
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(config.tick_rate());
    let mut app = App::new(config, service, store, events.sender());
    app.start();

    let result = run_app(&mut terminal, &mut app, &events);
    events.stop();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("exiting on error: {err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Worker(outcome) => app.handle_worker(outcome),
            // Redraw only; the timer reads the clock when drawn.
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if let Some(dialog) = app.dialog.clone() {
        handle_dialog_key(app, &dialog, key);
        return;
    }

    match key.code {
        KeyCode::Char('r') if ctrl => app.reset(),
        KeyCode::Char('n') if ctrl => app.skip_question(),
        KeyCode::Char('t') if ctrl => app.cycle_theme(),
        KeyCode::F(2) => app.cycle_theme(),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        _ => {
            if key.code == KeyCode::End {
                app.scroll_to_bottom();
            }
            match app.input.handle(key) {
                InputResult::Submit => app.submit(),
                InputResult::Cancel => app.request_quit(),
                InputResult::Continue => {}
            }
        }
    }
}

fn handle_dialog_key(app: &mut App, dialog: &Dialog, key: KeyEvent) {
    match dialog {
        Dialog::Warning { .. } => {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')
            ) {
                app.dismiss_dialog();
            }
        }
        Dialog::ConfirmQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.quit(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.dismiss_dialog(),
            _ => {}
        },
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let footer_lines = pack_hint_lines(&HINTS, area.width as usize);
    let layout = ChatLayout::new(area, footer_lines.len() as u16);

    frame.render_widget(
        StatusBar {
            mode: app.config.answer_mode,
            status: app.status.label(),
            elapsed: app.timing.elapsed(),
            average: app.timing.average(),
            answered: app.timing.count(),
            theme: app.theme,
        },
        layout.header,
    );

    let chat = ChatArea::new(&app.transcript, app.theme, app.scroll_back);
    app.max_scroll.set(chat.max_scroll(layout.chat));
    frame.render_widget(chat, layout.chat);

    render_input(frame, app, layout.input);

    let footer = Paragraph::new(
        footer_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_dim()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);

    if let Some(ref dialog) = app.dialog {
        frame.render_widget(DialogView::new(dialog, app.theme), area);
    }
}

fn render_input(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;

    let title = if app.is_busy() {
        " Answer (waiting for reply...) ".to_string()
    } else {
        format!(" Answer ({}) ", app.config.answer_mode.hint())
    };
    let border = if app.dialog.is_none() && !app.is_busy() {
        colors.border_focused()
    } else {
        colors.border()
    };

    let (before, at, after) = app.input.render_parts();
    let cursor_style = Style::default()
        .fg(colors.cursor_fg())
        .bg(colors.cursor_bg())
        .add_modifier(Modifier::BOLD);
    let line = Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(before.to_string(), Style::default().fg(colors.fg())),
        Span::styled(at.unwrap_or(' ').to_string(), cursor_style),
        Span::styled(after.to_string(), Style::default().fg(colors.fg())),
    ]);

    let input = Paragraph::new(line).block(
        Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg())),
    );
    frame.render_widget(input, area);
}
