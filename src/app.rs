use std::cell::Cell;
use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::config::Config;
use crate::event::AppEvent;
use crate::service::TextService;
use crate::session::answer;
use crate::session::extract::MarkdownExtractor;
use crate::session::state::SessionState;
use crate::session::timing::TimingAggregator;
use crate::session::transcript::Transcript;
use crate::store::json_store::JsonStore;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;
use crate::worker::{Dispatcher, Job, ReplyKind, WorkerOutcome};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialog {
    Warning { title: String, message: String },
    ConfirmQuit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Starting,
    Sending,
    Received,
    Ready,
    Failed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Starting => "Starting...",
            Status::Sending => "Sending request...",
            Status::Received => "Received response",
            Status::Ready => "Ready",
            Status::Failed => "Failed: request error",
        }
    }
}

/// Top-level controller. Owns every piece of session state; only the UI
/// thread touches it.
pub struct App {
    pub config: Config,
    pub theme: &'static Theme,
    pub session: SessionState,
    pub timing: TimingAggregator,
    pub transcript: Transcript,
    pub input: LineInput,
    pub dialog: Option<Dialog>,
    pub status: Status,
    /// Rows scrolled up from the bottom of the chat area.
    pub scroll_back: u16,
    /// Largest useful `scroll_back`, refreshed on every render.
    pub max_scroll: Cell<u16>,
    pub should_quit: bool,
    in_flight: bool,
    epoch: u64,
    dispatcher: Dispatcher,
    store: Option<JsonStore>,
}

impl App {
    pub fn new(
        config: Config,
        service: Arc<dyn TextService>,
        store: Option<JsonStore>,
        tx: Sender<AppEvent>,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let extractor = MarkdownExtractor::from_patterns_or_default(
            &config.question_pattern,
            &config.options_pattern,
        );
        let mut session = SessionState::with_extractor(Box::new(extractor));
        if config.resume_session
            && let Some(ref s) = store
        {
            session.restore(&s.load_snapshot());
        }

        Self {
            config,
            theme,
            session,
            timing: TimingAggregator::new(),
            transcript: Transcript::new(),
            input: LineInput::new(""),
            dialog: None,
            status: Status::Starting,
            scroll_back: 0,
            max_scroll: Cell::new(0),
            should_quit: false,
            in_flight: false,
            epoch: 0,
            dispatcher: Dispatcher::new(service, tx),
            store,
        }
    }

    /// Show the restored question if there is a usable one, otherwise ask
    /// the service for a first question.
    pub fn start(&mut self) {
        let resumed = self
            .session
            .current()
            .filter(|record| record.is_complete())
            .cloned();

        match resumed {
            Some(record) => {
                self.transcript
                    .system("Resuming the question from your last session.");
                self.transcript.bot(format!(
                    "**Question:** {}\n**Options:** {}",
                    record.question_text, record.options_text
                ));
                self.timing.start();
                self.status = Status::Ready;
            }
            None => self.fetch_question(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn fetch_question(&mut self) {
        self.transcript.system(format!(
            "Sending question request to {}...",
            self.config.model
        ));
        self.dispatch(Job::FetchQuestion {
            prompt: self.config.question_prompt.clone(),
        });
    }

    fn dispatch(&mut self, job: Job) {
        self.in_flight = true;
        self.status = Status::Sending;
        self.dispatcher.dispatch(self.epoch, job);
    }

    /// Submit whatever is in the answer box; the box is cleared only when
    /// the answer is accepted.
    pub fn submit(&mut self) {
        let raw = self.input.value().to_string();
        if self.submit_answer(&raw) {
            self.input.clear();
        }
    }

    /// Validate and send an answer. Returns false, with a warning dialog and
    /// no other state change, when the answer is rejected.
    pub fn submit_answer(&mut self, raw: &str) -> bool {
        let answer = match answer::validate(self.config.answer_mode, raw) {
            Ok(answer) => answer,
            Err(e) => {
                self.warn("Invalid Input", e.to_string());
                return false;
            }
        };

        if self.in_flight {
            self.warn(
                "Please Wait",
                "A request is still in progress. Send your answer once the reply arrives.",
            );
            return false;
        }

        self.scroll_back = 0;
        self.transcript.user(answer.as_str());

        if let Some(elapsed) = self.timing.stop_and_record() {
            self.transcript.bot(format!(
                "Time taken for this question: {elapsed:.2} seconds."
            ));
            if let Some(avg) = self.timing.average() {
                self.transcript
                    .bot(format!("Average time per question: {avg:.2} seconds."));
            }
        }

        match self.session.check_answer(&answer) {
            Some(verification) => {
                log::info!("checking answer {answer:?}");
                self.dispatch(Job::VerifyThenFetch {
                    verification,
                    prompt: self.config.question_prompt.clone(),
                });
            }
            None => {
                self.transcript.bot(
                    "I cannot validate your answer as the question is missing. \
                     Fetching a new question.",
                );
                self.fetch_question();
            }
        }
        true
    }

    /// Drop the current question untimed and fetch another.
    pub fn skip_question(&mut self) {
        if self.in_flight {
            self.warn("Please Wait", "A question is already on its way.");
            return;
        }
        self.timing.cancel();
        self.session.clear_record();
        self.scroll_back = 0;
        self.transcript.system("Skipping to a new question.");
        self.fetch_question();
    }

    /// Fold a worker result into the session. Results issued before the
    /// last reset are ignored.
    pub fn handle_worker(&mut self, outcome: WorkerOutcome) {
        if outcome.epoch != self.epoch {
            log::debug!(
                "discarding {:?} reply from epoch {} (now {})",
                outcome.kind,
                outcome.epoch,
                self.epoch
            );
            return;
        }

        self.scroll_back = 0;
        match (outcome.kind, outcome.reply) {
            (ReplyKind::Verification, Ok(text)) => {
                self.session.record_verification(&text);
                self.transcript.bot(text);
                self.status = Status::Received;
            }
            (ReplyKind::Verification, Err(text)) => {
                self.transcript.bot(text);
                self.status = Status::Failed;
            }
            (ReplyKind::Question, Ok(text)) => {
                self.in_flight = false;
                self.session.record_question(&text);
                self.transcript.bot(text);
                self.timing.start();
                self.status = Status::Ready;
            }
            (ReplyKind::Question, Err(text)) => {
                self.in_flight = false;
                self.session.clear_record();
                self.transcript.bot(text);
                self.status = Status::Failed;
            }
        }
    }

    /// Clear all in-memory state and start over with a new question.
    pub fn reset(&mut self) {
        log::info!("session reset");
        self.epoch += 1;
        self.in_flight = false;
        self.session.reset();
        self.timing.reset();
        self.transcript.clear();
        self.input.clear();
        self.dialog = None;
        self.scroll_back = 0;
        self.save_snapshot();
        self.transcript.system("Session restarted.");
        self.fetch_question();
    }

    pub fn save_snapshot(&self) {
        if !self.config.persist_session {
            return;
        }
        if let Some(ref store) = self.store
            && let Err(e) = store.save_snapshot(&self.session.snapshot())
        {
            log::error!("could not save session: {e:#}");
        }
    }

    pub fn warn(&mut self, title: &str, message: impl Into<String>) {
        self.dialog = Some(Dialog::Warning {
            title: title.to_string(),
            message: message.into(),
        });
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn request_quit(&mut self) {
        self.dialog = Some(Dialog::ConfirmQuit);
    }

    pub fn quit(&mut self) {
        self.save_snapshot();
        self.should_quit = true;
    }

    pub fn cycle_theme(&mut self) {
        let Some(name) = Theme::next_name(&self.config.theme) else {
            return;
        };
        if let Some(new_theme) = Theme::load(&name) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.config.theme = name;
        }
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.scroll_back = self
            .scroll_back
            .saturating_add(rows)
            .min(self.max_scroll.get());
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(rows);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_back = 0;
    }
}
