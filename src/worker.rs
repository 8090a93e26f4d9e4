use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::event::AppEvent;
use crate::service::{self, TextService};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyKind {
    Question,
    Verification,
}

/// A finished request, tagged with the session epoch it was issued under.
#[derive(Clone, Debug)]
pub struct WorkerOutcome {
    pub epoch: u64,
    pub kind: ReplyKind,
    /// The reply text, or the failure text shown in its place.
    pub reply: Result<String, String>,
}

#[derive(Clone, Debug)]
pub enum Job {
    FetchQuestion { prompt: String },
    /// Verify an answer, then fetch the next question. Two outcomes are
    /// sent, verification first.
    VerifyThenFetch { verification: String, prompt: String },
}

/// Spawns one short-lived thread per job. Workers never touch UI state; every
/// result goes back through the event channel.
#[derive(Clone)]
pub struct Dispatcher {
    service: Arc<dyn TextService>,
    tx: Sender<AppEvent>,
}

impl Dispatcher {
    pub fn new(service: Arc<dyn TextService>, tx: Sender<AppEvent>) -> Self {
        Self { service, tx }
    }

    pub fn dispatch(&self, epoch: u64, job: Job) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        thread::spawn(move || run_job(service.as_ref(), &tx, epoch, job));
    }
}

fn run_job(service: &dyn TextService, tx: &Sender<AppEvent>, epoch: u64, job: Job) {
    let prompt = match job {
        Job::FetchQuestion { prompt } => prompt,
        Job::VerifyThenFetch {
            verification,
            prompt,
        } => {
            let reply = service::generate_or_failure(service, &verification);
            let outcome = WorkerOutcome {
                epoch,
                kind: ReplyKind::Verification,
                reply,
            };
            if tx.send(AppEvent::Worker(outcome)).is_err() {
                return;
            }
            prompt
        }
    };

    let reply = service::generate_or_failure(service, &prompt);
    let outcome = WorkerOutcome {
        epoch,
        kind: ReplyKind::Question,
        reply,
    };
    if tx.send(AppEvent::Worker(outcome)).is_err() {
        log::debug!("event loop gone, dropping question reply");
    }
}
