use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event};
use ratatui::Terminal;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::model::Submission;
use crate::storage::{RowStore, insert_with_timeout};

use super::action::Action;
use super::error::AppError;
use super::form::FormController;
use super::message::Message;
use super::view::draw;

/// How long to wait for a key before sending a [`Message::Tick`].
pub const TICK_RATE: Duration = Duration::from_millis(100);

/// Event loop: owns the form controller and runs submissions on the tokio
/// runtime.
///
/// Completed submissions come back through an mpsc channel and are applied
/// on the loop thread like any other message, so the controller is only
/// ever touched from one place.
pub struct App {
    form: FormController,
    store: Arc<dyn RowStore>,
    runtime: Handle,
    insert_timeout: Option<Duration>,
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
    should_quit: bool,
}

impl App {
    /// Creates an `App` with an empty form.
    pub fn new(store: Arc<dyn RowStore>, runtime: Handle, insert_timeout: Option<Duration>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            form: FormController::new(),
            store,
            runtime,
            insert_timeout,
            tx,
            rx,
            should_quit: false,
        }
    }

    /// Main event loop: draw → drain completions → read key or tick → dispatch.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            terminal.draw(|frame| draw(&self.form, frame))?;

            while let Ok(msg) = self.rx.try_recv() {
                self.dispatch(msg);
            }
            if self.should_quit {
                break;
            }

            let msg = if event::poll(TICK_RATE)? {
                match event::read()? {
                    Event::Key(key) => Message::Key(key),
                    _ => continue,
                }
            } else {
                Message::Tick
            };
            self.dispatch(msg);
        }
        log::info!("exiting");
        Ok(())
    }

    /// Applies one message to the form and carries out the resulting action.
    pub fn dispatch(&mut self, msg: Message) {
        match self.form.update(msg) {
            Action::None => {}
            Action::Quit => self.should_quit = true,
            Action::Submit(submission) => self.spawn_submission(submission),
        }
    }

    fn spawn_submission(&self, submission: Submission) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        let timeout = self.insert_timeout;
        self.runtime.spawn(async move {
            let msg = submit(store.as_ref(), submission, timeout).await;
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(msg);
        });
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

/// Checks a submission and, if it passes, inserts it. The outcome is
/// returned as the message to feed back to the form.
pub async fn submit(
    store: &dyn RowStore,
    submission: Submission,
    timeout: Option<Duration>,
) -> Message {
    if let Err(failure) = submission.check() {
        return Message::ValidationFailed(failure);
    }
    match insert_with_timeout(store, submission, timeout).await {
        Ok(()) => Message::InsertFinished(Ok(())),
        Err(e) => Message::InsertFinished(Err(e.to_string())),
    }
}
