use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Datelike, Weekday};
use log::{debug, info};
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;

use crate::application::Application;
use crate::client::{CheckRequest, check_for_update};
use crate::ledger::{Ledger, LedgerRecord};
use crate::options::CheckOptions;

/// What [`UpdateNotifier::check`] decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The kill-switch variable is set to `true`.
    Disabled,
    /// The ledger already records a check for today's weekday.
    AlreadyCheckedToday,
    /// There is no tokio runtime to run the background check on.
    NoRuntime,
    /// A background check is running.
    Started,
}

type Messages = Arc<Mutex<Vec<String>>>;

/// Runs update checks in the background and holds their messages until the
/// host is ready to show them.
///
/// Create one per process, call [`check`](Self::check) early and
/// [`print`](Self::print) just before exiting.
pub struct UpdateNotifier {
    ledger: Ledger,
    today: fn() -> Weekday,
    messages: Messages,
    tasks: TaskTracker,
}

impl Default for UpdateNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ledger(Ledger::user())
    }

    #[must_use]
    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger,
            today: local_weekday,
            messages: Arc::default(),
            tasks: TaskTracker::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, today: fn() -> Weekday) -> Self {
        self.today = today;
        self
    }

    /// Start a background update check for `app` unless one already ran
    /// today. Never blocks on the network and never fails; problems are only
    /// logged at debug level.
    ///
    /// `production` selects the production endpoint over the development one.
    pub fn check(
        &self,
        app: &Application,
        current_version: &str,
        production: bool,
        options: &CheckOptions,
    ) -> CheckOutcome {
        if options.resolve_kill_switch().is_engaged() {
            return CheckOutcome::Disabled;
        }

        let record = self.ledger.load(app);
        if record.was_checked_on((self.today)()) {
            debug!("skipping update check for {app} until tomorrow");
            return CheckOutcome::AlreadyCheckedToday;
        }

        let Ok(runtime) = Handle::try_current() else {
            debug!("no tokio runtime available, skipping update check for {app}");
            return CheckOutcome::NoRuntime;
        };

        lock(&self.messages).clear();

        let job = BackgroundCheck {
            ledger: self.ledger.clone(),
            request: CheckRequest::new(app.clone(), current_version),
            client: options.resolve_client(),
            endpoint: options.resolve_endpoint(production),
            caller: options.resolve_caller(),
            today: self.today,
            messages: Arc::clone(&self.messages),
        };
        self.tasks.spawn_on(job.run(), &runtime);

        CheckOutcome::Started
    }

    /// Wait for every background check started so far to finish.
    pub async fn wait(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }

    /// Wait for outstanding checks, then hand over the non-empty messages in
    /// the order they arrived. Each message is returned once.
    pub async fn drain(&self) -> Vec<String> {
        self.wait().await;
        let messages = std::mem::take(&mut *lock(&self.messages));
        messages
            .into_iter()
            .filter(|message| !message.is_empty())
            .collect()
    }

    /// Wait for outstanding checks and log each pending message at info level.
    pub async fn print(&self) {
        for message in self.drain().await {
            info!("{message}");
        }
    }
}

struct BackgroundCheck {
    ledger: Ledger,
    request: CheckRequest,
    client: reqwest::Client,
    endpoint: String,
    caller: String,
    today: fn() -> Weekday,
    messages: Messages,
}

impl BackgroundCheck {
    async fn run(self) {
        let response =
            match check_for_update(&self.client, &self.endpoint, &self.request, &self.caller)
                .await
            {
                Ok(response) => response,
                Err(error) => {
                    debug!("error when checking for updates: {error}");
                    return;
                }
            };

        let app = self.request.application;
        let record = LedgerRecord::checked_on((self.today)());
        let ledger = self.ledger;
        let save_app = app.clone();
        match tokio::task::spawn_blocking(move || ledger.save(&save_app, &record)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                debug!("error saving update check ledger: {error}");
                return;
            }
            Err(error) => {
                debug!("update check ledger task failed: {error}");
                return;
            }
        }

        if response.update_required {
            debug!("update available for {app}");
        }
        lock(&self.messages).push(response.message);
    }
}

fn lock(messages: &Mutex<Vec<String>>) -> MutexGuard<'_, Vec<String>> {
    messages.lock().unwrap_or_else(PoisonError::into_inner)
}

fn local_weekday() -> Weekday {
    chrono::Local::now().weekday()
}
