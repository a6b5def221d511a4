use std::time::Duration;

use async_trait::async_trait;
use mergington_models::ActivityRoster;
use tracing::instrument;

use crate::{
    api::ActivityApi,
    events::BoardEvent,
    notice::{Notice, NoticeKind, NoticeSlot},
    render::BoardView,
};

pub const LOAD_FAILED_TEXT: &str = "Failed to load activities. Please try again later.";
pub const SIGNUP_FALLBACK_SUCCESS: &str = "Signed up successfully";
pub const SIGNUP_FALLBACK_ERROR: &str = "An error occurred";
pub const SIGNUP_NETWORK_ERROR: &str = "Failed to sign up. Please try again.";
pub const REMOVE_FALLBACK_ERROR: &str = "Error removing participant";
pub const REMOVE_NETWORK_ERROR: &str = "Network error while removing participant";

pub const DEFAULT_NOTICE_HIDE_AFTER: Duration = Duration::from_secs(5);

/// Blocking user prompts the board needs from whatever hosts it.
#[async_trait]
pub trait Interaction: Send {
    /// Asks a yes/no question. `false` means the action is abandoned.
    async fn confirm(&mut self, prompt: &str) -> bool;
    async fn alert(&mut self, message: &str);
}

/// What the activity list currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Placeholder before the first load finished.
    Loading,
    Loaded(ActivityRoster),
    /// The last load failed, the list shows [`LOAD_FAILED_TEXT`].
    Failed,
}

impl Listing {
    pub fn roster(&self) -> Option<&ActivityRoster> {
        match self {
            Listing::Loaded(roster) => Some(roster),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    /// Selected activity name, empty while the placeholder option is selected.
    pub activity: String,
}

impl SignupForm {
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.activity.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// The user declined the confirmation, nothing was sent.
    Declined,
    /// The API answered with an error.
    Rejected,
    /// The API could not be reached or answered with something unreadable.
    Failed,
}

/// The activity board: an activity list, a signup form and the notice below it.
///
/// Every operation is one request followed by one update. The roster is replaced wholesale on
/// each load, nothing is patched in place and nothing is updated before the API confirmed it.
pub struct ActivityBoard<A, I> {
    api: A,
    interaction: I,
    listing: Listing,
    form: SignupForm,
    notices: NoticeSlot,
    hide_after: Duration,
}

impl<A: ActivityApi, I: Interaction> ActivityBoard<A, I> {
    pub fn new(api: A, interaction: I) -> Self {
        Self {
            api,
            interaction,
            listing: Listing::Loading,
            form: SignupForm::default(),
            notices: NoticeSlot::new(),
            hide_after: DEFAULT_NOTICE_HIDE_AFTER,
        }
    }

    pub fn with_hide_after(mut self, hide_after: Duration) -> Self {
        self.hide_after = hide_after;
        self
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn form(&self) -> &SignupForm {
        &self.form
    }

    /// For hosts that mirror what the user typed before submitting.
    pub fn form_mut(&mut self) -> &mut SignupForm {
        &mut self.form
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notices.current()
    }

    pub fn interaction(&self) -> &I {
        &self.interaction
    }

    pub fn view(&self) -> BoardView<'_> {
        BoardView {
            listing: &self.listing,
            form: &self.form,
            notice: self.notices.current(),
        }
    }

    /// Fetches the roster and replaces the list and the selector options with it.
    ///
    /// The selector is rebuilt as well, so a pending selection is dropped.
    #[instrument(skip(self))]
    pub async fn load_activities(&mut self) -> ActionOutcome {
        let (listing, outcome) = match self.api.activities().await {
            Ok(roster) => {
                debug!("loaded {} activities", roster.len());
                (Listing::Loaded(roster), ActionOutcome::Completed)
            }
            Err(e) => {
                error!("Error fetching activities: {}", e);
                let outcome = if e.is_rejection() {
                    ActionOutcome::Rejected
                } else {
                    ActionOutcome::Failed
                };
                (Listing::Failed, outcome)
            }
        };
        self.listing = listing;
        self.form.activity.clear();
        outcome
    }

    /// Removes `email` from `activity` once the user confirmed it, then reloads.
    #[instrument(skip(self))]
    pub async fn remove_participant(&mut self, activity: &str, email: &str) -> ActionOutcome {
        let prompt = format!("Remove {} from {}?", email, activity);
        if !self.interaction.confirm(&prompt).await {
            debug!("removal of {} from {} declined", email, activity);
            return ActionOutcome::Declined;
        }
        match self.api.unregister(activity, email).await {
            Ok(msg) => {
                info!("{}", msg.message);
                self.load_activities().await;
                ActionOutcome::Completed
            }
            Err(e) if e.is_rejection() => {
                let text = e.detail().unwrap_or(REMOVE_FALLBACK_ERROR).to_string();
                warn!("removal rejected: {}", e);
                self.interaction.alert(&text).await;
                ActionOutcome::Rejected
            }
            Err(e) => {
                error!("Error removing participant: {}", e);
                self.interaction.alert(REMOVE_NETWORK_ERROR).await;
                ActionOutcome::Failed
            }
        }
    }

    /// Signs `email` up for `activity`, both taken verbatim from the form.
    ///
    /// On success the form is cleared and the list reloaded, on failure the form keeps what was
    /// submitted. Either way a notice is shown and hidden again after the configured delay.
    #[instrument(skip(self))]
    pub async fn submit_signup(&mut self, email: &str, activity: &str) -> ActionOutcome {
        self.form = SignupForm {
            email: email.to_string(),
            activity: activity.to_string(),
        };
        match self.api.signup(activity, email).await {
            Ok(msg) => {
                info!("{}", msg.message);
                let text = if msg.message.is_empty() {
                    SIGNUP_FALLBACK_SUCCESS.to_string()
                } else {
                    msg.message
                };
                self.notices.show(NoticeKind::Success, text, self.hide_after);
                self.form = SignupForm::default();
                self.load_activities().await;
                ActionOutcome::Completed
            }
            Err(e) if e.is_rejection() => {
                let text = e.detail().unwrap_or(SIGNUP_FALLBACK_ERROR).to_string();
                warn!("signup rejected: {}", e);
                self.notices.show(NoticeKind::Error, text, self.hide_after);
                ActionOutcome::Rejected
            }
            Err(e) => {
                error!("Error signing up: {}", e);
                self.notices
                    .show(NoticeKind::Error, SIGNUP_NETWORK_ERROR, self.hide_after);
                ActionOutcome::Failed
            }
        }
    }

    /// Single entry point for every control on the board.
    pub async fn dispatch(&mut self, event: BoardEvent) -> ActionOutcome {
        trace!("dispatching {:?}", event);
        match event {
            BoardEvent::Refresh => self.load_activities().await,
            BoardEvent::Signup { email, activity } => self.submit_signup(&email, &activity).await,
            BoardEvent::Unregister { activity, email } => {
                self.remove_participant(&activity, &email).await
            }
        }
    }
}
