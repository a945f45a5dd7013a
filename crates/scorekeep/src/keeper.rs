//! `ScorekeeperBuilder` and the handle used to talk to a running
//! scorekeeper.
//!
//! A scorekeeper is one Tokio task that owns the session manager and the
//! score store. Everything else talks to it through a
//! [`ScorekeeperHandle`], and hears back through a stream of
//! [`UiEvent`]s.

use scorekeep_model::{Identity, UserId};
use scorekeep_session::{
    IdentityProvider, Navigation, RegistrationForm, Session, SessionConfig, SessionManager,
};
use scorekeep_store::{DocumentStore, LeaderboardView, ScoreStore, ScoreUpdate, StoreConfig};
use tokio::sync::{mpsc, oneshot};

use crate::actor::Actor;
use crate::{ScorekeepConfig, ScorekeepError, UiEvent};

/// Reply channel for a command.
pub(crate) type Reply<T> = oneshot::Sender<Result<T, ScorekeepError>>;

/// Commands sent to the scorekeeper task.
///
/// Most carry a `oneshot` reply channel; the caller sends the command
/// and waits for the result on that channel.
pub(crate) enum Command {
    Login {
        email: String,
        password: String,
        reply: Reply<Navigation>,
    },
    Register {
        form: RegistrationForm,
        reply: Reply<Identity>,
    },
    ChangePassword {
        email: String,
        reply: Reply<()>,
    },
    SignOut {
        reply: Reply<Option<UserId>>,
    },
    TopScores {
        reply: Reply<LeaderboardView>,
    },
    SubmitScore {
        score: u64,
        reply: Reply<ScoreUpdate>,
    },
    Session {
        reply: oneshot::Sender<Session>,
    },
    Shutdown,
}

/// Builder for configuring and starting a scorekeeper.
///
/// # Example
///
/// ```rust,ignore
/// use scorekeep::prelude::*;
///
/// let (keeper, mut events) = Scorekeeper::builder()
///     .store_config(StoreConfig { leaderboard_size: 5, ..Default::default() })
///     .start(provider, store)
///     .await?;
/// keeper.login("ana@example.com", "hunter22").await?;
/// ```
pub struct ScorekeeperBuilder {
    config: ScorekeepConfig,
}

impl ScorekeeperBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ScorekeepConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ScorekeepConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Sets the store configuration.
    pub fn store_config(mut self, config: StoreConfig) -> Self {
        self.config.store = config;
        self
    }

    /// Sets how many requests may queue before handle calls wait.
    pub fn command_buffer(mut self, size: usize) -> Self {
        self.config.command_buffer = size;
        self
    }

    /// Checks the provider's dependencies and starts the event loop.
    ///
    /// Returns a handle for sending requests and the stream of UI events.
    ///
    /// # Errors
    /// - [`ScorekeepError::Session`] wrapping `DependencyUnavailable` if
    ///   the identity provider can't be used. No task is started.
    /// - [`ScorekeepError::Store`] if the store configuration names an
    ///   unusable collection or field.
    pub async fn start<P, D>(
        self,
        provider: P,
        store: D,
    ) -> Result<(ScorekeeperHandle, mpsc::UnboundedReceiver<UiEvent>), ScorekeepError>
    where
        P: IdentityProvider,
        D: DocumentStore,
    {
        let scores = ScoreStore::new(store, self.config.store)?;
        let (sessions, auth_changes) =
            SessionManager::initialize(provider, self.config.session).await?;

        let (cmd_tx, cmd_rx) = mpsc::channel(self.config.command_buffer.max(1));
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let actor = Actor::new(sessions, scores, auth_changes, cmd_rx, event_tx);
        tokio::spawn(actor.run());

        Ok((ScorekeeperHandle { sender: cmd_tx }, event_rx))
    }
}

impl Default for ScorekeeperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry point for building a scorekeeper.
pub struct Scorekeeper;

impl Scorekeeper {
    /// Creates a new builder.
    pub fn builder() -> ScorekeeperBuilder {
        ScorekeeperBuilder::new()
    }
}

/// Handle to a running scorekeeper.
///
/// Cheap to clone: it's an `mpsc::Sender` wrapper. Requests from every
/// clone are handled one at a time, in the order they arrive.
#[derive(Clone)]
pub struct ScorekeeperHandle {
    sender: mpsc::Sender<Command>,
}

impl ScorekeeperHandle {
    /// Signs in. On success the UI is also sent [`UiEvent::Navigate`].
    pub async fn login(&self, email: &str, password: &str) -> Result<Navigation, ScorekeepError> {
        self.request(|reply| Command::Login {
            email: email.to_string(),
            password: password.to_string(),
            reply,
        })
        .await?
    }

    /// Creates an account with a display name and signs it in.
    pub async fn register(&self, form: RegistrationForm) -> Result<Identity, ScorekeepError> {
        self.request(|reply| Command::Register { form, reply })
            .await?
    }

    /// Sends a password-reset email to `email`.
    pub async fn change_password(&self, email: &str) -> Result<(), ScorekeepError> {
        self.request(|reply| Command::ChangePassword {
            email: email.to_string(),
            reply,
        })
        .await?
    }

    /// Signs the current player out. Returns who was signed out.
    pub async fn sign_out(&self) -> Result<Option<UserId>, ScorekeepError> {
        self.request(|reply| Command::SignOut { reply }).await?
    }

    /// Loads the leaderboard. On success the UI is also sent
    /// [`UiEvent::ScoreText`].
    pub async fn top_scores(&self) -> Result<LeaderboardView, ScorekeepError> {
        self.request(|reply| Command::TopScores { reply }).await?
    }

    /// Records `score` as the signed-in player's best if it beats the
    /// stored one.
    pub async fn submit_score(&self, score: u64) -> Result<ScoreUpdate, ScorekeepError> {
        self.request(|reply| Command::SubmitScore { score, reply })
            .await?
    }

    /// A snapshot of the current session.
    pub async fn session(&self) -> Result<Session, ScorekeepError> {
        self.request(|reply| Command::Session { reply }).await
    }

    /// Tells the scorekeeper to stop after the requests already queued.
    pub async fn shutdown(&self) -> Result<(), ScorekeepError> {
        self.sender
            .send(Command::Shutdown)
            .await
            .map_err(|_| ScorekeepError::Unavailable)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ScorekeepError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| ScorekeepError::Unavailable)?;
        reply_rx.await.map_err(|_| ScorekeepError::Unavailable)
    }
}
