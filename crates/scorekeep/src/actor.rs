//! The scorekeeper task.
//!
//! Owns the session manager and the score store. Commands and auth-state
//! notifications are handled one at a time, so a provider or store call
//! always completes before the next request starts.
//!
//! Auth failures are logged by the session manager and returned to the
//! caller; they never reach the UI stream.

use scorekeep_model::UserId;
use scorekeep_session::{
    AuthStateChanges, AuthTransition, IdentityProvider, SessionManager,
};
use scorekeep_store::{DocumentStore, ScoreStore, StoreError};
use tokio::sync::mpsc;

use crate::keeper::Command;
use crate::{ScorekeepError, UiEvent};

pub(crate) struct Actor<P: IdentityProvider, D: DocumentStore> {
    sessions: SessionManager<P>,
    scores: ScoreStore<D>,
    auth_changes: AuthStateChanges,
    receiver: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl<P: IdentityProvider, D: DocumentStore> Actor<P, D> {
    pub(crate) fn new(
        sessions: SessionManager<P>,
        scores: ScoreStore<D>,
        auth_changes: AuthStateChanges,
        receiver: mpsc::Receiver<Command>,
        events: mpsc::UnboundedSender<UiEvent>,
    ) -> Self {
        Self {
            sessions,
            scores,
            auth_changes,
            receiver,
            events,
        }
    }

    /// Runs until shutdown or until every handle is dropped.
    pub(crate) async fn run(mut self) {
        tracing::info!("scorekeeper started");
        let mut provider_alive = true;

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle(cmd).await {
                        break;
                    }
                }
                change = self.auth_changes.next(), if provider_alive => {
                    match change {
                        Some(identity) => {
                            let transition = self.sessions.on_auth_state_changed(identity);
                            self.report(transition);
                        }
                        None => {
                            tracing::debug!("identity provider stopped sending auth changes");
                            provider_alive = false;
                        }
                    }
                }
            }
        }

        tracing::info!("scorekeeper stopped");
    }

    /// Handles one command. Returns `false` when the loop should stop.
    async fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Login {
                email,
                password,
                reply,
            } => {
                let before = self.current_user();
                let result = self.sessions.login(&email, &password).await;
                self.report_change(before);
                if let Ok(nav) = &result {
                    self.emit(UiEvent::Navigate {
                        scene: nav.scene.clone(),
                    });
                }
                let _ = reply.send(result.map_err(ScorekeepError::from));
            }
            Command::Register { form, reply } => {
                let before = self.current_user();
                let result = self.sessions.register(&form).await;
                self.report_change(before);
                let _ = reply.send(result.map_err(ScorekeepError::from));
            }
            Command::ChangePassword { email, reply } => {
                let result = self.sessions.change_password(&email).await;
                let _ = reply.send(result.map_err(ScorekeepError::from));
            }
            Command::SignOut { reply } => {
                let result = self.sessions.sign_out().await;
                if let Ok(Some(user_id)) = &result {
                    self.emit(UiEvent::SignedOut(user_id.clone()));
                }
                let _ = reply.send(result.map_err(ScorekeepError::from));
            }
            Command::TopScores { reply } => {
                let result = self.scores.top_scores().await;
                match &result {
                    Ok(view) => self.emit(UiEvent::ScoreText(view.to_string())),
                    // Nothing to render; already logged by the store.
                    Err(StoreError::NoData(_)) => {}
                    Err(e) => tracing::warn!(error = %e, "leaderboard not refreshed"),
                }
                let _ = reply.send(result.map_err(ScorekeepError::from));
            }
            Command::SubmitScore { score, reply } => {
                let result = self.scores.update_score(self.sessions.session(), score).await;
                if let Err(e) = &result {
                    tracing::error!(error = %e, score, "score submission failed");
                }
                let _ = reply.send(result.map_err(ScorekeepError::from));
            }
            Command::Session { reply } => {
                let _ = reply.send(self.sessions.session().clone());
            }
            Command::Shutdown => {
                tracing::info!("scorekeeper shutting down");
                return false;
            }
        }
        true
    }

    fn current_user(&self) -> Option<UserId> {
        self.sessions.session().user_id.clone()
    }

    /// Reports the difference between `before` and the current session.
    fn report_change(&self, before: Option<UserId>) {
        let after = self.current_user();
        if before == after {
            return;
        }
        self.report(AuthTransition {
            signed_out: before,
            signed_in: after,
        });
    }

    fn report(&self, transition: AuthTransition) {
        if let Some(user_id) = transition.signed_out {
            self.emit(UiEvent::SignedOut(user_id));
        }
        if let Some(user_id) = transition.signed_in {
            self.emit(UiEvent::SignedIn(user_id));
        }
    }

    fn emit(&self, event: UiEvent) {
        // The UI may have stopped listening; requests still get replies.
        let _ = self.events.send(event);
    }
}
