use scorekeep::prelude::*;
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

const EMAIL: &str = "ana@example.com";
const PASSWORD: &str = "hunter22";

/// A store that already holds a few rivals' best scores.
fn rival_scores() -> MemoryDocumentStore {
    MemoryDocumentStore::with_root(json!({
        "Puntos": {
            "rival-1": { "Puntaje": 5 },
            "rival-2": { "Puntaje": 12 },
            "rival-3": { "Puntaje": 7 },
            "rival-4": { "Puntaje": 30 },
        }
    }))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// One play session
// ---------------------------------------------------------------------------

/// Registers a player, plays three rounds, and returns the leaderboard.
async fn play(keeper: &ScorekeeperHandle) -> Result<LeaderboardView, ScorekeepError> {
    keeper
        .register(RegistrationForm {
            name: "Ana".to_string(),
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
            confirm_password: PASSWORD.to_string(),
        })
        .await?;

    // A typo on the way back in: logged and returned, session unchanged.
    keeper.sign_out().await?;
    if let Err(e) = keeper.login(EMAIL, "hunter2").await {
        tracing::info!(message = e.auth_message().unwrap_or_default(), "login rejected");
    }
    keeper.login(EMAIL, PASSWORD).await?;

    for round in [14, 41, 27] {
        let outcome = keeper.submit_score(round).await?;
        tracing::info!(round, ?outcome, "round finished");
    }

    keeper.top_scores().await
}

/// Prints every UI event until the scorekeeper stops.
async fn show(mut events: UnboundedReceiver<UiEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            UiEvent::Navigate { scene } => println!("-> scene {scene}"),
            UiEvent::ScoreText(text) => println!("leaderboard: {text}"),
            UiEvent::SignedIn(user_id) => println!("signed in: {user_id}"),
            UiEvent::SignedOut(user_id) => println!("signed out: {user_id}"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (keeper, events) = Scorekeeper::builder()
        .start(MemoryIdentityProvider::new(), rival_scores())
        .await?;
    let ui = tokio::spawn(show(events));

    let board = play(&keeper).await?;
    tracing::info!(top = %board, "demo finished");

    keeper.shutdown().await?;
    ui.await?;
    Ok(())
}
