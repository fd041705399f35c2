//! Background execution of chat turns.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::QueryBackend;
use crate::chat::{Turn, TurnOutcome};

use super::ChatSession;

/// Send `turn` to the backend on a background task.
///
/// The task is never cancelled; whatever the backend eventually answers
/// (or the error it fails with) is recorded on `session`.
pub fn spawn_turn(
    session: ChatSession,
    turn: Turn,
    backend: Arc<dyn QueryBackend>,
) -> JoinHandle<()> {
    tokio::spawn(run_turn(session, turn, backend))
}

/// Drive one turn to completion.
pub async fn run_turn(session: ChatSession, turn: Turn, backend: Arc<dyn QueryBackend>) {
    debug!(
        session_id = %session.id(),
        turn = %turn.id,
        query = %turn.query,
        "Sending query to backend"
    );

    let outcome = match backend.run_query(&turn.query).await {
        Ok(resp) => {
            info!(
                name: "chat.turn.completed",
                session_id = %session.id(),
                turn = %turn.id,
                content_length = resp.content.len(),
                "Backend answered"
            );
            TurnOutcome::Answered(resp.content)
        }
        Err(e) => {
            warn!(
                name: "chat.turn.failed",
                session_id = %session.id(),
                turn = %turn.id,
                error = %e,
                "Backend call failed"
            );
            TurnOutcome::Failed(e.to_string())
        }
    };

    session.complete(turn.id, outcome);
}
