//! Session-aware turns: load state, run the turn, persist the advanced state.

use std::sync::Arc;

use budtender_core::TurnOutcome;
use session_store::SessionStore;
use tracing::instrument;

use crate::orchestrator::DialogueTurnOrchestrator;

#[derive(Clone)]
pub struct ChatService {
    orchestrator: DialogueTurnOrchestrator,
    sessions: Arc<dyn SessionStore>,
    history_limit: usize,
}

impl ChatService {
    pub fn new(
        orchestrator: DialogueTurnOrchestrator,
        sessions: Arc<dyn SessionStore>,
        history_limit: usize,
    ) -> Self {
        Self {
            orchestrator,
            sessions,
            history_limit,
        }
    }

    /// Answers `question` within `session_id`'s conversation and saves the next state.
    #[instrument(skip(self))]
    pub async fn respond(&self, session_id: &str, question: &str) -> TurnOutcome {
        let state = self.sessions.get_or_create(session_id).await;
        let outcome = self.orchestrator.handle_turn(question, Some(&state)).await;
        let next = state.advance(question, &outcome, self.history_limit);
        self.sessions.save(session_id, next).await;
        outcome
    }
}
