//! Dialogue turn orchestration: resolve, compose, generate.

use std::sync::Arc;

use budtender_core::{SessionState, TurnOutcome};
use context_resolver::ContextResolver;
use llm_client::{GenerationError, LlmClient};
use tracing::{error, info, instrument};

/// Answer returned when the generator fails.
pub const APOLOGY_ANSWER: &str =
    "I'm sorry, I couldn't process your question right now. Please try again.";

/// Runs one turn: resolves the grounding context, composes the prompt and calls the generator.
#[derive(Clone)]
pub struct DialogueTurnOrchestrator {
    resolver: ContextResolver,
    generator: Arc<dyn LlmClient>,
}

impl DialogueTurnOrchestrator {
    pub fn new(resolver: ContextResolver, generator: Arc<dyn LlmClient>) -> Self {
        Self {
            resolver,
            generator,
        }
    }

    /// Answers `question` for the given session state. Never fails: a generator error yields
    /// [`APOLOGY_ANSWER`] with no context and no topic change.
    ///
    /// The session is only read; the caller persists the next state (see
    /// [`SessionState::advance`]).
    #[instrument(skip(self, session))]
    pub async fn handle_turn(&self, question: &str, session: Option<&SessionState>) -> TurnOutcome {
        let resolution = self.resolver.resolve(question, session).await;

        let history = session
            .map(|s| s.conversation_history.as_slice())
            .unwrap_or_default();
        let prompt = prompt::compose(
            question,
            resolution.context.as_ref().map(|c| c.description.as_str()),
            &resolution.product_name,
            history,
        );

        match self.generator.generate(&prompt).await {
            Ok(answer) => {
                info!(
                    topic_changed = resolution.topic_changed,
                    product_name = %resolution.product_name,
                    "Answer generated"
                );
                TurnOutcome {
                    answer,
                    context_used: resolution.context,
                    topic_changed: resolution.topic_changed,
                }
            }
            Err(e) => {
                match &e {
                    GenerationError::Transport(_) => {
                        error!(error = %e, "Generator unreachable")
                    }
                    GenerationError::Service { status, .. } => {
                        error!(error = %e, status = ?status, "Generator refused request")
                    }
                    GenerationError::EmptyResponse => error!("Generator returned no text"),
                }
                Self::apology()
            }
        }
    }

    fn apology() -> TurnOutcome {
        TurnOutcome {
            answer: APOLOGY_ANSWER.to_string(),
            context_used: None,
            topic_changed: false,
        }
    }
}
