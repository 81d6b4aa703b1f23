use super::DIALOG_INTENTS;
use crate::alexa::dispatcher::{HandlerInput, RequestHandler};
use crate::alexa::envelope::SkillResponse;
use crate::alexa::SkillError;
use async_trait::async_trait;

/// Hands unfinished slot filling back to the platform's dialog manager.
pub struct DialogDelegateHandler;

#[async_trait]
impl RequestHandler for DialogDelegateHandler {
    fn name(&self) -> &'static str {
        "dialog_delegate"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.intent_request().is_some_and(|r| {
            DIALOG_INTENTS.contains(&r.intent.name.as_str()) && !r.dialog_complete()
        })
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        tracing::debug!(
            intent = input.intent_name().unwrap_or("-"),
            "Delegating dialog"
        );
        Ok(SkillResponse::delegate())
    }
}
