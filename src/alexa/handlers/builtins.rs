// Built-in platform intents: help, fallback, stop/cancel, session end.

use super::{CANCEL_INTENT, FALLBACK_INTENT, HELP_INTENT, STOP_INTENT};
use crate::alexa::dispatcher::{HandlerInput, RequestHandler};
use crate::alexa::envelope::{Request, SkillResponse};
use crate::alexa::SkillError;
use async_trait::async_trait;

const HELP_MESSAGE: &str = "You can say add coffee for three dollars, \
    ask how much budget I have left today, or ask what I spent yesterday. \
    What can I help you with?";
const HELP_REPROMPT: &str = "What can I help you with?";
const FALLBACK_MESSAGE: &str = "The Daily Budget skill can't help you with that. \
    It can record an expense or tell you about your budget. What can I help you with?";
const FALLBACK_REPROMPT: &str = "What can I help you with?";
const STOP_MESSAGE: &str = "Goodbye!";

pub struct HelpHandler;

#[async_trait]
impl RequestHandler for HelpHandler {
    fn name(&self) -> &'static str {
        "help"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.intent_name() == Some(HELP_INTENT)
    }

    async fn handle(&self, _input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        Ok(SkillResponse::speak(HELP_MESSAGE).reprompt(HELP_REPROMPT))
    }
}

pub struct FallbackHandler;

#[async_trait]
impl RequestHandler for FallbackHandler {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.intent_name() == Some(FALLBACK_INTENT)
    }

    async fn handle(&self, _input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        Ok(SkillResponse::speak(FALLBACK_MESSAGE).reprompt(FALLBACK_REPROMPT))
    }
}

/// Cancel and stop both just say goodbye.
pub struct ExitHandler;

#[async_trait]
impl RequestHandler for ExitHandler {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        matches!(input.intent_name(), Some(CANCEL_INTENT) | Some(STOP_INTENT))
    }

    async fn handle(&self, _input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        Ok(SkillResponse::speak(STOP_MESSAGE))
    }
}

pub struct SessionEndedHandler;

#[async_trait]
impl RequestHandler for SessionEndedHandler {
    fn name(&self) -> &'static str {
        "session_ended"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        matches!(input.request(), Request::SessionEndedRequest(_))
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        if let Request::SessionEndedRequest(ended) = input.request() {
            tracing::info!(
                reason = ended.reason.as_deref().unwrap_or("unknown"),
                error = ?ended.error,
                "Session ended"
            );
        }

        // The platform ignores any speech in reply to a session end.
        Ok(SkillResponse::empty())
    }
}

#[cfg(test)]
mod tests {
    use crate::alexa::dispatcher::tests::{intent, request, seeded_store, skill_with};
    use serde_json::json;

    #[tokio::test]
    async fn test_help_reprompts() {
        let skill = skill_with(seeded_store());
        let response = skill.dispatch(&intent("AMAZON.HelpIntent", json!({}))).await;
        assert!(response.speech_text.starts_with("You can say"));
        assert_eq!(
            response.reprompt_text.as_deref(),
            Some("What can I help you with?")
        );
        assert!(!response.should_end_session);
    }

    #[tokio::test]
    async fn test_fallback_reprompts() {
        let skill = skill_with(seeded_store());
        let response = skill
            .dispatch(&intent("AMAZON.FallbackIntent", json!({})))
            .await;
        assert!(response.speech_text.contains("can't help you with that"));
        assert!(!response.should_end_session);
    }

    #[tokio::test]
    async fn test_cancel_and_stop_say_goodbye() {
        let skill = skill_with(seeded_store());
        for name in ["AMAZON.CancelIntent", "AMAZON.StopIntent"] {
            let response = skill.dispatch(&intent(name, json!({}))).await;
            assert_eq!(response.speech_text, "Goodbye!");
            assert!(response.should_end_session);
        }
    }

    #[tokio::test]
    async fn test_session_ended_is_silent() {
        let skill = skill_with(seeded_store());
        let response = skill.dispatch(&request("SessionEndedRequest")).await;
        assert!(response.speech_text.is_empty());
        assert!(response.reprompt_text.is_none());
    }
}
