use super::SKILL_NAME;
use crate::alexa::dispatcher::{HandlerInput, RequestHandler};
use crate::alexa::envelope::{Request, SkillResponse};
use crate::alexa::SkillError;
use async_trait::async_trait;

const WELCOME_MESSAGE: &str = "Welcome to Daily Budget. You can add an expense, \
    or ask how your budget or expenses look for a day. What would you like to do?";
const WELCOME_REPROMPT: &str = "What would you like to do?";

pub struct LaunchHandler;

#[async_trait]
impl RequestHandler for LaunchHandler {
    fn name(&self) -> &'static str {
        "launch"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        matches!(input.request(), Request::LaunchRequest(_))
    }

    async fn handle(&self, _input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        Ok(SkillResponse::speak(WELCOME_MESSAGE)
            .reprompt(WELCOME_REPROMPT)
            .with_simple_card(SKILL_NAME, WELCOME_MESSAGE))
    }
}
