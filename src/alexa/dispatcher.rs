// Intent dispatcher.
//
// Handlers are tried in registration order and the first one whose predicate
// accepts the request answers it. Predicates are written to be mutually
// exclusive (request kind + intent name + dialog state), so the order only
// matters if two of them ever overlap.
//
// Conversation flow:
//
//   Idle --LaunchRequest--> AwaitingIntent
//   AwaitingIntent --IntentRequest, dialog incomplete--> Dialog.Delegate --> AwaitingIntent
//   AwaitingIntent --IntentRequest, dialog complete--> handler reply --> Idle
//
// Session-open replies (launch, help, fallback, date reprompts) keep the user
// in AwaitingIntent; everything else ends the session.

use super::envelope::{IntentRequest, Request, RequestEnvelope, ResponseEnvelope, SkillResponse};
use super::handlers::errors;
use super::{Data, SkillError};
use async_trait::async_trait;

/// Everything a handler gets to look at.
pub struct HandlerInput<'a> {
    pub envelope: &'a RequestEnvelope,
    pub data: &'a Data,
}

impl<'a> HandlerInput<'a> {
    pub fn request(&self) -> &'a Request {
        &self.envelope.request
    }

    pub fn intent_request(&self) -> Option<&'a IntentRequest> {
        match self.request() {
            Request::IntentRequest(intent_request) => Some(intent_request),
            _ => None,
        }
    }

    pub fn intent_name(&self) -> Option<&'a str> {
        self.intent_request().map(|r| r.intent.name.as_str())
    }

    /// True for an intent request named `name` whose dialog is finished.
    pub fn is_completed_intent(&self, name: &str) -> bool {
        self.intent_request()
            .is_some_and(|r| r.intent.name == name && r.dialog_complete())
    }
}

#[async_trait]
pub trait RequestHandler: Send + Sync {
    fn name(&self) -> &'static str;

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool;

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError>;
}

pub struct Skill {
    data: Data,
    handlers: Vec<Box<dyn RequestHandler>>,
    skill_id: Option<String>,
}

impl Skill {
    pub fn new(data: Data, handlers: Vec<Box<dyn RequestHandler>>) -> Self {
        Self {
            data,
            handlers,
            skill_id: None,
        }
    }

    /// Rejects requests addressed to any other application id.
    pub fn with_skill_id(mut self, skill_id: Option<String>) -> Self {
        self.skill_id = skill_id;
        self
    }

    /// Answers one request. Never fails: errors become spoken apologies.
    pub async fn dispatch(&self, envelope: &RequestEnvelope) -> SkillResponse {
        match self.try_dispatch(envelope).await {
            Ok(response) => response,
            Err(err) => errors::respond(&err),
        }
    }

    /// Decodes a raw envelope, dispatches it, and builds the reply envelope.
    pub async fn handle_json(&self, body: &str) -> Result<ResponseEnvelope, serde_json::Error> {
        let envelope: RequestEnvelope = serde_json::from_str(body)?;
        Ok(self.dispatch(&envelope).await.into_envelope())
    }

    async fn try_dispatch(&self, envelope: &RequestEnvelope) -> Result<SkillResponse, SkillError> {
        self.verify_application(envelope)?;

        let input = HandlerInput {
            envelope,
            data: &self.data,
        };

        let handler = self
            .handlers
            .iter()
            .find(|handler| handler.can_handle(&input))
            .ok_or(SkillError::NoHandler)?;

        tracing::info!(
            handler = handler.name(),
            request_id = envelope.request.request_id().unwrap_or("-"),
            intent = input.intent_name().unwrap_or("-"),
            "Dispatching request"
        );

        handler.handle(&input).await
    }

    fn verify_application(&self, envelope: &RequestEnvelope) -> Result<(), SkillError> {
        let Some(expected) = self.skill_id.as_deref() else {
            return Ok(());
        };

        match envelope.application_id() {
            Some(actual) if actual == expected => Ok(()),
            actual => Err(SkillError::UnverifiedApplication(
                actual.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
