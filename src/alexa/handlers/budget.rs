use super::{DATE_SLOT, GET_BUDGET_INTENT, SKILL_NAME};
use crate::alexa::dispatcher::{HandlerInput, RequestHandler};
use crate::alexa::envelope::SkillResponse;
use crate::alexa::SkillError;
use crate::core::replies::budget_reply;
use async_trait::async_trait;

/// "How much budget do I have left today?"
pub struct GetBudgetHandler;

#[async_trait]
impl RequestHandler for GetBudgetHandler {
    fn name(&self) -> &'static str {
        "get_budget"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_completed_intent(GET_BUDGET_INTENT)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        let slots = input
            .intent_request()
            .map(|r| r.intent.normalized_slots())
            .unwrap_or_default();

        let dates = &input.data.dates;
        let resolved = dates.resolve(slots.resolved(DATE_SLOT))?;

        let info = input
            .data
            .ledger
            .budget_info(resolved.date)
            .await
            .map_err(|e| SkillError::from_ledger(e, &resolved.label))?;

        let speech = budget_reply(&resolved.label, dates.tense_for(resolved.date), &info);
        Ok(SkillResponse::speak(speech.clone()).with_simple_card(SKILL_NAME, speech))
    }
}

#[cfg(test)]
mod tests {
    use crate::alexa::dispatcher::tests::{col, intent, seeded_store, skill_with};
    use serde_json::json;

    fn store_with_info() -> crate::infra::ledger::InMemoryLedgerStore {
        let store = seeded_store();
        // March 1st (row 2) and March 3rd (row 6)
        for row in [2, 6] {
            store.set_cell(col("B"), row, "$20.00");
            store.set_cell(col("C"), row, "$30.00");
            store.set_cell(col("D"), row, "$112.40");
        }
        store
    }

    #[tokio::test]
    async fn test_budget_today_is_present_tense() {
        let skill = skill_with(store_with_info());
        let response = skill.dispatch(&intent("GetBudgetIntent", json!({}))).await;

        assert_eq!(
            response.speech_text,
            "For today, you have spent $20.00, you have $30.00 remaining, \
             and your total savings is $112.40."
        );
        assert!(response.should_end_session);
    }

    #[tokio::test]
    async fn test_budget_in_the_past_is_past_tense() {
        let skill = skill_with(store_with_info());
        let response = skill
            .dispatch(&intent(
                "GetBudgetIntent",
                json!({ "Date": { "name": "Date", "value": "2019-03-01" } }),
            ))
            .await;

        assert!(response.speech_text.starts_with("For March 1st,"));
        assert!(response.speech_text.contains("you had $30.00 remaining"));
    }

    #[tokio::test]
    async fn test_budget_for_unknown_day() {
        let skill = skill_with(store_with_info());
        let response = skill
            .dispatch(&intent(
                "GetBudgetIntent",
                json!({ "Date": { "name": "Date", "value": "2019-04-01" } }),
            ))
            .await;

        assert_eq!(response.speech_text, "I don't have any data for April 1st.");
    }

    #[tokio::test]
    async fn test_budget_with_unparseable_date() {
        let skill = skill_with(store_with_info());
        let response = skill
            .dispatch(&intent(
                "GetBudgetIntent",
                json!({ "Date": { "name": "Date", "value": "2019-W10" } }),
            ))
            .await;

        assert_eq!(response.reprompt_text.as_deref(), Some("Which day did you mean?"));
    }
}
