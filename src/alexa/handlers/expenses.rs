// Adding and listing expenses.

use super::{ADD_EXPENSE_INTENT, AMOUNT_SLOT, DATE_SLOT, GET_EXPENSES_INTENT, ITEM_SLOT, SKILL_NAME};
use crate::alexa::dispatcher::{HandlerInput, RequestHandler};
use crate::alexa::envelope::SkillResponse;
use crate::alexa::SkillError;
use crate::core::ledger::ExpenseRecord;
use crate::core::replies::{expense_added_reply, expenses_reply};
use crate::core::slots::Slots;
use async_trait::async_trait;

fn slots_of(input: &HandlerInput<'_>) -> Slots {
    input
        .intent_request()
        .map(|r| r.intent.normalized_slots())
        .unwrap_or_default()
}

fn required<'s>(slots: &'s Slots, name: &'static str) -> Result<&'s str, SkillError> {
    slots.resolved(name).ok_or(SkillError::UnresolvedSlot(name))
}

/// "Add coffee for three dollars."
pub struct AddExpenseHandler;

#[async_trait]
impl RequestHandler for AddExpenseHandler {
    fn name(&self) -> &'static str {
        "add_expense"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_completed_intent(ADD_EXPENSE_INTENT)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        let slots = slots_of(input);
        let item = required(&slots, ITEM_SLOT)?;
        let amount = required(&slots, AMOUNT_SLOT)?;
        let resolved = input.data.dates.resolve(slots.resolved(DATE_SLOT))?;

        let record = ExpenseRecord {
            item: item.to_string(),
            amount: amount.to_string(),
            date: resolved.date,
        };

        input
            .data
            .ledger
            .add_expense(&record)
            .await
            .map_err(|e| SkillError::from_ledger(e, &resolved.label))?;

        let speech = expense_added_reply(&record.item, &record.amount, &resolved.label);
        Ok(SkillResponse::speak(speech.clone()).with_simple_card(SKILL_NAME, speech))
    }
}

/// "What did I spend yesterday?"
pub struct GetExpensesHandler;

#[async_trait]
impl RequestHandler for GetExpensesHandler {
    fn name(&self) -> &'static str {
        "get_expenses"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_completed_intent(GET_EXPENSES_INTENT)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<SkillResponse, SkillError> {
        let slots = slots_of(input);
        let dates = &input.data.dates;
        let resolved = dates.resolve(slots.resolved(DATE_SLOT))?;

        let entries = input
            .data
            .ledger
            .expenses(resolved.date)
            .await
            .map_err(|e| SkillError::from_ledger(e, &resolved.label))?;

        let speech = expenses_reply(&resolved.label, dates.tense_for(resolved.date), &entries);
        Ok(SkillResponse::speak(speech.clone()).with_simple_card(SKILL_NAME, speech))
    }
}

#[cfg(test)]
mod tests {
    use crate::alexa::dispatcher::tests::{col, intent, seeded_store, skill_with};
    use crate::core::ledger::LedgerLayout;
    use serde_json::json;

    fn add_expense_slots(item: &str, amount: &str) -> serde_json::Value {
        json!({
            "Item": { "name": "Item", "value": item },
            "Amount": { "name": "Amount", "value": amount },
            "Date": { "name": "Date" }
        })
    }

    #[tokio::test]
    async fn test_add_expense_to_third_available_column() {
        let store = seeded_store();
        // Today (March 3rd) lives at row 6 with two expenses already recorded.
        store.set_cell(col("E"), 6, "Coffee");
        store.set_cell(col("E"), 7, "$3.00");
        store.set_cell(col("F"), 6, "Lunch");
        store.set_cell(col("F"), 7, "$12.50");

        let skill = skill_with(store.clone());
        let response = skill
            .dispatch(&intent(
                "AddExpenseIntent",
                add_expense_slots("Lyft ride", "$8.02"),
            ))
            .await;

        assert_eq!(
            response.speech_text,
            "Okay, I added Lyft ride for $8.02 to your expenses for today."
        );
        assert!(response.should_end_session);
        assert_eq!(store.cell(col("G"), 6).as_deref(), Some("Lyft ride"));
        assert_eq!(store.cell(col("G"), 7).as_deref(), Some("$8.02"));
        assert_eq!(store.cell(col("H"), 6), None);
    }

    #[tokio::test]
    async fn test_add_expense_uses_canonical_item() {
        let store = seeded_store();
        let skill = skill_with(store.clone());
        let slots = json!({
            "Item": {
                "name": "Item",
                "value": "coffee",
                "resolutions": { "resolutionsPerAuthority": [{
                    "status": { "code": "ER_SUCCESS_MATCH" },
                    "values": [{ "value": { "name": "Coffee" } }]
                }]}
            },
            "Amount": { "name": "Amount", "value": "$3" },
            "Date": { "name": "Date", "value": "2019-03-01" }
        });

        let response = skill.dispatch(&intent("AddExpenseIntent", slots)).await;

        assert_eq!(
            response.speech_text,
            "Okay, I added Coffee for $3 to your expenses for March 1st."
        );
        assert_eq!(store.cell(col("E"), 2).as_deref(), Some("Coffee"));
    }

    #[tokio::test]
    async fn test_add_expense_missing_amount() {
        let store = seeded_store();
        let skill = skill_with(store.clone());
        let slots = json!({ "Item": { "name": "Item", "value": "coffee" } });

        let response = skill.dispatch(&intent("AddExpenseIntent", slots)).await;

        assert!(response.speech_text.starts_with("Sorry, I didn't catch"));
        assert_eq!(store.cell(col("E"), 6), None);
    }

    #[tokio::test]
    async fn test_add_expense_to_full_day() {
        let store = seeded_store();
        for column in LedgerLayout::default().available_columns() {
            store.set_cell(*column, 6, "x");
        }
        let skill = skill_with(store);

        let response = skill
            .dispatch(&intent("AddExpenseIntent", add_expense_slots("Tea", "$2")))
            .await;

        assert!(response.speech_text.contains("no room left"));
    }

    #[tokio::test]
    async fn test_no_expenses_sentence() {
        let skill = skill_with(seeded_store());
        let response = skill
            .dispatch(&intent(
                "GetExpensesIntent",
                json!({ "Date": { "name": "Date", "value": "2019-03-02" } }),
            ))
            .await;

        assert_eq!(response.speech_text, "There are no expenses for March 2nd");
    }

    #[tokio::test]
    async fn test_expenses_today() {
        let store = seeded_store();
        store.set_cell(col("E"), 6, "Coffee");
        store.set_cell(col("E"), 7, "$3.00");
        store.set_cell(col("F"), 6, "Lunch");
        store.set_cell(col("F"), 7, "$12.50");
        let skill = skill_with(store);

        let response = skill
            .dispatch(&intent("GetExpensesIntent", json!({})))
            .await;

        assert_eq!(
            response.speech_text,
            "Your 2 expenses for today are Coffee for $3.00 and Lunch for $12.50."
        );
    }

    #[tokio::test]
    async fn test_added_expense_is_listed() {
        let skill = skill_with(seeded_store());
        skill
            .dispatch(&intent(
                "AddExpenseIntent",
                add_expense_slots("Lyft ride", "$8.02"),
            ))
            .await;

        let response = skill
            .dispatch(&intent("GetExpensesIntent", json!({})))
            .await;
        assert_eq!(
            response.speech_text,
            "Your only expense for today is Lyft ride for $8.02."
        );
    }
}
