// Catch-all error responder.
//
// Every SkillError ends up here and leaves as something the user can hear.
// Nothing is retried; the user can repeat the request.

use crate::alexa::envelope::SkillResponse;
use crate::alexa::SkillError;

const GENERIC_ERROR: &str = "Sorry, an error occurred.";
const MISSING_SLOT_MESSAGE: &str = "Sorry, I didn't catch all of that. What would you like to do?";
const MISSING_SLOT_REPROMPT: &str = "What would you like to do?";
const DATE_MESSAGE: &str = "Sorry, I didn't understand the date. Which day did you mean?";
const DATE_REPROMPT: &str = "Which day did you mean?";
const CAPACITY_MESSAGE: &str =
    "Sorry, there's no room left to record another expense for that day.";
const LEDGER_MESSAGE: &str =
    "Sorry, I couldn't reach your budget spreadsheet. Please try again in a moment.";

pub fn respond(err: &SkillError) -> SkillResponse {
    match err {
        SkillError::UnresolvedSlot(slot) => {
            tracing::warn!(slot, "Required slot missing after dialog completed");
            SkillResponse::speak(MISSING_SLOT_MESSAGE).reprompt(MISSING_SLOT_REPROMPT)
        }
        SkillError::DateParseFailure(date_err) => {
            tracing::info!("{}", date_err);
            SkillResponse::speak(DATE_MESSAGE).reprompt(DATE_REPROMPT)
        }
        SkillError::RowNotFound { label } => {
            tracing::info!(date = %label, "No ledger row for requested date");
            SkillResponse::speak(format!("I don't have any data for {}.", label))
        }
        SkillError::ColumnCapacityExceeded { row } => {
            tracing::warn!(row, "Ledger row is full");
            SkillResponse::speak(CAPACITY_MESSAGE)
        }
        SkillError::LedgerAccessFailure(store_err) => {
            tracing::error!("Ledger access failed: {}", store_err);
            SkillResponse::speak(LEDGER_MESSAGE)
        }
        SkillError::NoHandler => {
            tracing::warn!("{}", err);
            SkillResponse::speak(GENERIC_ERROR).reprompt(GENERIC_ERROR)
        }
        SkillError::UnverifiedApplication(app_id) => {
            tracing::warn!(application_id = %app_id, "Rejected request for foreign skill");
            SkillResponse::speak(GENERIC_ERROR)
        }
    }
}
