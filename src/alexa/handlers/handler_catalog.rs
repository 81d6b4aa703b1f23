// Request handlers.
// Each group of intents gets its own file.

pub mod budget;
pub mod builtins;
pub mod dialog;
pub mod errors;
pub mod expenses;
pub mod launch;

use super::dispatcher::RequestHandler;

pub const SKILL_NAME: &str = "Daily Budget";

pub const ADD_EXPENSE_INTENT: &str = "AddExpenseIntent";
pub const GET_BUDGET_INTENT: &str = "GetBudgetIntent";
pub const GET_EXPENSES_INTENT: &str = "GetExpensesIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";

/// Intents that carry a dialog model and may need slot filling.
pub const DIALOG_INTENTS: &[&str] = &[ADD_EXPENSE_INTENT, GET_BUDGET_INTENT, GET_EXPENSES_INTENT];

pub const ITEM_SLOT: &str = "Item";
pub const AMOUNT_SLOT: &str = "Amount";
pub const DATE_SLOT: &str = "Date";

/// Handlers in dispatch order.
pub fn default_handlers() -> Vec<Box<dyn RequestHandler>> {
    vec![
        Box::new(launch::LaunchHandler),
        Box::new(dialog::DialogDelegateHandler),
        Box::new(expenses::AddExpenseHandler),
        Box::new(budget::GetBudgetHandler),
        Box::new(expenses::GetExpensesHandler),
        Box::new(builtins::HelpHandler),
        Box::new(builtins::ExitHandler),
        Box::new(builtins::FallbackHandler),
        Box::new(builtins::SessionEndedHandler),
    ]
}
