// This is the entry point of the Daily Budget voice skill.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic): dates, slots, ledger addressing, replies
// - `infra/` = Implementations of core traits (Google Sheets, in-memory ledger)
// - `alexa/` = Voice platform adapter (envelopes, dispatcher, handlers, runtime loop)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Register the request handlers
// 4. Serve requests (Lambda runtime loop, or one envelope from stdin)

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "alexa/alexa_layer.rs"]
mod alexa;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::alexa::lambda_runtime::{self, LambdaRuntime};
use crate::alexa::{handlers, Data, Skill};
use crate::core::dates::DateService;
use crate::core::ledger::{LedgerLayout, LedgerService, LedgerStore};
use crate::infra::google_sheets::GoogleSheetsClient;
use crate::infra::ledger::InMemoryLedgerStore;
use anyhow::anyhow;
use chrono::Duration;
use std::sync::Arc;

/// Days before and after today seeded into the in-memory ledger.
const MEMORY_LEDGER_PAST_DAYS: i64 = 30;
const MEMORY_LEDGER_FUTURE_DAYS: i64 = 7;

/// Picks the ledger backend from `LEDGER_BACKEND` (`sheets` or `memory`).
async fn build_ledger_store(
    layout: &LedgerLayout,
    dates: &DateService,
) -> anyhow::Result<Box<dyn LedgerStore>> {
    let backend = std::env::var("LEDGER_BACKEND").unwrap_or_else(|_| "sheets".to_string());

    match backend.as_str() {
        "memory" => {
            let today = dates.today().day();
            let days = (-MEMORY_LEDGER_PAST_DAYS..=MEMORY_LEDGER_FUTURE_DAYS)
                .map(|offset| crate::core::dates::CalendarDate::new(today + Duration::days(offset)));

            tracing::warn!("Using in-memory ledger; nothing will be persisted");
            Ok(Box::new(InMemoryLedgerStore::seeded(layout, days)))
        }
        "sheets" => {
            let client = GoogleSheetsClient::from_env()
                .await
                .map_err(|e| anyhow!("Failed to set up Google Sheets ledger: {}", e))?;
            Ok(Box::new(client))
        }
        other => Err(anyhow!("Unknown LEDGER_BACKEND '{}'", other)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only ever carries the response envelope.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let dates = DateService::from_env();
    let layout = LedgerLayout::default();

    let store = build_ledger_store(&layout, &dates).await?;
    let ledger = LedgerService::new(store, layout, dates.timezone());

    let data = Data {
        ledger: Arc::new(ledger),
        dates: Arc::new(dates),
    };

    let skill_id = std::env::var("ALEXA_SKILL_ID").ok();
    if skill_id.is_none() {
        tracing::warn!("ALEXA_SKILL_ID not set; accepting requests for any application");
    }

    let skill = Skill::new(data, handlers::default_handlers()).with_skill_id(skill_id);

    // ========================================================================
    // SERVE
    // ========================================================================

    match LambdaRuntime::from_env() {
        Some(runtime) => runtime.run(&skill).await,
        None => lambda_runtime::serve_stdin(&skill).await,
    }
}
