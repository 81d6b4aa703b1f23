// =============================================================================
// GOOGLE SHEETS MODULE
// =============================================================================
//
// The production ledger lives in a Google spreadsheet. This module lives in the
// infra layer because it handles external I/O (HTTP requests to Google APIs).
// The core layer only knows about cell ranges and rendered cell text.
//
// **Setup:**
// 1. Enable the Google Sheets API for a Google Cloud project
// 2. Create a service account and download its JSON key
// 3. Share the ledger spreadsheet with the service account email as Editor
// 4. Set `GOOGLE_SERVICE_ACCOUNT_KEY` (or `GOOGLE_SERVICE_ACCOUNT_JSON`) and
//    `LEDGER_SPREADSHEET_ID`

pub mod google_sheets_client;
pub mod service_account;

pub use google_sheets_client::GoogleSheetsClient;
