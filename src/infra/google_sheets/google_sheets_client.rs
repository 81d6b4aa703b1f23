// =============================================================================
// GOOGLE SHEETS LEDGER STORE
// =============================================================================
//
// Implements the core LedgerStore trait on top of the Sheets v4 values API.
// Only two calls are used:
//
// - `GET  spreadsheets/{id}/values/{range}` to read a block of cells
// - `PUT  spreadsheets/{id}/values/{range}` to overwrite a block of cells
//
// **Environment Variables:**
// - `LEDGER_SPREADSHEET_ID` - The spreadsheet holding the ledger
// - `LEDGER_SHEET_NAME` - Tab name inside the spreadsheet (default `Budget`)
//
// The spreadsheet must be shared with the service account email with
// "Editor" access.

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;

use super::service_account::ServiceAccountAuth;
use crate::core::ledger::{CellRange, LedgerStore, LedgerStoreError};
use async_trait::async_trait;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DEFAULT_SHEET_NAME: &str = "Budget";

/// The voice platform abandons a request after roughly eight seconds, and a
/// write may need three round trips.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub sheet_name: String,
}

impl SheetsConfig {
    pub fn from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let spreadsheet_id = std::env::var("LEDGER_SPREADSHEET_ID")
            .map_err(|_| "LEDGER_SPREADSHEET_ID environment variable not set")?;
        let sheet_name =
            std::env::var("LEDGER_SHEET_NAME").unwrap_or_else(|_| DEFAULT_SHEET_NAME.to_string());

        Ok(Self {
            spreadsheet_id,
            sheet_name,
        })
    }

    /// `'Budget'!E5:Y6`. Quotes inside the tab name are doubled.
    pub fn qualified_range(&self, range: &CellRange) -> String {
        format!("'{}'!{}", self.sheet_name.replace('\'', "''"), range.a1())
    }
}

// =============================================================================
// SHEETS API STRUCTURES
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    range: Option<String>,
    #[serde(default)]
    major_dimension: Option<String>,
    /// Omitted entirely when every cell in the range is blank.
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn transport(err: reqwest::Error) -> LedgerStoreError {
    LedgerStoreError::Transport(err.to_string())
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct GoogleSheetsClient {
    client: Client,
    auth: ServiceAccountAuth,
    config: SheetsConfig,
}

impl GoogleSheetsClient {
    pub fn new(
        auth: ServiceAccountAuth,
        config: SheetsConfig,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            auth,
            config,
        })
    }

    /// Creates a client with service account and sheet settings from the environment.
    pub async fn from_env() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let auth = ServiceAccountAuth::from_env().await?;
        let config = SheetsConfig::from_env()?;

        tracing::info!(
            spreadsheet = %config.spreadsheet_id,
            sheet = %config.sheet_name,
            account = %auth.client_email(),
            "Using Google Sheets ledger"
        );

        Self::new(auth, config)
    }

    fn values_url(&self, range: &CellRange) -> Result<Url, LedgerStoreError> {
        let mut url =
            Url::parse(SHEETS_API_BASE).map_err(|e| LedgerStoreError::Transport(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| LedgerStoreError::Transport("Invalid Sheets API base URL".to_string()))?
            .push(&self.config.spreadsheet_id)
            .push("values")
            .push(&self.config.qualified_range(range));

        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, LedgerStoreError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(LedgerStoreError::Api { status, body })
    }
}

#[async_trait]
impl LedgerStore for GoogleSheetsClient {
    async fn read_range(&self, range: &CellRange) -> Result<Vec<Vec<String>>, LedgerStoreError> {
        let token = self.auth.get_access_token().await?;
        let url = self.values_url(range)?;

        tracing::debug!(range = %range, "Reading ledger range");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "FORMATTED_VALUE"),
                ("dateTimeRenderOption", "FORMATTED_STRING"),
            ])
            .send()
            .await
            .map_err(transport)?;

        let body = Self::check(response).await?.text().await.map_err(transport)?;
        let value_range: ValueRange = serde_json::from_str(&body)?;

        Ok(value_range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn write_range(
        &self,
        range: &CellRange,
        values: Vec<Vec<String>>,
    ) -> Result<(), LedgerStoreError> {
        if values.len() > range.height() as usize {
            return Err(LedgerStoreError::ShapeMismatch {
                range: range.a1(),
                rows: values.len(),
            });
        }

        let token = self.auth.get_access_token().await?;
        let url = self.values_url(range)?;

        let body = ValueRange {
            range: Some(self.config.qualified_range(range)),
            major_dimension: Some("ROWS".to_string()),
            values: values
                .into_iter()
                .map(|row| row.into_iter().map(serde_json::Value::String).collect())
                .collect(),
        };

        tracing::debug!(range = %range, "Writing ledger range");

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        Self::check(response).await?;
        Ok(())
    }
}
