//! Barcode scan flow
//!
//! The back-office resolves "find by barcode" and "fetch by id" as two
//! separate services. This module composes them: the detail call is only
//! issued once the lookup produced a record id.

use serde::Serialize;

use crate::error::ApiError;
use crate::models::{BarcodeLookup, Credentials, KoliDetailItem};
use crate::services::api::ApiClient;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// The barcode resolved to a koli; `items` is its content
    Opened {
        rec_id: i64,
        items: Vec<KoliDetailItem>,
    },
    /// Displayable message from the lookup, no detail was fetched
    NotFound { message: String },
}

/// Look a barcode up and, when it resolves, load the koli's lines
pub async fn open_koli_by_barcode(
    api: &ApiClient,
    credentials: &Credentials,
    barcode: &str,
) -> Result<ScanOutcome, ApiError> {
    let barcode = barcode.trim();
    log::info!("[api:scan] Resolving barcode {}", barcode);

    match api.lookup_koli_by_barcode(credentials, barcode).await? {
        BarcodeLookup::NotFound { message } => Ok(ScanOutcome::NotFound { message }),
        BarcodeLookup::Found { rec_id } => {
            log::debug!("[api:scan] Barcode {} -> koli {}", barcode, rec_id);
            let items = api.koli_detail(credentials, rec_id).await?;
            Ok(ScanOutcome::Opened { rec_id, items })
        }
    }
}
