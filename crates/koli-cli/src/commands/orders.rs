//! Order receipt commands

use anyhow::Result;
use clap::Subcommand;
use koli_core::{filter_items, OrderReceipt, TaskOutcome};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::truncate;
use super::Context;

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List order receipts
    List {
        /// Filter by receipt number, account name or record ID
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Create a koli from an order receipt
    Convert {
        /// Order receipt record ID
        id: i64,
    },
}

/// Order receipt row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct OrderReceiptRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Receipt No")]
    pub receipt_no: String,
    #[tabled(rename = "Account")]
    pub account: String,
}

impl From<OrderReceipt> for OrderReceiptRow {
    fn from(receipt: OrderReceipt) -> Self {
        Self {
            id: receipt.rec_id,
            receipt_no: receipt.receipt_no,
            account: truncate(&receipt.current_account_name, 50),
        }
    }
}

pub async fn execute(ctx: &Context, action: OrdersAction) -> Result<()> {
    match action {
        OrdersAction::List { search } => list(ctx, search).await,
        OrdersAction::Convert { id } => convert(ctx, id).await,
    }
}

async fn list(ctx: &Context, search: Option<String>) -> Result<()> {
    let credentials = ctx.require_credentials().await?;
    let receipts = ctx.api.order_receipts(&credentials).await?;

    let receipts = filter_items(&receipts, search.as_deref().unwrap_or(""));
    let rows: Vec<OrderReceiptRow> = receipts.into_iter().map(OrderReceiptRow::from).collect();
    ctx.out.list(&rows)?;

    Ok(())
}

async fn convert(ctx: &Context, id: i64) -> Result<()> {
    let credentials = ctx.require_credentials().await?;
    let outcome = ctx
        .api
        .create_koli_from_order_receipt(&credentials, id)
        .await?;

    ctx.out.task(
        &outcome,
        &format!("Koli created from order receipt {}", id),
        "Failed to create koli",
    )?;

    if !ctx.out.is_json() {
        if let Some(hint) = new_koli_hint(&outcome) {
            ctx.out.info(&hint);
        }
    }

    Ok(())
}

/// Shown whenever the server returned a box id, whatever `success` says
fn new_koli_hint(outcome: &TaskOutcome) -> Option<String> {
    outcome
        .result_box_id
        .map(|box_id| format!("New koli ID: {} (koli show {})", box_id, box_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_koli_hint_ignores_success_flag() {
        let refused = TaskOutcome {
            success: "false".to_string(),
            msg: "Sipariş zaten kolide".to_string(),
            result_box_id: Some(42),
        };
        assert_eq!(
            new_koli_hint(&refused).as_deref(),
            Some("New koli ID: 42 (koli show 42)")
        );
    }

    #[test]
    fn test_new_koli_hint_needs_box_id() {
        let done = TaskOutcome {
            success: "true".to_string(),
            msg: String::new(),
            result_box_id: None,
        };
        assert_eq!(new_koli_hint(&done), None);
    }
}
