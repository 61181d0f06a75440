//! Koli (shipment package) commands

use anyhow::Result;
use clap::Subcommand;
use koli_core::{filter_items, open_koli_by_barcode, KoliDetailItem, KoliItem, Paginator, ScanOutcome};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::{format_quantity, truncate};
use super::Context;

#[derive(Subcommand)]
pub enum KoliAction {
    /// List koli
    List {
        /// Filter by package number or explanation
        #[arg(short, long)]
        search: Option<String>,

        /// Show the first N pages of 20 rows
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show the items packed in a koli
    Show {
        /// Koli record ID
        id: i64,
    },

    /// Find a koli by barcode and show its items
    Scan {
        /// Barcode printed on the koli
        barcode: String,
    },

    /// Add one unit of an inventory item to a koli
    AddItem {
        /// Koli record ID
        box_id: i64,

        /// Inventory barcode
        barcode: String,
    },

    /// Close a koli into an inventory receipt
    Receipt {
        /// Koli record ID
        box_id: i64,
    },
}

/// Koli row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct KoliRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Package No")]
    pub package_no: String,
    #[tabled(rename = "Explanation")]
    pub explanation: String,
}

impl From<&KoliItem> for KoliRow {
    fn from(item: &KoliItem) -> Self {
        Self {
            id: item.id,
            package_no: item.package_no.clone(),
            explanation: truncate(&item.explanation, 50),
        }
    }
}

/// Koli content row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct KoliLineRow {
    #[tabled(rename = "Item")]
    pub item: String,
    #[tabled(rename = "Quantity")]
    pub quantity: String,
}

impl From<&KoliDetailItem> for KoliLineRow {
    fn from(line: &KoliDetailItem) -> Self {
        Self {
            item: truncate(&line.inventory_name, 60),
            quantity: format_quantity(line.quantity),
        }
    }
}

pub async fn execute(ctx: &Context, action: KoliAction) -> Result<()> {
    match action {
        KoliAction::List { search, page } => list(ctx, search, page).await,
        KoliAction::Show { id } => show(ctx, id).await,
        KoliAction::Scan { barcode } => scan(ctx, barcode).await,
        KoliAction::AddItem { box_id, barcode } => add_item(ctx, box_id, barcode).await,
        KoliAction::Receipt { box_id } => receipt(ctx, box_id).await,
    }
}

async fn list(ctx: &Context, search: Option<String>, page: usize) -> Result<()> {
    let credentials = ctx.require_credentials().await?;
    let items = ctx.api.koli_list(&credentials).await?;

    let items = filter_items(&items, search.as_deref().unwrap_or(""));
    let pager = Paginator::at_page(page);
    let rows: Vec<KoliRow> = pager.visible(&items).iter().map(KoliRow::from).collect();
    ctx.out.list(&rows)?;
    ctx.out.page_hint(&pager, rows.len(), items.len());

    Ok(())
}

async fn show(ctx: &Context, id: i64) -> Result<()> {
    let credentials = ctx.require_credentials().await?;
    let lines = ctx.api.koli_detail(&credentials, id).await?;
    print_lines(ctx, &lines)
}

async fn scan(ctx: &Context, barcode: String) -> Result<()> {
    let credentials = ctx.require_credentials().await?;

    let outcome = open_koli_by_barcode(&ctx.api, &credentials, &barcode).await?;
    if ctx.out.is_json() {
        return ctx.out.json(&outcome);
    }

    match outcome {
        // Soft signal: shown, not raised
        ScanOutcome::NotFound { message } => {
            println!("{}", message);
            Ok(())
        }
        ScanOutcome::Opened { rec_id, items } => {
            println!("Koli {}", rec_id);
            print_lines(ctx, &items)
        }
    }
}

async fn add_item(ctx: &Context, box_id: i64, barcode: String) -> Result<()> {
    let credentials = ctx.require_credentials().await?;
    let outcome = ctx
        .api
        .add_item_by_barcode(&credentials, box_id, barcode.trim())
        .await?;

    ctx.out.task(
        &outcome,
        &format!("Added {} to koli {}", barcode.trim(), box_id),
        "Failed to add item",
    )
}

async fn receipt(ctx: &Context, box_id: i64) -> Result<()> {
    let credentials = ctx.require_credentials().await?;
    let outcome = ctx.api.create_receipt(&credentials, box_id).await?;

    ctx.out.task(
        &outcome,
        &format!("Receipt created for koli {}", box_id),
        "Failed to create receipt",
    )
}

fn print_lines(ctx: &Context, lines: &[KoliDetailItem]) -> Result<()> {
    let rows: Vec<KoliLineRow> = lines.iter().map(KoliLineRow::from).collect();
    ctx.out.list(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_koli_line_row_quantity() {
        let line = KoliDetailItem {
            inventory_name: "Vida M6".to_string(),
            quantity: 12.0,
            thumbnail: None,
        };
        let row = KoliLineRow::from(&line);
        assert_eq!(row.quantity, "12");
    }

    #[test]
    fn test_koli_row_serialization() {
        let item = KoliItem {
            id: 7,
            package_no: "PK-7".to_string(),
            explanation: "Ankara".to_string(),
        };
        let json = serde_json::to_string(&KoliRow::from(&item)).unwrap();
        assert!(json.contains("PK-7"));
        assert!(json.contains("\"id\":7"));
    }
}
