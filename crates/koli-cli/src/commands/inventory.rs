//! Inventory listing

use anyhow::Result;
use koli_core::{filter_items, InventoryItem, Paginator};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::truncate;
use super::Context;

/// Inventory row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct InventoryRow {
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Image")]
    pub image: String,
}

impl From<&InventoryItem> for InventoryRow {
    fn from(item: &InventoryItem) -> Self {
        let has_image = item
            .thumbnail
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false);
        Self {
            code: item.inventory_code.clone(),
            name: truncate(&item.inventory_name, 50),
            image: if has_image { "yes" } else { "-" }.to_string(),
        }
    }
}

pub async fn list(ctx: &Context, search: Option<String>, page: usize) -> Result<()> {
    let credentials = ctx.require_credentials().await?;
    let items = ctx.api.inventory(&credentials).await?;

    let items = filter_items(&items, search.as_deref().unwrap_or(""));
    let pager = Paginator::at_page(page);
    let rows: Vec<InventoryRow> = pager.visible(&items).iter().map(InventoryRow::from).collect();
    ctx.out.list(&rows)?;
    ctx.out.page_hint(&pager, rows.len(), items.len());

    Ok(())
}
