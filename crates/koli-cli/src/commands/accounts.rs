//! Current account listing

use anyhow::Result;
use koli_core::{filter_items, CurrentAccount};
use serde::Serialize;
use tabled::Tabled;

use super::helpers::truncate;
use super::Context;

/// Account row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct AccountRow {
    #[tabled(rename = "Code")]
    pub code: String,
    #[tabled(rename = "Name")]
    pub name: String,
}

impl From<CurrentAccount> for AccountRow {
    fn from(account: CurrentAccount) -> Self {
        Self {
            code: account.current_account_code,
            name: truncate(&account.current_account_name, 50),
        }
    }
}

pub async fn list(ctx: &Context, search: Option<String>) -> Result<()> {
    let credentials = ctx.require_credentials().await?;
    let accounts = ctx.api.accounts(&credentials).await?;

    let accounts = filter_items(&accounts, search.as_deref().unwrap_or(""));
    let rows: Vec<AccountRow> = accounts.into_iter().map(AccountRow::from).collect();
    ctx.out.list(&rows)?;

    Ok(())
}
