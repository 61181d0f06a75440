//! Session commands: login, logout, status

use anyhow::{bail, Result};
use koli_core::{Credentials, LoginOutcome, User};
use serde::Serialize;
use tabled::Tabled;

use super::Context;

/// Session summary for display
#[derive(Debug, Serialize, Tabled)]
pub struct StatusRow {
    #[tabled(rename = "Logged In")]
    pub logged_in: bool,
    #[tabled(rename = "User")]
    pub user: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Company")]
    pub company: String,
    #[tabled(rename = "Since")]
    pub since: String,
    #[tabled(rename = "API URL")]
    pub api_base_url: String,
}

impl StatusRow {
    fn new(user: Option<&User>, api_base_url: String) -> Self {
        match user {
            Some(user) => Self {
                logged_in: true,
                user: user.user_name.clone(),
                name: user.display_name(),
                company: user.company_name.clone(),
                since: user
                    .logged_in_at
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                api_base_url,
            },
            None => Self {
                logged_in: false,
                user: "-".to_string(),
                name: "-".to_string(),
                company: "-".to_string(),
                since: "-".to_string(),
                api_base_url,
            },
        }
    }
}

pub async fn login(ctx: &Context, user: String, password: String) -> Result<()> {
    ctx.out.info(&format!("Logging in as {}...", user.trim()));

    match ctx
        .session
        .login(Credentials::new(user.trim(), password))
        .await
    {
        LoginOutcome::Authenticated(user) => {
            ctx.session.clear_pending_navigation().await;
            if ctx.out.is_json() {
                let settings = ctx.credentials.get().await;
                return ctx.out.single(&StatusRow::new(Some(&user), settings.api_base_url));
            }
            ctx.out.success(&format!(
                "Logged in as {} ({})",
                user.display_name(),
                user.company_name
            ));
            Ok(())
        }
        LoginOutcome::Rejected { message } if message.is_empty() => bail!("Login failed"),
        LoginOutcome::Rejected { message } => bail!("Login failed: {}", message),
        LoginOutcome::Failed { message } => bail!("{}", message),
    }
}

pub async fn logout(ctx: &Context) -> Result<()> {
    ctx.session.logout().await;
    ctx.session.clear_pending_navigation().await;
    ctx.out.success("Logged out");
    Ok(())
}

pub async fn status(ctx: &Context) -> Result<()> {
    let user = ctx.session.current_user().await;
    let settings = ctx.credentials.get().await;

    let api_base_url = if settings.has_base_url() {
        settings.api_base_url
    } else {
        "(not set)".to_string()
    };

    let row = StatusRow::new(user.as_ref(), api_base_url);
    ctx.out.single(&row)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_row_anonymous() {
        let row = StatusRow::new(None, "(not set)".to_string());
        assert!(!row.logged_in);
        assert_eq!(row.user, "-");
    }

    #[test]
    fn test_status_row_never_contains_password() {
        let user = User {
            uid: 1,
            code: "U1".to_string(),
            email: None,
            first_name: "Ali".to_string(),
            last_name: "Kaya".to_string(),
            company_name: "Depo".to_string(),
            admin: false,
            user_name: "u1".to_string(),
            password: "p1-secret".to_string(),
            logged_in_at: None,
        };
        let row = StatusRow::new(Some(&user), "https://erp.test".to_string());
        let json = serde_json::to_string(&row).unwrap();

        assert!(row.logged_in);
        assert_eq!(row.name, "Ali Kaya");
        assert!(!json.contains("p1-secret"));
    }
}
