//! Output formatting module
//!
//! Results go to stdout, as a table or as JSON. Everything else (progress,
//! confirmations, paging hints) is chatter: it follows a table on stdout but
//! moves to stderr in JSON mode, so `--format json` stdout always parses.

use anyhow::Result;
use koli_core::{Paginator, TaskOutcome};
use serde::Serialize;
use std::fmt::Display;
use tabled::{Table, Tabled};

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {}. Use 'table' or 'json'", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Where and how a command reports back
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print a list of rows
    pub fn list<T>(&self, rows: &[T]) -> Result<()>
    where
        T: Serialize + Tabled,
    {
        println!("{}", render_list(rows, self.format)?);
        Ok(())
    }

    /// Print one row
    pub fn single<T>(&self, row: &T) -> Result<()>
    where
        T: Serialize + Tabled,
    {
        match self.format {
            OutputFormat::Table => println!("{}", Table::new([row])),
            OutputFormat::Json => self.json(row)?,
        }
        Ok(())
    }

    /// Print any serializable value as JSON, whatever the format
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Progress or context line (respects quiet mode)
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.is_json() {
            eprintln!("{}", message);
        } else {
            println!("{}", message);
        }
    }

    /// Confirmation line (respects quiet mode)
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        let message = colored::Colorize::green(message);
        if self.is_json() {
            eprintln!("{}", message);
        } else {
            println!("{}", message);
        }
    }

    /// Tell the user how to see the next page
    pub fn page_hint(&self, pager: &Paginator, shown: usize, total: usize) {
        if pager.has_more(total) {
            self.info(&format!(
                "Showing {} of {}. Use --page {} to see more.",
                shown,
                total,
                pager.page() + 1
            ));
        }
    }

    /// Report a shipment-box task. A refused task is shown, not raised: JSON
    /// mode prints the server's verdict as is, table mode a one-line summary.
    pub fn task(&self, outcome: &TaskOutcome, success: &str, fallback: &str) -> Result<()> {
        if self.is_json() {
            return self.json(outcome);
        }

        match task_summary(outcome, success, fallback) {
            TaskSummary::Done { message, note } => {
                self.success(&message);
                if let Some(note) = note {
                    self.info(&note);
                }
            }
            TaskSummary::Refused(message) => print_error(&message),
        }
        Ok(())
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}", colored::Colorize::red(message));
}

fn render_list<T>(rows: &[T], format: OutputFormat) -> Result<String>
where
    T: Serialize + Tabled,
{
    Ok(match format {
        OutputFormat::Table if rows.is_empty() => "No items found.".to_string(),
        OutputFormat::Table => Table::new(rows).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(rows)?,
    })
}

#[derive(Debug, PartialEq)]
enum TaskSummary {
    Done { message: String, note: Option<String> },
    Refused(String),
}

fn task_summary(outcome: &TaskOutcome, success: &str, fallback: &str) -> TaskSummary {
    let server_msg = (!outcome.msg.is_empty()).then(|| outcome.msg.clone());

    if outcome.is_success() {
        TaskSummary::Done {
            message: success.to_string(),
            note: server_msg,
        }
    } else {
        TaskSummary::Refused(server_msg.unwrap_or_else(|| fallback.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        name: String,
    }

    fn outcome(success: &str, msg: &str, box_id: Option<i64>) -> TaskOutcome {
        TaskOutcome {
            success: success.to_string(),
            msg: msg.to_string(),
            result_box_id: box_id,
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_render_empty_list() {
        let rows: Vec<Row> = Vec::new();
        assert_eq!(render_list(&rows, OutputFormat::Table).unwrap(), "No items found.");
        assert_eq!(render_list(&rows, OutputFormat::Json).unwrap(), "[]");
    }

    #[test]
    fn test_render_json_list_parses() {
        let rows = vec![Row { name: "PK-1".to_string() }];
        let json = render_list(&rows, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "PK-1");
    }

    #[test]
    fn test_task_summary_success_keeps_server_note() {
        assert_eq!(
            task_summary(&outcome("true", "Kaydedildi", Some(42)), "Done", "Failed"),
            TaskSummary::Done {
                message: "Done".to_string(),
                note: Some("Kaydedildi".to_string()),
            }
        );
        assert_eq!(
            task_summary(&outcome("true", "", None), "Done", "Failed"),
            TaskSummary::Done {
                message: "Done".to_string(),
                note: None,
            }
        );
    }

    #[test]
    fn test_task_summary_refused_prefers_server_message() {
        assert_eq!(
            task_summary(&outcome("false", "Stok yok", None), "Done", "Failed"),
            TaskSummary::Refused("Stok yok".to_string())
        );
        assert_eq!(
            task_summary(&outcome("false", "", None), "Done", "Failed"),
            TaskSummary::Refused("Failed".to_string())
        );
    }

    #[test]
    fn test_task_outcome_json_shape() {
        let json = serde_json::to_value(outcome("true", "", Some(42))).unwrap();
        assert_eq!(json["success"], "true");
        assert_eq!(json["resultBoxId"], 42);
    }
}
