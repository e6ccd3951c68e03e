//! History command for the global completion feed.

use std::fmt;

use cadence_core::{TaskApi, load_feed};
use chrono::{DateTime, TimeZone};
use clap::Args;

use crate::error::CliResult;
use crate::output::format_feed;

/// Show recent completions across all tasks
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Only show the most recent N completions
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print the feed as JSON
    #[arg(long)]
    pub json: bool,
}

impl HistoryCommand {
    /// Execute the history command. Entries are printed newest first.
    pub async fn execute<A, Tz>(&self, api: &A, now: &DateTime<Tz>) -> CliResult<String>
    where
        A: TaskApi,
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut entries = load_feed(api).await?;
        if let Some(limit) = self.limit {
            entries.truncate(limit);
        }

        if self.json {
            return Ok(serde_json::to_string_pretty(&entries)?);
        }
        Ok(format_feed(&entries, &now.timezone()))
    }
}
