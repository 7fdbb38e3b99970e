//! Reporting service.
//!
//! Runs catalogue reports and operator statements against the store and
//! pairs each result with the chart chosen for it.

use serde::Serialize;
use sqlx::sqlite::SqliteConnection;
use tracing::{debug, warn};

use crate::config::{AdhocMode, QueryConfig};
use crate::db::{self, DbPool};
use crate::models::{Chart, Table};
use crate::services::catalogue::Report;
use crate::services::renderer::select_chart;
use crate::{Error, Result};

/// Title used for charts of ad-hoc results.
const ADHOC_TITLE: &str = "Custom Query";

/// Leading keywords accepted in read-only mode.
const READ_KEYWORDS: [&str; 4] = ["SELECT", "WITH", "EXPLAIN", "VALUES"];

/// A rendered result: the table plus its chart, if any.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedResult {
    pub title: String,
    pub table: Table,
    pub chart: Option<Chart>,
}

/// Result of a catalogue report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub key: &'static str,
    pub name: &'static str,
    #[serde(flatten)]
    pub result: RenderedResult,
}

#[derive(Clone)]
pub struct ReportingService {
    db: DbPool,
    config: QueryConfig,
}

impl ReportingService {
    pub fn new(db: DbPool, config: QueryConfig) -> Self {
        Self { db, config }
    }

    pub fn adhoc_mode(&self) -> AdhocMode {
        self.config.adhoc_mode
    }

    /// Run a catalogue report.
    ///
    /// Catalogue statements are fixed, so any failure here is a storage
    /// failure and propagates as such.
    pub async fn run_report(&self, report: Report) -> Result<ReportOutcome> {
        debug!(report = report.key(), "Running report");

        let mut conn = self.db.acquire().await?;
        let table = db::fetch_table(&mut conn, report.sql(), None).await?;
        let chart = select_chart(report.name(), &table);

        Ok(ReportOutcome {
            key: report.key(),
            name: report.name(),
            result: RenderedResult {
                title: report.name().to_string(),
                table,
                chart,
            },
        })
    }

    /// Run an operator-supplied statement under the configured policy.
    ///
    /// Statements SQLite rejects come back as [`Error::InvalidQuery`] so the
    /// caller can show the message and carry on.
    pub async fn run_adhoc(&self, sql: &str) -> Result<RenderedResult> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(Error::Validation("Query text is empty".to_string()));
        }

        let max_rows = Some(self.config.max_rows);

        let table = match self.config.adhoc_mode {
            AdhocMode::Disabled => {
                warn!("Rejected ad-hoc query: ad-hoc queries are disabled");
                return Err(Error::Forbidden(
                    "Ad-hoc queries are disabled".to_string(),
                ));
            }
            AdhocMode::Unrestricted => {
                ensure_single_statement(sql)?;

                let mut conn = self.db.acquire().await?;
                db::fetch_table(&mut conn, sql, max_rows)
                    .await
                    .map_err(classify_statement_error)?
            }
            AdhocMode::ReadOnly => {
                ensure_single_statement(sql)?;
                if !is_read_statement(sql) {
                    warn!("Rejected ad-hoc query: not a read statement");
                    return Err(Error::Forbidden(
                        "Only read statements are allowed".to_string(),
                    ));
                }

                let mut conn = self.db.acquire().await?;
                sqlx::query("PRAGMA query_only = ON")
                    .execute(&mut *conn)
                    .await?;

                let result = fetch_read_only(&mut conn, sql, max_rows).await;

                if let Err(err) = sqlx::query("PRAGMA query_only = OFF")
                    .execute(&mut *conn)
                    .await
                {
                    // A query-only connection must not go back to the pool.
                    warn!("Failed to reset query_only, closing connection: {}", err);
                    drop(conn.detach());
                }

                result?
            }
        };

        debug!(
            rows = table.row_count(),
            truncated = table.truncated,
            "Ad-hoc query executed"
        );

        let chart = select_chart(ADHOC_TITLE, &table);

        Ok(RenderedResult {
            title: ADHOC_TITLE.to_string(),
            table,
            chart,
        })
    }
}

/// Run a read statement inside a transaction that is always rolled back.
///
/// The caller has already switched the connection to `query_only`, so a
/// write hidden in a read statement fails here instead of persisting.
async fn fetch_read_only(
    conn: &mut SqliteConnection,
    sql: &str,
    max_rows: Option<usize>,
) -> Result<Table> {
    let mut tx = sqlx::Connection::begin(&mut *conn).await?;
    let result = db::fetch_table(&mut tx, sql, max_rows).await;
    tx.rollback().await?;
    result.map_err(classify_statement_error)
}

fn ensure_single_statement(sql: &str) -> Result<()> {
    if is_single_statement(sql) {
        Ok(())
    } else {
        warn!("Rejected ad-hoc query: more than one statement");
        Err(Error::InvalidQuery(
            "Only one statement can be run at a time".to_string(),
        ))
    }
}

/// Whether `sql` holds at most one statement.
///
/// Trailing semicolons and comments are allowed. Semicolons inside quoted
/// literals or identifiers and inside comments do not separate statements.
pub fn is_single_statement(sql: &str) -> bool {
    let mut chars = sql.chars().peekable();
    let mut ended = false;

    while let Some(c) = chars.next() {
        match c {
            ';' => {
                ended = true;
                continue;
            }
            '-' if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
                continue;
            }
            c if c.is_whitespace() => continue,
            _ => {}
        }

        if ended {
            return false;
        }

        let close = match c {
            '\'' | '"' | '`' => Some(c),
            '[' => Some(']'),
            _ => None,
        };
        if let Some(close) = close {
            for c in chars.by_ref() {
                if c == close {
                    break;
                }
            }
        }
    }

    true
}

/// Split statement failures (shown to the operator) from storage failures.
fn classify_statement_error(err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Database(db_err) => {
            warn!("Ad-hoc query failed: {}", db_err.message());
            Error::InvalidQuery(db_err.message().to_string())
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            Error::InvalidQuery(err.to_string())
        }
        other => Error::Database(other),
    }
}

/// Whether a statement starts with a read keyword, ignoring leading
/// whitespace, comments and parentheses.
pub fn is_read_statement(sql: &str) -> bool {
    let mut rest = sql.trim_start();
    loop {
        if let Some(stripped) = rest.strip_prefix("--") {
            rest = stripped.split_once('\n').map(|(_, r)| r).unwrap_or("").trim_start();
        } else if let Some(stripped) = rest.strip_prefix("/*") {
            rest = stripped.split_once("*/").map(|(_, r)| r).unwrap_or("").trim_start();
        } else if let Some(stripped) = rest.strip_prefix('(') {
            rest = stripped.trim_start();
        } else {
            break;
        }
    }

    let keyword: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();

    READ_KEYWORDS.contains(&keyword.as_str())
}
