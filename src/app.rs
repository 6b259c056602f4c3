//! Runs the requested actions in their fixed order.

use chrono::Local;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::client::PrismaClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output;

/// Raw command-line switches, before validation.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    pub top_cvss: bool,
    pub list_repos: bool,
    pub code_issues: bool,
    pub csv: bool,
    pub repo_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeIssues {
    pub repo_id: String,
    pub export_csv: bool,
}

/// Validated set of actions. They always run as top-CVSS, then the
/// repository listing, then code issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actions {
    pub top_cvss: bool,
    pub list_repos: bool,
    pub code_issues: Option<CodeIssues>,
}

impl Actions {
    pub fn is_empty(&self) -> bool {
        !self.top_cvss && !self.list_repos && self.code_issues.is_none()
    }
}

impl TryFrom<Flags> for Actions {
    type Error = Error;

    fn try_from(flags: Flags) -> Result<Self> {
        let code_issues = if flags.code_issues {
            if flags.repo_id.is_empty() {
                return Err(Error::MissingRepoId);
            }
            Some(CodeIssues {
                repo_id: flags.repo_id,
                export_csv: flags.csv,
            })
        } else {
            if flags.csv {
                warn!("--csv only applies to --code_issues and will be ignored");
            }
            None
        };

        Ok(Self {
            top_cvss: flags.top_cvss,
            list_repos: flags.list_repos,
            code_issues,
        })
    }
}

/// Executes `actions`, printing results to `out` as they arrive.
///
/// Returns the path of the CSV export when one was written.
pub async fn run<W: Write>(
    client: &PrismaClient,
    config: &Config,
    actions: &Actions,
    out: &mut W,
) -> Result<Option<PathBuf>> {
    if actions.is_empty() {
        debug!("no actions requested");
        return Ok(None);
    }

    if actions.top_cvss {
        let entries = client.top_cvss(&config.top_cvss).await?;
        output::write_top_cvss(out, &entries)?;
    }

    if actions.list_repos {
        let repositories = client.list_repositories().await?;
        output::write_repositories(out, &repositories)?;
    }

    let Some(code_issues) = &actions.code_issues else {
        return Ok(None);
    };

    let records = client
        .code_issues(&code_issues.repo_id, &config.package_search, |record| {
            output::write_record(&mut *out, record)
        })
        .await?;
    info!(records = records.len(), "code issues collected");

    if !code_issues.export_csv {
        return Ok(None);
    }

    let path = output::export_csv(&config.output_dir, &records, Local::now())?;
    info!(path = %path.display(), "csv export written");
    writeln!(out, "Results written to: {}", path.display())?;
    Ok(Some(path))
}
