use anyhow::{bail, Result};
use clap::Parser;
use prisma_sbom::{
    app::{self, Actions, Flags},
    auth::{Authenticator, CredentialsFile, FileTokenStore},
    client::{base_url_for, PrismaClient},
    config::Config,
    logging, Error,
};
use std::path::PathBuf;
use std::process::ExitCode;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const USAGE: u8 = 1;
}

#[derive(Parser)]
#[command(name = "prisma-sbom")]
#[command(
    version,
    about = "List top vulnerabilities in source packages using the Prisma Cloud API"
)]
struct Cli {
    /// Show the highest-CVSS findings from the code security dashboard
    #[arg(long = "top_cvss", alias = "top-cvss")]
    top_cvss: bool,

    /// Print the repositories known to the platform
    #[arg(long = "list_repos", alias = "list-repos")]
    list_repos: bool,

    /// List vulnerable packages and their CVEs for --repo_id
    #[arg(long = "code_issues", alias = "code-issues")]
    code_issues: bool,

    /// Also write code issues to sbom_<timestamp>.csv
    #[arg(long)]
    csv: bool,

    /// Repository id used by --code_issues
    #[arg(long = "repo_id", alias = "repo-id", default_value = "")]
    repo_id: String,

    /// Regional API host, combined as https://<endpoint>.prismacloud.io
    #[arg(long, default_value = "api.gov")]
    endpoint: String,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn flags(&self) -> Flags {
        Flags {
            top_cvss: self.top_cvss,
            list_repos: self.list_repos,
            code_issues: self.code_issues,
            csv: self.csv,
            repo_id: self.repo_id.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let actions = match Actions::try_from(cli.flags()) {
        Ok(actions) => actions,
        Err(e @ Error::MissingRepoId) => {
            println!("ERROR: {}", e);
            return Ok(exit_codes::USAGE);
        }
        Err(e) => return Err(e.into()),
    };

    let config = match &cli.config {
        Some(path) if !path.exists() => bail!("config file not found: {}", path.display()),
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let base_url = base_url_for(&cli.endpoint);
    let http = PrismaClient::http_client(config.request_timeout())?;
    let auth = Authenticator::new(
        http.clone(),
        base_url.clone(),
        CredentialsFile::new(&config.credentials_file),
        FileTokenStore::new(&config.token_file),
        config.token_ttl(),
    );
    let client = PrismaClient::new(http, base_url, Box::new(auth));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::run(&client, &config, &actions, &mut out).await?;

    Ok(exit_codes::SUCCESS)
}
