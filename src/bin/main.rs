//! Bughub CLI - bug reporting for a desktop device installer
//!
//! Runs the interactive report pipeline standalone, previews the issue
//! body that would be filed, uploads log files to the paste service, and
//! prints the detected host environment.

use bughub::{
    DefaultReporter, DeviceConfig, InstallerContext, IssueTemplate, LogFile, OsEnvironment,
    PasteClient, Pastebin, ReportConfig, ReportData, ReportExtra, ReportOutcome, ReportResult,
    Reporter, SystemBrowser, TerminalPrompt,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bughub")]
#[command(version)]
#[command(about = "File installer bug reports as prefilled GitHub issues")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive report pipeline
    Report {
        /// Result of the installer run
        #[arg(short, long, value_enum, default_value_t = ReportResult::Fail)]
        result: ReportResult,

        /// Error message that triggered the report
        #[arg(short, long)]
        error: Option<String>,

        /// Device codename
        #[arg(short, long)]
        device: Option<String>,

        /// Human-readable device name
        #[arg(long, requires = "device")]
        name: Option<String>,

        /// Name of the OS being installed
        #[arg(short, long)]
        os: Option<String>,

        /// GitHub repository receiving the issue (owner/name)
        #[arg(long, env = "BUGHUB_REPO")]
        repo: Option<String>,

        /// Paste service API base URL
        #[arg(long, env = "BUGHUB_PASTE_URL")]
        paste_url: Option<String>,

        /// Log file to upload
        #[arg(long, env = "BUGHUB_LOG_FILE")]
        log_file: Option<PathBuf>,
    },

    /// Print the issue title and body that would be filed, without
    /// touching the network or the browser
    Preview {
        /// Error message that triggered the report
        #[arg(short, long)]
        error: Option<String>,

        /// Device codename
        #[arg(short, long)]
        device: Option<String>,

        /// Human-readable device name
        #[arg(long, requires = "device")]
        name: Option<String>,

        /// Name of the OS being installed
        #[arg(short, long)]
        os: Option<String>,

        /// Paste URL to put on the Log line
        #[arg(long)]
        log_url: Option<String>,
    },

    /// Upload a file to the paste service and print its URL
    Upload {
        /// File to upload
        file: PathBuf,

        /// Paste service API base URL
        #[arg(long, env = "BUGHUB_PASTE_URL")]
        paste_url: Option<String>,
    },

    /// Print the detected host environment
    Env,
}

fn build_context(
    device: Option<String>,
    name: Option<String>,
    os: Option<String>,
) -> InstallerContext {
    let mut context = InstallerContext::default();
    if let Some(codename) = device {
        let name = name.unwrap_or_else(|| codename.clone());
        context = context.with_device(DeviceConfig::new(codename, name));
    }
    if let Some(os) = os {
        context = context.with_target_os(os);
    }
    context
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            result,
            error,
            device,
            name,
            os,
            repo,
            paste_url,
            log_file,
        } => {
            let mut config = ReportConfig::default();
            if let Some(repo) = repo {
                config.repo = repo;
            }
            if let Some(paste_url) = paste_url {
                config.paste_url = paste_url;
            }
            if let Some(log_file) = log_file {
                config.log_file = log_file;
            }

            let reporter = DefaultReporter::new(config, build_context(device, name, os));
            match reporter.report(result, error.as_deref()).await {
                ReportOutcome::Skipped => {
                    println!("{} nothing to report for a PASS run", "✓".green());
                }
                ReportOutcome::Cancelled => {
                    println!("{} report cancelled", "•".yellow());
                }
                ReportOutcome::Sent { issue_url } => {
                    println!("{} opened {}", "✓".green(), issue_url.underline());
                }
                ReportOutcome::Failed(error) => {
                    eprintln!("{} report failed: {error}", "✗".red());
                    std::process::exit(1);
                }
            }
        }

        Commands::Preview {
            error,
            device,
            name,
            os,
            log_url,
        } => {
            let config = ReportConfig::default();
            let context = build_context(device, name, os);
            let reporter = Reporter::with_collaborators(
                config.clone(),
                context.clone(),
                OsEnvironment,
                LogFile::new(config.log_file.clone()),
                Pastebin::new(config.paste_url.clone()),
                TerminalPrompt,
                SystemBrowser,
            );

            let mut values = BTreeMap::new();
            values.insert("environment".to_string(), reporter.environment().await);
            let data = ReportData {
                values,
                extra: ReportExtra {
                    result: ReportResult::Fail,
                    error: error.clone(),
                },
            };

            let template = IssueTemplate::new(&config, &context);
            let title = template.title(error.as_deref());
            if !title.is_empty() {
                println!("{} {title}", "Title:".bold());
            }
            println!("{}", "Body:".bold());
            println!("{}", template.issue_body(&data, log_url.as_deref(), &[]));
        }

        Commands::Upload { file, paste_url } => {
            let config = ReportConfig::default();
            let text = tokio::fs::read_to_string(&file).await?;
            let client = Pastebin::new(paste_url.unwrap_or(config.paste_url));
            let title = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "log".to_string());

            let url = client.upload(&title, &text).await?;
            println!("{url}");
        }

        Commands::Env => {
            let reporter =
                DefaultReporter::new(ReportConfig::default(), InstallerContext::default());
            println!("{}", reporter.environment().await);
        }
    }

    Ok(())
}
