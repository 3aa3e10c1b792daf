mod api;
mod models;
mod tui;
mod view;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::{FileSource, JobSource, ZippiaClient, DEFAULT_API_URL};
use models::Job;
use view::{is_recent, summary, JobBoard, LEVELS_ICON, LOCATION_ICON};

#[derive(Parser)]
#[command(name = "jobboard")]
#[command(about = "Browse and filter current job postings")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Job search API endpoint
    #[arg(long, global = true, env = "JOBBOARD_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Load a saved API response instead of fetching
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive list/detail browser (default)
    Browse,

    /// Print the visible job list
    List {
        /// Filter by company name (case-insensitive)
        #[arg(short, long, conflicts_with = "recent")]
        company: Option<String>,

        /// Only jobs posted in the last 7 days
        #[arg(short, long)]
        recent: bool,
    },

    /// Show job details
    Show {
        /// Job ID
        job_id: String,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), default_level))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_board(cli: &Cli) -> Result<JobBoard> {
    let source: Box<dyn JobSource> = match &cli.input {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(ZippiaClient::new(
            cli.api_url.clone(),
            Duration::from_secs(cli.timeout),
        )?),
    };

    let response = source
        .load()
        .with_context(|| format!("Failed to load jobs from {}", source.describe()))?;
    info!(
        jobs = response.jobs.len(),
        total = response.total_jobs,
        "job board ready"
    );
    Ok(JobBoard::new(response.jobs))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut board = load_board(&cli)?;

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            tui::run_browse(board)?;
        }

        Commands::List { company, recent } => {
            if let Some(text) = &company {
                board.filter_by_company(text);
            }
            if recent {
                board.filter_last_seven_days(Utc::now());
            }
            print_list(&board);
        }

        Commands::Show { job_id } => match board.find(&job_id) {
            Some(job) => print_detail(job),
            None => println!("Job '{}' not found.", job_id),
        },
    }

    Ok(())
}

fn print_list(board: &JobBoard) {
    print!("{}", format_list(board, Utc::now()));
}

fn format_list(board: &JobBoard, now: DateTime<Utc>) -> String {
    let jobs = board.visible();
    if jobs.is_empty() {
        return "No jobs found.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<2} {:<14} {:<30} {:<22} {:<16} {:<4} {:<10}\n",
        "", "ID", "TITLE", "COMPANY", "SALARY", "NEW", "POSTED"
    ));
    out.push_str(&format!("{}\n", "-".repeat(104)));
    for job in jobs {
        let marker = if board.is_selected(job) { "*" } else { "" };
        let new = if is_recent(&job.posting_date, now) { "New" } else { "" };
        out.push_str(&format!(
            "{:<2} {:<14} {:<30} {:<22} {:<16} {:<4} {:<10}\n",
            marker,
            truncate(&job.job_id, 14),
            truncate(&job.title, 28),
            truncate(&job.company_name, 20),
            truncate(&job.estimated_salary, 16),
            new,
            job.posted_date
        ));
        // Whole 200-character summary, wrapped under the row.
        let options = textwrap::Options::new(100)
            .initial_indent("   ")
            .subsequent_indent("   ");
        out.push_str(&textwrap::fill(&summary(&job.description), options));
        out.push('\n');
    }
    out
}

fn print_detail(job: &Job) {
    print!("{}", format_detail(job));
}

fn format_detail(job: &Job) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", job.title));
    out.push_str(&format!("{}\n", job.company_name));
    out.push_str(&format!("{}\n", job.location()));
    out.push_str(&format!("{}\n", job.estimated_salary));
    out.push_str("\nJob Highlights\n");
    out.push_str(&format!("  {} {}\n", LOCATION_ICON, job.location()));
    out.push_str(&format!("  {} {}\n", LEVELS_ICON, job.levels()));
    out.push_str("\n--- Job Description ---\n");
    out.push_str(&textwrap::fill(&job.description, 80));
    out.push('\n');
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn job(id: &str, description: &str) -> Job {
        Job {
            job_id: id.to_string(),
            title: "Business Analyst".to_string(),
            description: description.to_string(),
            company_name: "Acme Corp".to_string(),
            company_logo_url: String::new(),
            city: "Denver".to_string(),
            state: "CO".to_string(),
            estimated_salary: "$75K".to_string(),
            job_levels: vec!["Entry Level".to_string(), "Mid Level".to_string()],
            posting_date: "2024-03-19".to_string(),
            posted_date: "1d ago".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_list_keeps_full_200_char_summary() {
        let board = JobBoard::new(vec![job("1", &"x".repeat(300))]);
        let out = format_list(&board, now());
        let xs = out.chars().filter(|&c| c == 'x').count();
        assert_eq!(xs, 200);
        assert!(out.contains("x..."));
        assert!(out.contains("New"));
    }

    #[test]
    fn test_list_empty() {
        let mut board = JobBoard::new(vec![job("1", "Work.")]);
        board.filter_by_company("nobody");
        assert_eq!(format_list(&board, now()), "No jobs found.\n");
    }

    #[test]
    fn test_detail_highlights_use_icons() {
        let out = format_detail(&job("1", "Work."));
        assert!(out.contains(&format!("{} Denver, CO", LOCATION_ICON)));
        assert!(out.contains(&format!("{} Entry Level,Mid Level", LEVELS_ICON)));
        assert!(out.contains("Job Highlights"));
        assert!(out.ends_with("Work.\n"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title here", 10), "a longe...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_cli_defaults_to_browse() {
        let cli = Cli::try_parse_from(["jobboard"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.timeout, 30);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_cli_list_flags() {
        let cli = Cli::try_parse_from(["jobboard", "list", "--company", "acme", "-i", "jobs.json"]).unwrap();
        match cli.command {
            Some(Commands::List { company, recent }) => {
                assert_eq!(company.as_deref(), Some("acme"));
                assert!(!recent);
            }
            _ => panic!("expected list command"),
        }
        assert_eq!(cli.input, Some(PathBuf::from("jobs.json")));
    }

    #[test]
    fn test_cli_filters_are_exclusive() {
        // Each filter replaces the visible set, so combining them is rejected.
        let result = Cli::try_parse_from(["jobboard", "list", "--company", "acme", "--recent"]);
        assert!(result.is_err());
    }
}
