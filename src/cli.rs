use clap::{Args, Parser, Subcommand};
use std::io::Write;
use tracing::debug;
use validator::Validate;

use crate::api::job::{JobService, ServiceError};
use crate::api::job::dto::JobSummary;
use crate::query::{QueryParams, QueryState};

#[derive(Debug, Parser)]
#[command(name = "job-board", version, about = "Browsable job listing directory")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Search the catalog and print one page of results
    Search(SearchArgs),
    /// List or toggle saved jobs
    Saved {
        #[command(subcommand)]
        action: SavedAction,
    },
}

#[derive(Debug, Default, Args)]
pub struct SearchArgs {
    /// Text matched against title, company and id
    #[arg(long)]
    pub q: Option<String>,
    /// Comma separated categories, e.g. it,finance
    #[arg(long)]
    pub category: Option<String>,
    /// Comma separated experience levels
    #[arg(long)]
    pub experience: Option<String>,
    /// Comma separated job types
    #[arg(long = "type")]
    pub job_type: Option<String>,
    /// Substring of the job location
    #[arg(long)]
    pub location: Option<String>,
    /// Comma separated location types
    #[arg(long = "location-type")]
    pub location_type: Option<String>,
    /// date, salary or relevance
    #[arg(long)]
    pub sort: Option<String>,
    #[arg(long)]
    pub page: Option<usize>,
}

impl From<SearchArgs> for QueryParams {
    fn from(args: SearchArgs) -> Self {
        QueryParams {
            q: args.q,
            category: args.category,
            experience: args.experience,
            job_type: args.job_type,
            location: args.location,
            location_type: args.location_type,
            sort: args.sort,
            page: args.page,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SavedAction {
    /// Print saved jobs
    List,
    /// Save a job, or unsave it if already saved
    Toggle { id: String },
}

/// Run the listing pipeline and print the requested page
pub fn run_search(service: &JobService, args: SearchArgs, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let params = QueryParams::from(args);
    params.validate().map_err(ServiceError::ValidationError)?;
    let state = QueryState::from_params(&params)?;
    debug!("CLI search: {}", state.to_query_string());

    let listing = service.list(state)?;
    if listing.jobs.is_empty() {
        writeln!(out, "No jobs found")?;
        return Ok(());
    }

    for job in &listing.jobs {
        write_job(out, job)?;
    }
    writeln!(
        out,
        "Page {} of {} ({} jobs)",
        listing.page, listing.total_pages, listing.total
    )?;
    Ok(())
}

pub fn run_saved(service: &JobService, action: SavedAction, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SavedAction::List => {
            let saved = service.saved_jobs()?;
            if saved.jobs.is_empty() {
                writeln!(out, "No saved jobs yet")?;
            }
            for job in &saved.jobs {
                write_job(out, job)?;
            }
        }
        SavedAction::Toggle { id } => {
            let response = service.toggle_saved(&id)?;
            let verb = if response.saved { "Saved" } else { "Removed" };
            writeln!(out, "{} {} ({} saved)", verb, response.id, response.saved_jobs.len())?;
        }
    }
    Ok(())
}

fn write_job(out: &mut impl Write, job: &JobSummary) -> std::io::Result<()> {
    writeln!(
        out,
        "{}  {} | {} | {} | {}{}",
        job.id,
        job.title,
        job.company,
        job.location,
        job.salary.as_deref().unwrap_or("salary not listed"),
        if job.saved { "  [saved]" } else { "" }
    )
}
