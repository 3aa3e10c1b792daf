use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::JobsResponse;

pub const DEFAULT_API_URL: &str = "https://www.zippia.com/api/jobs/";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse jobs response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Source trait ---

/// Anything that can produce the initial job set for the board.
pub trait JobSource {
    fn load(&self) -> Result<JobsResponse, LoadError>;
    fn describe(&self) -> String;
}

// --- Zippia search API ---

/// Search payload. Every field is fixed for now; `Default` is the only query we send.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchRequest {
    pub company_skills: bool,
    pub dismissed_listing_hashes: Vec<String>,
    pub fetch_job_desc: bool,
    pub job_title: String,
    pub locations: Vec<String>,
    pub num_jobs: u32,
    pub previous_listing_hashes: Vec<String>,
}

impl Default for JobSearchRequest {
    fn default() -> Self {
        Self {
            company_skills: true,
            dismissed_listing_hashes: Vec::new(),
            fetch_job_desc: true,
            job_title: "Business Analyst".to_string(),
            locations: Vec::new(),
            num_jobs: 20,
            previous_listing_hashes: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct ZippiaClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl ZippiaClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| LoadError::Request {
                url: url.clone(),
                source,
            })?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::blocking::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn fetch_jobs(&self) -> Result<JobsResponse, LoadError> {
        let request = JobSearchRequest::default();
        info!(url = %self.url, job_title = %request.job_title, "fetching jobs");

        let response = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .map_err(|source| LoadError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        debug!(%status, "jobs response received");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LoadError::Status { status, body });
        }

        let body = response.text().map_err(|source| LoadError::Request {
            url: self.url.clone(),
            source,
        })?;
        parse_response(&body)
    }
}

impl JobSource for ZippiaClient {
    fn load(&self) -> Result<JobsResponse, LoadError> {
        self.fetch_jobs()
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

// --- Saved responses ---

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl JobSource for FileSource {
    fn load(&self) -> Result<JobsResponse, LoadError> {
        load_from_file(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub fn load_from_file(path: &Path) -> Result<JobsResponse, LoadError> {
    info!(path = %path.display(), "loading jobs from file");
    let body = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_response(&body)
}

pub fn parse_response(body: &str) -> Result<JobsResponse, LoadError> {
    let response: JobsResponse = serde_json::from_str(body)?;
    info!(
        jobs = response.jobs.len(),
        total = response.total_jobs,
        remaining = response.remaining_jobs,
        "jobs loaded"
    );
    Ok(response)
}
