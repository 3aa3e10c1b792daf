use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "jobId")]
    pub job_id: String,
    #[serde(rename = "OBJtitle", default)]
    pub title: String,
    #[serde(rename = "OBJdesc", default)]
    pub description: String,
    #[serde(rename = "companyName", default)]
    pub company_name: String,
    #[serde(rename = "companyLogo", default)]
    pub company_logo_url: String,
    #[serde(rename = "OBJcity", default)]
    pub city: String,
    #[serde(rename = "OBJstate", default)]
    pub state: String,
    #[serde(rename = "estimatedSalary", default)]
    pub estimated_salary: String,
    #[serde(rename = "jobLevels", default)]
    pub job_levels: Vec<String>,
    #[serde(rename = "postingDate", default)]
    pub posting_date: String, // machine-parseable, drives the recency checks
    #[serde(rename = "postedDate", default)]
    pub posted_date: String, // display only ("3d ago", "Today")
}

impl Job {
    pub fn location(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    pub fn levels(&self) -> String {
        self.job_levels.join(",")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(rename = "totalJobs", default)]
    pub total_jobs: u64,
    #[serde(rename = "remainingJobs", default)]
    pub remaining_jobs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deserializes_api_keys() {
        let json = r#"{
            "jobId": "abc123",
            "OBJtitle": "Business Analyst",
            "OBJdesc": "Analyze things.",
            "companyName": "Acme Corp",
            "companyLogo": "https://example.com/logo.png",
            "OBJcity": "Austin",
            "OBJstate": "TX",
            "estimatedSalary": "$60K - $80K",
            "jobLevels": ["Mid Level", "Senior Level"],
            "postingDate": "2022-08-31T21:53:51.921Z",
            "postedDate": "1d ago",
            "OBJurl": "ignored"
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.job_id, "abc123");
        assert_eq!(job.title, "Business Analyst");
        assert_eq!(job.company_logo_url, "https://example.com/logo.png");
        assert_eq!(job.location(), "Austin, TX");
        assert_eq!(job.levels(), "Mid Level,Senior Level");
        assert_eq!(job.posted_date, "1d ago");
    }

    #[test]
    fn test_job_missing_fields_default_to_empty() {
        let job: Job = serde_json::from_str(r#"{"jobId": "x"}"#).unwrap();
        assert_eq!(job.title, "");
        assert!(job.job_levels.is_empty());
        assert_eq!(job.levels(), "");
        assert_eq!(job.location(), ", ");
    }

    #[test]
    fn test_job_requires_id() {
        let result: Result<Job, _> = serde_json::from_str(r#"{"OBJtitle": "No id"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_response_counters() {
        let json = r#"{"jobs": [{"jobId": "1"}, {"jobId": "2"}], "totalJobs": 120, "remainingJobs": 100}"#;
        let response: JobsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.jobs.len(), 2);
        assert_eq!(response.total_jobs, 120);
        assert_eq!(response.remaining_jobs, 100);
    }
}
