use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Server-assigned job identity. Immutable once assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct JobId(pub Uuid);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(JobId(Uuid::parse_str(s.trim())?))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = anyhow::Error;

    // Exact match only: the backend stores the method verbatim
    fn from_str(s: &str) -> anyhow::Result<Self> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unsupported HTTP method: {}", s))
    }
}

/// Server-side status filter for job listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Active => "ACTIVE",
            StatusFilter::Inactive => "INACTIVE",
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_uppercase().as_str() {
            "ALL" => Ok(StatusFilter::All),
            "ACTIVE" => Ok(StatusFilter::Active),
            "INACTIVE" => Ok(StatusFilter::Inactive),
            _ => Err(anyhow::anyhow!("Unknown status filter: {}", s)),
        }
    }
}

/// Everything about a job except its id. This is the create payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub job_name: String,
    pub job_group: String,
    pub cron_expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    pub url: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: Option<String>, // JSON text, parsed by the server
    #[serde(default)]
    pub request_body: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    #[serde(flatten)]
    pub draft: JobDraft,
}

impl Job {
    pub fn name(&self) -> &str {
        &self.draft.job_name
    }

    /// Case-insensitive substring match over name, group and schedule.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [&self.draft.job_name, &self.draft.job_group, &self.draft.cron_expression]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}
