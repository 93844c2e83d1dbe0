use crate::config::ApiConfig;
use crate::error::{DirectoryError, TransportError};
use async_trait::async_trait;
use common::{ExecutionRecord, Job, JobDraft, JobId, Page, StatusFilter};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters of one job listing request. `page` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub status: StatusFilter,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: common::DEFAULT_PAGE_SIZE,
            status: StatusFilter::All,
        }
    }
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    /// The server echoed the persisted job back.
    Job(Job),
    /// 2xx without a job in the body (the backend may answer with plain text).
    Accepted,
}

impl Created {
    pub fn job(&self) -> Option<&Job> {
        match self {
            Created::Job(job) => Some(job),
            Created::Accepted => None,
        }
    }
}

/// The backend's job collection. Every call sends at most one request and never retries.
#[async_trait]
pub trait JobDirectory: Send + Sync {
    async fn list_jobs(&self, query: &ListQuery) -> Result<Page<Job>, DirectoryError>;

    async fn get_job(&self, id: JobId) -> Result<Job, DirectoryError>;

    /// Any 2xx counts as created, whether or not the body carries the job.
    async fn create_job(&self, draft: &JobDraft) -> Result<Created, DirectoryError>;

    /// Deleting an id that is already gone is `NotFound`, not a silent success.
    async fn delete_job(&self, id: JobId) -> Result<(), DirectoryError>;

    /// Most recent first, as ordered by the server.
    async fn list_history(
        &self,
        id: JobId,
        page: u32,
        size: u32,
    ) -> Result<Page<ExecutionRecord>, DirectoryError>;
}

/// REST implementation over `/api/jobs`.
pub struct HttpJobDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpJobDirectory {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, DirectoryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self::with_client(builder.build()?, &api.base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn job_url(&self, id: JobId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DirectoryError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn unexpected(status: StatusCode, url: &str) -> DirectoryError {
    TransportError::Status {
        status: status.as_u16(),
        url: url.to_string(),
    }
    .into()
}

// 404 means the id is unknown; anything else non-2xx is a transport failure.
fn check_job_status(response: &Response, id: JobId, url: &str) -> Result<(), DirectoryError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        Err(DirectoryError::NotFound(id))
    } else if !status.is_success() {
        Err(unexpected(status, url))
    } else {
        Ok(())
    }
}

#[async_trait]
impl JobDirectory for HttpJobDirectory {
    async fn list_jobs(&self, query: &ListQuery) -> Result<Page<Job>, DirectoryError> {
        log::debug!(
            "GET {} page={} size={} status={}",
            self.base_url,
            query.page,
            query.size,
            query.status
        );
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("page", query.page.to_string()),
                ("size", query.size.to_string()),
                ("status", query.status.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(unexpected(response.status(), &self.base_url));
        }
        decode(response).await
    }

    async fn get_job(&self, id: JobId) -> Result<Job, DirectoryError> {
        let url = self.job_url(id);
        log::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        check_job_status(&response, id, &url)?;
        decode(response).await
    }

    async fn create_job(&self, draft: &JobDraft) -> Result<Created, DirectoryError> {
        log::debug!("POST {} name={}", self.base_url, draft.job_name);
        let response = self.client.post(&self.base_url).json(draft).send().await?;

        let status = response.status();
        if status.is_client_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Validation {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(unexpected(status, &self.base_url));
        }

        // The server has committed the job; a body we cannot read must not turn into a failure
        let bytes = response.bytes().await?;
        match serde_json::from_slice::<Job>(&bytes) {
            Ok(job) => {
                log::info!("Created job {} ({})", job.name(), job.id);
                Ok(Created::Job(job))
            }
            Err(e) => {
                log::info!("Created job {}", draft.job_name);
                log::debug!(
                    "Create response is not a job ({}): {}",
                    e,
                    String::from_utf8_lossy(&bytes)
                );
                Ok(Created::Accepted)
            }
        }
    }

    async fn delete_job(&self, id: JobId) -> Result<(), DirectoryError> {
        let url = self.job_url(id);
        log::debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        check_job_status(&response, id, &url)?;
        log::info!("Deleted job {}", id);
        Ok(())
    }

    async fn list_history(
        &self,
        id: JobId,
        page: u32,
        size: u32,
    ) -> Result<Page<ExecutionRecord>, DirectoryError> {
        let url = format!("{}/history", self.job_url(id));
        log::debug!("GET {} page={} size={}", url, page, size);
        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("size", size)])
            .send()
            .await?;
        check_job_status(&response, id, &url)?;
        decode(response).await
    }
}
