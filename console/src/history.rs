//! Execution history of one job, one page at a time.

use crate::directory::JobDirectory;
use crate::error::DirectoryError;
use crate::notification;
use common::{ExecutionRecord, JobId, Page};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRequest {
    pub seq: u64,
    pub job_id: JobId,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHistoryState {
    pub job_id: JobId,
    pub page: u32,
    pub page_size: u32,
    pub records: Page<ExecutionRecord>,
    pub loading: bool,
    pub error: Option<String>,
    #[serde(default)]
    latest_seq: u64,
}

impl JobHistoryState {
    pub fn new(job_id: JobId, page_size: u32) -> Self {
        Self {
            job_id,
            page: 0,
            page_size: page_size.max(1),
            records: Page::empty(),
            loading: false,
            error: None,
            latest_seq: 0,
        }
    }

    fn issue(&mut self) -> HistoryRequest {
        self.latest_seq += 1;
        self.loading = true;
        HistoryRequest {
            seq: self.latest_seq,
            job_id: self.job_id,
            page: self.page,
            size: self.page_size,
        }
    }

    pub fn set_page(&mut self, page: u32) -> HistoryRequest {
        self.page = page;
        self.issue()
    }

    pub fn set_page_size(&mut self, size: u32) -> HistoryRequest {
        self.page_size = size.max(1);
        self.page = 0;
        self.issue()
    }

    pub fn refresh(&mut self) -> HistoryRequest {
        self.issue()
    }

    pub fn apply(
        &mut self,
        request: HistoryRequest,
        result: Result<Page<ExecutionRecord>, DirectoryError>,
    ) -> bool {
        if request.seq != self.latest_seq {
            log::debug!("Dropping stale history response for job {}", request.job_id);
            return false;
        }

        self.loading = false;
        match result {
            Ok(records) => {
                self.records = records;
                self.error = None;
            }
            Err(e) => {
                log::warn!("Failed to fetch history for job {}: {}", request.job_id, e);
                self.error = Some(notification::FETCH_HISTORY_FAILED.to_string());
            }
        }
        true
    }
}

pub struct JobHistoryViewModel<D: JobDirectory + ?Sized> {
    directory: Arc<D>,
    state: JobHistoryState,
}

impl<D: JobDirectory + ?Sized> JobHistoryViewModel<D> {
    pub fn new(directory: Arc<D>, job_id: JobId, page_size: u32) -> Self {
        Self {
            directory,
            state: JobHistoryState::new(job_id, page_size),
        }
    }

    pub fn state(&self) -> &JobHistoryState {
        &self.state
    }

    async fn run(&mut self, request: HistoryRequest) -> bool {
        let result = self
            .directory
            .list_history(request.job_id, request.page, request.size)
            .await;
        self.state.apply(request, result)
    }

    pub async fn refresh(&mut self) -> bool {
        let request = self.state.refresh();
        self.run(request).await
    }

    pub async fn set_page(&mut self, page: u32) -> bool {
        let request = self.state.set_page(page);
        self.run(request).await
    }

    pub async fn set_page_size(&mut self, size: u32) -> bool {
        let request = self.state.set_page_size(size);
        self.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn id() -> JobId {
        JobId(Uuid::nil())
    }

    #[test]
    fn test_page_size_resets_page() {
        let mut state = JobHistoryState::new(id(), 10);
        state.set_page(3);
        let req = state.set_page_size(5);
        assert_eq!((req.page, req.size), (0, 5));
        let req = state.set_page(2);
        assert_eq!((req.page, req.size), (2, 5));
    }

    #[test]
    fn test_failure_sets_error_and_keeps_records() {
        let mut state = JobHistoryState::new(id(), 10);
        let req = state.refresh();
        let page = Page {
            content: vec![],
            total_elements: 4,
            total_pages: 1,
        };
        state.apply(req, Ok(page));

        let req = state.refresh();
        assert!(state.apply(req, Err(DirectoryError::NotFound(id()))));
        assert_eq!(state.error.as_deref(), Some(notification::FETCH_HISTORY_FAILED));
        assert_eq!(state.records.total_elements, 4);
        assert!(!state.loading);
    }

    #[test]
    fn test_stale_response_dropped() {
        let mut state = JobHistoryState::new(id(), 10);
        let old = state.set_page(0);
        let new = state.set_page(1);
        let page = Page {
            content: vec![],
            total_elements: 12,
            total_pages: 2,
        };
        assert!(state.apply(new, Ok(page)));
        assert!(!state.apply(old, Ok(Page::empty())));
        assert_eq!(state.records.total_elements, 12);
    }
}
