//! Paginated, filterable job list kept in step with the backend.
//!
//! [`JobListState`] holds everything the list screen shows and exposes pure
//! transitions. Every transition that changes a paging or filter parameter
//! returns exactly one [`ListRequest`]; the caller runs it and feeds the result
//! back through [`JobListState::apply_list`]. Requests carry a sequence number
//! and only the most recently issued one is allowed to land, so a slow response
//! to an old request can never overwrite a newer page.
//!
//! [`JobListViewModel`] wires the transitions to a [`JobDirectory`].

use crate::directory::{Created, JobDirectory, ListQuery};
use crate::error::{CreateJobError, DirectoryError};
use crate::notification::{self, Notification};
use common::{Job, JobDraft, JobId, Page, StatusFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A page of jobs together with the query that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Projection {
    pub query: ListQuery,
    pub page: Page<Job>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    pub seq: u64,
    pub query: ListQuery,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListState {
    pub status: StatusFilter,
    /// Applied to the current page only, see [`JobListState::visible_jobs`].
    pub search: String,
    pub page: u32,
    pub page_size: u32,
    pub projection: Option<Projection>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub notification: Option<Notification>,
    #[serde(default)]
    latest_seq: u64,
}

impl Default for JobListState {
    fn default() -> Self {
        Self::new(common::DEFAULT_PAGE_SIZE)
    }
}

impl JobListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            status: StatusFilter::All,
            search: String::new(),
            page: 0,
            page_size: page_size.max(1),
            projection: None,
            loading: false,
            last_error: None,
            notification: None,
            latest_seq: 0,
        }
    }

    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            size: self.page_size,
            status: self.status,
        }
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    fn issue(&mut self) -> ListRequest {
        self.latest_seq += 1;
        self.loading = true;
        ListRequest {
            seq: self.latest_seq,
            query: self.query(),
        }
    }

    /// New filter: page numbers of the old filter mean nothing, restart at 0.
    pub fn set_filter(&mut self, status: StatusFilter) -> ListRequest {
        self.status = status;
        self.page = 0;
        self.issue()
    }

    pub fn set_page(&mut self, page: u32) -> ListRequest {
        self.page = page;
        self.issue()
    }

    /// Zero is clamped to one. Always restarts at page 0.
    pub fn set_page_size(&mut self, size: u32) -> ListRequest {
        self.page_size = size.max(1);
        self.page = 0;
        self.issue()
    }

    pub fn refresh(&mut self) -> ListRequest {
        self.issue()
    }

    /// Never triggers a request; the term is not understood by the backend.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    /// Returns false if the response belonged to a superseded request and was dropped.
    pub fn apply_list(
        &mut self,
        request: ListRequest,
        result: Result<Page<Job>, DirectoryError>,
    ) -> bool {
        if request.seq != self.latest_seq {
            log::debug!(
                "Dropping stale job list response (seq {} < latest {})",
                request.seq,
                self.latest_seq
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.projection = Some(Projection {
                    query: request.query,
                    page,
                });
                self.last_error = None;
            }
            Err(e) => {
                log::warn!("Failed to fetch jobs: {}", e);
                self.last_error = Some(e.to_string());
                self.notification = Some(Notification::error(notification::FETCH_JOBS_FAILED));
            }
        }
        true
    }

    /// Optimistic removal after a delete call. Returns how many entries were removed.
    pub fn apply_delete(&mut self, id: JobId, result: &Result<(), DirectoryError>) -> usize {
        match result {
            Ok(()) => {
                let removed = self
                    .projection
                    .as_mut()
                    .map(|p| p.page.remove_where(|job| job.id == id))
                    .unwrap_or(0);
                self.last_error = None;
                self.notification = Some(Notification::success(notification::DELETE_SUCCEEDED));
                removed
            }
            Err(e) => {
                log::warn!("Failed to delete job {}: {}", id, e);
                self.last_error = Some(e.to_string());
                self.notification = Some(Notification::error(notification::DELETE_FAILED));
                0
            }
        }
    }

    pub fn apply_create(&mut self, result: &Result<Created, DirectoryError>) {
        match result {
            Ok(_) => {
                self.last_error = None;
                self.notification = Some(Notification::success(notification::CREATE_SUCCEEDED));
            }
            Err(e) => {
                log::warn!("Failed to create job: {}", e);
                self.last_error = Some(e.to_string());
                self.notification = Some(Notification::error(notification::CREATE_FAILED));
            }
        }
    }

    pub fn jobs(&self) -> &[Job] {
        self.projection
            .as_ref()
            .map(|p| p.page.content.as_slice())
            .unwrap_or(&[])
    }

    /// Jobs on the current page that match the search term.
    pub fn visible_jobs(&self) -> Vec<&Job> {
        self.jobs()
            .iter()
            .filter(|job| job.matches_search(&self.search))
            .collect()
    }

    /// As of the last full fetch, minus local deletions since.
    pub fn total_elements(&self) -> u64 {
        self.projection.as_ref().map(|p| p.page.total_elements).unwrap_or(0)
    }

    pub fn total_pages(&self) -> u32 {
        self.projection.as_ref().map(|p| p.page.total_pages).unwrap_or(0)
    }
}

pub struct JobListViewModel<D: JobDirectory + ?Sized> {
    directory: Arc<D>,
    state: JobListState,
}

impl<D: JobDirectory + ?Sized> JobListViewModel<D> {
    pub fn new(directory: Arc<D>, page_size: u32) -> Self {
        Self {
            directory,
            state: JobListState::new(page_size),
        }
    }

    pub fn with_state(directory: Arc<D>, state: JobListState) -> Self {
        Self { directory, state }
    }

    pub fn state(&self) -> &JobListState {
        &self.state
    }

    pub fn into_state(self) -> JobListState {
        self.state
    }

    async fn run(&mut self, request: ListRequest) -> bool {
        let result = self.directory.list_jobs(&request.query).await;
        self.state.apply_list(request, result)
    }

    pub async fn refresh(&mut self) -> bool {
        let request = self.state.refresh();
        self.run(request).await
    }

    pub async fn set_filter(&mut self, status: StatusFilter) -> bool {
        let request = self.state.set_filter(status);
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

    pub fn set_search(&mut self, term: &str) {
        self.state.set_search(term);
    }

    /// Deletes server-side, then drops the entry locally without refetching.
    pub async fn delete_job(&mut self, id: JobId) -> Result<usize, DirectoryError> {
        let result = self.directory.delete_job(id).await;
        let removed = self.state.apply_delete(id, &result);
        result.map(|()| removed)
    }

    /// Validates, then creates. The new job is not inserted into the current page.
    pub async fn create_job(&mut self, draft: &JobDraft) -> Result<Created, CreateJobError> {
        if let Err(errors) = draft.validate() {
            log::debug!("Create rejected client-side: {:?}", errors);
            return Err(CreateJobError::Invalid(errors));
        }

        let result = self.directory.create_job(draft).await;
        self.state.apply_create(&result);
        Ok(result?)
    }
}
