use async_trait::async_trait;
use common::{
    ExecutionRecord, ExecutionStatus, HttpMethod, Job, JobDraft, JobId, Page, StatusFilter,
};
use schedctl_console::{
    load_job, Created, CreateJobError, DirectoryError, JobDetail, JobDirectory, JobHistoryViewModel,
    JobListViewModel, ListQuery,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Backend stand-in: filters and pages like the real service, counts calls.
#[derive(Default)]
struct InMemoryDirectory {
    jobs: Mutex<Vec<Job>>,
    history: Mutex<Vec<ExecutionRecord>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

fn paginate<T: Clone>(items: &[T], page: u32, size: u32) -> Page<T> {
    let size = size.max(1) as usize;
    let total = items.len();
    Page {
        content: items.iter().skip(page as usize * size).take(size).cloned().collect(),
        total_elements: total as u64,
        total_pages: ((total + size - 1) / size) as u32,
    }
}

fn status_matches(status: StatusFilter, job: &Job) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Active => job.draft.active,
        StatusFilter::Inactive => !job.draft.active,
    }
}

impl InMemoryDirectory {
    fn seeded(active: usize, inactive: usize) -> Self {
        let dir = Self::default();
        {
            let mut jobs = dir.jobs.lock().unwrap();
            for i in 0..active {
                jobs.push(job(&format!("active-{}", i), true));
            }
            for i in 0..inactive {
                jobs.push(job(&format!("inactive-{}", i), false));
            }
        }
        dir
    }

    fn remove_behind_the_back(&self, id: JobId) {
        self.jobs.lock().unwrap().retain(|j| j.id != id);
    }
}

#[async_trait]
impl JobDirectory for InMemoryDirectory {
    async fn list_jobs(&self, query: &ListQuery) -> Result<Page<Job>, DirectoryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let jobs = self.jobs.lock().unwrap();
        let matching: Vec<Job> = jobs
            .iter()
            .filter(|j| status_matches(query.status, j))
            .cloned()
            .collect();
        Ok(paginate(&matching, query.page, query.size))
    }

    async fn get_job(&self, id: JobId) -> Result<Job, DirectoryError> {
        self.jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or(DirectoryError::NotFound(id))
    }

    async fn create_job(&self, draft: &JobDraft) -> Result<Created, DirectoryError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let job = Job {
            id: JobId(Uuid::new_v4()),
            draft: draft.clone(),
        };
        self.jobs.lock().unwrap().push(job.clone());
        Ok(Created::Job(job))
    }

    async fn delete_job(&self, id: JobId) -> Result<(), DirectoryError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut jobs = self.jobs.lock().unwrap();
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        if jobs.len() == before {
            Err(DirectoryError::NotFound(id))
        } else {
            Ok(())
        }
    }

    async fn list_history(
        &self,
        id: JobId,
        page: u32,
        size: u32,
    ) -> Result<Page<ExecutionRecord>, DirectoryError> {
        if !self.jobs.lock().unwrap().iter().any(|j| j.id == id) {
            return Err(DirectoryError::NotFound(id));
        }
        let records: Vec<ExecutionRecord> = self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.job_id == id)
            .cloned()
            .collect();
        Ok(paginate(&records, page, size))
    }
}

fn draft(name: &str, active: bool) -> JobDraft {
    JobDraft {
        job_name: name.to_string(),
        job_group: "etl".to_string(),
        cron_expression: "0 0 * * * ?".to_string(),
        parameters: None,
        url: "http://api.example.com/run".to_string(),
        method: HttpMethod::Post,
        headers: Some(String::new()),
        request_body: Some(String::new()),
        active,
    }
}

fn job(name: &str, active: bool) -> Job {
    Job {
        id: JobId(Uuid::new_v4()),
        draft: draft(name, active),
    }
}

#[tokio::test]
async fn test_active_filter_first_page() {
    let dir = Arc::new(InMemoryDirectory::seeded(15, 5));
    let mut vm = JobListViewModel::new(dir.clone(), 10);

    assert!(vm.set_filter(StatusFilter::Active).await);
    let state = vm.state();
    assert_eq!(state.jobs().len(), 10);
    assert_eq!(state.total_elements(), 15);
    assert_eq!(state.total_pages(), 2);
    assert!(state.jobs().iter().all(|j| j.draft.active));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_filter_change_restarts_pagination() {
    let dir = Arc::new(InMemoryDirectory::seeded(15, 5));
    let mut vm = JobListViewModel::new(dir.clone(), 10);

    vm.set_page(1).await;
    assert_eq!(vm.state().jobs().len(), 10);

    vm.set_filter(StatusFilter::Inactive).await;
    assert_eq!(vm.state().page, 0);
    assert_eq!(vm.state().jobs().len(), 5);
    assert_eq!(vm.state().total_elements(), 5);

    vm.set_page_size(25).await;
    vm.set_filter(StatusFilter::All).await;
    assert_eq!(vm.state().jobs().len(), 20);
    assert_eq!(dir.list_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_set_page_keeps_filter_and_size() {
    let dir = Arc::new(InMemoryDirectory::seeded(15, 5));
    let mut vm = JobListViewModel::new(dir, 5);
    vm.set_filter(StatusFilter::Active).await;
    vm.set_page(2).await;

    let query = vm.state().projection.as_ref().unwrap().query;
    assert_eq!(query, ListQuery { page: 2, size: 5, status: StatusFilter::Active });
    assert_eq!(vm.state().jobs()[0].name(), "active-10");
}

#[tokio::test]
async fn test_delete_is_local_and_does_not_refetch() {
    let dir = Arc::new(InMemoryDirectory::seeded(3, 0));
    let mut vm = JobListViewModel::new(dir.clone(), 10);
    vm.refresh().await;
    let victim = vm.state().jobs()[1].id;
    let calls = dir.list_calls.load(Ordering::SeqCst);

    let removed = vm.delete_job(victim).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(vm.state().jobs().len(), 2);
    assert!(vm.state().jobs().iter().all(|j| j.id != victim));
    assert_eq!(vm.state().total_elements(), 2);
    assert_eq!(dir.list_calls.load(Ordering::SeqCst), calls);
    assert!(!vm.state().notification.as_ref().unwrap().is_error());
}

#[tokio::test]
async fn test_delete_missing_leaves_stale_entry() {
    let dir = Arc::new(InMemoryDirectory::seeded(2, 0));
    let mut vm = JobListViewModel::new(dir.clone(), 10);
    vm.refresh().await;
    let stale = vm.state().jobs()[0].id;
    dir.remove_behind_the_back(stale);

    let err = vm.delete_job(stale).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(id) if id == stale));
    assert_eq!(vm.state().jobs().len(), 2);
    assert!(vm.state().jobs().iter().any(|j| j.id == stale));
    assert!(vm.state().notification.as_ref().unwrap().is_error());
}

#[tokio::test]
async fn test_create_then_fetch_round_trip() {
    let dir = Arc::new(InMemoryDirectory::default());
    let mut vm = JobListViewModel::new(dir.clone(), 10);
    vm.refresh().await;

    let created = match vm.create_job(&draft("sync", true)).await.unwrap() {
        Created::Job(job) => job,
        Created::Accepted => panic!("in-memory directory always echoes the job"),
    };
    // Creation never touches the current page
    assert!(vm.state().jobs().is_empty());

    match load_job(dir.as_ref(), created.id).await {
        JobDetail::Found(fetched) => {
            assert_eq!(fetched.id, created.id);
            assert_eq!(fetched.draft, draft("sync", true));
        }
        other => panic!("expected job, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_server() {
    let dir = Arc::new(InMemoryDirectory::default());
    let mut vm = JobListViewModel::new(dir.clone(), 10);

    let mut bad = draft("", true);
    bad.url = "notaurl".to_string();
    match vm.create_job(&bad).await {
        Err(CreateJobError::Invalid(errors)) => {
            assert!(errors.contains_key("jobName"));
            assert!(errors.contains_key("url"));
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(dir.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_detail_not_found() {
    let dir = InMemoryDirectory::default();
    let detail = load_job(&dir, JobId(Uuid::new_v4())).await;
    assert!(matches!(detail, JobDetail::NotFound));
}

#[tokio::test]
async fn test_history_paging() {
    let dir = Arc::new(InMemoryDirectory::seeded(1, 0));
    let job_id = dir.jobs.lock().unwrap()[0].id;
    {
        let mut history = dir.history.lock().unwrap();
        let start = chrono::Utc::now();
        for i in 0..12 {
            history.push(ExecutionRecord {
                uuid: Uuid::new_v4(),
                job_id,
                trigger_name: Some(format!("trigger-{}", i)),
                start_time: start,
                end_time: Some(start + chrono::Duration::milliseconds(2345)),
                status: ExecutionStatus::Success,
                error_message: None,
            });
        }
    }

    let mut vm = JobHistoryViewModel::new(dir.clone(), job_id, 10);
    vm.set_page(1).await;
    assert_eq!(vm.state().records.len(), 2);
    assert_eq!(vm.state().records.total_elements, 12);

    vm.set_page_size(5).await;
    assert_eq!(vm.state().page, 0);
    assert_eq!(vm.state().records.len(), 5);
    assert_eq!(vm.state().records.content[0].display_duration(), "2.35s");

    let mut missing = JobHistoryViewModel::new(dir, JobId(Uuid::new_v4()), 10);
    missing.refresh().await;
    assert!(missing.state().error.is_some());
}
