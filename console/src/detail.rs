use crate::directory::JobDirectory;
use crate::notification::{self, Notification};
use common::{Job, JobId};

/// What the details screen shows for one id.
#[derive(Debug)]
pub enum JobDetail {
    Found(Job),
    NotFound,
    Failed(Notification),
}

pub async fn load_job<D: JobDirectory + ?Sized>(directory: &D, id: JobId) -> JobDetail {
    match directory.get_job(id).await {
        Ok(job) => JobDetail::Found(job),
        Err(e) if e.is_not_found() => {
            log::info!("Job {} not found", id);
            JobDetail::NotFound
        }
        Err(e) => {
            log::warn!("Failed to fetch job {}: {}", id, e);
            JobDetail::Failed(Notification::error(notification::FETCH_DETAILS_FAILED))
        }
    }
}
