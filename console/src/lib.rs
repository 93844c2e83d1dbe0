pub mod config;
pub mod detail;
pub mod directory;
pub mod error;
pub mod form;
pub mod history;
pub mod job_list;
pub mod logging;
pub mod notification;

pub use config::Config;
pub use detail::{load_job, JobDetail};
pub use directory::{Created, HttpJobDirectory, JobDirectory, ListQuery};
pub use error::{CreateJobError, DirectoryError, TransportError};
pub use form::JobForm;
pub use history::{JobHistoryState, JobHistoryViewModel};
pub use job_list::{JobListState, JobListViewModel, ListRequest, Projection};
pub use notification::{Notification, Severity};
