pub mod history;
pub mod job;
pub mod page;
pub mod validation;

pub use history::{format_duration, ExecutionRecord, ExecutionStatus};
pub use job::{HttpMethod, Job, JobDraft, JobId, StatusFilter};
pub use page::Page;
pub use validation::{validate_field, FieldErrors};

// Backend endpoint the console talks to unless configured otherwise
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/jobs";

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [5, 10, 25];

// Config lookup: <config dir>/schedctl/config.yaml, overridable from the environment
pub const CONFIG_DIR_NAME: &str = "schedctl";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const API_URL_ENV: &str = "SCHEDCTL_API_URL";
pub const LOG_FILE_ENV: &str = "SCHEDCTL_LOG";
