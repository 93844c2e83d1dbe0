use crate::job::{HttpMethod, JobDraft};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://.+").unwrap());

/// Field name -> message, for every field that failed.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

pub const VALIDATED_FIELDS: [&str; 5] = ["jobName", "jobGroup", "cronExpression", "url", "method"];

/// Client-side check for one form field. Advisory only; the server re-validates.
/// Fields without a rule (headers, requestBody, ...) always pass.
pub fn validate_field(field: &str, value: &str) -> Option<&'static str> {
    match field {
        "jobName" if value.trim().is_empty() => Some("Job name is required."),
        "jobGroup" if value.trim().is_empty() => Some("Job group is required."),
        "cronExpression" if value.trim().is_empty() => Some("Cron expression is required."),
        "url" if !URL_PATTERN.is_match(value) => Some("Please enter a valid URL."),
        "method" if value.parse::<HttpMethod>().is_err() => Some("Invalid method."),
        _ => None,
    }
}

impl JobDraft {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let method = self.method.as_str();
        let values = [
            ("jobName", self.job_name.as_str()),
            ("jobGroup", self.job_group.as_str()),
            ("cronExpression", self.cron_expression.as_str()),
            ("url", self.url.as_str()),
            ("method", method),
        ];

        let errors: FieldErrors = values
            .iter()
            .filter_map(|(field, value)| validate_field(field, value).map(|msg| (*field, msg)))
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
