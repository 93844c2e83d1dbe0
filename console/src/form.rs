//! Create-job form: raw text per field, validated as it is edited.

use anyhow::{anyhow, Result};
use common::validation::VALIDATED_FIELDS;
use common::{validate_field, FieldErrors, HttpMethod, JobDraft};
use std::collections::BTreeMap;

pub const FORM_FIELDS: [&str; 8] = [
    "jobName",
    "jobGroup",
    "cronExpression",
    "parameters",
    "url",
    "method",
    "headers",
    "requestBody",
];

#[derive(Debug, Clone)]
pub struct JobForm {
    values: BTreeMap<&'static str, String>,
    pub active: bool,
    errors: FieldErrors,
}

impl Default for JobForm {
    fn default() -> Self {
        let mut values: BTreeMap<&'static str, String> =
            FORM_FIELDS.iter().map(|f| (*f, String::new())).collect();
        values.insert("method", HttpMethod::Get.to_string());
        Self {
            values,
            active: true,
            errors: FieldErrors::new(),
        }
    }
}

impl JobForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` and re-check just that field. Returns the field's current error.
    pub fn set(&mut self, field: &str, value: &str) -> Result<Option<&'static str>> {
        let key = FORM_FIELDS
            .iter()
            .copied()
            .find(|f| *f == field)
            .ok_or_else(|| anyhow!("Unknown form field: {}", field))?;

        self.values.insert(key, value.to_string());
        let error = validate_field(key, value);
        match error {
            Some(msg) => self.errors.insert(key, msg),
            None => self.errors.remove(key),
        };
        Ok(error)
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Re-run every rule; on success produce the draft to send.
    pub fn submit(&mut self) -> std::result::Result<JobDraft, FieldErrors> {
        self.errors = VALIDATED_FIELDS
            .iter()
            .filter_map(|f| validate_field(f, self.value(f)).map(|msg| (*f, msg)))
            .collect();
        if !self.errors.is_empty() {
            return Err(self.errors.clone());
        }

        let method = match self.value("method").parse::<HttpMethod>() {
            Ok(m) => m,
            Err(_) => {
                self.errors.insert("method", "Invalid method.");
                return Err(self.errors.clone());
            }
        };
        let parameters = Some(self.value("parameters").to_string()).filter(|p| !p.is_empty());

        Ok(JobDraft {
            job_name: self.value("jobName").to_string(),
            job_group: self.value("jobGroup").to_string(),
            cron_expression: self.value("cronExpression").to_string(),
            parameters,
            url: self.value("url").to_string(),
            method,
            headers: Some(self.value("headers").to_string()),
            request_body: Some(self.value("requestBody").to_string()),
            active: self.active,
        })
    }
}
