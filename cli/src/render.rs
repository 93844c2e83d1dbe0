use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use common::{ExecutionRecord, ExecutionStatus, Job};
use std::io::Write;

const START_TIME_FORMAT: &str = "%b %-d, %Y %H:%M:%S";

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn active_cell(active: bool) -> Cell {
    if active {
        Cell::new("Active").fg(Color::Green)
    } else {
        Cell::new("Inactive").fg(Color::Red)
    }
}

fn status_cell(status: &ExecutionStatus) -> Cell {
    match status {
        ExecutionStatus::Success => Cell::new("Success").fg(Color::Green),
        ExecutionStatus::Failed => Cell::new("Failed").fg(Color::Red),
        ExecutionStatus::Other(s) => Cell::new(s),
    }
}

fn start_time(record: &ExecutionRecord) -> String {
    record
        .start_time
        .with_timezone(&chrono::Local)
        .format(START_TIME_FORMAT)
        .to_string()
}

pub fn jobs_table(jobs: &[&Job]) -> Table {
    let mut table = new_table(vec![
        "ID",
        "Job Name",
        "Job Group",
        "Schedule",
        "Status",
        "Method",
        "URL",
    ]);
    if jobs.is_empty() {
        table.add_row(vec!["No jobs found"]);
    }
    for job in jobs {
        table.add_row(vec![
            Cell::new(job.id),
            Cell::new(&job.draft.job_name),
            Cell::new(&job.draft.job_group),
            Cell::new(&job.draft.cron_expression),
            active_cell(job.draft.active),
            Cell::new(job.draft.method),
            Cell::new(&job.draft.url),
        ]);
    }
    table
}

pub fn history_table(records: &[ExecutionRecord]) -> Table {
    let mut table = new_table(vec![
        "Trigger Name",
        "Start Time",
        "Duration",
        "Status",
        "Error Message",
    ]);
    if records.is_empty() {
        table.add_row(vec!["No execution history found."]);
    }
    for record in records {
        table.add_row(vec![
            Cell::new(record.trigger_name.as_deref().unwrap_or("-")),
            Cell::new(start_time(record)),
            Cell::new(record.display_duration()),
            status_cell(&record.status),
            Cell::new(record.error_message.as_deref().unwrap_or("No error message")),
        ]);
    }
    table
}

/// Zero-based page in, one-based page out.
pub fn page_footer(
    page: u32,
    size: u32,
    total_elements: u64,
    total_pages: u32,
    noun: &str,
) -> String {
    format!(
        "Page {} of {} ({} {}, {} per page)",
        page + 1,
        total_pages.max(1),
        total_elements,
        noun,
        size
    )
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn job_detail(job: &Job) -> String {
    let d = &job.draft;
    let mut out = String::new();
    out.push_str("Job Details:\n");
    out.push_str(&format!("  ID:         {}\n", job.id));
    out.push_str(&format!("  Name:       {}\n", d.job_name));
    out.push_str(&format!("  Group:      {}\n", d.job_group));
    out.push_str(&format!("  Schedule:   {}\n", d.cron_expression));
    out.push_str(&format!("  Status:     {}\n", if d.active { "Active" } else { "Inactive" }));
    out.push_str(&format!("  Method:     {}\n", d.method));
    out.push_str(&format!("  URL:        {}\n", d.url));
    out.push_str(&format!("  Headers:    {}\n", or_dash(d.headers.as_deref())));
    out.push_str(&format!("  Body:       {}\n", or_dash(d.request_body.as_deref())));
    if let Some(params) = d.parameters.as_deref() {
        out.push_str(&format!("  Parameters: {}\n", params));
    }
    out
}

pub fn jobs_csv<W: Write>(writer: W, jobs: &[&Job]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "jobName", "jobGroup", "cronExpression", "active", "method", "url"])?;
    for job in jobs {
        let d = &job.draft;
        wtr.write_record([
            job.id.to_string(),
            d.job_name.clone(),
            d.job_group.clone(),
            d.cron_expression.clone(),
            d.active.to_string(),
            d.method.to_string(),
            d.url.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn history_csv<W: Write>(writer: W, records: &[ExecutionRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "uuid",
        "triggerName",
        "startTime",
        "durationSeconds",
        "status",
        "errorMessage",
    ])?;
    for r in records {
        let duration = r.duration().map(common::format_duration).unwrap_or_default();
        wtr.write_record([
            r.uuid.to_string(),
            r.trigger_name.clone().unwrap_or_default(),
            r.start_time.to_rfc3339(),
            duration,
            r.status.to_string(),
            r.error_message.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use common::{HttpMethod, JobDraft, JobId};
    use uuid::Uuid;

    fn job() -> Job {
        Job {
            id: JobId(Uuid::nil()),
            draft: JobDraft {
                job_name: "daily-sync".to_string(),
                job_group: "etl".to_string(),
                cron_expression: "0 0 * * * ?".to_string(),
                parameters: None,
                url: "http://api.example.com/run".to_string(),
                method: HttpMethod::Post,
                headers: Some(String::new()),
                request_body: None,
                active: false,
            },
        }
    }

    fn record() -> ExecutionRecord {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        ExecutionRecord {
            uuid: Uuid::nil(),
            job_id: JobId(Uuid::nil()),
            trigger_name: Some("sync-trigger".to_string()),
            start_time: start,
            end_time: Some(start + chrono::Duration::milliseconds(2345)),
            status: ExecutionStatus::Failed,
            error_message: None,
        }
    }

    // Pin the width so Dynamic arrangement never wraps under a real terminal
    fn render(mut table: Table) -> String {
        table.set_width(250);
        table.to_string()
    }

    #[test]
    fn test_jobs_table() {
        let j = job();
        let out = render(jobs_table(&[&j]));
        assert!(out.contains("daily-sync"));
        assert!(out.contains("Inactive"));
        assert!(out.contains("POST"));
    }

    #[test]
    fn test_empty_tables() {
        assert!(render(jobs_table(&[])).contains("No jobs found"));
        assert!(render(history_table(&[])).contains("No execution history found."));
    }

    #[test]
    fn test_history_table() {
        let out = render(history_table(&[record()]));
        assert!(out.contains("2.35s"));
        assert!(out.contains("Failed"));
        assert!(out.contains("No error message"));
    }

    #[test]
    fn test_footer() {
        assert_eq!(page_footer(0, 10, 15, 2, "jobs"), "Page 1 of 2 (15 jobs, 10 per page)");
        assert_eq!(page_footer(0, 10, 0, 0, "jobs"), "Page 1 of 1 (0 jobs, 10 per page)");
    }

    #[test]
    fn test_detail() {
        let out = job_detail(&job());
        assert!(out.contains("Group:      etl"));
        assert!(out.contains("Headers:    -"));
        assert!(!out.contains("Parameters"));
    }

    #[test]
    fn test_csv() {
        let j = job();
        let mut buf = Vec::new();
        jobs_csv(&mut buf, &[&j]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,jobName,jobGroup,cronExpression,active,method,url"));
        assert_eq!(
            lines.next(),
            Some(concat!(
                "00000000-0000-0000-0000-000000000000,",
                "daily-sync,etl,0 0 * * * ?,false,POST,http://api.example.com/run"
            ))
        );

        let mut buf = Vec::new();
        history_csv(&mut buf, &[record()]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().contains(",2.35,FAILED,"));
    }
}
