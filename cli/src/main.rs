mod prompt;
mod render;

use clap::{Parser, Subcommand, ValueEnum};
use common::{JobId, StatusFilter};
use schedctl_console::logging::setup_logging;
use schedctl_console::{
    load_job, Config, CreateJobError, HttpJobDirectory, JobDetail, JobForm, JobHistoryViewModel,
    JobListState, JobListViewModel, Notification,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Operator console for the HTTP job scheduler",
    long_about = None
)]
struct Cli {
    /// Config file (.yaml, .yml or .toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Backend job collection URL, e.g. http://localhost:8080/api/jobs
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Log requests at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs, one page at a time
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Page size (defaults to the configured size)
        #[arg(long)]
        size: Option<u32>,
        /// all, active or inactive
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// Only show jobs on this page whose name, group or schedule contains TEXT
        #[arg(long)]
        search: Option<String>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Show one job
    Get {
        id: JobId,
    },
    /// Create a new job
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        group: String,
        /// Cron expression, e.g. "0 0/15 * * * ?"
        #[arg(long)]
        cron: String,
        /// URL the scheduler calls on every firing
        #[arg(long)]
        url: String,
        /// GET, POST, PUT or DELETE
        #[arg(short, long, default_value = "GET")]
        method: String,
        /// Request headers as JSON text
        #[arg(long, default_value = "")]
        headers: String,
        /// Request body
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long)]
        parameters: Option<String>,
        /// Create the job paused
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a job
    Delete {
        id: JobId,
        /// Load the first page before deleting and print it afterwards
        #[arg(long)]
        list: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// View job execution history
    History {
        id: JobId,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long)]
        size: Option<u32>,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

fn report(notification: &Notification) -> bool {
    if notification.is_error() {
        eprintln!("Error: {}", notification);
        false
    } else {
        println!("{}", notification);
        true
    }
}

fn page_size(config: &Config, requested: Option<u32>) -> u32 {
    let size = requested.unwrap_or(config.paging.page_size);
    if !config.paging.page_size_options.contains(&size) {
        log::warn!(
            "Page size {} is not one of the configured options {:?}",
            size,
            config.paging.page_size_options
        );
    }
    size
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config.api.base_url = url;
    }
    setup_logging(&config.logging, cli.verbose)?;
    log::debug!("Using backend at {}", config.api.base_url);

    let directory = Arc::new(HttpJobDirectory::from_config(&config.api)?);

    let ok = match cli.command {
        Commands::List { page, size, status, search, output } => {
            // Seed the state directly so exactly one request goes out
            let mut state = JobListState::new(page_size(&config, size));
            state.status = status;
            state.page = page;
            let mut vm = JobListViewModel::with_state(directory, state);
            if let Some(term) = search {
                vm.set_search(&term);
            }
            vm.refresh().await;

            let state = vm.state();
            match &state.notification {
                Some(n) if n.is_error() => report(n),
                _ => {
                    let jobs = state.visible_jobs();
                    match output {
                        OutputFormat::Table => {
                            println!("{}", render::jobs_table(&jobs));
                            println!(
                                "{}",
                                render::page_footer(
                                    state.page,
                                    state.page_size,
                                    state.total_elements(),
                                    state.total_pages(),
                                    "jobs"
                                )
                            );
                        }
                        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&jobs)?),
                        OutputFormat::Csv => render::jobs_csv(std::io::stdout(), &jobs)?,
                    }
                    true
                }
            }
        }
        Commands::Get { id } => match load_job(directory.as_ref(), id).await {
            JobDetail::Found(job) => {
                print!("{}", render::job_detail(&job));
                true
            }
            JobDetail::NotFound => {
                println!("Job not found.");
                false
            }
            JobDetail::Failed(n) => report(&n),
        },
        Commands::Create {
            name,
            group,
            cron,
            url,
            method,
            headers,
            body,
            parameters,
            inactive,
        } => {
            let mut form = JobForm::new();
            form.set("jobName", &name)?;
            form.set("jobGroup", &group)?;
            form.set("cronExpression", &cron)?;
            form.set("url", &url)?;
            form.set("method", &method)?;
            form.set("headers", &headers)?;
            form.set("requestBody", &body)?;
            form.set("parameters", parameters.as_deref().unwrap_or(""))?;
            form.active = !inactive;

            match form.submit() {
                Err(errors) => {
                    for (field, message) in errors {
                        eprintln!("{}: {}", field, message);
                    }
                    false
                }
                Ok(draft) => {
                    let mut vm = JobListViewModel::new(directory, config.paging.page_size);
                    match vm.create_job(&draft).await {
                        Ok(created) => {
                            let ok = vm.state().notification.as_ref().map(report).unwrap_or(true);
                            if let Some(job) = created.job() {
                                print!("{}", render::job_detail(job));
                            }
                            ok
                        }
                        Err(CreateJobError::Invalid(errors)) => {
                            for (field, message) in errors {
                                eprintln!("{}: {}", field, message);
                            }
                            false
                        }
                        Err(CreateJobError::Directory(e)) => {
                            log::debug!("Create failed: {}", e);
                            vm.state().notification.as_ref().map(report).unwrap_or(false)
                        }
                    }
                }
            }
        }
        Commands::Delete { id, list, yes } => {
            let question = format!("Delete job {}? This action cannot be undone. [y/N] ", id);
            let stdin = std::io::stdin();
            if !yes && !prompt::confirm(stdin.lock(), std::io::stderr(), &question)? {
                println!("Cancelled.");
                return Ok(());
            }

            let mut vm = JobListViewModel::new(directory, config.paging.page_size);
            if list {
                vm.refresh().await;
            }
            let result = vm.delete_job(id).await;
            if let Err(e) = &result {
                log::debug!("Delete failed: {}", e);
            }
            let ok = vm.state().notification.as_ref().map(report).unwrap_or(false);
            if list {
                let state = vm.state();
                println!("{}", render::jobs_table(&state.visible_jobs()));
                println!(
                    "{}",
                    render::page_footer(
                        state.page,
                        state.page_size,
                        state.total_elements(),
                        state.total_pages(),
                        "jobs"
                    )
                );
            }
            ok
        }
        Commands::History { id, page, size, output } => {
            let mut vm = JobHistoryViewModel::new(directory, id, page_size(&config, size));
            vm.set_page(page).await;

            let state = vm.state();
            if let Some(error) = &state.error {
                eprintln!("Error: {}", error);
                false
            } else {
                match output {
                    OutputFormat::Table => {
                        println!("{}", render::history_table(&state.records.content));
                        println!(
                            "{}",
                            render::page_footer(
                                state.page,
                                state.page_size,
                                state.records.total_elements,
                                state.records.total_pages,
                                "executions"
                            )
                        );
                    }
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&state.records.content)?)
                    }
                    OutputFormat::Csv => {
                        render::history_csv(std::io::stdout(), &state.records.content)?
                    }
                }
                true
            }
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
