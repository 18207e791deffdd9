use std::io::IsTerminal;
use std::time::Duration;

use clap::{error::ErrorKind, Parser};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::output::{self, OutputFormat, PageReport};
use crate::pagination::PageToken;
use crate::prober;
use crate::runner::{self, ContentSource, Runner};
use crate::view::{self, ErrorMode, PageController};

pub const DEFAULT_ROUTE: &str = "/recipes";

fn print_banner() {
    println!();
    println!(
        "{}",
        format!("  recipe-feed v{}", env!("CARGO_PKG_VERSION")).bold()
    );
    println!("  Postman Oil recipe listing");
    println!();
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn format_prefixes(prefixes: &[String]) -> String {
    prefixes
        .iter()
        .map(|p| if p.is_empty() { "/" } else { p.as_str() })
        .collect::<Vec<_>>()
        .join(", ")
}

fn error_mode_label(mode: ErrorMode) -> &'static str {
    match mode {
        ErrorMode::Fallback => "fallback",
        ErrorMode::Surface => "surface",
    }
}

fn default_log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init_tracing(verbose: u8, no_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(verbose > 1)
        .try_init();
}

#[derive(Clone, Debug)]
struct RunConfig {
    site_url: String,
    prefixes: Vec<String>,
    route: String,
    page: u32,
    timeout: usize,
    proxy: Option<String>,
    header: Option<String>,
    output: Option<String>,
    output_format: OutputFormat,
    error_mode: ErrorMode,
    no_color: bool,
    verbose: u8,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let site_url = args
        .site
        .or(cfg.site_url)
        .unwrap_or_else(|| runner::DEFAULT_SITE_URL.to_string())
        .trim()
        .to_string();
    reqwest::Url::parse(&site_url).map_err(|e| format!("invalid site URL '{site_url}': {e}"))?;

    let prefixes = if !args.prefix.is_empty() {
        args.prefix
    } else {
        cfg.api_prefixes.unwrap_or_else(|| {
            prober::DEFAULT_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect()
        })
    };
    if prefixes.is_empty() {
        return Err("at least one API prefix is required".to_string());
    }

    let route = args
        .route
        .or(cfg.route)
        .unwrap_or_else(|| DEFAULT_ROUTE.to_string());
    let page = args.page.unwrap_or_else(|| view::page_from_route(&route));

    let timeout = args
        .timeout
        .or(cfg.timeout)
        .unwrap_or(runner::DEFAULT_TIMEOUT_SECONDS);
    if timeout == 0 {
        return Err("invalid timeout, expected positive number of seconds".to_string());
    }

    let proxy = args.proxy.or(cfg.proxy).filter(|p| !p.trim().is_empty());
    let header = args.header.or(cfg.header).filter(|h| !h.trim().is_empty());
    if let Some(raw) = header.as_deref() {
        runner::parse_header(raw).map_err(|e| e.to_string())?;
    }

    let output = args.output.or(cfg.output).filter(|o| !o.trim().is_empty());
    let output_format = match args.output_format.or(cfg.output_format) {
        Some(raw) => OutputFormat::parse(&raw)
            .ok_or_else(|| format!("invalid output format '{raw}', expected text, json or html"))?,
        None => output
            .as_deref()
            .and_then(output::infer_format_from_path)
            .unwrap_or(OutputFormat::Text),
    };

    let error_mode = match args.error_mode.or(cfg.error_mode) {
        Some(raw) => ErrorMode::parse(&raw)
            .ok_or_else(|| format!("invalid error mode '{raw}', expected fallback or surface"))?,
        None => ErrorMode::default(),
    };

    Ok(RunConfig {
        site_url,
        prefixes,
        route,
        page,
        timeout,
        proxy,
        header,
        output,
        output_format,
        error_mode,
        no_color,
        verbose: args.verbose,
    })
}

fn print_report(report: &PageReport) {
    match report.source.as_ref() {
        Some(ContentSource::Live { endpoint }) => format_kv_line("Source", endpoint),
        Some(ContentSource::Fallback { reason }) => format_kv_line(
            "Source",
            &format!("{} ({reason})", "placeholder recipes".yellow()),
        ),
        None => {}
    }
    format_kv_line(
        "Posts",
        &format!(
            "{} of {} :: page {}/{}",
            report.posts.len(),
            report.total_posts,
            report.current_page,
            report.total_pages
        ),
    );
    println!();

    for p in report.posts.iter() {
        println!("{} {}", "::".bold().white(), p.title.bold().purple());
        println!(
            "   {} · {} · {} · {}",
            p.date,
            p.author,
            p.categories.join(", ").cyan(),
            p.read_time.yellow()
        );
        println!("   {}", p.excerpt);
        println!("   {}", p.original_url.dimmed());
        println!();
    }

    let controls = &report.pagination;
    let mut parts: Vec<String> = Vec::new();
    let prev = if controls.prev_disabled {
        "« prev".dimmed().to_string()
    } else {
        "« prev".to_string()
    };
    parts.push(prev);
    for token in controls.tokens.iter() {
        match token {
            PageToken::Page(_) if controls.is_current(*token) => {
                parts.push(format!("[{token}]").bold().green().to_string())
            }
            _ => parts.push(token.to_string()),
        }
    }
    let next = if controls.next_disabled {
        "next »".dimmed().to_string()
    } else {
        "next »".to_string()
    };
    parts.push(next);
    println!("   {}", parts.join(" "));
}

async fn prompt_retry() -> bool {
    if !std::io::stdin().is_terminal() {
        return false;
    }
    print!("{} ", "Try Again? [y/N]".bold());
    let _ = std::io::Write::flush(&mut std::io::stdout());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match lines.next_line().await {
        Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

fn build_spinner() -> Result<ProgressBar, String> {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_style(
        ProgressStyle::with_template(":: {spinner} {msg} :: [{elapsed_precise}]")
            .map_err(|e| format!("failed to build progress bar style: {e}"))?,
    );
    Ok(pb)
}

async fn run_async(run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    print_banner();
    format_kv_line("Site", &run.site_url);
    format_kv_line("Prefixes", &format_prefixes(&run.prefixes));
    format_kv_line("Page", &run.page.to_string());
    format_kv_line("On failure", error_mode_label(run.error_mode));
    format_kv_line("Timeout", &format!("{}s", run.timeout));
    println!();

    let runner = Runner::new(runner::Options {
        site_url: run.site_url.clone(),
        prefixes: run.prefixes.clone(),
        timeout_seconds: run.timeout,
        proxy: run.proxy.clone(),
        header: run.header.clone(),
    })
    .map_err(|e| e.to_string())?;

    let now = Instant::now();
    let mut controller = PageController::new(run.error_mode);

    let pb = build_spinner()?;
    pb.set_message(format!("fetching page {}", run.page));
    controller.load(&runner, run.page).await;
    pb.finish_and_clear();

    while controller.state().error.is_some() {
        let report = output::build_report(controller.state(), &run.route);
        if run.output.is_none() {
            print!("{}", String::from_utf8_lossy(&output::render_text(&report)).red());
        }
        if !prompt_retry().await {
            break;
        }
        let pb = build_spinner()?;
        pb.set_message(format!("retrying page {}", controller.state().current_page));
        controller.retry_load(&runner).await;
        pb.finish_and_clear();
    }

    let report = output::build_report(controller.state(), &run.route);
    match run.output.as_deref() {
        Some(outfile_path) => {
            let rendered = output::render(run.output_format, &report);
            let mut outfile = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(outfile_path)
                .await
                .map_err(|e| format!("failed to open output file: {e}"))?;
            outfile
                .write_all(&rendered)
                .await
                .map_err(|_| "failed to write output file".to_string())?;
            format_kv_line("Output", outfile_path);
        }
        None if report.error.is_none() => print_report(&report),
        None => {}
    }

    let elapsed_time = now.elapsed();
    println!();
    println!(":: Completed :: fetch took {}ms ::", elapsed_time.as_millis());

    match controller.state().error.as_deref() {
        Some(error) => Err(format!("recipe feed unavailable: {error}")),
        None => Ok(()),
    }
}

fn init_config(args: &CliArgs) -> Result<(), String> {
    let path = match args.config.as_deref() {
        Some(p) => config::expand_tilde(p),
        None => config::default_config_path()
            .ok_or_else(|| "could not determine home directory".to_string())?,
    };
    if config::ensure_default_config_file(&path)? {
        println!(":: Wrote config :: {}", path.display());
    } else {
        println!(":: Config exists :: {}", path.display());
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    if args.init_config {
        return init_config(&args);
    }

    let cfg = match args.config.as_deref() {
        Some(path) => config::load_config(&config::expand_tilde(path), false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    init_tracing(run.verbose, run.no_color);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(run_async(run))
}
