//! xlate - terminal client for the document translation service
//!
//! Without a subcommand the interactive TUI starts; subcommands run a single action
//! and print the outcome.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xlate::{
    api::{HttpApi, TranslatorApi},
    config::AppConfig,
    controller::{Controller, Page, StatusKind, Tab},
    i18n::{init_locale, init_locale_with, t, Locale, Text},
    log_error, log_info, logging,
    storage::{FileStore, PreferenceStore},
    ui::{App, Theme},
};

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// List the models the service can reach
    Models,
    /// Print one page of the translation history
    History {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Upload an Excel file for translation
    Upload {
        /// File to translate
        path: PathBuf,
        /// Save the translated file into the download directory afterwards
        #[arg(long)]
        download: bool,
    },
    /// Save the API configuration locally and on the service
    SaveConfig {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        prompt: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "xlate")]
#[command(version)]
#[command(about = "Terminal client for the document translation service", long_about = None)]
struct Args {
    /// Configuration file path (overrides defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Translation service URL
    #[arg(long)]
    server_url: Option<String>,

    /// Rows per history page
    #[arg(long)]
    page_size: Option<u32>,

    /// Tab to open with: upload, config, history or feedback
    #[arg(long, default_value = "upload")]
    tab: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Use the light color theme
    #[arg(long)]
    light: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app_config = AppConfig::load(args.config.as_deref())?;
    if let Some(url) = args.server_url {
        app_config.server_url = url;
    }
    if let Some(size) = args.page_size {
        app_config.page_size = size;
    }
    app_config.validate()?;

    let tui_mode = args.command.is_none();
    init_logging(args.verbose || app_config.debug, tui_mode);

    match app_config.language.as_deref().and_then(Locale::from_code) {
        Some(locale) => init_locale_with(locale),
        None => init_locale(),
    };

    let initial_tab = Tab::from_id(&args.tab)
        .with_context(|| format!("unknown tab {:?}", args.tab))?;

    let api = HttpApi::new(
        &app_config.server_url,
        Duration::from_secs(app_config.request_timeout_secs),
    )?;
    let store = FileStore::open(FileStore::default_path())
        .with_context(|| format!("opening {}", FileStore::default_path().display()))?;

    tracing::info!("Using translation service at {}", app_config.server_url);

    let controller = Controller::new(api, store, app_config.page_size)
        .with_download_dir(app_config.download_dir())
        .with_initial_tab(initial_tab);
    controller.hydrate();

    match args.command {
        Some(cmd) => run_command(&controller, cmd).await,
        None => {
            let theme = if args.light { Theme::light() } else { Theme::dark() };
            run_tui(controller, theme).await
        }
    }
}

/// TUI sessions log to file so the screen stays clean; one-shot commands log to stderr.
fn init_logging(verbose: bool, tui_mode: bool) {
    if tui_mode {
        if let Err(e) = logging::init_logger() {
            eprintln!("Could not open log file: {}", e);
        }
        logging::set_debug_mode(verbose);
        return;
    }

    let filter = if verbose {
        "xlate=debug,info"
    } else {
        "xlate=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn run_tui(controller: Controller<HttpApi, FileStore>, theme: Theme) -> anyhow::Result<()> {
    log_info!("Log file: {}", logging::get_log_path_display());
    let mut app = App::new(Arc::new(controller))?.with_theme(theme);
    if let Err(e) = app.run().await {
        log_error!("TUI error: {}", e);
        return Err(e.into());
    }
    Ok(())
}

async fn run_command<A, S>(controller: &Controller<A, S>, cmd: Command) -> anyhow::Result<()>
where
    A: TranslatorApi,
    S: PreferenceStore,
{
    match cmd {
        Command::Models => {
            controller.refresh_models().await;
            let page = controller.snapshot();
            print_models(&page);
            finish(&page)
        }
        Command::History { page } => {
            controller.load_page(page).await;
            let page = controller.snapshot();
            if let Some(message) = page.history.error() {
                anyhow::bail!("{}", message);
            }
            print_history(&page);
            Ok(())
        }
        Command::Upload { path, download } => {
            controller.update_page(|page| page.form.file_path = path.display().to_string());
            controller.upload().await;
            let page = controller.snapshot();
            finish(&page)?;
            if download {
                controller.download_result().await;
                finish(&controller.snapshot())?;
            }
            Ok(())
        }
        Command::SaveConfig {
            url,
            key,
            prompt,
            model,
        } => {
            controller.update_page(|page| {
                if let Some(url) = url {
                    page.form.api_url = url;
                }
                if let Some(key) = key {
                    page.form.api_key = key;
                }
                if let Some(prompt) = prompt {
                    page.form.prompt = prompt;
                }
                if let Some(model) = model {
                    if !page.models.select_value(&model) {
                        page.models.push_selected(xlate::controller::ModelOption {
                            label: model.clone(),
                            value: model,
                        });
                    }
                }
            });
            controller.save_config().await;
            finish(&controller.snapshot())
        }
    }
}

/// Print the status line; an error status becomes the process error.
fn finish(page: &Page) -> anyhow::Result<()> {
    let Some(status) = &page.status else {
        return Ok(());
    };

    if status.kind == StatusKind::Error {
        anyhow::bail!("{}", status.text);
    }

    println!("{}", status.text);
    if let Some(link) = &status.link {
        println!("  {}: {}", link.label, link.href);
    }
    Ok(())
}

fn print_models(page: &Page) {
    for (i, option) in page.models.options().iter().enumerate().skip(1) {
        let marker = if i == page.models.selected_index() { "*" } else { " " };
        println!("{} {:<24} {}", marker, option.label, option.value);
    }
}

fn print_history(page: &Page) {
    if let Some(placeholder) = page.history.placeholder() {
        println!("{}", placeholder);
        return;
    }

    println!(
        "{:>6}  {:<24} {:<32} {:<32} {:<19} {:<16} {}",
        t(Text::ColId),
        t(Text::ColFileName),
        t(Text::ColOriginal),
        t(Text::ColTranslated),
        t(Text::ColTime),
        t(Text::ColModel),
        t(Text::ColStatus)
    );
    for row in page.history.rows() {
        println!(
            "{:>6}  {:<24} {:<32} {:<32} {:<19} {:<16} {}",
            row.id,
            row.file_name,
            row.original.display,
            row.translated.display,
            row.time,
            row.model,
            row.status_label
        );
    }
    println!(
        "{} / {}",
        xlate::i18n::tf(Text::PageIndicator, page.pager_view.current_label),
        page.pager_view.total_label
    );
}
