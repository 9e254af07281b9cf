use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{Config, Environment, File};
use trapscan_core::{
    Event, FileThemeStore, HttpAnalysisClient, OutputFormat, Settings, ThemeController,
    ThemePreference, Transition, UploadController, UploadedFile,
};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::TerminalSurface;

#[derive(Parser, Debug)]
#[command(
    name = "trapscan",
    author,
    version,
    about = "Check PDF and DOCX files for hidden text aimed at AI readers"
)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(
        long,
        value_name = "FILE",
        default_value = "trapscan.toml",
        global = true
    )]
    config: PathBuf,

    /// Host this client runs against (localhost selects the development server)
    #[arg(long, value_name = "URL", global = true)]
    origin: Option<String>,

    /// Analysis endpoint used for non-local origins
    #[arg(long = "production-url", value_name = "URL", global = true)]
    production_url: Option<String>,

    /// Where the theme preference is stored
    #[arg(long = "theme-file", value_name = "PATH", global = true)]
    theme_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a file for analysis and print the findings
    Scan {
        /// PDF or DOCX file to analyze
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = FormatArg::Human)]
        format: FormatArg,
        /// Open every findings section, including empty ones
        #[arg(long)]
        expand_all: bool,
        /// Disable coloured terminal output
        #[arg(long)]
        no_color: bool,
    },
    /// Show or change the light/dark preference
    Theme {
        #[arg(value_enum)]
        preference: Option<ThemeArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Human,
    Json,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Human => OutputFormat::Human,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemePreference {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => ThemePreference::Light,
            ThemeArg::Dark => ThemePreference::Dark,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    match cli.command {
        Commands::Scan {
            file,
            format,
            expand_all,
            no_color,
        } => scan(&settings, &file, format.into(), expand_all, !no_color).await,
        Commands::Theme { preference } => theme(&settings, preference.map(Into::into)),
    }
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings: Settings = Config::builder()
        .add_source(File::from(cli.config.as_path()).required(false))
        .add_source(Environment::with_prefix("TRAPSCAN"))
        .build()
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?
        .try_deserialize()
        .context("invalid configuration")?;

    if let Some(origin) = &cli.origin {
        settings.origin = origin.clone();
    }
    if let Some(url) = &cli.production_url {
        settings.production_url = url.clone();
    }
    if let Some(path) = &cli.theme_file {
        settings.theme_file = Some(path.clone());
    }
    Ok(settings)
}

fn theme_controller(settings: &Settings) -> Result<ThemeController<FileThemeStore>> {
    let store = match &settings.theme_file {
        Some(path) => FileThemeStore::new(path),
        None => FileThemeStore::in_config_dir()?,
    };
    Ok(ThemeController::new(store))
}

async fn scan(
    settings: &Settings,
    path: &Path,
    format: OutputFormat,
    expand_all: bool,
    color: bool,
) -> Result<ExitCode> {
    let mut themes = theme_controller(settings)?;
    let theme = themes.load_initial();

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let upload = UploadedFile::new(name.clone(), bytes);

    let endpoint = settings.endpoint()?;
    tracing::debug!(endpoint = %endpoint.url(), "analysis endpoint selected");
    let client = HttpAnalysisClient::new(endpoint)?;

    let surface = TerminalSurface::new(format, theme, color, expand_all, name);
    let mut controller = UploadController::new(surface);
    let exit = match controller.run(upload, &client).await {
        Transition::Displayed => ExitCode::SUCCESS,
        Transition::TransportFailed => {
            controller.dispatch(Event::Acknowledge);
            ExitCode::FAILURE
        }
        _ => ExitCode::FAILURE,
    };
    Ok(exit)
}

fn theme(settings: &Settings, preference: Option<ThemePreference>) -> Result<ExitCode> {
    let mut themes = theme_controller(settings)?;
    match preference {
        Some(preference) => {
            themes
                .set_theme(preference)
                .context("failed to save theme preference")?;
            println!("Theme set to {preference}");
        }
        None => println!("{}", themes.load_initial()),
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
