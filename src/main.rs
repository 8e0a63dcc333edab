use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use plugin_sites::{
    config::Config,
    logging,
    network::{PluginRegistry, PluginsDir, SnapshotNetwork, Switched},
    output::{display_results, DisplayOptions, Field, OutputFormat, SiteFilter},
    platform::find_network_file,
    scanner::{active_on_sites, Outcome},
    PluginSlug,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Exit codes
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "plugin-sites")]
#[command(
    author,
    version,
    about = "List the sites in a multisite network that have a given plugin active"
)]
struct Cli {
    /// Network snapshot to read (JSON or TOML)
    #[arg(long, global = true, env = "PLUGIN_SITES_NETWORK")]
    network: Option<PathBuf>,

    /// Discover installed plugins from this plugins directory
    #[arg(long, global = true)]
    plugins_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all sites in the network that have activated a given plugin
    ActiveOnSites {
        /// The plugin to locate
        plugin_slug: String,

        /// Prints the value of a single field for each site
        #[arg(long)]
        field: Option<String>,

        /// Limit the output to specific fields (comma separated)
        #[arg(long)]
        fields: Option<String>,

        /// Output format (table, csv, ids, json, yaml, count)
        #[arg(long)]
        format: Option<String>,

        /// Maximum number of sites to scan
        #[arg(long)]
        limit: Option<usize>,

        /// Don't show a progress bar
        #[arg(long)]
        no_progress: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Only show sites whose column equals the given value.
#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long = "blog_id", value_name = "ID", help_heading = "Filters")]
    blog_id: Option<String>,
    #[arg(long = "last_updated", value_name = "DATETIME", help_heading = "Filters")]
    last_updated: Option<String>,
    #[arg(long, value_name = "DATETIME", help_heading = "Filters")]
    registered: Option<String>,
    #[arg(long = "site_id", value_name = "ID", help_heading = "Filters")]
    site_id: Option<String>,
    #[arg(long, help_heading = "Filters")]
    domain: Option<String>,
    #[arg(long, help_heading = "Filters")]
    path: Option<String>,
    #[arg(long, value_name = "0|1", help_heading = "Filters")]
    public: Option<String>,
    #[arg(long, value_name = "0|1", help_heading = "Filters")]
    archived: Option<String>,
    #[arg(long, value_name = "0|1", help_heading = "Filters")]
    mature: Option<String>,
    #[arg(long, value_name = "0|1", help_heading = "Filters")]
    spam: Option<String>,
    #[arg(long, value_name = "0|1", help_heading = "Filters")]
    deleted: Option<String>,
    #[arg(long = "lang_id", value_name = "ID", help_heading = "Filters")]
    lang_id: Option<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> SiteFilter {
        let conditions = [
            (Field::BlogId, &self.blog_id),
            (Field::LastUpdated, &self.last_updated),
            (Field::Registered, &self.registered),
            (Field::SiteId, &self.site_id),
            (Field::Domain, &self.domain),
            (Field::Path, &self.path),
            (Field::Public, &self.public),
            (Field::Archived, &self.archived),
            (Field::Mature, &self.mature),
            (Field::Spam, &self.spam),
            (Field::Deleted, &self.deleted),
            (Field::LangId, &self.lang_id),
        ];

        conditions
            .into_iter()
            .filter_map(|(field, value)| value.as_ref().map(|v| (field, v)))
            .fold(SiteFilter::new(), |filter, (field, value)| {
                filter.with(field, value.as_str())
            })
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring unreadable config file: {}", e);
            Config::default()
        }
    };

    logging::init(cli.verbose, &config.log_level);

    match cli.command {
        Commands::ActiveOnSites {
            plugin_slug,
            field,
            fields,
            format,
            limit,
            no_progress,
            filters,
        } => {
            let display = build_display_options(&config, field, fields, format, &filters)?;
            let limit = config.scan_limit(limit)?;
            let target = PluginSlug::from_arg(&plugin_slug);

            run_active_on_sites(
                &target,
                &display,
                cli.network.or_else(|| config.network.clone()),
                cli.plugins_dir.or_else(|| config.plugins_dir.clone()),
                limit,
                config.show_progress && !no_progress,
            )
        }
        Commands::Config { init, path } => {
            let config = Config {
                network: cli.network.or(config.network),
                plugins_dir: cli.plugins_dir.or(config.plugins_dir),
                ..config
            };
            handle_config(&config, init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Validates every output option before any site is read.
fn build_display_options(
    config: &Config,
    field: Option<String>,
    fields: Option<String>,
    format: Option<String>,
    filters: &FilterArgs,
) -> Result<DisplayOptions> {
    let mut display = config
        .display_defaults()
        .context("Invalid output defaults in config file")?;

    if let Some(format) = format {
        display.format = format.parse()?;
    }
    if let Some(fields) = fields {
        display.fields = Field::parse_list(&fields)?;
    }
    if let Some(field) = field {
        display.field = Some(field.parse()?);
    }
    display.filter = filters.to_filter();

    Ok(display)
}

fn run_active_on_sites(
    target: &PluginSlug,
    display: &DisplayOptions,
    network_path: Option<PathBuf>,
    plugins_dir: Option<PathBuf>,
    limit: usize,
    show_progress: bool,
) -> Result<u8> {
    let network_path = match network_path {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir()?;
            find_network_file(&cwd).ok_or_else(|| {
                anyhow::anyhow!(
                    "No network snapshot found. Pass --network or create network.toml in the current directory."
                )
            })?
        }
    };

    let network = Switched::new(SnapshotNetwork::load(&network_path)?);
    let plugins_dir = plugins_dir.map(PluginsDir::new);
    let registry: &dyn PluginRegistry = match &plugins_dir {
        Some(dir) => dir,
        None => &network,
    };

    let is_interactive = display.format == OutputFormat::Table
        && show_progress
        && std::io::stderr().is_terminal();
    let progress = if is_interactive {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let outcome = active_on_sites(
        target,
        &network,
        registry,
        &network,
        limit,
        progress.as_ref(),
    );

    // Leave no half-drawn bar behind when preflight fails.
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    match outcome? {
        Outcome::NetworkActivated => {
            eprintln!("Warning: {} is network-activated.", target);
        }
        Outcome::Matches(found) => {
            display_results(target, &found, display)?;
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn handle_config(config: &Config, init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        Config::default().save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        println!("Config file: {}", config_path.display());
    } else {
        println!("Config file: {} (not created, using defaults)", config_path.display());
    }
    println!();

    let network = match &config.network {
        Some(path) => path.display().to_string(),
        None => std::env::current_dir()
            .ok()
            .and_then(|cwd| find_network_file(&cwd))
            .map(|path| format!("{} (found in working directory)", path.display()))
            .unwrap_or_else(|| "none (pass --network)".to_string()),
    };
    let plugins_dir = config
        .plugins_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "none (snapshot's installed_plugins)".to_string());

    println!("Network snapshot: {}", network);
    println!("Installed plugins from: {}", plugins_dir);
    println!("Default format: {}", config.default_format);
    println!("Default fields: {}", config.default_fields.join(","));
    println!("Site limit: {}", config.site_limit);
    println!("Progress bar: {}", if config.show_progress { "on" } else { "off" });
    println!("Log level: {}", config.log_level);

    Ok(())
}
