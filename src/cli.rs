use std::path::{Path, PathBuf};

mod browse;
mod companies;
mod config;
mod render;
mod show;
mod terminal;

use anyhow::Context;
use asset_tree::{AssetSource, Company, Filters, JsonDirectory};
use browse::Browse;
use clap::ArgAction;
use companies::Companies;
use show::Show;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the data directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Companies(Companies::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List companies (default)
    Companies(Companies),

    /// Print a company's asset tree
    ///
    /// Locations are always loaded in full; assets are loaded page by page.
    Show(Show),

    /// Interactively pick a company, search and filter its tree
    Browse(Browse),

    /// Show or modify configuration settings
    Config(config::Command),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Companies(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Browse(command) => command.run(root)?,
            Self::Config(command) => command.run(&root)?,
        }
        Ok(())
    }
}

/// Filter flags shared by the commands that display a tree.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// Case-insensitive substring match against node names
    #[arg(long, short)]
    search: Option<String>,

    /// Only show energy sensors and the path to them
    #[arg(long)]
    energy: bool,

    /// Only show nodes with critical status and the path to them
    #[arg(long)]
    critical: bool,
}

impl FilterArgs {
    fn to_filters(&self) -> Filters {
        Filters::none()
            .with_text(self.search.as_deref().unwrap_or_default())
            .with_energy_sensor(self.energy)
            .with_critical(self.critical)
    }
}

/// Finds a company by id, or by case-insensitive name.
fn resolve_company(source: &JsonDirectory, key: &str) -> anyhow::Result<Company> {
    let companies = source.companies()?;
    find_company(companies, key).with_context(|| format!("company {key} not found"))
}

fn find_company(companies: Vec<Company>, key: &str) -> Option<Company> {
    let lowered = key.to_lowercase();
    let mut by_name = None;
    for company in companies {
        if company.id.as_str() == key {
            return Some(company);
        }
        if by_name.is_none() && company.name.to_lowercase() == lowered {
            by_name = Some(company);
        }
    }
    by_name
}

fn open_source(root: &Path) -> JsonDirectory {
    JsonDirectory::new(root.to_path_buf())
}

#[cfg(test)]
mod tests {
    use asset_tree::RecordId;

    use super::*;

    fn companies() -> Vec<Company> {
        vec![
            Company {
                id: RecordId::new("a1").unwrap(),
                name: "Apex".to_string(),
            },
            Company {
                id: RecordId::new("t2").unwrap(),
                name: "Tobias".to_string(),
            },
        ]
    }

    #[test]
    fn finds_company_by_id_or_name() {
        assert_eq!(find_company(companies(), "t2").unwrap().name, "Tobias");
        assert_eq!(find_company(companies(), "APEX").unwrap().id.as_str(), "a1");
        assert!(find_company(companies(), "Jaguar").is_none());
    }

    #[test]
    fn filter_args_map_to_filters() {
        let args = FilterArgs {
            search: Some("  Motor ".to_string()),
            energy: true,
            critical: false,
        };
        let filters = args.to_filters();

        assert_eq!(filters.text(), Some("motor"));
        assert!(filters.energy_sensor());
        assert!(!filters.critical());
        assert!(!FilterArgs::default().to_filters().is_active());
    }
}
