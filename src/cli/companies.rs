use std::path::PathBuf;

use asset_tree::AssetSource;
use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser, Default)]
#[command(about = "List the companies in the data directory")]
pub struct Companies {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Companies {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let source = super::open_source(&root);
        let companies = source.companies()?;

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&companies)?);
            }
            OutputFormat::Table if self.quiet => {
                for company in &companies {
                    println!("{}\t{}", company.id, company.name);
                }
            }
            OutputFormat::Table => {
                if companies.is_empty() {
                    println!("No companies found.");
                    return Ok(());
                }
                let width = companies
                    .iter()
                    .map(|company| company.id.len())
                    .max()
                    .unwrap_or_default();
                println!("{}", format!("{:<width$}  NAME", "ID").dim());
                for company in &companies {
                    println!("{:<width$}  {}", company.id.as_str(), company.name.info());
                }
                println!();
                println!(
                    "{}",
                    "Run 'assets show <ID>' to print a company's tree.".dim()
                );
            }
        }

        Ok(())
    }
}
