use std::{path::PathBuf, time::Duration};

use asset_tree::{AssetSource, Config, LoadOutcome, Session, SessionError, Tree};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::instrument;

use super::{FilterArgs, render, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Print a company's asset tree")]
pub struct Show {
    /// Company id or name
    company: String,

    #[command(flatten)]
    filters: FilterArgs,

    /// Number of asset pages to load (0 = all)
    #[arg(long, default_value_t = 0)]
    pages: usize,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let source = super::open_source(&root);
        let company = super::resolve_company(&source, &self.company)?;

        let mut session = Session::new(Config::load_or_default(&root));
        session.select_company(&source, company.id.clone())?;
        load_pages(&mut session, &source, self.pages)?;

        session.set_filters(self.filters.to_filters());
        let visible = session.visible();

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&visible)?),
            OutputFormat::Pretty => {
                println!("{}", company.name.info());
                render::print_tree(&visible);
                println!();
                println!("{}", summary(&session).dim());
            }
        }

        Ok(())
    }
}

/// Loads up to `limit` pages, or every page if `limit` is zero.
pub fn load_pages<S>(session: &mut Session, source: &S, limit: usize) -> Result<(), SessionError>
where
    S: AssetSource + ?Sized,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut loaded = 0;
    while limit == 0 || loaded < limit {
        spinner.set_message(format!("loading page {}", session.pages_loaded() + 1));
        match session.load_more(source) {
            Ok(LoadOutcome::Merged { .. }) => loaded += 1,
            Ok(LoadOutcome::Exhausted | LoadOutcome::Busy | LoadOutcome::Stale) => break,
            Err(error) => {
                spinner.finish_and_clear();
                return Err(error);
            }
        }
    }

    spinner.finish_and_clear();
    Ok(())
}

fn summary(session: &Session) -> String {
    let tree: &Tree = session.tree();
    let counts = tree.counts();
    let more = if session.is_exhausted() {
        ""
    } else {
        " (more available)"
    };
    format!(
        "{} locations, {} assets, {} components from {} page(s){more}",
        counts.locations,
        counts.assets,
        counts.components,
        session.pages_loaded()
    )
}
