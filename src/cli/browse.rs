use std::{fmt, path::PathBuf};

use asset_tree::{AssetSource, Company, Config, JsonDirectory, LoadOutcome, Session};
use clap::Parser;
use dialoguer::{Input, Select};
use tracing::instrument;

use super::{FilterArgs, render, show::load_pages, terminal::Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "Interactively pick a company, search and filter its tree")]
pub struct Browse {
    /// Company id or name. Prompts for one if omitted.
    company: Option<String>,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    ToggleEnergy,
    ToggleCritical,
    LoadMore,
    LoadAll,
    ClearFilters,
    SwitchCompany,
    Quit,
}

impl Action {
    const ALL: [Self; 8] = [
        Self::Search,
        Self::ToggleEnergy,
        Self::ToggleCritical,
        Self::LoadMore,
        Self::LoadAll,
        Self::ClearFilters,
        Self::SwitchCompany,
        Self::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Search => "Search by name",
            Self::ToggleEnergy => "Toggle energy sensors",
            Self::ToggleCritical => "Toggle critical status",
            Self::LoadMore => "Load more assets",
            Self::LoadAll => "Load all assets",
            Self::ClearFilters => "Clear filters",
            Self::SwitchCompany => "Choose another company",
            Self::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// What to do after leaving a company's tree.
enum Next {
    ChooseCompany,
    Quit,
}

impl Browse {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let source = super::open_source(&root);
        let mut session = Session::new(Config::load_or_default(&root));

        let mut company = match &self.company {
            Some(key) => Some(super::resolve_company(&source, key)?),
            None => pick_company(&source)?,
        };

        while let Some(current) = company {
            session.select_company(&source, current.id.clone())?;
            session.set_filters(self.filters.to_filters());
            report_load(session.load_more(&source));

            match explore(&mut session, &source, &current)? {
                Next::ChooseCompany => {
                    session.back_to_companies();
                    company = pick_company(&source)?;
                }
                Next::Quit => company = None,
            }
        }

        Ok(())
    }
}

fn pick_company(source: &JsonDirectory) -> anyhow::Result<Option<Company>> {
    let mut companies = source.companies()?;
    if companies.is_empty() {
        println!("No companies found.");
        return Ok(None);
    }

    let names: Vec<String> = companies.iter().map(|c| c.name.clone()).collect();
    let choice = Select::new()
        .with_prompt("Company")
        .items(&names)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|index| companies.swap_remove(index)))
}

fn explore(session: &mut Session, source: &JsonDirectory, company: &Company) -> anyhow::Result<Next> {
    loop {
        println!();
        println!("{}", company.name.info());
        render::print_tree(&session.visible());
        println!("{}", status_line(session).dim());

        let Some(index) = Select::new()
            .with_prompt("Action")
            .items(&Action::ALL)
            .default(0)
            .interact_opt()?
        else {
            return Ok(Next::Quit);
        };

        match Action::ALL[index] {
            Action::Search => {
                let query: String = Input::new()
                    .with_prompt("Name contains (empty to clear)")
                    .allow_empty(true)
                    .interact_text()?;
                session.filters_mut().set_text(query);
            }
            Action::ToggleEnergy => session.filters_mut().toggle_energy_sensor(),
            Action::ToggleCritical => session.filters_mut().toggle_critical(),
            Action::LoadMore => report_load(session.load_more(source)),
            Action::LoadAll => {
                if let Err(error) = load_pages(session, source, 0) {
                    eprintln!("{}", format!("Failed to load assets: {error}").critical());
                }
            }
            Action::ClearFilters => session.set_filters(asset_tree::Filters::none()),
            Action::SwitchCompany => return Ok(Next::ChooseCompany),
            Action::Quit => return Ok(Next::Quit),
        }
    }
}

fn report_load(result: Result<LoadOutcome, asset_tree::SessionError>) {
    match result {
        Ok(LoadOutcome::Merged { report, .. }) if report.skipped() > 0 => {
            println!(
                "{}",
                format!("{} record(s) skipped", report.skipped()).warning()
            );
        }
        Ok(LoadOutcome::Exhausted) => println!("{}", "All assets loaded".dim()),
        Ok(_) => {}
        Err(error) => eprintln!("{}", format!("Failed to load assets: {error}").critical()),
    }
}

fn status_line(session: &Session) -> String {
    let filters = session.filters();
    let active: Vec<String> = filters
        .predicates()
        .iter()
        .map(ToString::to_string)
        .collect();
    let filters = if active.is_empty() {
        "no filters".to_string()
    } else {
        active.join(" and ")
    };
    let pages = if session.is_exhausted() {
        format!("all {} page(s) loaded", session.pages_loaded())
    } else {
        format!("{} page(s) loaded", session.pages_loaded())
    };
    format!("{filters} · {pages}")
}
