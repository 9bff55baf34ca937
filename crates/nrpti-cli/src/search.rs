//! # Search CLI: Render a search request.
//!
//! Builds the request document the search backend receives, including the
//! project inclusion/exclusion clause:
//!
//! ```bash
//! nrpti search --projects lngCanada,otherProjects --record-type Order
//! nrpti search --flavour NRCED --keywords sediment --page-size 50
//! ```

use anyhow::Result;
use clap::Args;

use nrpti_core::FlavourKind;
use nrpti_search::{build_filter, ProjectSelector, SearchQuery};

/// Search subcommand arguments.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Comma-separated project selectors: `lngCanada`, `coastalGaslink`,
    /// `otherProjects`.
    #[arg(long)]
    pub projects: Option<String>,

    #[arg(long)]
    pub keywords: Option<String>,

    /// Restrict to record types, comma-separated. Repeatable.
    #[arg(long = "record-type")]
    pub record_types: Vec<String>,

    /// Search a site's flavour documents instead of masters.
    #[arg(long)]
    pub flavour: Option<FlavourKind>,

    #[arg(long, default_value_t = 0)]
    pub page_num: u32,

    #[arg(long, default_value_t = nrpti_search::query::DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    #[arg(long)]
    pub sort_by: Option<String>,
}

/// The query described by `args`.
pub fn build_query(args: &SearchArgs) -> Result<SearchQuery> {
    let selected = match &args.projects {
        Some(raw) => ProjectSelector::parse_list(raw)?,
        None => Default::default(),
    };
    let record_types = SearchQuery::parse_record_types(&args.record_types.join(","))?;
    let mut query = SearchQuery::new()
        .with_projects(build_filter(selected))
        .with_record_types(record_types)
        .with_page(args.page_num, args.page_size);
    if let Some(keywords) = &args.keywords {
        query = query.with_keywords(keywords.clone());
    }
    if let Some(flavour) = args.flavour {
        query = query.with_flavour(flavour);
    }
    if let Some(sort_by) = &args.sort_by {
        query = query.with_sort(sort_by.clone());
    }
    Ok(query)
}

/// Execute the search subcommand.
pub fn run_search(args: &SearchArgs) -> Result<u8> {
    let query = build_query(args)?;
    let document = query.to_document()?;
    tracing::debug!(schemas = ?query.schema_names(), "rendered search request");
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(0)
}
