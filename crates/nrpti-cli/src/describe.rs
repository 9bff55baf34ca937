//! # Describe CLI: Legislation description lookup.
//!
//! ```bash
//! nrpti describe Order "Water Act" --section 47
//! nrpti describe Ticket WFA --regulation "Wildfire Regulation" --section 9 --codes
//! ```
//!
//! Prints the description and exits 0, or exits 1 when the reference table
//! has no entry for the citation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use nrpti_core::{LegislationCitation, RecordType};
use nrpti_legislation::{ActCodeMap, LegislationResolver, VerbatimActs};
use nrpti_publish::PublishConfig;

/// Describe subcommand arguments.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Record type, e.g. `Order` or `Inspection`.
    pub record_type: RecordType,

    /// Act name as cited.
    pub act: String,

    #[arg(long)]
    pub regulation: Option<String>,

    #[arg(long)]
    pub section: Option<String>,

    #[arg(long)]
    pub sub_section: Option<String>,

    #[arg(long)]
    pub paragraph: Option<String>,

    /// Treat `act` as a short act code (e.g. `EMA`) where one matches.
    #[arg(long)]
    pub codes: bool,

    /// Reference table to use instead of the configured one.
    #[arg(long)]
    pub table: Option<PathBuf>,
}

impl DescribeArgs {
    pub fn citation(&self) -> LegislationCitation {
        let mut citation = LegislationCitation::new(self.act.clone());
        citation.regulation = self.regulation.clone();
        citation.section = self.section.clone();
        citation.sub_section = self.sub_section.clone();
        citation.paragraph = self.paragraph.clone();
        citation
    }
}

/// Resolve the citation; `None` when the table has no entry.
pub fn lookup(args: &DescribeArgs, config: &PublishConfig) -> Result<Option<String>> {
    let table = args
        .table
        .as_deref()
        .or(config.legislation_table.as_deref());
    let resolver = LegislationResolver::load(table)?;
    let citation = args.citation();
    let description = if args.codes {
        resolver.describe_with(args.record_type, &citation, &ActCodeMap::standard())
    } else {
        resolver.describe_with(args.record_type, &citation, &VerbatimActs)
    };
    Ok(description)
}

/// Execute the describe subcommand.
pub fn run_describe(args: &DescribeArgs, config: &PublishConfig) -> Result<u8> {
    match lookup(args, config)? {
        Some(description) => {
            println!("{description}");
            Ok(0)
        }
        None => {
            eprintln!(
                "no description for {} under {}",
                args.citation(),
                args.record_type
            );
            Ok(1)
        }
    }
}
