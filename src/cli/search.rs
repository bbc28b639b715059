use clap::Args;

use crate::catalog::index::CogFinder;
use crate::catalog::layout::{ReferenceData, ReferenceLayout};
use crate::core::types::SearchField;

#[derive(Args)]
pub struct SearchArgs {
    /// Text to search for (case-insensitive)
    #[arg(required = true)]
    pub query: String,

    /// Field to search
    #[arg(long, value_enum, default_value = "description")]
    pub field: SearchField,

    /// Output matches as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute search subcommand
///
/// # Errors
///
/// Returns an error if the reference tables cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SearchArgs, layout: ReferenceLayout, verbose: bool) -> anyhow::Result<()> {
    let data = ReferenceData::new(layout);
    let store = data.load()?;
    let matches = CogFinder::new(&store).search(&args.query, args.field);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        eprintln!("No COGs match '{}'", args.query);
        return Ok(());
    }

    println!("{:<10} {:<4} {:<40} Description", "COG ID", "Cat", "Category");
    for definition in &matches {
        println!(
            "{:<10} {:<4} {:<40} {}",
            definition.cog_id,
            definition.category_code,
            definition.category_name,
            definition.description
        );
    }
    if verbose {
        eprintln!("{} matches", matches.len());
    }
    Ok(())
}
