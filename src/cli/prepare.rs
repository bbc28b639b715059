use anyhow::Context;
use clap::Args;

use crate::catalog::index::CogFinder;
use crate::catalog::layout::{ReferenceData, ReferenceLayout};
use crate::parsing::fasta::read_reference_ids;
use crate::search::blastp::{make_database, INDEX_TITLE};
use crate::utils::format::percentage;

#[derive(Args)]
pub struct PrepareArgs {
    /// Rebuild the search index even if it already exists
    #[arg(long)]
    pub force: bool,

    /// Report how many reference FASTA headers resolve to a COG
    #[arg(long)]
    pub check: bool,
}

/// Execute prepare subcommand
///
/// # Errors
///
/// Returns an error if the reference FASTA cannot be decompressed or the
/// search index cannot be built.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PrepareArgs, layout: ReferenceLayout, verbose: bool) -> anyhow::Result<()> {
    if !layout.fasta().exists() && !layout.fasta_gz().exists() {
        anyhow::bail!(
            "Neither {} nor {} found. Download them from the NCBI COG site first.",
            layout.fasta().display(),
            layout.fasta_gz().display()
        );
    }

    if layout
        .decompress_fasta()
        .with_context(|| format!("Failed to decompress {}", layout.fasta_gz().display()))?
    {
        println!("Decompressed {}", layout.fasta().display());
    }

    if layout.search_index_exists() && !args.force {
        println!("Search index already present (use --force to rebuild)");
    } else {
        make_database(&layout.fasta(), &layout.search_index(), INDEX_TITLE)?;
        println!("Search index created: {}", layout.search_index().display());
    }

    for path in layout.missing_files() {
        eprintln!("Warning: {} is still missing", path.display());
    }

    if args.check {
        check_header_coverage(layout, verbose)?;
    }
    Ok(())
}

fn check_header_coverage(layout: ReferenceLayout, verbose: bool) -> anyhow::Result<()> {
    let ids = read_reference_ids(&layout.fasta())?;
    let data = ReferenceData::new(layout);
    let store = data.load()?;

    let finder = CogFinder::new(&store);
    let resolved = finder.resolvable_count(ids.iter().map(String::as_str));
    println!(
        "Reference headers resolving to a COG: {resolved} of {} ({:.1}%)",
        ids.len(),
        percentage(resolved, ids.len())
    );

    if verbose {
        let unresolved: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| store.lookup_by_protein_id(id).is_none())
            .take(10)
            .collect();
        if !unresolved.is_empty() {
            eprintln!("First unresolved ids: {}", unresolved.join(", "));
        }
    }
    Ok(())
}
