use crate::catalog::index::CogFinder;
use crate::catalog::layout::{ReferenceData, ReferenceLayout};
use crate::pipeline::config::SearchConfig;
use crate::search::blastp::check_installation;

fn mark(ok: bool) -> &'static str {
    if ok {
        "yes"
    } else {
        "no"
    }
}

/// Execute info subcommand
///
/// # Errors
///
/// Never fails on missing data or tools; those are reported as status lines.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(layout: ReferenceLayout, verbose: bool) -> anyhow::Result<()> {
    println!("COG Classifier - System Information");
    println!("{}", "=".repeat(40));

    let program = SearchConfig::default().program;
    match check_installation(&program) {
        Ok(version) => {
            println!("BLAST+ installed: yes");
            // "blastp: 2.14.0+"
            let version = version.split_whitespace().nth(1).unwrap_or("Unknown");
            println!("BLAST+ version: {version}");
        }
        Err(e) => {
            println!("BLAST+ installed: no");
            println!("BLAST+ issue: {e}");
        }
    }

    let data = ReferenceData::new(layout);
    let missing = data.layout().missing_files();
    let index_built = data.layout().search_index_exists();
    println!("COG database ready: {}", mark(data.is_ready()));
    println!("Search index built: {}", mark(index_built));
    for path in &missing {
        println!("  missing: {}", path.display());
    }

    let tables_present = [
        data.layout().categories(),
        data.layout().definitions(),
        data.layout().assignments(),
    ]
    .iter()
    .all(|p| p.exists());

    if tables_present {
        match data.load() {
            Ok(store) => {
                let stats = store.statistics();
                println!("COG definitions: {}", stats.total_cogs);
                println!("Protein assignments: {}", stats.total_proteins);
                println!("Functional categories: {}", stats.functional_categories);

                let report = store.load_report();
                if !report.skipped_rows.is_empty() {
                    println!("Skipped malformed rows: {}", report.skipped_rows.len());
                    if verbose {
                        for row in &report.skipped_rows {
                            println!("  {row}");
                        }
                    }
                }

                let consistency = CogFinder::new(&store).validate();
                if !consistency.missing_categories.is_empty() {
                    println!(
                        "Categories used but not defined: {}",
                        consistency.missing_categories.join(", ")
                    );
                }
                if !consistency.orphaned_assignments.is_empty() {
                    println!(
                        "Assigned COGs without a definition: {}",
                        consistency.orphaned_assignments.len()
                    );
                    if verbose {
                        println!("  {}", consistency.orphaned_assignments.join(", "));
                    }
                }
            }
            Err(e) => println!("Error loading database stats: {e}"),
        }
    } else {
        println!("Place the NCBI COG files in the data directory and run 'cog-classifier prepare'");
    }

    let data_dir = data.layout().data_dir();
    let absolute = if data_dir.is_absolute() {
        data_dir.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| data_dir.to_path_buf(), |cwd| cwd.join(data_dir))
    };
    println!("\nData directory: {}", absolute.display());

    Ok(())
}
