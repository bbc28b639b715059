//! Shared fixtures for the command-line tests.

#![allow(dead_code)]

use std::path::Path;

pub const CATEGORIES: &str = "\
E\tAmino acid transport and metabolism
H\tCoenzyme transport and metabolism
J\tTranslation, ribosomal structure and biogenesis
";

pub const DEFINITIONS: &str = "\
COG0001\tH\tGlutamate-1-semialdehyde aminotransferase\tHemL
COG0002\tE\tN-acetyl-gamma-glutamylphosphate reductase\tArgC
COG0048\tJ\tRibosomal protein S12\tRpsL
";

pub const ASSIGNMENTS: &str = "\
domain_id,genome_id,protein_id,protein_length,cog_id,membership_class,gene_name
NP_214052.1_1,Aquifex,NP_214052.1,426,COG0001,0,hemL
WP_000001.1_1,Ecoli,WP_000001.1,344,COG0002,0,argC
P69905_1,Human,P69905,142,COG0048,0,rpsL
";

pub const REFERENCE_FASTA: &str = "\
>ref|NP_214052.1| hemL
MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVKALPDAQFEVVHSLAKWKRQTLGQHDFSAGEGLYTHMKALRPDEDRLSPLHSVYVDQWDWERVMGDGERQFSTLKSTVEAIWAGIKATEAAVSEEFGLAPFLPDQIHFVHSQELLSRYPDLDAKGRERAIAKDLGAVFLVGIGGKLSDGHRHDVRAPDYDDWUAIGLNAC
>WP_000001.1
MSTNPKPQRKTKRNTNRRPQDVKFPGGGQIVGGVYLLPRRGPRLGVRATRKTSERSQPRGRRQPIPKARRPEGRTWAQPGYPWPLYGNEGCGWAGWLLSPRGSRPSWGPTDPRRRSRNLGKVIDTLTCGFADLMGYIPLVGAPL
";

/// Write the three reference tables into `dir`
pub fn write_tables(dir: &Path) {
    std::fs::write(dir.join("fun-20.tab"), CATEGORIES).unwrap();
    std::fs::write(dir.join("cog-20.def.tab"), DEFINITIONS).unwrap();
    std::fs::write(dir.join("cog-20.cog.csv"), ASSIGNMENTS).unwrap();
}

/// Write every reference file plus a placeholder search index
pub fn write_ready_data_dir(dir: &Path) {
    write_tables(dir);
    std::fs::write(dir.join("cog-20.fa"), REFERENCE_FASTA).unwrap();
    std::fs::write(dir.join("cog_blast_db.pin"), b"").unwrap();
}

/// Two query proteins, each long enough to pass validation
pub fn write_queries(path: &Path) {
    std::fs::write(
        path,
        ">query_1 first\nMKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ\n>query_2\nMSTNPKPQRKTKRNTNRRPQDVKFPGGGQIV\n",
    )
    .unwrap();
}
