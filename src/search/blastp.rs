//! BLAST+ invocation: `blastp` searches and `makeblastdb` index builds.

use std::ffi::OsString;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{SearchError, SearchTool};
use crate::parsing::blast::outfmt_argument;
use crate::pipeline::config::SearchConfig;

/// Index builder shipped with BLAST+
pub const MAKEBLASTDB: &str = "makeblastdb";

/// Title given to the reference index
pub const INDEX_TITLE: &str = "COG_Database";

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `blastp` against a protein index
#[derive(Debug, Clone)]
pub struct BlastpTool {
    database: PathBuf,
    config: SearchConfig,
}

impl BlastpTool {
    pub fn new(database: impl Into<PathBuf>, config: SearchConfig) -> Self {
        Self {
            database: database.into(),
            config,
        }
    }

    fn arguments(&self, query: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        args.push("-query".into());
        args.push(query.into());
        args.push("-db".into());
        args.push(self.database.as_os_str().to_owned());
        args.push("-out".into());
        args.push(output.into());
        for (flag, value) in [
            ("-evalue", self.config.evalue.to_string()),
            ("-max_target_seqs", self.config.max_targets.to_string()),
            ("-num_threads", self.config.threads.to_string()),
            ("-word_size", self.config.word_size.to_string()),
            ("-outfmt", outfmt_argument()),
        ] {
            args.push(flag.into());
            args.push(value.into());
        }
        args
    }
}

impl SearchTool for BlastpTool {
    fn name(&self) -> &str {
        &self.config.program
    }

    fn search(&self, query_fasta: &Path) -> Result<String, SearchError> {
        let output = tempfile::Builder::new().suffix(".blast").tempfile()?;
        let mut stderr = tempfile::tempfile()?;

        let args = self.arguments(query_fasta, output.path());
        debug!("Running {} {:?}", self.config.program, args);

        let mut command = Command::new(&self.config.program);
        command
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr.try_clone()?));
        let mut child = spawn(&mut command, &self.config.program)?;

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let Some(status) = wait_with_deadline(&mut child, timeout)? else {
            warn!(
                "{} timed out after {} s; process killed",
                self.config.program, self.config.timeout_secs
            );
            return Err(SearchError::TimedOut {
                program: self.config.program.clone(),
                secs: self.config.timeout_secs,
            });
        };

        if !status.success() {
            let mut message = String::new();
            stderr.seek(SeekFrom::Start(0))?;
            stderr.read_to_string(&mut message)?;
            return Err(SearchError::Failed {
                program: self.config.program.clone(),
                status: status.to_string(),
                stderr: message.trim().to_string(),
            });
        }

        Ok(std::fs::read_to_string(output.path())?)
    }
}

fn spawn(command: &mut Command, program: &str) -> Result<Child, SearchError> {
    command.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SearchError::NotFound {
                program: program.to_string(),
            }
        } else {
            SearchError::Io(e)
        }
    })
}

/// Wait for `child` to exit, killing it once `timeout` has elapsed.
///
/// Returns `None` if the child was killed. A timeout too large to represent
/// as an instant waits without a deadline.
///
/// # Errors
///
/// Returns an I/O error if the child's status cannot be queried.
pub fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> std::io::Result<Option<ExitStatus>> {
    let Some(deadline) = Instant::now().checked_add(timeout) else {
        return child.wait().map(Some);
    };
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }

        let now = Instant::now();
        if now >= deadline {
            // The child may exit between try_wait and kill
            if let Err(e) = child.kill() {
                debug!("Kill after timeout failed: {e}");
            }
            child.wait()?;
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

fn run_to_completion(program: &str, args: &[OsString]) -> Result<String, SearchError> {
    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SearchError::NotFound {
                program: program.to_string(),
            }
        } else {
            SearchError::Io(e)
        }
    })?;

    if !output.status.success() {
        return Err(SearchError::Failed {
            program: program.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Check that a BLAST+ program runs and return its version line
///
/// # Errors
///
/// Returns `SearchError::NotFound` if the program is not on PATH, or
/// `SearchError::Failed` if it exits unsuccessfully.
pub fn check_installation(program: &str) -> Result<String, SearchError> {
    let stdout = run_to_completion(program, &["-version".into()])?;
    Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
}

/// Build a protein search index from a FASTA file
///
/// # Errors
///
/// Returns `SearchError` if `makeblastdb` is missing or fails.
pub fn make_database(fasta: &Path, out: &Path, title: &str) -> Result<(), SearchError> {
    info!("Building search index {} from {}", out.display(), fasta.display());
    let args: Vec<OsString> = vec![
        "-in".into(),
        fasta.into(),
        "-dbtype".into(),
        "prot".into(),
        "-out".into(),
        out.into(),
        "-title".into(),
        title.into(),
        "-parse_seqids".into(),
    ];
    run_to_completion(MAKEBLASTDB, &args)?;
    info!("Search index created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments() {
        let tool = BlastpTool::new("/data/cog_blast_db", SearchConfig::default());
        let args: Vec<String> = tool
            .arguments(Path::new("q.fa"), Path::new("out.blast"))
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let value_of = |flag: &str| {
            let pos = args.iter().position(|a| a == flag).unwrap();
            args[pos + 1].clone()
        };
        assert_eq!(value_of("-db"), "/data/cog_blast_db");
        assert_eq!(value_of("-evalue"), "0.00001");
        assert_eq!(value_of("-max_target_seqs"), "10");
        assert_eq!(value_of("-word_size"), "3");
        assert!(value_of("-outfmt").starts_with("6 qseqid sseqid"));
    }

    #[test]
    fn test_missing_program() {
        let config = SearchConfig {
            program: "definitely-not-a-blast-binary".to_string(),
            ..SearchConfig::default()
        };
        let tool = BlastpTool::new("db", config);
        let err = tool.search(Path::new("q.fa")).unwrap_err();
        assert!(matches!(err, SearchError::NotFound { .. }));

        assert!(matches!(
            check_installation("definitely-not-a-blast-binary"),
            Err(SearchError::NotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_with_deadline_kills_child() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        let started = Instant::now();
        let status = wait_with_deadline(&mut child, Duration::from_millis(200)).unwrap();
        assert!(status.is_none());
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_with_deadline_returns_status() {
        let mut child = Command::new("true").spawn().unwrap();
        let status = wait_with_deadline(&mut child, Duration::from_secs(10)).unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_with_deadline_unrepresentable_timeout() {
        let mut child = Command::new("true").spawn().unwrap();
        let status = wait_with_deadline(&mut child, Duration::from_secs(u64::MAX)).unwrap();
        assert!(status.is_some_and(|s| s.success()));
    }
}
