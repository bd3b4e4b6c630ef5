//! Promoter architecture report through an external enumeration pipeline
//!
//! The enumeration itself is a black box: the motif-site table goes through a
//! filter program, whose output is fed to the enumeration program together
//! with the tree text. Only the byte-stream contract is modelled here.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::data::MotifSite;
use crate::error::{Result, TfbsError};
use crate::io::motif_sites_to_tsv;

/// Options of the enumeration stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureFlags {
    /// Pass the expression dendrogram to the enumeration (`-t <tree file>`)
    pub use_tree: bool,
    /// Count repeated motifs (`-r`)
    pub use_repeats: bool,
}

/// Input of one architecture report
#[derive(Debug, Clone, Copy)]
pub struct ArchitectureRequest<'a> {
    pub tree_text: &'a str,
    pub sites: &'a [MotifSite],
    pub flags: ArchitectureFlags,
}

/// Anything that turns a tree and a motif-site table into a report text
pub trait ArchitectureService {
    fn report(&self, request: &ArchitectureRequest<'_>) -> Result<String>;
}

/// Locations and bounds of the script pipeline
#[derive(Debug, Clone)]
pub struct ArchitectureConfig {
    /// Program used to run both scripts
    pub interpreter: PathBuf,
    /// Stage 1: drops genes with too many candidate architectures
    pub filter_script: PathBuf,
    /// Stage 2: enumerates architectures
    pub enumerate_script: PathBuf,
    pub filter_min: u64,
    pub filter_max: u64,
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("perl"),
            filter_script: PathBuf::from("scripts/calculaNumArqEFiltra.pl"),
            enumerate_script: PathBuf::from(
                "scripts/subsetsWithExpressionTreeConfigurableAndUsingPositionsV3.pl",
            ),
            filter_min: 1_000_000,
            filter_max: 60_000_000,
        }
    }
}

/// Architecture report produced by running the two scripts
#[derive(Debug, Clone, Default)]
pub struct ScriptArchitecture {
    config: ArchitectureConfig,
}

impl ScriptArchitecture {
    pub fn new(config: ArchitectureConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArchitectureConfig {
        &self.config
    }

    /// Arguments of the filter stage
    pub fn filter_args(&self) -> Vec<OsString> {
        vec![
            self.config.filter_script.clone().into_os_string(),
            OsString::from(self.config.filter_min.to_string()),
            OsString::from(self.config.filter_max.to_string()),
        ]
    }

    /// Arguments of the enumeration stage
    pub fn enumerate_args(&self, flags: ArchitectureFlags, tree_file: &Path) -> Vec<OsString> {
        let mut args = vec![self.config.enumerate_script.clone().into_os_string()];
        if flags.use_repeats {
            args.push(OsString::from("-r"));
        }
        if flags.use_tree {
            args.push(OsString::from("-t"));
            args.push(tree_file.as_os_str().to_os_string());
        }
        args
    }

    fn run_stage(&self, stage: &str, args: Vec<OsString>, input: &NamedTempFile) -> Result<Vec<u8>> {
        log::debug!("Running {} stage: {:?} {:?}", stage, self.config.interpreter, args);

        let output = Command::new(&self.config.interpreter)
            .args(&args)
            .stdin(Stdio::from(input.reopen()?))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| TfbsError::ArchitectureFailed {
                stage: stage.to_string(),
                reason: format!("could not start {:?}: {}", self.config.interpreter, e),
            })?;

        if !output.status.success() {
            return Err(TfbsError::ArchitectureFailed {
                stage: stage.to_string(),
                reason: format!(
                    "{}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(output.stdout)
    }
}

impl ArchitectureService for ScriptArchitecture {
    fn report(&self, request: &ArchitectureRequest<'_>) -> Result<String> {
        log::info!(
            "Running architecture report on {} motif sites (tree: {}, repeats: {})",
            request.sites.len(),
            request.flags.use_tree,
            request.flags.use_repeats
        );

        let mut tree_file = NamedTempFile::new()?;
        tree_file.write_all(request.tree_text.as_bytes())?;
        tree_file.flush()?;

        let mut sites_file = NamedTempFile::new()?;
        sites_file.write_all(&motif_sites_to_tsv(request.sites, false)?)?;
        sites_file.flush()?;

        let filtered = self.run_stage("filter", self.filter_args(), &sites_file)?;

        let mut filtered_file = NamedTempFile::new()?;
        filtered_file.write_all(&filtered)?;
        filtered_file.flush()?;

        let args = self.enumerate_args(request.flags, tree_file.path());
        let report = self.run_stage("enumerate", args, &filtered_file)?;

        Ok(String::from_utf8_lossy(&report).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sites() -> Vec<MotifSite> {
        vec![
            MotifSite {
                seq: "g1".to_string(),
                motif_id: "m1".to_string(),
                start: 10,
                end: 20,
            },
            MotifSite {
                seq: "g2".to_string(),
                motif_id: "m2".to_string(),
                start: 5,
                end: 9,
            },
        ]
    }

    #[test]
    fn test_enumerate_args_follow_flags() {
        let runner = ScriptArchitecture::default();
        let tree = Path::new("/tmp/tree.newick");

        let none = runner.enumerate_args(ArchitectureFlags::default(), tree);
        assert_eq!(none.len(), 1);

        let both = runner.enumerate_args(
            ArchitectureFlags {
                use_tree: true,
                use_repeats: true,
            },
            tree,
        );
        assert_eq!(both[1..], [OsString::from("-r"), OsString::from("-t"), OsString::from("/tmp/tree.newick")]);

        let filter = runner.filter_args();
        assert_eq!(filter[1], OsString::from("1000000"));
        assert_eq!(filter[2], OsString::from("60000000"));
    }

    #[cfg(unix)]
    fn script(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", body).unwrap();
        file
    }

    #[cfg(unix)]
    #[test]
    fn test_pipeline_passes_tables_and_tree() {
        let filter = script("cat");
        let enumerate = script(
            "for a in \"$@\"; do last=\"$a\"; done\necho \"args: $*\"\ncat\nif [ -f \"$last\" ]; then cat \"$last\"; fi",
        );
        let runner = ScriptArchitecture::new(ArchitectureConfig {
            interpreter: PathBuf::from("sh"),
            filter_script: filter.path().to_path_buf(),
            enumerate_script: enumerate.path().to_path_buf(),
            ..Default::default()
        });

        let sites = sites();
        let report = runner
            .report(&ArchitectureRequest {
                tree_text: "(g1:1.00,g2:1.00);",
                sites: &sites,
                flags: ArchitectureFlags {
                    use_tree: true,
                    use_repeats: true,
                },
            })
            .unwrap();

        assert!(report.starts_with("args: -r -t "));
        assert!(report.contains("g1\tm1\t10\t20\n"));
        assert!(report.contains("g2\tm2\t5\t9\n"));
        assert!(report.trim_end().ends_with("(g1:1.00,g2:1.00);"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_stage_is_reported() {
        let filter = script("echo 'too many motifs' >&2\nexit 3");
        let enumerate = script("cat");
        let runner = ScriptArchitecture::new(ArchitectureConfig {
            interpreter: PathBuf::from("sh"),
            filter_script: filter.path().to_path_buf(),
            enumerate_script: enumerate.path().to_path_buf(),
            ..Default::default()
        });

        let sites = sites();
        let err = runner
            .report(&ArchitectureRequest {
                tree_text: "(g1:1.00,g2:1.00);",
                sites: &sites,
                flags: ArchitectureFlags::default(),
            })
            .unwrap_err();

        match err {
            TfbsError::ArchitectureFailed { stage, reason } => {
                assert_eq!(stage, "filter");
                assert!(reason.contains("too many motifs"));
            }
            other => panic!("expected ArchitectureFailed, got {}", other),
        }
    }
}
