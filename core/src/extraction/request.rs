use super::outcome::ExtractionOutcome;
use crate::types::{FeatureFormat, DEFAULT_MANIFEST_FILE};
use std::ffi::OsString;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Default feature-extraction program
pub const DEFAULT_TOOL: &str = "pyradiomics";

/// Default feature output file
pub const DEFAULT_OUTPUT_FILE: &str = "output_features.csv";

/// Default number of parallel jobs handed to the tool
pub const DEFAULT_JOBS: usize = 3;

/// One invocation of the external feature-extraction tool
///
/// The command line is `<program> <manifest> -o <output> -f <format> -j <jobs>`
/// followed by `--skip-nans` when `skip_nans` is set.
///
/// # Example
///
/// ```
/// use radprep_core::{ExtractionRequest, FeatureFormat};
///
/// let request = ExtractionRequest::new("input_all_types.csv", "features.csv")
///     .with_format(FeatureFormat::Csv)
///     .with_skip_nans(false);
///
/// assert_eq!(
///     request.command_line(),
///     "pyradiomics input_all_types.csv -o features.csv -f csv -j 3"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    /// Program name (resolved on `PATH`) or path
    pub program: String,

    /// Manifest handed to the tool as its positional argument
    pub manifest_path: PathBuf,

    /// Where the tool writes features (`-o`)
    pub output_path: PathBuf,

    /// Feature output format (`-f`)
    pub format: FeatureFormat,

    /// Parallel jobs (`-j`)
    pub jobs: NonZeroUsize,

    /// Skip non-numeric feature values (`--skip-nans`)
    pub skip_nans: bool,
}

impl Default for ExtractionRequest {
    fn default() -> Self {
        Self {
            program: DEFAULT_TOOL.to_string(),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_FILE),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            format: FeatureFormat::default(),
            jobs: NonZeroUsize::new(DEFAULT_JOBS).unwrap_or(NonZeroUsize::MIN),
            skip_nans: true,
        }
    }
}

impl ExtractionRequest {
    /// Creates a request with default tool options
    pub fn new(manifest_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Builder: Set the program to run
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Builder: Set the output format
    pub fn with_format(mut self, format: FeatureFormat) -> Self {
        self.format = format;
        self
    }

    /// Builder: Set the number of parallel jobs
    pub fn with_jobs(mut self, jobs: NonZeroUsize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Builder: Toggle `--skip-nans`
    pub fn with_skip_nans(mut self, skip: bool) -> Self {
        self.skip_nans = skip;
        self
    }

    /// Arguments passed to the program, in order
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            self.manifest_path.clone().into(),
            "-o".into(),
            self.output_path.clone().into(),
            "-f".into(),
            self.format.simple_name().into(),
            "-j".into(),
            self.jobs.to_string().into(),
        ];
        if self.skip_nans {
            args.push("--skip-nans".into());
        }
        args
    }

    /// Full command line rendered for logging
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args().iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the tool and waits for it to exit
    ///
    /// Standard output is passed through; standard error is captured into
    /// the outcome. No timeout is applied.
    pub fn invoke(&self) -> ExtractionOutcome {
        let program_path = match which::which(&self.program) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{} could not be resolved: {}", self.program, e);
                return ExtractionOutcome::ToolNotAvailable {
                    program: self.program.clone(),
                    detail: e.to_string(),
                };
            }
        };

        log::info!("Running command: {}", self.command_line());

        let child = Command::new(&program_path)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                return ExtractionOutcome::ToolNotAvailable {
                    program: self.program.clone(),
                    detail: e.to_string(),
                };
            }
        };

        let output = match child.wait_with_output() {
            Ok(output) => output,
            Err(e) => {
                return ExtractionOutcome::Failed {
                    exit_code: None,
                    stderr: e.to_string(),
                };
            }
        };

        if output.status.success() {
            log::info!("{} has completed: {}", self.program, self.output_path.display());
            ExtractionOutcome::Success
        } else {
            ExtractionOutcome::Failed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobs(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_default_request() {
        let request = ExtractionRequest::default();
        assert_eq!(request.program, "pyradiomics");
        assert_eq!(request.manifest_path, PathBuf::from("input_all_types.csv"));
        assert_eq!(request.output_path, PathBuf::from("output_features.csv"));
        assert_eq!(request.format, FeatureFormat::Csv);
        assert_eq!(request.jobs.get(), 3);
        assert!(request.skip_nans);
    }

    #[test]
    fn test_args_order_with_skip_nans() {
        let request = ExtractionRequest::new("m.csv", "out.json")
            .with_format(FeatureFormat::Json)
            .with_jobs(jobs(8));
        let args: Vec<String> = request
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec!["m.csv", "-o", "out.json", "-f", "json", "-j", "8", "--skip-nans"]
        );
    }

    #[test]
    fn test_args_without_skip_nans() {
        let request = ExtractionRequest::new("m.csv", "out.csv").with_skip_nans(false);
        assert!(!request
            .args()
            .iter()
            .any(|a| a.to_string_lossy() == "--skip-nans"));
        assert_eq!(request.args().len(), 7);
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let request = ExtractionRequest::new("m.csv", "/no/such/dir/out.csv")
            .with_program("radprep-missing-feature-tool");
        let outcome = request.invoke();
        assert!(matches!(
            outcome,
            ExtractionOutcome::ToolNotAvailable { ref program, .. } if program == "radprep-missing-feature-tool"
        ));
        assert!(!outcome.is_success());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Writes a shell script and returns a request running it through `sh`
        ///
        /// The script sits in the manifest position, so `$*` holds the
        /// remaining tool flags.
        fn sh_request(dir: &TempDir, body: &str) -> ExtractionRequest {
            let path = dir.path().join("fake-tool.sh");
            fs::write(&path, format!("{}\n", body)).unwrap();
            ExtractionRequest::new(path, "out.csv").with_program("sh")
        }

        #[test]
        fn test_zero_exit_is_success() {
            let temp_dir = TempDir::new().unwrap();
            let outcome = sh_request(&temp_dir, "exit 0").invoke();
            assert_eq!(outcome, ExtractionOutcome::Success);
        }

        #[test]
        fn test_non_zero_exit_captures_stderr() {
            let temp_dir = TempDir::new().unwrap();
            let outcome = sh_request(&temp_dir, "echo \"bad input: $*\" >&2\nexit 3")
                .with_jobs(jobs(2))
                .invoke();

            assert_eq!(outcome.exit_code(), Some(3));
            assert!(outcome
                .stderr()
                .contains("bad input: -o out.csv -f csv -j 2 --skip-nans"));
        }

        #[test]
        fn test_non_executable_file_is_not_available() {
            let temp_dir = TempDir::new().unwrap();
            let path = temp_dir.path().join("not-a-tool");
            fs::write(&path, "plain text").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

            let outcome = ExtractionRequest::new("m.csv", "out.csv")
                .with_program(path.display().to_string())
                .invoke();
            assert!(matches!(outcome, ExtractionOutcome::ToolNotAvailable { .. }));
        }
    }
}
