use crate::error::Result;
use crate::extraction::{ExtractionOutcome, ExtractionRequest};
use crate::manifest::{BuildSummary, Manifest, ManifestBuilder, ManifestObserver};
use crate::types::PrepConfig;

/// Build-then-extract pipeline
///
/// Ties a [`PrepConfig`] to an [`ExtractionRequest`] so that the tool always
/// reads the manifest the builder wrote.
///
/// # Example
///
/// ```no_run
/// use radprep_core::{ExtractionRequest, NoopObserver, PrepConfig, RadiomicsPipeline};
///
/// let config = PrepConfig::new("./TMJOA").with_max_index(34);
/// let request = ExtractionRequest::default();
/// let pipeline = RadiomicsPipeline::new(config, request);
///
/// let report = pipeline.run(&mut NoopObserver).unwrap();
/// assert!(report.build.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RadiomicsPipeline {
    config: PrepConfig,
    request: ExtractionRequest,
}

impl RadiomicsPipeline {
    /// Creates a pipeline; the request's manifest path is replaced by the
    /// configuration's
    pub fn new(config: PrepConfig, mut request: ExtractionRequest) -> Self {
        request.manifest_path = config.manifest_path.clone();
        Self { config, request }
    }

    /// Search configuration
    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// Tool invocation
    pub fn request(&self) -> &ExtractionRequest {
        &self.request
    }

    /// Builds and writes the manifest
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the manifest
    /// cannot be written.
    pub fn prepare_manifest(&self, observer: &mut dyn ManifestObserver) -> Result<BuildSummary> {
        ManifestBuilder::new(self.config.clone()).build_to_file_with_observer(observer)
    }

    /// Runs the extraction tool against the manifest as it is on disk
    pub fn run_extraction(&self) -> ExtractionOutcome {
        self.request.invoke()
    }

    /// Builds the manifest, then runs the extraction tool
    ///
    /// The tool runs even on a header-only manifest, the same as
    /// [`RadiomicsPipeline::extract_existing`].
    pub fn run(&self, observer: &mut dyn ManifestObserver) -> Result<RunReport> {
        let build = self.prepare_manifest(observer)?;
        let manifest_rows = build.records_written;
        if manifest_rows == 0 {
            log::warn!("Manifest is empty, running feature extraction anyway");
        }

        Ok(RunReport {
            build: Some(build),
            manifest_rows,
            extraction: Some(self.run_extraction()),
        })
    }

    /// Validates an existing manifest, then runs the extraction tool
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or is malformed.
    pub fn extract_existing(&self) -> Result<RunReport> {
        let manifest = Manifest::read_from(&self.request.manifest_path)?;
        log::info!(
            "Loaded manifest {} ({} rows)",
            self.request.manifest_path.display(),
            manifest.len()
        );

        Ok(RunReport {
            build: None,
            manifest_rows: manifest.len(),
            extraction: Some(self.run_extraction()),
        })
    }
}

/// What a pipeline run did
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RunReport {
    /// Build counts, when the manifest was built in this run
    pub build: Option<BuildSummary>,

    /// Rows in the manifest handed to the tool
    pub manifest_rows: usize,

    /// Tool outcome, when the tool was run
    pub extraction: Option<ExtractionOutcome>,
}

impl RunReport {
    /// Returns `true` unless the tool ran and did not succeed
    pub fn is_success(&self) -> bool {
        self.extraction
            .as_ref()
            .map(ExtractionOutcome::is_success)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::NoopObserver;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> RadiomicsPipeline {
        let config = PrepConfig::new(dir.path().join("data"))
            .with_manifest_path(dir.path().join("manifest.csv"));
        let request = ExtractionRequest::new("ignored.csv", dir.path().join("features.csv"))
            .with_program("radprep-missing-feature-tool");
        RadiomicsPipeline::new(config, request)
    }

    #[test]
    fn test_request_uses_config_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let pipeline = setup(&temp_dir);
        assert_eq!(
            pipeline.request().manifest_path,
            temp_dir.path().join("manifest.csv")
        );
    }

    #[test]
    fn test_empty_manifest_still_runs_extraction() {
        let temp_dir = TempDir::new().unwrap();
        let report = setup(&temp_dir).run(&mut NoopObserver).unwrap();

        assert_eq!(report.manifest_rows, 0);
        assert!(matches!(
            report.extraction,
            Some(ExtractionOutcome::ToolNotAvailable { .. })
        ));
        assert!(!report.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_manifest_starts_tool() {
        let temp_dir = TempDir::new().unwrap();
        let config = PrepConfig::new(temp_dir.path().join("data"))
            .with_manifest_path(temp_dir.path().join("manifest.csv"));
        let request = ExtractionRequest::default().with_program("sh");

        let report = RadiomicsPipeline::new(config, request)
            .run(&mut NoopObserver)
            .unwrap();

        assert_eq!(report.manifest_rows, 0);
        let outcome = report.extraction.unwrap();
        assert!(!matches!(outcome, ExtractionOutcome::ToolNotAvailable { .. }));
    }

    #[test]
    fn test_missing_tool_is_reported_not_raised() {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        File::create(data.join("RTF1_Right30x30x30.nii")).unwrap();
        File::create(data.join("RTF1_Right_cropped_all.nii")).unwrap();

        let report = setup(&temp_dir).run(&mut NoopObserver).unwrap();
        assert_eq!(report.manifest_rows, 1);
        assert!(matches!(
            report.extraction,
            Some(ExtractionOutcome::ToolNotAvailable { .. })
        ));
        assert!(!report.is_success());
    }

    #[test]
    fn test_extract_existing_requires_manifest() {
        let temp_dir = TempDir::new().unwrap();
        assert!(setup(&temp_dir).extract_existing().is_err());

        fs::write(
            temp_dir.path().join("manifest.csv"),
            "ID,Image,Mask\r\nall_Left_RCF_2,/a.nii,/b.nii\r\n",
        )
        .unwrap();
        let report = setup(&temp_dir).extract_existing().unwrap();
        assert!(report.build.is_none());
        assert_eq!(report.manifest_rows, 1);
        assert!(report.extraction.is_some());
    }

    #[test]
    fn test_build_summary_paths() {
        let temp_dir = TempDir::new().unwrap();
        let summary = setup(&temp_dir)
            .prepare_manifest(&mut NoopObserver)
            .unwrap();
        assert_eq!(
            summary.manifest_path,
            Some(temp_dir.path().join("manifest.csv"))
        );
    }
}
