use super::record::{Manifest, ManifestRecord};
use crate::error::Result;
use crate::search::{image_patterns, mask_patterns, FileIndex};
use crate::types::{CaseKey, PrepConfig, MASK_SUBTYPES};
use std::path::{Path, PathBuf};

/// Receives progress events while a manifest is built
///
/// Both methods default to doing nothing.
pub trait ManifestObserver {
    /// Called once per case after its image lookup
    fn case_resolved(&mut self, _key: &CaseKey, _image: Option<&Path>) {}

    /// Called for every record added to the manifest
    fn record_emitted(&mut self, _record: &ManifestRecord) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ManifestObserver for NoopObserver {}

/// Counts gathered while building a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct BuildSummary {
    /// Number of (type, side, index) cases examined
    pub cases_examined: usize,

    /// Number of cases whose image was found
    pub images_found: usize,

    /// Number of manifest rows emitted
    pub records_written: usize,

    /// Where the manifest was written, if it was
    pub manifest_path: Option<PathBuf>,
}

/// Resolves the identifier space of a [`PrepConfig`] into a [`Manifest`]
///
/// # Algorithm
///
/// 1. Walk the root once into a [`FileIndex`]
/// 2. For each type, then side, then index `1..=max_index`:
///    - resolve the image; skip the case if there is none
///    - for each mask subtype ("all", then "bone") resolve the mask and
///      emit a record when found
///
/// # Example
///
/// ```no_run
/// use radprep_core::{ManifestBuilder, PrepConfig};
///
/// let config = PrepConfig::new("./TMJOA").with_max_index(34);
/// let summary = ManifestBuilder::new(config).build_to_file().unwrap();
/// println!("{} rows", summary.records_written);
/// ```
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    config: PrepConfig,
}

impl ManifestBuilder {
    /// Creates a builder for a configuration
    pub fn new(config: PrepConfig) -> Self {
        Self { config }
    }

    /// Configuration this builder runs with
    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// Builds the manifest in memory
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a generated
    /// pattern cannot be compiled. Missing files are never an error.
    pub fn build(&self) -> Result<Manifest> {
        let (manifest, _) = self.build_with_observer(&mut NoopObserver)?;
        Ok(manifest)
    }

    /// Builds the manifest in memory, reporting progress to `observer`
    pub fn build_with_observer(
        &self,
        observer: &mut dyn ManifestObserver,
    ) -> Result<(Manifest, BuildSummary)> {
        self.config.validate()?;

        let index = FileIndex::scan(&self.config.root);
        log::info!(
            "Searching {} cases under {} ({} files indexed)",
            self.config.case_count(),
            index.root().display(),
            index.len()
        );

        let mut manifest = Manifest::new();
        let mut summary = BuildSummary::default();

        for type_code in &self.config.type_codes {
            for side in &self.config.sides {
                for i in 1..=self.config.max_index {
                    let key = CaseKey::new(type_code.as_str(), side.as_str(), i);
                    summary.cases_examined += 1;

                    let patterns = image_patterns(&key, self.config.index_pad_width);
                    let image = index.find_first(&patterns)?;
                    observer.case_resolved(&key, image.as_deref());

                    let Some(image_path) = image else {
                        continue;
                    };
                    summary.images_found += 1;

                    for record in self.resolve_masks(&index, &key, &image_path)? {
                        observer.record_emitted(&record);
                        manifest.push(record);
                    }
                }
            }
        }

        summary.records_written = manifest.len();
        Ok((manifest, summary))
    }

    /// Builds the manifest and writes it to the configured path
    ///
    /// # Errors
    ///
    /// Returns an error if the build fails or the manifest file cannot be
    /// created or written.
    pub fn build_to_file(&self) -> Result<BuildSummary> {
        self.build_to_file_with_observer(&mut NoopObserver)
    }

    /// Same as [`ManifestBuilder::build_to_file`], reporting progress to `observer`
    pub fn build_to_file_with_observer(
        &self,
        observer: &mut dyn ManifestObserver,
    ) -> Result<BuildSummary> {
        let (manifest, mut summary) = self.build_with_observer(observer)?;
        manifest.write_to(&self.config.manifest_path)?;
        log::info!(
            "Manifest written: {} ({} rows)",
            self.config.manifest_path.display(),
            manifest.len()
        );
        summary.manifest_path = Some(self.config.manifest_path.clone());
        Ok(summary)
    }

    /// Looks up every mask subtype of a case whose image was found
    fn resolve_masks(
        &self,
        index: &FileIndex,
        key: &CaseKey,
        image_path: &Path,
    ) -> Result<Vec<ManifestRecord>> {
        let mut records = Vec::with_capacity(MASK_SUBTYPES.len());
        for subtype in MASK_SUBTYPES {
            let patterns = mask_patterns(key, subtype, self.config.index_pad_width);
            match index.find_first(&patterns)? {
                Some(mask_path) => records.push(ManifestRecord::new(
                    key.case_id(subtype),
                    image_path.to_path_buf(),
                    mask_path,
                )),
                None => log::debug!("No {} mask for {}", subtype, key),
            }
        }
        Ok(records)
    }
}
