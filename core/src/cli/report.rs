use crate::api::RunReport;
use crate::extraction::ExtractionOutcome;
use std::fmt;

/// Text report formatter for a pipeline run
pub struct TextReport<'a> {
    report: &'a RunReport,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a RunReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Radiomics Preparation")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;

        if let Some(build) = &self.report.build {
            writeln!(
                f,
                "Manifest:       {}",
                build
                    .manifest_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "not written".to_string())
            )?;
            writeln!(f, "Cases Examined: {}", build.cases_examined)?;
            writeln!(f, "Images Found:   {}", build.images_found)?;
        }
        writeln!(f, "Manifest Rows:  {}", self.report.manifest_rows)?;

        match &self.report.extraction {
            None => writeln!(f, "Extraction:     skipped")?,
            Some(outcome) => {
                writeln!(f, "Extraction:     {}", outcome)?;
                if let ExtractionOutcome::Failed { stderr, .. } = outcome {
                    let stderr = stderr.trim();
                    if !stderr.is_empty() {
                        writeln!(f)?;
                        writeln!(f, "Tool Output")?;
                        writeln!(f, "-----------")?;
                        writeln!(f, "{}", stderr)?;
                    }
                }
            }
        }

        Ok(())
    }
}
