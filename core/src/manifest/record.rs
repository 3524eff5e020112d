use crate::error::{RadprepError, Result};
use crate::types::CaseId;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Header row of every manifest file
pub const MANIFEST_HEADER: [&str; 3] = ["ID", "Image", "Mask"];

/// Manifest rows are terminated by CRLF
fn csv_writer() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.terminator(csv::Terminator::CRLF);
    builder
}

/// One manifest row: an image paired with one of its masks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// `{subtype}_{side}_{type}_{index}`
    pub case_id: CaseId,

    /// Absolute path of the image
    pub image_path: PathBuf,

    /// Absolute path of the mask
    pub mask_path: PathBuf,
}

impl ManifestRecord {
    /// Creates a new ManifestRecord
    pub fn new(case_id: CaseId, image_path: PathBuf, mask_path: PathBuf) -> Self {
        Self {
            case_id,
            image_path,
            mask_path,
        }
    }

    fn to_row(&self) -> Result<[String; 3]> {
        Ok([
            self.case_id.to_string(),
            utf8_path(&self.image_path)?.to_string(),
            utf8_path(&self.mask_path)?.to_string(),
        ])
    }
}

fn utf8_path(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        RadprepError::InvalidManifest(format!("path is not valid UTF-8: {}", path.display()))
    })
}

/// Ordered list of manifest records
///
/// Rows keep insertion order, which the builder makes equal to the
/// (type, side, index, subtype) iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    records: Vec<ManifestRecord>,
}

impl Manifest {
    /// Creates an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record
    pub fn push(&mut self, record: ManifestRecord) {
        self.records.push(record);
    }

    /// Records in row order
    pub fn records(&self) -> &[ManifestRecord] {
        &self.records
    }

    /// Number of rows, excluding the header
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the manifest has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a row by case id
    pub fn get(&self, case_id: &CaseId) -> Option<&ManifestRecord> {
        self.records.iter().find(|r| &r.case_id == case_id)
    }

    /// Writes the manifest as CSV, truncating any existing file
    ///
    /// The header is always written, so an empty manifest is a valid
    /// header-only file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = csv_writer().from_path(path)?;
        self.write_rows(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Renders the manifest exactly as [`Manifest::write_to`] would
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv_writer().from_writer(Vec::new());
        self.write_rows(&mut writer)?;
        writer
            .into_inner()
            .map_err(|e| RadprepError::IoError(e.into_error()))
    }

    fn write_rows<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<()> {
        writer.write_record(MANIFEST_HEADER)?;
        for record in &self.records {
            writer.write_record(record.to_row()?)?;
        }
        Ok(())
    }

    /// Reads a manifest previously written by [`Manifest::write_to`]
    ///
    /// # Errors
    ///
    /// Returns [`RadprepError::InvalidManifest`] if the header is not
    /// `ID,Image,Mask` or a case id appears twice, [`RadprepError::InvalidCaseId`]
    /// for a malformed id, and a CSV or I/O error if the file cannot be read.
    pub fn read_from(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;

        let headers = reader.headers()?;
        if headers.iter().ne(MANIFEST_HEADER.iter().copied()) {
            return Err(RadprepError::InvalidManifest(format!(
                "expected header {}, found {}",
                MANIFEST_HEADER.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        let mut manifest = Manifest::new();
        let mut seen = HashSet::new();
        for row in reader.records() {
            let row = row?;
            let case_id = CaseId::parse(&row[0])?;
            if !seen.insert(case_id.clone()) {
                return Err(RadprepError::InvalidManifest(format!(
                    "duplicate case id {}",
                    case_id
                )));
            }
            manifest.push(ManifestRecord::new(
                case_id,
                PathBuf::from(&row[1]),
                PathBuf::from(&row[2]),
            ));
        }

        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CaseKey, MaskSubtype};
    use std::fs;
    use tempfile::TempDir;

    fn sample_manifest() -> Manifest {
        let key = CaseKey::new("RTF", "Right", 12);
        let mut manifest = Manifest::new();
        manifest.push(ManifestRecord::new(
            key.case_id(MaskSubtype::All),
            PathBuf::from("/data/RTF12_Right30x30x30.nii"),
            PathBuf::from("/data/RTF12_Right_cropped_all.nii"),
        ));
        manifest.push(ManifestRecord::new(
            key.case_id(MaskSubtype::Bone),
            PathBuf::from("/data/RTF12_Right30x30x30.nii"),
            PathBuf::from("/data/RTF12_Right_cropped_bone.nii"),
        ));
        manifest
    }

    #[test]
    fn test_empty_manifest_is_header_only() {
        let bytes = Manifest::new().to_csv_bytes().unwrap();
        assert_eq!(bytes, b"ID,Image,Mask\r\n");
    }

    #[test]
    fn test_csv_layout() {
        let text = String::from_utf8(sample_manifest().to_csv_bytes().unwrap()).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines[0], "ID,Image,Mask");
        assert_eq!(
            lines[1],
            "all_Right_RTF_12,/data/RTF12_Right30x30x30.nii,/data/RTF12_Right_cropped_all.nii"
        );
        assert!(lines[2].starts_with("bone_Right_RTF_12,"));
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_write_truncates_and_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.csv");
        fs::write(&path, "stale content that is much longer than the header\n".repeat(50))
            .unwrap();

        Manifest::new().write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "ID,Image,Mask\r\n");

        let manifest = sample_manifest();
        manifest.write_to(&path).unwrap();
        assert_eq!(Manifest::read_from(&path).unwrap(), manifest);
    }

    #[test]
    fn test_written_file_uses_crlf() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.csv");
        sample_manifest().write_to(&path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes, sample_manifest().to_csv_bytes().unwrap());
        assert!(bytes.ends_with(b"_cropped_bone.nii\r\n"));
        let lone_lf = bytes
            .iter()
            .enumerate()
            .filter(|(i, b)| **b == b'\n' && (*i == 0 || bytes[i - 1] != b'\r'))
            .count();
        assert_eq!(lone_lf, 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut manifest = Manifest::new();
        manifest.push(ManifestRecord::new(
            CaseKey::new("RTF", "Right", 1).case_id(MaskSubtype::All),
            PathBuf::from(OsStr::from_bytes(b"/data/bad\xffdir/RTF1_Right.nii")),
            PathBuf::from("/data/RTF1_Right_cropped_all.nii"),
        ));

        assert!(matches!(
            manifest.to_csv_bytes(),
            Err(RadprepError::InvalidManifest(_))
        ));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no/such/dir/manifest.csv");
        assert!(Manifest::new().write_to(&path).is_err());
    }

    #[test]
    fn test_read_rejects_wrong_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.csv");
        fs::write(&path, "Case,Image,Mask\r\n").unwrap();

        assert!(matches!(
            Manifest::read_from(&path),
            Err(RadprepError::InvalidManifest(_))
        ));
    }

    #[test]
    fn test_read_rejects_duplicate_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manifest.csv");
        fs::write(
            &path,
            "ID,Image,Mask\r\nall_Left_RCM_1,/a.nii,/b.nii\r\nall_Left_RCM_1,/a.nii,/c.nii\r\n",
        )
        .unwrap();

        assert!(matches!(
            Manifest::read_from(&path),
            Err(RadprepError::InvalidManifest(_))
        ));
    }

    #[test]
    fn test_get_by_case_id() {
        let manifest = sample_manifest();
        let id = CaseId::parse("bone_Right_RTF_12").unwrap();
        let record = manifest.get(&id).unwrap();
        assert_eq!(
            record.mask_path,
            PathBuf::from("/data/RTF12_Right_cropped_bone.nii")
        );
        assert!(manifest
            .get(&CaseId::parse("all_Left_RTF_12").unwrap())
            .is_none());
    }
}
