//! Extension-based format detection.

use std::path::Path;

use reportsync_models::SourceFormat;

use crate::error::{ExtractionError, ExtractionOutput};

/// Detect the report format from the path extension.
///
/// The file itself is never opened. A `hint` wins over the extension.
pub fn detect_format(path: &Path, hint: Option<SourceFormat>) -> ExtractionOutput<SourceFormat> {
    if let Some(format) = hint {
        return Ok(format);
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    SourceFormat::from_extension(extension)
        .ok_or_else(|| ExtractionError::unsupported_format(extension.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(detect_format(Path::new("report.csv"), None), Ok(SourceFormat::Csv));
        assert_eq!(detect_format(Path::new("report.TXT"), None), Ok(SourceFormat::Txt));
        assert_eq!(detect_format(Path::new("a/b/report.xls"), None), Ok(SourceFormat::Xls));
        assert_eq!(detect_format(Path::new("report.xlsx"), None), Ok(SourceFormat::Xlsx));
        assert_eq!(detect_format(Path::new("report.ods"), None), Ok(SourceFormat::Ods));
    }

    #[test]
    fn test_unsupported_extension_carries_extension() {
        assert_eq!(
            detect_format(Path::new("/nonexistent/report.PDF"), None),
            Err(ExtractionError::unsupported_format("pdf"))
        );
        assert_eq!(
            detect_format(Path::new("report"), None),
            Err(ExtractionError::unsupported_format(""))
        );
    }

    #[test]
    fn test_hint_overrides_extension() {
        assert_eq!(
            detect_format(Path::new("download.bin"), Some(SourceFormat::Ods)),
            Ok(SourceFormat::Ods)
        );
    }
}
