//! Client-side validation of a batch of files before upload.
//!
//! Each candidate is checked against the extension whitelist, then against
//! the per-file size limit. Files failing either check are reported and left
//! out of the running total; the aggregate limit is checked once at the end.
//!
//! # Example
//!
//! ```
//! use seisweb::{FileCandidate, FileValidator, ValidatorConfig};
//!
//! let validator = FileValidator::new(ValidatorConfig::exact(["mseed"], 500, 500));
//! let result = validator.validate(&[
//!     FileCandidate::new("a.mseed", 100),
//!     FileCandidate::new("b.txt", 1),
//! ]);
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.messages(), vec!["b.txt: invalid extension"]);
//! assert_eq!(result.total_size_bytes, 100);
//! ```

use crate::config::ValidatorConfig;
use crate::error::ValidationError;
use crate::models::{FileCandidate, ValidationResult};

/// Validates candidate batches against a [`ValidatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct FileValidator {
    config: ValidatorConfig,
}

impl FileValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a batch. An empty batch is valid with a total of zero.
    pub fn validate(&self, files: &[FileCandidate]) -> ValidationResult {
        let mut result = ValidationResult::default();

        for file in files {
            if !self.config.allows(file.extension()) {
                result.errors.push(ValidationError::InvalidExtension {
                    name: file.name.clone(),
                });
                continue;
            }

            if file.size > self.config.max_file_size_bytes {
                result.errors.push(ValidationError::FileTooLarge {
                    name: file.name.clone(),
                });
                continue;
            }

            result.total_size_bytes = result.total_size_bytes.saturating_add(file.size);
        }

        if result.total_size_bytes > self.config.max_total_size_bytes {
            result.errors.push(ValidationError::TotalTooLarge {
                total: result.total_size_bytes,
                max: self.config.max_total_size_bytes,
            });
        }

        log::debug!(
            "Validated {} file(s): {} error(s), {} bytes accepted",
            files.len(),
            result.errors.len(),
            result.total_size_bytes
        );

        result
    }

    /// Validate a batch that is about to be uploaded.
    ///
    /// Unlike [`FileValidator::validate`], an empty batch is rejected since
    /// there is nothing to send.
    pub fn check_upload(&self, files: &[FileCandidate]) -> Result<u64, Vec<ValidationError>> {
        if files.is_empty() {
            return Err(vec![ValidationError::NoFiles]);
        }
        let result = self.validate(files);
        if result.is_valid() {
            Ok(result.total_size_bytes)
        } else {
            Err(result.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtensionMatch, MAX_FILE_SIZE};

    const MB: u64 = 1024 * 1024;

    fn mseed_only(max_file: u64, max_total: u64) -> FileValidator {
        FileValidator::new(ValidatorConfig::exact(["mseed"], max_file, max_total))
    }

    #[test]
    fn test_empty_batch_is_valid() {
        let result = FileValidator::default().validate(&[]);
        assert!(result.is_valid());
        assert!(result.errors.is_empty());
        assert_eq!(result.total_size_bytes, 0);
    }

    #[test]
    fn test_invalid_extension_example() {
        let validator = mseed_only(500 * MB, 500 * MB);
        let result = validator.validate(&[
            FileCandidate::new("a.mseed", 100 * MB),
            FileCandidate::new("b.txt", MB),
        ]);

        assert!(!result.is_valid());
        assert_eq!(result.messages(), vec!["b.txt: invalid extension"]);
        assert_eq!(result.total_size_bytes, 100 * MB);
    }

    #[test]
    fn test_missing_extension_is_rejected() {
        let result = mseed_only(10, 10).validate(&[FileCandidate::new("station_dump", 1)]);
        assert_eq!(result.messages(), vec!["station_dump: invalid extension"]);
        assert_eq!(result.total_size_bytes, 0);
    }

    #[test]
    fn test_oversized_file_skipped_from_total() {
        let validator = mseed_only(50, 1000);
        let result = validator.validate(&[
            FileCandidate::new("ok.mseed", 40),
            FileCandidate::new("huge.mseed", 51),
            FileCandidate::new("also_ok.mseed", 50),
        ]);

        assert_eq!(result.messages(), vec!["huge.mseed: file too large"]);
        assert_eq!(result.total_size_bytes, 90);
    }

    #[test]
    fn test_bad_extension_skips_size_check() {
        // Only the extension error is reported even though the file is also too large
        let result = mseed_only(10, 10).validate(&[FileCandidate::new("big.txt", 1_000)]);
        assert_eq!(result.messages(), vec!["big.txt: invalid extension"]);
    }

    #[test]
    fn test_aggregate_limit_single_error() {
        let validator = mseed_only(60, 100);
        let result = validator.validate(&[
            FileCandidate::new("a.mseed", 60),
            FileCandidate::new("b.mseed", 60),
            FileCandidate::new("c.mseed", 60),
        ]);

        assert!(!result.is_valid());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0],
            ValidationError::TotalTooLarge { total: 180, max: 100 }
        );
    }

    #[test]
    fn test_total_equals_sum_of_accepted() {
        let validator = mseed_only(100, u64::MAX);
        let files = vec![
            FileCandidate::new("a.mseed", 10),
            FileCandidate::new("b.sac", 20),
            FileCandidate::new("c.mseed", 101),
            FileCandidate::new("d.mseed", 30),
            FileCandidate::new("e.MSEED", 5),
        ];
        let result = validator.validate(&files);

        let expected: u64 = files
            .iter()
            .filter(|f| f.extension() == "mseed" && f.size <= 100)
            .map(|f| f.size)
            .sum();
        assert_eq!(result.total_size_bytes, expected);
        assert_eq!(result.errors.len(), 3);
    }

    #[test]
    fn test_errors_keep_input_order() {
        let result = mseed_only(10, 10).validate(&[
            FileCandidate::new("z.txt", 1),
            FileCandidate::new("a.mseed", 11),
            FileCandidate::new("m.csv", 1),
        ]);
        assert_eq!(
            result.messages(),
            vec![
                "z.txt: invalid extension",
                "a.mseed: file too large",
                "m.csv: invalid extension",
            ]
        );
    }

    #[test]
    fn test_default_config_ignores_case() {
        let validator = FileValidator::default();
        assert_eq!(validator.config().extension_match, ExtensionMatch::IgnoreCase);

        let result = validator.validate(&[
            FileCandidate::new("IU.ANMO.MSEED", MB),
            FileCandidate::new("station.MiniSEED", MB),
            FileCandidate::new("x.Ms", MB),
        ]);
        assert!(result.is_valid());
        assert_eq!(result.total_size_bytes, 3 * MB);
    }

    #[test]
    fn test_default_limit_boundary() {
        let validator = FileValidator::default();
        assert!(validator.validate(&[FileCandidate::new("a.mseed", MAX_FILE_SIZE)]).is_valid());
        assert!(!validator.validate(&[FileCandidate::new("a.mseed", MAX_FILE_SIZE + 1)]).is_valid());
    }

    #[test]
    fn test_check_upload() {
        let validator = mseed_only(10, 10);
        assert_eq!(validator.check_upload(&[]), Err(vec![ValidationError::NoFiles]));
        assert_eq!(validator.check_upload(&[FileCandidate::new("a.mseed", 7)]), Ok(7));
        assert!(validator.check_upload(&[FileCandidate::new("a.txt", 7)]).is_err());
    }
}
