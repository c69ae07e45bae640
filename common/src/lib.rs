use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

pub mod buffer2;
pub mod log_setup;
pub mod parallel;
pub mod shared_fn;
pub mod test_utils;

pub use shared_fn::SharedFn;

#[derive(Debug, thiserror::Error)]
pub enum FileExtensionError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileExtensionError>;

#[derive(Debug, thiserror::Error)]
pub enum SerdeFormatError {
    #[error("YAML serialization failed")]
    Yaml(#[from] serde_yml::Error),
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

pub type SerdeFormatResult<T> = Result<T, SerdeFormatError>;

pub fn get_file_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|os_str| os_str.to_str())
}

/// Text formats accepted for configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_file_name(file_name: &str) -> FileFormatResult<Self> {
        let extension = get_file_extension(file_name)
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or(FileExtensionError::MissingFileExtension)?;

        match extension.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(FileExtensionError::UnsupportedFileExtension(
                file_name.to_string(),
            )),
        }
    }
}

pub fn serialize<T: Serialize>(value: &T, format: FileFormat) -> SerdeFormatResult<String> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::to_string(value)?),
        FileFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

pub fn deserialize<T: DeserializeOwned>(
    serialized: &str,
    format: FileFormat,
) -> SerdeFormatResult<T> {
    match format {
        FileFormat::Yaml => Ok(serde_yml::from_str(serialized)?),
        FileFormat::Json => Ok(serde_json::from_str(serialized)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn file_format_from_extension() {
        assert_eq!(
            FileFormat::from_file_name("fusion.yaml").unwrap(),
            FileFormat::Yaml
        );
        assert_eq!(
            FileFormat::from_file_name("fusion.YML").unwrap(),
            FileFormat::Yaml
        );
        assert_eq!(
            FileFormat::from_file_name("fusion.json").unwrap(),
            FileFormat::Json
        );
    }

    #[test]
    fn file_format_rejects_unknown_and_missing_extension() {
        assert!(matches!(
            FileFormat::from_file_name("fusion.toml"),
            Err(FileExtensionError::UnsupportedFileExtension(_))
        ));
        assert!(matches!(
            FileFormat::from_file_name("fusion"),
            Err(FileExtensionError::MissingFileExtension)
        ));
    }

    #[test]
    fn yaml_and_json_round_trip() {
        let value = Sample {
            name: "layers".to_string(),
            count: 12,
        };
        for format in [FileFormat::Yaml, FileFormat::Json] {
            let text = serialize(&value, format).unwrap();
            let back: Sample = deserialize(&text, format).unwrap();
            assert_eq!(back, value);
        }
    }

    #[test]
    fn deserialize_reports_format_error() {
        let result: SerdeFormatResult<Sample> = deserialize("{ not json", FileFormat::Json);
        assert!(matches!(result, Err(SerdeFormatError::Json(_))));
    }
}
