use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FileExtensionError {
    #[error("Failed to get file extension")]
    MissingFileExtension,
    #[error("Unsupported file extension for file: {0}")]
    UnsupportedFileExtension(String),
}

pub type FileFormatResult<T> = Result<T, FileExtensionError>;

pub fn get_file_extension(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|os_str| os_str.to_str())
}

/// Text formats a document (region sets, engine configs) can be stored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SerdeFormat {
    #[default]
    Json,
    Yaml,
}

impl SerdeFormat {
    pub fn all_formats_for_testing() -> [Self; 2] {
        [Self::Json, Self::Yaml]
    }

    pub fn from_file_name(file_name: &str) -> FileFormatResult<Self> {
        let ext = get_file_extension(file_name).ok_or(FileExtensionError::MissingFileExtension)?;

        if ext.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Ok(Self::Yaml)
        } else {
            Err(FileExtensionError::UnsupportedFileExtension(
                file_name.to_string(),
            ))
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_case_insensitively() {
        assert_eq!(SerdeFormat::from_file_name("a.JSON").unwrap(), SerdeFormat::Json);
        assert_eq!(SerdeFormat::from_file_name("dir/b.yml").unwrap(), SerdeFormat::Yaml);
        assert_eq!(SerdeFormat::from_file_name("c.yaml").unwrap(), SerdeFormat::Yaml);
    }

    #[test]
    fn rejects_missing_or_unknown_extension() {
        assert!(matches!(
            SerdeFormat::from_file_name("regions"),
            Err(FileExtensionError::MissingFileExtension)
        ));
        assert!(matches!(
            SerdeFormat::from_file_name("regions.bin"),
            Err(FileExtensionError::UnsupportedFileExtension(_))
        ));
    }
}
