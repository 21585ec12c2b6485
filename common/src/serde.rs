use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::file_format::SerdeFormat;

pub type Result<T> = anyhow::Result<T>;

pub fn serialize<T: Serialize>(value: &T, format: SerdeFormat) -> Result<Vec<u8>> {
    let text = match format {
        SerdeFormat::Json => serde_json::to_string_pretty(value)?,
        SerdeFormat::Yaml => serde_yml::to_string(value)?,
    };
    Ok(normalize_line_endings(&text).into_bytes())
}

pub fn deserialize<T: DeserializeOwned + 'static>(
    serialized: &[u8],
    format: SerdeFormat,
) -> Result<T> {
    let text = std::str::from_utf8(serialized)?;
    match format {
        SerdeFormat::Json => Ok(serde_json::from_str(text)?),
        SerdeFormat::Yaml => Ok(serde_yml::from_str(text)?),
    }
}

/// Strips `\r` and guarantees a trailing `\n` so documents diff cleanly
/// regardless of the platform that wrote them.
fn normalize_line_endings(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n").replace('\r', "\n");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
