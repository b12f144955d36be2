use std::path::Path;
use serde::de::DeserializeOwned;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at JSON path {path} → {}", err.into_inner()))
        }
    }
}

/// Read a JSON file and deserialize it; both I/O and shape problems come back
/// as a message so callers can wrap them into their own error variant.
pub fn read_file_with_path<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let src = std::fs::read_to_string(path).map_err(|error| error.to_string())?;
    from_str_with_path(&src)
}
