//!
//! # Markup File Formats
//!
//! Parameter sets, records, and counters are stored as JSON, YAML, or TOML.
//! The format of each file is selected by its extension.
//!

// Std-Lib
use std::fs;
use std::io;
use std::path::Path;

// Crates.io
use serde::de::DeserializeOwned;
use serde::Serialize;

/// # Markup Formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    Json,
    Yaml,
    Toml,
}
impl SerializationFormat {
    /// Select the format for file `fname`, by extension.
    /// Anything other than `.json` and `.toml` is read as YAML.
    pub fn from_path(fname: impl AsRef<Path>) -> Self {
        let ext = fname.as_ref().extension().and_then(|e| e.to_str());
        match ext.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yml",
            Self::Toml => "toml",
        }
    }
    /// Encode `data` as text
    fn encode(&self, data: &impl Serialize) -> Result<String, Error> {
        let text = match self {
            Self::Json => serde_json::to_string_pretty(data).map_err(Error::Json)?,
            Self::Yaml => serde_yaml::to_string(data).map_err(Error::Yaml)?,
            Self::Toml => toml::to_string(data).map_err(Error::TomlEncode)?,
        };
        Ok(text)
    }
    /// Decode `text`
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, Error> {
        let data = match self {
            Self::Json => serde_json::from_str(text).map_err(Error::Json)?,
            Self::Yaml => serde_yaml::from_str(text).map_err(Error::Yaml)?,
            Self::Toml => toml::from_str(text).map_err(Error::TomlDecode)?,
        };
        Ok(data)
    }
    /// Write `data` to file `fname`, creating or truncating it
    pub fn save(&self, data: &impl Serialize, fname: impl AsRef<Path>) -> Result<(), Error> {
        fs::write(fname, self.encode(data)?)?;
        Ok(())
    }
    /// Read a `T` from file `fname`
    pub fn open<T: DeserializeOwned>(&self, fname: impl AsRef<Path>) -> Result<T, Error> {
        let text = fs::read_to_string(fname)?;
        self.decode(&text)
    }
}

/// # Markup File Errors
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    TomlEncode(toml::ser::Error),
    TomlDecode(toml::de::Error),
}
impl Error {
    /// Boolean indication of a missing file
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{}", e),
            Self::Json(e) => write!(f, "invalid JSON: {}", e),
            Self::Yaml(e) => write!(f, "invalid YAML: {}", e),
            Self::TomlEncode(e) => write!(f, "TOML encoding failed: {}", e),
            Self::TomlDecode(e) => write!(f, "invalid TOML: {}", e),
        }
    }
}
impl std::error::Error for Error {}
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
