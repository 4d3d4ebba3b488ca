//! Settings file holding defaults for every conversion
//!
//! The file is JSON, for example:
//! ```json
//! {
//!     "delimiter": ";",
//!     "line_sep": false,
//!     "merge_headers": false,
//!     "assume_headers": true,
//!     "translate_tabs_to_spaces": true,
//!     "tab_size": 2
//! }
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::convert::{ConversionConfig, PLATFORM_NEWLINE};

/// Indent width when spaces are used and no tab size is set
const DEFAULT_TAB_SIZE: usize = 4;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid settings file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Line separator setting: an explicit string, or `false` for the platform newline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LineSep {
    Text(String),
    Platform(bool),
}

/// Values from a settings file. Unset values leave the configuration unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub delimiter: Option<char>,
    pub line_sep: Option<LineSep>,
    pub merge_headers: Option<bool>,
    pub assume_headers: Option<bool>,
    pub translate_tabs_to_spaces: Option<bool>,
    pub tab_size: Option<usize>,
    pub typed_values: Option<bool>,
    pub escape_markup: Option<bool>,
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply(&self, config: &mut ConversionConfig) {
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        match &self.line_sep {
            Some(LineSep::Text(line_sep)) => config.line_sep = line_sep.clone(),
            Some(LineSep::Platform(_)) => config.line_sep = PLATFORM_NEWLINE.to_string(),
            None => {}
        }
        if let Some(merge_headers) = self.merge_headers {
            config.merge_headers = merge_headers;
        }
        if let Some(assume_headers) = self.assume_headers {
            config.assume_headers = assume_headers;
        }
        match (self.translate_tabs_to_spaces, self.tab_size) {
            (Some(true), tab_size) => {
                config.indent = " ".repeat(tab_size.unwrap_or(DEFAULT_TAB_SIZE));
            }
            (Some(false), _) => config.indent = "\t".to_string(),
            (None, _) => {}
        }
        if let Some(typed_values) = self.typed_values {
            config.typed_values = typed_values;
        }
        if let Some(escape_markup) = self.escape_markup {
            config.escape_markup = escape_markup;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Format;

    #[test]
    fn test_apply_settings() {
        let settings = Settings::from_json(
            r#"{
                "delimiter": ";",
                "line_sep": "\r\n",
                "assume_headers": false,
                "translate_tabs_to_spaces": true,
                "tab_size": 2,
                "deselect": true
            }"#,
        )
        .unwrap();
        let mut config = ConversionConfig::new(Format::Html);
        settings.apply(&mut config);
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.line_sep, "\r\n");
        assert!(!config.assume_headers);
        assert!(!config.merge_headers);
        assert_eq!(config.indent, "  ");
    }

    #[test]
    fn test_platform_line_sep() {
        let settings = Settings::from_json(r#"{"line_sep": false}"#).unwrap();
        assert_eq!(settings.line_sep, Some(LineSep::Platform(false)));
        let mut config = ConversionConfig::new(Format::Xml);
        config.line_sep = "|".to_string();
        settings.apply(&mut config);
        assert_eq!(config.line_sep, PLATFORM_NEWLINE);
    }

    #[test]
    fn test_empty_settings_change_nothing() {
        let settings = Settings::from_json("{}").unwrap();
        let mut config = ConversionConfig::new(Format::Json);
        settings.apply(&mut config);
        assert_eq!(config, ConversionConfig::new(Format::Json));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(Settings::from_json(r#"{"delimiter": ";;"}"#).is_err());
        let err = Settings::load(Path::new("/nonexistent/csvconv.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }
}
