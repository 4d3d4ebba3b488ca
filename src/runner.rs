//! Runs a conversion for each input and writes the results to stdout

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use csvconv::{ConversionConfig, Format, Settings, convert_all};
use log::{debug, info};

use crate::Args;

/// Builds the conversion config from the settings file (if any), then the CLI args
fn build_config(args: &Args) -> Result<ConversionConfig> {
    let format: Format = args.format.parse()?;
    let mut config = ConversionConfig::new(format);
    if let Some(path) = &args.settings {
        Settings::load(path)?.apply(&mut config);
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    if let Some(line_sep) = &args.line_sep {
        config.line_sep = unescape(line_sep);
    }
    if let Some(spaces) = args.spaces {
        config.indent = " ".repeat(spaces);
    }
    // flags left unset keep the value from the settings file
    if let Some(merge_headers) = flag(args.merge_headers, args.no_merge_headers) {
        config.merge_headers = merge_headers;
    }
    if let Some(assume_headers) = flag(args.assume_headers, args.infer_header) {
        config.assume_headers = assume_headers;
    }
    if let Some(typed_values) = flag(args.typed, args.no_typed) {
        config.typed_values = typed_values;
    }
    if let Some(escape_markup) = flag(args.escape, args.no_escape) {
        config.escape_markup = escape_markup;
    }
    debug!("Conversion config: {:?}", config);
    Ok(config)
}

/// Value of an option with a flag to turn it on and one to turn it off, if either is given
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Expands `\n`, `\r` and `\t` typed literally on the command line
fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\\r", "\r")
        .replace("\\t", "\t")
}

/// Reads every input file, or stdin if no files are given
fn read_inputs(files: &[PathBuf]) -> Result<Vec<String>> {
    if files.is_empty() {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read input from stdin")?;
        return Ok(vec![input]);
    }
    files
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file {}", path.display()))
        })
        .collect()
}

/// Runs csvconv
pub fn run_csvconv(args: Args) -> Result<()> {
    let config = build_config(&args)?;
    let inputs = read_inputs(&args.files)?;
    // nothing is written unless every input converts
    let results = convert_all(inputs.iter().map(String::as_str), &config)
        .context("Conversion failed, no output written")?;

    let mut stdout = io::stdout().lock();
    for (idx, result) in results.iter().enumerate() {
        if idx > 0 {
            stdout.write_all(config.line_sep.as_bytes())?;
        }
        stdout.write_all(result.text.as_bytes())?;
    }
    stdout.write_all(config.line_sep.as_bytes())?;
    stdout.flush()?;

    if let Some(result) = results.first() {
        info!(
            "Converted {} input(s) to {} ({})",
            results.len(),
            config.format,
            result.syntax
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("csvconv").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&args(&["-f", "html"])).unwrap();
        assert_eq!(config, ConversionConfig::new(Format::Html));
    }

    #[test]
    fn test_build_config_flags() {
        let config = build_config(&args(&[
            "--format",
            "json (array of rows)",
            "-d",
            ";",
            "--line-sep",
            "\\r\\n",
            "--spaces",
            "2",
            "-m",
            "-i",
            "--typed",
            "--escape",
        ]))
        .unwrap();
        assert_eq!(config.format, Format::JsonArrayOfRows);
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.line_sep, "\r\n");
        assert_eq!(config.indent, "  ");
        assert!(config.merge_headers);
        assert!(!config.assume_headers);
        assert!(config.typed_values);
        assert!(config.escape_markup);
    }

    #[test]
    fn test_flags_override_settings() {
        let path = std::env::temp_dir().join(format!("csvconv-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{"delimiter": "|", "tab_size": 8, "translate_tabs_to_spaces": true}"#)
            .unwrap();
        let config = build_config(&args(&[
            "-f",
            "xml",
            "-s",
            path.to_str().unwrap(),
            "-d",
            ":",
        ]))
        .unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.delimiter, ':');
        assert_eq!(config.indent, " ".repeat(8));
    }

    #[test]
    fn test_flags_undo_settings() {
        let path =
            std::env::temp_dir().join(format!("csvconv-negated-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{"merge_headers": true, "assume_headers": false, "typed_values": true, "escape_markup": true}"#,
        )
        .unwrap();
        let settings = path.to_str().unwrap();
        let from_file = build_config(&args(&["-f", "json", "-s", settings])).unwrap();
        let undone = build_config(&args(&[
            "-f",
            "json",
            "-s",
            settings,
            "--no-merge-headers",
            "--assume-headers",
            "--no-typed",
            "--no-escape",
        ]))
        .unwrap();
        fs::remove_file(&path).unwrap();

        assert!(from_file.merge_headers);
        assert!(!from_file.assume_headers);
        assert!(from_file.typed_values);
        assert!(from_file.escape_markup);
        assert_eq!(undone, ConversionConfig::new(Format::Json));
    }

    #[test]
    fn test_opposite_flags_conflict() {
        let argv = ["csvconv", "-f", "json", "-m", "--no-merge-headers"];
        assert!(Args::try_parse_from(argv).is_err());
        let argv = ["csvconv", "-f", "json", "-i", "--assume-headers"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_unknown_format() {
        let err = build_config(&args(&["-f", "yaml"])).unwrap_err();
        assert!(err.to_string().starts_with("Unknown format `yaml`"));
    }

    #[test]
    fn test_read_input_files() {
        let path = std::env::temp_dir().join(format!("csvconv-input-{}.csv", std::process::id()));
        fs::write(&path, "a,b\n1,2\n").unwrap();
        let inputs = read_inputs(&[path.clone()]).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(inputs, vec!["a,b\n1,2\n".to_string()]);
        assert!(read_inputs(&[PathBuf::from("/nonexistent/input.csv")]).is_err());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("\\r\\n"), "\r\n");
        assert_eq!(unescape("|"), "|");
    }
}
