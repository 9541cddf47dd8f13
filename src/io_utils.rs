//! I/O helpers for reading datasets and writing exports.
//!
//! - **Delimiter resolution**: `.tsv` inputs default to tab, everything else to
//!   comma, unless the caller overrides it.
//! - **Encoding**: input bytes are decoded through `encoding_rs`, defaulting to UTF-8.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::error::IngestError;

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, IngestError> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| IngestError::UnknownEncoding(value.to_string())),
        None => Ok(UTF_8),
    }
}

pub fn resolve_input_delimiter(path: Option<&Path>, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Reads the whole input; datasets are held in memory for one ingest cycle.
pub fn read_input_bytes(path: &Path) -> Result<Vec<u8>, IngestError> {
    let mut buf = Vec::new();
    let outcome = if is_dash(path) {
        io::stdin().lock().read_to_end(&mut buf)
    } else {
        File::open(path).and_then(|mut file| file.read_to_end(&mut buf))
    };
    outcome.map_err(|source| IngestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(buf)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String, IngestError> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(IngestError::Undecodable {
            encoding: encoding.name(),
        })
    } else {
        Ok(text.into_owned())
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .trim(csv::Trim::None)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn open_csv_writer(path: Option<&Path>, delimiter: u8) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout()),
    };
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    Ok(builder.from_writer(sink))
}

/// Writes `contents` to `path`, or stdout when no path (or `-`) is given.
pub fn write_text(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(p) if !is_dash(p) => {
            let file = File::create(p).with_context(|| format!("Creating output file {p:?}"))?;
            let mut file = BufWriter::new(file);
            file.write_all(contents.as_bytes())?;
            file.flush()?;
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn tsv_extension_selects_tab() {
        let path = PathBuf::from("world.TSV");
        assert_eq!(resolve_input_delimiter(Some(&path), None), b'\t');
        assert_eq!(resolve_input_delimiter(Some(&path), Some(b';')), b';');
        assert_eq!(resolve_input_delimiter(None, None), b',');
    }

    #[test]
    fn decode_bytes_reports_invalid_utf8() {
        let err = decode_bytes(&[0xff, 0xfe, 0x41], UTF_8).unwrap_err();
        assert!(matches!(err, IngestError::Undecodable { .. }));
    }

    #[test]
    fn resolve_encoding_accepts_labels() {
        let latin = resolve_encoding(Some("latin1")).expect("latin1 label");
        assert_eq!(latin.name(), "windows-1252");
        assert!(resolve_encoding(Some("klingon")).is_err());
    }
}
