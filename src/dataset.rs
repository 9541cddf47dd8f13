//! Ingest, normalization, and continent tagging of a country dataset.
//!
//! A [`RawTable`] is read once per ingest and never mutated. [`NormalizedTable::from_raw`]
//! copies it into canonical keys and typed cells, and [`Dataset::from_table`] attaches a
//! continent to every row. Views operate on a [`Subset`], an ordered selection of row
//! indices into the dataset.

use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use itertools::Itertools;
use log::{debug, info};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    continent::{self, Continent},
    data::{Value, infer_value},
    error::IngestError,
    io_utils,
    schema::{CONTINENT_COLUMN, COUNTRY_COLUMN, Schema},
};

pub const DEFAULT_DATASET_NAME: &str = "population_data.csv";
const DEFAULT_DATASET: &str = include_str!("../data/population_data.csv");

/// Where an ingest reads its bytes from.
#[derive(Debug, Clone)]
pub enum Source {
    Path(PathBuf),
    /// Bytes handed over by an upload collaborator.
    Bytes { name: String, bytes: Vec<u8> },
    /// The dataset bundled with the binary.
    Default,
}

impl Source {
    pub fn from_optional_path(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Source::Path(p.to_path_buf()),
            None => Source::Default,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Source::Path(p) => format!("{p:?}"),
            Source::Bytes { name, .. } => format!("uploaded '{name}'"),
            Source::Default => format!("default dataset ({DEFAULT_DATASET_NAME})"),
        }
    }

    fn path_hint(&self) -> Option<&Path> {
        match self {
            Source::Path(p) => Some(p.as_path()),
            Source::Bytes { name, .. } => Some(Path::new(name.as_str())),
            Source::Default => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn read(source: &Source, options: &IngestOptions) -> Result<Self, IngestError> {
        let delimiter = io_utils::resolve_input_delimiter(source.path_hint(), options.delimiter);
        let text = match source {
            Source::Path(path) => {
                let bytes = io_utils::read_input_bytes(path)?;
                io_utils::decode_bytes(&bytes, options.encoding)?
            }
            Source::Bytes { bytes, .. } => io_utils::decode_bytes(bytes, options.encoding)?,
            Source::Default => DEFAULT_DATASET.to_string(),
        };
        Self::parse(&text, delimiter)
    }

    pub fn parse(text: &str, delimiter: u8) -> Result<Self, IngestError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = io_utils::open_csv_reader(text.as_bytes(), delimiter);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(IngestError::MissingHeader);
        }
        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(IngestError::OverlongRow {
                    line: record.position().map_or(0, |pos| pos.line()),
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            records.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, records })
    }
}

/// Rows of typed cells keyed by the schema's canonical column keys.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    schema: Schema,
    rows: Vec<Vec<Option<Value>>>,
}

impl NormalizedTable {
    /// Builds a normalized copy of `raw`; short rows get missing trailing cells.
    ///
    /// Fails when no `country` column survives normalization.
    pub fn from_raw(raw: &RawTable) -> Result<Self, IngestError> {
        let schema = Schema::from_headers(&raw.headers);
        if !schema.contains(COUNTRY_COLUMN) {
            return Err(IngestError::MissingCountryColumn {
                available: schema.keys().join(", "),
            });
        }
        let width = schema.len();
        let rows = raw
            .records
            .iter()
            .map(|record| {
                (0..width)
                    .map(|idx| record.get(idx).and_then(|cell| infer_value(cell)))
                    .collect()
            })
            .collect();
        Ok(Self { schema, rows })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, key: &str) -> Option<&Value> {
        let idx = self.schema.column_index(key)?;
        self.cell(row, idx)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row)?.get(column)?.as_ref()
    }

    pub fn row(&self, row: usize) -> Option<&[Option<Value>]> {
        self.rows.get(row).map(Vec::as_slice)
    }
}

/// A normalized table with exactly one continent per row.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: NormalizedTable,
    countries: Vec<String>,
    continents: Vec<Continent>,
}

impl Dataset {
    pub fn ingest(source: &Source, options: &IngestOptions) -> Result<Self, IngestError> {
        let raw = RawTable::read(source, options)?;
        info!(
            "Read {} row(s) and {} column(s) from {}",
            raw.records.len(),
            raw.headers.len(),
            source.describe()
        );
        let table = NormalizedTable::from_raw(&raw)?;
        debug!("Normalized columns: {:?}", table.schema().keys());
        Ok(Self::from_table(table))
    }

    /// Attaches continents. An existing `continent` column wins and skips classification.
    pub fn from_table(mut table: NormalizedTable) -> Self {
        let country_idx = table.schema.column_index(COUNTRY_COLUMN);
        let countries: Vec<String> = (0..table.row_count())
            .map(|row| {
                country_idx
                    .and_then(|idx| table.cell(row, idx))
                    .map(Value::as_display)
                    .unwrap_or_default()
            })
            .collect();

        let existing = table.schema.column_index(CONTINENT_COLUMN);
        let continents: Vec<Continent> = match existing {
            Some(idx) => {
                info!("Input already carries a '{CONTINENT_COLUMN}' column; skipping classification");
                let parsed: Vec<Continent> = (0..table.row_count())
                    .map(|row| {
                        table
                            .cell(row, idx)
                            .and_then(|value| Continent::from_label(&value.as_display()))
                            .unwrap_or(Continent::Other)
                    })
                    .collect();
                parsed
            }
            None => {
                let labels: Vec<Continent> = countries
                    .iter()
                    .map(|name| continent::classify(name))
                    .collect();
                let misses = labels.iter().filter(|c| **c == Continent::Other).count();
                if misses > 0 {
                    debug!("{misses} country name(s) not in the continent reference table");
                }
                table.schema.push_derived(CONTINENT_COLUMN);
                for (row, continent) in table.rows.iter_mut().zip(&labels) {
                    row.push(Some(Value::Text(continent.label().to_string())));
                }
                labels
            }
        };

        Self {
            table,
            countries,
            continents,
        }
    }

    pub fn schema(&self) -> &Schema {
        self.table.schema()
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn country(&self, row: usize) -> &str {
        self.countries.get(row).map(String::as_str).unwrap_or("")
    }

    pub fn continent(&self, row: usize) -> Continent {
        self.continents.get(row).copied().unwrap_or(Continent::Other)
    }

    /// Distinct continents present, sorted by label.
    pub fn available_continents(&self) -> Vec<Continent> {
        self.continents
            .iter()
            .copied()
            .unique()
            .sorted_by_key(|c| c.label())
            .collect()
    }

    pub fn full(&self) -> Subset<'_> {
        Subset {
            dataset: self,
            rows: (0..self.row_count()).collect(),
        }
    }

    /// Rows whose continent is one of `selected`, in table order.
    pub fn filter_continents(&self, selected: &[Continent]) -> Subset<'_> {
        let rows = (0..self.row_count())
            .filter(|row| selected.contains(&self.continent(*row)))
            .collect();
        Subset {
            dataset: self,
            rows,
        }
    }
}

/// Ordered selection of dataset rows.
#[derive(Debug, Clone)]
pub struct Subset<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> Subset<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'a>> + '_ {
        let dataset = self.dataset;
        self.rows.iter().map(move |&index| RowRef { dataset, index })
    }

    pub fn head(&self, n: usize) -> Subset<'a> {
        Subset {
            dataset: self.dataset,
            rows: self.rows.iter().copied().take(n).collect(),
        }
    }
}

/// A single row of the dataset.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> RowRef<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn country(&self) -> &'a str {
        self.dataset.country(self.index)
    }

    pub fn continent(&self) -> Continent {
        self.dataset.continent(self.index)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.dataset.table.get(self.index, key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn cells(&self) -> &'a [Option<Value>] {
        self.dataset.table.row(self.index).unwrap_or(&[])
    }

    /// Cells keyed by canonical column, in schema order.
    pub fn to_record(&self) -> PreviewRecord {
        let fields = self
            .dataset
            .schema()
            .columns
            .iter()
            .zip(self.cells())
            .map(|(column, cell)| (column.key.clone(), cell.clone()))
            .collect();
        PreviewRecord { fields }
    }
}

/// An owned row in schema order; serializes as a key-ordered map.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRecord {
    pub fields: Vec<(String, Option<Value>)>,
}

impl Serialize for PreviewRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> RawTable {
        RawTable::parse(text, b',').expect("parse csv")
    }

    #[test]
    fn from_raw_requires_country_column() {
        let err = NormalizedTable::from_raw(&raw("Nation,Population\nIndia,1\n")).unwrap_err();
        match err {
            IngestError::MissingCountryColumn { available } => {
                assert_eq!(available, "nation, population")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn from_raw_leaves_raw_table_untouched() {
        let input = raw("Country,Urban (%)\nIndia,35.9\n");
        let before = input.clone();
        let table = NormalizedTable::from_raw(&input).expect("normalize");
        assert_eq!(input, before);
        assert_eq!(table.schema().keys(), vec!["country", "urban_pct"]);
        assert_eq!(table.get(0, "urban_pct"), Some(&Value::Float(35.9)));
    }

    #[test]
    fn existing_continent_column_wins() {
        let table =
            NormalizedTable::from_raw(&raw("Country,Continent\nIndia,Europe\nAtlantis,Mars\n"))
                .expect("normalize");
        let dataset = Dataset::from_table(table);
        assert_eq!(dataset.continent(0), Continent::Europe);
        assert_eq!(dataset.continent(1), Continent::Other);
        assert_eq!(dataset.schema().len(), 2);
    }

    #[test]
    fn classification_appends_continent_column() {
        let table =
            NormalizedTable::from_raw(&raw("Country\nIndia\nAtlantis\n")).expect("normalize");
        let dataset = Dataset::from_table(table);
        assert_eq!(dataset.schema().keys(), vec!["country", "continent"]);
        let atlantis = dataset.full().rows().nth(1).expect("second row");
        assert_eq!(atlantis.get("continent"), Some(&Value::Text("Other".to_string())));
    }

    #[test]
    fn short_rows_get_missing_trailing_cells() {
        let raw = raw("Country,Population,Urban (%)\nIndia,1,35.9\nKosovo,3\n");
        assert_eq!(raw.records[1], vec!["Kosovo", "3"]);
        let table = NormalizedTable::from_raw(&raw).expect("normalize");
        assert_eq!(table.get(1, "population"), Some(&Value::Integer(3)));
        assert_eq!(table.get(1, "urban_pct"), None);
    }

    #[test]
    fn overlong_rows_are_rejected() {
        let err = RawTable::parse("Country,Population\nIndia,1,2\n", b',').unwrap_err();
        match err {
            IngestError::OverlongRow {
                line,
                expected,
                found,
            } => {
                assert_eq!((line, expected, found), (2, 2, 3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn blank_trailing_headers_do_not_abort_ingest() {
        let table = NormalizedTable::from_raw(&raw("Country,Population,,\nIndia,1,,\n"))
            .expect("normalize");
        assert_eq!(table.schema().keys(), vec!["country", "population", "", "_2"]);
        assert_eq!(table.get(0, "population"), Some(&Value::Integer(1)));
    }

    #[test]
    fn default_dataset_ingests() {
        let dataset = Dataset::ingest(&Source::Default, &IngestOptions::default()).expect("ingest");
        assert!(dataset.row_count() > 10);
        assert!(dataset.schema().contains("urban_pct"));
    }
}
