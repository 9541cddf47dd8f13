mod common;

use std::path::PathBuf;

use common::{THREE_COUNTRIES, TestWorkspace, dataset_from};
use popmap::{
    config::PipelineConfig,
    continent::Continent,
    correlation::{CorrelationView, INSUFFICIENT_METRICS_NOTICE},
    dataset::{Dataset, IngestOptions, NormalizedTable, RawTable, Source},
    error::{IngestError, SelectionError},
    geocode::{CodeResolver, GeoCode, GeoReference, IsoCountryTable, LookupError},
    hover::{HoverMetrics, build_hover_payload},
    metrics::metric_columns,
    pipeline::{GeoView, derive_views},
};

fn config_for(continents: &[Continent]) -> PipelineConfig {
    PipelineConfig {
        continents: continents.to_vec(),
        ..PipelineConfig::default()
    }
}

#[test]
fn three_row_table_filters_to_asia() {
    let raw = RawTable::parse(THREE_COUNTRIES, b',').expect("parse");
    let table = NormalizedTable::from_raw(&raw).expect("normalize");
    assert_eq!(table.schema().keys(), vec!["country", "population", "urban_pct"]);

    let dataset = Dataset::from_table(table);
    let views = derive_views(&dataset, &config_for(&[Continent::Asia]), None).expect("views");
    let preview: Vec<&str> = views.preview().rows().map(|row| row.country()).collect();
    assert_eq!(preview, vec!["India", "Japan"]);
    assert_eq!(views.metrics, vec!["population", "urban_pct"]);
    assert_eq!(views.geo, GeoView::Unavailable);
}

#[test]
fn every_row_gets_one_of_the_seven_continents() {
    let dataset = Dataset::ingest(&Source::Default, &IngestOptions::default()).expect("ingest");
    for row in dataset.full().rows() {
        assert!(Continent::ALL.contains(&row.continent()));
    }
    let kosovo = dataset
        .full()
        .rows()
        .find(|row| row.country() == "Kosovo")
        .expect("Kosovo row");
    assert_eq!(kosovo.continent(), Continent::Other);
}

#[test]
fn case_variant_country_classifies_as_other() {
    let dataset = dataset_from("Country,Population\nindia,1\nIndia,2\n");
    assert_eq!(dataset.continent(0), Continent::Other);
    assert_eq!(dataset.continent(1), Continent::Asia);
}

#[test]
fn unresolved_code_drops_row_from_map_only() {
    let dataset = dataset_from(concat!(
        "Country,Population,Urban (%)\n",
        "India,1428627663,36.3\n",
        "Laos,7633779,37.6\n",
        "Japan,123294513,94.3\n",
    ));
    let reference: &dyn GeoReference = &IsoCountryTable;
    let views = derive_views(&dataset, &config_for(&[Continent::Asia]), Some(reference))
        .expect("views");

    let preview: Vec<&str> = views.preview().rows().map(|row| row.country()).collect();
    assert_eq!(preview, vec!["India", "Laos", "Japan"]);

    let bar = views.bar.as_ref().expect("bar series");
    assert!(bar.points.iter().any(|p| p.country == "Laos" && p.value == 7633779.0));
    let line = views.line.as_ref().expect("line series");
    assert_eq!(line.points.len(), 3);

    match &views.geo {
        GeoView::Ready {
            resolved_rows,
            unresolved,
            payload,
        } => {
            assert_eq!(*resolved_rows, 2);
            assert_eq!(unresolved, &vec!["Laos".to_string()]);
            let countries: Vec<&str> = payload.points.iter().map(|p| p.country.as_str()).collect();
            assert_eq!(countries, vec!["India", "Japan"]);
            assert_eq!(payload.points[0].geo_code.as_str(), "IND");
        }
        other => panic!("expected a ready map view, got {other:?}"),
    }
}

struct FlakyReference;

impl GeoReference for FlakyReference {
    fn lookup(&self, name: &str) -> Result<GeoCode, LookupError> {
        match name {
            "India" => Ok(GeoCode::parse("IND").expect("code")),
            "Japan" => Err(LookupError::Unavailable("timeout".to_string())),
            other => Err(LookupError::NotFound(other.to_string())),
        }
    }
}

#[test]
fn lookup_service_errors_never_escape_the_resolver() {
    let dataset = dataset_from(THREE_COUNTRIES);
    let subset = dataset.filter_continents(&[Continent::Asia]);
    let reference = FlakyReference;
    let geo_rows = CodeResolver::new(&reference).geo_rows(&subset);
    assert_eq!(geo_rows.len(), 1);
    assert_eq!(geo_rows[0].row.country(), "India");
    assert_eq!(subset.len(), 2);
}

#[test]
fn hover_values_align_with_metric_order() {
    let dataset = dataset_from(THREE_COUNTRIES);
    let subset = dataset.filter_continents(&[Continent::Asia]).head(1);
    let geo_rows = CodeResolver::new(&IsoCountryTable).geo_rows(&subset);

    let forward = HoverMetrics::new("population", &["urban_pct".to_string()]);
    let payload = build_hover_payload(&geo_rows, &forward).expect("payload");
    assert_eq!(payload.metrics, vec!["population", "urban_pct"]);
    assert_eq!(payload.points[0].values, vec!["1,234,567", "55.50%"]);
    assert_eq!(payload.points[0].color_value, 1234567.0);

    let reversed = HoverMetrics::new("urban_pct", &["population".to_string()]);
    let payload = build_hover_payload(&geo_rows, &reversed).expect("payload");
    assert_eq!(payload.points[0].values, vec!["55.50%", "1,234,567"]);
    assert_eq!(payload.points[0].color_value, 55.5);
    assert!(payload.template.contains("Urban Pct: %{customdata[0]}"));
    assert!(payload.template.contains("Population: %{customdata[1]}"));
}

#[test]
fn hover_payload_keeps_every_input_row() {
    let dataset = dataset_from(THREE_COUNTRIES);
    let full = dataset.full();
    let geo_rows = CodeResolver::new(&IsoCountryTable).geo_rows(&full);
    let metrics = HoverMetrics::new("urban_pct", &["population".to_string()]);
    let payload = build_hover_payload(&geo_rows, &metrics).expect("payload");
    assert_eq!(payload.points.len(), geo_rows.len());
    assert!(payload.points.iter().all(|p| p.values.len() == 2));
}

#[test]
fn map_metric_outside_catalog_is_rejected() {
    let dataset = dataset_from("Country,Population,Note\nIndia,1,big\nJapan,2,\n");
    let config = PipelineConfig {
        map_metric: Some("note".to_string()),
        ..config_for(&[Continent::Asia])
    };
    let reference: &dyn GeoReference = &IsoCountryTable;
    let err = derive_views(&dataset, &config, Some(reference)).unwrap_err();
    assert_eq!(err, SelectionError::NotAMetric("note".to_string()));
}

#[test]
fn single_metric_degrades_correlation() {
    let dataset = dataset_from("Country,Population,Note\nIndia,1,a\nJapan,2,b\n");
    let views = derive_views(&dataset, &config_for(&[Continent::Asia]), None).expect("views");
    assert_eq!(
        views.correlation,
        CorrelationView::InsufficientMetrics {
            notice: INSUFFICIENT_METRICS_NOTICE.to_string()
        }
    );
}

#[test]
fn correlation_matrix_covers_active_metrics() {
    let dataset = dataset_from(
        "Country,Population,Urban (%),Median Age\nIndia,10,20,30\nJapan,20,40,50\nChina,30,60,20\n",
    );
    let views = derive_views(&dataset, &config_for(&[Continent::Asia]), None).expect("views");
    match views.correlation {
        CorrelationView::Matrix(matrix) => {
            assert_eq!(matrix.columns, vec!["population", "urban_pct", "median_age"]);
            let r = matrix.get("population", "urban_pct").expect("defined");
            assert!((r - 1.0).abs() < 1e-9);
            assert_eq!(matrix.get("urban_pct", "population"), Some(r));
        }
        other => panic!("expected matrix, got {other:?}"),
    }
}

#[test]
fn empty_selection_yields_no_metrics_or_charts() {
    let dataset = dataset_from(THREE_COUNTRIES);
    let views = derive_views(&dataset, &config_for(&[]), None).expect("views");
    assert!(views.subset.is_empty());
    assert!(views.metrics.is_empty());
    assert!(views.bar.is_none());
    assert!(matches!(
        views.correlation,
        CorrelationView::InsufficientMetrics { .. }
    ));
}

#[test]
fn catalog_recovers_column_once_offending_row_is_filtered() {
    let dataset = dataset_from(
        "Country,Population,Urban (%)\nIndia,1,35.9\nJapan,2,94.3\nFrance,3,n/a\n",
    );
    assert_eq!(metric_columns(&dataset.full()), vec!["population"]);
    assert_eq!(
        metric_columns(&dataset.filter_continents(&[Continent::Asia])),
        vec!["population", "urban_pct"]
    );
}

#[test]
fn missing_file_is_an_ingest_failure() {
    let workspace = TestWorkspace::new();
    let missing: PathBuf = workspace.path().join("absent.csv");
    let err = Dataset::ingest(&Source::Path(missing), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Unreadable { .. }));
}

#[test]
fn missing_country_column_is_an_ingest_failure() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("nations.csv", "Nation,Population\nIndia,1\n");
    let err = Dataset::ingest(&Source::Path(path), &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::MissingCountryColumn { .. }));
}

#[test]
fn short_row_stays_in_preview_but_drops_its_column_from_the_catalog() {
    let dataset = dataset_from("Country,Population,Urban (%)\nIndia,1,35.9\nJapan,3\n");
    let views = derive_views(&dataset, &config_for(&[Continent::Asia]), None).expect("views");
    let preview: Vec<&str> = views.preview().rows().map(|row| row.country()).collect();
    assert_eq!(preview, vec!["India", "Japan"]);
    assert_eq!(views.metrics, vec!["population"]);
}

#[test]
fn uploaded_tsv_bytes_use_tab_delimiter() {
    let source = Source::Bytes {
        name: "upload.tsv".to_string(),
        bytes: b"Country\tUrban (%)\nIndia\t35.9\n".to_vec(),
    };
    let dataset = Dataset::ingest(&source, &IngestOptions::default()).expect("ingest");
    assert_eq!(dataset.schema().keys(), vec!["country", "urban_pct", "continent"]);
}
