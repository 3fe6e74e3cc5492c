use std::fs;
use std::path::Path;
use std::sync::Arc;

use approx::assert_relative_eq;
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use spectral_vis::data::model::ExcitationLine;
use spectral_vis::data::loader::load_file;
use spectral_vis::data::selection::{apply_selection, RowSelection};
use spectral_vis::render::{self, ChartOptions};
use spectral_vis::spectrum::units::{ev_to_nm, nm_to_ev};
use spectral_vis::spectrum::{
    calculate_ensemble_spectrum, calculate_spectrum, BroadeningConfig,
};
use spectral_vis::{EnergyUnit, Error};

const TEST_CSV: &str = "\
OSC_1,E_1,OSC_2,E_2
2.324731387024224,535.2334033024443,0.1338582039901939,339.7921275832706
2.3254202650073044,534.5721631011123,0.1324517867983956,344.2004446092342
2.3256904245881542,534.1585204900409,0.1287782387852872,348.0928495923811
2.32347169021592,534.5190654229943,0.124632261404815,351.9002460125527
2.317546857557376,535.6570497138649,0.1217992646471306,355.2102598840962
2.313759333957095,537.3553305381198,0.1153079160838235,357.3967318752584
2.306754813200932,539.153330731818,0.1124660798121597,358.6130159939975
2.304996100213973,541.3104229076746,0.10904854015541,358.5564589757017
2.3049469830742444,542.3183699158157,0.1088292762912912,357.5717211186889
2.312748332557095,543.7815997207333,0.1076025081457869,355.43091251634974
";

fn write_fixture(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("test_energy.csv");
    fs::write(&path, TEST_CSV).unwrap();
    path
}

#[test]
fn csv_to_energy_spectrum() {
    let dir = tempfile::tempdir().unwrap();
    let lines = load_file(&write_fixture(dir.path())).unwrap();
    assert_eq!(lines.source_unit(), EnergyUnit::Nanometer);
    assert_eq!(lines.row_count(), 10);
    assert_eq!(lines.len(), 20);

    let curve = calculate_spectrum(&lines, "eV", 0.2, 1000).unwrap();
    assert_eq!(curve.x.len(), 1000);
    assert_eq!(curve.y.len(), 1000);

    // the strong ~537 nm band dominates
    let (peak, _) = curve.peak().unwrap();
    assert!((nm_to_ev(545.0)..nm_to_ev(530.0)).contains(&peak), "peak at {peak} eV");
}

#[test]
fn csv_to_wavelength_spectrum() {
    let dir = tempfile::tempdir().unwrap();
    let lines = load_file(&write_fixture(dir.path())).unwrap();

    let curve = calculate_spectrum(&lines, "nm", 10.0, 1000).unwrap();
    assert_eq!(curve.len(), 1000);
    let (peak, _) = curve.peak().unwrap();
    assert!((530.0..545.0).contains(&peak), "peak at {peak} nm");
    assert_relative_eq!(curve.x[0], 339.7921275832706 - 50.0, max_relative = 1e-12);
}

#[test]
fn ensemble_average_of_identical_rows_equals_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.csv");
    fs::write(&path, "f,E\n0.5,4.0\n0.5,4.0\n0.5,4.0\n").unwrap();
    let lines = load_file(&path).unwrap();
    assert_eq!(lines.source_unit(), EnergyUnit::ElectronVolt);

    let cfg = BroadeningConfig::default();
    let mean = calculate_ensemble_spectrum(&lines, &cfg).unwrap();
    let one = calculate_ensemble_spectrum(
        &apply_selection(&lines, &RowSelection::from([1])),
        &cfg,
    )
    .unwrap();
    for (a, b) in mean.y.iter().zip(&one.y) {
        assert_relative_eq!(*a, *b, max_relative = 1e-12);
    }
}

#[test]
fn render_writes_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let lines = load_file(&write_fixture(dir.path())).unwrap();
    let cfg = BroadeningConfig {
        normalize: true,
        ..BroadeningConfig::for_unit(EnergyUnit::Nanometer)
    };
    let curve = calculate_ensemble_spectrum(&lines, &cfg).unwrap();
    assert_relative_eq!(curve.max_intensity(), 1.0);

    let options = ChartOptions {
        caption: Some(render::peak_caption(&curve, cfg.sigma)),
        ..Default::default()
    };
    for name in ["spectrum.svg", "spectrum.csv", "spectrum.json"] {
        let out = dir.path().join(name);
        render::save_curve(&curve, &out, &options).unwrap();
        assert!(fs::metadata(&out).unwrap().len() > 0, "{name} is empty");
    }

    let svg = fs::read_to_string(dir.path().join("spectrum.svg")).unwrap();
    assert!(svg.contains("Wavelength [nm]"));

    let csv = fs::read_to_string(dir.path().join("spectrum.csv")).unwrap();
    assert!(csv.starts_with("wavelength_nm,intensity"));
    assert_eq!(csv.lines().count(), 1 + cfg.grid_resolution);
}

#[test]
fn malformed_table_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    fs::write(&path, "f1,E1,f2,E2\n0.1,300,0.2,250\n0.3,310,0.4\n").unwrap();
    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { row: Some(2), .. }));
}

fn write_parquet(path: &Path, columns: Vec<(&str, Vec<Option<f64>>)>) {
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Float64, true))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns
        .into_iter()
        .map(|(_, values)| Arc::new(Float64Array::from(values)) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

    let file = fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn parquet_table_loads_row_by_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lines.parquet");
    write_parquet(
        &path,
        vec![
            ("OSC_1", vec![Some(0.8), Some(0.6)]),
            ("E_1", vec![Some(400.0), Some(410.0)]),
        ],
    );

    let lines = load_file(&path).unwrap();
    assert_eq!(lines.source_unit(), EnergyUnit::Nanometer);
    assert_eq!(lines.row_count(), 2);
    assert_eq!(lines.row(0), Some(&[ExcitationLine::new(0.8, 400.0)][..]));
    assert_eq!(lines.row(1), Some(&[ExcitationLine::new(0.6, 410.0)][..]));
}

#[test]
fn parquet_null_cell_names_its_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nulls.parquet");
    write_parquet(
        &path,
        vec![
            ("OSC_1", vec![Some(0.8), Some(0.6)]),
            ("E_1", vec![Some(400.0), None]),
        ],
    );

    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { row: Some(2), .. }));
    assert!(err.to_string().contains("E_1"));
}

#[test]
fn parquet_with_odd_column_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.parquet");
    write_parquet(
        &path,
        vec![
            ("OSC_1", vec![Some(0.8)]),
            ("E_1", vec![Some(400.0)]),
            ("OSC_2", vec![Some(0.1)]),
        ],
    );

    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { row: None, .. }));
}

#[test]
fn unit_round_trip_over_a_line_set() {
    let energies = [1.5, 2.25, 3.1, 4.8, 6.02];
    for e in energies {
        assert_relative_eq!(nm_to_ev(ev_to_nm(e)), e, max_relative = 1e-9);
    }
}
