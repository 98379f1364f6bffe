use chrono::NaiveDate;
use climbra_stations::config::RunConfig;
use climbra_stations::models::{ClimateVariable, MetRecord, Scenario};
use climbra_stations::processors::{extract_all, generate_dssat, generate_swap, validate_file};
use climbra_stations::readers::{ClimateReader, MemoryGrid, MemoryGridOpener};
use climbra_stations::utils::filename::gridded_file;
use climbra_stations::Result;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const MODEL: &str = "MIROC6";

fn write_inputs(dir: &TempDir, with_co2: bool) -> Result<RunConfig> {
    let stations_file = dir.path().join("Localidades.csv");
    fs::write(
        &stations_file,
        "ID,LATITUDE,LONGITUDE,ELEVATION_METER,STATIONNAME\n\
         1,-23.55,-46.633,760,Sao Paulo\n\
         2,-22.7,-47.63,546,Piracicaba\n",
    )?;

    let co2_dir = dir.path().join("co2");
    if with_co2 {
        fs::create_dir_all(&co2_dir)?;
        fs::write(
            co2_dir.join("atmospheric_ssp245.co2.csv"),
            "CO2year,CO2ppm\n2015,399.9\n2016,402.1\n",
        )?;
    }

    Ok(RunConfig {
        stations_file,
        gridded_dir: dir.path().join("grid"),
        co2_dir,
        extracted_dir: dir.path().join("OUTPUTS_EXTRACTED"),
        dssat_dir: dir.path().join("OUT_DSSAT_stations"),
        swap_dir: dir.path().join("OUT_SWAP_stations"),
        models: vec![MODEL.to_string()],
        scenarios: vec![Scenario::Ssp245],
        variables: ClimateVariable::ALL.to_vec(),
        workers: 1,
    })
}

/// Six days from 2014-12-30; the first two fall before the scenario start.
fn grid(variable: ClimateVariable) -> MemoryGrid {
    let start = NaiveDate::from_ymd_opt(2014, 12, 30).unwrap();
    MemoryGrid::from_fn(
        variable,
        vec![-24.0, -23.0, -22.5],
        vec![-48.0, -47.0, -46.5],
        start.iter_days().take(6).collect(),
        move |t, _, _| match variable {
            ClimateVariable::Radiation => 18.0,
            ClimateVariable::MaxTemperature => 30.0,
            ClimateVariable::MinTemperature => 20.0,
            ClimateVariable::Precipitation => match t {
                2 => 5.0,
                3 => 5.1,
                4 => -0.2,
                _ => 0.0,
            },
            ClimateVariable::Wind => 2.0,
            ClimateVariable::Humidity => {
                if t == 3 {
                    110.0
                } else {
                    50.0
                }
            }
        },
    )
}

fn opener(config: &RunConfig, variables: &[ClimateVariable]) -> MemoryGridOpener {
    let mut opener = MemoryGridOpener::new();
    for &variable in variables {
        let path = gridded_file(&config.gridded_dir, MODEL, Scenario::Ssp245, variable);
        opener.insert(path, grid(variable));
    }
    opener
}

fn first_line(path: &std::path::Path) -> Result<String> {
    Ok(fs::read_to_string(path)?
        .lines()
        .next()
        .unwrap_or_default()
        .to_string())
}

#[test]
fn test_full_pipeline() -> Result<()> {
    let dir = TempDir::new()?;
    let config = write_inputs(&dir, true)?;
    let opener = opener(&config, &ClimateVariable::ALL);

    let summaries = extract_all(&config, &opener, true)?;
    assert_eq!(summaries.len(), 1);
    let output = summaries[0].output.clone().expect("table written");
    assert!(output.ends_with("climate_2_MIROC6_ssp245.csv"));
    assert_eq!(summaries[0].rows, 8);

    assert_eq!(
        first_line(&output)?,
        "City,Latitude,Longitude,Altitude,DD,MM,YYYY,Date,rss_kJ/m2d,rss_MJ/m2/d,\
         tasmax,tasmin,pr,sfcWind,hur_%,hu_kPa,Wind_km/h,YYYYDDD,CO2ppm"
    );

    let records = ClimateReader::new().read_records(&output)?;
    let first = &records[0];
    assert_eq!(first.station, "Sao Paulo");
    assert_eq!(first.elevation, 760.0);
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
    assert_eq!(first.radiation_kj, Some(18000.0));
    assert_eq!(first.radiation_mj, Some(18.0));
    assert_eq!(first.wind_kmh, Some(7.2));
    assert_eq!(first.co2_ppm, Some(399.9));
    let vapor = first.vapor_pressure.expect("vapor pressure derived");
    assert!((vapor - 1.584).abs() < 0.001);

    // Corrections: humidity above 100 clamps, negative rain becomes zero
    assert_eq!(records[1].humidity, Some(99.9));
    assert_eq!(records[2].precipitation, Some(0.0));
    assert!(records.iter().all(|r| r.humidity.unwrap_or(0.0) <= 100.0));

    let report = validate_file(&output)?;
    assert!(report.is_clean());
    assert_eq!(report.stations, 2);

    let dssat = generate_dssat(&config, true)?;
    assert_eq!(dssat[0].written.len(), 2);
    let wth = config
        .dssat_dir
        .join(MODEL)
        .join("ssp245")
        .join("BRSPA4515.WTH");
    let text = fs::read_to_string(&wth)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "$WEATHER DATA : Sao Paulo_ssp245");
    assert!(lines[2].contains("-23.550  -46.633  760  "));
    assert_eq!(lines.len(), 4 + 4);
    assert!(lines[4].starts_with("2015001  18.0  30.0  20.0   5.0"));
    assert!(lines[4].ends_with("  50.0  399.9"));

    let swap = generate_swap(&config, true)?;
    assert_eq!(swap[0].written.len(), 2);
    let met_path = config
        .swap_dir
        .join(MODEL)
        .join("ssp245")
        .join("SaoPaussp245.met");
    let mut reader = csv::Reader::from_path(&met_path)?;
    let met = reader
        .deserialize()
        .collect::<std::result::Result<Vec<MetRecord>, csv::Error>>()?;
    assert_eq!(met.len(), 4);
    assert_eq!(met[0].station, "'SaoPaussp245'");
    assert_eq!(met[0].radiation, Some(18000.0));
    assert_eq!(met[0].et_ref, -999.0);
    // Wet flag: 5.0 mm is dry, 5.1 mm is wet
    assert_eq!(met[0].rain, Some(5.0));
    assert_eq!(met[0].wet, 0.0);
    assert_eq!(met[1].rain, Some(5.1));
    assert_eq!(met[1].wet, 1.0);
    Ok(())
}

#[test]
fn test_missing_variable_keeps_other_columns() -> Result<()> {
    let dir = TempDir::new()?;
    let config = write_inputs(&dir, false)?;
    let loaded = [
        ClimateVariable::Radiation,
        ClimateVariable::MaxTemperature,
        ClimateVariable::MinTemperature,
        ClimateVariable::Precipitation,
        ClimateVariable::Wind,
    ];
    let opener = opener(&config, &loaded);

    let summaries = extract_all(&config, &opener, true)?;
    let summary = &summaries[0];
    assert_eq!(summary.skipped, vec![ClimateVariable::Humidity]);
    assert_eq!(summary.rows, 8);

    let output = summary.output.clone().expect("table written");
    assert_eq!(
        first_line(&output)?,
        "City,Latitude,Longitude,Altitude,DD,MM,YYYY,Date,rss_kJ/m2d,rss_MJ/m2/d,\
         tasmax,tasmin,pr,sfcWind,Wind_km/h,YYYYDDD"
    );

    let records = ClimateReader::new().read_records(&output)?;
    let stations: Vec<&str> = records.iter().map(|r| r.station.as_str()).collect();
    assert_eq!(stations.iter().filter(|s| **s == "Sao Paulo").count(), 4);
    assert_eq!(stations.iter().filter(|s| **s == "Piracicaba").count(), 4);
    assert!(records.iter().all(|r| r.humidity.is_none() && r.co2_ppm.is_none()));

    // DSSAT still renders, with missing humidity and CO2
    generate_dssat(&config, true)?;
    let wth = config
        .dssat_dir
        .join(MODEL)
        .join("ssp245")
        .join("BRPIR4515.WTH");
    let text = fs::read_to_string(wth)?;
    assert!(text.lines().nth(4).unwrap_or_default().ends_with("  -99.0  -99.0"));
    Ok(())
}

#[test]
fn test_extraction_is_repeatable() -> Result<()> {
    let dir = TempDir::new()?;
    let mut config = write_inputs(&dir, true)?;
    let opener = opener(&config, &ClimateVariable::ALL);

    let output = extract_all(&config, &opener, true)?[0]
        .output
        .clone()
        .expect("table written");
    let first = fs::read(&output)?;

    let again = extract_all(&config, &opener, true)?;
    assert_eq!(fs::read(&output)?, first);
    assert_eq!(again[0].rows, 8);

    config.workers = 4;
    extract_all(&config, &opener, true)?;
    assert_eq!(fs::read(&output)?, first);
    Ok(())
}

#[test]
fn test_station_stages_skip_missing_tables() -> Result<()> {
    let dir = TempDir::new()?;
    let config = write_inputs(&dir, true)?;

    let dssat = generate_dssat(&config, true)?;
    let swap = generate_swap(&config, true)?;

    assert!(dssat[0].written.is_empty());
    assert!(swap[0].written.is_empty());
    assert!(!config.dssat_dir.exists());
    Ok(())
}
