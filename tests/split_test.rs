mod utils;

use std::fs;

use trade_reshape::{
    Location, LocationCodes, PipelineConfig, TradeDataError, split_by_locations,
    split_in_data_root,
};
use utils::{file_names, read_trade_file, test_config, write_trade_file};

fn write_locations(path: &std::path::Path) {
    fs::write(
        path,
        "location_id,location_code,location_name_short_en,level\n\
         1,USA,United States of America,country\n\
         2,CHN,China,country\n",
    )
    .unwrap();
}

#[test]
fn rows_are_partitioned_by_location_code() -> trade_reshape::Result<()> {
    let data = tempfile::tempdir().unwrap();
    write_locations(&data.path().join("location.csv"));
    let input_rows = [
        (1, 2, 10, 2012, 1.0, 1.0),
        (2, 1, 10, 2012, 2.0, 2.0),
        (1, 3, 11, 2012, 3.0, 3.0),
        (2, 3, 12, 2013, 4.0, 4.0),
        (1, 2, 12, 2013, 5.0, 5.0),
    ];
    write_trade_file(&data.path().join("trade.csv"), &input_rows);

    let outputs = split_in_data_root("trade.csv", &test_config(data.path()))?;
    let codes: Vec<&str> = outputs.iter().map(|o| o.location_code.as_str()).collect();
    assert_eq!(codes, vec!["USA", "CHN"]);

    let usa = read_trade_file(&data.path().join("USA/USA_trade.csv"));
    let chn = read_trade_file(&data.path().join("CHN/CHN_trade.csv"));
    assert_eq!(usa.len(), 3);
    assert_eq!(chn.len(), 2);
    assert!(usa.iter().all(|r| r.location_id == 1));
    assert!(chn.iter().all(|r| r.location_id == 2));
    assert_eq!(usa.len() + chn.len(), input_rows.len());
    let usa_partners: Vec<i64> = usa.iter().map(|r| r.partner_id).collect();
    assert_eq!(usa_partners, vec![2, 3, 2]);

    // input is kept
    assert!(data.path().join("trade.csv").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn location_directories_are_world_readable() -> trade_reshape::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let data = tempfile::tempdir().unwrap();
    let input = data.path().join("t.csv");
    write_trade_file(&input, &[(1, 2, 10, 2012, 1.0, 1.0)]);
    let codes = LocationCodes::new(&[Location::new(1, "USA")]);

    split_by_locations(&input, data.path(), &codes, true)?;
    let mode = fs::metadata(data.path().join("USA")).unwrap().permissions().mode();
    // umask may clear bits but never add them
    assert_eq!(mode & 0o022, 0);
    assert_eq!(mode & 0o700, 0o700);
    Ok(())
}

#[test]
fn unknown_location_fails_without_writing() {
    let data = tempfile::tempdir().unwrap();
    let input = data.path().join("t.csv");
    write_trade_file(&input, &[(1, 2, 10, 2012, 1.0, 1.0), (9, 2, 10, 2012, 1.0, 1.0)]);
    let codes = LocationCodes::new(&[Location::new(1, "USA")]);

    let result = split_by_locations(&input, data.path(), &codes, true);
    assert!(matches!(result, Err(TradeDataError::Lookup(_))));
    assert!(!data.path().join("USA").exists());
    assert_eq!(file_names(data.path()), vec!["t.csv"]);
}

#[test]
fn existing_location_directory_is_reused() -> trade_reshape::Result<()> {
    let data = tempfile::tempdir().unwrap();
    write_locations(&data.path().join("refs.csv"));
    fs::create_dir(data.path().join("CHN")).unwrap();
    write_trade_file(&data.path().join("x.csv"), &[(2, 1, 10, 2012, 1.0, 1.0)]);

    let config = PipelineConfig {
        location_file: Some(data.path().join("refs.csv")),
        write_index: false,
        ..test_config(data.path())
    };
    let outputs = split_in_data_root("x.csv", &config)?;
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].rows, 1);

    let text = fs::read_to_string(data.path().join("CHN/CHN_x.csv")).unwrap();
    assert!(text.starts_with("location_id,"));
    Ok(())
}
