mod utils;

use std::fs;

use trade_reshape::{TradeDataError, convert_to_csv};
use utils::{TRADE_HEADER, read_trade_file};

#[test]
fn keeps_one_year_and_projects_fixed_columns() -> trade_reshape::Result<()> {
    let data = tempfile::tempdir().unwrap();
    let input = data.path().join("all_years.csv");
    fs::write(
        &input,
        "year,location_id,location_code,partner_id,product_id,export_value,import_value,hs_eci\n\
         2011,1,USA,2,10,1.5,2.5,0.3\n\
         2012,1,USA,2,10,3.5,,0.4\n\
         2012,1,USA,3,11,4,5,0.4\n",
    )
    .unwrap();
    let output = data.path().join("usa_hs2_2012.csv");

    let written = convert_to_csv(&input, 2012, &output, true)?;
    assert_eq!(written, 2);

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().next().unwrap(), format!(",{TRADE_HEADER}"));
    let rows = read_trade_file(&output);
    assert!(rows.iter().all(|r| r.year == 2012));
    assert_eq!(rows[0].import_value, None);
    assert_eq!(rows[1].export_value, Some(4.0));
    Ok(())
}

#[test]
fn year_without_rows_writes_header_only() -> trade_reshape::Result<()> {
    let data = tempfile::tempdir().unwrap();
    let input = data.path().join("in.csv");
    fs::write(&input, format!("{TRADE_HEADER}\n1,2,10,2011,1,1\n")).unwrap();
    let output = data.path().join("out.csv");

    assert_eq!(convert_to_csv(&input, 1999, &output, false)?, 0);
    assert_eq!(fs::read_to_string(&output).unwrap(), format!("{TRADE_HEADER}\n"));
    Ok(())
}

#[test]
fn unsupported_inputs_are_rejected() {
    let data = tempfile::tempdir().unwrap();
    let output = data.path().join("out.csv");

    let dta = data.path().join("in.dta");
    fs::write(&dta, b"\x00binary").unwrap();
    assert!(matches!(
        convert_to_csv(&dta, 2012, &output, true),
        Err(TradeDataError::UnsupportedFormat { .. })
    ));

    let parquet = data.path().join("in.parquet");
    assert!(matches!(
        convert_to_csv(&parquet, 2012, &output, true),
        Err(TradeDataError::UnsupportedFormat { .. })
    ));
    assert!(!output.exists());
}

#[test]
fn missing_year_column_is_a_schema_error() {
    let data = tempfile::tempdir().unwrap();
    let input = data.path().join("in.csv");
    fs::write(
        &input,
        "location_id,partner_id,product_id,export_value,import_value\n1,2,3,4,5\n",
    )
    .unwrap();

    match convert_to_csv(&input, 2012, &data.path().join("out.csv"), true) {
        Err(TradeDataError::Schema { missing, .. }) => assert_eq!(missing, vec!["year"]),
        other => panic!("expected schema error, got {other:?}"),
    }
}
