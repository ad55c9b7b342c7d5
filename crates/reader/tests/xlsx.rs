use chrono::NaiveDate;
use bigdecimal::BigDecimal;
use rust_xlsxwriter::{Format, Formula as XlsxFormula, Workbook as XlsxWorkbook};
use sheetstream_reader::{HeaderMode, ReaderSettings, TypedValue, Workbook, WorkbookParser};
use std::path::Path;
use std::str::FromStr;
use tempfile::tempdir;

fn write_orders(path: &Path) {
    let mut xlsx = XlsxWorkbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let orders = xlsx.add_worksheet();
    orders.set_name("Orders").unwrap();
    for (col, name) in ["id", "item", "price", "paid", "ordered", "total"].iter().enumerate() {
        orders.write_string(0, u16::try_from(col).unwrap(), *name).unwrap();
    }
    orders.write_number(1, 0, 1.0).unwrap();
    orders.write_string(1, 1, "widget").unwrap();
    orders.write_number(1, 2, 2.5).unwrap();
    orders.write_boolean(1, 3, true).unwrap();
    orders.write_number_with_format(1, 4, 44562.0, &date_format).unwrap();
    orders
        .write_formula(1, 5, XlsxFormula::new("=C2*2").set_result("5"))
        .unwrap();
    orders.write_number(2, 0, 2.0).unwrap();
    orders.write_string(2, 1, "gadget").unwrap();

    let notes = xlsx.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "note").unwrap();
    notes.write_string(2, 0, "after a gap").unwrap();

    xlsx.save(path).unwrap();
}

fn open_parser(path: &Path, offset: &str) -> WorkbookParser {
    let settings = ReaderSettings::builder()
        .with_header(HeaderMode::WithHeader)
        .build();
    let book = Workbook::open(path).unwrap();
    WorkbookParser::new(settings, book, offset).unwrap()
}

#[test]
fn test_reads_typed_values_from_xlsx() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orders.xlsx");
    write_orders(&path);

    let mut parser = open_parser(&path, "0");
    let record = parser.parse().unwrap().unwrap();

    assert_eq!(record.offset(), "Orders::1");
    assert_eq!(record.get("id"), Some(&TypedValue::Decimal(BigDecimal::from(1))));
    assert_eq!(record.get("item"), Some(&TypedValue::Text("widget".into())));
    assert_eq!(
        record.get("price"),
        Some(&TypedValue::Decimal(BigDecimal::from_str("2.5").unwrap()))
    );
    assert_eq!(record.get("paid"), Some(&TypedValue::Boolean(true)));

    let ordered = NaiveDate::from_ymd_opt(2022, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert_eq!(record.get("ordered"), Some(&TypedValue::Date(ordered)));
    assert_eq!(record.get("total"), Some(&TypedValue::Decimal(BigDecimal::from(5))));
}

#[test]
fn test_short_rows_and_gaps_from_xlsx() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orders.xlsx");
    write_orders(&path);

    let mut parser = open_parser(&path, "0");
    parser.parse().unwrap();

    let short = parser.parse().unwrap().unwrap();
    assert_eq!(short.offset(), "Orders::2");
    assert_eq!(short.get("item"), Some(&TypedValue::Text("gadget".into())));
    assert_eq!(short.get("price"), None);

    let note = parser.parse().unwrap().unwrap();
    assert_eq!(note.offset(), "Notes::2");
    assert_eq!(note.get("note"), Some(&TypedValue::Text("after a gap".into())));

    assert!(parser.parse().unwrap().is_none());
    assert_eq!(parser.offset(), "-1");
}

#[test]
fn test_resume_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("orders.xlsx");
    write_orders(&path);

    let mut first = open_parser(&path, "0");
    first.parse().unwrap();
    let checkpoint = first.parse().unwrap().unwrap().offset().to_string();
    first.close().unwrap();

    let mut second = open_parser(&path, &checkpoint);
    let replayed = second.parse().unwrap().unwrap();
    assert_eq!(replayed.offset(), "Orders::2");
    assert_eq!(second.parse().unwrap().unwrap().offset(), "Notes::2");
    assert!(second.parse().unwrap().is_none());
}
