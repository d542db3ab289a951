// Crates.io
use chrono::NaiveDate;

// Local Imports
use crate::data::*;
use crate::read::*;
use crate::write::*;

/// Specified creation date for test cases
fn test_dates() -> GdsDateTimes {
    let dt = NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 1))
        .unwrap();
    GdsDateTimes::at(dt)
}
fn points(pts: &[(i32, i32)]) -> Vec<GdsPoint> {
    pts.iter().map(|&(x, y)| GdsPoint::new(x, y)).collect()
}
/// Create a library with one cell holding a boundary and a path
fn sample_lib() -> GdsLibrary {
    let mut cell = GdsStruct::new("si");
    cell.dates = test_dates();
    cell.elems.push(
        GdsBoundary {
            layer: 1,
            datatype: 0,
            xy: points(&[(0, 0), (1000, 0), (1000, 1000), (0, 0)]),
        }
        .into(),
    );
    cell.elems.push(
        GdsPath {
            layer: 1,
            datatype: 0,
            xy: points(&[(0, 0), (10_000, 0), (10_000, 20_000)]),
            width: Some(5_000),
            path_type: Some(0),
        }
        .into(),
    );
    let mut lib = GdsLibrary::new("sdisk");
    lib.dates = test_dates();
    lib.structs.push(cell);
    lib
}
/// Read every record in `bytes`, through `ENDLIB`
fn read_records(bytes: &[u8]) -> GdsResult<Vec<GdsRecord>> {
    let mut rdr = GdsReader::new(bytes);
    let mut records = Vec::new();
    loop {
        let record = rdr.read_record()?;
        let done = record.rtype == GdsRecordType::EndLib;
        records.push(record);
        if done {
            return Ok(records);
        }
    }
}
#[test]
fn floats() {
    assert_eq!(GdsFloat64::encode(0.0), 0);
    assert_eq!(GdsFloat64::decode(0), 0.0);
    assert_eq!(GdsFloat64::encode(1.0), 0x4110_0000_0000_0000);
    assert_eq!(GdsFloat64::encode(-2.0), 0xC120_0000_0000_0000);
    for val in [1e-3, 1e-9, 0.1, 123.456, -7.25] {
        assert_eq!(GdsFloat64::decode(GdsFloat64::encode(val)), val);
    }
}
#[test]
fn units() {
    let units = GdsUnits::default();
    assert_eq!(units.dbu(), 1e-3);
    assert_eq!(units.db_unit(), 1e-9);
    let units = GdsUnits::new(1e-4, 1e-10);
    assert_eq!(units, GdsUnits(1e-4, 1e-10));
}
#[test]
fn header_bytes() -> GdsResult<()> {
    let bytes = sample_lib().to_bytes()?;
    // Six bytes, HEADER, two-byte integer, version 600
    assert_eq!(bytes[..6], [0x00, 0x06, 0x00, 0x02, 0x02, 0x58]);
    // Ends in ENDLIB
    assert_eq!(bytes[bytes.len() - 4..], [0x00, 0x04, 0x04, 0x00]);
    Ok(())
}
#[test]
fn record_order() -> GdsResult<()> {
    let records = read_records(&sample_lib().to_bytes()?)?;
    let types: Vec<_> = records.iter().map(|r| r.rtype).collect();
    use GdsRecordType as R;
    assert_eq!(
        types,
        vec![
            R::Header, R::BgnLib, R::LibName, R::Units, R::BgnStruct, R::StructName,
            R::Boundary, R::Layer, R::DataType, R::Xy, R::EndElement,
            R::Path, R::Layer, R::DataType, R::PathType, R::Width, R::Xy, R::EndElement,
            R::EndStruct, R::EndLib,
        ]
    );
    assert_eq!(records[3].data, GdsData::F64(vec![1e-3, 1e-9]));
    assert_eq!(records[5].data, GdsData::Str("si".into()));
    assert_eq!(records[15].data, GdsData::I32(vec![5_000]));
    assert_eq!(
        records[16].data,
        GdsData::I32(vec![0, 0, 10_000, 0, 10_000, 20_000])
    );
    Ok(())
}
#[test]
fn odd_strings_are_padded() -> GdsResult<()> {
    let mut bytes = Vec::new();
    let record = GdsRecord::new(GdsRecordType::StructName, GdsData::Str("abc".into()));
    GdsWriter::new(&mut bytes).write_record(&record)?;
    assert_eq!(bytes, [0x00, 0x08, 0x06, 0x06, b'a', b'b', b'c', 0x00]);
    assert_eq!(GdsReader::new(&bytes[..]).read_record()?, record);
    Ok(())
}
#[test]
fn roundtrips() -> GdsResult<()> {
    roundtrip(&sample_lib())?;
    roundtrip(&GdsLibrary::new("empty"))
}
#[test]
fn stats() {
    let mut lib = sample_lib();
    lib.structs.push(GdsStruct::new("empty"));
    assert_eq!(
        lib.stats(),
        GdsStats {
            libraries: 1,
            structs: 2,
            boundaries: 1,
            paths: 1,
        }
    );
}
#[test]
fn record_too_long() {
    let record = GdsRecord::new(GdsRecordType::Xy, GdsData::I32(vec![0; 20_000]));
    let mut bytes = Vec::new();
    let result = GdsWriter::new(&mut bytes).write_record(&record);
    assert!(matches!(result, Err(GdsError::RecordLen(80_000))));
}
#[test]
fn invalid_record_type() {
    let result = GdsLibrary::from_bytes(&[0x00, 0x04, 0x0C, 0x00]);
    assert!(matches!(result, Err(GdsError::InvalidRecordType(0x0C))));
}
#[test]
fn mismatched_data_type() {
    // LAYER carrying a four-byte integer
    let bytes = [0x00, 0x08, 0x0D, 0x03, 0x00, 0x00, 0x00, 0x01];
    let result = GdsReader::new(&bytes[..]).read_record();
    assert!(matches!(
        result,
        Err(GdsError::RecordDecode {
            rtype: GdsRecordType::Layer,
            dtype: GdsDataType::I32,
            len: 4
        })
    ));
}
#[test]
fn unclosed_boundary() -> GdsResult<()> {
    let mut lib = GdsLibrary::new("open");
    let mut cell = GdsStruct::new("si");
    cell.elems.push(
        GdsBoundary {
            layer: 1,
            datatype: 0,
            xy: points(&[(0, 0), (1000, 0), (1000, 1000)]),
        }
        .into(),
    );
    lib.structs.push(cell);
    let bytes = lib.to_bytes()?;
    match GdsLibrary::from_bytes(&bytes) {
        Err(GdsError::Parse { ctx, .. }) => assert_eq!(
            ctx,
            vec![GdsContext::Library, GdsContext::Struct, GdsContext::Boundary]
        ),
        other => panic!("Expected a parse error, got {:?}", other),
    }
    Ok(())
}
#[test]
fn missing_units() {
    let records = [
        GdsRecord::new(GdsRecordType::Header, GdsData::I16(vec![600])),
        GdsRecord::new(GdsRecordType::BgnLib, GdsData::I16(vec![0; 12])),
        GdsRecord::new(GdsRecordType::LibName, GdsData::Str("lib".into())),
        GdsRecord::marker(GdsRecordType::EndLib),
    ];
    let mut bytes = Vec::new();
    let mut wr = GdsWriter::new(&mut bytes);
    for record in &records {
        wr.write_record(record).unwrap();
    }
    drop(wr);
    match GdsLibrary::from_bytes(&bytes) {
        Err(GdsError::Parse { msg, recordnum, .. }) => {
            assert_eq!(msg, "missing UNITS record");
            assert_eq!(recordnum, 4);
        }
        other => panic!("Expected a parse error, got {:?}", other),
    }
}
#[test]
fn files() -> GdsResult<()> {
    let dir = tempfile::tempdir()?;
    let fname = dir.path().join("sample.gds");
    let lib = sample_lib();
    lib.write(std::fs::File::create(&fname)?)?;
    assert_eq!(GdsLibrary::open(&fname)?, lib);
    Ok(())
}
