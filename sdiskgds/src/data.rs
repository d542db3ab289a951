//!
//! # GDSII Data Model
//!
//! The library tree ([GdsLibrary] → [GdsStruct] → [GdsElement]),
//! and the flat [GdsRecord]s it is stored as.
//!

// Std-Lib
use std::io::Write;
use std::path::Path;

// Crates.io
use chrono::{Datelike, NaiveDateTime, SubsecRound, Timelike, Utc};
use derive_more::{Add, AddAssign};
use enum_dispatch::enum_dispatch;
use num_derive::FromPrimitive;

// Local imports
use crate::read::GdsParser;
use crate::write::GdsWriter;

/// # Record Types
/// Numeric codes of the records SDisk reads and writes. All others are rejected.
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdsRecordType {
    Header = 0x00,
    BgnLib = 0x01,
    LibName = 0x02,
    Units = 0x03,
    EndLib = 0x04,
    BgnStruct = 0x05,
    StructName = 0x06,
    EndStruct = 0x07,
    Boundary = 0x08,
    Path = 0x09,
    Layer = 0x0D,
    DataType = 0x0E,
    Width = 0x0F,
    Xy = 0x10,
    EndElement = 0x11,
    PathType = 0x21,
}
impl GdsRecordType {
    /// The [GdsDataType] each record type carries
    pub fn dtype(&self) -> GdsDataType {
        match self {
            Self::Header | Self::BgnLib | Self::BgnStruct => GdsDataType::I16,
            Self::Layer | Self::DataType | Self::PathType => GdsDataType::I16,
            Self::Width | Self::Xy => GdsDataType::I32,
            Self::LibName | Self::StructName => GdsDataType::Str,
            Self::Units => GdsDataType::F64,
            Self::EndLib | Self::EndStruct | Self::EndElement => GdsDataType::NoData,
            Self::Boundary | Self::Path => GdsDataType::NoData,
        }
    }
}

/// # Record Data Types
#[derive(FromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdsDataType {
    NoData = 0,
    BitArray = 1,
    I16 = 2,
    I32 = 3,
    F32 = 4,
    F64 = 5,
    Str = 6,
}

/// # Record Contents
#[derive(Debug, Clone, PartialEq)]
pub enum GdsData {
    Empty,
    I16(Vec<i16>),
    I32(Vec<i32>),
    F64(Vec<f64>),
    Str(String),
}
impl GdsData {
    pub fn dtype(&self) -> GdsDataType {
        match self {
            Self::Empty => GdsDataType::NoData,
            Self::I16(_) => GdsDataType::I16,
            Self::I32(_) => GdsDataType::I32,
            Self::F64(_) => GdsDataType::F64,
            Self::Str(_) => GdsDataType::Str,
        }
    }
    /// Encoded size in bytes. Strings are padded to an even length.
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::I16(v) => 2 * v.len(),
            Self::I32(v) => 4 * v.len(),
            Self::F64(v) => 8 * v.len(),
            Self::Str(s) => s.len() + s.len() % 2,
        }
    }
}

/// # Gds Record
#[derive(Debug, Clone, PartialEq)]
pub struct GdsRecord {
    pub rtype: GdsRecordType,
    pub data: GdsData,
}
impl GdsRecord {
    pub fn new(rtype: GdsRecordType, data: GdsData) -> Self {
        Self { rtype, data }
    }
    /// Record without content, e.g. `ENDLIB`
    pub fn marker(rtype: GdsRecordType) -> Self {
        Self::new(rtype, GdsData::Empty)
    }
    fn int16(rtype: GdsRecordType, val: i16) -> Self {
        Self::new(rtype, GdsData::I16(vec![val]))
    }
    fn text(rtype: GdsRecordType, val: &str) -> Self {
        Self::new(rtype, GdsData::Str(val.to_string()))
    }
}

/// # Gds Floating Point
///
/// GDSII reals are sign-magnitude, with a seven-bit excess-64 base-16 exponent
/// and a 56-bit fraction normalized to [1/16, 1).
pub struct GdsFloat64;
impl GdsFloat64 {
    /// Decode eight GDSII bytes, as a big-endian `u64`
    pub fn decode(val: u64) -> f64 {
        let exp = ((val >> 56) & 0x7F) as i32 - 64;
        let frac = (val & 0x00FF_FFFF_FFFF_FFFF) as f64 / 2f64.powi(56);
        let mag = frac * 16f64.powi(exp);
        if val >> 63 == 1 {
            -mag
        } else {
            mag
        }
    }
    /// Encode to eight GDSII bytes, as a big-endian `u64`.
    /// Scaling by sixteen is exact, so every finite `f64` in range round-trips.
    pub fn encode(val: f64) -> u64 {
        if val == 0.0 || !val.is_finite() {
            return 0;
        }
        let sign = if val < 0.0 { 1u64 << 63 } else { 0 };
        let mut frac = val.abs();
        let mut exp: i32 = 64;
        while frac >= 1.0 {
            frac /= 16.0;
            exp += 1;
        }
        while frac < 1.0 / 16.0 {
            frac *= 16.0;
            exp -= 1;
        }
        let bits = (frac * 2f64.powi(56)) as u64;
        sign | (((exp & 0x7F) as u64) << 56) | bits
    }
}

/// # Gds Library Units
/// `UNITS` record contents: the database unit in user units, and in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GdsUnits(pub f64, pub f64);
impl GdsUnits {
    pub fn new(dbu: f64, db_unit: f64) -> Self {
        Self(dbu, db_unit)
    }
    /// Database unit, in user units
    pub fn dbu(&self) -> f64 {
        self.0
    }
    /// Database unit, in meters
    pub fn db_unit(&self) -> f64 {
        self.1
    }
}
impl Default for GdsUnits {
    /// Micrometer user units on a nanometer grid
    fn default() -> Self {
        Self(1e-3, 1e-9)
    }
}

/// # Gds Point
/// Location in database units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GdsPoint {
    pub x: i32,
    pub y: i32,
}
impl GdsPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
    /// Pair up interleaved `XY` coordinates. `None` for an odd count.
    pub(crate) fn parse_vec(xy: &[i32]) -> Option<Vec<GdsPoint>> {
        if xy.len() % 2 != 0 {
            return None;
        }
        Some(xy.chunks_exact(2).map(|c| Self::new(c[0], c[1])).collect())
    }
    /// Interleave into `XY` coordinates
    pub(crate) fn flatten_vec(pts: &[GdsPoint]) -> Vec<i32> {
        pts.iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

/// # Gds Path
/// Open wire of `width`. `PATH LAYER DATATYPE [PATHTYPE] [WIDTH] XY`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GdsPath {
    pub layer: i16,
    pub datatype: i16,
    pub xy: Vec<GdsPoint>,
    pub width: Option<i32>,
    pub path_type: Option<i16>,
}

/// # Gds Boundary
/// Filled polygon. `BOUNDARY LAYER DATATYPE XY`
///
/// The final point repeats the first, so an N-gon holds N+1 points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GdsBoundary {
    pub layer: i16,
    pub datatype: i16,
    pub xy: Vec<GdsPoint>,
}
impl GdsBoundary {
    /// Boolean indication of a closed polygon, of at least three sides
    pub fn is_closed(&self) -> bool {
        self.xy.len() >= 4 && self.xy.first() == self.xy.last()
    }
}

/// # Gds Element
#[enum_dispatch]
#[derive(Debug, Clone, PartialEq)]
pub enum GdsElement {
    GdsBoundary(GdsBoundary),
    GdsPath(GdsPath),
}

/// # Record Flattening
#[enum_dispatch(GdsElement)]
pub trait ToRecords {
    /// Our [GdsRecord]s, in stream order
    fn to_records(&self) -> Vec<GdsRecord>;
}
impl ToRecords for GdsBoundary {
    fn to_records(&self) -> Vec<GdsRecord> {
        vec![
            GdsRecord::marker(GdsRecordType::Boundary),
            GdsRecord::int16(GdsRecordType::Layer, self.layer),
            GdsRecord::int16(GdsRecordType::DataType, self.datatype),
            GdsRecord::new(GdsRecordType::Xy, GdsData::I32(GdsPoint::flatten_vec(&self.xy))),
            GdsRecord::marker(GdsRecordType::EndElement),
        ]
    }
}
impl ToRecords for GdsPath {
    fn to_records(&self) -> Vec<GdsRecord> {
        let mut records = vec![
            GdsRecord::marker(GdsRecordType::Path),
            GdsRecord::int16(GdsRecordType::Layer, self.layer),
            GdsRecord::int16(GdsRecordType::DataType, self.datatype),
        ];
        records.extend(self.path_type.map(|t| GdsRecord::int16(GdsRecordType::PathType, t)));
        records.extend(
            self.width
                .map(|w| GdsRecord::new(GdsRecordType::Width, GdsData::I32(vec![w]))),
        );
        records.push(GdsRecord::new(
            GdsRecordType::Xy,
            GdsData::I32(GdsPoint::flatten_vec(&self.xy)),
        ));
        records.push(GdsRecord::marker(GdsRecordType::EndElement));
        records
    }
}
impl ToRecords for GdsStruct {
    fn to_records(&self) -> Vec<GdsRecord> {
        let mut records = vec![
            GdsRecord::new(GdsRecordType::BgnStruct, GdsData::I16(self.dates.encode())),
            GdsRecord::text(GdsRecordType::StructName, &self.name),
        ];
        records.extend(self.elems.iter().flat_map(|e| e.to_records()));
        records.push(GdsRecord::marker(GdsRecordType::EndStruct));
        records
    }
}
impl ToRecords for GdsLibrary {
    fn to_records(&self) -> Vec<GdsRecord> {
        let mut records = vec![
            GdsRecord::int16(GdsRecordType::Header, self.version),
            GdsRecord::new(GdsRecordType::BgnLib, GdsData::I16(self.dates.encode())),
            GdsRecord::text(GdsRecordType::LibName, &self.name),
            GdsRecord::new(GdsRecordType::Units, GdsData::F64(vec![self.units.0, self.units.1])),
        ];
        records.extend(self.structs.iter().flat_map(|s| s.to_records()));
        records.push(GdsRecord::marker(GdsRecordType::EndLib));
        records
    }
}

/// # Gds Element Counts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Add, AddAssign)]
pub struct GdsStats {
    pub libraries: usize,
    pub structs: usize,
    pub boundaries: usize,
    pub paths: usize,
}

/// # Gds Timestamp
/// Year, month, day, hour, minute, second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GdsDateTime(pub [i16; 6]);
impl GdsDateTime {
    /// The current UTC time, to the second
    pub fn now() -> Self {
        Utc::now().naive_utc().round_subsecs(0).into()
    }
}
impl From<NaiveDateTime> for GdsDateTime {
    fn from(dt: NaiveDateTime) -> Self {
        let fields = [
            dt.year(),
            dt.month() as i32,
            dt.day() as i32,
            dt.hour() as i32,
            dt.minute() as i32,
            dt.second() as i32,
        ];
        Self(fields.map(|f| f as i16))
    }
}

/// # Gds Modification & Access Times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GdsDateTimes {
    pub modified: GdsDateTime,
    pub accessed: GdsDateTime,
}
impl GdsDateTimes {
    /// Both times set to `time`
    pub fn at(time: impl Into<GdsDateTime>) -> Self {
        let time = time.into();
        Self {
            modified: time,
            accessed: time,
        }
    }
    pub(crate) fn encode(&self) -> Vec<i16> {
        [self.modified.0, self.accessed.0].concat()
    }
    /// Decode twelve values. `None` for any other count.
    pub(crate) fn decode(vals: &[i16]) -> Option<Self> {
        let modified: [i16; 6] = vals.get(..6)?.try_into().ok()?;
        let accessed: [i16; 6] = vals.get(6..)?.try_into().ok()?;
        Some(Self {
            modified: GdsDateTime(modified),
            accessed: GdsDateTime(accessed),
        })
    }
}
impl Default for GdsDateTimes {
    fn default() -> Self {
        Self::at(GdsDateTime::now())
    }
}

/// # Gds Struct (Cell)
/// `BGNSTR STRNAME {<element>}* ENDSTR`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GdsStruct {
    pub name: String,
    pub dates: GdsDateTimes,
    pub elems: Vec<GdsElement>,
}
impl GdsStruct {
    /// Create a new and empty [GdsStruct]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    fn stats(&self) -> GdsStats {
        let boundaries = self
            .elems
            .iter()
            .filter(|e| matches!(e, GdsElement::GdsBoundary(_)))
            .count();
        GdsStats {
            structs: 1,
            boundaries,
            paths: self.elems.len() - boundaries,
            ..Default::default()
        }
    }
}

/// # Gds Library
/// `HEADER BGNLIB LIBNAME UNITS {<structure>}* ENDLIB`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GdsLibrary {
    pub name: String,
    /// Stream format version
    pub version: i16,
    pub dates: GdsDateTimes,
    pub units: GdsUnits,
    pub structs: Vec<GdsStruct>,
}
impl GdsLibrary {
    /// Create a new and empty [GdsLibrary], dated now
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 600,
            ..Default::default()
        }
    }
    /// Read the library in file `fname`
    pub fn open(fname: impl AsRef<Path>) -> GdsResult<GdsLibrary> {
        GdsParser::open(fname)?.parse_lib()
    }
    /// Read a library from `bytes`
    pub fn from_bytes(bytes: &[u8]) -> GdsResult<GdsLibrary> {
        GdsParser::from_bytes(bytes).parse_lib()
    }
    /// Write to `dest`
    pub fn write(&self, dest: impl Write) -> GdsResult<()> {
        GdsWriter::new(dest).write_lib(self)
    }
    /// Encode to bytes
    pub fn to_bytes(&self) -> GdsResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(&mut bytes)?;
        Ok(bytes)
    }
    /// Count our structs and elements
    pub fn stats(&self) -> GdsStats {
        let init = GdsStats {
            libraries: 1,
            ..Default::default()
        };
        self.structs.iter().fold(init, |acc, s| acc + s.stats())
    }
}

/// # Parsing Contexts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdsContext {
    Library,
    Struct,
    Boundary,
    Path,
}

/// # [GdsError] Result Type
pub type GdsResult<T> = Result<T, GdsError>;

/// # Gds Error Enumeration
#[derive(Debug)]
pub enum GdsError {
    /// Record length invalid, or too long to encode
    RecordLen(usize),
    InvalidRecordType(u8),
    InvalidDataType(u8),
    /// Data type or length mismatched to its record type
    RecordDecode {
        rtype: GdsRecordType,
        dtype: GdsDataType,
        len: usize,
    },
    /// Records out of order, or missing
    Parse {
        msg: String,
        recordnum: usize,
        ctx: Vec<GdsContext>,
    },
    Io(std::io::Error),
    Utf8(std::str::Utf8Error),
}
impl std::fmt::Display for GdsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::RecordLen(len) => write!(f, "Invalid GDSII record length {}", len),
            Self::InvalidRecordType(t) => write!(f, "Unsupported GDSII record type {:#04x}", t),
            Self::InvalidDataType(t) => write!(f, "Invalid GDSII data type {:#04x}", t),
            Self::RecordDecode { rtype, dtype, len } => write!(
                f,
                "Cannot decode {:?} record with {:?} data of {} bytes",
                rtype, dtype, len
            ),
            Self::Parse {
                msg,
                recordnum,
                ctx,
            } => write!(f, "{} at record {} in {:?}", msg, recordnum, ctx),
            Self::Io(e) => write!(f, "{}", e),
            Self::Utf8(e) => write!(f, "{}", e),
        }
    }
}
impl std::error::Error for GdsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Utf8(e) => Some(e),
            _ => None,
        }
    }
}
impl From<std::io::Error> for GdsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<std::str::Utf8Error> for GdsError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Utf8(e)
    }
}

/// Check `lib` survives writing and reading back unchanged
#[cfg(any(test, feature = "selftest"))]
pub fn roundtrip(lib: &GdsLibrary) -> GdsResult<()> {
    let lib2 = GdsLibrary::from_bytes(&lib.to_bytes()?)?;
    assert_eq!(*lib, lib2);
    Ok(())
}
