//!
//! # GDSII Reading
//!
//! [GdsReader] splits a byte stream into [GdsRecord]s.
//! [GdsParser] assembles those records into a [GdsLibrary] tree.
//!

// Std-Lib
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Crates.io
use byteorder::{BigEndian, ReadBytesExt};
use num_traits::FromPrimitive;

// Local imports
use crate::data::*;

/// # Record Reader
pub struct GdsReader<'rd> {
    src: Box<dyn Read + 'rd>,
}
impl<'rd> GdsReader<'rd> {
    pub fn new(src: impl Read + 'rd) -> Self {
        Self { src: Box::new(src) }
    }
    /// Read the next [GdsRecord]
    pub fn read_record(&mut self) -> GdsResult<GdsRecord> {
        let total = self.src.read_u16::<BigEndian>()?;
        if total < 4 || total % 2 != 0 {
            return Err(GdsError::RecordLen(usize::from(total)));
        }
        let len = usize::from(total - 4);
        let rbyte = self.src.read_u8()?;
        let rtype = GdsRecordType::from_u8(rbyte).ok_or(GdsError::InvalidRecordType(rbyte))?;
        let dbyte = self.src.read_u8()?;
        let dtype = GdsDataType::from_u8(dbyte).ok_or(GdsError::InvalidDataType(dbyte))?;
        let mismatch = GdsError::RecordDecode { rtype, dtype, len };
        if dtype != rtype.dtype() {
            return Err(mismatch);
        }
        let data = match dtype {
            GdsDataType::NoData if len == 0 => GdsData::Empty,
            GdsDataType::I16 if len % 2 == 0 => {
                let mut vals = vec![0; len / 2];
                self.src.read_i16_into::<BigEndian>(&mut vals)?;
                GdsData::I16(vals)
            }
            GdsDataType::I32 if len % 4 == 0 => {
                let mut vals = vec![0; len / 4];
                self.src.read_i32_into::<BigEndian>(&mut vals)?;
                GdsData::I32(vals)
            }
            GdsDataType::F64 if len % 8 == 0 => {
                let mut bits = vec![0; len / 8];
                self.src.read_u64_into::<BigEndian>(&mut bits)?;
                GdsData::F64(bits.into_iter().map(GdsFloat64::decode).collect())
            }
            GdsDataType::Str => {
                let mut bytes = vec![0; len];
                self.src.read_exact(&mut bytes)?;
                while bytes.last() == Some(&0) {
                    bytes.pop();
                }
                GdsData::Str(std::str::from_utf8(&bytes)?.to_string())
            }
            _ => return Err(mismatch),
        };
        Ok(GdsRecord::new(rtype, data))
    }
}

/// # Library Parser
pub struct GdsParser<'rd> {
    rdr: GdsReader<'rd>,
    /// Records read so far
    numread: usize,
    ctx_stack: Vec<GdsContext>,
}
impl<'rd> GdsParser<'rd> {
    pub fn new(src: impl Read + 'rd) -> Self {
        Self {
            rdr: GdsReader::new(src),
            numread: 0,
            ctx_stack: Vec::new(),
        }
    }
    /// Parser over the contents of file `fname`
    pub fn open(fname: impl AsRef<Path>) -> GdsResult<GdsParser<'rd>> {
        let file = File::open(fname)?;
        Ok(Self::new(BufReader::new(file)))
    }
    /// Parser over `bytes`
    pub fn from_bytes(bytes: &'rd [u8]) -> Self {
        Self::new(bytes)
    }
    fn next(&mut self) -> GdsResult<GdsRecord> {
        let record = self.rdr.read_record()?;
        self.numread += 1;
        Ok(record)
    }
    /// Parse a complete [GdsLibrary]
    pub fn parse_lib(&mut self) -> GdsResult<GdsLibrary> {
        self.ctx_stack.push(GdsContext::Library);
        let header = self.next()?;
        if header.rtype != GdsRecordType::Header {
            return self.unexpected(header);
        }
        let version = self.int16(header)?;
        let bgnlib = self.next()?;
        if bgnlib.rtype != GdsRecordType::BgnLib {
            return self.unexpected(bgnlib);
        }
        let dates = self.dates(bgnlib)?;

        let mut name = None;
        let mut units = None;
        let mut structs = Vec::new();
        loop {
            let record = self.next()?;
            match record.rtype {
                GdsRecordType::EndLib => break,
                GdsRecordType::LibName => name = Some(self.text(record)?),
                GdsRecordType::Units => units = Some(self.units(record)?),
                GdsRecordType::BgnStruct => {
                    let dates = self.dates(record)?;
                    structs.push(self.parse_struct(dates)?);
                }
                _ => return self.unexpected(record),
            }
        }
        let lib = GdsLibrary {
            name: self.required(name, "LIBNAME")?,
            version,
            dates,
            units: self.required(units, "UNITS")?,
            structs,
        };
        self.ctx_stack.pop();
        Ok(lib)
    }
    /// Parse a [GdsStruct], following its `BGNSTR` record
    fn parse_struct(&mut self, dates: GdsDateTimes) -> GdsResult<GdsStruct> {
        self.ctx_stack.push(GdsContext::Struct);
        let record = self.next()?;
        if record.rtype != GdsRecordType::StructName {
            return self.unexpected(record);
        }
        let mut strukt = GdsStruct {
            name: self.text(record)?,
            dates,
            elems: Vec::new(),
        };
        loop {
            let record = self.next()?;
            match record.rtype {
                GdsRecordType::EndStruct => break,
                GdsRecordType::Boundary => strukt.elems.push(self.parse_boundary()?.into()),
                GdsRecordType::Path => strukt.elems.push(self.parse_path()?.into()),
                _ => return self.unexpected(record),
            }
        }
        self.ctx_stack.pop();
        Ok(strukt)
    }
    fn parse_boundary(&mut self) -> GdsResult<GdsBoundary> {
        self.ctx_stack.push(GdsContext::Boundary);
        let (mut layer, mut datatype, mut xy) = (None, None, None);
        loop {
            let record = self.next()?;
            match record.rtype {
                GdsRecordType::EndElement => break,
                GdsRecordType::Layer => layer = Some(self.int16(record)?),
                GdsRecordType::DataType => datatype = Some(self.int16(record)?),
                GdsRecordType::Xy => xy = Some(self.points(record)?),
                _ => return self.unexpected(record),
            }
        }
        let boundary = GdsBoundary {
            layer: self.required(layer, "LAYER")?,
            datatype: self.required(datatype, "DATATYPE")?,
            xy: self.required(xy, "XY")?,
        };
        if !boundary.is_closed() {
            return self.fail("BOUNDARY is not a closed polygon");
        }
        self.ctx_stack.pop();
        Ok(boundary)
    }
    fn parse_path(&mut self) -> GdsResult<GdsPath> {
        self.ctx_stack.push(GdsContext::Path);
        let mut path = GdsPath::default();
        let (mut layer, mut datatype, mut xy) = (None, None, None);
        loop {
            let record = self.next()?;
            match record.rtype {
                GdsRecordType::EndElement => break,
                GdsRecordType::Layer => layer = Some(self.int16(record)?),
                GdsRecordType::DataType => datatype = Some(self.int16(record)?),
                GdsRecordType::PathType => path.path_type = Some(self.int16(record)?),
                GdsRecordType::Width => path.width = Some(self.int32(record)?),
                GdsRecordType::Xy => xy = Some(self.points(record)?),
                _ => return self.unexpected(record),
            }
        }
        path.layer = self.required(layer, "LAYER")?;
        path.datatype = self.required(datatype, "DATATYPE")?;
        path.xy = self.required(xy, "XY")?;
        self.ctx_stack.pop();
        Ok(path)
    }

    fn int16(&self, record: GdsRecord) -> GdsResult<i16> {
        let val = match &record.data {
            GdsData::I16(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        };
        val.map_or_else(|| self.unexpected(record), Ok)
    }
    fn int32(&self, record: GdsRecord) -> GdsResult<i32> {
        let val = match &record.data {
            GdsData::I32(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        };
        val.map_or_else(|| self.unexpected(record), Ok)
    }
    fn text(&self, record: GdsRecord) -> GdsResult<String> {
        match record.data {
            GdsData::Str(s) => Ok(s),
            data => self.unexpected(GdsRecord::new(record.rtype, data)),
        }
    }
    fn units(&self, record: GdsRecord) -> GdsResult<GdsUnits> {
        let val = match &record.data {
            GdsData::F64(v) if v.len() == 2 => Some(GdsUnits(v[0], v[1])),
            _ => None,
        };
        val.map_or_else(|| self.unexpected(record), Ok)
    }
    fn dates(&self, record: GdsRecord) -> GdsResult<GdsDateTimes> {
        let val = match &record.data {
            GdsData::I16(v) => GdsDateTimes::decode(v),
            _ => None,
        };
        val.map_or_else(|| self.unexpected(record), Ok)
    }
    fn points(&self, record: GdsRecord) -> GdsResult<Vec<GdsPoint>> {
        let val = match &record.data {
            GdsData::I32(v) => GdsPoint::parse_vec(v),
            _ => None,
        };
        val.map_or_else(|| self.unexpected(record), Ok)
    }
    fn required<T>(&self, val: Option<T>, name: &str) -> GdsResult<T> {
        match val {
            Some(v) => Ok(v),
            None => self.fail(format!("missing {} record", name)),
        }
    }
    fn unexpected<T>(&self, record: GdsRecord) -> GdsResult<T> {
        self.fail(format!("unexpected {:?} record", record.rtype))
    }
    fn fail<T>(&self, msg: impl Into<String>) -> GdsResult<T> {
        Err(GdsError::Parse {
            msg: msg.into(),
            recordnum: self.numread,
            ctx: self.ctx_stack.clone(),
        })
    }
}
