//!
//! # GDSII Writing
//!

// Std-Lib
use std::io::Write;

// Crates.io
use byteorder::{BigEndian, WriteBytesExt};

// Local imports
use crate::data::*;

/// # Record Writer
pub struct GdsWriter<'wr> {
    dest: Box<dyn Write + 'wr>,
}
impl<'wr> GdsWriter<'wr> {
    pub fn new(dest: impl Write + 'wr) -> Self {
        Self {
            dest: Box::new(dest),
        }
    }
    /// Write all records of `lib`, and flush
    pub fn write_lib(&mut self, lib: &GdsLibrary) -> GdsResult<()> {
        for record in lib.to_records() {
            self.write_record(&record)?;
        }
        self.dest.flush()?;
        Ok(())
    }
    /// Write a single [GdsRecord]
    pub fn write_record(&mut self, record: &GdsRecord) -> GdsResult<()> {
        let len = record.data.byte_len();
        let total = u16::try_from(len + 4).map_err(|_| GdsError::RecordLen(len))?;
        self.dest.write_u16::<BigEndian>(total)?;
        self.dest.write_u8(record.rtype as u8)?;
        self.dest.write_u8(record.data.dtype() as u8)?;
        match &record.data {
            GdsData::Empty => (),
            GdsData::I16(vals) => {
                for val in vals {
                    self.dest.write_i16::<BigEndian>(*val)?;
                }
            }
            GdsData::I32(vals) => {
                for val in vals {
                    self.dest.write_i32::<BigEndian>(*val)?;
                }
            }
            GdsData::F64(vals) => {
                for val in vals {
                    self.dest.write_u64::<BigEndian>(GdsFloat64::encode(*val))?;
                }
            }
            GdsData::Str(s) => {
                self.dest.write_all(s.as_bytes())?;
                if s.len() % 2 != 0 {
                    self.dest.write_u8(0)?;
                }
            }
        }
        Ok(())
    }
}
