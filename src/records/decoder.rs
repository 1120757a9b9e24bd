//! # Record Decoding
//!
//! A record is a header followed by a body. The header opens with a
//! varint giving its own total length (including that varint), then one
//! serial-type varint per column. The body holds the column values
//! back-to-back, with size and interpretation fixed by each serial type:
//!
//! | Serial type | Meaning                    | Body bytes |
//! |-------------|----------------------------|------------|
//! | 0           | NULL                       | 0          |
//! | 1..6        | signed big-endian integer  | 1,2,3,4,6,8 |
//! | 7           | IEEE-754 64-bit float      | 8          |
//! | 8, 9        | the constants 0 and 1      | 0          |
//! | 10, 11      | reserved                   | format error |
//! | even ≥ 12   | BLOB of (N-12)/2 bytes     | (N-12)/2   |
//! | odd ≥ 13    | TEXT of (N-13)/2 bytes     | (N-13)/2   |
//!
//! ## Two Entry Points
//!
//! - [`decode_record_fixed`] reads a known number of columns. The schema
//!   table bootstrap uses it: schema rows always have five columns, and
//!   trusting that count keeps the bootstrap independent of header-length
//!   arithmetic.
//! - [`decode_record`] is header-length driven: serial types are read
//!   until the bytes consumed reach the header length. User tables go
//!   through this path since their column count is only known from the
//!   schema, which may trail the stored rows (rows never shrink when
//!   columns are added).
//!
//! Both validate the invariant that the header-length varint plus the
//! serial-type varints exactly fill the declared header length.
//!
//! ## Sign Extension
//!
//! Serial types 1..6 store two's-complement integers at widths without a
//! native Rust type (24- and 48-bit). The unsigned readers from
//! [`crate::encoding`] supply the raw bits; sign extension happens here,
//! where the width is known.

use eyre::{bail, ensure, Result};

use crate::encoding::{read_f64, read_u16, read_u24, read_u32, read_u48, read_u64, read_u8, read_varint};

use super::Value;

/// A fully decoded record body.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub values: Vec<Value>,
}

fn sign_extend(raw: u64, bytes: usize) -> i64 {
    let shift = 64 - 8 * bytes as u32;
    ((raw << shift) as i64) >> shift
}

/// Decodes one value at the front of `buf`, returning it together with
/// the number of body bytes consumed.
fn decode_value(buf: &[u8], serial_type: i64) -> Result<(Value, usize)> {
    match serial_type {
        0 => Ok((Value::Null, 0)),
        1 => Ok((Value::Int(read_u8(buf)? as i8 as i64), 1)),
        2 => Ok((Value::Int(read_u16(buf)? as i16 as i64), 2)),
        3 => Ok((Value::Int(sign_extend(read_u24(buf)? as u64, 3)), 3)),
        4 => Ok((Value::Int(read_u32(buf)? as i32 as i64), 4)),
        5 => Ok((Value::Int(sign_extend(read_u48(buf)?, 6)), 6)),
        6 => Ok((Value::Int(read_u64(buf)? as i64), 8)),
        7 => Ok((Value::Float(read_f64(buf)?), 8)),
        8 => Ok((Value::Int(0), 0)),
        9 => Ok((Value::Int(1), 0)),
        10 | 11 => bail!("reserved serial type: {}", serial_type),
        n if n >= 12 => {
            let len = ((n - 12) / 2) as usize;
            ensure!(
                buf.len() >= len,
                "record body too short for serial type {}: need {} bytes, have {}",
                n,
                len,
                buf.len()
            );
            let bytes = buf[..len].to_vec();
            if n % 2 == 0 {
                Ok((Value::Blob(bytes), len))
            } else {
                Ok((Value::Text(bytes), len))
            }
        }
        n => bail!("invalid serial type: {}", n),
    }
}

fn decode_body(body: &[u8], serial_types: &[i64]) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(serial_types.len());
    let mut offset = 0;

    for &serial_type in serial_types {
        let (value, consumed) = decode_value(&body[offset..], serial_type)?;
        values.push(value);
        offset += consumed;
    }

    Ok(values)
}

fn read_header_len(buf: &[u8]) -> Result<(usize, usize)> {
    let (header_len, consumed) = read_varint(buf)?;
    ensure!(
        header_len >= consumed as i64,
        "record header length {} smaller than its own varint",
        header_len
    );
    let header_len = header_len as usize;
    ensure!(
        header_len <= buf.len(),
        "record header length {} overruns payload of {} bytes",
        header_len,
        buf.len()
    );
    Ok((header_len, consumed))
}

/// Decodes a record with a known column count. Used for schema-table
/// rows, which always carry five columns.
pub fn decode_record_fixed(buf: &[u8], column_count: usize) -> Result<Record> {
    let (header_len, mut consumed) = read_header_len(buf)?;

    let mut serial_types = Vec::with_capacity(column_count);
    for _ in 0..column_count {
        let (serial_type, n) = read_varint(&buf[consumed..header_len])?;
        consumed += n;
        serial_types.push(serial_type);
    }

    ensure!(
        consumed == header_len,
        "record header length {} does not match {} serial types ({} bytes)",
        header_len,
        column_count,
        consumed
    );

    let values = decode_body(&buf[header_len..], &serial_types)?;
    Ok(Record { values })
}

/// Decodes a record whose column count is delimited by the header's own
/// length.
pub fn decode_record(buf: &[u8]) -> Result<Record> {
    let (header_len, mut consumed) = read_header_len(buf)?;

    let mut serial_types = Vec::new();
    while consumed < header_len {
        let (serial_type, n) = read_varint(&buf[consumed..header_len])?;
        consumed += n;
        serial_types.push(serial_type);
    }

    let values = decode_body(&buf[header_len..], &serial_types)?;
    Ok(Record { values })
}
