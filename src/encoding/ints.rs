//! # Fixed-Width Big-Endian Readers
//!
//! Every multi-byte integer in a SQLite database file is stored big-endian.
//! This module provides readers for the widths the format actually uses:
//! 8, 16, 24, 32, 48, and 64 bits, plus the IEEE-754 64-bit float used by
//! serial type 7. The 24- and 48-bit variants have no native Rust type and
//! are assembled from three and six bytes.
//!
//! All readers take the slice positioned at the value and return the
//! decoded number. A slice shorter than the requested width is a format
//! error; readers never panic on short input.
//!
//! ## Signedness
//!
//! Readers return unsigned values. Record serial types 1..6 store signed
//! two's-complement integers; sign extension for the odd widths happens in
//! the record decoder, which knows the column width.

use eyre::{ensure, Result};

pub fn read_u8(buf: &[u8]) -> Result<u8> {
    ensure!(!buf.is_empty(), "short read: need 1 byte for u8");
    Ok(buf[0])
}

pub fn read_u16(buf: &[u8]) -> Result<u16> {
    ensure!(buf.len() >= 2, "short read: need 2 bytes for u16");
    Ok(u16::from_be_bytes([buf[0], buf[1]]))
}

pub fn read_u24(buf: &[u8]) -> Result<u32> {
    ensure!(buf.len() >= 3, "short read: need 3 bytes for u24");
    Ok((buf[0] as u32) << 16 | (buf[1] as u32) << 8 | buf[2] as u32)
}

pub fn read_u32(buf: &[u8]) -> Result<u32> {
    ensure!(buf.len() >= 4, "short read: need 4 bytes for u32");
    Ok(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

pub fn read_u48(buf: &[u8]) -> Result<u64> {
    ensure!(buf.len() >= 6, "short read: need 6 bytes for u48");
    Ok((buf[0] as u64) << 40
        | (buf[1] as u64) << 32
        | (buf[2] as u64) << 24
        | (buf[3] as u64) << 16
        | (buf[4] as u64) << 8
        | buf[5] as u64)
}

pub fn read_u64(buf: &[u8]) -> Result<u64> {
    ensure!(buf.len() >= 8, "short read: need 8 bytes for u64");
    Ok(u64::from_be_bytes([
        buf[0], buf[1], buf[2], buf[3], buf[4], buf[5], buf[6], buf[7],
    ]))
}

pub fn read_f64(buf: &[u8]) -> Result<f64> {
    Ok(f64::from_bits(read_u64(buf)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_reads_first_byte() {
        assert_eq!(read_u8(&[0xAB, 0xCD]).unwrap(), 0xAB);
    }

    #[test]
    fn u16_is_big_endian() {
        assert_eq!(read_u16(&[0x12, 0x34]).unwrap(), 0x1234);
        assert_eq!(read_u16(&[0xFF, 0xFF]).unwrap(), u16::MAX);
    }

    #[test]
    fn u24_assembles_three_bytes() {
        assert_eq!(read_u24(&[0x01, 0x02, 0x03]).unwrap(), 0x010203);
        assert_eq!(read_u24(&[0xFF, 0xFF, 0xFF]).unwrap(), 0xFF_FFFF);
    }

    #[test]
    fn u32_is_big_endian() {
        assert_eq!(read_u32(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn u48_assembles_six_bytes() {
        assert_eq!(
            read_u48(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]).unwrap(),
            0x0102_0304_0506
        );
        assert_eq!(
            read_u48(&[0xFF; 6]).unwrap(),
            0xFFFF_FFFF_FFFF
        );
    }

    #[test]
    fn u64_is_big_endian() {
        assert_eq!(
            read_u64(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]).unwrap(),
            0x0102_0304_0506_0708
        );
    }

    #[test]
    fn f64_decodes_ieee754() {
        let bits = 1.5f64.to_be_bytes();
        assert_eq!(read_f64(&bits).unwrap(), 1.5);

        let bits = (-0.25f64).to_be_bytes();
        assert_eq!(read_f64(&bits).unwrap(), -0.25);
    }

    #[test]
    fn short_reads_fail() {
        assert!(read_u8(&[]).is_err());
        assert!(read_u16(&[0x01]).is_err());
        assert!(read_u24(&[0x01, 0x02]).is_err());
        assert!(read_u32(&[0x01, 0x02, 0x03]).is_err());
        assert!(read_u48(&[0x01; 5]).is_err());
        assert!(read_u64(&[0x01; 7]).is_err());
        assert!(read_f64(&[0x01; 7]).is_err());
    }

    #[test]
    fn extra_trailing_bytes_are_ignored() {
        let buf = [0x00, 0x10, 0xFF, 0xFF];
        assert_eq!(read_u16(&buf).unwrap(), 0x0010);
    }
}
