use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// OMNIC SPA layout
// ---------------------------------------------------------------------------

const TITLE_OFFSET: u64 = 30;
const TITLE_LEN: usize = 255;
/// Where the scan for the data-offset flag starts.
const FLAG_SCAN_OFFSET: u64 = 288;
const POINT_COUNT_OFFSET: u64 = 564;
/// Max wavenumber followed by min wavenumber, both `f32`.
const WAVENUMBER_RANGE_OFFSET: u64 = 576;
/// The `u16` following this flag is the absolute offset of the intensity block.
const DATA_OFFSET_FLAG: u16 = 3;

// ---------------------------------------------------------------------------
// SpaRecord – one decoded spectrum
// ---------------------------------------------------------------------------

/// A single spectrum decoded from a Thermo Scientific OMNIC `.spa` file.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaRecord {
    /// Spectrum title with the NUL padding removed.
    pub title: String,
    pub data_point_count: usize,
    pub max_wavenumber: f32,
    pub min_wavenumber: f32,
    /// Absolute byte offset of the intensity block.
    pub data_offset: u16,
    /// Wavenumber axis, descending from `max_wavenumber` to `min_wavenumber`.
    pub wavenumbers: Vec<f64>,
    /// Intensities, index-aligned with `wavenumbers`.
    pub intensities: Vec<f64>,
}

impl SpaRecord {
    /// Open and decode the file at `path`.
    ///
    /// A file that cannot be opened gives [`Error::Io`]; a file that opens but
    /// does not decode gives [`Error::Import`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let record = Self::read(&mut reader)?;
        log::debug!(
            "Read SPA file {} ({} points, data at offset {})",
            path.display(),
            record.data_point_count,
            record.data_offset
        );
        Ok(record)
    }

    /// Decode a spectrum from a seekable stream. The stream position on entry
    /// does not matter; all reads use absolute offsets.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;

        reader.seek(SeekFrom::Start(TITLE_OFFSET))?;
        let mut raw_title = [0u8; TITLE_LEN];
        reader
            .read_exact(&mut raw_title)
            .map_err(|e| read_error("title", e))?;
        let title = decode_title(&raw_title);

        reader.seek(SeekFrom::Start(POINT_COUNT_OFFSET))?;
        let count = reader
            .read_i32::<LittleEndian>()
            .map_err(|e| read_error("data point count", e))?;
        if count <= 0 {
            return Err(Error::Import(format!("invalid data point count {count}")));
        }
        let data_point_count = count as usize;

        reader.seek(SeekFrom::Start(WAVENUMBER_RANGE_OFFSET))?;
        let max_wavenumber = reader
            .read_f32::<LittleEndian>()
            .map_err(|e| read_error("maximum wavenumber", e))?;
        let min_wavenumber = reader
            .read_f32::<LittleEndian>()
            .map_err(|e| read_error("minimum wavenumber", e))?;

        let data_offset = find_data_offset(reader)?;

        let data_end = u64::from(data_offset) + 4 * data_point_count as u64;
        if data_end > stream_len {
            return Err(Error::Import(format!(
                "data block of {data_point_count} points at offset {data_offset} \
                 runs past end of file ({stream_len} bytes)"
            )));
        }

        reader.seek(SeekFrom::Start(u64::from(data_offset)))?;
        let mut raw = vec![0f32; data_point_count];
        reader
            .read_f32_into::<LittleEndian>(&mut raw)
            .map_err(|e| read_error("intensity data", e))?;

        Ok(SpaRecord {
            title,
            data_point_count,
            max_wavenumber,
            min_wavenumber,
            data_offset,
            wavenumbers: linspace(
                f64::from(max_wavenumber),
                f64::from(min_wavenumber),
                data_point_count,
            ),
            intensities: raw.into_iter().map(f64::from).collect(),
        })
    }
}

/// Scan `u16` values from the flag area until the flag is seen; the next
/// value is the data offset.
fn find_data_offset<R: Read + Seek>(reader: &mut R) -> Result<u16> {
    reader.seek(SeekFrom::Start(FLAG_SCAN_OFFSET))?;
    loop {
        let value = reader
            .read_u16::<LittleEndian>()
            .map_err(|e| read_error("data offset flag", e))?;
        if value == DATA_OFFSET_FLAG {
            break;
        }
    }
    reader
        .read_u16::<LittleEndian>()
        .map_err(|e| read_error("data offset", e))
}

/// Running off the end of the stream means a truncated or foreign file, which
/// is a decoding problem. Anything else is a genuine I/O failure.
fn read_error(what: &str, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::Import(format!("unexpected end of file while reading {what}"))
    } else {
        Error::Io(err)
    }
}

/// Interpret the fixed-width field as 8-bit characters, dropping trailing NULs.
fn decode_title(raw: &[u8]) -> String {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    raw[..end].iter().map(|&b| char::from(b)).collect()
}

/// `n` evenly spaced values from `start` to `stop`, both ends included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = stop;
            values
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::{Cursor, Write};

    /// Lay out a minimal SPA image with the flag written at `flag_at`.
    fn synthetic(title: &[u8], max: f32, min: f32, flag_at: u64, data_offset: u16, values: &[f32]) -> Vec<u8> {
        let len = (data_offset as usize + 4 * values.len()).max(600);
        let mut cur = Cursor::new(vec![0u8; len]);
        cur.set_position(TITLE_OFFSET);
        cur.write_all(title).unwrap();
        cur.set_position(POINT_COUNT_OFFSET);
        cur.write_i32::<LittleEndian>(values.len() as i32).unwrap();
        cur.set_position(WAVENUMBER_RANGE_OFFSET);
        cur.write_f32::<LittleEndian>(max).unwrap();
        cur.write_f32::<LittleEndian>(min).unwrap();
        cur.set_position(flag_at);
        cur.write_u16::<LittleEndian>(DATA_OFFSET_FLAG).unwrap();
        cur.write_u16::<LittleEndian>(data_offset).unwrap();
        cur.set_position(data_offset as u64);
        for &v in values {
            cur.write_f32::<LittleEndian>(v).unwrap();
        }
        cur.into_inner()
    }

    #[test]
    fn locates_data_block_through_flag() {
        let buf = synthetic(b"Polystyrene", 4000.0, 2000.0, 300, 640, &[0.5, 1.5, 2.5]);
        let rec = SpaRecord::read(&mut Cursor::new(buf)).unwrap();
        assert_eq!(rec.title, "Polystyrene");
        assert_eq!(rec.data_offset, 640);
        assert_eq!(rec.intensities, vec![0.5, 1.5, 2.5]);
        assert_eq!(rec.wavenumbers, vec![4000.0, 3000.0, 2000.0]);
        assert_eq!(rec.wavenumbers.len(), rec.data_point_count);
    }

    #[test]
    fn all_nul_title_is_empty() {
        let buf = synthetic(b"", 10.0, 0.0, 288, 700, &[1.0]);
        let rec = SpaRecord::read(&mut Cursor::new(buf)).unwrap();
        assert_eq!(rec.title, "");
        assert_eq!(rec.wavenumbers, vec![10.0]);
    }

    #[test]
    fn title_keeps_high_bytes() {
        let buf = synthetic(&[b'A', 0xB5, b'm'], 1.0, 0.0, 288, 700, &[1.0, 2.0]);
        let rec = SpaRecord::read(&mut Cursor::new(buf)).unwrap();
        assert_eq!(rec.title, "A\u{b5}m");
    }

    #[test]
    fn missing_flag_is_import_error() {
        let mut buf = synthetic(b"x", 1.0, 0.0, 288, 700, &[1.0]);
        // Wipe the flag and everything after the header.
        buf[288] = 0;
        buf.truncate(600);
        let err = SpaRecord::read(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, Error::Import(_)), "{err:?}");
    }

    #[test]
    fn oversized_count_is_import_error() {
        let mut buf = synthetic(b"x", 1.0, 0.0, 288, 700, &[1.0]);
        buf[POINT_COUNT_OFFSET as usize..POINT_COUNT_OFFSET as usize + 4]
            .copy_from_slice(&i32::MAX.to_le_bytes());
        let err = SpaRecord::read(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, Error::Import(_)), "{err:?}");
    }

    #[test]
    fn non_positive_count_is_import_error() {
        let mut buf = synthetic(b"x", 1.0, 0.0, 288, 700, &[1.0]);
        buf[POINT_COUNT_OFFSET as usize..POINT_COUNT_OFFSET as usize + 4]
            .copy_from_slice(&0i32.to_le_bytes());
        let err = SpaRecord::read(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SpaRecord::from_path(Path::new("/nonexistent/dir/none.spa")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(4000.0, 400.0, 7);
        assert_eq!(v.len(), 7);
        assert_eq!(v[0], 4000.0);
        assert_eq!(v[6], 400.0);
        assert!(v.windows(2).all(|w| w[0] > w[1]));
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }
}
