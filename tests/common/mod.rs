use std::io::{Cursor, Write};
use std::path::PathBuf;

use byteorder::{LittleEndian, WriteBytesExt};

/// Build an SPA image with the data-offset flag at `flag_at`.
pub fn spa_bytes(title: &str, max: f32, min: f32, flag_at: u64, data_offset: u16, values: &[f32]) -> Vec<u8> {
    let len = (data_offset as usize + 4 * values.len()).max(600);
    let mut cur = Cursor::new(vec![0u8; len]);
    cur.set_position(30);
    cur.write_all(title.as_bytes()).unwrap();
    cur.set_position(564);
    cur.write_i32::<LittleEndian>(values.len() as i32).unwrap();
    cur.set_position(576);
    cur.write_f32::<LittleEndian>(max).unwrap();
    cur.write_f32::<LittleEndian>(min).unwrap();
    cur.set_position(flag_at);
    cur.write_u16::<LittleEndian>(3).unwrap();
    cur.write_u16::<LittleEndian>(data_offset).unwrap();
    cur.set_position(data_offset as u64);
    for &v in values {
        cur.write_f32::<LittleEndian>(v).unwrap();
    }
    cur.into_inner()
}

/// Write `bytes` to a per-test file under the system temp directory.
pub fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("plot-plugins-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
