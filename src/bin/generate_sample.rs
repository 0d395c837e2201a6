use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{Context, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use plot_plugins::data::spa::{linspace, SpaRecord};

const TITLE: &str = "Synthetic polystyrene";
const POINTS: usize = 1000;
const MAX_WAVENUMBER: f32 = 4000.0;
const MIN_WAVENUMBER: f32 = 400.0;
/// Where the intensity block starts; just past the fixed header fields.
const DATA_OFFSET: u16 = 1024;

/// Absorption band as a Lorentzian: `(centre, half width, height)`.
struct Band(f64, f64, f64);

impl Band {
    fn at(&self, wn: f64) -> f64 {
        let Band(centre, half_width, height) = *self;
        let d = (wn - centre) / half_width;
        height / (1.0 + d * d)
    }
}

/// Sum of bands on a sloped baseline with a fixed interference ripple, so
/// repeated runs write identical files.
fn spectrum(wavenumbers: &[f64], bands: &[Band]) -> Vec<f32> {
    wavenumbers
        .iter()
        .map(|&wn| {
            let baseline = 0.02 + 1.5e-5 * (wn - f64::from(MIN_WAVENUMBER));
            let ripple = 0.002 * (wn / 37.0).sin() + 0.001 * (wn / 11.0).cos();
            let signal: f64 = bands.iter().map(|b| b.at(wn)).sum();
            (baseline + ripple + signal) as f32
        })
        .collect()
}

/// Lay out the SPA fields the importer reads. Everything else stays zero.
fn encode_spa(intensities: &[f32]) -> Result<Vec<u8>> {
    let len = DATA_OFFSET as usize + 4 * intensities.len();
    let mut cur = Cursor::new(vec![0u8; len]);

    cur.seek(SeekFrom::Start(30))?;
    cur.write_all(TITLE.as_bytes())?;

    cur.seek(SeekFrom::Start(564))?;
    cur.write_i32::<LittleEndian>(intensities.len() as i32)?;

    cur.seek(SeekFrom::Start(576))?;
    cur.write_f32::<LittleEndian>(MAX_WAVENUMBER)?;
    cur.write_f32::<LittleEndian>(MIN_WAVENUMBER)?;

    // Data-offset flag, then the offset itself.
    cur.seek(SeekFrom::Start(304))?;
    cur.write_u16::<LittleEndian>(3)?;
    cur.write_u16::<LittleEndian>(DATA_OFFSET)?;

    cur.seek(SeekFrom::Start(u64::from(DATA_OFFSET)))?;
    for &v in intensities {
        cur.write_f32::<LittleEndian>(v)?;
    }
    Ok(cur.into_inner())
}

fn write_csv(path: &Path, wavenumbers: &[f64], intensities: &[f32]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["x", "y"])?;
    for (x, y) in wavenumbers.iter().zip(intensities) {
        writer.write_record([x.to_string(), y.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let wavenumbers = linspace(f64::from(MAX_WAVENUMBER), f64::from(MIN_WAVENUMBER), POINTS);
    let bands = [
        Band(3026.0, 9.0, 0.42),
        Band(2923.0, 12.0, 0.77),
        Band(1601.0, 5.0, 0.33),
        Band(1493.0, 6.5, 0.58),
        Band(698.0, 8.0, 0.91),
    ];
    let intensities = spectrum(&wavenumbers, &bands);

    let spa_path = Path::new("sample.spa");
    let bytes = encode_spa(&intensities)?;
    let mut out = BufWriter::new(File::create(spa_path).context("creating output file")?);
    out.write_all(&bytes)?;
    out.flush()?;
    drop(out);

    // Read it back to make sure the importer agrees with what was written.
    let record = SpaRecord::from_path(spa_path).context("reading back sample.spa")?;
    log::info!(
        "Read back '{}' with {} points, data at offset {}",
        record.title,
        record.data_point_count,
        record.data_offset
    );

    let csv_path = Path::new("sample.csv");
    write_csv(csv_path, &wavenumbers, &intensities)?;

    println!(
        "Wrote {} points to {} and {}",
        record.data_point_count,
        spa_path.display(),
        csv_path.display()
    );
    Ok(())
}
