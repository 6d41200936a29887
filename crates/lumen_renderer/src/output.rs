//! Writing rendered images to disk.
//!
//! `.ppm` files are written as plain-text P3; every other extension goes
//! through the `image` crate. Both clamp each channel to 0..=255.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use lumen_math::{Color, Interval};
use thiserror::Error;

use crate::ImageBuffer;

/// Errors that can occur while saving an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode '{}'", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image buffer does not match its {0}x{1} size")]
    Size(u32, u32),
}

/// Linear color to 8-bit RGB, clamping each channel to [0, 1] first.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    color
        .to_array()
        .map(|channel| (Interval::UNIT.clamp(channel) * 255.0).round() as u8)
}

impl ImageBuffer {
    /// Packed 8-bit RGB, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels()
            .iter()
            .flat_map(|&color| color_to_rgb(color))
            .collect()
    }

    /// Write as plain-text PPM (P3), one pixel per line.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {} 255", self.width(), self.height())?;
        for &color in self.pixels() {
            let [r, g, b] = color_to_rgb(color);
            writeln!(out, "{r} {g} {b}")?;
        }
        out.flush()
    }

    /// Save to `path`, choosing the format from its extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let path = path.as_ref();
        let is_ppm = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

        if is_ppm {
            let io_err = |source| OutputError::Io {
                path: path.to_path_buf(),
                source,
            };
            let file = File::create(path).map_err(io_err)?;
            self.write_ppm(BufWriter::new(file)).map_err(io_err)?;
        } else {
            let image = image::RgbImage::from_raw(self.width(), self.height(), self.to_rgb8())
                .ok_or(OutputError::Size(self.width(), self.height()))?;
            image.save(path).map_err(|source| OutputError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        }

        log::info!("Wrote {}", path.display());
        Ok(())
    }
}
