//! Coefficient container file format.
//!
//! A JPEG-shaped wrapper around raw quantized coefficients, so carriers can be
//! stored and exchanged without an entropy coder:
//!
//! ```text
//! FF D8              SOI
//! FF E0              APP0 style marker
//! "OGDC" 01          magic and format version
//! u8                 quality
//! u32 BE             width
//! u32 BE             height
//! u32 BE             coefficient count (multiple of 64)
//! i16 BE * count     coefficients
//! FF D9              EOI
//! ```

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::carrier::{CarrierCodec, CoefficientImage};
use crate::error::{Result, StegoError};
use crate::quality::requantize;
use crate::BLOCK_SIZE;

const SOI: [u8; 2] = [0xFF, 0xD8];
const APP0: [u8; 2] = [0xFF, 0xE0];
const EOI: [u8; 2] = [0xFF, 0xD9];
const MAGIC: &[u8; 4] = b"OGDC";
pub const FORMAT_VERSION: u8 = 1;

/// Bytes before the first coefficient.
const PREAMBLE_LEN: usize = 2 + 2 + 4 + 1 + 1 + 4 + 4 + 4;

/// Reads and writes the coefficient container.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerCodec;

impl ContainerCodec {
    pub fn new() -> Self {
        Self
    }
}

impl CarrierCodec for ContainerCodec {
    fn parse(&self, data: &[u8]) -> Result<CoefficientImage> {
        if data.len() < 2 || data[..2] != SOI {
            return Err(StegoError::invalid_input("malformed JPEG signature"));
        }
        if data.len() < PREAMBLE_LEN + EOI.len() {
            return Err(StegoError::parse(format!(
                "container truncated at {} bytes",
                data.len()
            )));
        }

        let mut reader = Cursor::new(&data[2..]);
        let mut marker = [0u8; 2];
        reader.read_exact(&mut marker).map_err(eof)?;
        if marker != APP0 {
            return Err(StegoError::parse(format!(
                "expected APP0 marker, found {:02X}{:02X}",
                marker[0], marker[1]
            )));
        }

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(eof)?;
        if &magic != MAGIC {
            return Err(StegoError::parse("not a coefficient container"));
        }
        let version = reader.read_u8().map_err(eof)?;
        if version != FORMAT_VERSION {
            return Err(StegoError::parse(format!(
                "unsupported container version {version}"
            )));
        }

        let quality = reader.read_u8().map_err(eof)?;
        let width = reader.read_u32::<BigEndian>().map_err(eof)?;
        let height = reader.read_u32::<BigEndian>().map_err(eof)?;
        let count = reader.read_u32::<BigEndian>().map_err(eof)? as usize;

        if count % BLOCK_SIZE != 0 {
            return Err(StegoError::parse(format!(
                "coefficient count {count} is not a multiple of {BLOCK_SIZE}"
            )));
        }
        if !(1..=100).contains(&quality) {
            return Err(StegoError::parse(format!("quality {quality} out of range")));
        }
        let expected_len = PREAMBLE_LEN + count * 2 + EOI.len();
        if data.len() != expected_len {
            return Err(StegoError::parse(format!(
                "expected {expected_len} bytes for {count} coefficients, found {}",
                data.len()
            )));
        }

        let mut coefficients = vec![0i16; count];
        reader
            .read_i16_into::<BigEndian>(&mut coefficients)
            .map_err(eof)?;

        reader.read_exact(&mut marker).map_err(eof)?;
        if marker != EOI {
            return Err(StegoError::parse("missing EOI marker"));
        }

        log::debug!("parsed container: {width}x{height}, q{quality}, {count} coefficients");

        Ok(CoefficientImage::new(coefficients, width, height, quality))
    }

    fn serialize(&self, image: &CoefficientImage, quality: u8) -> Result<Vec<u8>> {
        image.validate()?;
        if !(1..=100).contains(&quality) {
            return Err(StegoError::invalid_input(format!(
                "quality {quality} is outside 1..=100"
            )));
        }
        let count = u32::try_from(image.coefficients.len())
            .map_err(|_| StegoError::invalid_input("too many coefficients"))?;

        let mut coefficients = image.coefficients.clone();
        requantize(&mut coefficients, image.quality, quality);

        let mut out = Vec::with_capacity(PREAMBLE_LEN + coefficients.len() * 2 + EOI.len());
        out.extend_from_slice(&SOI);
        out.extend_from_slice(&APP0);
        out.extend_from_slice(MAGIC);
        out.write_u8(FORMAT_VERSION)?;
        out.write_u8(quality)?;
        out.write_u32::<BigEndian>(image.width)?;
        out.write_u32::<BigEndian>(image.height)?;
        out.write_u32::<BigEndian>(count)?;
        for &c in &coefficients {
            out.write_i16::<BigEndian>(c)?;
        }
        out.extend_from_slice(&EOI);

        Ok(out)
    }
}

fn eof(err: std::io::Error) -> StegoError {
    StegoError::parse(err.to_string())
}
