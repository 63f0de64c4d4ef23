use crate::util::{read_i32_le, write_i32_le};
use std::io::{self, Read, Write};

/// The two zlib header bytes that must follow the save header
pub const ZLIB_HEADER: [u8; 2] = [0x78, 0x9C];

/// The compression variant selected by the high byte of the magic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// High byte `0x31` (`PlZ1`): a single zlib stream
    Zlib,

    /// High byte `0x32` (`PlZ2`). Read the same way as [`SaveFormat::Zlib`]:
    /// the payload is inflated once and no second inflate pass is performed,
    /// even though the game's tag is named for a doubly compressed stream.
    DoubleZlib,

    /// An unrecognized high byte
    Other(u8),
}

impl SaveFormat {
    /// Creates a SaveFormat from the full magic value
    pub fn from_magic(magic: i32) -> SaveFormat {
        match ((magic as u32) >> 24) as u8 {
            0x31 => SaveFormat::Zlib,
            0x32 => SaveFormat::DoubleZlib,
            x => SaveFormat::Other(x),
        }
    }

    /// Returns the magic high byte for this format
    pub fn value(&self) -> u8 {
        match self {
            SaveFormat::Zlib => 0x31,
            SaveFormat::DoubleZlib => 0x32,
            SaveFormat::Other(x) => *x,
        }
    }

    /// Returns true if the payload can be inflated by this crate
    pub fn is_supported(&self) -> bool {
        !matches!(self, SaveFormat::Other(_))
    }
}

/// The fixed size header at the start of every save container
///
/// All three fields are little endian `i32` values at offsets 0, 4, and 8.
/// The lengths are what the producer declared and are not checked against
/// the payload unless requested with
/// [`ReadOptions::strict_lengths`](crate::ReadOptions::strict_lengths).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveHeader {
    decompressed_len: i32,
    compressed_len: i32,
    magic: i32,
}

impl SaveHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = 12;

    /// The magic written when none is configured (`4321` in file order)
    pub const DEFAULT_MAGIC: i32 = 0x3132_3334;

    pub fn new(decompressed_len: i32, compressed_len: i32, magic: i32) -> Self {
        SaveHeader {
            decompressed_len,
            compressed_len,
            magic,
        }
    }

    /// Parses a header from the first 12 bytes of the slice
    pub fn from_slice(data: &[u8]) -> io::Result<Self> {
        let data: &[u8; Self::SIZE] = data
            .first_chunk()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
        Self::read(&data[..])
    }

    /// Reads the three header integers in order
    pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
        let decompressed_len = read_i32_le(&mut reader)?;
        let compressed_len = read_i32_le(&mut reader)?;
        let magic = read_i32_le(&mut reader)?;
        Ok(SaveHeader::new(decompressed_len, compressed_len, magic))
    }

    /// Writes the header in the container format
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write_i32_le(&mut writer, self.decompressed_len)?;
        write_i32_le(&mut writer, self.compressed_len)?;
        write_i32_le(&mut writer, self.magic)?;
        Ok(())
    }

    /// Declared size of the payload after decompression
    pub fn decompressed_len(&self) -> i32 {
        self.decompressed_len
    }

    /// Declared size of the compressed stream
    pub fn compressed_len(&self) -> i32 {
        self.compressed_len
    }

    pub fn magic(&self) -> i32 {
        self.magic
    }

    /// The compression variant the magic selects
    pub fn format(&self) -> SaveFormat {
        SaveFormat::from_magic(self.magic)
    }
}
