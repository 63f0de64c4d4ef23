use std::io::{self, Read, Write};

/// Reads exactly four bytes as a little endian signed integer
pub(crate) fn read_i32_le<R: Read>(mut reader: R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Writes a signed integer as four little endian bytes
pub(crate) fn write_i32_le<W: Write>(mut writer: W, value: i32) -> io::Result<()> {
    writer.write_all(&value.to_le_bytes())
}
