use crate::{
    deflate,
    header::SaveHeader,
    payload::PayloadCodec,
    SavError, SavErrorKind,
};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::Path,
};

/// Compresses payloads into save containers
///
/// The produced layout is the same one [`SavFile`](crate::SavFile) reads: the
/// header, then a zlib stream beginning with the `78 9c` envelope.
///
/// ```no_run
/// use palsave::SavWriter;
///
/// let gvas = std::fs::read("Level.gvas")?;
/// let header = SavWriter::new()
///     .overwrite(true)
///     .magic(0x315a_6c50)
///     .write_file("Level.sav", &gvas)?;
/// assert_eq!(header.decompressed_len() as usize, gvas.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct SavWriter {
    overwrite: bool,
    magic: i32,
    level: u8,
    atomic: bool,
}

impl Default for SavWriter {
    fn default() -> Self {
        SavWriter {
            overwrite: false,
            magic: SaveHeader::DEFAULT_MAGIC,
            level: 6,
            atomic: true,
        }
    }
}

impl SavWriter {
    pub fn new() -> Self {
        SavWriter::default()
    }

    /// Replace an existing destination file. Off by default.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// The magic written to the header. Its high byte must be `0x31` or
    /// `0x32` for the container to be readable again.
    pub fn magic(mut self, magic: i32) -> Self {
        self.magic = magic;
        self
    }

    /// Deflate compression level from 0 (store) to 9. Defaults to 6.
    pub fn compression_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    /// Stage the output in a temporary file next to the destination and
    /// rename it into place once complete. On by default.
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Compress the payload and write the container to the writer
    pub fn encode<W: Write>(&self, data: &[u8], mut writer: W) -> Result<SaveHeader, SavError> {
        if data.is_empty() {
            return Err(SavError::invalid_argument("save payload is empty"));
        }

        if self.level > 9 {
            return Err(SavError::invalid_argument(format!(
                "compression level must be between 0 and 9, got {}",
                self.level
            )));
        }

        let zlib = deflate::compress_zlib(data, self.level)?;
        let header = SaveHeader::new(
            length_field(data.len())?,
            length_field(zlib.len())?,
            self.magic,
        );

        header.write(&mut writer)?;
        writer.write_all(&zlib)?;
        writer.flush()?;
        Ok(header)
    }

    /// Compress the payload and write the container to the given path
    pub fn write_file<P: AsRef<Path>>(&self, path: P, data: &[u8]) -> Result<SaveHeader, SavError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(SavError::invalid_argument("save file path is empty"));
        }

        if data.is_empty() {
            return Err(SavError::invalid_argument("save payload is empty"));
        }

        if !self.overwrite && path.exists() {
            return Err(already_exists(path));
        }

        let header = if self.atomic {
            self.write_staged(path, data)?
        } else {
            self.write_direct(path, data)?
        };

        tracing::debug!(
            path = %path.display(),
            decompressed_len = header.decompressed_len(),
            compressed_len = header.compressed_len(),
            magic = header.magic(),
            atomic = self.atomic,
            "wrote save container"
        );

        Ok(header)
    }

    /// Encode text with an external codec and write the result as a container
    pub fn write_text<C, P>(&self, codec: C, path: P, text: &str) -> Result<SaveHeader, SavError>
    where
        C: PayloadCodec,
        P: AsRef<Path>,
    {
        if text.is_empty() {
            return Err(SavError::invalid_argument("payload text is empty"));
        }

        let data = codec
            .encode_payload(text)
            .map_err(SavErrorKind::Payload)?;
        self.write_file(path, &data)
    }

    fn write_staged(&self, path: &Path, data: &[u8]) -> Result<SaveHeader, SavError> {
        let dir = match path.parent() {
            Some(x) if !x.as_os_str().is_empty() => x,
            _ => Path::new("."),
        };

        let mut staged = staging_builder().tempfile_in(dir)?;

        // a replaced save keeps the mode of the file it replaces
        if self.overwrite {
            match fs::metadata(path) {
                Ok(existing) => staged.as_file().set_permissions(existing.permissions())?,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(SavError::from(e)),
            }
        }

        let header = self.encode(data, BufWriter::new(staged.as_file_mut()))?;
        staged.as_file().sync_all()?;

        let persisted = if self.overwrite {
            staged.persist(path)
        } else {
            staged.persist_noclobber(path)
        };

        match persisted {
            Ok(_) => Ok(header),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Err(already_exists(path)),
            Err(e) => Err(SavError::from(e.error)),
        }
    }

    fn write_direct(&self, path: &Path, data: &[u8]) -> Result<SaveHeader, SavError> {
        let mut options = OpenOptions::new();
        options.write(true);
        if self.overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let file: File = options.open(path).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => already_exists(path),
            _ => SavError::from(e),
        })?;

        self.encode(data, BufWriter::new(file))
    }
}

/// Staged files are created with the mode a freshly created file would get,
/// instead of the owner only mode temporary files default to
fn staging_builder() -> tempfile::Builder<'static, 'static> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".palsave");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder
}

fn length_field(len: usize) -> Result<i32, SavError> {
    i32::try_from(len).map_err(|_| {
        SavError::invalid_argument(format!("{} bytes does not fit in a save header", len))
    })
}

fn already_exists(path: &Path) -> SavError {
    SavError::from(SavErrorKind::AlreadyExists {
        path: path.to_path_buf(),
    })
}
