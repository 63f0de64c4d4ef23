use crate::{
    deflate,
    header::{SaveHeader, ZLIB_HEADER},
    payload::{PayloadCodec, TypeHints},
    SavError, SavErrorKind, SaveFormat, SavWriter,
};
use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

/// Customizes how a save container is read
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    strict_lengths: bool,
    max_decompressed_len: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            strict_lengths: false,
            max_decompressed_len: usize::MAX,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        ReadOptions::default()
    }

    /// Fail with [`SavErrorKind::LengthMismatch`] when the inflated payload
    /// size differs from the length declared in the header. Off by default
    /// as the declared length is advisory.
    pub fn strict_lengths(mut self, strict: bool) -> Self {
        self.strict_lengths = strict;
        self
    }

    /// Fail with [`SavErrorKind::PayloadTooLarge`] instead of inflating more
    /// than this many bytes. Unlimited by default. With
    /// [`strict_lengths`](ReadOptions::strict_lengths) the declared length
    /// also bounds inflation.
    pub fn max_decompressed_len(mut self, limit: usize) -> Self {
        self.max_decompressed_len = limit;
        self
    }
}

/// A decompressed save container
///
/// ```no_run
/// use palsave::SavFile;
///
/// let file = SavFile::from_path("Level.sav")?;
/// println!("{} bytes of gvas data", file.data().len());
/// # Ok::<(), palsave::SavError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavFile {
    path: Option<PathBuf>,
    header: SaveHeader,
    data: Vec<u8>,
}

impl SavFile {
    /// Reads and decompresses the save container at the given path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SavFile, SavError> {
        Self::from_path_with(path, &ReadOptions::default())
    }

    /// Reads and decompresses the save container at the given path
    pub fn from_path_with<P: AsRef<Path>>(
        path: P,
        options: &ReadOptions,
    ) -> Result<SavFile, SavError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(SavError::invalid_argument("save file path is empty"));
        }

        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SavError::from(SavErrorKind::NotFound {
                path: path.to_path_buf(),
            }),
            _ => SavError::from(e),
        })?;

        let mut result = Self::from_reader_with(BufReader::new(file), options)?;
        tracing::debug!(
            path = %path.display(),
            decompressed_len = result.header.decompressed_len(),
            compressed_len = result.header.compressed_len(),
            magic = result.header.magic(),
            inflated = result.data.len(),
            "read save container"
        );

        result.path = Some(path.to_path_buf());
        Ok(result)
    }

    /// Decompresses a save container held in memory
    pub fn from_slice(data: &[u8]) -> Result<SavFile, SavError> {
        Self::from_reader(data)
    }

    /// Decompresses a save container from a reader, which is consumed to the end
    pub fn from_reader<R: Read>(reader: R) -> Result<SavFile, SavError> {
        Self::from_reader_with(reader, &ReadOptions::default())
    }

    /// Decompresses a save container from a reader, which is consumed to the end
    pub fn from_reader_with<R: Read>(
        mut reader: R,
        options: &ReadOptions,
    ) -> Result<SavFile, SavError> {
        let header = SaveHeader::read(&mut reader)?;

        let mut envelope = [0u8; 2];
        reader.read_exact(&mut envelope)?;
        if envelope != ZLIB_HEADER {
            return Err(SavErrorKind::InvalidFormat { found: envelope }.into());
        }

        let format = header.format();
        tracing::trace!(?format, magic = header.magic(), "dispatching on save magic");
        if !format.is_supported() {
            return Err(SavErrorKind::UnsupportedFormat {
                magic: header.magic(),
            }
            .into());
        }

        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;

        let size_hint = usize::try_from(header.decompressed_len()).unwrap_or(0);
        let limit = if options.strict_lengths {
            // one byte of slack so an oversized payload still inflates far
            // enough to be reported as a length mismatch
            options
                .max_decompressed_len
                .min(size_hint.saturating_add(1))
        } else {
            options.max_decompressed_len
        };
        let data = deflate::inflate(&body, size_hint, limit)?;

        if options.strict_lengths && usize::try_from(header.decompressed_len()) != Ok(data.len()) {
            return Err(SavErrorKind::LengthMismatch {
                declared: header.decompressed_len(),
                actual: data.len(),
            }
            .into());
        }

        Ok(SavFile {
            path: None,
            header,
            data,
        })
    }

    /// The path the container was read from, if it came from the file system
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn header(&self) -> &SaveHeader {
        &self.header
    }

    /// The compression variant declared by the header magic
    pub fn format(&self) -> SaveFormat {
        self.header.format()
    }

    /// The decompressed payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the decompressed payload
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Decode the payload into text with an external codec
    pub fn decode_payload<C>(&self, codec: C, hints: &TypeHints) -> Result<String, SavError>
    where
        C: PayloadCodec,
    {
        if self.data.is_empty() {
            return Err(SavError::invalid_argument("save payload is empty"));
        }

        codec
            .decode_payload(&self.data, hints)
            .map_err(|e| SavErrorKind::Payload(e).into())
    }

    /// Write the payload back out as a container, keeping the magic it was read with
    pub fn write_to_path<P: AsRef<Path>>(
        &self,
        path: P,
        overwrite: bool,
    ) -> Result<SaveHeader, SavError> {
        SavWriter::new()
            .overwrite(overwrite)
            .magic(self.header.magic())
            .write_file(path, &self.data)
    }
}
