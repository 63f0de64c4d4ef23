/*!
# Palsave

Palsave reads and writes the `.sav` containers that Palworld (and other games
built on the same Unreal Engine save pipeline) use to store a compressed GVAS
payload.

```rust
use palsave::{SavFile, SavWriter};

let mut container = Vec::new();
SavWriter::new().encode(b"hello world", &mut container)?;

let file = SavFile::from_slice(&container)?;
assert_eq!(file.data(), b"hello world");
assert_eq!(file.header().decompressed_len(), 11);
# Ok::<(), palsave::SavError>(())
```

## Format

A container is a 12 byte header followed by a zlib stream:

```text
offset 0  : i32 LE  decompressed length
offset 4  : i32 LE  compressed length
offset 8  : i32 LE  magic
offset 12 : 78 9c   zlib header
offset 14 : raw deflate data
```

The high byte of the magic selects the variant. Only `0x31` and `0x32` are
understood; anything else is rejected with
[`SavErrorKind::UnsupportedFormat`].

## Payload

The decompressed payload is a GVAS document. Interpreting it is left to an
implementation of [`PayloadCodec`] supplied by the caller. See the
[`payload`] module.

## Deflate backends

The default `miniz` feature inflates with the pure Rust `miniz_oxide`. The
`libdeflate` feature swaps in `libdeflater`, which is faster on large world
saves.
*/

mod deflate;
mod errors;
mod file;
mod header;
pub mod payload;
mod util;
mod writer;

pub use errors::*;
pub use file::*;
pub use header::*;
#[doc(inline)]
pub use payload::{PayloadCodec, PayloadError, TypeHints};
pub use writer::SavWriter;

use std::path::Path;

/// Reads and decompresses the save container at the given path
pub fn read_container<P: AsRef<Path>>(path: P) -> Result<SavFile, SavError> {
    SavFile::from_path(path)
}

/// Compresses the payload into a save container at the given path
///
/// Fails with [`SavErrorKind::AlreadyExists`] when the path exists and
/// `overwrite` is false.
pub fn write_container<P: AsRef<Path>>(
    path: P,
    data: &[u8],
    overwrite: bool,
) -> Result<SaveHeader, SavError> {
    SavWriter::new().overwrite(overwrite).write_file(path, data)
}
