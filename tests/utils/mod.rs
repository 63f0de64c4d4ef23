#![allow(dead_code)]
use flate2::{write::ZlibEncoder, Compression};
use palsave::{PayloadCodec, PayloadError, TypeHints};
use std::io::Write;

/// Builds a container the way the game does, with an independent zlib encoder
pub fn game_container(magic: i32, payload: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).unwrap();
    let zlib = encoder.finish().unwrap();

    let mut out = Vec::new();
    out.extend_from_slice(&(payload.len() as i32).to_le_bytes());
    out.extend_from_slice(&(zlib.len() as i32).to_le_bytes());
    out.extend_from_slice(&magic.to_le_bytes());
    out.extend_from_slice(&zlib);
    out
}

/// Stand-in for a GVAS codec: the payload is JSON describing its bytes and
/// the hints it was decoded with
#[derive(Debug, Default)]
pub struct JsonBytesCodec;

impl PayloadCodec for JsonBytesCodec {
    fn decode_payload(&self, data: &[u8], hints: &TypeHints) -> Result<String, PayloadError> {
        let doc = serde_json::json!({
            "bytes": data,
            "hints": hints,
        });
        Ok(doc.to_string())
    }

    fn encode_payload(&self, text: &str) -> Result<Vec<u8>, PayloadError> {
        let doc: serde_json::Value = serde_json::from_str(text)?;
        let bytes = doc
            .get("bytes")
            .cloned()
            .ok_or("missing bytes field")?;
        Ok(serde_json::from_value(bytes)?)
    }
}
