//! GLB binary container reading
//!
//! A `.glb` payload is a 12-byte header followed by a sequence of chunks:
//!
//! ```text
//! offset 0  : 4 bytes  magic ("glTF")
//! offset 4  : u32 LE   version
//! offset 8  : u32 LE   totalLength
//! offset 12 : repeated { u32 LE chunkLength, u32 LE chunkType, chunkLength bytes payload }
//! ```
//!
//! [`read_container`] borrows from the input buffer; the JSON text is only
//! copied when invalid UTF-8 has to be replaced.

use std::borrow::Cow;
use thiserror::Error;

/// Magic tag at offset 0 of every GLB payload
pub const GLB_MAGIC: [u8; 4] = *b"glTF";

/// Size of the fixed header in bytes
pub const HEADER_LEN: usize = 12;

/// Chunk header size (length + type)
pub const CHUNK_HEADER_LEN: usize = 8;

/// Chunk type tag for the JSON chunk ("JSON" little-endian)
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;

/// Chunk type tag for the binary chunk ("BIN\0" little-endian)
pub const CHUNK_TYPE_BIN: u32 = 0x004E_4942;

/// Lowest container version this reader accepts
pub const MIN_VERSION: u32 = 2;

/// Error type for container decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("Invalid GLB magic {found:?}, expected \"glTF\"")]
    InvalidMagic { found: Vec<u8> },

    #[error("Legacy binary container version {0} (version 2 or later required)")]
    UnsupportedVersion(u32),

    #[error("Truncated container: {needed} bytes needed at offset {offset}, {available} available")]
    TruncatedContainer {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("JSON content not found in container")]
    MissingJsonChunk,
}

/// Kind of a chunk found while walking the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Json,
    Bin,
    /// Any other tag; the payload is skipped
    Unknown(u32),
}

impl ChunkKind {
    /// Classify a raw chunk type tag
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            CHUNK_TYPE_JSON => Self::Json,
            CHUNK_TYPE_BIN => Self::Bin,
            other => Self::Unknown(other),
        }
    }

    /// Raw tag value for this kind
    pub fn tag(&self) -> u32 {
        match self {
            Self::Json => CHUNK_TYPE_JSON,
            Self::Bin => CHUNK_TYPE_BIN,
            Self::Unknown(tag) => *tag,
        }
    }
}

/// Location of one chunk inside the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
    /// Absolute offset of the chunk payload
    pub offset: usize,
    /// Declared payload length
    pub length: u32,
    pub kind: ChunkKind,
}

/// Decoded GLB header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlbHeader {
    pub version: u32,
    /// Declared byte length of the whole container
    pub total_length: u32,
}

/// One decoded `.glb` payload, borrowing from the source buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryContainer<'a> {
    pub header: GlbHeader,
    /// Text of the first JSON chunk; invalid UTF-8 sequences are replaced
    /// with U+FFFD, and the text is borrowed when no replacement was needed
    pub content: Cow<'a, str>,
    /// Payload of the first BIN chunk, if any
    pub body: Option<&'a [u8]>,
    /// Every chunk walked, in file order
    pub chunks: Vec<ChunkInfo>,
}

impl BinaryContainer<'_> {
    /// Number of chunks that were neither JSON nor BIN
    pub fn skipped_chunks(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| matches!(c.kind, ChunkKind::Unknown(_)))
            .count()
    }
}

/// Bounds-checked little-endian reads over the container prefix
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], ContainerError> {
        let available = self.data.len().saturating_sub(self.pos);
        if len > available {
            return Err(ContainerError::TruncatedContainer {
                offset: self.pos,
                needed: len,
                available,
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u32_le(&mut self) -> Result<u32, ContainerError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Decode a GLB byte buffer
///
/// Checks run in a fixed order: magic, then version, then the chunk walk.
/// The walk stops once `totalLength - 12` bytes of chunk content have been
/// consumed; any chunk that would extend past the declared length or the
/// buffer end yields [`ContainerError::TruncatedContainer`].
pub fn read_container(data: &[u8]) -> Result<BinaryContainer<'_>, ContainerError> {
    let mut header = Cursor { data, pos: 0 };
    let magic = header.take(4)?;
    if magic != GLB_MAGIC {
        return Err(ContainerError::InvalidMagic {
            found: magic.to_vec(),
        });
    }

    let version = header.u32_le()?;
    if version < MIN_VERSION {
        return Err(ContainerError::UnsupportedVersion(version));
    }
    let total_length = header.u32_le()?;

    // Bytes past the declared length are never looked at
    let declared_end = (total_length as usize).max(HEADER_LEN);
    let mut cursor = Cursor {
        data: &data[..declared_end.min(data.len())],
        pos: HEADER_LEN,
    };

    let mut content = None;
    let mut body = None;
    let mut chunks = Vec::new();

    while cursor.pos < declared_end {
        let length = cursor.u32_le()?;
        let kind = ChunkKind::from_tag(cursor.u32_le()?);
        let offset = cursor.pos;
        let payload = cursor.take(length as usize)?;

        match kind {
            ChunkKind::Json if content.is_none() => {
                let text = String::from_utf8_lossy(payload);
                if let Cow::Owned(_) = text {
                    log::debug!("Replaced invalid UTF-8 in JSON chunk at offset {offset}");
                }
                content = Some(text);
            }
            ChunkKind::Bin if body.is_none() => body = Some(payload),
            ChunkKind::Json | ChunkKind::Bin => {
                log::debug!("Ignoring duplicate {kind:?} chunk at offset {offset}");
            }
            ChunkKind::Unknown(tag) => {
                log::debug!("Skipping unknown chunk type {tag:#010x} ({length} bytes)");
            }
        }

        chunks.push(ChunkInfo {
            offset,
            length,
            kind,
        });
    }

    let content = content.ok_or(ContainerError::MissingJsonChunk)?;

    log::debug!(
        "Read GLB v{version}: {} bytes of JSON, {} chunk(s), binary body {}",
        content.len(),
        chunks.len(),
        body.map_or_else(|| "absent".to_string(), |b: &[u8]| format!("{} bytes", b.len()))
    );

    Ok(BinaryContainer {
        header: GlbHeader {
            version,
            total_length,
        },
        content,
        body,
        chunks,
    })
}

/// Assembles GLB byte buffers
///
/// Chunks are written in the order they were added and are not padded, so
/// the JSON text read back is byte-for-byte what was supplied. The header
/// fields can be overridden to produce deliberately malformed containers.
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    magic: [u8; 4],
    version: u32,
    declared_length: Option<u32>,
    chunks: Vec<(u32, Vec<u8>)>,
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self {
            magic: GLB_MAGIC,
            version: MIN_VERSION,
            declared_length: None,
            chunks: Vec::new(),
        }
    }
}

impl ContainerWriter {
    /// Create a writer producing a version 2 container with no chunks
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the magic tag
    pub fn magic(mut self, magic: [u8; 4]) -> Self {
        self.magic = magic;
        self
    }

    /// Override the container version
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Override the declared total length instead of computing it
    pub fn declared_length(mut self, length: u32) -> Self {
        self.declared_length = Some(length);
        self
    }

    /// Append a JSON chunk
    pub fn json(self, text: &str) -> Self {
        self.chunk(CHUNK_TYPE_JSON, text.as_bytes())
    }

    /// Append a BIN chunk
    pub fn bin(self, payload: &[u8]) -> Self {
        self.chunk(CHUNK_TYPE_BIN, payload)
    }

    /// Append a chunk with an arbitrary type tag
    pub fn chunk(mut self, tag: u32, payload: &[u8]) -> Self {
        self.chunks.push((tag, payload.to_vec()));
        self
    }

    /// Serialize the container
    pub fn build(&self) -> Vec<u8> {
        let content_len: usize = self
            .chunks
            .iter()
            .map(|(_, payload)| CHUNK_HEADER_LEN + payload.len())
            .sum();
        let total = HEADER_LEN + content_len;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(&self.declared_length.unwrap_or(total as u32).to_le_bytes());
        for (tag, payload) in &self.chunks {
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&tag.to_le_bytes());
            out.extend_from_slice(payload);
        }
        out
    }
}
