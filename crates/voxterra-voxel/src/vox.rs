//! Reading and writing [`VoxelGrid`]s in the `.vox` chunk format.
//!
//! ## Binary Layout
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | Magic bytes `"VOX "` |
//! | 4 | 4 | Format version (`u32`, little-endian, written as 150) |
//! | 8 | .. | `MAIN` chunk |
//!
//! Every chunk is laid out as:
//!
//! | Size | Field |
//! |------|-------|
//! | 4 | Chunk id (ASCII, space padded) |
//! | 4 | Content length N (`u32` LE) |
//! | 4 | Total length M of all children (`u32` LE) |
//! | N | Content |
//! | M | Children, depth-first |
//!
//! `MAIN` has no content and holds `SIZE` (three `u32`: x, y, z), `XYZI`
//! (`u32` count followed by `x, y, z, color` byte records) and, when the grid
//! has a palette, `RGBA` (255 four-byte entries).

use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::color::Rgba;
use crate::error::VoxError;
use crate::grid::{PALETTE_LENGTH, VoxelGrid};

/// Magic bytes at the start of every `.vox` file.
pub const VOX_MAGIC: [u8; 4] = *b"VOX ";

/// Format version written by the encoder. Decoding accepts any version.
pub const VOX_VERSION: u32 = 150;

/// Bytes of chunk header: id, content length, children length.
const CHUNK_HEADER_LEN: u32 = 12;

/// Four-byte chunk tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId([u8; 4]);

impl ChunkId {
    pub const MAIN: Self = Self(*b"MAIN");
    pub const SIZE: Self = Self(*b"SIZE");
    pub const XYZI: Self = Self(*b"XYZI");
    pub const RGBA: Self = Self(*b"RGBA");

    /// Builds an id from an ASCII tag of at most four characters, padding
    /// shorter tags with spaces.
    pub fn new(tag: &str) -> Result<Self, VoxError> {
        if tag.len() > 4 || !tag.is_ascii() {
            return Err(VoxError::InvalidChunkId(tag.to_string()));
        }
        let mut bytes = [b' '; 4];
        bytes[..tag.len()].copy_from_slice(tag.as_bytes());
        Ok(Self(bytes))
    }

    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId(\"{self}\")")
    }
}

/// A node of the chunk tree. Each chunk owns its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub id: ChunkId,
    pub content: Vec<u8>,
    pub children: Vec<Chunk>,
}

impl Chunk {
    pub fn new(id: ChunkId) -> Self {
        Self::with_content(id, Vec::new())
    }

    pub fn with_content(id: ChunkId, content: Vec<u8>) -> Self {
        Self {
            id,
            content,
            children: Vec::new(),
        }
    }

    pub fn push_child(&mut self, child: Chunk) {
        self.children.push(child);
    }

    pub fn content_size(&self) -> u32 {
        self.content.len() as u32
    }

    /// Sum of the total sizes of all children.
    pub fn children_size(&self) -> u32 {
        self.children.iter().map(Chunk::total_size).sum()
    }

    /// Bytes this chunk occupies on the wire, header included.
    pub fn total_size(&self) -> u32 {
        self.content_size() + self.children_size() + CHUNK_HEADER_LEN
    }

    /// Appends this chunk and its children (preorder) to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.id.as_bytes());
        buf.extend_from_slice(&self.content_size().to_le_bytes());
        buf.extend_from_slice(&self.children_size().to_le_bytes());
        buf.extend_from_slice(&self.content);
        for child in &self.children {
            child.write_to(buf);
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

impl VoxelGrid {
    /// Builds the `MAIN` chunk tree for this grid.
    pub fn to_chunk(&self) -> Chunk {
        let mut main = Chunk::new(ChunkId::MAIN);

        let mut size = Vec::with_capacity(12);
        for dim in [self.size_x(), self.size_y(), self.size_z()] {
            size.extend_from_slice(&dim.to_le_bytes());
        }
        main.push_child(Chunk::with_content(ChunkId::SIZE, size));

        let voxels = self.non_empty_voxels();
        let mut xyzi = Vec::with_capacity(4 + voxels.len() * 4);
        xyzi.extend_from_slice(&(voxels.len() as u32).to_le_bytes());
        for voxel in &voxels {
            xyzi.extend_from_slice(&voxel.to_bytes());
        }
        main.push_child(Chunk::with_content(ChunkId::XYZI, xyzi));

        if let Some(palette) = self.palette() {
            let mut rgba = Vec::with_capacity(PALETTE_LENGTH * 4);
            for color in palette {
                rgba.extend_from_slice(&color.to_bytes());
            }
            main.push_child(Chunk::with_content(ChunkId::RGBA, rgba));
        }

        main
    }

    /// Serializes this grid to a complete `.vox` byte stream.
    pub fn serialize(&self) -> Vec<u8> {
        let main = self.to_chunk();
        let mut buf = Vec::with_capacity(8 + main.total_size() as usize);
        buf.extend_from_slice(&VOX_MAGIC);
        buf.extend_from_slice(&VOX_VERSION.to_le_bytes());
        main.write_to(&mut buf);
        buf
    }

    /// Writes the grid to `path`.
    ///
    /// The bytes go to a sibling temporary file first, which is renamed over
    /// `path` only once fully written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), VoxError> {
        let path = path.as_ref();
        let bytes = self.serialize();
        let tmp = temp_path_for(path);

        let written = (|| -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&tmp, path)
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(VoxError::Io(e));
        }

        tracing::debug!(
            "wrote {} bytes ({} voxels) to {}",
            bytes.len(),
            self.count(),
            path.display()
        );
        Ok(())
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(path.file_name().unwrap_or(std::ffi::OsStr::new("model.vox")));
    name.push(".tmp");
    path.with_file_name(name)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Bounds-checked little-endian cursor over a byte slice.
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8], VoxError> {
        if self.remaining() < len {
            return Err(VoxError::CorruptData(format!(
                "truncated {what}: expected {len} bytes at offset {}, {} available",
                self.pos,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_array(&mut self, what: &str) -> Result<[u8; 4], VoxError> {
        let bytes = self.take(4, what)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn read_u32(&mut self, what: &str) -> Result<u32, VoxError> {
        self.read_array(what).map(u32::from_le_bytes)
    }

    fn read_id(&mut self) -> Result<ChunkId, VoxError> {
        self.read_array("chunk id").map(ChunkId::from_bytes)
    }
}

/// A chunk whose content is borrowed from the input and whose children
/// were skipped.
struct RawChunk<'a> {
    id: ChunkId,
    content: &'a [u8],
}

fn read_chunk<'a>(reader: &mut ByteReader<'a>) -> Result<RawChunk<'a>, VoxError> {
    let id = reader.read_id()?;
    let content_len = reader.read_u32("chunk content length")? as usize;
    let children_len = reader.read_u32("chunk children length")? as usize;
    let content = reader.take(content_len, "chunk content")?;
    reader.take(children_len, "chunk children")?;
    Ok(RawChunk { id, content })
}

fn expect_chunk<'a>(
    reader: &mut ByteReader<'a>,
    expected: ChunkId,
) -> Result<RawChunk<'a>, VoxError> {
    if reader.is_empty() {
        return Err(VoxError::CorruptData(format!("missing {expected} chunk")));
    }
    let chunk = read_chunk(reader)?;
    if chunk.id != expected {
        return Err(VoxError::CorruptData(format!(
            "expected {expected} chunk, found {}",
            chunk.id
        )));
    }
    Ok(chunk)
}

fn decode_palette(content: &[u8]) -> Result<Vec<Rgba>, VoxError> {
    // 255 entries as written here, or 256 where the trailing entry is unused.
    if content.len() != PALETTE_LENGTH * 4 && content.len() != (PALETTE_LENGTH + 1) * 4 {
        return Err(VoxError::CorruptData(format!(
            "RGBA chunk has {} bytes, expected {}",
            content.len(),
            PALETTE_LENGTH * 4
        )));
    }
    Ok(content
        .chunks_exact(4)
        .take(PALETTE_LENGTH)
        .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
        .collect())
}

impl VoxelGrid {
    /// Decodes a grid from a `.vox` byte stream.
    ///
    /// Fails without returning a partial grid if the stream is truncated,
    /// has the wrong magic, lacks the `SIZE`/`XYZI` chunks or references a
    /// voxel outside the declared size.
    pub fn deserialize(data: &[u8]) -> Result<Self, VoxError> {
        if data.len() < 4 || data[0..4] != VOX_MAGIC {
            return Err(VoxError::BadMagic);
        }
        let mut reader = ByteReader::new(&data[4..]);
        let version = reader.read_u32("version")?;

        let main_id = reader.read_id()?;
        if main_id != ChunkId::MAIN {
            return Err(VoxError::CorruptData(format!(
                "expected MAIN chunk, found {main_id}"
            )));
        }
        let main_content_len = reader.read_u32("MAIN content length")? as usize;
        let main_children_len = reader.read_u32("MAIN children length")? as usize;
        if main_content_len != 0 {
            tracing::debug!("skipping {main_content_len} bytes of MAIN content");
        }
        reader.take(main_content_len, "MAIN content")?;
        let mut children = ByteReader::new(reader.take(main_children_len, "MAIN children")?);
        if !reader.is_empty() {
            tracing::debug!("ignoring {} trailing bytes after MAIN", reader.remaining());
        }

        let size = expect_chunk(&mut children, ChunkId::SIZE)?;
        if size.content.len() != 12 {
            return Err(VoxError::CorruptData(format!(
                "SIZE chunk has {} bytes, expected 12",
                size.content.len()
            )));
        }
        let mut size_reader = ByteReader::new(size.content);
        let size_x = size_reader.read_u32("size x")?;
        let size_y = size_reader.read_u32("size y")?;
        let size_z = size_reader.read_u32("size z")?;
        let mut grid = VoxelGrid::new(size_x, size_y, size_z)
            .map_err(|e| VoxError::CorruptData(format!("SIZE chunk: {e}")))?;

        let xyzi = expect_chunk(&mut children, ChunkId::XYZI)?;
        let mut xyzi_reader = ByteReader::new(xyzi.content);
        let count = xyzi_reader.read_u32("voxel count")? as usize;
        let expected_len = count
            .checked_mul(4)
            .and_then(|n| n.checked_add(4))
            .filter(|&n| n == xyzi.content.len());
        if expected_len.is_none() {
            return Err(VoxError::CorruptData(format!(
                "XYZI chunk declares {count} voxels but holds {} bytes",
                xyzi.content.len()
            )));
        }
        for record in xyzi.content[4..].chunks_exact(4) {
            let [x, y, z, color] = [record[0], record[1], record[2], record[3]];
            grid.fill(x.into(), y.into(), z.into(), color)?;
        }

        while !children.is_empty() {
            let chunk = read_chunk(&mut children)?;
            if chunk.id == ChunkId::RGBA {
                grid.set_palette(decode_palette(chunk.content)?)?;
            } else {
                tracing::warn!("skipping unsupported {} chunk", chunk.id);
            }
        }

        tracing::debug!(
            "decoded vox v{version}: {size_x}x{size_y}x{size_z}, {count} voxels, palette: {}",
            grid.palette().is_some()
        );
        Ok(grid)
    }

    /// Reads and decodes the `.vox` file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VoxError> {
        let data = fs::read(path.as_ref())?;
        Self::deserialize(&data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
