//! RWEG binary persistence.
//!
//! Layout, little-endian throughout: `RWEG` magic tag, vertex count (u32),
//! then per vertex in ascending id order its id (u32), departing-edge count
//! (u32), and per edge the neighbor id (u32), length (f64) and direction
//! flag (u8, 1 = directed). Lengths are fixed-width IEEE-754 doubles, so a
//! round trip reproduces them bit for bit.
//!
//! Decoding replays every record through `update_edge`, so loading a file
//! twice, or two files with overlapping declarations, merges by the same
//! table as direct mutation, in file order.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::graph::MetricGraph;
use crate::paths;
use crate::{Error, Result};

pub(crate) const EXTENSION: &str = ".rweg";
const MAGIC: &[u8; 4] = b"RWEG";

/// Saves `graph` to an RWEG file, returning the path actually written.
///
/// `file_name` is normalized to end in `.rweg`. With `rewrite` unset an
/// existing target is left alone and a ` (n)` ordinal picks a fresh name.
pub fn save(graph: &MetricGraph, file_name: &str, rewrite: bool) -> Result<PathBuf> {
    let target = paths::save_target(file_name, EXTENSION, rewrite);
    let mut writer = BufWriter::new(File::create(&target)?);

    writer.write_all(MAGIC)?;
    let vertices = graph.vertices();
    writer.write_all(&(vertices.len() as u32).to_le_bytes())?;

    let mut edge_total = 0usize;
    for vertex in vertices {
        let records = graph.departing_edges(vertex);
        writer.write_all(&vertex.to_le_bytes())?;
        writer.write_all(&(records.len() as u32).to_le_bytes())?;
        for record in records {
            writer.write_all(&record.neighbor.to_le_bytes())?;
            writer.write_all(&record.length.to_le_bytes())?;
            writer.write_all(&[u8::from(record.directed)])?;
        }
        edge_total += records.len();
    }
    writer.flush()?;

    debug!(path = %target.display(), edges = edge_total, "saved RWEG file");
    Ok(target)
}

/// Merges the contents of an RWEG file into `graph`.
///
/// A missing file is a no-op, not an error. A bad tag or truncated payload
/// fails with [`Error::Format`]; records already replayed by then stay
/// applied.
pub fn load(graph: &mut MetricGraph, file_name: &str) -> Result<()> {
    let source = paths::normalized(file_name, EXTENSION);
    let file = match File::open(&source) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %source.display(), "no RWEG file to load, graph unchanged");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 4];
    read_chunk(&mut reader, &mut magic)?;
    if &magic != MAGIC {
        return Err(Error::format("rweg", format!("unknown format tag {magic:?}")));
    }

    let mut edge_total = 0usize;
    let vertex_count = read_u32(&mut reader)?;
    for _ in 0..vertex_count {
        let vertex = read_u32(&mut reader)?;
        let edge_count = read_u32(&mut reader)?;
        for _ in 0..edge_count {
            let neighbor = read_u32(&mut reader)?;
            let length = read_f64(&mut reader)?;
            let directed = read_u8(&mut reader)? != 0;
            graph.update_edge(vertex, neighbor, length, directed)?;
            edge_total += 1;
        }
    }

    debug!(path = %source.display(), edges = edge_total, "loaded RWEG file");
    Ok(())
}

fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> Result<()> {
    reader.read_exact(buffer).map_err(|err| match err.kind() {
        ErrorKind::UnexpectedEof => Error::format("rweg", "truncated file"),
        _ => Error::Io(err),
    })
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32> {
    let mut buffer = [0u8; 4];
    read_chunk(reader, &mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}

fn read_f64<R: Read>(reader: &mut R) -> Result<f64> {
    let mut buffer = [0u8; 8];
    read_chunk(reader, &mut buffer)?;
    Ok(f64::from_le_bytes(buffer))
}

fn read_u8<R: Read>(reader: &mut R) -> Result<u8> {
    let mut buffer = [0u8; 1];
    read_chunk(reader, &mut buffer)?;
    Ok(buffer[0])
}
