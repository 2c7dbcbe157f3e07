//! GEXF interchange persistence, 1.2draft subset.
//!
//! The consumed subset: the `version` attribute of `<gexf>` (which must be
//! exactly `1.2draft`), `<node>` elements, and `<edge>` elements with
//! `source`, `target`, a numeric `weight` carrying the length, and an
//! optional `type` attribute for the direction. Isolated nodes are not
//! imported; a vertex exists only through some edge. Every edge element is
//! applied through `update_edge` in document order, so duplicates and
//! mutual `a->b`/`b->a` declarations settle by the same merge table as
//! direct mutation.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::PathBuf;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::graph::MetricGraph;
use crate::paths;
use crate::{Error, Result};

pub(crate) const EXTENSION: &str = ".gexf";
const VERSION: &str = "1.2draft";
const XMLNS: &str = "http://www.gexf.net/1.2draft";

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::format("gexf", err.to_string())
    }
}

/// Saves `graph` as a GEXF 1.2draft document, returning the path written.
///
/// Emits a `<node>` per vertex and an `<edge>` per departing edge, with the
/// length in the `weight` attribute and the direction in `type`. Naming and
/// collision policy match the RWEG codec.
pub fn save(graph: &MetricGraph, file_name: &str, rewrite: bool) -> Result<PathBuf> {
    let target = paths::save_target(file_name, EXTENSION, rewrite);
    let file = File::create(&target)?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gexf = BytesStart::new("gexf");
    gexf.push_attribute(("xmlns", XMLNS));
    gexf.push_attribute(("version", VERSION));
    writer.write_event(Event::Start(gexf))?;

    let mut graph_element = BytesStart::new("graph");
    graph_element.push_attribute(("defaultedgetype", "directed"));
    writer.write_event(Event::Start(graph_element))?;

    writer.write_event(Event::Start(BytesStart::new("nodes")))?;
    for vertex in graph.vertices() {
        let id = vertex.to_string();
        let mut node = BytesStart::new("node");
        node.push_attribute(("id", id.as_str()));
        node.push_attribute(("label", id.as_str()));
        writer.write_event(Event::Empty(node))?;
    }
    writer.write_event(Event::End(BytesEnd::new("nodes")))?;

    writer.write_event(Event::Start(BytesStart::new("edges")))?;
    let mut edge_id = 0u32;
    for vertex in graph.vertices() {
        for record in graph.departing_edges(vertex) {
            let mut edge = BytesStart::new("edge");
            edge.push_attribute(("id", edge_id.to_string().as_str()));
            edge.push_attribute(("source", vertex.to_string().as_str()));
            edge.push_attribute(("target", record.neighbor.to_string().as_str()));
            edge.push_attribute(("weight", record.length.to_string().as_str()));
            let kind = if record.directed { "directed" } else { "undirected" };
            edge.push_attribute(("type", kind));
            writer.write_event(Event::Empty(edge))?;
            edge_id += 1;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("edges")))?;

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("gexf")))?;
    let mut inner = writer.into_inner();
    inner.flush()?;

    debug!(path = %target.display(), edges = edge_id, "saved GEXF file");
    Ok(target)
}

/// Merges the contents of a GEXF file into `graph`.
///
/// A missing file is a no-op. A version other than `1.2draft`, an edge
/// without a numeric `weight`, or a non-integer vertex id fails with
/// [`Error::Format`]; edges applied before the failure stay applied.
pub fn load(graph: &mut MetricGraph, file_name: &str) -> Result<()> {
    let source = paths::normalized(file_name, EXTENSION);
    let file = match File::open(&source) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %source.display(), "no GEXF file to load, graph unchanged");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let mut reader = Reader::from_reader(BufReader::new(file));

    let mut buf = Vec::new();
    let mut version_seen = false;
    let mut default_directed = false;
    let mut edge_total = 0usize;
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) | Event::Empty(element) => {
                match element.local_name().as_ref() {
                    b"gexf" => {
                        let version = attribute(&element, "version")?.ok_or_else(|| {
                            Error::format("gexf", "gexf element without version attribute")
                        })?;
                        if version != VERSION {
                            return Err(Error::format(
                                "gexf",
                                format!("unsupported version {version:?}, expected {VERSION}"),
                            ));
                        }
                        version_seen = true;
                    }
                    b"graph" => {
                        if let Some(kind) = attribute(&element, "defaultedgetype")? {
                            default_directed = kind == "directed";
                        }
                    }
                    b"edge" => {
                        let source_id = vertex_id(&element, "source")?;
                        let target_id = vertex_id(&element, "target")?;
                        let weight = attribute(&element, "weight")?.ok_or_else(|| {
                            Error::format("gexf", "edge element without weight attribute")
                        })?;
                        let length: f64 = weight.parse().map_err(|_| {
                            Error::format("gexf", format!("non-numeric weight {weight:?}"))
                        })?;
                        let directed = match attribute(&element, "type")? {
                            Some(kind) => kind == "directed",
                            None => default_directed,
                        };
                        graph.update_edge(source_id, target_id, length, directed)?;
                        edge_total += 1;
                    }
                    // <node> elements are skipped: isolated vertices are
                    // not imported.
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !version_seen {
        return Err(Error::format("gexf", "missing gexf root element"));
    }

    debug!(path = %source.display(), edges = edge_total, "loaded GEXF file");
    Ok(())
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|err| Error::format("gexf", err.to_string()))?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(attr.value.as_ref()).into_owned()));
        }
    }
    Ok(None)
}

fn vertex_id(element: &BytesStart<'_>, name: &str) -> Result<u32> {
    let value = attribute(element, name)?
        .ok_or_else(|| Error::format("gexf", format!("edge element without {name} attribute")))?;
    value
        .parse()
        .map_err(|_| Error::format("gexf", format!("vertex id {value:?} is not a 32-bit integer")))
}
