use std::path::Path;

use glam::Vec3;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum::{Display, EnumString};
use tracing::{debug, instrument, trace, warn};

use super::{LoadError, MalformedKind, MalformedRecord};

const COMMENT_MARKERS: &[char] = &['#', '$'];

/// A triangle of 0-based position indices.
pub type Face = [u32; 3];

/// How `f` records are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FaceMode {
    /// Exactly three plain integers per face.
    Strict,

    /// Any number of `index[/attr...]` tokens, fan-triangulated from the first one.
    #[default]
    Fan,
}

/// The parsed content of an SMF file, in file order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SmfDocument {
    pub positions: Vec<Vec3>,
    pub faces: Vec<Face>,
    pub diagnostics: Vec<MalformedRecord>,
}

struct Polygon {
    line: usize,
    indices: SmallVec<[u32; 4]>,
}

#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_smf(path: &Path, mode: FaceMode) -> Result<SmfDocument, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    let document = parse_smf(&source, mode);
    if document.positions.is_empty() {
        return Err(LoadError::NoPositions(path.to_owned()));
    }
    if document.faces.is_empty() {
        return Err(LoadError::NoFaces(path.to_owned()));
    }
    debug!(
        "Parsed {} positions, {} triangles, {} dropped records",
        document.positions.len(),
        document.faces.len(),
        document.diagnostics.len()
    );
    Ok(document)
}

/// Parses SMF text. Malformed records are logged, collected in `diagnostics` and skipped.
pub fn parse_smf(source: &str, mode: FaceMode) -> SmfDocument {
    let mut positions = Vec::new();
    let mut polygons = Vec::new();
    let mut diagnostics = Vec::new();

    for (line_index, line) in source.lines().enumerate() {
        let line_number = line_index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKERS) {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else { continue };
        match tag {
            "v" => match parse_position(tokens) {
                Some(position) => positions.push(position),
                None => diagnostics.push(MalformedRecord {
                    line: line_number,
                    kind: MalformedKind::BadVertex,
                }),
            },
            "f" => match parse_face(tokens, mode) {
                Ok(indices) => polygons.push(Polygon {
                    line: line_number,
                    indices,
                }),
                Err(kind) => diagnostics.push(MalformedRecord {
                    line: line_number,
                    kind,
                }),
            },
            _ => trace!("line {line_number}: ignoring '{tag}' record"),
        }
    }

    // Faces may reference vertices declared further down, so the range check waits for the end.
    let vertex_count = positions.len();
    let mut faces = Vec::with_capacity(polygons.len());
    for polygon in &polygons {
        if let Some(&index) = polygon.indices.iter().find(|&&i| i as usize >= vertex_count) {
            diagnostics.push(MalformedRecord {
                line: polygon.line,
                kind: MalformedKind::IndexOutOfRange {
                    index,
                    vertex_count,
                },
            });
            continue;
        }
        faces.extend(triangulate_fan(&polygon.indices));
    }

    diagnostics.sort_by_key(|d| d.line);
    for diagnostic in &diagnostics {
        warn!("Skipping record: {diagnostic}");
    }

    SmfDocument {
        positions,
        faces,
        diagnostics,
    }
}

fn parse_position<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<Vec3> {
    let mut coords = [0.0f32; 3];
    for coord in &mut coords {
        *coord = tokens.next()?.parse().ok().filter(|v: &f32| v.is_finite())?;
    }
    Some(Vec3::from_array(coords))
}

fn parse_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    mode: FaceMode,
) -> Result<SmallVec<[u32; 4]>, MalformedKind> {
    let tokens = tokens.collect::<SmallVec<[&str; 8]>>();
    if mode == FaceMode::Strict && tokens.len() != 3 {
        return Err(MalformedKind::BadFaceArity(tokens.len()));
    }

    let mut indices = SmallVec::new();
    for token in tokens {
        let number = match mode {
            FaceMode::Strict => token,
            FaceMode::Fan => token.split_once('/').map_or(token, |(index, _)| index),
        };
        let index =
            parse_index(number).ok_or_else(|| MalformedKind::BadFaceIndex(token.to_string()))?;
        indices.push(index);
    }

    if indices.len() < 3 {
        return Err(MalformedKind::BadFaceArity(indices.len()));
    }
    Ok(indices)
}

/// Converts a 1-based index token to a 0-based index.
fn parse_index(token: &str) -> Option<u32> {
    let one_based: i64 = token.parse().ok()?;
    u32::try_from(one_based - 1).ok()
}

fn triangulate_fan(indices: &[u32]) -> Vec<Face> {
    let Some((&first, rest)) = indices.split_first() else {
        return Vec::new();
    };
    rest.iter().tuple_windows().map(|(&b, &c)| [first, b, c]).collect()
}
