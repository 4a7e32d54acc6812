use std::fmt;
use std::path::PathBuf;

pub mod mesh_builder;
pub mod normals;
pub mod shader_loader;
pub mod smf;

/// Tolerance below which lengths are treated as zero.
pub const NORMAL_EPSILON: f32 = 1e-8;

/// File-level failures. These abort the program before the render loop starts.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file is missing, unreadable or not valid UTF-8.
    #[error("Cannot read SMF file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SMF file '{0}' contains no vertices")]
    NoPositions(PathBuf),

    #[error("SMF file '{0}' contains no valid faces")]
    NoFaces(PathBuf),
}

/// Why a single record was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    /// A `v` line without three parseable numbers.
    BadVertex,

    /// A face token that is not a positive 1-based index.
    BadFaceIndex(String),

    /// Fewer than three indices, or not exactly three in strict mode.
    BadFaceArity(usize),

    /// A face referencing a vertex that does not exist.
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// A record-level problem. The record is skipped and loading continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// 1-based line number, or 0 if the record did not come from a source line.
    pub line: usize,
    pub kind: MalformedKind,
}

impl fmt::Display for MalformedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MalformedKind::BadVertex => write!(f, "line {}: bad vertex record", self.line),
            MalformedKind::BadFaceIndex(token) => {
                write!(f, "line {}: invalid face index '{token}'", self.line)
            }
            MalformedKind::BadFaceArity(count) => {
                write!(f, "line {}: face with {count} indices", self.line)
            }
            MalformedKind::IndexOutOfRange {
                index,
                vertex_count,
            } => write!(
                f,
                "line {}: face index {} out of range ({vertex_count} vertices)",
                self.line,
                index + 1
            ),
        }
    }
}
