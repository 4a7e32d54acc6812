use std::path::Path;

use glam::{Mat4, Vec3};
use tracing::{info, warn};

use super::normals::{synthesize_normals, NormalWeighting};
use super::smf::{load_smf, FaceMode, SmfDocument};
use super::{LoadError, MalformedKind, MalformedRecord, NORMAL_EPSILON};
use crate::engine::{MeshIndex, Vertex3};

/// Centroid and bounding radius of the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelBounds {
    pub centroid: Vec3,
    pub radius: f32,
}

impl ModelBounds {
    pub fn from_positions(positions: &[Vec3]) -> Self {
        let centroid = if positions.is_empty() {
            Vec3::ZERO
        } else {
            positions.iter().sum::<Vec3>() / positions.len() as f32
        };
        let radius = positions
            .iter()
            .map(|p| p.distance(centroid))
            .fold(0.0f32, f32::max);
        let radius = if radius < NORMAL_EPSILON { 1.0 } else { radius };
        Self { centroid, radius }
    }

    /// Moves the centroid to the origin and scales the model to unit radius.
    pub fn normalization_transform(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(1.0 / self.radius)) * Mat4::from_translation(-self.centroid)
    }
}

/// CPU-side render-ready mesh. Positions are stored as parsed; centering happens at draw time.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex3>,
    pub indices: Vec<MeshIndex>,
    pub bounds: ModelBounds,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Reads, validates and assembles the mesh stored in an SMF file.
pub fn load_mesh(
    path: &Path,
    face_mode: FaceMode,
    weighting: NormalWeighting,
) -> Result<MeshData, LoadError> {
    let document = load_smf(path, face_mode)?;
    let mesh = build_mesh(path, &document, weighting)?;
    info!(
        "Loaded {} vertices and {} faces.",
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Fuses parsed positions, synthesized normals and faces into a [`MeshData`].
pub fn build_mesh(
    path: &Path,
    document: &SmfDocument,
    weighting: NormalWeighting,
) -> Result<MeshData, LoadError> {
    let positions = &document.positions;
    if positions.is_empty() {
        return Err(LoadError::NoPositions(path.to_owned()));
    }

    let normals = synthesize_normals(positions, &document.faces, weighting);
    let vertices = positions
        .iter()
        .zip(&normals)
        .map(|(position, normal)| Vertex3 {
            a_position: position.to_array(),
            a_normal: normal.to_array(),
        })
        .collect::<Vec<_>>();

    let mut indices = Vec::with_capacity(document.faces.len() * 3);
    for face in &document.faces {
        if let Some(&index) = face.iter().find(|&&i| i as usize >= vertices.len()) {
            let record = MalformedRecord {
                line: 0,
                kind: MalformedKind::IndexOutOfRange {
                    index,
                    vertex_count: vertices.len(),
                },
            };
            warn!("Dropping face {face:?}: {record}");
            continue;
        }
        indices.extend_from_slice(face);
    }
    if indices.is_empty() {
        return Err(LoadError::NoFaces(path.to_owned()));
    }

    Ok(MeshData {
        vertices,
        indices,
        bounds: ModelBounds::from_positions(positions),
    })
}
