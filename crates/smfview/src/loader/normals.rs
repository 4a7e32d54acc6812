//! Per-vertex normals synthesized from face geometry.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::smf::Face;
use super::NORMAL_EPSILON;

/// Normal given to vertices that received no usable face contribution.
pub const DEFAULT_NORMAL: Vec3 = Vec3::Z;

/// How face normals are weighted when accumulated into vertex normals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalWeighting {
    /// The raw cross product is accumulated, so larger faces weigh more.
    #[default]
    Area,

    /// Every face contributes a unit vector regardless of its size.
    Uniform,
}

/// Returns the unnormalized face normal, or zero for a degenerate face.
pub fn face_normal(positions: &[Vec3], face: &Face) -> Vec3 {
    let [a, b, c] = face.map(|i| positions[i as usize]);
    let cross = (b - a).cross(c - a);
    if cross.length() < NORMAL_EPSILON {
        Vec3::ZERO
    } else {
        cross
    }
}

/// Computes one unit normal per position.
///
/// Faces referencing missing positions are ignored. Vertices without any contribution,
/// or whose contributions cancel out, get [`DEFAULT_NORMAL`].
pub fn synthesize_normals(
    positions: &[Vec3],
    faces: &[Face],
    weighting: NormalWeighting,
) -> Vec<Vec3> {
    let mut sums = vec![Vec3::ZERO; positions.len()];

    for face in faces {
        if face.iter().any(|&i| i as usize >= positions.len()) {
            continue;
        }
        let normal = face_normal(positions, face);
        let contribution = match weighting {
            NormalWeighting::Area => normal,
            NormalWeighting::Uniform => normal.normalize_or_zero(),
        };
        for &i in face {
            sums[i as usize] += contribution;
        }
    }

    sums.into_iter()
        .map(|sum| {
            if sum.length() < NORMAL_EPSILON {
                DEFAULT_NORMAL
            } else {
                sum.normalize()
            }
        })
        .collect()
}
