use glam::Vec3;

/// Phong surface coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub name: &'static str,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

pub const MATERIALS: [Material; 3] = [
    Material {
        name: "red plastic",
        ambient: Vec3::new(0.6, 0.2, 0.2),
        diffuse: Vec3::new(0.9, 0.1, 0.1),
        specular: Vec3::new(0.8, 0.8, 0.8),
        shininess: 80.0,
    },
    Material {
        name: "emerald",
        ambient: Vec3::new(0.0215, 0.1745, 0.0215),
        diffuse: Vec3::new(0.07568, 0.61424, 0.07568),
        specular: Vec3::new(0.633, 0.727811, 0.633),
        shininess: 76.8,
    },
    Material {
        name: "cyan rubber",
        ambient: Vec3::new(0.0, 0.05, 0.05),
        diffuse: Vec3::new(0.4, 0.5, 0.5),
        specular: Vec3::new(0.04, 0.7, 0.7),
        shininess: 10.0,
    },
];

impl Material {
    /// Looks up a catalog entry, clamping out-of-range indices to the last one.
    pub fn by_index(index: usize) -> &'static Material {
        &MATERIALS[index.min(MATERIALS.len() - 1)]
    }
}
