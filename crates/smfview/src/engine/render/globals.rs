use std::slice;

use glam::{Mat4, Vec3};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Every value a shader program may request by name.
///
/// The snake_case variant name is the uniform member name in WGSL. Both shading programs
/// draw from this single table, each declaring the subset it needs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr, Debug)]
#[strum(serialize_all = "snake_case")]
pub enum GlobalType {
    WorldFromModel,
    CameraFromWorld,
    ProjectionFromCamera,
    ProjectionFromWorld,
    ProjectionFromModel,

    /// Eye position in world space.
    ViewPos,

    WorldLightPos,
    WorldLightAmbient,
    WorldLightDiffuse,
    WorldLightSpecular,

    /// The headlamp sits at the eye.
    CameraLightPos,
    CameraLightAmbient,
    CameraLightDiffuse,
    CameraLightSpecular,

    MaterialAmbient,
    MaterialDiffuse,
    MaterialSpecular,
    MaterialShininess,
}

impl GlobalType {
    pub fn name(self) -> &'static str {
        self.into()
    }
}

#[derive(Default, Copy, Clone, Debug)]
pub struct Globals {
    pub world_from_model: Mat4,
    pub camera_from_world: Mat4,
    pub projection_from_camera: Mat4,
    pub projection_from_world: Mat4,
    pub projection_from_model: Mat4,
    pub view_pos: Vec3,
    pub world_light_pos: Vec3,
    pub world_light_ambient: Vec3,
    pub world_light_diffuse: Vec3,
    pub world_light_specular: Vec3,
    pub camera_light_pos: Vec3,
    pub camera_light_ambient: Vec3,
    pub camera_light_diffuse: Vec3,
    pub camera_light_specular: Vec3,
    pub material_ambient: Vec3,
    pub material_diffuse: Vec3,
    pub material_specular: Vec3,
    pub material_shininess: f32,
}

impl Globals {
    pub fn get(&self, global_type: GlobalType) -> &[f32] {
        match global_type {
            GlobalType::WorldFromModel => self.world_from_model.as_ref(),
            GlobalType::CameraFromWorld => self.camera_from_world.as_ref(),
            GlobalType::ProjectionFromCamera => self.projection_from_camera.as_ref(),
            GlobalType::ProjectionFromWorld => self.projection_from_world.as_ref(),
            GlobalType::ProjectionFromModel => self.projection_from_model.as_ref(),
            GlobalType::ViewPos => self.view_pos.as_ref(),
            GlobalType::WorldLightPos => self.world_light_pos.as_ref(),
            GlobalType::WorldLightAmbient => self.world_light_ambient.as_ref(),
            GlobalType::WorldLightDiffuse => self.world_light_diffuse.as_ref(),
            GlobalType::WorldLightSpecular => self.world_light_specular.as_ref(),
            GlobalType::CameraLightPos => self.camera_light_pos.as_ref(),
            GlobalType::CameraLightAmbient => self.camera_light_ambient.as_ref(),
            GlobalType::CameraLightDiffuse => self.camera_light_diffuse.as_ref(),
            GlobalType::CameraLightSpecular => self.camera_light_specular.as_ref(),
            GlobalType::MaterialAmbient => self.material_ambient.as_ref(),
            GlobalType::MaterialDiffuse => self.material_diffuse.as_ref(),
            GlobalType::MaterialSpecular => self.material_specular.as_ref(),
            GlobalType::MaterialShininess => slice::from_ref(&self.material_shininess),
        }
    }

    pub fn update_compound_matrices(&mut self) {
        self.projection_from_world = self.projection_from_camera * self.camera_from_world;
        self.projection_from_model = self.projection_from_world * self.world_from_model;
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn names_round_trip() {
        for global_type in GlobalType::iter() {
            assert_eq!(GlobalType::from_str(global_type.name()).unwrap(), global_type);
        }
        assert_eq!(GlobalType::ViewPos.name(), "view_pos");
        assert_eq!(GlobalType::MaterialShininess.name(), "material_shininess");
    }

    #[test]
    fn value_sizes() {
        let globals = Globals::default();
        assert_eq!(globals.get(GlobalType::WorldFromModel).len(), 16);
        assert_eq!(globals.get(GlobalType::CameraLightPos).len(), 3);
        assert_eq!(globals.get(GlobalType::MaterialShininess).len(), 1);
    }

    #[test]
    fn compound_matrices() {
        let mut globals = Globals {
            world_from_model: Mat4::from_scale(Vec3::splat(2.0)),
            camera_from_world: Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
            projection_from_camera: Mat4::IDENTITY,
            ..Default::default()
        };
        globals.update_compound_matrices();
        let p = globals.projection_from_model.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(2.0, 0.0, -5.0), 1e-6));
    }
}
