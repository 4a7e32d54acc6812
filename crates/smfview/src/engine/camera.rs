use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use strum::Display;

use super::material::MATERIALS;
use super::shading::ShadingMode;
use super::Size2D;

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;
const ORTHO_DEPTH: f32 = 100.0;

/// A point circling the vertical axis through a pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orbit {
    pub angle: f32,
    pub radius: f32,
    pub height: f32,
}

impl Orbit {
    pub fn position(&self, pivot: Vec3) -> Vec3 {
        pivot
            + Vec3::new(
                self.radius * self.angle.cos(),
                self.height,
                self.radius * self.angle.sin(),
            )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

impl Projection {
    pub fn toggled(self) -> Self {
        match self {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        }
    }
}

/// Tunable parameters of the camera and light rig.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigParams {
    pub camera: Orbit,
    pub light: Orbit,
    pub angle_step: f32,
    pub radius_step: f32,
    pub camera_height_step: f32,
    pub light_height_step: f32,
    pub min_camera_radius: f32,

    /// Fixed orthographic half-height. Follows the camera radius when unset.
    pub ortho_half_height: Option<f32>,
}

impl Default for RigParams {
    fn default() -> Self {
        RigParams {
            camera: Orbit {
                angle: 0.0,
                radius: 3.5,
                height: 0.0,
            },
            light: Orbit {
                angle: 0.0,
                radius: 2.0,
                height: 0.5,
            },
            angle_step: 0.02,
            radius_step: 0.04,
            camera_height_step: 0.03,
            light_height_step: 0.04,
            min_camera_radius: 0.2,
            ortho_half_height: None,
        }
    }
}

/// Camera orbit, light orbit and display modes, mutated by per-frame input.
#[derive(Debug, Clone, PartialEq)]
pub struct RigState {
    pub camera: Orbit,
    pub light: Orbit,
    pub shading: ShadingMode,
    pub projection: Projection,
    pub material_index: usize,
    pub params: RigParams,
}

impl RigState {
    pub fn new(params: RigParams) -> Self {
        let mut rig = RigState {
            camera: params.camera,
            light: params.light,
            shading: ShadingMode::default(),
            projection: Projection::default(),
            material_index: 0,
            params,
        };
        rig.nudge_camera_radius(0.0);
        rig
    }

    pub fn nudge_camera_angle(&mut self, direction: f32) {
        self.camera.angle += direction * self.params.angle_step;
    }

    /// Moves the camera along its orbit radius, never closer than `min_camera_radius`.
    pub fn nudge_camera_radius(&mut self, direction: f32) {
        self.camera.radius = (self.camera.radius + direction * self.params.radius_step)
            .max(self.params.min_camera_radius);
    }

    pub fn nudge_camera_height(&mut self, direction: f32) {
        self.camera.height += direction * self.params.camera_height_step;
    }

    pub fn nudge_light_angle(&mut self, direction: f32) {
        self.light.angle += direction * self.params.angle_step;
    }

    pub fn nudge_light_radius(&mut self, direction: f32) {
        self.light.radius += direction * self.params.radius_step;
    }

    pub fn nudge_light_height(&mut self, direction: f32) {
        self.light.height += direction * self.params.light_height_step;
    }

    pub fn toggle_shading(&mut self) {
        self.shading = self.shading.toggled();
    }

    pub fn toggle_projection(&mut self) {
        self.projection = self.projection.toggled();
    }

    pub fn select_material(&mut self, index: usize) {
        self.material_index = index.min(MATERIALS.len() - 1);
    }

    pub fn eye(&self) -> Vec3 {
        self.camera.position(Vec3::ZERO)
    }

    pub fn world_light_position(&self) -> Vec3 {
        self.light.position(Vec3::ZERO)
    }

    /// The headlamp rides with the camera.
    pub fn headlamp_position(&self) -> Vec3 {
        self.eye()
    }

    pub fn camera_from_world(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_from_camera(&self, surface_size: Size2D) -> Mat4 {
        let aspect = aspect_ratio(surface_size);
        match self.projection {
            Projection::Perspective => Mat4::perspective_rh(FRAC_PI_4, aspect, Z_NEAR, Z_FAR),
            Projection::Orthographic => {
                let half_height = self.params.ortho_half_height.unwrap_or(self.camera.radius);
                let half_width = half_height * aspect;
                Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    -ORTHO_DEPTH,
                    ORTHO_DEPTH,
                )
            }
        }
    }
}

/// Width over height, or 1.0 for a degenerate surface.
pub fn aspect_ratio(size: Size2D) -> f32 {
    if size[0] == 0 || size[1] == 0 {
        1.0
    } else {
        size[0] as f32 / size[1] as f32
    }
}
