use glam::Mat4;
use tracing::info;

use crate::control::input::FrameInput;
use crate::control::Control;
use crate::engine::camera::{RigParams, RigState};
use crate::engine::lighting::Light;
use crate::engine::material::Material;
use crate::engine::{Globals, Size2D};

/// Per-frame logic: applies input to the rig and derives the uniform values of the frame.
pub struct FrameDriver {
    rig: RigState,
    world_from_model: Mat4,
    exit_requested: bool,
}

impl FrameDriver {
    pub fn new(params: RigParams, world_from_model: Mat4) -> Self {
        Self {
            rig: RigState::new(params),
            world_from_model,
            exit_requested: false,
        }
    }

    pub fn rig(&self) -> &RigState {
        &self.rig
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn step(&mut self, input: &FrameInput) {
        for &control in &input.held {
            self.apply_held(control);
        }
        for &control in &input.pressed {
            self.apply_pressed(control);
        }
    }

    fn apply_held(&mut self, control: Control) {
        let rig = &mut self.rig;
        match control {
            Control::CameraLeft => rig.nudge_camera_angle(-1.0),
            Control::CameraRight => rig.nudge_camera_angle(1.0),
            Control::ZoomIn => rig.nudge_camera_radius(-1.0),
            Control::ZoomOut => rig.nudge_camera_radius(1.0),
            Control::CameraUp => rig.nudge_camera_height(1.0),
            Control::CameraDown => rig.nudge_camera_height(-1.0),
            Control::LightLeft => rig.nudge_light_angle(-1.0),
            Control::LightRight => rig.nudge_light_angle(1.0),
            Control::LightIn => rig.nudge_light_radius(-1.0),
            Control::LightOut => rig.nudge_light_radius(1.0),
            Control::LightUp => rig.nudge_light_height(1.0),
            Control::LightDown => rig.nudge_light_height(-1.0),
            _ => {}
        }
    }

    fn apply_pressed(&mut self, control: Control) {
        match control {
            Control::ToggleShading => {
                self.rig.toggle_shading();
                info!("Shading: {}", self.rig.shading);
            }
            Control::ToggleProjection => {
                self.rig.toggle_projection();
                info!("Projection: {}", self.rig.projection);
            }
            Control::Material1 => self.select_material(0),
            Control::Material2 => self.select_material(1),
            Control::Material3 => self.select_material(2),
            Control::Exit => {
                info!("Exiting on user request.");
                self.exit_requested = true;
            }
            _ => {}
        }
    }

    fn select_material(&mut self, index: usize) {
        self.rig.select_material(index);
        info!(
            "Material {}: {}",
            self.rig.material_index + 1,
            Material::by_index(self.rig.material_index).name
        );
    }

    /// Computes every uniform value for the current rig and surface size.
    pub fn globals(&self, surface_size: Size2D) -> Globals {
        let rig = &self.rig;
        let eye = rig.eye();
        let world_light = Light::world(rig.world_light_position());
        let camera_light = Light::headlamp(rig.headlamp_position());
        let material = Material::by_index(rig.material_index);

        let mut globals = Globals {
            world_from_model: self.world_from_model,
            camera_from_world: rig.camera_from_world(),
            projection_from_camera: rig.projection_from_camera(surface_size),
            view_pos: eye,
            world_light_pos: world_light.position,
            world_light_ambient: world_light.ambient,
            world_light_diffuse: world_light.diffuse,
            world_light_specular: world_light.specular,
            camera_light_pos: camera_light.position,
            camera_light_ambient: camera_light.ambient,
            camera_light_diffuse: camera_light.diffuse,
            camera_light_specular: camera_light.specular,
            material_ambient: material.ambient,
            material_diffuse: material.diffuse,
            material_specular: material.specular,
            material_shininess: material.shininess,
            ..Default::default()
        };
        globals.update_compound_matrices();
        globals
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use smallvec::smallvec;

    use super::*;
    use crate::control::input::ControlInput;
    use crate::engine::camera::Projection;
    use crate::engine::material::MATERIALS;
    use crate::engine::shading::ShadingMode;

    fn driver() -> FrameDriver {
        FrameDriver::new(RigParams::default(), Mat4::IDENTITY)
    }

    #[test]
    fn held_controls_step_every_frame() {
        let mut driver = driver();
        let params = RigParams::default();
        let input = FrameInput {
            held: smallvec![Control::CameraRight, Control::LightUp],
            pressed: smallvec![],
        };
        for _ in 0..5 {
            driver.step(&input);
        }
        assert!((driver.rig().camera.angle - 5.0 * params.angle_step).abs() < 1e-6);
        assert!(
            (driver.rig().light.height - (params.light.height + 5.0 * params.light_height_step))
                .abs()
                < 1e-6
        );
    }

    #[test]
    fn held_toggle_switches_shading_once() {
        let mut driver = driver();
        let mut controls = ControlInput::default();
        controls.set_held(Control::ToggleShading, true);
        for _ in 0..30 {
            driver.step(&controls.sample());
        }
        assert_eq!(driver.rig().shading, ShadingMode::Vertex);
    }

    #[test]
    fn pressed_controls() {
        let mut driver = driver();
        driver.step(&FrameInput {
            held: smallvec![],
            pressed: smallvec![Control::ToggleProjection, Control::Material3],
        });
        assert_eq!(driver.rig().projection, Projection::Orthographic);
        assert_eq!(driver.rig().material_index, 2);
        assert!(!driver.exit_requested());

        driver.step(&FrameInput {
            held: smallvec![],
            pressed: smallvec![Control::Exit],
        });
        assert!(driver.exit_requested());
    }

    #[test]
    fn globals_follow_rig() {
        let mut driver = driver();
        driver.step(&FrameInput {
            held: smallvec![Control::CameraLeft],
            pressed: smallvec![Control::Material2],
        });
        let globals = driver.globals([800, 600]);
        let rig = driver.rig();

        assert_eq!(globals.view_pos, rig.eye());
        assert_eq!(globals.camera_light_pos, globals.view_pos);
        assert_eq!(globals.world_light_pos, rig.world_light_position());
        assert_eq!(globals.material_diffuse, MATERIALS[1].diffuse);
        assert_eq!(globals.material_shininess, MATERIALS[1].shininess);
        assert_eq!(
            globals.projection_from_model,
            globals.projection_from_camera * globals.camera_from_world
        );
        assert_eq!(globals.world_light_ambient, Vec3::splat(0.2));
    }
}
