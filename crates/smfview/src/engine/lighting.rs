//! Light sources, plus a CPU mirror of the reflectance model in `common.wgsl` for tests.

use glam::Vec3;

use super::material::Material;

/// A point light with Phong intensities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl Light {
    /// The orbiting light, positioned each frame.
    pub fn world(position: Vec3) -> Self {
        Light {
            position,
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.6),
            specular: Vec3::splat(1.0),
        }
    }

    /// The headlamp, dimmer than the world light and always at the eye.
    pub fn headlamp(position: Vec3) -> Self {
        Light {
            position,
            ambient: Vec3::splat(0.1),
            diffuse: Vec3::splat(0.4),
            specular: Vec3::splat(0.5),
        }
    }
}

/// Reflected color of a single light at a surface point. `normal` must be unit length.
#[cfg(test)]
pub fn reflect_light(
    normal: Vec3,
    position: Vec3,
    view_pos: Vec3,
    light: &Light,
    material: &Material,
) -> Vec3 {
    let to_light = (light.position - position).normalize_or_zero();
    let to_view = (view_pos - position).normalize_or_zero();
    let reflected = reflect(-to_light, normal);
    let diffuse = normal.dot(to_light).max(0.0);
    let specular = reflected.dot(to_view).max(0.0).powf(material.shininess);
    light.ambient * material.ambient
        + light.diffuse * diffuse * material.diffuse
        + light.specular * specular * material.specular
}

/// Mirrors `incident` about the plane with unit normal `normal`, like WGSL `reflect`.
#[cfg(test)]
fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

#[cfg(test)]
pub fn reflect_lights(
    normal: Vec3,
    position: Vec3,
    view_pos: Vec3,
    lights: &[Light],
    material: &Material,
) -> Vec3 {
    lights
        .iter()
        .map(|light| reflect_light(normal, position, view_pos, light, material))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::material::MATERIALS;

    #[test]
    fn light_behind_surface_leaves_only_ambient() {
        let material = &MATERIALS[0];
        let light = Light::world(Vec3::new(0.0, 0.0, -5.0));
        let color = reflect_light(Vec3::Z, Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), &light, material);
        assert!(color.abs_diff_eq(light.ambient * material.ambient, 1e-6));
    }

    #[test]
    fn head_on_light_is_fully_lit() {
        let material = &MATERIALS[2];
        let eye = Vec3::new(0.0, 0.0, 3.0);
        let light = Light::headlamp(eye);
        let color = reflect_light(Vec3::Z, Vec3::ZERO, eye, &light, material);
        let expected = light.ambient * material.ambient
            + light.diffuse * material.diffuse
            + light.specular * material.specular;
        assert!(color.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn lights_are_summed() {
        let material = &MATERIALS[1];
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let lights = [Light::world(Vec3::new(2.0, 0.5, 0.0)), Light::headlamp(eye)];
        let sum = reflect_lights(Vec3::Y, Vec3::ZERO, eye, &lights, material);
        let separate = reflect_light(Vec3::Y, Vec3::ZERO, eye, &lights[0], material)
            + reflect_light(Vec3::Y, Vec3::ZERO, eye, &lights[1], material);
        assert!(sum.abs_diff_eq(separate, 1e-6));
    }
}
