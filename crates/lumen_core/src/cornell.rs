//! Built-in Cornell box scene.
//!
//! A 2x2x2 box centered at the origin, open toward +Z, lit by a square area
//! light just below the ceiling. Holds a glass sphere and a copper sphere.

use lumen_math::{Color, Vec3};

use crate::geometry::{Model, Plane, Sphere};
use crate::light::AreaLight;
use crate::material::{Material, MaterialKind};
use crate::scene::{Camera, RenderOptions, Scene};

/// Build the Cornell box in local space (call `bake_world_transforms` before rendering).
pub fn cornell_box() -> Scene {
    let mut scene = Scene::new("cornell_box");

    scene.camera = Camera {
        position: Vec3::new(0.0, 0.0, 3.9),
        look_at: Vec3::ZERO,
        up: Vec3::Y,
        fov: 38.0,
        aspect: None,
    };
    scene.render_options = RenderOptions {
        width: 256,
        height: 256,
        max_depth: 8,
        samples_per_pixel: 16,
        photon_count: 20_000,
    };

    let white = scene.add_material(Material::lambertian("white", Color::splat(0.73)));
    let red = scene.add_material(Material::lambertian("red", Color::new(0.65, 0.05, 0.05)));
    let green = scene.add_material(Material::lambertian("green", Color::new(0.12, 0.45, 0.15)));
    let glass = scene.add_material(
        Material::new("glass", MaterialKind::Dielectric)
            .with_float("ior", 1.5)
            .with_rgb("absorbed", Color::ONE),
    );
    let copper = scene.add_material(Material::new("copper", MaterialKind::Conductor));

    let x2 = Vec3::new(2.0, 0.0, 0.0);
    let y2 = Vec3::new(0.0, 2.0, 0.0);
    let z2 = Vec3::new(0.0, 0.0, 2.0);
    let corner = Vec3::splat(-1.0);

    // Floor, ceiling, back, left, right; every normal faces the interior
    scene.add_plane(Plane::new(corner, z2, x2, white));
    scene.add_plane(Plane::new(Vec3::new(-1.0, 1.0, -1.0), x2, z2, white));
    scene.add_plane(Plane::new(corner, x2, y2, white));
    scene.add_plane(Plane::new(corner, y2, z2, red));
    scene.add_plane(Plane::new(Vec3::new(1.0, -1.0, -1.0), z2, y2, green));

    scene.add_sphere(Sphere::new(Vec3::new(0.45, -0.6, 0.3), 0.4, glass));

    // Placed through a model to exercise the world transform pass
    let model = scene.add_model(Model::from_translation(Vec3::new(-0.45, -0.6, -0.35)));
    let node = scene.add_sphere(Sphere::new(Vec3::ZERO, 0.4, copper));
    scene.nodes[node].model = Some(model);

    scene.add_area_light(AreaLight::new(
        Color::splat(15.0),
        Vec3::new(-0.3, 0.99, -0.3),
        Vec3::new(0.6, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.6),
    ));

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cornell_box_is_valid() {
        let scene = cornell_box();
        assert!(scene.validate().is_ok());
        assert_eq!(scene.planes.len(), 5);
        assert_eq!(scene.spheres.len(), 2);
    }

    #[test]
    fn test_walls_face_inward() {
        let scene = cornell_box();
        for plane in &scene.planes {
            let center = plane.position + 0.5 * (plane.u + plane.v);
            // Normal points from the wall toward the box center
            assert!(plane.face_normal().dot(-center) > 0.0);
        }
    }

    #[test]
    fn test_light_faces_down() {
        let scene = cornell_box();
        let normal = scene.area_lights[0].normal();
        assert!(normal.abs_diff_eq(Vec3::NEG_Y, 1e-6));
    }

    #[test]
    fn test_copper_sphere_baked_into_place() {
        let mut scene = cornell_box();
        scene.bake_world_transforms().unwrap();
        assert_eq!(scene.spheres[1].position, Vec3::new(-0.45, -0.6, -0.35));
    }
}
