//! Phong reflectance for the direct ray caster.

use lumen_core::Material;
use lumen_math::{Color, Vec3};

/// Phong parameters resolved from a material record. Every material kind
/// carries them; missing keys fall back to white with exponent 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    pub diffuse: Color,
    pub specular: Color,
    pub exponent: f32,
}

impl Default for Phong {
    fn default() -> Self {
        Self {
            diffuse: Color::ONE,
            specular: Color::ONE,
            exponent: 1.0,
        }
    }
}

impl Phong {
    pub fn from_material(material: &Material) -> Self {
        let defaults = Self::default();
        Self {
            diffuse: material.rgb_or("diffuseColor", defaults.diffuse),
            specular: material.rgb_or("specularColor", defaults.specular),
            exponent: material.float_or("specularEx", defaults.exponent),
        }
    }

    /// Reflectance toward unit `view` of light arriving from unit `light`,
    /// both pointing away from the surface.
    pub fn shade(&self, view: Vec3, light: Vec3, normal: Vec3) -> Color {
        let cos = normal.dot(light).max(0.0);
        let mirror = 2.0 * light.dot(normal) * normal - light;
        let highlight = view.dot(mirror).max(0.0).powf(self.exponent);
        self.diffuse * cos + self.specular * highlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::MaterialKind;

    #[test]
    fn test_defaults_and_overrides() {
        let plain = Phong::from_material(&Material::new("p", MaterialKind::Phong));
        assert_eq!(plain, Phong::default());

        let glass = Material::new("g", MaterialKind::Dielectric)
            .with_rgb("diffuseColor", Color::splat(0.5))
            .with_float("specularEx", 20.0);
        let phong = Phong::from_material(&glass);
        assert_eq!(phong.diffuse, Color::splat(0.5));
        assert_eq!(phong.specular, Color::ONE);
        assert_eq!(phong.exponent, 20.0);
    }

    #[test]
    fn test_mirror_direction_peaks() {
        let phong = Phong {
            diffuse: Color::ZERO,
            specular: Color::ONE,
            exponent: 8.0,
        };
        let light = Vec3::new(1.0, 1.0, 0.0).normalize();
        let mirror = Vec3::new(-1.0, 1.0, 0.0).normalize();

        let peak = phong.shade(mirror, light, Vec3::Y);
        assert!((peak - Color::ONE).abs().max_element() < 1e-5);

        let off = phong.shade(Vec3::Y, light, Vec3::Y);
        assert!(off.x < peak.x);
        // Facing away from the mirror direction gives no highlight
        assert_eq!(phong.shade(light, light, Vec3::Y).x, 0.0);
    }

    #[test]
    fn test_diffuse_follows_cosine() {
        let phong = Phong {
            diffuse: Color::new(1.0, 0.5, 0.0),
            specular: Color::ZERO,
            exponent: 1.0,
        };
        let light = Vec3::new(0.0, 0.5, 3f32.sqrt() / 2.0);
        let color = phong.shade(Vec3::Y, light, Vec3::Y);
        assert!((color - Color::new(0.5, 0.25, 0.0)).abs().max_element() < 1e-5);
    }
}
