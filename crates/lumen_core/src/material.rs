//! Material records with named, typed properties.
//!
//! A material is an opaque bag of properties keyed by name. Renderers query
//! the properties they understand and fall back to their own defaults when a
//! property is absent or has an unexpected type; a missing property is never
//! an error.

use std::collections::BTreeMap;

use lumen_math::Color;
use serde::{Deserialize, Serialize};

/// The scattering model a material selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Lambertian diffuse surface.
    Lambertian,
    /// Phong surface, shaded by the ray caster; path tracers treat it as diffuse.
    Phong,
    /// Glass-like surface that both reflects and refracts.
    Dielectric,
    /// Metal described by a complex index of refraction.
    Conductor,
    /// Diffuse base under a smooth specular coat.
    Plastic,
    /// Shiny metal-like surface sharing the conductor's Fresnel model.
    Glossy,
}

/// A single typed property value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Rgb(Color),
    Float(f32),
    TextureId(u32),
}

/// A material definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name (for diagnostics)
    #[serde(default)]
    pub name: String,

    /// Scattering model
    pub kind: MaterialKind,

    /// Named properties, e.g. "diffuseColor", "ior", "eta"
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
}

impl Material {
    /// Create a material of the given kind with no properties.
    pub fn new(name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: BTreeMap::new(),
        }
    }

    /// Create a Lambertian material with a diffuse color.
    pub fn lambertian(name: impl Into<String>, diffuse_color: Color) -> Self {
        Self::new(name, MaterialKind::Lambertian).with_rgb("diffuseColor", diffuse_color)
    }

    /// Set an RGB property.
    pub fn with_rgb(mut self, key: &str, value: Color) -> Self {
        self.properties.insert(key.to_string(), Property::Rgb(value));
        self
    }

    /// Set a scalar property.
    pub fn with_float(mut self, key: &str, value: f32) -> Self {
        self.properties.insert(key.to_string(), Property::Float(value));
        self
    }

    /// Set a texture id property.
    pub fn with_texture(mut self, key: &str, id: u32) -> Self {
        self.properties.insert(key.to_string(), Property::TextureId(id));
        self
    }

    /// Check whether a property of any type exists.
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Look up an RGB property.
    pub fn rgb(&self, key: &str) -> Option<Color> {
        match self.properties.get(key) {
            Some(Property::Rgb(c)) => Some(*c),
            _ => None,
        }
    }

    /// Look up a scalar property.
    pub fn float(&self, key: &str) -> Option<f32> {
        match self.properties.get(key) {
            Some(Property::Float(f)) => Some(*f),
            _ => None,
        }
    }

    /// Look up a texture id property.
    pub fn texture(&self, key: &str) -> Option<u32> {
        match self.properties.get(key) {
            Some(Property::TextureId(id)) => Some(*id),
            _ => None,
        }
    }

    /// RGB property or a default.
    pub fn rgb_or(&self, key: &str, default: Color) -> Color {
        self.rgb(key).unwrap_or(default)
    }

    /// Scalar property or a default.
    pub fn float_or(&self, key: &str, default: f32) -> f32 {
        self.float(key).unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_lookup() {
        let m = Material::new("glass", MaterialKind::Dielectric)
            .with_float("ior", 1.33)
            .with_rgb("absorbed", Color::new(0.9, 1.0, 0.9))
            .with_texture("diffuseMap", 3);

        assert_eq!(m.float("ior"), Some(1.33));
        assert_eq!(m.rgb("absorbed"), Some(Color::new(0.9, 1.0, 0.9)));
        assert_eq!(m.texture("diffuseMap"), Some(3));
        assert!(m.has_property("ior"));
    }

    #[test]
    fn test_type_mismatch_is_absent() {
        let m = Material::new("odd", MaterialKind::Lambertian).with_float("diffuseColor", 0.5);

        assert_eq!(m.rgb("diffuseColor"), None);
        assert_eq!(m.rgb_or("diffuseColor", Color::ONE), Color::ONE);
    }

    #[test]
    fn test_missing_property_defaults() {
        let m = Material::new("bare", MaterialKind::Conductor);
        assert_eq!(m.float_or("eta", 0.29), 0.29);
        assert!(!m.has_property("k"));
    }

    #[test]
    fn test_material_json() {
        let json = r#"{
            "name": "red",
            "kind": "lambertian",
            "properties": { "diffuseColor": { "rgb": [0.8, 0.1, 0.1] } }
        }"#;
        let m: Material = serde_json::from_str(json).unwrap();

        assert_eq!(m.kind, MaterialKind::Lambertian);
        assert_eq!(m.rgb("diffuseColor"), Some(Color::new(0.8, 0.1, 0.1)));
    }
}
