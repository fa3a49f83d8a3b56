//! Surface scattering functions.
//!
//! One tagged enum covers every material kind. Both the path integrators
//! and the photon tracer call [`Bsdf::shade`] and branch on the returned
//! [`Lobe`], so material dispatch happens only here.

use std::f32::consts::PI;

use lumen_core::{Material, MaterialKind};
use lumen_math::{Color, Onb, Ray, Vec3};
use rand::RngCore;

use crate::sampler::{sample_hemisphere, HEMISPHERE_PDF};

/// Below this incidence cosine a coated surface only reflects.
const GRAZING_COS: f32 = 0.01;
/// Above this incidence cosine a coated surface only transmits.
const NORMAL_COS: f32 = 0.99;
/// Weight of the diffuse direction in the plastic's reflected ray.
const PLASTIC_DIFFUSE_MIX: f32 = 0.2;

/// Copper-like defaults for conductors.
const DEFAULT_ETA: f32 = 0.29;
const DEFAULT_K: f32 = 3.88;

/// Scattering model of one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bsdf {
    Diffuse {
        albedo: Color,
    },
    Dielectric {
        ior: f32,
        absorbed: Color,
    },
    Conductor {
        eta: f32,
        k: f32,
        absorbed: Color,
    },
    Plastic {
        albedo: Color,
        specular: Color,
        ior: f32,
    },
    Glossy {
        eta: f32,
        k: f32,
        absorbed: Color,
    },
}

/// How the integrator should treat a scattered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lobe {
    /// Sampled direction with `attenuation` as BRDF value and `pdf` as density.
    Diffuse,
    /// Deterministic directions weighted by their ratios.
    Specular,
}

/// Transmitted branch of a shade call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refraction {
    pub ray: Ray,
    pub ratio: Color,
}

/// Output of [`Bsdf::shade`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scattered {
    pub lobe: Lobe,
    /// Sampled (diffuse) or reflected (specular) ray
    pub ray: Ray,
    /// BRDF value for diffuse lobes, reflection ratio for specular ones
    pub attenuation: Color,
    pub emitted: Color,
    pub pdf: f32,
    pub refraction: Option<Refraction>,
}

impl Bsdf {
    /// Resolve a material record, falling back to per-kind defaults for any
    /// missing property.
    pub fn from_material(material: &Material) -> Self {
        let rgb = |key: &str| material.rgb_or(key, Color::ONE);
        match material.kind {
            MaterialKind::Lambertian | MaterialKind::Phong => Bsdf::Diffuse {
                albedo: rgb("diffuseColor"),
            },
            MaterialKind::Dielectric => Bsdf::Dielectric {
                ior: material.float_or("ior", 1.5),
                absorbed: rgb("absorbed"),
            },
            MaterialKind::Conductor => Bsdf::Conductor {
                eta: material.float_or("eta", DEFAULT_ETA),
                k: material.float_or("k", DEFAULT_K),
                absorbed: rgb("absorbed"),
            },
            MaterialKind::Glossy => Bsdf::Glossy {
                eta: material.float_or("eta", DEFAULT_ETA),
                k: material.float_or("k", DEFAULT_K),
                absorbed: rgb("absorbed"),
            },
            MaterialKind::Plastic => Bsdf::Plastic {
                albedo: rgb("diffuseColor"),
                specular: rgb("specularColor"),
                ior: material.float_or("refractIndex", 1.46),
            },
        }
    }

    pub fn is_diffuse(&self) -> bool {
        matches!(self, Bsdf::Diffuse { .. })
    }

    /// Scatter `ray` arriving at `point` on a surface with geometric `normal`.
    pub fn shade(&self, ray: &Ray, point: Vec3, normal: Vec3, rng: &mut dyn RngCore) -> Scattered {
        match *self {
            Bsdf::Diffuse { albedo } => {
                let n = face_forward(normal, ray.direction);
                let direction = Onb::from_w(n).local(sample_hemisphere(rng)).normalize();
                Scattered {
                    lobe: Lobe::Diffuse,
                    ray: Ray::new(point, direction),
                    attenuation: albedo / PI,
                    emitted: Color::ZERO,
                    pdf: HEMISPHERE_PDF,
                    refraction: None,
                }
            }
            Bsdf::Dielectric { ior, absorbed } => {
                let incidence = Incidence::new(ray, normal);
                let reflectance = schlick(incidence.cos, ior);
                let reflected = reflect(incidence.dir, incidence.normal);
                let transmitted =
                    refract(incidence.dir, incidence.normal, incidence.relative_ior(ior));
                split(
                    point,
                    &incidence,
                    reflected,
                    transmitted,
                    reflectance * absorbed,
                    (1.0 - reflectance) * absorbed,
                    absorbed,
                )
            }
            Bsdf::Plastic {
                albedo,
                specular,
                ior,
            } => {
                let incidence = Incidence::new(ray, normal);
                let reflectance = schlick(incidence.cos, ior);
                let diffuse_dir = Onb::from_w(incidence.normal)
                    .local(sample_hemisphere(rng))
                    .normalize();
                let mirror = reflect(incidence.dir, incidence.normal);
                let reflected = mirror.lerp(diffuse_dir, PLASTIC_DIFFUSE_MIX).normalize_or_zero();
                let transmitted =
                    refract(incidence.dir, incidence.normal, incidence.relative_ior(ior));
                split(
                    point,
                    &incidence,
                    reflected,
                    transmitted,
                    reflectance * albedo * specular,
                    (1.0 - reflectance) * albedo,
                    albedo,
                )
            }
            Bsdf::Conductor { eta, k, absorbed } | Bsdf::Glossy { eta, k, absorbed } => {
                let incidence = Incidence::new(ray, normal);
                let ratio = if incidence.entering {
                    conductor_reflectance(incidence.cos, eta, k) * absorbed
                } else {
                    Color::ZERO
                };
                Scattered {
                    lobe: Lobe::Specular,
                    ray: Ray::new(point, reflect(incidence.dir, incidence.normal)),
                    attenuation: ratio,
                    emitted: Color::ZERO,
                    pdf: 1.0,
                    refraction: None,
                }
            }
        }
    }
}

/// Incoming direction and normal oriented against each other.
struct Incidence {
    /// Unit incoming direction
    dir: Vec3,
    /// Unit normal on the incoming side
    normal: Vec3,
    /// `dot(-dir, normal)`, non-negative
    cos: f32,
    /// Whether the ray arrived from the side the geometric normal faces
    entering: bool,
}

impl Incidence {
    fn new(ray: &Ray, normal: Vec3) -> Self {
        let dir = ray.direction.normalize_or_zero();
        let mut normal = normal.normalize_or_zero();
        let mut cos = (-dir).dot(normal);
        let entering = cos > 0.0;
        if !entering {
            normal = -normal;
            cos = -cos;
        }
        Self {
            dir,
            normal,
            cos,
            entering,
        }
    }

    /// Ratio of indices across the interface in the direction of travel.
    fn relative_ior(&self, ior: f32) -> f32 {
        if self.entering {
            1.0 / ior
        } else {
            ior
        }
    }
}

/// Reflection plus optional refraction with the grazing and normal-incidence
/// limits applied. Total internal reflection sends everything to reflection.
fn split(
    point: Vec3,
    incidence: &Incidence,
    reflected: Vec3,
    transmitted: Option<Vec3>,
    reflect_ratio: Color,
    refract_ratio: Color,
    total: Color,
) -> Scattered {
    let (reflect_ratio, refraction) = match transmitted {
        Some(_) if incidence.cos > NORMAL_COS => (Color::ZERO, transmitted.map(|d| (d, total))),
        Some(d) if incidence.cos >= GRAZING_COS => (reflect_ratio, Some((d, refract_ratio))),
        _ => (total, None),
    };

    Scattered {
        lobe: Lobe::Specular,
        ray: Ray::new(point, reflected),
        attenuation: reflect_ratio,
        emitted: Color::ZERO,
        pdf: 1.0,
        refraction: refraction.map(|(direction, ratio)| Refraction {
            ray: Ray::new(point, direction),
            ratio,
        }),
    }
}

/// Flip `normal` so it faces against `direction`.
#[inline]
pub fn face_forward(normal: Vec3, direction: Vec3) -> Vec3 {
    if normal.dot(direction) > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Schlick's approximation for a dielectric interface.
fn schlick(cos: f32, ior: f32) -> f32 {
    let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cos).powi(5)
}

/// Schlick-style reflectance for a conductor with complex index `eta + ik`.
fn conductor_reflectance(cos: f32, eta: f32, k: f32) -> f32 {
    let k2 = k * k;
    let r0 = ((eta - 1.0).powi(2) + k2) / ((eta + 1.0).powi(2) + k2);
    r0 + (1.0 - r0) * (1.0 - cos).powi(5)
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit `v` through unit `n` with relative index `eta`.
/// `None` on total internal reflection.
#[inline]
fn refract(v: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let cos = n.dot(v);
    let k = 1.0 - eta * eta * (1.0 - cos * cos);
    if k < 0.0 {
        None
    } else {
        Some(eta * v - (eta * cos + k.sqrt()) * n)
    }
}
