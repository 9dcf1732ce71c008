//! wray renderer - Whitted-style CPU ray tracing
//!
//! Traces rays from a camera through a view plane, finds the nearest surface
//! each ray hits, and shades it with ambient and direct light plus recursive
//! reflection and transmission.
//!
//! A render is driven by a [`World`]: it owns the objects and lights, holds
//! the camera, tracer and view plane, and writes finished pixels to a
//! [`DisplaySink`].

mod bucket;
mod camera;
mod color;
mod display;
mod error;
mod light;
mod material;
mod render;
mod shade_rec;
mod texture;
mod tracer;
mod view_plane;
mod world;

pub mod brdf;
pub mod geometry;
pub mod sampler;

pub use bucket::{generate_buckets, Bucket, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, PixelSample, Pinhole, ThinLens};
pub use color::{
    clamp_to_color, color_to_rgba, gamma_correct, max_to_one, Color, ColorMapping, BLACK, RED, WHITE,
};
pub use display::{DisplaySink, FrameSink, ImageBuffer};
pub use error::{RenderResult, WorldError};
pub use geometry::{AaBox, Compound, GeometricObject, Grid, Plane, Sphere, Triangle, DEFAULT_GRID_MULTIPLIER};
pub use light::{Ambient, AreaLight, Directional, EnvironmentLight, Light, PointLight};
pub use material::{Emissive, Material, Matte, Phong, Reflective, SvMatte, Transparent};
pub use render::RenderStats;
pub use sampler::Sampler;
pub use shade_rec::{Hit, ShadeRec};
pub use texture::{Checker3D, ConstantColor, Texture};
pub use tracer::{RayCast, Tracer, TracerKind, Whitted};
pub use view_plane::ViewPlane;
pub use world::World;

/// Re-export Vec3 and common math types from wray_math
pub use wray_math::{Aabb, Interval, Ray, Vec3, K_EPSILON};
