#![warn(missing_docs)]

//! Ray-surface intersection for the RICH geometry kernel.
//!
//! Rays here behave as oriented lines: every crossing is reported with its
//! signed line parameter `t`, and the caller decides whether crossings
//! behind the origin are of interest. The layer intersection engine needs
//! both directions to resolve backward extrapolations.
//!
//! # Architecture
//!
//! - [`Ray`] - origin and unit direction
//! - [`intersect`] - triangle, sphere and plane intersectors plus the
//!   mesh-wide [`intersect_surface`]
//!
//! # Example
//!
//! ```ignore
//! use rich_kernel_geom::Surface;
//! use rich_kernel_math::{Point3, Vec3};
//! use rich_kernel_raytrace::{intersect_surface, Ray};
//!
//! let ray = Ray::new(Point3::new(0.0, 0.0, -100.0), Vec3::z());
//! for hit in intersect_surface(&ray, surface.faces()) {
//!     println!("face {} at t = {}", hit.face, hit.t);
//! }
//! ```

mod ray;
pub mod intersect;

pub use intersect::{intersect_surface, SurfaceHit};
pub use ray::Ray;
