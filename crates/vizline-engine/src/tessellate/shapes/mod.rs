//! Per-primitive tessellation.

mod arc;
mod arrow;
mod boxes;
mod cone;
mod linear;
mod sphere;
mod torus;

pub(crate) use arc::Arc;
pub(crate) use arrow::Arrow;
pub(crate) use boxes::BoxShape;
pub(crate) use cone::{Cone, ConicalFrustum};
pub(crate) use linear::{Grid, Line, Point, Quad};
pub(crate) use sphere::Sphere;
pub(crate) use torus::Torus;
