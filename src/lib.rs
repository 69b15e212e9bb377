//! Core algorithms for an image viewer's intensity-profile and topographic-view tools.
//!
//! The crate has two independent pipelines. The profile pipeline resamples image layers along a
//! user drawn polyline (`profile::resample`) and keeps a `session::ProfileSession` that redraws
//! those profiles when the active path or the visible layers change. The topographic pipeline
//! extrudes a 2D height field into 3D volumes (`topo::build_volumes`) and turns them into image,
//! point cloud, or isosurface views (`topo::build_view`).
//!
//! Nothing in this crate draws anything. The host viewer supplies layers and receives numeric
//! buffers back.

use std::error::Error;

pub mod common;
pub mod errors;
pub mod iso;
pub mod layers;
pub mod profile;
pub mod session;
pub mod topo;

pub use parry3d_f64::na;

pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

pub type Point2 = parry2d_f64::na::Point2<f64>;
pub type Point3 = parry3d_f64::na::Point3<f64>;
pub type Vector3 = parry3d_f64::na::Vector3<f64>;

pub use errors::InvalidInput;
pub use layers::{ImageData, ImageLayer, Layer, LayerId, LayerList, Path, PathId, ShapesLayer};
pub use profile::{Intensity, ProfileRecord, ProfileTable, SampleSet, resample};
pub use session::{NullSurface, PlotSurface, ProfileConfig, ProfileSession, RedrawOutcome};
pub use topo::{
    TopographicMode, TopographicOptions, TopographicView, TopographicVolume, build_view,
    build_volumes,
};
