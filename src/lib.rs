#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod arrangement;
pub mod counting;
pub mod geometry;
pub mod linear;
pub mod sweep;

// pub so that we can use it in fuzz tests, but it's really private
#[doc(hidden)]
pub mod treevec;

use std::fmt;

pub use arrangement::Arrangement;
pub use counting::{CountingGeometry, Operation};
pub use geometry::{CurveEnd, Geometry, GeometryError, Intersection, ParameterSpace, XMonotone};
pub use linear::{LinearCurve, LinearGeometry, LinearObject, LinearPoint};
pub use sweep::{sweep, sweep_with_config, Edge, EventPoint, SweepConfig, Sweeper, VertexIdx, Visitor};

/// The ways in which a sweep can fail.
///
/// All of these are fatal: the sweep stops, and whatever was already
/// reported to the visitor should be discarded.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The geometry gave answers that contradict one another, or failed to
    /// split or merge a curve where the sweep needed it to.
    #[error("geometry contract violation: {reason} (curve {curve}, at {point})")]
    GeometryContractViolation {
        /// What went wrong.
        reason: String,
        /// The curve involved, formatted with `Debug`.
        curve: String,
        /// The event at which it went wrong.
        point: String,
        /// The error reported by the geometry, if there was one.
        #[source]
        source: Option<GeometryError>,
    },
    /// The geometry's ordering of events is not a consistent total order.
    #[error("ambiguous event order between {first} and {second}")]
    AmbiguousEventOrder {
        /// One of the events.
        first: String,
        /// The other event.
        second: String,
    },
    /// Curves were inserted after the sweep had started.
    #[error("curves can only be inserted before the sweep starts")]
    SweepInProgress,
}

impl Error {
    pub(crate) fn violation(
        reason: &str,
        curve: &impl fmt::Debug,
        point: &impl fmt::Display,
    ) -> Self {
        Error::GeometryContractViolation {
            reason: reason.to_owned(),
            curve: format!("{curve:?}"),
            point: point.to_string(),
            source: None,
        }
    }

    pub(crate) fn geometry(
        source: GeometryError,
        reason: &str,
        curve: &impl fmt::Debug,
        point: &impl fmt::Display,
    ) -> Self {
        Error::GeometryContractViolation {
            reason: reason.to_owned(),
            curve: format!("{curve:?}"),
            point: point.to_string(),
            source: Some(source),
        }
    }

    pub(crate) fn ambiguous_order(first: &impl fmt::Display, second: &impl fmt::Display) -> Self {
        Error::AmbiguousEventOrder {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}
