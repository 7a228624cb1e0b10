//! Planar algorithms over coordinate sequences.
//!
//! Algorithms work on the XY projection of coordinates. Rings are given without the closing coordinate, the closing
//! segment is implied. Predicates take the precision model whose tolerance decides degenerate cases.

mod area;
mod centroid;
mod orientation;
mod segment;

pub use area::signed_area;
pub use centroid::{curve_centroid, mean_coordinate, surface_centroid};
pub use orientation::{is_convex, Orientation};
pub use segment::{is_simple, segments_intersect};

pub(crate) use segment::distinct_consecutive;

/// Iterates over the segments of a coordinate sequence, including the closing segment if `closed` is set.
pub(crate) fn segments(
    coordinates: &[meridian_types::Coordinate],
    closed: bool,
) -> impl Iterator<Item = (meridian_types::Coordinate, meridian_types::Coordinate)> + '_ {
    let closing = if closed && coordinates.len() > 2 {
        coordinates.last().copied().zip(coordinates.first().copied())
    } else {
        None
    };

    coordinates
        .windows(2)
        .map(|w| (w[0], w[1]))
        .chain(closing)
}
