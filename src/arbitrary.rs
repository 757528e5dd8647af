//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;
use kurbo::{Point, Vec2};

use crate::linear::LinearObject;

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate a point with small integer coordinates.
///
/// These make lots of coincidences: shared endpoints, collinear overlaps and
/// intersections at endpoints.
pub fn grid_point(size: i32, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    let x = u.int_in_range(-size..=size)?;
    let y = u.int_in_range(-size..=size)?;
    Ok(Point::new(x as f64, y as f64))
}

/// Generate a point with arbitrary coordinates in `[-size, size]`.
pub fn point(size: f64, u: &mut Unstructured<'_>) -> Result<Point, arbitrary::Error> {
    Ok(Point::new(
        float_in_range(-size, size, u)?,
        float_in_range(-size, size, u)?,
    ))
}

/// Generate a point, but give it a chance to be exactly equal to one of the
/// points in `prev`.
fn another_point(
    prev: &[Point],
    size: i32,
    u: &mut Unstructured<'_>,
) -> Result<Point, arbitrary::Error> {
    let reuse: bool = u.arbitrary()?;
    if reuse && !prev.is_empty() {
        Ok(*u.choose(prev)?)
    } else {
        grid_point(size, u)
    }
}

/// Generate a non-zero direction with small integer components, so any
/// slope can come up.
pub fn grid_direction(u: &mut Unstructured<'_>) -> Result<Vec2, arbitrary::Error> {
    let x: i32 = u.int_in_range(-3..=3)?;
    let y: i32 = u.int_in_range(-3..=3)?;
    if x == 0 && y == 0 {
        Ok(Vec2::new(1.0, 0.0))
    } else {
        Ok(Vec2::new(x as f64, y as f64))
    }
}

/// Generate a segment, ray, line or polyline on a grid of the given size.
pub fn grid_object(
    prev: &[Point],
    size: i32,
    u: &mut Unstructured<'_>,
) -> Result<LinearObject, arbitrary::Error> {
    let kind = u.int_in_range(0..=9u8)?;
    let p = another_point(prev, size, u)?;
    Ok(match kind {
        0 => LinearObject::Ray {
            source: p,
            direction: grid_direction(u)?,
        },
        1 => LinearObject::Line {
            through: p,
            direction: grid_direction(u)?,
        },
        2 => {
            let len = u.int_in_range(2..=5)?;
            let mut points = vec![p];
            for _ in 1..len {
                points.push(another_point(prev, size, u)?);
            }
            LinearObject::Polyline(points)
        }
        _ => LinearObject::Segment(p, another_point(prev, size, u)?),
    })
}

/// Generate a collection of objects on a grid of the given size.
pub fn grid_objects(
    size: i32,
    u: &mut Unstructured<'_>,
) -> Result<Vec<LinearObject>, arbitrary::Error> {
    let len = u.arbitrary_len::<[u8; 8]>()?.min(64);
    let mut points = Vec::new();
    let mut ret = Vec::with_capacity(len);
    for _ in 0..len {
        let obj = grid_object(&points, size, u)?;
        match &obj {
            LinearObject::Segment(p, q) => points.extend([*p, *q]),
            LinearObject::Ray { source, .. } => points.push(*source),
            LinearObject::Line { through, .. } => points.push(*through),
            LinearObject::Polyline(ps) => points.extend(ps.iter().copied()),
        }
        ret.push(obj);
    }
    Ok(ret)
}

/// Generate a collection of segments with arbitrary coordinates.
pub fn segments(size: f64, u: &mut Unstructured<'_>) -> Result<Vec<LinearObject>, arbitrary::Error> {
    let len = u.arbitrary_len::<[u8; 16]>()?.min(64);
    let mut ret = Vec::with_capacity(len);
    for _ in 0..len {
        ret.push(LinearObject::Segment(point(size, u)?, point(size, u)?));
    }
    Ok(ret)
}
