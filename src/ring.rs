/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Ring ordering, validation and serialization.
//!
//! A ring is a sequence of points on a single curve, without duplicates,
//! sorted by ascending `x` then ascending `y`.

use std::{
    cmp::Ordering,
    collections::HashSet
};

use crate::curve::Curve;
use crate::errors::SignatureError;
use crate::point::Point;

///Check if a ring is sorted.
///
///Returns `Ok(false)` on the first out-of-order pair,
///or `SignatureError::NoDuplicates` if two adjacent points are equal.
pub fn is_sorted(ring: &[Point]) -> Result<bool, SignatureError> {
    for pair in ring.windows(2) {
        match pair[0].cmp_coordinates(&pair[1]) {
            Ordering::Less => continue,
            Ordering::Equal => return Err(SignatureError::NoDuplicates),
            Ordering::Greater => return Ok(false)
        }
    }
    return Ok(true)
}

///Validate every member of a ring against `curve`.
///
///Rejects empty rings (unless `allow_empty`), points on another curve,
///points off the curve or of low order, and duplicates.
pub fn check_ring(ring: &[Point], curve: &Curve, allow_empty: bool) -> Result<(), SignatureError> {
    if ring.is_empty() && !allow_empty {
        return Err(SignatureError::EmptyRing)
    }

    let mut seen: HashSet<Vec<u8>> = HashSet::with_capacity(ring.len());
    for point in ring {
        if point.curve() != curve {
            return Err(SignatureError::CurveMismatch)
        }
        if !curve.is_on_curve(point.x(), point.y())? {
            return Err(SignatureError::NotOnCurve)
        }
        point.check_low_order()?;
        if !seen.insert(point.compress()?) {
            return Err(SignatureError::NoDuplicates)
        }
    }
    return Ok(())
}

///Return the ring sorted by `(x, y)`. The sort is stable.
pub fn sort_ring(mut ring: Vec<Point>) -> Vec<Point> {
    ring.sort_by(|a, b| a.cmp_coordinates(b));
    return ring
}

///Insert `point` at its sorted position in a **sorted** ring, and return its index.
///
///If the point is already in the ring, nothing is inserted.
pub fn insert_sorted(ring: &mut Vec<Point>, point: Point) -> usize {
    return match ring.binary_search_by(|member| member.cmp_coordinates(&point)) {
        Ok(index) => index,
        Err(index) => {
            ring.insert(index, point);
            index
        }
    }
}

///Serialize every point of the ring, keeping the order.
///
///This exact sequence is part of every challenge hash.
pub fn serialize_ring(ring: &[Point]) -> Result<Vec<String>, SignatureError> {
    return ring.iter().map(|point| point.serialize()).collect()
}
