//! Spherical geometry helpers
//!
//! Computes destination points and search boxes on a sphere of the Earth's
//! mean radius. The box is built from four directional destination points,
//! which only approximates the search circle: near the poles or for very
//! large radii it over- or under-includes the corners of the circle.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// The four directional extremes of a search circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: Point,
    pub east: Point,
    pub south: Point,
    pub west: Point,
}

impl BoundingBox {
    /// Corners in north, east, south, west order
    pub fn corners(&self) -> [Point; 4] {
        [self.north, self.east, self.south, self.west]
    }

    /// Whether the east edge wrapped past 180° and now sits west of the west edge
    pub fn crosses_antimeridian(&self) -> bool {
        self.west.lng > self.east.lng
    }

    /// Check whether a coordinate falls strictly inside the box
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        let within_lat = lat > self.south.lat && lat < self.north.lat;
        let within_lng = if self.crosses_antimeridian() {
            lng > self.west.lng || lng < self.east.lng
        } else {
            lng > self.west.lng && lng < self.east.lng
        };

        within_lat && within_lng
    }
}

/// Point reached by travelling `distance` metres from (`lat`, `lng`) along
/// the initial bearing `bearing` (degrees clockwise from north).
///
/// See <https://www.movable-type.co.uk/scripts/latlong.html>.
pub fn destination(lat: f64, lng: f64, distance: f64, bearing: f64) -> Point {
    let delta = distance / EARTH_RADIUS_M;
    let theta = bearing.to_radians();
    let phi1 = lat.to_radians();
    let lambda1 = lng.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();

    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * phi2.sin();
    let lambda2 = lambda1 + y.atan2(x);

    Point {
        lat: phi2.to_degrees().clamp(-90.0, 90.0),
        lng: normalize_longitude(lambda2.to_degrees()),
    }
}

/// Search box around (`lat`, `lng`) for a radius in metres
pub fn bounding_box(lat: f64, lng: f64, radius: f64) -> BoundingBox {
    BoundingBox {
        north: destination(lat, lng, radius, 0.0),
        east: destination(lat, lng, radius, 90.0),
        south: destination(lat, lng, radius, 180.0),
        west: destination(lat, lng, radius, 270.0),
    }
}

/// Wrap a longitude in degrees into (-180, 180]
fn normalize_longitude(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        wrapped
    }
}
