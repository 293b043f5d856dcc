//! Sky directions and galactocentric geometry.
//!
//! Positions live in a right-handed galactocentric frame: the Galactic centre
//! at the origin, the observer (Sun) on the positive x axis, z toward the
//! north Galactic pole. A [`Direction`] is a galactic longitude/latitude pair;
//! `l = 0, b = 0` points from the observer toward the Galactic centre.

use nalgebra::Vector3;
use once_cell::sync::Lazy;

use crate::units::{Dimension, QVector3, Quantity, DEGREE, KILOPARSEC, METRE, RADIAN};

/// Galactocentric position of the observer, 8.5 kpc from the centre in the
/// Galactic plane.
pub static SUN_POSITION: Lazy<QVector3> = Lazy::new(|| {
    QVector3::new(8.5 * KILOPARSEC, 0.0 * KILOPARSEC, 0.0 * KILOPARSEC)
});

/// A sky direction as galactic longitude and latitude angle quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    pub lon: Quantity,
    pub lat: Quantity,
}

impl Direction {
    #[track_caller]
    pub fn new(lon: Quantity, lat: Quantity) -> Self {
        if lon.dimension() != Dimension::ANGLE || lat.dimension() != Dimension::ANGLE {
            panic!(
                "direction components must be angles, got [{}] and [{}]",
                lon.dimension(),
                lat.dimension()
            );
        }
        Direction { lon, lat }
    }

    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Direction::new(lon * DEGREE, lat * DEGREE)
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon.in_units_of(DEGREE)
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat.in_units_of(DEGREE)
    }

    /// Unit vector of this direction in the galactocentric frame.
    ///
    /// `l = 0, b = 0` maps to −x̂ (observer toward the centre); longitude grows
    /// toward +ŷ, latitude toward +ẑ.
    pub fn unit_vector(&self) -> Vector3<f64> {
        let l = self.lon.in_units_of(RADIAN);
        let b = self.lat.in_units_of(RADIAN);
        Vector3::new(-b.cos() * l.cos(), b.cos() * l.sin(), b.sin())
    }

    /// Inverse of [`Direction::unit_vector`]; longitude normalised to
    /// `[0, 360)` degrees.
    pub fn from_unit_vector(v: &Vector3<f64>) -> Self {
        let b = (v.z / v.norm()).asin();
        let mut l = v.y.atan2(-v.x);
        if l < 0.0 {
            l += std::f64::consts::TAU;
        }
        Direction::new(l * RADIAN, b * RADIAN)
    }
}

/// Position reached by travelling `distance` from `origin` along `direction`.
#[track_caller]
pub fn galactic_position(origin: &QVector3, distance: Quantity, direction: &Direction) -> QVector3 {
    if distance.dimension() != Dimension::LENGTH {
        panic!("distance must be a length, got [{}]", distance.dimension());
    }
    let step = QVector3::from_vector3(
        direction.unit_vector() * distance.value(),
        Dimension::LENGTH,
    );
    *origin + step
}

/// External geometry collaborator: how far a line of sight extends before it
/// leaves the modelled Galaxy.
pub trait GalaxyExtent: Send + Sync {
    /// Maximum ray length for `direction`. A zero (or negative) value marks a
    /// degenerate direction; integrators turn it into a zero result, never an
    /// error.
    fn max_distance(&self, direction: &Direction) -> Quantity;
}

/// Galaxy modelled as a sphere around the Galactic centre, the observer
/// inside it.
#[derive(Debug, Clone)]
pub struct SphericalExtent {
    radius: Quantity,
    observer: QVector3,
}

impl SphericalExtent {
    /// Sphere of the given radius, observed from the Sun position.
    pub fn new(radius: Quantity) -> Self {
        SphericalExtent {
            radius,
            observer: *SUN_POSITION,
        }
    }

    /// Default galactic border of 20 kpc.
    pub fn galactic_border() -> Self {
        SphericalExtent::new(20.0 * KILOPARSEC)
    }

    pub fn with_observer(mut self, observer: QVector3) -> Self {
        self.observer = observer;
        self
    }
}

impl GalaxyExtent for SphericalExtent {
    fn max_distance(&self, direction: &Direction) -> Quantity {
        let o = self.observer.as_vector3();
        let u = direction.unit_vector();
        let along = o.dot(&u);
        let discriminant = along * along - o.norm_squared() + self.radius.value().powi(2);
        if discriminant < 0.0 {
            // Observer outside the sphere and the ray misses it entirely.
            return Quantity::zero(Dimension::LENGTH);
        }
        let distance = -along + discriminant.sqrt();
        if distance <= 0.0 {
            return Quantity::zero(Dimension::LENGTH);
        }
        distance * METRE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_vector_cardinal_directions() {
        let centre = Direction::from_degrees(0.0, 0.0).unit_vector();
        assert_relative_eq!(centre.x, -1.0, epsilon = 1e-12);
        assert_relative_eq!(centre.y, 0.0, epsilon = 1e-12);

        let pole = Direction::from_degrees(0.0, 90.0).unit_vector();
        assert_relative_eq!(pole.z, 1.0, epsilon = 1e-12);

        let quadrature = Direction::from_degrees(90.0, 0.0).unit_vector();
        assert_relative_eq!(quadrature.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_direction_round_trip() {
        let dir = Direction::from_degrees(123.4, -45.6);
        let back = Direction::from_unit_vector(&dir.unit_vector());
        assert_relative_eq!(back.lon_degrees(), 123.4, epsilon = 1e-9);
        assert_relative_eq!(back.lat_degrees(), -45.6, epsilon = 1e-9);
    }

    #[test]
    fn test_galactic_position_toward_centre() {
        let pos = galactic_position(
            &SUN_POSITION,
            8.5 * KILOPARSEC,
            &Direction::from_degrees(0.0, 0.0),
        );
        assert_relative_eq!(pos.norm().in_units_of(KILOPARSEC), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_distance_through_and_away_from_centre() {
        let extent = SphericalExtent::galactic_border();
        let through = extent.max_distance(&Direction::from_degrees(0.0, 0.0));
        assert_relative_eq!(through.in_units_of(KILOPARSEC), 28.5, epsilon = 1e-9);

        let away = extent.max_distance(&Direction::from_degrees(180.0, 0.0));
        assert_relative_eq!(away.in_units_of(KILOPARSEC), 11.5, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_extent_yields_zero() {
        // Border closer to the centre than the observer: every direction away
        // from the centre is degenerate.
        let extent = SphericalExtent::new(1.0 * KILOPARSEC);
        let d = extent.max_distance(&Direction::from_degrees(90.0, 0.0));
        assert_eq!(d.value(), 0.0);
    }

    #[test]
    #[should_panic(expected = "must be angles")]
    fn test_direction_rejects_non_angles() {
        let _ = Direction::new(1.0 * METRE, 0.0 * DEGREE);
    }
}
