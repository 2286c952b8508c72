pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn is_valid_latitude(latitude: f64) -> bool {
    latitude.is_finite() && (-90.0..=90.0).contains(&latitude)
}

pub fn is_valid_longitude(longitude: f64) -> bool {
    longitude.is_finite() && (-180.0..=180.0).contains(&longitude)
}

/// An axis aligned box in degrees, used as a cheap prefilter before the
/// haversine distance is computed.
///
/// A box crossing the antimeridian has `min_longitude > max_longitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub min_longitude: f64,
    pub max_latitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn around(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        let angular_radius = radius_km / EARTH_RADIUS_KM;
        let lat_rad = latitude.to_radians();

        let min_latitude = (lat_rad - angular_radius).to_degrees();
        let max_latitude = (lat_rad + angular_radius).to_degrees();

        // a circle covering a pole covers every longitude
        if min_latitude <= -90.0 || max_latitude >= 90.0 {
            return Self {
                min_latitude: min_latitude.max(-90.0),
                min_longitude: -180.0,
                max_latitude: max_latitude.min(90.0),
                max_longitude: 180.0,
            };
        }

        // longitude degrees shrink towards the poles
        let delta = (angular_radius / lat_rad.cos()).to_degrees();
        let (min_longitude, max_longitude) = if delta >= 180.0 {
            (-180.0, 180.0)
        } else {
            (
                wrap_longitude(longitude - delta),
                wrap_longitude(longitude + delta),
            )
        };

        Self {
            min_latitude,
            min_longitude,
            max_latitude,
            max_longitude,
        }
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.min_longitude > self.max_longitude
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        let longitude_inside = if self.crosses_antimeridian() {
            longitude >= self.min_longitude || longitude <= self.max_longitude
        } else {
            (self.min_longitude..=self.max_longitude).contains(&longitude)
        };
        (self.min_latitude..=self.max_latitude).contains(&latitude) && longitude_inside
    }
}

/// Maps a longitude into [-180, 180].
fn wrap_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else if longitude < -180.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

/// Great circle distance in kilometers.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = latitude_1.to_radians();
    let lat2_rad = latitude_2.to_radians();
    let dlat = lat2_rad - lat1_rad;
    let dlon = (longitude_2 - longitude_1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_ranges() {
        assert!(is_valid_latitude(1.3));
        assert!(is_valid_latitude(-90.0));
        assert!(!is_valid_latitude(90.5));
        assert!(!is_valid_latitude(f64::NAN));
        assert!(is_valid_longitude(103.85));
        assert!(!is_valid_longitude(-180.1));
        assert!(!is_valid_longitude(f64::INFINITY));
    }

    #[test]
    fn distance_between_known_points() {
        // Bugis MRT to Marina Bay Sands, roughly 2 km apart
        let distance = haversine_distance(1.3007, 103.8559, 1.2834, 103.8607);
        assert!((1.8..2.2).contains(&distance), "distance was {distance}");
        assert_eq!(haversine_distance(1.3, 103.8, 1.3, 103.8), 0.0);
    }

    #[test]
    fn bounding_box_contains_center_and_excludes_far_points() {
        let bbox = BoundingBox::around(1.3007, 103.8559, 1.0);
        assert!(bbox.contains(1.3007, 103.8559));
        assert!(bbox.contains(1.305, 103.86));
        assert!(!bbox.contains(1.2834, 103.8607));
        assert!(!bbox.contains(48.85, 2.35));
    }

    #[test]
    fn bounding_box_near_pole_spans_all_longitudes() {
        let bbox = BoundingBox::around(90.0, 0.0, 10.0);
        assert_eq!(bbox.min_longitude, -180.0);
        assert_eq!(bbox.max_longitude, 180.0);
        assert_eq!(bbox.max_latitude, 90.0);
    }

    #[test]
    fn bounding_box_wraps_across_the_antimeridian() {
        // Fiji, a few kilometers either side of 180 degrees
        let bbox = BoundingBox::around(-17.0, 179.99, 20.0);
        assert!(bbox.crosses_antimeridian());
        assert!(bbox.contains(-17.0, 179.95));
        assert!(bbox.contains(-17.0, -179.95));
        assert!(!bbox.contains(-17.0, 0.0));
        assert!(!bbox.contains(-17.0, 179.0));
        assert!(!bbox.contains(-17.0, -179.0));
        assert!(haversine_distance(-17.0, 179.99, -17.0, -179.95) < 20.0);
    }

    #[test]
    fn bounding_box_covering_a_pole_spans_all_longitudes() {
        let bbox = BoundingBox::around(89.95, 10.0, 20.0);
        assert_eq!(bbox.max_latitude, 90.0);
        assert!(!bbox.crosses_antimeridian());
        assert!(bbox.contains(89.99, -170.0));
        assert!(bbox.contains(89.9, 170.0));

        let south = BoundingBox::around(-89.95, -60.0, 20.0);
        assert_eq!(south.min_latitude, -90.0);
        assert!(south.contains(-89.99, 120.0));
    }
}
