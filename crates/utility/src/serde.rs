/// Numbers which some APIs (e.g. Nominatim) deliver as strings, e.g.
/// `"lat": "1.2996"`. Plain JSON numbers are accepted as well.
pub mod lenient_f64 {
    use core::fmt;

    use serde::{
        de::{self, Unexpected, Visitor},
        Deserializer,
    };

    struct LenientF64Visitor;

    impl<'de> Visitor<'de> for LenientF64Visitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a string containing a number")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            value
                .trim()
                .parse()
                .map_err(|_| de::Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LenientF64Visitor)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Point {
        #[serde(with = "super::lenient_f64")]
        lat: f64,
        #[serde(with = "super::lenient_f64")]
        lon: f64,
    }

    #[test]
    fn accepts_strings_and_numbers() {
        let point: Point =
            serde_json::from_str(r#"{"lat": "1.2996", "lon": 103.8555}"#).unwrap();
        assert_eq!(point.lat, 1.2996);
        assert_eq!(point.lon, 103.8555);
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Point>(r#"{"lat": "north", "lon": 1}"#).is_err());
    }
}
