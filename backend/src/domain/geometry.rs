//! GeoJSON-style point geometry shared by stand points and users.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Geometry type recorded when a payload omits `type`.
pub const DEFAULT_GEOMETRY_TYPE: &str = "Point";

fn default_geometry_type() -> String {
    DEFAULT_GEOMETRY_TYPE.to_owned()
}

/// Point geometry holding a `[longitude, latitude]` pair.
///
/// ## Invariants
/// - `coordinates` always holds exactly two values, longitude first.
/// - No bounds are enforced on either axis.
///
/// # Examples
/// ```
/// use vaxdrive::domain::Geometry;
///
/// let point = Geometry::point(80.7397, 22.383);
/// assert_eq!(point.longitude(), 80.7397);
/// assert_eq!(point.coordinates(), [80.7397, 22.383]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Geometry {
    #[serde(rename = "type", default = "default_geometry_type")]
    #[schema(example = "Point")]
    kind: String,
    #[schema(value_type = Vec<f64>, example = json!([80.7397, 22.383]))]
    coordinates: [f64; 2],
}

impl Geometry {
    /// Build a point geometry with the default type tag.
    #[must_use]
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self::with_kind(default_geometry_type(), longitude, latitude)
    }

    /// Build a geometry preserving a caller supplied type tag.
    #[must_use]
    pub fn with_kind(kind: impl Into<String>, longitude: f64, latitude: f64) -> Self {
        Self {
            kind: kind.into(),
            coordinates: [longitude, latitude],
        }
    }

    /// Type tag, usually `"Point"`.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_str()
    }

    /// `[longitude, latitude]` pair.
    #[must_use]
    pub fn coordinates(&self) -> [f64; 2] {
        self.coordinates
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn missing_type_defaults_to_point() {
        let geometry: Geometry =
            serde_json::from_value(json!({ "coordinates": [80.7, 22.3] })).expect("valid");
        assert_eq!(geometry.kind(), DEFAULT_GEOMETRY_TYPE);
        assert_eq!(geometry.latitude(), 22.3);
    }

    #[rstest]
    #[case(json!({ "coordinates": [80.7] }))]
    #[case(json!({ "coordinates": [80.7, 22.3, 5.0] }))]
    #[case(json!({ "type": "Point" }))]
    fn rejects_coordinates_that_are_not_pairs(#[case] payload: serde_json::Value) {
        assert!(serde_json::from_value::<Geometry>(payload).is_err());
    }

    #[rstest]
    fn preserves_supplied_type_tag() {
        let geometry: Geometry =
            serde_json::from_value(json!({ "type": "point", "coordinates": [1.0, 2.0] }))
                .expect("valid");
        let value = serde_json::to_value(&geometry).expect("serialises");
        assert_eq!(value, json!({ "type": "point", "coordinates": [1.0, 2.0] }));
    }
}
