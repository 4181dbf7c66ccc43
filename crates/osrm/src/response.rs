use serde::Deserialize;

use crate::RouteError;

/// Response document of the OSRM `route` service.
/// See <http://project-osrm.org/docs/v5.24.0/api/#route-service>
#[derive(Debug, Clone, Deserialize)]
pub struct RouteResponse {
    /// `"Ok"` on success, an error code otherwise.
    pub code: String,
    /// Routes ordered by descending recommendation rank.
    #[serde(default)]
    pub routes: Vec<Route>,
    /// Optional human-readable diagnostic for non-`Ok` codes.
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// The whole route geometry as an encoded polyline.
    pub geometry: String,
}

impl RouteResponse {
    /// Extracts the geometry of the most recommended route, or the service's
    /// diagnostic if it reported a failure or no route at all.
    pub fn into_geometry(self) -> Result<String, RouteError> {
        if self.code == "Ok" {
            if let Some(route) = self.routes.into_iter().next() {
                return Ok(route.geometry);
            }
        }
        Err(RouteError::Service {
            code: self.code,
            message: self.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_response_yields_first_geometry() {
        let response: RouteResponse = serde_json::from_str(
            r#"{"code": "Ok", "routes": [{"geometry": "_p~iF~ps|U"}, {"geometry": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_geometry().unwrap(), "_p~iF~ps|U");
    }

    #[test]
    fn non_ok_code_carries_service_message() {
        let response: RouteResponse = serde_json::from_str(
            r#"{"code": "NoRoute", "routes": [], "message": "Impossible route."}"#,
        )
        .unwrap();
        match response.into_geometry() {
            Err(RouteError::Service { code, message }) => {
                assert_eq!(code, "NoRoute");
                assert_eq!(message.as_deref(), Some("Impossible route."));
            }
            other => panic!("expected service error, got {:?}", other),
        }
    }

    #[test]
    fn ok_code_without_routes_is_a_service_error() {
        let response: RouteResponse =
            serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).unwrap();
        assert!(matches!(
            response.into_geometry(),
            Err(RouteError::Service { .. })
        ));
    }

    #[test]
    fn missing_routes_field_defaults_to_empty() {
        let response: RouteResponse =
            serde_json::from_str(r#"{"code": "InvalidUrl"}"#).unwrap();
        assert!(response.routes.is_empty());
    }
}
