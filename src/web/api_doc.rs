use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::health::HealthResponse;
use super::api::satellites::{OverheadResponse, SatelliteDetail, SearchResponse};
use super::api::shields::{ActivateShieldRequest, ExtendShieldRequest, ShieldListResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::health::health,
        super::api::satellites::overhead,
        super::api::satellites::search,
        super::api::satellites::detail,
        super::api::shields::activate,
        super::api::shields::list_active,
        super::api::shields::get_shield,
        super::api::shields::extend,
        super::api::shields::deactivate,
    ),
    components(
        schemas(
            HealthResponse,
            OverheadResponse,
            SearchResponse,
            SatelliteDetail,
            ActivateShieldRequest,
            ExtendShieldRequest,
            ShieldListResponse,
            ErrorResponse,
            crate::visibility::VisibleSatellite,
            crate::visibility::Pass,
            crate::visibility::ObservationPoint,
            crate::catalog::ObjectSummary,
            crate::catalog::OrbitalObject,
            crate::catalog::ObjectCategory,
            crate::orbit::OrbitalState,
            crate::orbit::OrbitalElements,
            crate::orbit::KeplerElements,
            crate::orbit::OrbitSummary,
            crate::shield::Shield,
            crate::shield::ShieldStatus,
            crate::shield::Tier,
        )
    ),
    info(
        title = "Sat-Shield API",
        description = "Overhead satellite visibility and privacy shield lifecycle",
        version = "0.1.0"
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "satellites", description = "Visibility queries over the orbital catalog"),
        (name = "privacy-shield", description = "Privacy shield activation and lifecycle")
    )
)]
pub struct ApiDoc;
