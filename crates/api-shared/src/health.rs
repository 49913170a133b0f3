use crate::dto::HealthRes;

/// Health check shared by every API surface.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as alive.
    ///
    /// The classifier is fitted before the server starts listening, so a responding process is
    /// always able to score.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Triage service is alive".into(),
        }
    }
}
