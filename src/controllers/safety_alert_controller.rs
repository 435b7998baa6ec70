use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::alert_dto::{CreateAlertRequest, DeleteAlertQuery};
use crate::models::alert::{AlertSeverity, NewSafetyAlert, SafetyAlert};
use crate::repositories::AlertRepository;
use crate::utils::errors::{AppError, AppResult};

const DELETE_FAILED: &str = "Error deleting safety alert";

pub struct SafetyAlertController {
    repository: Arc<dyn AlertRepository>,
}

impl SafetyAlertController {
    pub fn new(repository: Arc<dyn AlertRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, now: DateTime<Utc>) -> AppResult<Vec<SafetyAlert>> {
        self.repository
            .list_active(now)
            .await
            .map_err(|e| AppError::persistence("Error fetching safety alert data", e))
    }

    pub async fn create(
        &self,
        request: CreateAlertRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<SafetyAlert>> {
        let alert = new_alert(request)?;
        let created = self
            .repository
            .create(alert, now)
            .await
            .map_err(|e| AppError::persistence("Error creating safety alert", e))?;

        info!("🚨 Alerta creada: {} ({:?})", created.title, created.severity);
        Ok(vec![created])
    }

    pub async fn delete(&self, query: DeleteAlertQuery) -> AppResult<()> {
        let Some(raw_id) = query.id.filter(|id| !id.trim().is_empty()) else {
            return Err(AppError::Validation("Missing alert ID".to_string()));
        };

        // Un id que no es UUID no puede existir en la tabla
        let id = Uuid::parse_str(raw_id.trim())
            .map_err(|_| AppError::NotFound(DELETE_FAILED.to_string()))?;

        self.repository
            .delete(id)
            .await
            .map_err(|e| AppError::persistence(DELETE_FAILED, e))?;

        info!("🗑️ Alerta {} eliminada", id);
        Ok(())
    }
}

fn new_alert(request: CreateAlertRequest) -> AppResult<NewSafetyAlert> {
    let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
    let (
        Some(title),
        Some(description),
        Some(location_name),
        Some(coordinates),
        Some(severity),
        Some(expires_at),
    ) = (
        non_empty(&request.title),
        non_empty(&request.description),
        non_empty(&request.location_name),
        request.coordinates,
        non_empty(&request.severity),
        non_empty(&request.expires_at),
    )
    else {
        return Err(AppError::missing_fields());
    };

    request.validate()?;

    let severity: AlertSeverity = severity.parse().map_err(AppError::Validation)?;
    let expires_at = expires_at
        .trim()
        .parse::<DateTime<Utc>>()
        .map_err(|_| AppError::Validation("Invalid expires_at timestamp".to_string()))?;

    Ok(NewSafetyAlert {
        title,
        description,
        location_name,
        coordinates,
        severity,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::density::Coordinates;
    use crate::repositories::InMemoryAlertRepository;

    fn request() -> CreateAlertRequest {
        CreateAlertRequest {
            title: Some("Gate closed".to_string()),
            description: Some("Use gate 2".to_string()),
            location_name: Some("Mina Entrance Gate 1".to_string()),
            coordinates: Some(Coordinates { lng: 39.887, lat: 21.411 }),
            severity: Some("critical".to_string()),
            expires_at: Some("2099-01-01T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn test_new_alert_parses_fields() {
        let alert = new_alert(request()).unwrap();
        assert_eq!(alert.severity, AlertSeverity::Critical);
        assert_eq!(alert.expires_at.to_rfc3339(), "2099-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_each_missing_field_is_rejected() {
        let strip: [fn(&mut CreateAlertRequest); 6] = [
            |r| r.title = None,
            |r| r.description = None,
            |r| r.location_name = None,
            |r| r.coordinates = None,
            |r| r.severity = None,
            |r| r.expires_at = Some(String::new()),
        ];
        for remove in strip {
            let mut req = request();
            remove(&mut req);
            let err = new_alert(req).unwrap_err();
            assert_eq!(err.to_string(), "Missing required fields");
        }
    }

    #[test]
    fn test_invalid_severity_and_timestamp() {
        let mut req = request();
        req.severity = Some("apocalyptic".to_string());
        assert!(matches!(new_alert(req), Err(AppError::Validation(_))));

        let mut req = request();
        req.expires_at = Some("tomorrow".to_string());
        assert!(matches!(new_alert(req), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_requires_known_id() {
        let controller = SafetyAlertController::new(Arc::new(InMemoryAlertRepository::default()));

        let missing = controller.delete(DeleteAlertQuery { id: None }).await.unwrap_err();
        assert_eq!(missing.to_string(), "Missing alert ID");

        let garbage = controller
            .delete(DeleteAlertQuery { id: Some("42".to_string()) })
            .await
            .unwrap_err();
        assert!(matches!(garbage, AppError::NotFound(_)));

        let unknown = controller
            .delete(DeleteAlertQuery { id: Some(Uuid::new_v4().to_string()) })
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), "Error deleting safety alert");
    }
}
