use chrono::{DateTime, Utc};

use crate::dto::route_dto::{RouteQuery, RouteResponse};
use crate::services::route_service::RouteService;
use crate::utils::errors::{AppError, AppResult};

pub struct RouteController {
    service: RouteService,
}

impl RouteController {
    pub fn new(service: RouteService) -> Self {
        Self { service }
    }

    pub async fn calculate(&self, query: RouteQuery, now: DateTime<Utc>) -> AppResult<RouteResponse> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let (Some(start), Some(destination)) = (non_empty(query.start), non_empty(query.destination))
        else {
            return Err(AppError::Validation(
                "Missing start or destination parameter".to_string(),
            ));
        };

        let route = self.service.route(&start, &destination, now).await?;
        Ok(route.into())
    }
}
