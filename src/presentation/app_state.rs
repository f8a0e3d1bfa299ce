// Application state for HTTP handlers
use crate::application::datasource_service::DatasourceService;

#[derive(Clone)]
pub struct AppState {
    pub datasource_service: DatasourceService,
}
