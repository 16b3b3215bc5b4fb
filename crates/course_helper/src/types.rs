use crate::catalog::CatalogService;

/// Shared state for the HTTP server.
pub struct AppState {
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}
