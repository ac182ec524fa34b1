use auth::AuthService;
use storage::FileManager;

/// Application state shared across all handlers
pub struct AppState {
    pub auth_service: AuthService,
    pub file_manager: FileManager,
}

impl AppState {
    pub fn new(auth_service: AuthService, file_manager: FileManager) -> Self {
        Self {
            auth_service,
            file_manager,
        }
    }
}
