use std::sync::Arc;

use serde::Serialize;
use service::directory::Directory;

/// Non-sensitive configuration snapshot echoed by the root route.
#[derive(Clone, Debug, Serialize)]
pub struct ConfigEcho {
    pub table_name: String,
    pub region: String,
    pub data_dir: String,
    pub use_cache: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<Directory>,
    pub config: ConfigEcho,
}
