mod api;
mod app;
mod infra;
mod oauth;
mod shared;

pub use api::types::{
    Institution, InstitutionFilter, LoginSession, ProfileCompletion, RegisterRequest, Scholarship,
    ScholarshipFilter, User,
};
pub use api::ApiClient;
pub use app::logging;
pub use infra::app_paths;
pub use infra::credentials::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use infra::settings::{self, ClientSettings};
pub use oauth::callback_server::{
    bind_callback_listener, wait_for_callback, BoundCallbackListener, CallbackOutcome,
};
pub use oauth::{authorize_url, CALLBACK_PATH};
pub use shared::error::{AppError, AppResult};
