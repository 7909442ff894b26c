use crate::routes::routes::AppRoutes;
use crate::shared::config::AppConfig;
use crate::shared::toast::{ToastHost, ToastService};
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::load();
    log::info!("API origin: {}", config.api_origin);

    // Toasts are shared by every screen
    provide_context(ToastService::new(config.toast_duration_ms));
    provide_context(config);

    view! {
        <AppRoutes />
        <ToastHost />
    }
}
