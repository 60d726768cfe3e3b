mod app;
mod bridge;
mod components;
mod pages;
mod session;
mod speech;
mod telemetry;

fn main() {
    let config = app::config();
    telemetry::init(&config.log_level);
    tracing::info!(base_url = %config.base_url, "mounting console");
    leptos::mount_to_body(move || leptos::view! { <app::App config=config/> });
}
