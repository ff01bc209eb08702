//! Route definitions for the Krishak Mitra platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes
        .nest("/profile", profile_routes(state.clone()))
        .nest("/farms", farm_routes(state.clone()))
        .nest("/crop-plans", crop_plan_routes(state.clone()))
        .nest("/community", community_routes(state.clone()))
        .nest("/alerts", alert_routes(state.clone()))
        .nest("/diagnosis-reports", diagnosis_routes(state.clone()))
        .nest("/schemes", scheme_routes(state.clone()))
        .nest("/advisory", advisory_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

fn profile_routes(state: AppState) -> Router<AppState> {
    use handlers::profile;

    Router::new()
        .route("/", get(profile::get_profile).put(profile::update_profile))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Farm management routes (protected)
fn farm_routes(state: AppState) -> Router<AppState> {
    use handlers::farm;

    Router::new()
        .route("/", get(farm::list_farms).post(farm::create_farm))
        .route(
            "/:farm_id",
            get(farm::get_farm)
                .put(farm::update_farm)
                .delete(farm::delete_farm),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn crop_plan_routes(state: AppState) -> Router<AppState> {
    use handlers::crop_plan;

    Router::new()
        .route("/", get(crop_plan::list_plans).post(crop_plan::save_plan))
        .route(
            "/:plan_id",
            get(crop_plan::get_plan).delete(crop_plan::delete_plan),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Community forum routes (protected)
fn community_routes(state: AppState) -> Router<AppState> {
    use handlers::community;

    Router::new()
        .route("/posts", get(community::list_posts).post(community::create_post))
        .route(
            "/posts/:post_id",
            get(community::get_post).delete(community::delete_post),
        )
        .route("/posts/:post_id/like", post(community::toggle_like))
        .route("/posts/:post_id/comments", post(community::add_comment))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Price alert routes (protected)
fn alert_routes(state: AppState) -> Router<AppState> {
    use handlers::market_alert;

    Router::new()
        .route("/", get(market_alert::list_alerts).post(market_alert::create_alert))
        // Run the price check for the caller now
        .route("/check", post(market_alert::check_alerts))
        .route(
            "/:alert_id",
            get(market_alert::get_alert).delete(market_alert::delete_alert),
        )
        .route("/:alert_id/acknowledge", post(market_alert::acknowledge_alert))
        .route("/:alert_id/cancel", post(market_alert::cancel_alert))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn diagnosis_routes(state: AppState) -> Router<AppState> {
    use handlers::diagnosis;

    Router::new()
        .route("/", get(diagnosis::list_reports).post(diagnosis::save_report))
        .route(
            "/:report_id",
            get(diagnosis::get_report).delete(diagnosis::delete_report),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Government scheme routes (protected)
fn scheme_routes(state: AppState) -> Router<AppState> {
    use handlers::scheme;

    Router::new()
        .route("/", get(scheme::list_schemes))
        .route("/search", post(scheme::search_schemes))
        .route("/:scheme_id", get(scheme::get_scheme))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Advisory flow routes (protected)
fn advisory_routes(state: AppState) -> Router<AppState> {
    use handlers::advisory;

    Router::new()
        // Crop planning
        .route("/crops", post(advisory::recommend_crops))
        .route("/crops/market-aware", post(advisory::recommend_crops_with_market))
        .route("/varieties", post(advisory::recommend_varieties))
        .route("/year-plan", post(advisory::plan_year))
        .route("/year-plan/varieties", post(advisory::plan_year_varieties))
        // Crop health and inputs
        .route("/diagnose", post(advisory::diagnose))
        .route("/pest-forecast", post(advisory::forecast_pests))
        .route("/fertilizer", post(advisory::recommend_fertilizer))
        .route("/water", post(advisory::plan_water))
        .route("/suppliers", get(advisory::find_suppliers))
        // Markets
        .route("/sell-advice", post(advisory::sell_advice))
        // Assistant
        .route("/agri-bot", post(advisory::agri_bot))
        .route("/navigate", post(advisory::navigate))
        .route("/voice-field", post(advisory::extract_voice_field))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
