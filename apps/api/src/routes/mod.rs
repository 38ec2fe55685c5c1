pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::checkins::handlers as checkins;
use crate::customers::handlers as customers;
use crate::reminders::handlers as reminders;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Customers
        .route(
            "/api/customers",
            get(customers::handle_list_customers).post(customers::handle_create_customer),
        )
        .route(
            "/api/customers/search",
            get(customers::handle_search_customers),
        )
        .route(
            "/api/customers/:id",
            delete(customers::handle_delete_customer),
        )
        .route(
            "/api/customers/:id/renewal-intent",
            patch(customers::handle_update_renewal_intent),
        )
        .route(
            "/api/customers/:id/notes",
            patch(customers::handle_update_notes),
        )
        .route(
            "/api/customers/:id/comments",
            patch(customers::handle_update_comments),
        )
        .route(
            "/api/customers/:id/renew",
            post(customers::handle_renew_customer),
        )
        .route(
            "/api/customers/:id/projects",
            get(customers::handle_list_projects),
        )
        // Check-ins
        .route(
            "/api/checkins",
            get(checkins::handle_checkins_on_date).post(checkins::handle_create_checkin),
        )
        .route("/api/checkins/today", get(checkins::handle_today_checkins))
        // Reminders
        .route("/api/reminders", get(reminders::handle_reminders))
        .route(
            "/api/reminders/expiry",
            get(reminders::handle_expiry_reminders),
        )
        .route(
            "/api/reminders/absence",
            get(reminders::handle_absence_reminders),
        )
        .route("/api/reminders/evaluate", post(reminders::handle_evaluate))
        .with_state(state)
}
