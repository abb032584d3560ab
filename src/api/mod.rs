use actix_web::web;

// ============================================================================
// API Module - HTTP Surface
// ============================================================================
//
// REST/JSON endpoints per resource plus the websocket upgrade routes and the
// health probe. Handlers are thin: validate, call the store, publish the
// event, map errors through ApiError.
//
// ============================================================================

pub mod agents;
pub mod customers;
pub mod feedback;
pub mod health;
pub mod notifications;
pub mod orders;
pub mod partners;
pub mod state;
pub mod ws;

pub use state::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        // Orders
        .route("/orders", web::post().to(orders::create_order))
        .route("/orders", web::get().to(orders::list_orders))
        .route("/orders/{id}", web::get().to(orders::get_order))
        .route("/orders/{id}/accept", web::post().to(orders::accept_order))
        .route("/orders/{id}/reject", web::post().to(orders::reject_order))
        .route("/orders/{id}/ready", web::post().to(orders::mark_ready))
        .route("/orders/{id}/pickup", web::post().to(orders::pick_up_order))
        .route("/orders/{id}/deliver", web::post().to(orders::deliver_order))
        // Feedback
        .route(
            "/orders/{id}/feedback",
            web::post().to(feedback::create_feedback),
        )
        .route(
            "/orders/{id}/feedback",
            web::get().to(feedback::get_order_feedback),
        )
        // Customers
        .route("/customers", web::post().to(customers::create_customer))
        .route("/customers", web::get().to(customers::list_customers))
        .route("/customers/{id}", web::get().to(customers::get_customer))
        .route("/customers/{id}", web::put().to(customers::update_customer))
        // Partners
        .route("/partners", web::post().to(partners::create_partner))
        .route("/partners", web::get().to(partners::list_partners))
        .route("/partners/{id}", web::get().to(partners::get_partner))
        .route("/partners/{id}/open", web::put().to(partners::set_open))
        .route(
            "/partners/{id}/orders",
            web::get().to(partners::list_partner_orders),
        )
        .route(
            "/partners/{id}/feedback",
            web::get().to(partners::list_partner_feedback),
        )
        // Agents
        .route("/agents", web::post().to(agents::create_agent))
        .route("/agents", web::get().to(agents::list_agents))
        .route("/agents/{id}", web::get().to(agents::get_agent))
        .route(
            "/agents/{id}/available",
            web::put().to(agents::set_available),
        )
        // Notifications
        .route(
            "/notifications",
            web::get().to(notifications::list_notifications),
        )
        // Websocket gateways
        .route("/ws/{role}/{id}", web::get().to(ws::connect));
}
