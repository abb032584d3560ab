use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::domain::customer::{Customer, CustomerProfile};
use crate::error::ApiError;

use super::state::AppState;

// ============================================================================
// Customer Endpoints
// ============================================================================

fn validate_profile(profile: &CustomerProfile) -> Result<(), ApiError> {
    if profile.name.trim().is_empty() {
        return Err(ApiError::Validation("Customer name cannot be blank".to_string()));
    }
    if !profile.email.contains('@') {
        return Err(ApiError::Validation(format!(
            "Invalid email address: {}",
            profile.email
        )));
    }
    Ok(())
}

pub async fn create_customer(
    state: web::Data<AppState>,
    body: web::Json<CustomerProfile>,
) -> Result<HttpResponse, ApiError> {
    let profile = body.into_inner();
    validate_profile(&profile)?;

    let customer = Customer::register(profile);
    state.customers.insert(&customer).await?;

    tracing::info!(customer_id = %customer.id, "Customer registered");
    Ok(HttpResponse::Created().json(customer))
}

pub async fn get_customer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let customer = state
        .customers
        .fetch(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound("Customer"))?;

    Ok(HttpResponse::Ok().json(customer))
}

pub async fn list_customers(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.customers.list().await?))
}

pub async fn update_customer(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CustomerProfile>,
) -> Result<HttpResponse, ApiError> {
    let profile = body.into_inner();
    validate_profile(&profile)?;

    let updated = state
        .customers
        .update_profile(path.into_inner(), &profile)
        .await?;
    if !updated {
        return Err(ApiError::NotFound("Customer"));
    }

    Ok(HttpResponse::NoContent().finish())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_validation() {
        let good = CustomerProfile {
            name: "Nadia".to_string(),
            email: "nadia@example.com".to_string(),
            phone: None,
        };
        assert!(validate_profile(&good).is_ok());

        let blank_name = CustomerProfile {
            name: "  ".to_string(),
            ..good.clone()
        };
        assert!(validate_profile(&blank_name).is_err());

        let bad_email = CustomerProfile {
            email: "nowhere".to_string(),
            ..good
        };
        assert!(validate_profile(&bad_email).is_err());
    }
}
