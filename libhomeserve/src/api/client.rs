//! Typed calls against the marketplace API

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ApiRequest, Transport};
use crate::error::ActionError;
use crate::types::{
    Address, Booking, Coordinates, NewAddress, NewBooking, Provider, Service, User, UserRole,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpRequest {
    pub phone: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub needs_verification: bool,
}

/// Partial profile update; unset fields are left alone by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    pub service_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn set_token(&self, token: Option<String>) {
        self.transport.set_token(token);
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ActionError> {
        let value = self.transport.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn body<T: Serialize>(value: &T) -> Result<Value, ActionError> {
        serde_json::to_value(value).map_err(ActionError::from)
    }

    // === Auth ===

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ActionError> {
        self.call(ApiRequest::post("/api/auth/login", Some(Self::body(request)?)))
            .await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ActionError> {
        self.call(ApiRequest::post("/api/auth/signup", Some(Self::body(request)?)))
            .await
    }

    pub async fn verify_otp(&self, request: &OtpRequest) -> Result<AuthResponse, ActionError> {
        self.call(ApiRequest::post("/api/auth/verify-otp", Some(Self::body(request)?)))
            .await
    }

    /// Any 2xx counts as logged out; a non-boolean body is read as `true`
    pub async fn logout(&self) -> Result<bool, ActionError> {
        let value = self
            .transport
            .send(ApiRequest::post("/api/auth/logout", None))
            .await?;
        Ok(value.as_bool().unwrap_or(true))
    }

    // === User ===

    pub async fn fetch_profile(&self) -> Result<User, ActionError> {
        self.call(ApiRequest::get("/api/user/profile")).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ActionError> {
        self.call(ApiRequest::put("/api/user/profile", Self::body(update)?))
            .await
    }

    pub async fn fetch_addresses(&self) -> Result<Vec<Address>, ActionError> {
        self.call(ApiRequest::get("/api/user/addresses")).await
    }

    pub async fn add_address(&self, address: &NewAddress) -> Result<Address, ActionError> {
        self.call(ApiRequest::post("/api/user/addresses", Some(Self::body(address)?)))
            .await
    }

    // === Bookings ===

    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ActionError> {
        self.call(ApiRequest::post("/api/bookings", Some(Self::body(booking)?)))
            .await
    }

    pub async fn fetch_bookings(&self) -> Result<Vec<Booking>, ActionError> {
        self.call(ApiRequest::get("/api/bookings")).await
    }

    pub async fn fetch_booking(&self, id: &str) -> Result<Booking, ActionError> {
        self.call(ApiRequest::get(booking_path(id, None))).await
    }

    pub async fn accept_booking(&self, id: &str) -> Result<Booking, ActionError> {
        self.booking_verb(id, "accept", json!({})).await
    }

    pub async fn reject_booking(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<Booking, ActionError> {
        self.booking_verb(id, "reject", json!({ "reason": reason }))
            .await
    }

    pub async fn start_booking(&self, id: &str) -> Result<Booking, ActionError> {
        self.booking_verb(id, "start", json!({})).await
    }

    pub async fn complete_booking(
        &self,
        id: &str,
        notes: Option<&str>,
    ) -> Result<Booking, ActionError> {
        self.booking_verb(id, "complete", json!({ "notes": notes }))
            .await
    }

    pub async fn cancel_booking(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<Booking, ActionError> {
        self.booking_verb(id, "cancel", json!({ "reason": reason }))
            .await
    }

    pub async fn rate_booking(
        &self,
        id: &str,
        rating: u8,
        review: Option<&str>,
    ) -> Result<Booking, ActionError> {
        self.booking_verb(id, "rate", json!({ "rating": rating, "review": review }))
            .await
    }

    async fn booking_verb(
        &self,
        id: &str,
        verb: &str,
        body: Value,
    ) -> Result<Booking, ActionError> {
        self.call(ApiRequest::post(booking_path(id, Some(verb)), Some(body)))
            .await
    }

    // === Catalog ===

    pub async fn fetch_services(&self) -> Result<Vec<Service>, ActionError> {
        self.call(ApiRequest::get("/api/services")).await
    }

    pub async fn fetch_services_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<Service>, ActionError> {
        self.call(ApiRequest::get(format!(
            "/api/services/category/{}",
            urlencoding::encode(category)
        )))
        .await
    }

    pub async fn search_services(&self, query: &str) -> Result<Vec<Service>, ActionError> {
        self.call(ApiRequest::get("/api/services/search").with_query("q", query))
            .await
    }

    pub async fn fetch_nearby_providers(
        &self,
        query: &NearbyQuery,
    ) -> Result<Vec<Provider>, ActionError> {
        let request = ApiRequest::get("/api/providers/nearby")
            .with_query("serviceId", &query.service_id)
            .with_query("lat", query.latitude)
            .with_query("lng", query.longitude)
            .with_query("radius", query.radius_km);
        self.call(request).await
    }

    pub async fn fetch_provider(&self, id: &str) -> Result<Provider, ActionError> {
        self.call(ApiRequest::get(format!(
            "/api/providers/{}",
            urlencoding::encode(id)
        )))
        .await
    }
}

fn booking_path(id: &str, verb: Option<&str>) -> String {
    let id = urlencoding::encode(id);
    match verb {
        Some(verb) => format!("/api/bookings/{}/{}", id, verb),
        None => format!("/api/bookings/{}", id),
    }
}
