//! Shared fixtures for the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use libhomeserve::api::mock::MockTransport;
use libhomeserve::store::StateReceiver;
use libhomeserve::types::{
    Booking, BookingStatus, Provider, Service, User, UserRole, VerificationStatus,
};
use libhomeserve::{RootState, Store};
use serde_json::{json, Value};

pub fn setup_store() -> (Store, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let store = Store::in_memory(mock.clone());
    (store, mock)
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: "Ana Silva".to_string(),
        email: "ana@example.com".to_string(),
        phone: "+351900000000".to_string(),
        role: UserRole::Customer,
        is_verified: true,
        avatar: None,
        location: None,
    }
}

pub fn auth_response(token: &str) -> Value {
    json!({
        "user": user("u1"),
        "token": token,
        "refreshToken": format!("{}-refresh", token),
    })
}

pub fn booking(id: &str, status: BookingStatus) -> Booking {
    Booking {
        id: id.to_string(),
        customer_id: "u1".to_string(),
        provider_id: Some("p1".to_string()),
        service_id: "s1".to_string(),
        status,
        scheduled_at: Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap(),
        started_at: None,
        completed_at: None,
        amount: 45.0,
        address: "Rua Augusta 10, Lisboa".to_string(),
        notes: None,
        rating: None,
        review: None,
        provider_location: None,
        created_at: None,
    }
}

pub fn service(id: &str, category: &str) -> Service {
    Service {
        id: id.to_string(),
        name: format!("{} service", category),
        description: String::new(),
        category: category.to_string(),
        base_price: 30.0,
        extras: vec![],
        duration_minutes: 60,
        image: None,
    }
}

pub fn provider(id: &str, rating: f64) -> Provider {
    Provider {
        user: User {
            role: UserRole::Provider,
            ..user(id)
        },
        skills: vec!["plumbing".to_string()],
        rating,
        review_count: 12,
        verification_status: VerificationStatus::Verified,
        geo_location: None,
        is_available: true,
        earnings: 0.0,
        documents: vec![],
        portfolio: vec![],
    }
}

/// Every snapshot published since the receiver was created
pub fn drain(rx: &mut StateReceiver) -> Vec<Arc<RootState>> {
    let mut snapshots = Vec::new();
    while let Ok(snapshot) = rx.try_recv() {
        snapshots.push(snapshot);
    }
    snapshots
}
