// This file contains the basic types used to communicate through the API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A restaurant, as seeded in the store and returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub location: String,
    /// Price tier, e.g. "₹₹₹"
    pub price_range: String,
    /// Between 0 and 5
    pub rating: f64,
    #[serde(default)]
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// One dish on a restaurant menu
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
}

/// A menu item inside an order, with the quantity and the price at the time of ordering
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem {
    /// Snapshot a menu item with the given quantity
    pub fn from_menu_item(item: &MenuItem, quantity: u32) -> LineItem {
        LineItem {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity,
            category: Some(item.category.clone()),
            description: Some(item.description.clone()),
            image: Some(item.image.clone()).filter(|image| !image.is_empty()),
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Delivery,
    Pickup,
}

impl std::str::FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delivery" => Ok(OrderType::Delivery),
            "pickup" => Ok(OrderType::Pickup),
            other => Err(format!("unknown order type '{}'", other)),
        }
    }
}

/// Lifecycle of an order. Any status may follow any other.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Confirmed,
    Preparing,
    Ready,
    Delivered,
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

/// Body of new order request
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub restaurant_id: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub customer_info: CustomerInfo,
    pub order_type: OrderType,
    #[serde(default)]
    pub payment_method: String,
}

/// A full order, as stored and returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique ID, given by the server on creation
    pub id: String,
    /// Not checked against the restaurants collection
    pub restaurant_id: String,
    pub items: Vec<LineItem>,
    pub customer_info: CustomerInfo,
    pub order_type: OrderType,
    pub payment_method: String,
    pub status: OrderStatus,
    /// Sum of price * quantity over the items, computed once on creation
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
}

/// Body of the order status update request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Cancelled,
}

/// Body of new reservation request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub restaurant_id: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub restaurant_id: String,
    pub date: String,
    pub time: String,
    pub guests: u32,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/chat`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// Body of every 4xx/5xx response
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: String,
}
