use crate::api::{MenuItem, Order, Reservation, Restaurant};
use crate::database::{load, Collection, Database};
use crate::errors::{Error, Result};
use crate::seed::Menus;
use std::collections::HashMap;

/// Names of the query string parameters accepted by `GET /api/restaurants`
pub mod keys {
    pub const CUISINE: &str = "cuisine";
    pub const LOCATION: &str = "location";
    pub const PRICE_RANGE: &str = "priceRange";
    pub const SEARCH: &str = "search";
}

/// Restaurant search criteria. Every supplied field must match; `None` means
/// no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    /// Case-insensitive substring of the cuisine
    pub cuisine: Option<String>,
    /// Case-insensitive substring of the location
    pub location: Option<String>,
    /// Exact price tier
    pub price_range: Option<String>,
    /// Case-insensitive substring of the name or the description
    pub search: Option<String>,
}

impl RestaurantFilter {
    /// Build a filter from query parameters. Empty values are ignored, like
    /// absent ones.
    pub fn from_params(params: &HashMap<String, String>) -> RestaurantFilter {
        let get = |key: &str| params.get(key).filter(|v| !v.is_empty()).cloned();
        RestaurantFilter {
            cuisine: get(keys::CUISINE),
            location: get(keys::LOCATION),
            price_range: get(keys::PRICE_RANGE),
            search: get(keys::SEARCH),
        }
    }

    /// The filter as query parameters, in a stable order
    pub fn to_params(&self) -> Vec<(&'static str, &str)> {
        [
            (keys::CUISINE, &self.cuisine),
            (keys::LOCATION, &self.location),
            (keys::PRICE_RANGE, &self.price_range),
            (keys::SEARCH, &self.search),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }

    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        };

        self.cuisine
            .as_deref()
            .map_or(true, |cuisine| contains(&restaurant.cuisine, cuisine))
            && self
                .location
                .as_deref()
                .map_or(true, |location| contains(&restaurant.location, location))
            && self
                .price_range
                .as_deref()
                .map_or(true, |price| restaurant.price_range == price)
            && self.search.as_deref().map_or(true, |search| {
                contains(&restaurant.name, search) || contains(&restaurant.description, search)
            })
    }
}

/// All restaurants matching `filter`, in store order
pub fn list_restaurants(db: &dyn Database, filter: &RestaurantFilter) -> Vec<Restaurant> {
    load::<Vec<Restaurant>>(db, Collection::Restaurants)
        .into_iter()
        .filter(|restaurant| filter.matches(restaurant))
        .collect()
}

pub fn get_restaurant(db: &dyn Database, id: &str) -> Result<Restaurant> {
    load::<Vec<Restaurant>>(db, Collection::Restaurants)
        .into_iter()
        .find(|restaurant| restaurant.id == id)
        .ok_or_else(|| Error::NotFound(format!("Restaurant {} not found", id)))
}

/// Menu of the given restaurant. An unknown id has an empty menu.
pub fn get_menu(db: &dyn Database, restaurant_id: &str) -> Vec<MenuItem> {
    load::<Menus>(db, Collection::Menus)
        .remove(restaurant_id)
        .unwrap_or_default()
}

pub fn list_orders(db: &dyn Database) -> Vec<Order> {
    load(db, Collection::Orders)
}

pub fn get_order(db: &dyn Database, id: &str) -> Result<Order> {
    list_orders(db)
        .into_iter()
        .find(|order| order.id == id)
        .ok_or_else(|| Error::NotFound(format!("Order {} not found", id)))
}

pub fn list_reservations(db: &dyn Database) -> Vec<Reservation> {
    load(db, Collection::Reservations)
}
