//! The restaurant assistant.
//!
//! A message is matched against an ordered table of keyword rules to pick an
//! [`Intent`]. Text intents answer straight away; data intents fetch
//! restaurants through a [`Catalog`] and answer with a typed [`Reply`].
//! Nothing is remembered between messages.

use crate::api::{MenuItem, Restaurant};
use crate::database::Database;
use crate::errors::Result;
use crate::query::{get_menu, list_restaurants, RestaurantFilter};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const GREETING: &str = "Hello! I'm your restaurant assistant. I can help you find restaurants, browse menus, make reservations, and place orders. What would you like to do today?";
pub const MENU_PROMPT: &str = "Please select a restaurant first to view its menu.";
pub const FALLBACK: &str = "I can help you with restaurant searches, menu browsing, reservations, and orders. What would you like to do?";
pub const FAILURE: &str = "Sorry, I encountered an error. Please try again.";

/// Seats shown for a restaurant in a reservation reply. Not tied to any stored
/// state.
pub const SEATS_MIN: u32 = 8;
pub const SEATS_MAX: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Nearby,
    Reservation,
    Search,
    MenuPrompt,
    Greeting,
    Fallback,
}

/// Checked in order against the lowercased message, first match wins.
/// `Fallback` applies when nothing matches.
pub const INTENT_RULES: &[(&[&str], Intent)] = &[
    (&["nearby", "near me", "close"], Intent::Nearby),
    (&["reservation", "book", "table"], Intent::Reservation),
    (&["find", "search", "restaurant"], Intent::Search),
    (&["menu"], Intent::MenuPrompt),
    (&["hello", "hi"], Intent::Greeting),
];

pub fn classify(message: &str) -> Intent {
    let message = message.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| message.contains(keyword)))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::Fallback)
}

/// Where the assistant gets its data from
pub trait Catalog {
    fn restaurants(&self) -> Result<Vec<Restaurant>>;
    fn menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>>;
}

/// Catalog reading straight from a store, for use inside the server process
pub struct StoreCatalog<'a>(pub &'a dyn Database);

impl Catalog for StoreCatalog<'_> {
    fn restaurants(&self) -> Result<Vec<Restaurant>> {
        Ok(list_restaurants(self.0, &RestaurantFilter::default()))
    }

    fn menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>> {
        Ok(get_menu(self.0, restaurant_id))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A restaurant offered for booking
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantAvailability {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub available_seats: u32,
}

/// What a message carries besides its text
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Reply {
    Text,
    #[serde(rename = "restaurant")]
    Restaurants(Vec<Restaurant>),
    Menu {
        restaurant: Restaurant,
        menu: Vec<MenuItem>,
    },
    #[serde(rename = "reservation")]
    Reservations(Vec<RestaurantAvailability>),
    Nearby(Vec<Restaurant>),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub reply: Reply,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>, reply: Reply) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            reply,
        }
    }

    pub fn bot(text: impl Into<String>, reply: Reply) -> ChatMessage {
        Self::new(Sender::Bot, text, reply)
    }
}

pub struct Dispatcher<C> {
    catalog: C,
}

impl<C: Catalog> Dispatcher<C> {
    pub fn new(catalog: C) -> Self {
        Dispatcher { catalog }
    }

    /// First message of a conversation
    pub fn welcome(&self) -> ChatMessage {
        ChatMessage::bot(GREETING, Reply::Text)
    }

    /// Answer a free-text message
    pub fn handle(&self, message: &str) -> ChatMessage {
        let intent = classify(message);
        tracing::debug!(?intent, "message classified");

        match intent {
            Intent::Nearby => self.with_restaurants(intent, |restaurants| {
                ChatMessage::bot("Here are the restaurants nearby:", Reply::Nearby(restaurants))
            }),
            Intent::Reservation => self.with_restaurants(intent, |restaurants| {
                let mut rng = rand::thread_rng();
                let available = restaurants
                    .into_iter()
                    .map(|restaurant| RestaurantAvailability {
                        restaurant,
                        available_seats: rng.gen_range(SEATS_MIN..=SEATS_MAX),
                    })
                    .collect();
                ChatMessage::bot(
                    "Here are the restaurants with available seats:",
                    Reply::Reservations(available),
                )
            }),
            // The words of the message are not used as filters
            Intent::Search => self.with_restaurants(intent, |restaurants| {
                ChatMessage::bot(
                    format!("I found {} restaurants for you:", restaurants.len()),
                    Reply::Restaurants(restaurants),
                )
            }),
            Intent::MenuPrompt => ChatMessage::bot(MENU_PROMPT, Reply::Text),
            Intent::Greeting => ChatMessage::bot(GREETING, Reply::Text),
            Intent::Fallback => ChatMessage::bot(FALLBACK, Reply::Text),
        }
    }

    /// Answer the selection of a restaurant from a list reply with its menu
    pub fn select_restaurant(&self, restaurant: &Restaurant) -> ChatMessage {
        match self.catalog.menu(&restaurant.id) {
            Ok(menu) => ChatMessage::bot(
                format!("Here's the menu for {}:", restaurant.name),
                Reply::Menu {
                    restaurant: restaurant.clone(),
                    menu,
                },
            ),
            Err(err) => failure("menu", err),
        }
    }

    /// Confirmation shown when a table is booked from a reservation reply
    pub fn book_table(&self, restaurant: &Restaurant, seats: u32) -> ChatMessage {
        let people = if seats == 1 { "person" } else { "people" };
        ChatMessage::bot(
            format!(
                "Table booked successfully at {} for {} {}!",
                restaurant.name, seats, people
            ),
            Reply::Text,
        )
    }

    fn with_restaurants<F>(&self, intent: Intent, reply: F) -> ChatMessage
    where
        F: FnOnce(Vec<Restaurant>) -> ChatMessage,
    {
        match self.catalog.restaurants() {
            Ok(restaurants) => reply(restaurants),
            Err(err) => failure(&format!("{:?}", intent), err),
        }
    }
}

/// Every branch reports a catalog failure the same way
fn failure(context: &str, err: crate::errors::Error) -> ChatMessage {
    tracing::warn!(context, %err, "assistant could not fetch data");
    ChatMessage::bot(FAILURE, Reply::Text)
}
