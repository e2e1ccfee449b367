//! Keyword responder behind `POST /api/chat`.
//!
//! Simpler than the assistant in `dispatcher`: it never touches the store and
//! only ever answers with text.

/// Rules checked in order against the lowercased message; the first rule with
/// a matching keyword answers.
const RULES: &[(&[&str], &str)] = &[
    (
        &["find", "search", "restaurant"],
        "I can help you find restaurants! What type of cuisine are you looking for? You can also specify a location or price range.",
    ),
    (
        &["menu"],
        "I can show you menus for any restaurant. Which restaurant would you like to see the menu for?",
    ),
    (
        &["reservation", "book"],
        "I can help you make a reservation! Please let me know which restaurant, date, time, and number of guests.",
    ),
    (
        &["order"],
        "I can help you place an order for delivery or pickup. Which restaurant and items would you like to order?",
    ),
    (
        &["hello", "hi"],
        "Hello! I'm your restaurant assistant. I can help you find restaurants, browse menus, make reservations, and place orders. What would you like to do today?",
    ),
];

pub const FALLBACK: &str =
    "I can help you with restaurant searches, menu browsing, reservations, and orders. What would you like to do?";

pub fn respond(message: &str) -> &'static str {
    let message = message.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| message.contains(keyword)))
        .map(|(_, response)| *response)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rules_in_order() {
        assert!(respond("Find me a restaurant").starts_with("I can help you find restaurants"));
        assert!(respond("show the MENU").starts_with("I can show you menus"));
        assert!(respond("book a table").starts_with("I can help you make a reservation"));
        assert!(respond("I want to order").starts_with("I can help you place an order"));
        assert!(respond("Hello!").starts_with("Hello! I'm your restaurant assistant"));
        assert_eq!(respond("what's up"), FALLBACK);
    }

    #[test]
    fn test_first_match_wins() {
        // Both "search" and "menu" appear, search comes first
        assert!(respond("search the menu").starts_with("I can help you find restaurants"));
        // "order" would also match but "book" is checked first
        assert!(respond("book and order").starts_with("I can help you make a reservation"));
    }
}
