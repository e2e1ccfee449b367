use crate::api::{MenuItem, Order, Reservation, Restaurant};
use crate::database::{save, Collection, Database};
use crate::errors::Result;
use std::collections::BTreeMap;

/// Menus are stored as a single document keyed by restaurant id
pub type Menus = BTreeMap<String, Vec<MenuItem>>;

/// Write the sample data for every collection that does not exist yet.
///
/// Existing documents are never touched, so calling this on every startup is
/// safe.
pub fn seed(db: &mut dyn Database) -> Result<()> {
    if !db.exists(Collection::Restaurants) {
        save(db, Collection::Restaurants, &sample_restaurants())?;
        tracing::info!("seeded restaurants");
    }
    if !db.exists(Collection::Menus) {
        save(db, Collection::Menus, &sample_menus())?;
        tracing::info!("seeded menus");
    }
    if !db.exists(Collection::Orders) {
        save(db, Collection::Orders, &Vec::<Order>::new())?;
    }
    if !db.exists(Collection::Reservations) {
        save(db, Collection::Reservations, &Vec::<Reservation>::new())?;
    }
    Ok(())
}

fn menu_item(
    id: &str,
    name: &str,
    price: f64,
    category: &str,
    description: &str,
    photo: u32,
) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        price,
        category: category.to_string(),
        description: description.to_string(),
        image: pexels(photo, 400),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn pexels(photo: u32, width: u32) -> String {
    format!(
        "https://images.pexels.com/photos/{0}/pexels-photo-{0}.jpeg?auto=compress&cs=tinysrgb&w={1}",
        photo, width
    )
}

pub fn sample_restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant {
            id: "1".into(),
            name: "Bella Vista Italian".into(),
            cuisine: "Italian".into(),
            location: "Downtown".into(),
            price_range: "₹₹₹".into(),
            rating: 4.8,
            image: pexels(262978, 800),
            description: "Authentic Italian cuisine with fresh pasta and wood-fired pizzas".into(),
            phone: "(555) 123-4567".into(),
            address: "123 Main St, Downtown".into(),
            hours: "Mon-Sun: 5:00 PM - 11:00 PM".into(),
            features: strings(&["Outdoor Seating", "Wine Bar", "Romantic"]),
        },
        Restaurant {
            id: "2".into(),
            name: "Tokyo Sushi Bar".into(),
            cuisine: "Japanese".into(),
            location: "Midtown".into(),
            price_range: "₹₹₹₹".into(),
            rating: 4.9,
            image: pexels(357756, 800),
            description: "Premium sushi and Japanese cuisine by master chefs".into(),
            phone: "(555) 234-5678".into(),
            address: "456 Oak Ave, Midtown".into(),
            hours: "Tue-Sun: 6:00 PM - 12:00 AM".into(),
            features: strings(&["Omakase", "Sake Bar", "Chef's Table"]),
        },
        Restaurant {
            id: "3".into(),
            name: "The Green Garden".into(),
            cuisine: "Vegetarian".into(),
            location: "Uptown".into(),
            price_range: "₹₹".into(),
            rating: 4.6,
            image: pexels(1640777, 800),
            description: "Fresh, organic vegetarian and vegan dishes".into(),
            phone: "(555) 345-6789".into(),
            address: "789 Pine St, Uptown".into(),
            hours: "Mon-Sun: 11:00 AM - 10:00 PM".into(),
            features: strings(&["Organic", "Vegan Options", "Healthy"]),
        },
        Restaurant {
            id: "4".into(),
            name: "Smoky BBQ House".into(),
            cuisine: "BBQ".into(),
            location: "Westside".into(),
            price_range: "₹₹".into(),
            rating: 4.7,
            image: pexels(323682, 800),
            description: "Authentic BBQ with house-made sauces and sides".into(),
            phone: "(555) 456-7890".into(),
            address: "321 Elm St, Westside".into(),
            hours: "Mon-Sun: 12:00 PM - 10:00 PM".into(),
            features: strings(&["Takeout", "Family Friendly", "Casual"]),
        },
    ]
}

pub fn sample_menus() -> Menus {
    let mut menus = Menus::new();
    menus.insert(
        "1".to_string(),
        vec![
            menu_item("1", "Margherita Pizza", 450.0, "Pizza", "Fresh mozzarella, tomato sauce, basil", 315755),
            menu_item("2", "Spaghetti Carbonara", 550.0, "Pasta", "Pancetta, egg, pecorino romano, black pepper", 4518843),
            menu_item("3", "Tiramisu", 220.0, "Dessert", "Classic Italian dessert with mascarpone", 6074893),
        ],
    );
    menus.insert(
        "2".to_string(),
        vec![
            menu_item("4", "Omakase Set", 2100.0, "Sushi", "Chef's choice of 10 premium sushi pieces", 357756),
            menu_item("5", "Chirashi Bowl", 850.0, "Sashimi", "Assorted fresh sashimi over sushi rice", 248444),
            menu_item("6", "Miso Soup", 150.0, "Soup", "Traditional miso soup with tofu and seaweed", 539451),
        ],
    );
    menus.insert(
        "3".to_string(),
        vec![
            menu_item("7", "Buddha Bowl", 420.0, "Bowls", "Quinoa, roasted vegetables, tahini dressing", 1640777),
            menu_item("8", "Avocado Toast", 320.0, "Breakfast", "Multigrain bread, avocado, hemp seeds", 1351238),
            menu_item("9", "Green Smoothie", 220.0, "Drinks", "Spinach, banana, mango, coconut water", 616833),
        ],
    );
    menus.insert(
        "4".to_string(),
        vec![
            menu_item("10", "Brisket Platter", 620.0, "BBQ", "Slow-smoked brisket with two sides", 323682),
            menu_item("11", "Pulled Pork Sandwich", 420.0, "Sandwiches", "House-made BBQ sauce, coleslaw, brioche bun", 1633578),
            menu_item("12", "Mac & Cheese", 220.0, "Sides", "Creamy four-cheese blend with breadcrumbs", 14737),
        ],
    );
    menus
}
