use dinebot::api::{MenuItem, Order, Reservation, Restaurant};
use dinebot::api_client::ApiClient;
use dinebot::cart::{group_by_category, Cart};
use dinebot::cli::*;
use dinebot::dispatcher::{ChatMessage, Dispatcher, Reply};
use dinebot::errors::{Error, Result};
use std::io::{self, BufRead, Write};

const USAGE: &str = "Usage: client [host:port] <command>

Commands:
  chat
  ask <message...>
  restaurants [cuisine=..] [location=..] [priceRange=..] [search=..]
  menu <restaurant-id>
  order <restaurant-id> <item-id[xN]>... [type=delivery|pickup] [name=..] [phone=..]
        [email=..] [address=..] [payment=..]
  orders
  status <order-id> <confirmed|preparing|ready|delivered>
  reserve <restaurant-id> <date> <time> <guests> <name> <phone> [requests...]
  reservations";

const DEFAULT_SEATS: u32 = 2;

/// What a line typed in the chat refers to in the previous list reply
#[derive(Debug, PartialEq)]
enum Selection {
    /// `<n>`: show the menu of the n-th restaurant
    Menu(Restaurant),
    /// `book <n> [seats]`: book a table at the n-th restaurant
    Book(Restaurant, u32),
}

fn listed_restaurants(reply: &Reply) -> Vec<(&Restaurant, Option<u32>)> {
    match reply {
        Reply::Restaurants(restaurants) | Reply::Nearby(restaurants) => {
            restaurants.iter().map(|r| (r, None)).collect()
        }
        Reply::Reservations(available) => available
            .iter()
            .map(|a| (&a.restaurant, Some(a.available_seats)))
            .collect(),
        Reply::Text | Reply::Menu { .. } => Vec::new(),
    }
}

fn parse_selection(line: &str, last: &Reply) -> Option<Selection> {
    let listed = listed_restaurants(last);
    let pick = |index: &str| {
        let index = index.parse::<usize>().ok()?;
        listed.get(index.checked_sub(1)?).copied()
    };

    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [index] => pick(*index).map(|(restaurant, _)| Selection::Menu(restaurant.clone())),
        ["book", index, rest @ ..] => {
            let (restaurant, available) = pick(*index)?;
            let seats = match rest {
                [] => DEFAULT_SEATS,
                [seats] => seats.parse().ok()?,
                _ => return None,
            };
            let available = available?;
            (1..=available)
                .contains(&seats)
                .then(|| Selection::Book(restaurant.clone(), seats))
        }
        _ => None,
    }
}

fn print_restaurant(index: Option<usize>, restaurant: &Restaurant) {
    let prefix = index.map(|i| format!("{:>2}. ", i)).unwrap_or_default();
    println!(
        "{}{} [{}] {} - {} - {} ({:.1})",
        prefix,
        restaurant.name,
        restaurant.id,
        restaurant.cuisine,
        restaurant.location,
        restaurant.price_range,
        restaurant.rating
    );
}

fn print_menu(menu: &[MenuItem]) {
    if menu.is_empty() {
        println!("No menu available.");
    }
    for (category, items) in group_by_category(menu) {
        println!("  {}", category);
        for item in items {
            println!("    [{}] {} - {:.2}", item.id, item.name, item.price);
        }
    }
}

fn print_order(order: &Order) {
    println!(
        "Order {} at restaurant {} ({:?} for {}): {:?}, total {:.2}, estimated {}",
        order.id,
        order.restaurant_id,
        order.order_type,
        order.customer_info.name,
        order.status,
        order.total,
        order.estimated_delivery.format("%H:%M")
    );
    for item in &order.items {
        println!("  {} x{} - {:.2}", item.name, item.quantity, item.subtotal());
    }
}

fn print_reservation(reservation: &Reservation) {
    println!(
        "Reservation {} at restaurant {}: {} {} for {} ({}), {:?}",
        reservation.id,
        reservation.restaurant_id,
        reservation.date,
        reservation.time,
        reservation.guests,
        reservation.name,
        reservation.status
    );
}

fn print_message(message: &ChatMessage) {
    println!("{}", message.text);
    match &message.reply {
        Reply::Text => {}
        Reply::Restaurants(restaurants) | Reply::Nearby(restaurants) => {
            for (i, restaurant) in restaurants.iter().enumerate() {
                print_restaurant(Some(i + 1), restaurant);
            }
            println!("Type a number to see its menu.");
        }
        Reply::Reservations(available) => {
            for (i, entry) in available.iter().enumerate() {
                print_restaurant(Some(i + 1), &entry.restaurant);
                println!("      {} seats available", entry.available_seats);
            }
            println!("Type 'book <number> [seats]' to book a table.");
        }
        Reply::Menu { menu, .. } => print_menu(menu),
    }
}

fn chat(client: ApiClient) -> Result<()> {
    let dispatcher = Dispatcher::new(client);
    print_message(&dispatcher.welcome());

    let mut last = Reply::Text;
    let mut lines = io::stdin().lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let message = match parse_selection(line, &last) {
            Some(Selection::Menu(restaurant)) => dispatcher.select_restaurant(&restaurant),
            Some(Selection::Book(restaurant, seats)) => dispatcher.book_table(&restaurant, seats),
            None => dispatcher.handle(line),
        };
        print_message(&message);
        if !matches!(message.reply, Reply::Text) {
            last = message.reply;
        }
    }
    Ok(())
}

fn run(options: CLIOptions) -> Result<()> {
    let client = ApiClient::new(&options.target);

    match options.command {
        Command::Chat => chat(client)?,
        Command::Restaurants(filter) => {
            let restaurants = client.search_restaurants(&filter)?;
            if restaurants.is_empty() {
                println!("No restaurants found.");
            }
            for restaurant in &restaurants {
                print_restaurant(None, restaurant);
            }
        }
        Command::Menu(restaurant_id) => {
            let restaurant = client.restaurant(&restaurant_id)?;
            print_restaurant(None, &restaurant);
            print_menu(&client.restaurant_menu(&restaurant_id)?);
        }
        Command::Ask(message) => println!("{}", client.chat(&message)?),
        Command::Order {
            restaurant_id,
            items,
            customer_info,
            order_type,
            payment_method,
        } => {
            let menu = client.restaurant_menu(&restaurant_id)?;
            let mut cart = Cart::new();
            for (item_id, quantity) in items {
                let item = menu
                    .iter()
                    .find(|item| item.id == item_id)
                    .ok_or_else(|| Error::NotFound(format!("Menu item {} not found", item_id)))?;
                cart.add_quantity(item, quantity);
            }
            println!(
                "Submitting {} items for {:.2}",
                cart.total_items(),
                cart.total_price()
            );
            let order = cart.checkout(&restaurant_id, customer_info, order_type, &payment_method);
            print_order(&client.create_order(&order)?);
        }
        Command::Orders => {
            for order in client.orders()? {
                print_order(&order);
            }
        }
        Command::Status { order_id, status } => {
            print_order(&client.update_order_status(&order_id, status)?);
        }
        Command::Reserve(reservation) => {
            print_reservation(&client.create_reservation(&reservation)?);
        }
        Command::Reservations => {
            for reservation in client.reservations()? {
                print_reservation(&reservation);
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dinebot=warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let options = match parse_cli_args(std::env::args()) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{}\n\n{}", err, USAGE);
            std::process::exit(2);
        }
    };

    if let Err(err) = run(options) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dinebot::dispatcher::RestaurantAvailability;
    use dinebot::seed::sample_restaurants;

    #[test]
    fn test_select_from_list() {
        let restaurants = sample_restaurants();
        let last = Reply::Restaurants(restaurants.clone());

        assert_eq!(
            parse_selection("2", &last),
            Some(Selection::Menu(restaurants[1].clone()))
        );
        assert_eq!(parse_selection("0", &last), None);
        assert_eq!(parse_selection("5", &last), None);
        assert_eq!(parse_selection("2", &Reply::Text), None);
        // Booking needs a reservation list
        assert_eq!(parse_selection("book 1", &last), None);
    }

    #[test]
    fn test_book_within_available_seats() {
        let restaurant = sample_restaurants().remove(0);
        let last = Reply::Reservations(vec![RestaurantAvailability {
            restaurant: restaurant.clone(),
            available_seats: 8,
        }]);

        assert_eq!(
            parse_selection("book 1", &last),
            Some(Selection::Book(restaurant.clone(), DEFAULT_SEATS))
        );
        assert_eq!(
            parse_selection("book 1 8", &last),
            Some(Selection::Book(restaurant.clone(), 8))
        );
        assert_eq!(parse_selection("book 1 9", &last), None);
        assert_eq!(parse_selection("book 1 0", &last), None);
        assert_eq!(
            parse_selection("1", &last),
            Some(Selection::Menu(restaurant))
        );
    }
}
