use crate::api::{CustomerInfo, NewReservation, OrderStatus, OrderType};
use crate::query::{keys, RestaurantFilter};
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// Default address for both the client and the server
///
/// Matches the default `PORT` of the server configuration, so a client started
/// without arguments talks to a server started without configuration.
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:3001";

/// Payment method of orders placed without `payment=`
pub const DEFAULT_PAYMENT_METHOD: &str = "card";

const ADDRESS_PATTERN: &str = r"^[a-zA-Z0-9\.\-]+:\d{1,5}$";

/// Errors that can occur when parsing the command line arguments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CLIError {
    #[error("Invalid target format. Should be <host>:<port>")]
    InvalidUrlFormat,

    #[error("Missing parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Invalid parameter '{0}'")]
    InvalidParameter(String),

    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
}

/// Validate the format of the TCP address provided by the user
///
/// Returns its input if the address is in the format <host>:<port>, otherwise InvalidUrlFormat
pub fn validate_address(url: &str) -> Result<&str, CLIError> {
    let re = Regex::new(ADDRESS_PATTERN).map_err(|_| CLIError::InvalidUrlFormat)?;
    if re.is_match(url) {
        Ok(url)
    } else {
        Err(CLIError::InvalidUrlFormat)
    }
}

/// What the terminal client was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Chat,
    Restaurants(RestaurantFilter),
    Menu(String),
    /// Ask the server-side responder a single question
    Ask(String),
    Order {
        restaurant_id: String,
        items: Vec<(String, u32)>,
        customer_info: CustomerInfo,
        order_type: OrderType,
        payment_method: String,
    },
    Orders,
    Status {
        order_id: String,
        status: OrderStatus,
    },
    Reserve(NewReservation),
    Reservations,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CLIOptions {
    pub target: String,
    pub command: Command,
}

/// Parse `[host:port] <command> [arguments...]`, program name included
pub fn parse_cli_args<I>(mut args: I) -> Result<CLIOptions, CLIError>
where
    I: Iterator<Item = String>,
{
    args.next(); // Skip the program name
    let first = args
        .next()
        .ok_or(CLIError::MissingParameter("target or command"))?;

    let (target, command) = match validate_address(&first) {
        Ok(target) => (
            target.to_string(),
            args.next().ok_or(CLIError::MissingParameter("command"))?,
        ),
        Err(_) => (DEFAULT_ADDRESS.to_string(), first),
    };

    let command = parse_command(&command, args.collect())?;
    Ok(CLIOptions { target, command })
}

fn parse_command(name: &str, args: Vec<String>) -> Result<Command, CLIError> {
    let mut args = args.into_iter();
    let args = &mut args;

    let command = match name.to_ascii_lowercase().as_str() {
        "chat" => Command::Chat,
        "ask" => {
            let message = args.collect::<Vec<_>>().join(" ");
            if message.is_empty() {
                return Err(CLIError::MissingParameter("message"));
            }
            Command::Ask(message)
        }
        "restaurants" => {
            let mut params = HashMap::new();
            for arg in args {
                let (key, value) = arg
                    .split_once('=')
                    .ok_or_else(|| CLIError::InvalidParameter(arg.clone()))?;
                if ![keys::CUISINE, keys::LOCATION, keys::PRICE_RANGE, keys::SEARCH].contains(&key) {
                    return Err(CLIError::InvalidParameter(key.to_string()));
                }
                params.insert(key.to_string(), value.to_string());
            }
            Command::Restaurants(RestaurantFilter::from_params(&params))
        }
        "menu" => Command::Menu(required(args, "restaurant id")?),
        "order" => {
            let restaurant_id = required(args, "restaurant id")?;
            let mut items = Vec::new();
            let mut customer_info = CustomerInfo::default();
            let mut order_type = OrderType::Delivery;
            let mut payment_method = DEFAULT_PAYMENT_METHOD.to_string();
            for arg in args {
                let Some((key, value)) = arg.split_once('=') else {
                    items.push(parse_item(&arg)?);
                    continue;
                };
                let value = value.to_string();
                match key {
                    "type" => order_type = value.parse().map_err(CLIError::InvalidParameter)?,
                    "name" => customer_info.name = value,
                    "phone" => customer_info.phone = value,
                    "email" => customer_info.email = value,
                    "address" => customer_info.address = Some(value).filter(|a| !a.is_empty()),
                    "payment" => payment_method = value,
                    _ => return Err(CLIError::InvalidParameter(key.to_string())),
                }
            }
            if items.is_empty() {
                return Err(CLIError::MissingParameter("item id"));
            }
            Command::Order {
                restaurant_id,
                items,
                customer_info,
                order_type,
                payment_method,
            }
        }
        "orders" => Command::Orders,
        "status" => {
            let order_id = required(args, "order id")?;
            let status = required(args, "status")?;
            Command::Status {
                order_id,
                status: status.parse().map_err(CLIError::InvalidParameter)?,
            }
        }
        "reserve" => {
            let restaurant_id = required(args, "restaurant id")?;
            let date = required(args, "date")?;
            let time = required(args, "time")?;
            let guests = required(args, "guests")?;
            let guests = guests
                .parse()
                .map_err(|_| CLIError::InvalidParameter(guests))?;
            let name = required(args, "name")?;
            let phone = required(args, "phone")?;
            let special_requests = args.collect::<Vec<_>>().join(" ");
            Command::Reserve(NewReservation {
                restaurant_id,
                date,
                time,
                guests,
                name,
                phone,
                special_requests: Some(special_requests).filter(|s| !s.is_empty()),
            })
        }
        "reservations" => Command::Reservations,
        _ => return Err(CLIError::UnknownCommand(name.to_string())),
    };
    Ok(command)
}

fn required<I>(args: &mut I, name: &'static str) -> Result<String, CLIError>
where
    I: Iterator<Item = String>,
{
    args.next().ok_or(CLIError::MissingParameter(name))
}

/// `<item-id>` or `<item-id>x<quantity>`
fn parse_item(item: &str) -> Result<(String, u32), CLIError> {
    match item.rsplit_once('x') {
        Some((id, quantity)) if !id.is_empty() => match quantity.parse::<u32>() {
            Ok(quantity) if quantity > 0 => Ok((id.to_string(), quantity)),
            _ => Err(CLIError::InvalidParameter(item.to_string())),
        },
        _ => Ok((item.to_string(), 1)),
    }
}
