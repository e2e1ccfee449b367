use crate::api::{
    ChatRequest, ChatResponse, ErrorBody, HealthStatus, MenuItem, NewOrder, NewReservation, Order,
    OrderStatus, Reservation, Restaurant, StatusUpdate,
};
use crate::dispatcher::Catalog;
use crate::errors::{Error, Result};
use crate::http::HttpClient;
use crate::query::RestaurantFilter;
use crate::routes::{self, paths};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Typed access to the REST API. Opens one connection per call.
pub struct ApiClient {
    address: String,
}

impl ApiClient {
    pub fn new(address: &str) -> Self {
        ApiClient {
            address: address.to_string(),
        }
    }

    fn call<T: DeserializeOwned>(&self, method: &str, path: &str, body: &str) -> Result<T> {
        let response = HttpClient::new(&self.address)?.send(method, path, body)?;
        match response.status {
            Some(200) => Ok(serde_json::from_str(&response.body)?),
            Some(status) => {
                let message = serde_json::from_str::<ErrorBody>(&response.body)
                    .map(|body| body.error)
                    .unwrap_or(response.body);
                Err(match status {
                    404 => Error::NotFound(message),
                    400 => Error::BadRequest(message),
                    status => Error::UnexpectedStatus {
                        status,
                        body: message,
                    },
                })
            }
            None => Err(Error::NoResponse),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.call("GET", path, "")
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.call(method, path, &serde_json::to_string(body)?)
    }

    pub fn health(&self) -> Result<HealthStatus> {
        self.get(paths::HEALTH)
    }

    pub fn search_restaurants(&self, filter: &RestaurantFilter) -> Result<Vec<Restaurant>> {
        self.get(&routes::restaurants(filter))
    }

    pub fn restaurant(&self, id: &str) -> Result<Restaurant> {
        self.get(&routes::restaurant_by_id(id))
    }

    pub fn restaurant_menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>> {
        self.get(&routes::menu(restaurant_id))
    }

    pub fn create_order(&self, order: &NewOrder) -> Result<Order> {
        self.send_json("POST", paths::ORDERS, order)
    }

    pub fn orders(&self) -> Result<Vec<Order>> {
        self.get(paths::ORDERS)
    }

    pub fn order(&self, id: &str) -> Result<Order> {
        self.get(&routes::order_by_id(id))
    }

    pub fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order> {
        self.send_json("PUT", &routes::order_status(id), &StatusUpdate { status })
    }

    pub fn create_reservation(&self, reservation: &NewReservation) -> Result<Reservation> {
        self.send_json("POST", paths::RESERVATIONS, reservation)
    }

    pub fn reservations(&self) -> Result<Vec<Reservation>> {
        self.get(paths::RESERVATIONS)
    }

    /// Ask the server-side responder
    pub fn chat(&self, message: &str) -> Result<String> {
        let response: ChatResponse = self.send_json(
            "POST",
            paths::CHAT,
            &ChatRequest {
                message: message.to_string(),
            },
        )?;
        Ok(response.response)
    }
}

impl Catalog for ApiClient {
    fn restaurants(&self) -> Result<Vec<Restaurant>> {
        self.search_restaurants(&RestaurantFilter::default())
    }

    fn menu(&self, restaurant_id: &str) -> Result<Vec<MenuItem>> {
        self.restaurant_menu(restaurant_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::{CustomerInfo, LineItem, OrderType};
    use crate::database::json_file::JsonFileDb;
    use crate::dispatcher::{Dispatcher, Reply};
    use crate::endpoints::create_http_router;
    use crate::http::HttpServer;
    use crate::seed::seed;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn spawn_server(data_dir: &std::path::Path, count: usize) -> (String, std::thread::JoinHandle<()>) {
        let mut db = JsonFileDb::new(data_dir);
        seed(&mut db).unwrap();
        let db = Arc::new(Mutex::new(db));
        let router = Arc::new(create_http_router().unwrap());

        let server = HttpServer::new("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap().to_string();
        let handle = std::thread::spawn(move || {
            server
                .serve_n(count, move |request| {
                    let mut db = db.lock().unwrap();
                    router.handle(request, &mut *db)
                })
                .unwrap();
        });
        (addr, handle)
    }

    #[test]
    fn test_client_against_file_backed_server() {
        let temp_dir = TempDir::new().unwrap();
        let (addr, handle) = spawn_server(temp_dir.path(), 8);
        let client = ApiClient::new(&addr);

        assert_eq!(client.health().unwrap().message, "Server is running");

        let filter = RestaurantFilter {
            search: Some("organic".to_string()),
            ..Default::default()
        };
        let found = client.search_restaurants(&filter).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");

        assert!(matches!(client.restaurant("99"), Err(Error::NotFound(_))));

        let order = client
            .create_order(&NewOrder {
                restaurant_id: "1".to_string(),
                items: vec![LineItem {
                    id: "1".to_string(),
                    name: "Margherita Pizza".to_string(),
                    price: 450.0,
                    quantity: 2,
                    category: None,
                    description: None,
                    image: None,
                }],
                customer_info: CustomerInfo::default(),
                order_type: OrderType::Delivery,
                payment_method: "card".to_string(),
            })
            .unwrap();
        assert_eq!(order.total, 900.0);

        let updated = client
            .update_order_status(&order.id, OrderStatus::Delivered)
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Delivered);
        assert_eq!(client.order(&order.id).unwrap().status, OrderStatus::Delivered);

        assert!(client
            .chat("I want to order")
            .unwrap()
            .starts_with("I can help you place an order"));

        let dispatcher = Dispatcher::new(ApiClient::new(&addr));
        let reply = dispatcher.handle("find a restaurant");
        assert!(matches!(reply.reply, Reply::Restaurants(ref r) if r.len() == 4));

        handle.join().unwrap();

        // Everything went through the JSON files
        let orders = std::fs::read_to_string(temp_dir.path().join("orders.json")).unwrap();
        assert!(orders.contains("\"delivered\""));
    }
}
