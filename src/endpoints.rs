use crate::api::{ChatRequest, ChatResponse, HealthStatus, NewOrder, NewReservation, StatusUpdate};
use crate::chat;
use crate::database::Database;
use crate::errors::Result;
use crate::http::{Request, Response};
use crate::lifecycle;
use crate::query::{self, RestaurantFilter};
use crate::routes::*;

/// Router with every endpoint of the API
pub fn create_http_router() -> Result<HttpRouter> {
    let mut router = HttpRouter::new()?;

    router.add_route("GET", endpoints::HEALTH, health);
    router.add_route("GET", endpoints::RESTAURANTS, get_restaurants);
    router.add_route("GET", endpoints::RESTAURANT_BY_ID, get_restaurant);
    router.add_route("GET", endpoints::MENU, get_menu);
    router.add_route("GET", endpoints::RESERVATIONS, get_reservations);
    router.add_route("POST", endpoints::RESERVATIONS, post_reservation);
    router.add_route("GET", endpoints::ORDERS, get_orders);
    router.add_route("POST", endpoints::ORDERS, post_order);
    router.add_route("GET", endpoints::ORDER_BY_ID, get_order);
    router.add_route("PUT", endpoints::ORDER_STATUS, put_order_status);
    router.add_route("POST", endpoints::CHAT, post_chat);

    Ok(router)
}

fn health(_: Request, _: HttpParams, _: &mut dyn Database) -> Result<Response> {
    Response::json(
        200,
        &HealthStatus {
            status: "OK".to_string(),
            message: "Server is running".to_string(),
        },
    )
}

fn get_restaurants(request: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let filter = RestaurantFilter::from_params(&request.query());
    Response::json(200, &query::list_restaurants(db, &filter))
}

fn get_restaurant(_: Request, params: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let id = param(&params, params::RESTAURANT_ID)?;
    Response::json(200, &query::get_restaurant(db, id)?)
}

fn get_menu(_: Request, params: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let id = param(&params, params::RESTAURANT_ID)?;
    Response::json(200, &query::get_menu(db, id))
}

fn get_reservations(_: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    Response::json(200, &query::list_reservations(db))
}

fn post_reservation(request: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let new_reservation: NewReservation = request.json()?;
    Response::json(200, &lifecycle::create_reservation(db, new_reservation)?)
}

fn get_orders(_: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    Response::json(200, &query::list_orders(db))
}

fn post_order(request: Request, _: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let new_order: NewOrder = request.json()?;
    Response::json(200, &lifecycle::create_order(db, new_order)?)
}

fn get_order(_: Request, params: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let id = param(&params, params::ORDER_ID)?;
    Response::json(200, &query::get_order(db, id)?)
}

fn put_order_status(request: Request, params: HttpParams, db: &mut dyn Database) -> Result<Response> {
    let id = param(&params, params::ORDER_ID)?;
    let update: StatusUpdate = request.json()?;
    Response::json(200, &lifecycle::update_order_status(db, id, update.status)?)
}

fn post_chat(request: Request, _: HttpParams, _: &mut dyn Database) -> Result<Response> {
    let chat: ChatRequest = request.json()?;
    Response::json(
        200,
        &ChatResponse {
            response: chat::respond(&chat.message).to_string(),
        },
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::api::{ErrorBody, Order, Reservation, Restaurant};
    use crate::database::mock::MemoryDb;

    fn call(db: &mut MemoryDb, request: Request) -> Response {
        create_http_router().unwrap().handle(request, db)
    }

    fn body<T: serde::de::DeserializeOwned>(response: &Response) -> T {
        serde_json::from_str(&response.body).unwrap()
    }

    const ORDER_BODY: &str = r#"{
        "restaurantId": "1",
        "items": [{"id": "1", "price": 450, "quantity": 2}],
        "customerInfo": {"name": "Ada", "phone": "555-0100", "email": "ada@example.com"},
        "orderType": "pickup",
        "paymentMethod": "cash"
    }"#;

    #[test]
    fn test_health() {
        let mut db = MemoryDb::new();
        let response = call(&mut db, Request::get(paths::HEALTH));
        assert_eq!(response.status, Some(200));
        let health: HealthStatus = body(&response);
        assert_eq!(health.status, "OK");
    }

    #[test]
    fn test_filter_restaurants_by_cuisine() {
        let mut db = MemoryDb::seeded().unwrap();
        let response = call(&mut db, Request::get("/api/restaurants?cuisine=Italian"));

        assert_eq!(response.status, Some(200));
        let restaurants: Vec<Restaurant> = body(&response);
        assert_eq!(restaurants.len(), 1);
        assert_eq!(restaurants[0].name, "Bella Vista Italian");
    }

    #[test]
    fn test_restaurant_by_id() {
        let mut db = MemoryDb::seeded().unwrap();

        let response = call(&mut db, Request::get(&restaurant_by_id("2")));
        assert_eq!(body::<Restaurant>(&response).name, "Tokyo Sushi Bar");

        let response = call(&mut db, Request::get(&restaurant_by_id("404")));
        assert_eq!(response.status, Some(404));
        assert!(!body::<ErrorBody>(&response).error.is_empty());
    }

    #[test]
    fn test_menu_of_unknown_restaurant_is_empty() {
        let mut db = MemoryDb::seeded().unwrap();
        let response = call(&mut db, Request::get(&menu("unknown")));
        assert_eq!(response.status, Some(200));
        assert_eq!(response.body, "[]");
    }

    #[test]
    fn test_order_lifecycle() {
        let mut db = MemoryDb::seeded().unwrap();

        let response = call(&mut db, Request::post(paths::ORDERS, ORDER_BODY.to_string()));
        assert_eq!(response.status, Some(200));
        let order: Order = body(&response);
        assert_eq!(order.total, 900.0);
        assert!(!order.id.is_empty());

        let response = call(&mut db, Request::get(&order_by_id(&order.id)));
        assert_eq!(body::<Order>(&response), order);

        let response = call(
            &mut db,
            Request::put(&order_status(&order.id), r#"{"status": "ready"}"#.to_string()),
        );
        assert_eq!(response.status, Some(200));
        assert_eq!(body::<Order>(&response).status, crate::api::OrderStatus::Ready);

        let response = call(&mut db, Request::get(paths::ORDERS));
        let orders: Vec<Order> = body(&response);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status, crate::api::OrderStatus::Ready);
    }

    #[test]
    fn test_unknown_order() {
        let mut db = MemoryDb::seeded().unwrap();

        let response = call(&mut db, Request::get(&order_by_id("missing")));
        assert_eq!(response.status, Some(404));

        let response = call(
            &mut db,
            Request::put(&order_status("missing"), r#"{"status": "ready"}"#.to_string()),
        );
        assert_eq!(response.status, Some(404));
        assert_eq!(call(&mut db, Request::get(paths::ORDERS)).body, "[]");
    }

    #[test]
    fn test_malformed_bodies_are_rejected() {
        let mut db = MemoryDb::seeded().unwrap();

        let response = call(&mut db, Request::post(paths::ORDERS, "{}".to_string()));
        assert_eq!(response.status, Some(400));

        let order = call(&mut db, Request::post(paths::ORDERS, ORDER_BODY.to_string()));
        let order: Order = body(&order);
        let response = call(
            &mut db,
            Request::put(&order_status(&order.id), r#"{"status": "burnt"}"#.to_string()),
        );
        assert_eq!(response.status, Some(400));
    }

    #[test]
    fn test_reservations() {
        let mut db = MemoryDb::seeded().unwrap();
        let request = r#"{
            "restaurantId": "3",
            "date": "2024-06-01",
            "time": "20:00",
            "guests": 2,
            "name": "Grace",
            "phone": "555-0101"
        }"#;

        let response = call(&mut db, Request::post(paths::RESERVATIONS, request.to_string()));
        assert_eq!(response.status, Some(200));
        let reservation: Reservation = body(&response);
        assert_eq!(reservation.special_requests, None);

        let response = call(&mut db, Request::get(paths::RESERVATIONS));
        assert_eq!(body::<Vec<Reservation>>(&response), vec![reservation]);
    }

    #[test]
    fn test_chat() {
        let mut db = MemoryDb::new();
        let response = call(
            &mut db,
            Request::post(paths::CHAT, r#"{"message": "Hello"}"#.to_string()),
        );
        let chat: ChatResponse = body(&response);
        assert!(chat.response.starts_with("Hello! I'm your restaurant assistant"));
    }
}
