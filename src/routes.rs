use std::collections::HashMap;

use crate::database::Database;
use crate::errors::{Error, Result};
use crate::http::{Request, Response};
use crate::query::RestaurantFilter;
use matchit::Router;

/// Utility macro generating a constant for the HTTP endpoint, and associate it with
/// an identifier. Matchit requires both
macro_rules! make_paths {
    ($($name:ident: $path:expr,)*) => {
        pub mod paths {
            $(
                pub const $name: &str = concat!("/api", $path);
            )*
        }
        pub mod endpoints {
            $(
                pub const $name: &str = stringify!($name);
            )*
        }
        const ALL_ENDPOINTS: &[(&str, &str)] = &[
            $(
                (paths::$name, endpoints::$name),
            )*
        ];
    }
}

make_paths! {
    HEALTH: "/health",
    RESTAURANTS: "/restaurants",
    RESTAURANT_BY_ID: "/restaurants/{restaurant_id}",
    MENU: "/restaurants/{restaurant_id}/menu",
    RESERVATIONS: "/reservations",
    ORDERS: "/orders",
    ORDER_BY_ID: "/orders/{order_id}",
    ORDER_STATUS: "/orders/{order_id}/status",
    CHAT: "/chat",
}

/// Names of the parameters in the HTTP paths, used to extract them
/// from the parameters inside of request handling
pub mod params {
    /// Key of restaurant ids in HTTP paths
    pub const RESTAURANT_ID: &str = "restaurant_id";

    /// Key of order ids in HTTP paths
    pub const ORDER_ID: &str = "order_id";
}

/// Return the HTTP path for a restaurant based on its id
pub fn restaurant_by_id(restaurant_id: &str) -> String {
    paths::RESTAURANT_BY_ID.replace("{restaurant_id}", restaurant_id)
}

/// Return the HTTP path for the menu of a restaurant
pub fn menu(restaurant_id: &str) -> String {
    paths::MENU.replace("{restaurant_id}", restaurant_id)
}

/// Return the HTTP path for an order based on its id
pub fn order_by_id(order_id: &str) -> String {
    paths::ORDER_BY_ID.replace("{order_id}", order_id)
}

/// Return the HTTP path updating the status of an order
pub fn order_status(order_id: &str) -> String {
    paths::ORDER_STATUS.replace("{order_id}", order_id)
}

/// Return the restaurant search path with the filter encoded in the query string
pub fn restaurants(filter: &RestaurantFilter) -> String {
    let params = filter.to_params();
    if params.is_empty() {
        return paths::RESTAURANTS.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{}?{}", paths::RESTAURANTS, query)
}

/// Utility to create easily hashmaps of parameters for testing
#[allow(unused_macros)]
macro_rules! make_params {
    () => {
        std::collections::HashMap::new()
    };
    ($name:ident: $value:expr $(, $name2:ident: $value2:expr)* ) => {
        {
            let mut map = std::collections::HashMap::new();
            map.insert(params::$name.to_string(), $value.to_string());
            $(
                map.insert(params::$name2.to_string(), $value2.to_string());
            )*
            map
        }
    }
}

#[allow(unused_imports)]
pub(crate) use make_params;

/// Create a new router with the paths defined in this module
///
/// Errors from this functions are programming errors, most likely stemming from a
/// misuse of matchit
fn new_router() -> Result<Router<&'static str>> {
    let mut router = Router::new();
    for (path, endpoint) in ALL_ENDPOINTS {
        router.insert(*path, *endpoint)?;
    }
    Ok(router)
}

/// Type of the object containing the HTTP path parameters passed to handlers
pub type HttpParams = HashMap<String, String>;
/// Type of the function that handles HTTP requests
pub type HttpHandler = fn(Request, HttpParams, &mut dyn Database) -> Result<Response>;

/// The router is in charge of taking in raw HTTP requests and to dispatch them to
/// the appropriate handler function.
pub struct HttpRouter {
    routes: Router<&'static str>,
    handlers: HashMap<&'static str, HashMap<&'static str, HttpHandler>>,
}

impl HttpRouter {
    /// Creates a new empty router
    ///
    /// Although the matchit router is not empty, there are no methods associated
    /// to the routes yet, so no request can be processed
    /// Errors in this function are programming errors.
    pub fn new() -> Result<Self> {
        let routes = new_router()?;
        Ok(HttpRouter {
            routes,
            handlers: HashMap::new(),
        })
    }

    /// Add a new route to the router
    pub fn add_route(&mut self, method: &'static str, route: &'static str, handler: HttpHandler) {
        let method_to_handler = self.handlers.entry(route).or_default();
        method_to_handler.insert(method, handler);
    }

    /// Sends a request to the appropriate handler if it exists
    ///
    /// If there is a route matching the request, its handler will be called and the result of the
    /// function will be the result of the handler. If no route is defined for this request,
    /// return Error::NotFound. `OPTIONS` on any known route is answered with an empty response.
    ///
    /// Checking that all parameters are presents and that the body is correct is the
    /// responsibility of the handler
    pub fn route(&self, request: Request, db: &mut dyn Database) -> Result<Response> {
        let route = self
            .routes
            .at(request.route_path())
            .map_err(|_| Error::NotFound(format!("No route for {}", request.route_path())))?;

        if request.method == "OPTIONS" {
            return Ok(Response::no_content());
        }

        let method_to_handler = self.handlers.get(route.value).ok_or_else(|| {
            Error::NotFound(format!(
                "No method associated to this route: {}",
                route.value
            ))
        })?;
        let handler = method_to_handler
            .get(request.method.as_str())
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "No handler for {} {}",
                    request.method.as_str(),
                    route.value
                ))
            })?;

        let params: HttpParams = route
            .params
            .iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        handler(request, params, db)
    }

    /// Route the request and turn the outcome into a response, errors included
    pub fn handle(&self, request: Request, db: &mut dyn Database) -> Response {
        self.route(request, db)
            .unwrap_or_else(Response::from)
            .with_cors()
    }
}

/// Fetch a path parameter that the route guarantees
pub fn param<'a>(params: &'a HttpParams, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| Error::BadRequest(format!("Missing {}", key)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::database::mock::MemoryDb;

    #[test]
    fn test_routes() {
        let router = new_router().unwrap();
        assert_eq!(*router.at("/api/health").unwrap().value, endpoints::HEALTH);
        assert_eq!(
            *router.at("/api/restaurants").unwrap().value,
            endpoints::RESTAURANTS
        );
        assert_eq!(
            *router.at("/api/restaurants/1").unwrap().value,
            endpoints::RESTAURANT_BY_ID
        );
        assert_eq!(
            *router.at("/api/restaurants/1/menu").unwrap().value,
            endpoints::MENU
        );
        assert_eq!(
            *router.at("/api/orders/abc/status").unwrap().value,
            endpoints::ORDER_STATUS
        );
    }

    #[test]
    fn test_route_ids() {
        let router = new_router().unwrap();
        let path = order_status("42");
        let route = router.at(&path).unwrap();
        assert_eq!(route.params.get(params::ORDER_ID), Some("42"));

        let path = menu("7");
        let route = router.at(&path).unwrap();
        assert_eq!(route.params.get(params::RESTAURANT_ID), Some("7"));
    }

    #[test]
    fn test_missing_routes() {
        let router = new_router().unwrap();
        assert!(router.at("/api/missing").is_err());
        assert!(router.at("/api/v1/orders").is_err());
    }

    #[test]
    fn test_make_params() {
        let params = make_params!(ORDER_ID: "1", RESTAURANT_ID: "2");
        assert_eq!(param(&params, params::ORDER_ID).unwrap(), "1");
        assert_eq!(param(&params, params::RESTAURANT_ID).unwrap(), "2");
        assert!(param(&make_params!(), params::ORDER_ID).is_err());
    }

    #[test]
    fn test_restaurants_query_path() {
        assert_eq!(restaurants(&RestaurantFilter::default()), "/api/restaurants");

        let filter = RestaurantFilter {
            cuisine: Some("Italian".to_string()),
            search: Some("wood fired".to_string()),
            ..Default::default()
        };
        let path = restaurants(&filter);
        assert_eq!(path, "/api/restaurants?cuisine=Italian&search=wood+fired");

        let query = Request::get(&path).query();
        assert_eq!(RestaurantFilter::from_params(&query), filter);
    }

    #[test]
    fn test_router() {
        const EXPECTED_GET_ORDERS: &str = "get_orders";
        const EXPECTED_POST_ORDERS: &str = "post_orders";
        const EXPECTED_PUT_STATUS: &str = "put_status";

        let mut db = MemoryDb::new();

        let mut router = HttpRouter::new().unwrap();
        router.add_route("GET", endpoints::ORDERS, |_, _, _| {
            Ok(Response::ok_with_body(EXPECTED_GET_ORDERS.to_string()))
        });
        router.add_route("POST", endpoints::ORDERS, |_, _, _| {
            Ok(Response::ok_with_body(EXPECTED_POST_ORDERS.to_string()))
        });
        router.add_route("PUT", endpoints::ORDER_STATUS, |_, params, _| {
            let id = param(&params, params::ORDER_ID)?;
            Ok(Response::ok_with_body(format!("{}:{}", EXPECTED_PUT_STATUS, id)))
        });

        let response = router.route(Request::get(paths::ORDERS), &mut db).unwrap();
        assert_eq!(response.body, EXPECTED_GET_ORDERS);

        let response = router
            .route(Request::post(paths::ORDERS, String::new()), &mut db)
            .unwrap();
        assert_eq!(response.body, EXPECTED_POST_ORDERS);

        let response = router
            .route(Request::put(&order_status("99"), String::new()), &mut db)
            .unwrap();
        assert_eq!(response.body, "put_status:99");

        assert!(router
            .route(Request::put(paths::ORDERS, String::new()), &mut db)
            .is_err());
        assert!(router.route(Request::get(paths::CHAT), &mut db).is_err());
    }

    #[test]
    fn test_handle_adds_cors_and_answers_preflight() {
        let mut db = MemoryDb::new();
        let router = HttpRouter::new().unwrap();

        let response = router.handle(Request::options(paths::ORDERS), &mut db);
        assert_eq!(response.status, Some(204));
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));

        let response = router.handle(Request::get("/api/nothing"), &mut db);
        assert_eq!(response.status, Some(404));
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    }
}
