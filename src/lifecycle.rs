use crate::api::{
    NewOrder, NewReservation, Order, OrderStatus, Reservation, ReservationStatus,
};
use crate::database::{save, Collection, Database};
use crate::errors::{Error, Result};
use crate::query::{list_orders, list_reservations};
use chrono::{Duration, Utc};
use uuid::Uuid;

/// Time between the creation of an order and its announced delivery
pub const DELIVERY_ESTIMATE_MINUTES: i64 = 30;

/// Sum of price * quantity over the items. Prices are taken as sent by the
/// client, not looked up on the menu.
pub fn order_total(order: &NewOrder) -> f64 {
    order.items.iter().map(|item| item.subtotal()).sum()
}

/// Record a new order and return it.
///
/// The restaurant id is stored as given, even if no such restaurant exists.
pub fn create_order(db: &mut dyn Database, new_order: NewOrder) -> Result<Order> {
    let created_at = Utc::now();
    let order = Order {
        id: Uuid::new_v4().to_string(),
        total: order_total(&new_order),
        restaurant_id: new_order.restaurant_id,
        items: new_order.items,
        customer_info: new_order.customer_info,
        order_type: new_order.order_type,
        payment_method: new_order.payment_method,
        status: OrderStatus::Confirmed,
        created_at,
        estimated_delivery: created_at + Duration::minutes(DELIVERY_ESTIMATE_MINUTES),
    };

    let mut orders = list_orders(db);
    orders.push(order.clone());
    save(db, Collection::Orders, &orders)?;

    tracing::info!(
        order_id = %order.id,
        restaurant_id = %order.restaurant_id,
        total = order.total,
        "order created"
    );
    Ok(order)
}

/// Overwrite the status of an order. Any status may replace any other.
pub fn update_order_status(
    db: &mut dyn Database,
    id: &str,
    status: OrderStatus,
) -> Result<Order> {
    let mut orders = list_orders(db);
    let order = orders
        .iter_mut()
        .find(|order| order.id == id)
        .ok_or_else(|| Error::NotFound(format!("Order {} not found", id)))?;

    let previous = order.status;
    order.status = status;
    let updated = order.clone();
    save(db, Collection::Orders, &orders)?;

    tracing::info!(order_id = %id, ?previous, ?status, "order status updated");
    Ok(updated)
}

/// Record a new reservation and return it. Seats are not checked.
pub fn create_reservation(
    db: &mut dyn Database,
    new_reservation: NewReservation,
) -> Result<Reservation> {
    let reservation = Reservation {
        id: Uuid::new_v4().to_string(),
        restaurant_id: new_reservation.restaurant_id,
        date: new_reservation.date,
        time: new_reservation.time,
        guests: new_reservation.guests,
        name: new_reservation.name,
        phone: new_reservation.phone,
        special_requests: new_reservation.special_requests,
        status: ReservationStatus::Confirmed,
        created_at: Utc::now(),
    };

    let mut reservations = list_reservations(db);
    reservations.push(reservation.clone());
    save(db, Collection::Reservations, &reservations)?;

    tracing::info!(
        reservation_id = %reservation.id,
        restaurant_id = %reservation.restaurant_id,
        guests = reservation.guests,
        "reservation created"
    );
    Ok(reservation)
}
