use crate::api::{CustomerInfo, LineItem, MenuItem, NewOrder, OrderType};
use std::collections::HashMap;

/// Items picked from one restaurant's menu before the order is submitted.
///
/// Adding an item already in the cart increases its quantity. The quantity
/// used by the next `add` is chosen per item with `set_pending_quantity` and
/// goes back to 1 once the item is added.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    items: Vec<LineItem>,
    pending: HashMap<String, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity the next `add` of this item will use
    pub fn pending_quantity(&self, item_id: &str) -> u32 {
        self.pending.get(item_id).copied().unwrap_or(1)
    }

    /// Change the pending quantity. Anything below 1 is ignored.
    pub fn set_pending_quantity(&mut self, item_id: &str, quantity: u32) {
        if quantity < 1 {
            return;
        }
        self.pending.insert(item_id.to_string(), quantity);
    }

    /// Add the item with its pending quantity
    pub fn add(&mut self, item: &MenuItem) {
        let quantity = self.pending_quantity(&item.id);
        self.add_quantity(item, quantity);
        self.pending.insert(item.id.clone(), 1);
    }

    /// Add `quantity` of the item, merging with an existing line
    pub fn add_quantity(&mut self, item: &MenuItem, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(LineItem::from_menu_item(item, quantity)),
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_items(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |total, line| total.saturating_add(line.quantity))
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    /// Turn the cart into an order submission, leaving it empty
    pub fn checkout(
        &mut self,
        restaurant_id: &str,
        customer_info: CustomerInfo,
        order_type: OrderType,
        payment_method: &str,
    ) -> NewOrder {
        let items = std::mem::take(&mut self.items);
        self.pending.clear();
        NewOrder {
            restaurant_id: restaurant_id.to_string(),
            items,
            customer_info,
            order_type,
            payment_method: payment_method.to_string(),
        }
    }
}

/// Group menu items by category, categories in order of first appearance
pub fn group_by_category(menu: &[MenuItem]) -> Vec<(&str, Vec<&MenuItem>)> {
    let mut groups: Vec<(&str, Vec<&MenuItem>)> = Vec::new();
    for item in menu {
        match groups.iter_mut().find(|(category, _)| *category == item.category) {
            Some((_, items)) => items.push(item),
            None => groups.push((item.category.as_str(), vec![item])),
        }
    }
    groups
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::seed::sample_menus;

    #[test]
    fn test_add_merges_lines() {
        let menus = sample_menus();
        let menu = &menus["1"];
        let mut cart = Cart::new();

        cart.add(&menu[0]);
        cart.set_pending_quantity(&menu[0].id, 3);
        cart.add(&menu[0]);
        cart.add(&menu[2]);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.total_items(), 5);
        assert_eq!(cart.total_price(), 4.0 * 450.0 + 220.0);
        assert_eq!(cart.pending_quantity(&menu[0].id), 1);
    }

    #[test]
    fn test_pending_quantity_below_one_is_ignored() {
        let menus = sample_menus();
        let menu = &menus["2"];
        let mut cart = Cart::new();

        cart.set_pending_quantity(&menu[1].id, 2);
        cart.set_pending_quantity(&menu[1].id, 0);
        assert_eq!(cart.pending_quantity(&menu[1].id), 2);
    }

    #[test]
    fn test_checkout_empties_cart() {
        let menus = sample_menus();
        let menu = &menus["4"];
        let mut cart = Cart::new();
        cart.add_quantity(&menu[1], 2);

        let order = cart.checkout("4", CustomerInfo::default(), OrderType::Pickup, "cash");

        assert!(cart.is_empty());
        assert_eq!(order.restaurant_id, "4");
        assert_eq!(order.items[0].name, "Pulled Pork Sandwich");
        assert_eq!(order.items[0].price, 420.0);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(crate::lifecycle::order_total(&order), 840.0);
    }

    #[test]
    fn test_quantities_saturate() {
        let menus = sample_menus();
        let menu = &menus["1"];
        let mut cart = Cart::new();

        cart.add_quantity(&menu[0], u32::MAX);
        cart.add_quantity(&menu[0], 1);
        cart.add_quantity(&menu[1], 1);

        assert_eq!(cart.items()[0].quantity, u32::MAX);
        assert_eq!(cart.total_items(), u32::MAX);
    }

    #[test]
    fn test_group_by_category() {
        let mut menu = sample_menus()["1"].clone();
        let diavola = MenuItem {
            id: "99".to_string(),
            name: "Diavola".to_string(),
            ..menu[0].clone()
        };
        menu.push(diavola);

        let groups = group_by_category(&menu);
        let categories: Vec<_> = groups.iter().map(|(c, items)| (*c, items.len())).collect();
        assert_eq!(categories, vec![("Pizza", 2), ("Pasta", 1), ("Dessert", 1)]);
    }
}
