//! Property-based tests for `Cart` invariants.
//!
//! Carts are generated with unique IDs in arbitrary order, decimal prices of
//! varying scale and catalog fields the cart does not interpret, so the
//! properties cover more than the hand-built carts in the unit tests.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rocketshoes_core::{Cart, CartViolation, Price, Product, ProductId};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

// PROPERTY TEST STRATEGIES

/// Strategy to generate prices with 0 to 4 decimal places
fn price_strategy() -> impl Strategy<Value = Price> {
    (0i64..=100_000_000, 0u32..=4)
        .prop_map(|(mantissa, scale)| Price::new(Decimal::new(mantissa, scale)))
}

/// Strategy to generate catalog fields the cart passes through untouched
fn extra_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(
        "x_[a-z]{1,8}",
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::from),
        ],
        0..3,
    )
    .prop_map(|fields| fields.into_iter().collect())
}

/// Strategy to generate a cart entry with the given ID
fn product_strategy(id: i32) -> impl Strategy<Value = Product> {
    ("\\PC{0,24}", price_strategy(), 1i64..=1_000, extra_strategy()).prop_map(
        move |(title, price, amount, extra)| {
            let mut product = Product::new(
                ProductId::new(id),
                title,
                price,
                format!("https://cdn.example.com/tenis{id}.jpg"),
            )
            .with_amount(amount);
            product.extra = extra;
            product
        },
    )
}

/// Strategy to generate carts with unique IDs in arbitrary insertion order
fn cart_strategy(min_items: usize) -> impl Strategy<Value = Cart> {
    prop::collection::btree_set(1i32..=10_000, min_items..8)
        .prop_flat_map(|ids| {
            ids.into_iter()
                .map(product_strategy)
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
        .prop_map(|items| Cart::try_from(items).unwrap())
}

fn ids(cart: &Cart) -> Vec<ProductId> {
    cart.items().iter().map(|p| p.id).collect()
}

// PROPERTY TESTS
proptest! {
    /// Property: serializing then deserializing reproduces entries, order,
    /// amounts and pass-through fields
    #[test]
    fn prop_serde_round_trip(cart in cart_strategy(0)) {
        let json = serde_json::to_string(&cart).unwrap();
        let decoded: Cart = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(&decoded, &cart);
        prop_assert_eq!(ids(&decoded), ids(&cart));
    }

    /// Property: inserting an absent product appends it with exactly one unit
    #[test]
    fn prop_insert_new_appends_one_unit(
        cart in cart_strategy(0),
        product in product_strategy(20_000),
    ) {
        let mut updated = cart.clone();
        updated.insert_new(product.clone()).unwrap();

        let (last, rest) = updated.items().split_last().unwrap();
        prop_assert_eq!(rest, cart.items());
        prop_assert_eq!(last.id, product.id);
        prop_assert_eq!(last.amount, 1);
        prop_assert_eq!(&last.extra, &product.extra);
    }

    /// Property: a non-positive amount is rejected and the cart is unchanged
    #[test]
    fn prop_set_amount_rejects_non_positive(
        cart in cart_strategy(1),
        index in any::<prop::sample::Index>(),
        amount in i64::MIN..=0,
    ) {
        let target = index.get(cart.items()).id;
        let mut updated = cart.clone();

        let result = updated.set_amount(target, amount);

        prop_assert_eq!(
            result,
            Err(CartViolation::NonPositiveAmount { product_id: target, amount })
        );
        prop_assert_eq!(&updated, &cart);
    }

    /// Property: removing an entry keeps the others in order
    #[test]
    fn prop_remove_keeps_remaining_order(
        cart in cart_strategy(1),
        index in any::<prop::sample::Index>(),
    ) {
        let target = index.get(cart.items()).id;
        let mut updated = cart.clone();

        let removed = updated.remove(target).unwrap();

        let expected: Vec<ProductId> = ids(&cart).into_iter().filter(|id| *id != target).collect();
        prop_assert_eq!(removed.id, target);
        prop_assert_eq!(ids(&updated), expected);
        prop_assert_eq!(updated.remove(target), Err(CartViolation::NotInCart(target)));
    }

    /// Property: totals are the sums of the entries
    #[test]
    fn prop_totals_sum_entries(cart in cart_strategy(0)) {
        let quantity: i64 = cart.items().iter().map(|p| p.amount).sum();
        let total = cart
            .items()
            .iter()
            .fold(Decimal::ZERO, |sum, p| sum + p.price.amount() * Decimal::from(p.amount));

        prop_assert_eq!(cart.total_quantity(), quantity);
        prop_assert_eq!(cart.total().amount(), total);
        prop_assert_eq!(cart.item_count(), cart.items().len());
    }
}
