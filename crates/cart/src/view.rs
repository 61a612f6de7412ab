//! Display-ready cart data.

use rocketshoes_core::{Cart, Product};

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub amount: i64,
    pub price: String,
    pub subtotal: String,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: usize,
}

impl From<&Product> for CartItemView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            image: product.image.clone(),
            amount: product.amount,
            price: product.price.display(),
            subtotal: product.subtotal().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total().display(),
            item_count: cart.item_count(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::{Price, ProductId};

    use super::*;

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&Cart::new());
        assert!(view.items.is_empty());
        assert_eq!(view.total, "R$ 0,00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_cart_view_formats_lines() {
        let mut cart = Cart::new();
        cart.insert_new(Product::new(
            ProductId::new(1),
            "Tênis de Caminhada",
            Price::from_cents(17990),
            "a.jpg",
        ))
        .unwrap();
        cart.set_amount(ProductId::new(1), 2).unwrap();

        let view = CartView::from(&cart);
        let line = view.items.first().unwrap();

        assert_eq!(line.price, "R$ 179,90");
        assert_eq!(line.subtotal, "R$ 359,80");
        assert_eq!(view.total, "R$ 359,80");
        assert_eq!(view.item_count, 1);
    }

    #[test]
    fn test_cart_view_at_amount_limit() {
        let cart: Cart = serde_json::from_str(
            r#"[{"id":1,"title":"Tênis","price":"1.00","amount":9223372036854775807}]"#,
        )
        .unwrap();

        let view = CartView::from(&cart);

        assert_eq!(view.items.first().unwrap().subtotal, "R$ 9.223.372.036.854.775.807,00");
        assert_eq!(view.total, "R$ 9.223.372.036.854.775.807,00");
    }
}
