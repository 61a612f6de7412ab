//! User-facing notification messages.
//!
//! Failures reach the notifier as rendered text only. The text depends on the
//! operation that failed and, for stock problems, on the kind of failure.

use std::fmt;
use std::str::FromStr;

use crate::error::CartError;

/// Language of rendered messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// Brazilian Portuguese.
    #[default]
    PtBr,
    /// English.
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt-br" | "pt_br" | "pt" => Ok(Self::PtBr),
            "en" | "en-us" | "en_us" => Ok(Self::En),
            other => Err(format!("unsupported locale '{other}' (expected pt-BR or en)")),
        }
    }
}

/// Cart operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `add_product`
    Add,
    /// `remove_product`
    Remove,
    /// `update_product_amount`
    UpdateAmount,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add_product",
            Self::Remove => "remove_product",
            Self::UpdateAmount => "update_product_amount",
        })
    }
}

/// Message kinds shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Message {
    AddFailed,
    OutOfStock,
    RemoveFailed,
    UpdateFailed,
}

impl Message {
    const fn text(self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::AddFailed, Locale::PtBr) => "Erro na adição do produto",
            (Self::AddFailed, Locale::En) => "Error adding product",
            (Self::OutOfStock, Locale::PtBr) => "Quantidade solicitada fora de estoque",
            (Self::OutOfStock, Locale::En) => "Requested quantity out of stock",
            (Self::RemoveFailed, Locale::PtBr) => "Erro na remoção do produto",
            (Self::RemoveFailed, Locale::En) => "Error removing product",
            (Self::UpdateFailed, Locale::PtBr) => "Erro na alteração de quantidade do produto",
            (Self::UpdateFailed, Locale::En) => "Error changing product quantity",
        }
    }
}

/// Render the notification text for a failed operation.
#[must_use]
pub fn render(operation: Operation, error: &CartError, locale: Locale) -> &'static str {
    let message = match operation {
        Operation::Add => match error {
            CartError::StockExceeded { .. }
            | CartError::StockUnavailable {
                available: Some(_), ..
            } => Message::OutOfStock,
            _ => Message::AddFailed,
        },
        Operation::Remove => Message::RemoveFailed,
        Operation::UpdateAmount => match error {
            CartError::StockExceeded { .. } => Message::OutOfStock,
            _ => Message::UpdateFailed,
        },
    };
    message.text(locale)
}

#[cfg(test)]
mod tests {
    use rocketshoes_core::ProductId;

    use super::*;

    const ID: ProductId = ProductId::new(1);

    #[test]
    fn test_locale_parsing() {
        assert_eq!("pt-BR".parse::<Locale>(), Ok(Locale::PtBr));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_add_messages() {
        let exceeded = CartError::StockExceeded {
            product_id: ID,
            requested: 6,
            available: 5,
        };
        let out_of_stock = CartError::StockUnavailable {
            product_id: ID,
            available: Some(0),
        };
        let no_record = CartError::StockUnavailable {
            product_id: ID,
            available: None,
        };

        assert_eq!(
            render(Operation::Add, &exceeded, Locale::PtBr),
            "Quantidade solicitada fora de estoque"
        );
        assert_eq!(
            render(Operation::Add, &out_of_stock, Locale::En),
            "Requested quantity out of stock"
        );
        assert_eq!(
            render(Operation::Add, &no_record, Locale::PtBr),
            "Erro na adição do produto"
        );
        assert_eq!(
            render(Operation::Add, &CartError::ProductNotFound(ID), Locale::En),
            "Error adding product"
        );
    }

    #[test]
    fn test_remove_and_update_messages() {
        assert_eq!(
            render(Operation::Remove, &CartError::ProductNotInCart(ID), Locale::PtBr),
            "Erro na remoção do produto"
        );
        assert_eq!(
            render(
                Operation::UpdateAmount,
                &CartError::InvalidAmount {
                    product_id: ID,
                    amount: 0
                },
                Locale::PtBr
            ),
            "Erro na alteração de quantidade do produto"
        );
        assert_eq!(
            render(
                Operation::UpdateAmount,
                &CartError::StockExceeded {
                    product_id: ID,
                    requested: 11,
                    available: 10
                },
                Locale::En
            ),
            "Requested quantity out of stock"
        );
    }
}
