//! Per-table cart state
//!
//! Each table carries two line lists: `enviados` (already sent to the
//! kitchen) and `nuevos` (staged on the device). Sending moves lines
//! from `nuevos` to `enviados`; closing a table is only possible once
//! `nuevos` is empty.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CartError;

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: i64,
    pub es_especial: bool,
    pub nombre: String,
    pub precio: Decimal,
    pub cantidad: i32,
}

impl CartLine {
    fn key(&self) -> (i64, bool) {
        (self.item_id, self.es_especial)
    }

    fn line_total(&self) -> Decimal {
        self.precio * Decimal::from(self.cantidad)
    }
}

/// Cart of one table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCart {
    /// Server order backing this table, once the first send happened
    pub orden_id: Option<i64>,
    /// Lines already sent to the kitchen
    #[serde(default)]
    pub enviados: Vec<CartLine>,
    /// Lines staged on the device, not sent yet
    #[serde(default)]
    pub nuevos: Vec<CartLine>,
}

impl TableCart {
    /// Stage a line; merges into an existing unsent line of the same
    /// item instead of duplicating it
    pub fn add(&mut self, line: CartLine) {
        match self.nuevos.iter_mut().find(|l| l.key() == line.key()) {
            Some(existing) => existing.cantidad += line.cantidad,
            None => self.nuevos.push(line),
        }
    }

    /// Set the quantity of a line, wherever it lives; 0 removes it.
    /// Returns false when no such line exists.
    pub fn set_quantity(&mut self, item_id: i64, es_especial: bool, cantidad: i32) -> bool {
        let key = (item_id, es_especial);
        for list in [&mut self.nuevos, &mut self.enviados] {
            if let Some(pos) = list.iter().position(|l| l.key() == key) {
                if cantidad <= 0 {
                    list.remove(pos);
                } else {
                    list[pos].cantidad = cantidad;
                }
                return true;
            }
        }
        false
    }

    /// Drop a line, wherever it lives
    pub fn remove(&mut self, item_id: i64, es_especial: bool) -> bool {
        self.set_quantity(item_id, es_especial, 0)
    }

    /// Total over both lists
    pub fn total(&self) -> Decimal {
        self.enviados
            .iter()
            .chain(&self.nuevos)
            .map(CartLine::line_total)
            .sum()
    }

    /// Units staged but not sent yet
    pub fn pending_count(&self) -> i32 {
        self.nuevos.iter().map(|l| l.cantidad).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.enviados.is_empty() && self.nuevos.is_empty()
    }

    /// Move every staged line into `enviados` (after a successful send)
    pub fn mark_sent(&mut self) {
        for line in self.nuevos.drain(..) {
            match self.enviados.iter_mut().find(|l| l.key() == line.key()) {
                Some(existing) => existing.cantidad += line.cantidad,
                None => self.enviados.push(line),
            }
        }
    }
}

/// All table carts of one device, keyed by mesa id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartBook {
    #[serde(default)]
    mesas: BTreeMap<i64, TableCart>,
}

impl CartBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cart of a table, creating it on first use
    pub fn cart_mut(&mut self, mesa_id: i64) -> &mut TableCart {
        self.mesas.entry(mesa_id).or_default()
    }

    pub fn cart(&self, mesa_id: i64) -> Option<&TableCart> {
        self.mesas.get(&mesa_id)
    }

    /// Tables that currently have any cart state
    pub fn mesas(&self) -> impl Iterator<Item = (i64, &TableCart)> {
        self.mesas.iter().map(|(id, cart)| (*id, cart))
    }

    /// Drop a table's cart after closing it.
    /// Fails while unsent lines remain — they must be sent or removed first.
    pub fn close_table(&mut self, mesa_id: i64) -> Result<(), CartError> {
        if let Some(cart) = self.mesas.get(&mesa_id) {
            let count = cart.pending_count();
            if count > 0 {
                return Err(CartError::PendingItems { count });
            }
        }
        self.mesas.remove(&mesa_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(item_id: i64, cantidad: i32, precio: &str) -> CartLine {
        CartLine {
            item_id,
            es_especial: false,
            nombre: format!("Plato {item_id}"),
            precio: precio.parse().unwrap(),
            cantidad,
        }
    }

    #[test]
    fn test_add_merges_same_item() {
        let mut cart = TableCart::default();
        cart.add(line(1, 2, "10.00"));
        cart.add(line(1, 1, "10.00"));
        assert_eq!(cart.nuevos.len(), 1);
        assert_eq!(cart.nuevos[0].cantidad, 3);
    }

    #[test]
    fn test_special_and_regular_do_not_merge() {
        let mut cart = TableCart::default();
        cart.add(line(1, 1, "10.00"));
        cart.add(CartLine {
            es_especial: true,
            ..line(1, 1, "15.00")
        });
        assert_eq!(cart.nuevos.len(), 2);
    }

    #[test]
    fn test_total_spans_both_lists() {
        let mut cart = TableCart::default();
        cart.add(line(1, 2, "10.00"));
        cart.mark_sent();
        cart.add(line(2, 1, "5.50"));
        assert_eq!(cart.total(), "25.50".parse().unwrap());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = TableCart::default();
        cart.add(line(1, 2, "10.00"));
        assert!(cart.set_quantity(1, false, 0));
        assert!(cart.is_empty());
        assert!(!cart.set_quantity(9, false, 1));
    }

    #[test]
    fn test_mark_sent_moves_lines_and_leaves_siblings() {
        let mut cart = TableCart::default();
        cart.add(line(1, 2, "10.00"));
        cart.mark_sent();
        cart.add(line(2, 1, "5.50"));

        assert_eq!(cart.enviados.len(), 1);
        assert_eq!(cart.nuevos.len(), 1);
        assert_eq!(cart.pending_count(), 1);

        cart.mark_sent();
        assert_eq!(cart.enviados.len(), 2);
        assert!(cart.nuevos.is_empty());
        assert_eq!(cart.pending_count(), 0);
        // Previously sent line untouched
        assert_eq!(cart.enviados[0].cantidad, 2);
    }

    #[test]
    fn test_mark_sent_merges_into_enviados() {
        let mut cart = TableCart::default();
        cart.add(line(1, 2, "10.00"));
        cart.mark_sent();
        cart.add(line(1, 1, "10.00"));
        cart.mark_sent();
        assert_eq!(cart.enviados.len(), 1);
        assert_eq!(cart.enviados[0].cantidad, 3);
    }

    #[test]
    fn test_close_table_blocked_by_pending_lines() {
        let mut book = CartBook::new();
        book.cart_mut(4).add(line(1, 2, "10.00"));

        assert_eq!(
            book.close_table(4),
            Err(CartError::PendingItems { count: 2 })
        );

        book.cart_mut(4).mark_sent();
        assert_eq!(book.close_table(4), Ok(()));
        assert!(book.cart(4).is_none());
    }

    #[test]
    fn test_close_unknown_table_is_noop() {
        let mut book = CartBook::new();
        assert_eq!(book.close_table(99), Ok(()));
    }

    #[test]
    fn test_carts_are_independent_per_table() {
        let mut book = CartBook::new();
        book.cart_mut(1).add(line(1, 1, "10.00"));
        book.cart_mut(2).add(line(2, 3, "4.00"));

        assert_eq!(book.cart(1).unwrap().total(), "10.00".parse().unwrap());
        assert_eq!(book.cart(2).unwrap().total(), "12.00".parse().unwrap());
        assert_eq!(book.mesas().count(), 2);
    }
}
