//! Order store boundary.
//!
//! The storefront owns its orders. The engine only ever asks two things of
//! it: "what is order N right now" and "set order ID to status S". Real
//! deployments implement [`OrderStore`] against the storefront database
//! (see `ordsync-db`); tests use [`InMemoryOrderStore`].

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{OrderId, OrderNumber, StatusCode, StoredOrder};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// A status write that the store could not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order store write failed: {}", self.message)
    }
}

impl std::error::Error for StoreError {}

// ---------------------------------------------------------------------------
// OrderStore
// ---------------------------------------------------------------------------

/// Storefront order access required by the reconciliation engine.
///
/// # Contract
/// - `find_by_order_number` never errors: a failed read is reported as
///   `None` and counted as "not found" by the engine.
/// - `set_status` is a silent write. It must not notify the customer or
///   regenerate documents. Implementations that allow concurrent callers must
///   serialize writes per order id.
pub trait OrderStore {
    fn find_by_order_number(&self, number: OrderNumber) -> Option<StoredOrder>;
    fn set_status(&mut self, id: OrderId, status: StatusCode) -> Result<(), StoreError>;
}

impl<S: OrderStore + ?Sized> OrderStore for &mut S {
    fn find_by_order_number(&self, number: OrderNumber) -> Option<StoredOrder> {
        (**self).find_by_order_number(number)
    }

    fn set_status(&mut self, id: OrderId, status: StatusCode) -> Result<(), StoreError> {
        (**self).set_status(id, status)
    }
}

// ---------------------------------------------------------------------------
// InMemoryOrderStore
// ---------------------------------------------------------------------------

/// Deterministic in-process store keyed by order number.
///
/// Keeps every write it applies (in order) so callers can assert on them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: BTreeMap<OrderNumber, StoredOrder>,
    writes: Vec<(OrderId, StatusCode)>,
    fail_writes_for: Option<OrderId>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an order. Internal ids are assigned by the caller.
    pub fn insert(&mut self, number: OrderNumber, id: OrderId, status: StatusCode) {
        self.orders.insert(number, StoredOrder { id, status });
    }

    /// Builder form of [`InMemoryOrderStore::insert`].
    pub fn with_order(mut self, number: OrderNumber, id: OrderId, status: StatusCode) -> Self {
        self.insert(number, id, status);
        self
    }

    /// Make every write to `id` fail.
    pub fn fail_writes_for(&mut self, id: OrderId) {
        self.fail_writes_for = Some(id);
    }

    pub fn status_of(&self, number: OrderNumber) -> Option<StatusCode> {
        self.orders.get(&number).map(|o| o.status)
    }

    /// Every applied `(id, status)` write, oldest first.
    pub fn writes(&self) -> &[(OrderId, StatusCode)] {
        &self.writes
    }
}

impl OrderStore for InMemoryOrderStore {
    fn find_by_order_number(&self, number: OrderNumber) -> Option<StoredOrder> {
        self.orders.get(&number).copied()
    }

    fn set_status(&mut self, id: OrderId, status: StatusCode) -> Result<(), StoreError> {
        if self.fail_writes_for == Some(id) {
            return Err(StoreError::new(format!("write rejected for order id {id}")));
        }
        let order = self
            .orders
            .values_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::new(format!("unknown order id {id}")))?;
        order.status = status;
        self.writes.push((id, status));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_and_write() {
        let mut s = InMemoryOrderStore::new().with_order(1001, 7, 0);
        assert_eq!(
            s.find_by_order_number(1001),
            Some(StoredOrder { id: 7, status: 0 })
        );
        assert_eq!(s.find_by_order_number(1002), None);

        s.set_status(7, 5).unwrap();
        assert_eq!(s.status_of(1001), Some(5));
        assert_eq!(s.writes(), &[(7, 5)]);
    }

    #[test]
    fn write_to_unknown_id_fails() {
        let mut s = InMemoryOrderStore::new();
        let err = s.set_status(99, 1).unwrap_err();
        assert!(err.to_string().contains("unknown order id 99"));
    }

    #[test]
    fn injected_write_failure() {
        let mut s = InMemoryOrderStore::new().with_order(1001, 7, 0);
        s.fail_writes_for(7);
        assert!(s.set_status(7, 1).is_err());
        assert_eq!(s.status_of(1001), Some(0));
        assert!(s.writes().is_empty());
    }
}
