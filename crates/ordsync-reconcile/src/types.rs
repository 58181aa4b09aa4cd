/// Status code in either domain (external export or storefront).
pub type StatusCode = i64;

/// Storefront order number as it appears in the export.
pub type OrderNumber = i64;

/// Internal storefront primary key of an order.
pub type OrderId = i64;

/// One parsed export line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    pub order_number: OrderNumber,
    pub external_status: StatusCode,
}

impl Record {
    pub fn new(order_number: OrderNumber, external_status: StatusCode) -> Self {
        Self {
            order_number,
            external_status,
        }
    }
}

/// Parser output: either a usable record or a marker for a rejected line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedLine {
    Record(Record),
    /// Wrong field count, or no usable order number. `raw` is the trimmed line.
    Malformed { raw: String },
}

/// What the order store knows about an order, as far as reconciliation cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoredOrder {
    pub id: OrderId,
    pub status: StatusCode,
}
