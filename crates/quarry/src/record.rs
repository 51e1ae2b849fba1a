//! Field catalogs for record types.
//!
//! [`Record`] exposes a record's fields by name and [`Sortable`] hands out the
//! per-type [`SortCatalog`]. Both are normally generated by
//! `#[derive(Record)]`, but can be written by hand.

use crate::sort::SortCatalog;
use crate::value::{Timestamp, Value};

/// A type whose fields can be read by name.
///
/// # Manual Implementation
///
/// ```
/// use quarry::{Number, Record, Value};
///
/// struct Ticket {
///     subject: String,
///     priority: u8,
/// }
///
/// impl Record for Ticket {
///     const FIELDS: &'static [&'static str] = &["subject", "priority"];
///
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "subject" => Value::String(&self.subject),
///             "priority" => Value::Number(Number::from(self.priority)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Names accepted by [`Record::field_value`], in declaration order.
    const FIELDS: &'static [&'static str];

    /// Returns the named field, or [`Value::None`] for unknown names and
    /// absent values.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns `true` if `field` is one of [`Record::FIELDS`].
    ///
    /// Matching is exact and case-sensitive.
    fn has_field(field: &str) -> bool
    where
        Self: Sized,
    {
        Self::FIELDS.contains(&field)
    }
}

/// A type with a sort catalog built once for the whole program.
///
/// The derive macro implements this with a lazily initialised static built
/// from [`SortCatalog::from_record`]. Hand-written implementations usually do
/// the same:
///
/// ```
/// use once_cell::sync::Lazy;
/// use quarry::{SortCatalog, Sortable};
///
/// struct Order {
///     total_cents: u64,
///     customer: String,
/// }
///
/// impl Sortable for Order {
///     fn sort_catalog() -> &'static SortCatalog<Self> {
///         static CATALOG: Lazy<SortCatalog<Order>> = Lazy::new(|| {
///             SortCatalog::new()
///                 .key("total", |o: &Order| o.total_cents)
///                 .key_by("customer", |a: &Order, b: &Order| a.customer.cmp(&b.customer))
///         });
///         &CATALOG
///     }
/// }
/// ```
pub trait Sortable: Sized + 'static {
    fn sort_catalog() -> &'static SortCatalog<Self>;
}

/// Conversion used by `#[record(Timestamp)]` fields.
pub trait RecordTimestamp {
    fn record_timestamp(&self) -> Timestamp;
}

impl RecordTimestamp for i64 {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl RecordTimestamp for u64 {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(i64::try_from(*self).unwrap_or(i64::MAX))
    }
}

impl RecordTimestamp for Timestamp {
    fn record_timestamp(&self) -> Timestamp {
        *self
    }
}

impl RecordTimestamp for std::time::SystemTime {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    struct Driver {
        name: String,
        trips: u32,
    }

    impl Record for Driver {
        const FIELDS: &'static [&'static str] = &["name", "trips"];

        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(&self.name),
                "trips" => Value::Number(Number::from(self.trips)),
                _ => Value::None,
            }
        }
    }

    #[test]
    fn manual_impl_reads_fields() {
        let driver = Driver {
            name: "Ines".to_string(),
            trips: 12,
        };

        assert_eq!(driver.field_value("name"), Value::String("Ines"));
        assert_eq!(driver.field_value("trips"), Value::Number(Number::U64(12)));
        assert_eq!(driver.field_value("Name"), Value::None);
    }

    #[test]
    fn has_field_is_case_sensitive() {
        assert!(Driver::has_field("trips"));
        assert!(!Driver::has_field("Trips"));
        assert!(!Driver::has_field(""));
    }

    #[test]
    fn unsigned_timestamps_saturate() {
        assert_eq!(u64::MAX.record_timestamp(), Timestamp(i64::MAX));
        assert_eq!(42i64.record_timestamp(), Timestamp(42));
    }
}
