//! Proc macros for Quarry.
//!
//! - [`Record`] - Generate the field catalog and sort catalog for a struct

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `quarry::Record` and `quarry::Sortable` for a struct.
///
/// Only annotated fields are exposed. Each exposed field becomes readable by
/// name through `Record::field_value` and usable as a sort key.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Text field (`String`, `&str`, anything `AsRef<str>`) |
/// | `Number` | Numeric field (any primitive integer or float) |
/// | `Timestamp` | Point in time, requires `quarry::RecordTimestamp` |
/// | `Bool` | Boolean field |
/// | `skip` | Leave the field out |
/// | `rename = "..."` | Expose the field under another name |
///
/// Any of the kinds may wrap the field in `Option<...>`; `None` reads as
/// `Value::None`, which search skips and sorting places last.
///
/// # Generated Code
///
/// 1. Field name constants (`Ride::FARE`, `Ride::PICKUP_CITY`)
/// 2. `Record::FIELDS` and `Record::field_value`
/// 3. `Sortable::sort_catalog`, built on first use and shared afterwards
///
/// # Example
///
/// ```ignore
/// use quarry::{Query, Record};
///
/// #[derive(Clone, Record)]
/// struct Ride {
///     #[record(Number)]
///     fare: u32,
///
///     #[record(String, rename = "pickupCity")]
///     pickup_city: Option<String>,
///
///     #[record(Timestamp)]
///     requested_at: i64,
///
///     #[record(skip)]
///     internal_id: u64,
/// }
///
/// let page = Query::<Ride>::new()
///     .sort_by(Some(Ride::FARE), true)
///     .paginate(&rides, 1, 20)?;
/// ```
///
/// Generic structs are rejected; implement the traits by hand for those.
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
