//! Property-based tests for quarry using proptest.

use proptest::prelude::*;
use quarry::{PageRequest, Query, Record, MAX_PAGE_SIZE};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Record)]
struct TestItem {
    #[record(Number)]
    value: i64,
    #[record(String)]
    name: String,
    #[record(Bool)]
    active: bool,
}

fn name(item: &TestItem) -> Option<&str> {
    Some(&item.name)
}

// Strategy to generate test items
fn test_item_strategy() -> impl Strategy<Value = TestItem> {
    (any::<i64>(), "[a-z]{1,10}", any::<bool>()).prop_map(|(value, name, active)| TestItem {
        value,
        name,
        active,
    })
}

fn items_strategy() -> impl Strategy<Value = Vec<TestItem>> {
    prop::collection::vec(test_item_strategy(), 0..120)
}

/// Items whose `value` fields are pairwise distinct.
fn unique_items_strategy() -> impl Strategy<Value = Vec<TestItem>> {
    prop::collection::hash_set(any::<i64>(), 0..60).prop_map(|values| {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| TestItem {
                value,
                name: format!("item{i}"),
                active: i % 2 == 0,
            })
            .collect()
    })
}

#[derive(Debug, Clone, Record)]
struct Reading {
    #[record(Number)]
    level: Option<f64>,
}

fn reading_strategy() -> impl Strategy<Value = Reading> {
    prop_oneof![
        1 => Just(None::<f64>),
        1 => Just(Some(f64::NAN)),
        1 => any::<i8>().prop_map(|n| Some(f64::from(n))),
        3 => (-1.0e6f64..1.0e6).prop_map(|n| Some(n + 0.0)),
    ]
    .prop_map(|level| Reading { level })
}

/// Sort position class and value: numbers, then NaN, then absent.
fn level_key(reading: &Reading) -> (u8, f64) {
    match reading.level {
        Some(level) if level.is_nan() => (1, 0.0),
        Some(level) => (0, level),
        None => (2, 0.0),
    }
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Requests are always clamped into the accepted range.
    #[test]
    fn page_request_is_clamped(page_number in any::<i64>(), page_size in any::<i64>()) {
        let request = PageRequest::new(page_number, page_size);
        prop_assert!(request.page_number() >= 1);
        prop_assert!((1..=MAX_PAGE_SIZE).contains(&request.page_size()));
    }

    /// A page holds exactly the part of the match set its window covers.
    #[test]
    fn page_length_follows_window(
        items in items_strategy(),
        page_number in -2i64..20,
        page_size in -5i64..150,
    ) {
        let query = Query::<TestItem>::new().where_if(true, |item: &TestItem| item.active);
        let page = query.paginate(&items, page_number, page_size).unwrap();

        let total = items.iter().filter(|item| item.active).count();
        let skip = (page.page_number - 1) * page.page_size;
        let expected = total.saturating_sub(skip).min(page.page_size);

        prop_assert_eq!(page.total_count, total);
        prop_assert_eq!(page.items.len(), expected);
    }

    /// Page counts and navigation flags agree with the totals.
    #[test]
    fn page_metadata_is_consistent(
        items in items_strategy(),
        page_number in 1i64..15,
        page_size in 1i64..30,
    ) {
        let page = Query::<TestItem>::new().paginate(&items, page_number, page_size).unwrap();

        prop_assert_eq!(page.total_pages, items.len().div_ceil(page.page_size));
        prop_assert_eq!(page.has_previous_page, page.page_number > 1);
        prop_assert_eq!(page.has_next_page, page.page_number < page.total_pages);
    }

    /// Concatenating every page reproduces the full ordered match set.
    #[test]
    fn pages_partition_the_results(items in items_strategy(), page_size in 1i64..25) {
        let query = Query::<TestItem>::new().sort_by(Some("value"), false);
        let expected: Vec<TestItem> = query.select(&items).into_iter().cloned().collect();

        let first = query.paginate(&items, 1, page_size).unwrap();
        let mut collected = first.items;
        for page_number in 2..=first.total_pages {
            let page = query.paginate(&items, page_number as i64, page_size).unwrap();
            collected.extend(page.items);
        }

        prop_assert_eq!(collected, expected);
    }

    /// Adding a filter never grows the match count.
    #[test]
    fn filters_only_narrow(items in items_strategy(), threshold in any::<i64>()) {
        let base = Query::<TestItem>::new().search(Some("a"), &[name]);
        let narrowed = base.clone().where_if(true, move |item: &TestItem| item.value > threshold);

        prop_assert!(narrowed.count_in(&items) <= base.count_in(&items));
    }

    /// A disabled conditional filter changes nothing.
    #[test]
    fn disabled_filter_is_noop(items in items_strategy(), page_size in 1i64..40) {
        let base = Query::<TestItem>::new().sort_by(Some("name"), true);
        let guarded = base.clone().where_if(false, |_: &TestItem| false);

        prop_assert_eq!(
            base.paginate(&items, 1, page_size).unwrap(),
            guarded.paginate(&items, 1, page_size).unwrap()
        );
    }

    /// Unknown sort keys keep the source order.
    #[test]
    fn unknown_sort_key_keeps_order(items in items_strategy(), key in "[A-Z]{1,8}") {
        let sorted = Query::<TestItem>::new().sort_by(Some(&key), false).select(&items);
        let plain = Query::<TestItem>::new().select(&items);
        prop_assert_eq!(sorted, plain);
    }

    /// With distinct keys, descending is the exact reverse of ascending.
    #[test]
    fn descending_reverses_ascending(items in unique_items_strategy()) {
        let asc = Query::<TestItem>::new().sort_by(Some("value"), false).select(&items);
        let mut desc = Query::<TestItem>::new().sort_by(Some("value"), true).select(&items);
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }

    /// Sorting is stable: ties keep their source order.
    #[test]
    fn sort_is_stable(items in items_strategy()) {
        let sorted = Query::<TestItem>::new().sort_by(Some("active"), false).select(&items);
        for pair in sorted.windows(2) {
            if pair[0].active == pair[1].active {
                let first = items.iter().position(|item| std::ptr::eq(item, pair[0]));
                let second = items.iter().position(|item| std::ptr::eq(item, pair[1]));
                prop_assert!(first < second);
            }
        }
    }

    /// Search terms are matched literally, never as patterns.
    #[test]
    fn search_is_literal(items in items_strategy(), term in "[a-z.*+?()\\[\\]]{1,4}") {
        let expected = items
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&term.to_lowercase()))
            .count();
        let counted = Query::<TestItem>::new().search(Some(&term), &[name]).count_in(&items);
        prop_assert_eq!(counted, expected);
    }

    /// Float keys with NaN and absent values still sort into one order:
    /// numbers ascending, then NaN, then absent values.
    #[test]
    fn float_keys_sort_totally(readings in prop::collection::vec(reading_strategy(), 0..150)) {
        let keys: Vec<(u8, f64)> = Query::<Reading>::new()
            .sort_by(Some("level"), false)
            .select(&readings)
            .into_iter()
            .map(level_key)
            .collect();

        for pair in keys.windows(2) {
            prop_assert!(pair[0].0 <= pair[1].0);
            if pair[0].0 == 0 && pair[1].0 == 0 {
                prop_assert!(pair[0].1 <= pair[1].1);
            }
        }
    }

    /// With NaN and absent values present, descending keys are the exact
    /// reverse of ascending keys.
    #[test]
    fn float_keys_reverse(readings in prop::collection::vec(reading_strategy(), 0..150)) {
        let sorted_keys = |descending: bool| -> Vec<(u8, f64)> {
            Query::<Reading>::new()
                .sort_by(Some("level"), descending)
                .select(&readings)
                .into_iter()
                .map(level_key)
                .collect()
        };

        let asc = sorted_keys(false);
        let mut desc = sorted_keys(true);
        desc.reverse();
        prop_assert_eq!(asc, desc);
    }
}
