// Category filter.
//
// The visible set is always derived from scratch from the full dataset and
// the active categories. No selection (or an empty one) shows nothing.

use std::collections::BTreeSet;

use super::{Record, Region};

/// Ordered, borrowed subset of the dataset eligible for layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSet<'a> {
    records: Vec<&'a Record>,
}

impl<'a> VisibleSet<'a> {
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Keep the records whose region is active, preserving their relative order.
pub fn filter<'a, I>(records: I, active: Option<&BTreeSet<Region>>) -> VisibleSet<'a>
where
    I: IntoIterator<Item = &'a Record>,
{
    let records = match active {
        Some(active) if !active.is_empty() => records
            .into_iter()
            .filter(|r| active.contains(&r.region))
            .collect(),
        _ => Vec::new(),
    };
    VisibleSet { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Measure;
    use proptest::prelude::*;

    fn dataset() -> Vec<Record> {
        Region::ALL
            .iter()
            .cycle()
            .take(18)
            .enumerate()
            .map(|(i, &region)| {
                Record::new(format!("C{i}"), region).with_measure(Measure::Total, i as f64)
            })
            .collect()
    }

    #[test]
    fn test_single_category_selects_exact_subset() {
        let data = dataset();
        let active: BTreeSet<Region> = [Region::Drought].into_iter().collect();
        let visible = filter(&data, Some(&active));

        let expected: Vec<&Record> = data.iter().filter(|r| r.region == Region::Drought).collect();
        assert_eq!(visible.records(), expected.as_slice());
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn test_empty_selection_shows_nothing() {
        let data = dataset();
        assert!(filter(&data, Some(&BTreeSet::new())).is_empty());
        assert!(filter(&data, None).is_empty());
    }

    #[test]
    fn test_preserves_dataset_order_not_selection_order() {
        let data = dataset();
        let active: BTreeSet<Region> = [Region::Wildfire, Region::Heatwave].into_iter().collect();
        let countries: Vec<&str> = filter(&data, Some(&active)).iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["C0", "C5", "C6", "C11", "C12", "C17"]);
    }

    fn selection() -> impl Strategy<Value = BTreeSet<Region>> {
        proptest::sample::subsequence(Region::ALL.to_vec(), 0..=6)
            .prop_map(|v| v.into_iter().collect())
    }

    proptest! {
        #[test]
        fn filter_is_idempotent(active in selection()) {
            let data = dataset();
            let once = filter(&data, Some(&active));
            let twice = filter(once.iter(), Some(&active));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn filter_only_keeps_active_regions(active in selection()) {
            let data = dataset();
            let visible = filter(&data, Some(&active));
            prop_assert!(visible.iter().all(|r| active.contains(&r.region)));
            prop_assert_eq!(visible.len(), active.len() * 3);
        }
    }
}
