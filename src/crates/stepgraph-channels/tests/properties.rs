//! Property tests for channel merge policies.

use std::collections::HashSet;

use proptest::collection::vec;
use proptest::prelude::*;
use stepgraph_channels::{
    BinaryOperatorAggregate, Channel, Inbox, InboxUpdate, LastValue, UniqueArchive,
};

proptest! {
    /// Inbox flattens every batch in order and appends across calls.
    #[test]
    fn inbox_matches_flat_append_model(batches in vec(vec(vec(any::<u32>(), 0..4), 1..5), 1..5)) {
        let mut channel = Inbox::new();
        let mut model = Vec::new();
        for batch in batches {
            for run in &batch {
                model.extend(run.iter().copied());
            }
            let updates: Vec<InboxUpdate<u32>> =
                batch.into_iter().map(InboxUpdate::Items).collect();
            channel.update(updates).unwrap();
        }
        prop_assert_eq!(channel.get().unwrap(), model);
    }

    /// UniqueArchive holds exactly the distinct items ever inserted.
    #[test]
    fn archive_matches_set_model(batches in vec(vec(any::<u16>(), 0..8), 0..6)) {
        let mut channel = UniqueArchive::new();
        let mut model = HashSet::new();
        for batch in batches {
            model.extend(batch.iter().copied());
            channel.update(batch).unwrap();
        }
        prop_assert_eq!(channel.get().unwrap(), model);
    }

    /// Folding with addition equals the running sum of all items.
    #[test]
    fn binop_addition_matches_running_sum(batches in vec(vec(-1000i64..1000, 1..6), 1..6)) {
        let mut channel = BinaryOperatorAggregate::new(|a: i64, b| a + b);
        let mut sum = 0i64;
        for batch in batches {
            sum += batch.iter().sum::<i64>();
            channel.update(batch).unwrap();
        }
        prop_assert_eq!(channel.get().unwrap(), sum);
    }

    /// LastValue always reflects the most recent single-element batch.
    #[test]
    fn last_value_is_last_write(values in vec(any::<i32>(), 1..16)) {
        let mut channel = LastValue::new();
        let last = *values.last().unwrap();
        for value in values {
            channel.update(vec![value]).unwrap();
        }
        prop_assert_eq!(channel.get().unwrap(), last);
    }
}
