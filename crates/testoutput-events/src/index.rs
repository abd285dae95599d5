// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Grouped views over decoded test events
//!
//! Every projection here borrows from an [`EventLog`](crate::EventLog) and
//! leaves it untouched, so views compose freely:
//!
//! ```no_run
//! use testoutput_events::{Outcome, decode_events};
//!
//! let log = decode_events(std::io::stdin().lock(), None).unwrap();
//! let failing = log
//!     .events()
//!     .with_test()
//!     .with_package()
//!     .by_key()
//!     .filter_by_result(Outcome::Fail);
//!
//! for (key, events) in &failing {
//!     println!("{key}:\n{}", events.output());
//! }
//! ```

use std::borrow::Borrow;
use std::collections::BTreeMap;

use crate::event::{Action, COMMAND_LINE_PACKAGE, Outcome, TestEvent, TestKey};

// ============================================================================
// Event Collections
// ============================================================================

/// An ordered selection of events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Events<'a> {
    events: Vec<&'a TestEvent>,
}

impl<'a> Events<'a> {
    /// Number of events in the selection
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the selection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate the events in order
    pub fn iter(&self) -> impl Iterator<Item = &'a TestEvent> + '_ {
        self.events.iter().copied()
    }

    /// Keep only events that belong to a test
    #[must_use]
    pub fn with_test(&self) -> Self {
        self.filter(|e| !e.test.is_empty())
    }

    /// Keep only events that belong to a real package
    ///
    /// Events without a package, or from `go test` runs on loose files
    /// (`command-line-arguments`), have no source directory to look in.
    #[must_use]
    pub fn with_package(&self) -> Self {
        self.filter(|e| !e.package.is_empty() && e.package != COMMAND_LINE_PACKAGE)
    }

    /// Keep only events matching `predicate`
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&TestEvent) -> bool) -> Self {
        self.iter().filter(|e| predicate(e)).collect()
    }

    /// The same events ordered by timestamp
    ///
    /// The sort is stable, and events without a timestamp come first.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut events = self.events.clone();
        events.sort_by_key(|e| e.time);
        Self { events }
    }

    /// Group events by action
    #[must_use]
    pub fn by_action(&self) -> EventGroups<'a, Action> {
        EventGroups::group(self, |e| e.action.clone())
    }

    /// Group events by test identity
    #[must_use]
    pub fn by_key(&self) -> EventGroups<'a, TestKey> {
        EventGroups::group(self, TestEvent::key)
    }

    /// Group events by package import path
    #[must_use]
    pub fn by_package(&self) -> EventGroups<'a, String> {
        EventGroups::group(self, |e| e.package.clone())
    }

    /// Captured output, reassembled in timestamp order
    #[must_use]
    pub fn output(&self) -> String {
        self.filter(|e| e.action == Action::Output)
            .sorted()
            .iter()
            .map(|e| e.output.as_str())
            .collect()
    }

    /// The event that concluded the test, if any
    ///
    /// This is the first `pass` or `fail` event in arrival order.
    #[must_use]
    pub fn result(&self) -> Option<&'a TestEvent> {
        self.iter().find(|e| e.action.is_terminal())
    }

    /// The resolved outcome, if any terminal event was seen
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.result().and_then(|e| e.action.outcome())
    }
}

impl<'a> FromIterator<&'a TestEvent> for Events<'a> {
    fn from_iter<I: IntoIterator<Item = &'a TestEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for Events<'a> {
    type Item = &'a TestEvent;
    type IntoIter = std::vec::IntoIter<&'a TestEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

// ============================================================================
// Keyed Groupings
// ============================================================================

/// Events grouped under a key, iterated in ascending key order
#[derive(Debug, Clone, PartialEq)]
pub struct EventGroups<'a, K> {
    groups: BTreeMap<K, Events<'a>>,
}

impl<'a, K: Ord> EventGroups<'a, K> {
    fn group(events: &Events<'a>, key: impl Fn(&TestEvent) -> K) -> Self {
        let mut groups: BTreeMap<K, Events<'a>> = BTreeMap::new();
        for event in events.iter() {
            groups.entry(key(event)).or_default().events.push(event);
        }
        Self { groups }
    }

    /// Events for one key
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&Events<'a>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.groups.get(key)
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Keys in ascending order
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<&K> {
        self.groups.keys().collect()
    }

    /// Iterate `(key, events)` in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Events<'a>)> {
        self.groups.iter()
    }

    /// Keep only the groups whose resolved outcome is `desired`
    ///
    /// Groups without a terminal event are dropped.
    #[must_use]
    pub fn filter_by_result(&self, desired: Outcome) -> Self
    where
        K: Clone,
    {
        let groups = self
            .groups
            .iter()
            .filter(|(_, events)| events.outcome() == Some(desired))
            .map(|(key, events)| (key.clone(), events.clone()))
            .collect();
        Self { groups }
    }
}

impl<K> Default for EventGroups<'_, K> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<'g, 'a, K> IntoIterator for &'g EventGroups<'a, K> {
    type Item = (&'g K, &'g Events<'a>);
    type IntoIter = std::collections::btree_map::Iter<'g, K, Events<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl<'a, K> IntoIterator for EventGroups<'a, K> {
    type Item = (K, Events<'a>);
    type IntoIter = std::collections::btree_map::IntoIter<K, Events<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use similar_asserts::assert_eq;

    fn at(secs: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, secs).unwrap())
    }

    fn event(
        time: Option<DateTime<Utc>>,
        action: &str,
        package: &str,
        test: &str,
        output: &str,
    ) -> TestEvent {
        TestEvent {
            time,
            action: Action::from(action),
            package: package.to_string(),
            test: test.to_string(),
            elapsed: None,
            output: output.to_string(),
        }
    }

    fn sample() -> Vec<TestEvent> {
        vec![
            event(at(0), "start", "p", "", ""),
            event(at(1), "run", "p", "TestA", ""),
            event(at(3), "output", "p", "TestA", "second\n"),
            event(at(2), "output", "p", "TestA", "first\n"),
            event(at(4), "fail", "p", "TestA", ""),
            event(at(5), "run", "p", "TestB", ""),
            event(at(6), "pass", "p", "TestB", ""),
            event(at(7), "run", "command-line-arguments", "TestC", ""),
            event(at(8), "fail", "command-line-arguments", "TestC", ""),
            event(at(9), "fail", "", "TestD", ""),
            event(at(10), "run", "q", "TestE", ""),
            event(at(11), "fail", "p", "", ""),
        ]
    }

    #[test]
    fn test_with_test_drops_package_level_events() {
        let events = sample();
        let view: Events<'_> = events.iter().collect();
        let with_test = view.with_test();
        assert_eq!(with_test.len(), 10);
        assert!(with_test.iter().all(|e| !e.test.is_empty()));
    }

    #[test]
    fn test_with_package_drops_empty_and_command_line_packages() {
        let events = sample();
        let view: Events<'_> = events.iter().collect();
        let with_package = view.with_package();
        assert_eq!(with_package.len(), 9);
        assert!(
            with_package
                .iter()
                .all(|e| !e.package.is_empty() && e.package != COMMAND_LINE_PACKAGE)
        );
    }

    #[test]
    fn test_projections_compose() {
        let events = sample();
        let view: Events<'_> = events.iter().collect();
        let by_key = view.with_test().with_package().by_key();

        let keys: Vec<&str> = by_key.sorted_keys().into_iter().map(TestKey::as_str).collect();
        assert_eq!(keys, vec!["p:TestA", "p:TestB", "q:TestE"]);
        assert_eq!(by_key.get("p:TestA").map(Events::len), Some(4));
    }

    #[test]
    fn test_by_action_keeps_insertion_order() {
        let events = sample();
        let view: Events<'_> = events.iter().collect();
        let by_action = view.by_action();

        let outputs: Vec<&str> = by_action
            .get(&Action::Output)
            .expect("output group")
            .iter()
            .map(|e| e.output.as_str())
            .collect();
        assert_eq!(outputs, vec!["second\n", "first\n"]);
        assert_eq!(by_action.get(&Action::Fail).map(Events::len), Some(4));
        assert!(by_action.get(&Action::Skip).is_none());
    }

    #[test]
    fn test_by_package() {
        let events = sample();
        let view: Events<'_> = events.iter().collect();
        let by_package = view.by_package();
        assert_eq!(by_package.len(), 4);
        assert_eq!(by_package.get("p").map(Events::len), Some(8));
        assert_eq!(by_package.get("").map(Events::len), Some(1));
    }

    #[test]
    fn test_sorted_is_stable_for_equal_timestamps() {
        let events = vec![
            event(at(5), "output", "p", "T", "b"),
            event(at(1), "output", "p", "T", "a"),
            event(at(5), "output", "p", "T", "c"),
            event(None, "output", "p", "T", "z"),
        ];
        let view: Events<'_> = events.iter().collect();
        let order: Vec<&str> = view.sorted().iter().map(|e| e.output.as_str()).collect();
        assert_eq!(order, vec!["z", "a", "b", "c"]);
        // the source view is untouched
        let original: Vec<&str> = view.iter().map(|e| e.output.as_str()).collect();
        assert_eq!(original, vec!["b", "a", "c", "z"]);
    }

    #[test]
    fn test_output_reassembles_in_time_order() {
        let events = sample();
        let view: Events<'_> = events.iter().collect();
        let by_key = view.by_key();
        let test_a = by_key.get("p:TestA").expect("TestA group");
        assert_eq!(test_a.output(), "first\nsecond\n");
    }

    #[test]
    fn test_output_ignores_non_output_actions() {
        let events = vec![event(at(1), "fail", "p", "T", "boom")];
        let view: Events<'_> = events.iter().collect();
        assert_eq!(view.output(), "");
    }

    #[test]
    fn test_result_is_first_terminal_event() {
        let events = vec![
            event(at(1), "run", "p", "T", ""),
            event(at(2), "fail", "p", "T", "first"),
            event(at(3), "pass", "p", "T", "second"),
        ];
        let view: Events<'_> = events.iter().collect();
        let result = view.result().expect("terminal event");
        assert_eq!(result.action, Action::Fail);
        assert_eq!(result.output, "first");
        assert_eq!(view.outcome(), Some(Outcome::Fail));
    }

    #[test]
    fn test_result_absent_without_terminal_event() {
        let events = vec![
            event(at(1), "run", "p", "T", ""),
            event(at(2), "skip", "p", "T", ""),
        ];
        let view: Events<'_> = events.iter().collect();
        assert!(view.result().is_none());
        assert!(view.outcome().is_none());
    }

    #[test]
    fn test_filter_by_result() {
        let events = sample();
        let view: Events<'_> = events.iter().collect();
        let by_key = view.with_test().with_package().by_key();

        let failing = by_key.filter_by_result(Outcome::Fail);
        let keys: Vec<String> = failing.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["p:TestA"]);

        let passing = by_key.filter_by_result(Outcome::Pass);
        assert_eq!(passing.len(), 1);
        assert!(passing.get("p:TestB").is_some());
        // TestE never finished
        assert!(failing.get("q:TestE").is_none() && passing.get("q:TestE").is_none());
    }

    #[test]
    fn test_empty_groups() {
        let view = Events::default();
        assert!(view.by_key().is_empty());
        assert!(view.by_key().filter_by_result(Outcome::Fail).is_empty());
        assert_eq!(view.output(), "");
    }
}
