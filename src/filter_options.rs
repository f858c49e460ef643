use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::state::Catalog;

/// Values offered by the year and team selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Distinct car and champion years, most recent first.
    pub years: Vec<i32>,
    /// Distinct teams from all three collections, ascending.
    pub teams: Vec<String>,
}

pub fn build_filter_options(catalog: &Catalog) -> FilterOptions {
    let years: BTreeSet<Reverse<i32>> = catalog
        .cars
        .iter()
        .filter_map(|c| c.year)
        .chain(catalog.champions.iter().filter_map(|c| c.year))
        .map(Reverse)
        .collect();

    let teams: BTreeSet<&str> = catalog
        .cars
        .iter()
        .map(|c| c.team.as_str())
        .chain(
            catalog
                .drivers
                .iter()
                .flat_map(|d| d.teams.iter().map(String::as_str)),
        )
        .chain(catalog.champions.iter().map(|c| c.team.as_str()))
        .filter(|team| !team.is_empty())
        .collect();

    FilterOptions {
        years: years.into_iter().map(|Reverse(y)| y).collect(),
        teams: teams.into_iter().map(str::to_string).collect(),
    }
}

/// Steps a selector through `None, options[0], .., options[n-1], None`.
///
/// A `current` value that is no longer offered restarts the cycle.
pub fn cycle_option<T: Clone + PartialEq>(
    options: &[T],
    current: Option<&T>,
    forward: bool,
) -> Option<T> {
    if options.is_empty() {
        return None;
    }
    let pos = current.and_then(|value| options.iter().position(|o| o == value));
    let next = match (pos, forward) {
        (None, true) => Some(0),
        (None, false) => Some(options.len() - 1),
        (Some(i), true) if i + 1 < options.len() => Some(i + 1),
        (Some(_), true) => None,
        (Some(0), false) => None,
        (Some(i), false) => Some(i - 1),
    };
    next.and_then(|i| options.get(i).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_through_unset() {
        let years = [2010, 2009];
        assert_eq!(cycle_option(&years, None, true), Some(2010));
        assert_eq!(cycle_option(&years, Some(&2010), true), Some(2009));
        assert_eq!(cycle_option(&years, Some(&2009), true), None);
        assert_eq!(cycle_option(&years, None, false), Some(2009));
        assert_eq!(cycle_option(&years, Some(&2010), false), None);
    }

    #[test]
    fn cycle_on_empty_options_stays_unset() {
        let empty: [i32; 0] = [];
        assert_eq!(cycle_option(&empty, None, true), None);
        assert_eq!(cycle_option(&empty, Some(&1), false), None);
    }
}
