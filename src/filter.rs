use crate::state::{Car, Catalog, Champion, Driver, Section};

/// Live filter inputs. Empty search and `None` selectors impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub year: Option<i32>,
    pub team: Option<String>,
}

impl FilterCriteria {
    pub fn is_unset(&self) -> bool {
        self.search.is_empty() && self.year.is_none() && self.team.is_none()
    }
}

/// Borrowed, order-preserving result of filtering one section.
#[derive(Debug, Clone, PartialEq)]
pub enum FilteredView<'a> {
    Cars(Vec<&'a Car>),
    Drivers(Vec<&'a Driver>),
    Champions(Vec<&'a Champion>),
}

impl FilteredView<'_> {
    pub fn section(&self) -> Section {
        match self {
            FilteredView::Cars(_) => Section::Cars,
            FilteredView::Drivers(_) => Section::Drivers,
            FilteredView::Champions(_) => Section::Champions,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FilteredView::Cars(rows) => rows.len(),
            FilteredView::Drivers(rows) => rows.len(),
            FilteredView::Champions(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn apply_filters<'a>(
    section: Section,
    catalog: &'a Catalog,
    criteria: &FilterCriteria,
) -> FilteredView<'a> {
    match section {
        Section::Cars => FilteredView::Cars(filter_cars(&catalog.cars, criteria)),
        Section::Drivers => FilteredView::Drivers(filter_drivers(&catalog.drivers, criteria)),
        Section::Champions => {
            FilteredView::Champions(filter_champions(&catalog.champions, criteria))
        }
    }
}

pub fn filter_cars<'a>(cars: &'a [Car], criteria: &FilterCriteria) -> Vec<&'a Car> {
    let query = criteria.search.to_lowercase();
    cars.iter()
        .filter(|car| {
            let matches_search = contains_ci(&car.name, &query)
                || contains_ci(&car.team, &query)
                || year_contains(car.year, &query);
            matches_search
                && matches_year(car.year, criteria.year)
                && matches_team(&car.team, criteria.team.as_deref())
        })
        .collect()
}

/// Drivers carry no single year, so the year selector is ignored here.
pub fn filter_drivers<'a>(drivers: &'a [Driver], criteria: &FilterCriteria) -> Vec<&'a Driver> {
    let query = criteria.search.to_lowercase();
    drivers
        .iter()
        .filter(|driver| {
            let matches_search = contains_ci(&driver.name, &query)
                || contains_ci(&driver.nationality, &query)
                || driver.teams.iter().any(|t| contains_ci(t, &query));
            let matches_team = match criteria.team.as_deref() {
                Some(team) => driver.teams.iter().any(|t| t == team),
                None => true,
            };
            matches_search && matches_team
        })
        .collect()
}

pub fn filter_champions<'a>(
    champions: &'a [Champion],
    criteria: &FilterCriteria,
) -> Vec<&'a Champion> {
    let query = criteria.search.to_lowercase();
    champions
        .iter()
        .filter(|champion| {
            let matches_search = contains_ci(&champion.driver, &query)
                || contains_ci(&champion.team, &query)
                || year_contains(champion.year, &query);
            matches_search
                && matches_year(champion.year, criteria.year)
                && matches_team(&champion.team, criteria.team.as_deref())
        })
        .collect()
}

/// A record without a year never satisfies a selected year.
fn matches_year(year: Option<i32>, selected: Option<i32>) -> bool {
    selected.is_none_or(|y| year == Some(y))
}

fn year_contains(year: Option<i32>, query: &str) -> bool {
    year.is_some_and(|y| y.to_string().contains(query))
}

fn matches_team(team: &str, selected: Option<&str>) -> bool {
    selected.is_none_or(|t| t == team)
}

/// `query` must already be lowercased.
fn contains_ci(haystack: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(query)
}
