use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::filter::{self, FilterCriteria, FilteredView};
use crate::filter_options::{self, FilterOptions};
use crate::lenient;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Car {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub team: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub engine: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub constructor: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Driver {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub nationality: String,
    // Free-text active period, e.g. "1984-1994".
    #[serde(default, deserialize_with = "lenient::string")]
    pub years: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub teams: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub championships: Option<u32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Champion {
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub driver: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub team: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub car: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub points: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
}

/// The three collections, loaded together and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub cars: Vec<Car>,
    pub drivers: Vec<Driver>,
    pub champions: Vec<Champion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Cars,
    Drivers,
    Champions,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Cars, Section::Drivers, Section::Champions];

    pub fn index(self) -> usize {
        match self {
            Section::Cars => 0,
            Section::Drivers => 1,
            Section::Champions => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Section::Cars => Section::Drivers,
            Section::Drivers => Section::Champions,
            Section::Champions => Section::Cars,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Section::Cars => Section::Champions,
            Section::Drivers => Section::Cars,
            Section::Champions => Section::Drivers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    Grid,
    Search,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub status: LoadStatus,
    pub section: Section,
    pub criteria: FilterCriteria,
    pub options: FilterOptions,
    pub focus: InputFocus,
    /// First visible grid row.
    pub scroll: usize,
    pub grid_columns: usize,
    pub grid_rows: usize,
    pub help_overlay: bool,
    pub loaded_at: Option<DateTime<Local>>,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::default(),
            status: LoadStatus::Loading,
            section: Section::Cars,
            criteria: FilterCriteria::default(),
            options: FilterOptions::default(),
            focus: InputFocus::Grid,
            scroll: 0,
            grid_columns: 1,
            grid_rows: 1,
            help_overlay: false,
            loaded_at: None,
            logs: VecDeque::new(),
        }
    }

    /// Activates `section` and clears search, year and team.
    pub fn switch_section(&mut self, section: Section) {
        self.section = section;
        self.criteria = FilterCriteria::default();
        self.focus = InputFocus::Grid;
        self.scroll = 0;
        tracing::debug!(?section, "section switched");
    }

    pub fn next_section(&mut self) {
        self.switch_section(self.section.next());
    }

    pub fn prev_section(&mut self) {
        self.switch_section(self.section.prev());
    }

    pub fn focus_search(&mut self) {
        self.focus = InputFocus::Search;
    }

    pub fn blur_search(&mut self) {
        self.focus = InputFocus::Grid;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.criteria.search.push(c);
        self.scroll = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.criteria.search.pop();
        self.scroll = 0;
    }

    pub fn cycle_year(&mut self, forward: bool) {
        self.criteria.year =
            filter_options::cycle_option(&self.options.years, self.criteria.year.as_ref(), forward);
        self.scroll = 0;
    }

    pub fn cycle_team(&mut self, forward: bool) {
        self.criteria.team =
            filter_options::cycle_option(&self.options.teams, self.criteria.team.as_ref(), forward);
        self.scroll = 0;
    }

    pub fn filtered_view(&self) -> FilteredView<'_> {
        filter::apply_filters(self.section, &self.catalog, &self.criteria)
    }

    /// Records how many cards per row and rows the last frame could show,
    /// pulling `scroll` back onto the last page if the grid grew.
    pub fn set_grid_shape(&mut self, columns: usize, rows: usize) {
        self.grid_columns = columns.max(1);
        self.grid_rows = rows.max(1);
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn max_scroll(&self) -> usize {
        let total_rows = self.filtered_view().len().div_ceil(self.grid_columns);
        total_rows.saturating_sub(self.grid_rows)
    }

    pub fn scroll_down(&mut self) {
        if self.scroll < self.max_scroll() {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    CatalogLoaded(Catalog),
    LoadFailed(String),
    Log(String),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::CatalogLoaded(catalog) => {
            state.options = filter_options::build_filter_options(&catalog);
            state.push_log(format!(
                "[INFO] Loaded {} cars, {} drivers, {} champions",
                catalog.cars.len(),
                catalog.drivers.len(),
                catalog.champions.len()
            ));
            state.catalog = catalog;
            state.status = LoadStatus::Ready;
            state.loaded_at = Some(Local::now());
            state.scroll = 0;
        }
        Delta::LoadFailed(reason) => {
            state.catalog = Catalog::default();
            state.options = FilterOptions::default();
            state.status = LoadStatus::Failed;
            state.push_log(format!("[WARN] Error loading data: {reason}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn section_label(section: Section) -> &'static str {
    match section {
        Section::Cars => "Cars",
        Section::Drivers => "Drivers",
        Section::Champions => "Champions",
    }
}
