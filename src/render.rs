//! Projection from filtered collections to cards.
//!
//! Everything here is a pure function of its input; the terminal layer only
//! lays the resulting [`GridView`] out, so each frame fully replaces the last.

use crate::filter::FilteredView;
use crate::state::{AppState, Car, Champion, Driver, LoadStatus, Section};

const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400x200/0a0a0a/e10600?text=";

pub const LOAD_ERROR_MESSAGE: &str = "Error loading data. Please check your JSON files.";
pub const LOADING_MESSAGE: &str = "Loading catalog...";

pub const CARD_WIDTH: u16 = 36;
pub const CARD_HEIGHT: u16 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub image: String,
    pub fallback_text: &'static str,
    pub title: String,
    pub subtitle: String,
    pub details: Vec<DetailRow>,
}

impl Card {
    /// The primary image, or the kind-specific placeholder when there is none.
    pub fn image_source(&self) -> String {
        if self.image.trim().is_empty() {
            placeholder_image_url(self.fallback_text)
        } else {
            self.image.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    Loading,
    Error(&'static str),
    NoResults(&'static str),
    Cards(Vec<Card>),
}

impl GridView {
    pub fn card_count(&self) -> usize {
        match self {
            GridView::Cards(cards) => cards.len(),
            _ => 0,
        }
    }
}

pub fn placeholder_image_url(fallback_text: &str) -> String {
    format!("{PLACEHOLDER_IMAGE_URL}{}", fallback_text.replace(' ', "+"))
}

pub fn fallback_text(section: Section) -> &'static str {
    match section {
        Section::Cars => "F1 Car",
        Section::Drivers => "Driver",
        Section::Champions => "Champion",
    }
}

pub fn no_results_message(section: Section) -> &'static str {
    match section {
        Section::Cars => "No cars found",
        Section::Drivers => "No drivers found",
        Section::Champions => "No champions found",
    }
}

/// Grid for the active section. A failed load shows the same placeholder
/// whichever section is active.
pub fn grid_view(state: &AppState) -> GridView {
    match state.status {
        LoadStatus::Loading => GridView::Loading,
        LoadStatus::Failed => GridView::Error(LOAD_ERROR_MESSAGE),
        LoadStatus::Ready => render_view(&state.filtered_view()),
    }
}

pub fn render_view(view: &FilteredView<'_>) -> GridView {
    if view.is_empty() {
        return GridView::NoResults(no_results_message(view.section()));
    }
    let cards = match view {
        FilteredView::Cars(rows) => rows.iter().map(|c| car_card(c)).collect(),
        FilteredView::Drivers(rows) => rows.iter().map(|d| driver_card(d)).collect(),
        FilteredView::Champions(rows) => rows.iter().map(|c| champion_card(c)).collect(),
    };
    GridView::Cards(cards)
}

pub fn car_card(car: &Car) -> Card {
    let mut details = vec![detail("Team", &car.team), detail("Engine", &car.engine)];
    if let Some(constructor) = car.constructor.as_deref().filter(|c| !c.is_empty()) {
        details.push(detail("Constructor", constructor));
    }
    Card {
        image: car.image.clone(),
        fallback_text: fallback_text(Section::Cars),
        title: car.name.clone(),
        subtitle: car.year.map(|y| y.to_string()).unwrap_or_default(),
        details,
    }
}

pub fn driver_card(driver: &Driver) -> Card {
    let teams = driver.teams.join(", ");
    let mut details = vec![detail("Active", &driver.years), detail("Teams", &teams)];
    // Zero titles is treated like a missing count.
    if let Some(titles) = driver.championships.filter(|n| *n > 0) {
        details.push(detail("Titles", &titles.to_string()));
    }
    Card {
        image: driver.image.clone(),
        fallback_text: fallback_text(Section::Drivers),
        title: driver.name.clone(),
        subtitle: driver.nationality.clone(),
        details,
    }
}

pub fn champion_card(champion: &Champion) -> Card {
    let mut details = vec![detail("Team", &champion.team), detail("Car", &champion.car)];
    if let Some(points) = champion.points.filter(|p| *p != 0.0 && !p.is_nan()) {
        details.push(detail("Points", &points.to_string()));
    }
    Card {
        image: champion.image.clone(),
        fallback_text: fallback_text(Section::Champions),
        title: match champion.year {
            Some(year) => format!("{year} Champion"),
            None => "Champion".to_string(),
        },
        subtitle: champion.driver.clone(),
        details,
    }
}

/// Cards per row and fully visible rows for a grid area of the given size.
pub fn grid_shape(width: u16, height: u16) -> (usize, usize) {
    ((width / CARD_WIDTH).max(1) as usize, (height / CARD_HEIGHT) as usize)
}

/// First and one-past-last card index to draw, starting at grid row
/// `scroll_row` and never past the last full page.
pub fn visible_range(
    scroll_row: usize,
    total: usize,
    columns: usize,
    visible_rows: usize,
) -> (usize, usize) {
    if total == 0 || columns == 0 || visible_rows == 0 {
        return (0, 0);
    }
    let total_rows = total.div_ceil(columns);
    let max_start_row = total_rows.saturating_sub(visible_rows);
    let start = scroll_row.min(max_start_row) * columns;
    let end = (start + visible_rows * columns).min(total);
    (start, end)
}

fn detail(label: &'static str, value: &str) -> DetailRow {
    DetailRow {
        label,
        value: value.to_string(),
    }
}
