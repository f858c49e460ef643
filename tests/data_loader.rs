use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use f1_catalog::data_loader::{
    CARS_FILE, CHAMPIONS_FILE, DRIVERS_FILE, DataSource, load_catalog, spawn_loader,
};
use f1_catalog::error::LoadError;
use f1_catalog::filter::FilterCriteria;
use f1_catalog::render::{GridView, LOAD_ERROR_MESSAGE, car_card, champion_card, grid_view};
use f1_catalog::state::{AppState, Delta, LoadStatus, Section, apply_delta};

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn copy_fixtures(dir: &Path, skip: &[&str]) {
    for name in [CARS_FILE, DRIVERS_FILE, CHAMPIONS_FILE] {
        if skip.contains(&name) {
            continue;
        }
        fs::copy(fixtures_dir().join(name), dir.join(name)).expect("copy fixture");
    }
}

fn run_loader(source: DataSource) -> Vec<Delta> {
    let (tx, rx) = mpsc::channel();
    let handle = spawn_loader(source, tx);
    handle.join().expect("loader thread");
    rx.try_iter().collect()
}

/// Serves the fixture files from a loopback port until the test process exits.
/// `status_for` picks the response status per requested file name.
fn serve_fixtures(status_for: fn(&str) -> u16) -> DataSource {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            respond(stream, status_for);
        }
    });
    DataSource::Http {
        base_url: format!("http://{addr}/data/"),
        timeout: Duration::from_secs(5),
    }
}

fn respond(mut stream: TcpStream, status_for: fn(&str) -> u16) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers up to the blank line.
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(n) if n > 2 => continue,
            _ => break,
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let file = path.rsplit('/').next().unwrap_or_default();
    let status = status_for(file);
    let (reason, body) = if status == 200 {
        ("OK", fs::read_to_string(fixtures_dir().join(file)).unwrap_or_default())
    } else {
        ("Not Found", String::new())
    };
    let _ = write!(
        stream,
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
}

#[test]
fn loads_all_three_collections() {
    let catalog = load_catalog(&DataSource::Dir(fixtures_dir())).expect("fixtures load");
    assert_eq!(catalog.cars.len(), 5);
    assert_eq!(catalog.drivers.len(), 4);
    assert_eq!(catalog.champions.len(), 4);

    assert_eq!(catalog.cars[0].name, "MP4/4");
    assert_eq!(
        catalog.cars[0].constructor.as_deref(),
        Some("McLaren International")
    );
    assert_eq!(catalog.cars[1].constructor, None);
    assert_eq!(catalog.drivers[2].championships, None);
    assert_eq!(catalog.champions[0].points, Some(90.0));
    assert_eq!(catalog.champions[3].points, None);
}

#[test]
fn missing_optional_and_text_fields_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join(CARS_FILE), r#"[{"year": 1950}]"#).unwrap();
    fs::write(dir.path().join(DRIVERS_FILE), r#"[{"name": "Fangio"}]"#).unwrap();
    fs::write(dir.path().join(CHAMPIONS_FILE), "[]").unwrap();

    let catalog = load_catalog(&DataSource::Dir(dir.path().to_path_buf())).expect("load");
    assert_eq!(catalog.cars[0].year, Some(1950));
    assert!(catalog.cars[0].name.is_empty());
    assert!(catalog.drivers[0].teams.is_empty());
    assert!(catalog.champions.is_empty());
}

#[test]
fn missing_file_fails_the_whole_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    copy_fixtures(dir.path(), &[DRIVERS_FILE]);

    let err = load_catalog(&DataSource::Dir(dir.path().to_path_buf()))
        .expect_err("drivers.json is missing");
    assert!(matches!(err, LoadError::Read { .. }));
    assert_eq!(err.dataset(), Some(DRIVERS_FILE));
}

#[test]
fn malformed_json_fails_the_whole_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    copy_fixtures(dir.path(), &[CHAMPIONS_FILE]);
    fs::write(dir.path().join(CHAMPIONS_FILE), "{not json").unwrap();

    let err = load_catalog(&DataSource::Dir(dir.path().to_path_buf()))
        .expect_err("champions.json is malformed");
    assert!(matches!(err, LoadError::Parse { dataset, .. } if dataset == CHAMPIONS_FILE));
}

#[test]
fn imperfect_records_degrade_instead_of_failing_the_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(CARS_FILE),
        r#"[{"name": "Lotus 49"}, {"name": "Lotus 72", "year": 1970.0, "constructor": null}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join(DRIVERS_FILE),
        r#"[{"name": null, "championships": 3.0, "teams": ["Lotus", null]}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join(CHAMPIONS_FILE),
        r#"[{"year": null, "driver": "Jochen Rindt", "points": "45"}]"#,
    )
    .unwrap();

    let catalog = load_catalog(&DataSource::Dir(dir.path().to_path_buf())).expect("load");
    assert_eq!(catalog.cars[0].year, None);
    assert_eq!(catalog.cars[1].year, Some(1970));
    assert_eq!(catalog.cars[1].constructor, None);
    assert_eq!(catalog.drivers[0].name, "");
    assert_eq!(catalog.drivers[0].championships, Some(3));
    assert_eq!(catalog.drivers[0].teams, vec!["Lotus"]);
    assert_eq!(catalog.champions[0].year, None);
    assert_eq!(catalog.champions[0].points, Some(45.0));

    assert_eq!(car_card(&catalog.cars[0]).subtitle, "");
    assert_eq!(champion_card(&catalog.champions[0]).title, "Champion");

    let mut state = AppState::new();
    apply_delta(&mut state, Delta::CatalogLoaded(catalog));
    assert_eq!(state.options.years, vec![1970]);
    assert_eq!(grid_view(&state).card_count(), 2);

    state.criteria = FilterCriteria {
        year: Some(1970),
        ..FilterCriteria::default()
    };
    assert_eq!(grid_view(&state).card_count(), 1);
    state.switch_section(Section::Champions);
    state.criteria.search = "19".to_string();
    assert_eq!(grid_view(&state), GridView::NoResults("No champions found"));
}

#[test]
fn spawned_loader_delivers_catalog() {
    let deltas = run_loader(DataSource::Dir(fixtures_dir()));
    assert!(matches!(deltas.first(), Some(Delta::Log(_))));
    assert!(matches!(deltas.last(), Some(Delta::CatalogLoaded(c)) if c.cars.len() == 5));

    let mut state = AppState::new();
    for delta in deltas {
        apply_delta(&mut state, delta);
    }
    assert_eq!(state.status, LoadStatus::Ready);
    assert_eq!(grid_view(&state).card_count(), 5);
}

#[test]
fn failing_drivers_fetch_shows_error_in_every_grid() {
    let dir = tempfile::tempdir().expect("tempdir");
    copy_fixtures(dir.path(), &[DRIVERS_FILE]);

    let deltas = run_loader(DataSource::Dir(dir.path().to_path_buf()));
    assert!(matches!(deltas.last(), Some(Delta::LoadFailed(_))));

    let mut state = AppState::new();
    for delta in deltas {
        apply_delta(&mut state, delta);
    }
    for section in [Section::Cars, Section::Champions, Section::Drivers] {
        state.switch_section(section);
        assert_eq!(grid_view(&state), GridView::Error(LOAD_ERROR_MESSAGE));
    }
    assert!(state.catalog.cars.is_empty());
}

#[test]
fn http_source_loads_all_three_collections() {
    let source = serve_fixtures(|_| 200);
    let catalog = load_catalog(&source).expect("http load");
    assert_eq!(catalog.cars.len(), 5);
    assert_eq!(catalog.drivers.len(), 4);
    assert_eq!(catalog.champions.len(), 4);

    let deltas = run_loader(source);
    assert!(matches!(deltas.last(), Some(Delta::CatalogLoaded(c)) if c.drivers.len() == 4));
}

#[test]
fn http_404_on_drivers_fails_the_whole_load() {
    let source = serve_fixtures(|file| if file == DRIVERS_FILE { 404 } else { 200 });

    let err = load_catalog(&source).expect_err("drivers.json answers 404");
    assert!(matches!(
        &err,
        LoadError::Fetch { dataset, source, .. }
            if *dataset == DRIVERS_FILE
                && source.status() == Some(reqwest::StatusCode::NOT_FOUND)
    ));

    let deltas = run_loader(source);
    assert!(matches!(deltas.last(), Some(Delta::LoadFailed(_))));

    let mut state = AppState::new();
    for delta in deltas {
        apply_delta(&mut state, delta);
    }
    assert_eq!(state.status, LoadStatus::Failed);
    assert_eq!(grid_view(&state), GridView::Error(LOAD_ERROR_MESSAGE));
}
