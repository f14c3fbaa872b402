//! E2E tests for dataset loading: the concurrent join, explicit failure
//! surfacing, and graph/map entity spawning.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use std::fs;
use std::path::Path;
use std::time::Duration;

use airways::core::components::{Airport, MapBody, NodeRadius, Route};
use airways::core::config::AirwaysConfig;
use airways::core::resources::{Canvas, StatusMessage};
use airways::core::state::VisMode;
use airways::io::loader::{
    apply_loaded_data_system, load_datasets, start_load_system, DataPaths, LoadError,
    PendingDatasets,
};
use airways::layout::WorldProjection;
use airways::render::map::MapOutline;
use airways::render::scale::SizeScale;
use airways::sim::forces::ForceSimulation;

const AIRPORTS_JSON: &str = r#"{
    "nodes": [
        {"name": "ATL", "passengers": 110531300.0, "longitude": -84.4277, "latitude": 33.6407},
        {"name": "ORD", "passengers": 83245472.0, "longitude": -87.9073, "latitude": 41.9742},
        {"name": "DEN", "passengers": 69015703.0, "longitude": -104.6737, "latitude": 39.8561}
    ],
    "links": [
        {"source": "ATL", "target": "ORD"},
        {"source": 1, "target": 2}
    ]
}"#;

/// Two rough "countries" sharing a border at longitude 10.
const WORLD_JSON: &str = r#"{
    "type": "Topology",
    "objects": {
        "countries": {
            "type": "GeometryCollection",
            "geometries": [
                {"type": "Polygon", "arcs": [[0, 1]]},
                {"type": "Polygon", "arcs": [[-1, 2]]}
            ]
        }
    },
    "arcs": [
        [[10.0, -30.0], [10.0, 30.0]],
        [[10.0, 30.0], [-40.0, 30.0], [-40.0, -30.0], [10.0, -30.0]],
        [[10.0, -30.0], [60.0, -30.0], [60.0, 30.0], [10.0, 30.0]]
    ]
}"#;

fn write_datasets(dir: &Path) -> DataPaths {
    let airports = dir.join("airports.json");
    let world = dir.join("world.json");
    fs::write(&airports, AIRPORTS_JSON).unwrap();
    fs::write(&world, WORLD_JSON).unwrap();
    DataPaths { airports, world }
}

fn loader_app(paths: DataPaths) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_state::<VisMode>()
        .insert_resource(Canvas { width: 800.0, height: 500.0 })
        .insert_resource(AirwaysConfig::default())
        .insert_resource(paths)
        .init_resource::<ForceSimulation>()
        .init_resource::<StatusMessage>()
        .init_resource::<SizeScale>()
        .init_resource::<WorldProjection>()
        .init_resource::<MapOutline>()
        .init_resource::<PendingDatasets>()
        .init_resource::<Assets<Mesh>>()
        .init_resource::<Assets<ColorMaterial>>()
        .add_systems(Startup, start_load_system)
        .add_systems(Update, apply_loaded_data_system);
    app
}

/// Pump the app until `done` returns true or the loader times out.
fn pump_until(app: &mut App, mut done: impl FnMut(&mut App) -> bool) -> bool {
    for _ in 0..400 {
        app.update();
        if done(app) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn load_datasets_joins_both_files() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_datasets(dir.path());
    let data = load_datasets(&paths.airports, &paths.world).unwrap();
    assert_eq!(data.nodes.len(), 3);
    assert_eq!(data.links, vec![(0, 1), (1, 2)]);
    assert_eq!(data.countries.len(), 2);
    // The shared border appears once in the boundary mesh
    assert_eq!(data.boundaries.len(), 3);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_datasets(dir.path());
    let err = load_datasets(&dir.path().join("nope.json"), &paths.world).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err}");
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_datasets(dir.path());
    fs::write(&paths.airports, "{not json").unwrap();
    let err = load_datasets(&paths.airports, &paths.world).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "{err}");
}

#[test]
fn world_without_countries_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_datasets(dir.path());
    fs::write(
        &paths.world,
        r#"{"type": "Topology", "objects": {}, "arcs": []}"#,
    )
    .unwrap();
    let err = load_datasets(&paths.airports, &paths.world).unwrap_err();
    assert!(matches!(err, LoadError::Topology(_)), "{err}");
}

#[test]
fn dangling_route_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_datasets(dir.path());
    fs::write(
        &paths.airports,
        r#"{
            "nodes": [{"name": "ATL", "passengers": 1.0, "longitude": 0.0, "latitude": 0.0}],
            "links": [{"source": "ATL", "target": "LAX"}]
        }"#,
    )
    .unwrap();
    let err = load_datasets(&paths.airports, &paths.world).unwrap_err();
    assert!(matches!(err, LoadError::UnknownAirport { .. }), "{err}");
}

#[test]
fn e2e_load_spawns_graph_and_map() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loader_app(write_datasets(dir.path()));

    let loaded = pump_until(&mut app, |app| {
        let world = app.world_mut();
        world.query::<&Airport>().iter(world).count() > 0
    });
    assert!(loaded, "loader did not complete in time");

    let world = app.world_mut();
    let airports: Vec<(&Airport, &NodeRadius)> = world
        .query::<(&Airport, &NodeRadius)>()
        .iter(world)
        .collect();
    assert_eq!(airports.len(), 3);
    // The busiest airport gets the largest circle
    let atl = airports.iter().find(|(a, _)| a.name == "ATL").unwrap();
    let den = airports.iter().find(|(a, _)| a.name == "DEN").unwrap();
    assert!((atl.1 .0 - 10.0).abs() < 1e-4);
    assert!(den.1 .0 < atl.1 .0);

    let routes: Vec<&Route> = world.query::<&Route>().iter(world).collect();
    assert_eq!(routes.len(), 2);
    let endpoints: Vec<Entity> = routes
        .iter()
        .flat_map(|r| [r.source, r.target])
        .collect();
    for entity in endpoints {
        assert!(
            world.get::<Airport>(entity).is_some(),
            "route endpoints resolve to airports"
        );
    }

    let bodies = world.query::<&MapBody>().iter(world).count();
    assert_eq!(bodies, 2, "one mesh per country");

    assert!(app.world().resource::<WorldProjection>().0.is_some());
    assert_eq!(app.world().resource::<MapOutline>().0.len(), 3);
    let sim = app.world().resource::<ForceSimulation>();
    assert!(sim.running, "simulation reheated after load");
    assert!(app
        .world()
        .resource::<StatusMessage>()
        .text
        .contains("Loaded"));
}

#[test]
fn e2e_load_failure_is_surfaced_not_silent() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths {
        airports: dir.path().join("missing.json"),
        world: dir.path().join("also-missing.json"),
    };
    let mut app = loader_app(paths);

    let surfaced = pump_until(&mut app, |app| {
        app.world().resource::<StatusMessage>().text.contains("Load failed")
    });
    assert!(surfaced, "load error never reached the status bar");

    let world = app.world_mut();
    assert_eq!(world.query::<&Airport>().iter(world).count(), 0);
}
