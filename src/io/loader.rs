//! Dataset loading: the airports graph and the world topology are read
//! concurrently on background threads, joined over a channel, and applied
//! by a polling system once both have resolved.
//!
//! Failure is explicit: every way the join can go wrong maps to a
//! [`LoadError`] that is logged and surfaced in the status bar instead of
//! leaving a silently blank canvas.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use thiserror::Error;

use crate::core::components::{GeoCoord, Route};
use crate::core::config::AirwaysConfig;
use crate::core::helpers::spawn_airport;
use crate::core::resources::{Canvas, StatusMessage};
use crate::core::state::VisMode;
use crate::geo::projection::Projection;
use crate::geo::topology::{Polygon, Ring, Topology, TopologyError};
use crate::layout::WorldProjection;
use crate::render::map::{spawn_map_body, MapOutline};
use crate::render::scale::SizeScale;
use crate::sim::forces::{phyllotaxis, ForceSimulation};

/// Where the two datasets come from. Overridable from the command line.
#[derive(Resource, Clone)]
pub struct DataPaths {
    pub airports: PathBuf,
    pub world: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            airports: PathBuf::from("assets/airports.json"),
            world: PathBuf::from("assets/world.json"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error("route {index} references unknown airport {reference}")]
    UnknownAirport { index: usize, reference: String },
    #[error("world loader thread panicked")]
    WorkerPanicked,
}

#[derive(Deserialize)]
pub struct AirportsFile {
    pub nodes: Vec<AirportRecord>,
    pub links: Vec<RouteRecord>,
}

#[derive(Deserialize)]
pub struct AirportRecord {
    pub name: String,
    pub passengers: f32,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Deserialize)]
pub struct RouteRecord {
    pub source: NodeRef,
    pub target: NodeRef,
}

/// Route endpoints appear as airport names or positional indices in the
/// wild; accept both.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum NodeRef {
    Index(usize),
    Name(String),
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Index(i) => write!(f, "#{i}"),
            NodeRef::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl NodeRef {
    fn resolve(&self, by_name: &HashMap<&str, usize>, len: usize) -> Option<usize> {
        match self {
            NodeRef::Index(i) if *i < len => Some(*i),
            NodeRef::Index(_) => None,
            NodeRef::Name(name) => by_name.get(name.as_str()).copied(),
        }
    }
}

/// Everything the apply system needs, produced off the main thread.
pub struct LoadedData {
    pub nodes: Vec<AirportRecord>,
    /// Route endpoints as node indices; both guaranteed in range.
    pub links: Vec<(usize, usize)>,
    pub countries: Vec<Polygon>,
    pub boundaries: Vec<Ring>,
}

/// Resolve every route's endpoints to node indices. A reference to a
/// missing airport refuses the whole dataset.
fn resolve_links(file: &AirportsFile) -> Result<Vec<(usize, usize)>, LoadError> {
    let by_name: HashMap<&str, usize> = file
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.name.as_str(), i))
        .collect();
    file.links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let source = link.source.resolve(&by_name, file.nodes.len()).ok_or_else(|| {
                LoadError::UnknownAirport { index, reference: link.source.to_string() }
            })?;
            let target = link.target.resolve(&by_name, file.nodes.len()).ok_or_else(|| {
                LoadError::UnknownAirport { index, reference: link.target.to_string() }
            })?;
            Ok((source, target))
        })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn load_world(path: &Path) -> Result<(Vec<Polygon>, Vec<Ring>), LoadError> {
    let topology: Topology = read_json(path)?;
    let countries = topology.polygons("countries")?;
    let boundaries = topology.mesh("countries")?;
    Ok((countries, boundaries))
}

/// Read and parse both datasets, world topology on a second thread. The
/// join waits for both; the first error wins.
pub fn load_datasets(airports_path: &Path, world_path: &Path) -> Result<LoadedData, LoadError> {
    let world_path = world_path.to_path_buf();
    let world_handle = std::thread::spawn(move || load_world(&world_path));

    let airports: AirportsFile = read_json(airports_path)?;
    let links = resolve_links(&airports)?;
    let (countries, boundaries) = match world_handle.join() {
        Ok(result) => result?,
        Err(_) => return Err(LoadError::WorkerPanicked),
    };

    Ok(LoadedData {
        nodes: airports.nodes,
        links,
        countries,
        boundaries,
    })
}

/// Receiver for the in-flight load. Emptied once the result is applied.
#[derive(Resource, Default)]
pub struct PendingDatasets(pub Mutex<Option<mpsc::Receiver<Result<LoadedData, LoadError>>>>);

/// Kick off the background load at startup.
pub fn start_load_system(paths: Res<DataPaths>, pending: Res<PendingDatasets>) {
    let airports = paths.airports.clone();
    let world = paths.world.clone();
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(load_datasets(&airports, &world));
    });
    *pending.0.lock().unwrap() = Some(rx);
    info!("[LOAD] fetching {:?} and {:?}", paths.airports, paths.world);
}

/// Poll the loader channel; on success fit the projection and spawn the
/// graph and map entities, on failure surface the error.
#[allow(clippy::too_many_arguments)]
pub fn apply_loaded_data_system(
    pending: Res<PendingDatasets>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut status: ResMut<StatusMessage>,
    mut scale: ResMut<SizeScale>,
    mut world_projection: ResMut<WorldProjection>,
    mut outline: ResMut<MapOutline>,
    mut sim: ResMut<ForceSimulation>,
    canvas: Res<Canvas>,
    config: Res<AirwaysConfig>,
    state: Res<State<VisMode>>,
) {
    let mut guard = match pending.0.try_lock() {
        Ok(guard) => guard,
        Err(_) => return,
    };
    let Some(rx) = guard.as_ref() else {
        return;
    };
    let result = match rx.try_recv() {
        Ok(result) => result,
        Err(mpsc::TryRecvError::Empty) => return,
        Err(mpsc::TryRecvError::Disconnected) => {
            *guard = None;
            return;
        }
    };
    *guard = None;
    drop(guard);

    let data = match result {
        Ok(data) => data,
        Err(err) => {
            warn!("[LOAD] {err}");
            status.set(format!("Load failed: {err}"));
            return;
        }
    };

    let projection = Projection::new(config.projection).fit_extent(
        [[0.0, 0.0], [canvas.width as f64, canvas.height as f64]],
        &data.countries,
    );

    outline.0 = data
        .boundaries
        .iter()
        .map(|arc| {
            arc.iter()
                .map(|p| {
                    let (x, y) = projection.project(p[0], p[1]);
                    canvas.canvas_to_world(Vec2::new(x as f32, y as f32))
                })
                .collect()
        })
        .collect();

    spawn_map_body(
        &mut commands,
        &mut meshes,
        &mut materials,
        &canvas,
        &projection,
        &data.countries,
        config.map_color(),
    );

    let max_passengers = data.nodes.iter().map(|n| n.passengers).fold(0.0, f32::max);
    *scale = SizeScale::new(max_passengers);

    let node_color = config.node_color();
    let entities: Vec<Entity> = data
        .nodes
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let coord = GeoCoord {
                longitude: record.longitude,
                latitude: record.latitude,
            };
            // Late loads land directly in the active mode's coordinates
            let position = match state.get() {
                VisMode::Force => phyllotaxis(i),
                VisMode::Map => {
                    let (x, y) = projection.project(coord.longitude, coord.latitude);
                    canvas.canvas_to_world(Vec2::new(x as f32, y as f32))
                }
            };
            spawn_airport(
                &mut commands,
                &mut meshes,
                &mut materials,
                &record.name,
                record.passengers,
                coord,
                position,
                scale.radius(record.passengers),
                node_color,
            )
        })
        .collect();

    for &(source, target) in &data.links {
        commands.spawn(Route {
            source: entities[source],
            target: entities[target],
        });
    }

    match state.get() {
        VisMode::Force => sim.reheat(),
        VisMode::Map => sim.stop(),
    }
    world_projection.0 = Some(projection);

    info!(
        "[LOAD] {} airports, {} routes, {} countries",
        data.nodes.len(),
        data.links.len(),
        data.countries.len()
    );
    status.set(format!(
        "Loaded {} airports and {} routes",
        data.nodes.len(),
        data.links.len()
    ));
}
