//! Scenario loading.
//!
//! The pipelines only ever see a scenario through [`ScenarioProvider`], so
//! they can be fed from simulation output on disk or from data built in
//! memory.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::events::Event;
use super::network::Network;
use super::schedule::TransitSchedule;
use super::{Scenario, ScenarioError};

const NETWORK_FILE: &str = "output_network.json";
const TRANSIT_SCHEDULE_FILE: &str = "output_transitSchedule.json";
const EVENTS_FILE: &str = "output_events.json";

/// Errors from loading scenario files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File content is not valid scenario JSON
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Loaded data is not internally consistent
    #[error("inconsistent scenario: {0}")]
    Scenario(#[from] ScenarioError),
}

/// Trait for providing scenario data to the pipelines.
///
/// Implementations must only return validated data: no dangling references.
pub trait ScenarioProvider {
    /// Load the scenario. Without `include_network` the returned network is
    /// empty and only the schedule is validated.
    fn load_scenario(&self, include_network: bool) -> Result<Scenario, LoadError>;

    /// Load the simulation event log.
    fn load_events(&self) -> Result<Vec<Event>, LoadError>;
}

/// Loads simulation output from JSON files in an input directory.
///
/// Files are named `{run_id}.{file}`, e.g. `kelheim.output_network.json`.
#[derive(Debug, Clone)]
pub struct ScenarioLoader {
    run_id: String,
    input_directory: PathBuf,
}

impl ScenarioLoader {
    /// Create a loader for the given run in the given directory.
    pub fn new(run_id: impl Into<String>, input_directory: impl Into<PathBuf>) -> Self {
        Self {
            run_id: run_id.into(),
            input_directory: input_directory.into(),
        }
    }

    /// Path of one of the run's output files.
    pub fn path(&self, file: &str) -> PathBuf {
        self.input_directory.join(format!("{}.{}", self.run_id, file))
    }

    /// Path of the event log.
    pub fn events_path(&self) -> PathBuf {
        self.path(EVENTS_FILE)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ScenarioProvider for ScenarioLoader {
    fn load_scenario(&self, include_network: bool) -> Result<Scenario, LoadError> {
        let schedule: TransitSchedule = Self::read_json(&self.path(TRANSIT_SCHEDULE_FILE))?;

        let scenario = if include_network {
            let network: Network = Self::read_json(&self.path(NETWORK_FILE))?;
            let scenario = Scenario::new(network, schedule);
            scenario.validate()?;
            scenario
        } else {
            schedule.validate()?;
            Scenario::new(Network::new(), schedule)
        };

        info!(
            run_id = %self.run_id,
            nodes = scenario.network.node_count(),
            links = scenario.network.link_count(),
            lines = scenario.schedule.line_count(),
            stops = scenario.schedule.facility_count(),
            "Loaded scenario"
        );

        Ok(scenario)
    }

    fn load_events(&self) -> Result<Vec<Event>, LoadError> {
        let events: Vec<Event> = Self::read_json(&self.events_path())?;
        info!(run_id = %self.run_id, events = events.len(), "Loaded events");
        Ok(events)
    }
}

/// A scenario held in memory, handed out as fresh copies on every load.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScenario {
    scenario: Scenario,
    events: Vec<Event>,
}

impl InMemoryScenario {
    /// Wrap a scenario, validating it first.
    pub fn new(scenario: Scenario) -> Result<Self, ScenarioError> {
        scenario.validate()?;
        Ok(Self {
            scenario,
            events: Vec::new(),
        })
    }

    /// Attach an event log.
    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }
}

impl ScenarioProvider for InMemoryScenario {
    fn load_scenario(&self, include_network: bool) -> Result<Scenario, LoadError> {
        let network = if include_network {
            self.scenario.network.clone()
        } else {
            Network::new()
        };
        Ok(Scenario::new(network, self.scenario.schedule.clone()))
    }

    fn load_events(&self) -> Result<Vec<Event>, LoadError> {
        Ok(self.events.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::test_support::small_scenario;
    use tempfile::tempdir;

    fn write_scenario(dir: &Path, run_id: &str, scenario: &Scenario) {
        let loader = ScenarioLoader::new(run_id, dir);
        std::fs::write(
            loader.path(NETWORK_FILE),
            serde_json::to_string(&scenario.network).unwrap(),
        )
        .unwrap();
        std::fs::write(
            loader.path(TRANSIT_SCHEDULE_FILE),
            serde_json::to_string(&scenario.schedule).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn builds_paths_from_run_id() {
        let loader = ScenarioLoader::new("kelheim", "/data/run");
        assert_eq!(
            loader.events_path(),
            PathBuf::from("/data/run/kelheim.output_events.json")
        );
        let loader = ScenarioLoader::new("kelheim", "/data/run/");
        assert_eq!(
            loader.path(NETWORK_FILE),
            PathBuf::from("/data/run/kelheim.output_network.json")
        );
    }

    #[test]
    fn load_from_disk() {
        let dir = tempdir().unwrap();
        let scenario = small_scenario();
        write_scenario(dir.path(), "run", &scenario);

        let loader = ScenarioLoader::new("run", dir.path());
        let loaded = loader.load_scenario(true).unwrap();
        assert_eq!(loaded, scenario);

        let without_network = loader.load_scenario(false).unwrap();
        assert!(without_network.network.is_empty());
        assert_eq!(without_network.schedule, scenario.schedule);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let loader = ScenarioLoader::new("absent", dir.path());
        let err = loader.load_scenario(true).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let dir = tempdir().unwrap();
        let loader = ScenarioLoader::new("run", dir.path());
        std::fs::write(loader.path(TRANSIT_SCHEDULE_FILE), "{not json").unwrap();
        let err = loader.load_scenario(false).unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
    }

    #[test]
    fn load_events_from_disk() {
        let dir = tempdir().unwrap();
        let loader = ScenarioLoader::new("run", dir.path());
        std::fs::write(
            loader.events_path(),
            r#"[{"type": "personLeavesVehicle", "time": 10, "person": "p", "vehicle": "v"}]"#,
        )
        .unwrap();
        let events = loader.load_events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time(), 10);
    }

    #[test]
    fn in_memory_hands_out_copies() {
        let provider = InMemoryScenario::new(small_scenario()).unwrap();
        let mut first = provider.load_scenario(true).unwrap();
        first.network.retain_links(|_| false);
        let second = provider.load_scenario(true).unwrap();
        assert!(second.network.link_count() > 0);
    }
}
