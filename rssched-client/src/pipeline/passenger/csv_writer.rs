//! Writes passenger counts as CSV.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use super::PassengerPipe;
use crate::pipeline::output::create_parent;
use crate::pipeline::{PipelineError, Sink};

#[derive(Debug, Serialize)]
struct Row<'a> {
    line: &'a str,
    route: &'a str,
    departure: &'a str,
    segment: usize,
    from_stop: &'a str,
    to_stop: &'a str,
    passengers: f64,
    seated: f64,
}

/// Writes `{instance_id}_passenger_counts.csv` to the output directory, with
/// counts multiplied by the capacity factor.
#[derive(Debug, Clone)]
pub struct PassengerCsvWriter {
    output_directory: PathBuf,
    instance_id: String,
    capacity_factor: f64,
}

impl PassengerCsvWriter {
    pub fn new(
        output_directory: impl Into<PathBuf>,
        instance_id: impl Into<String>,
        capacity_factor: f64,
    ) -> Self {
        Self {
            output_directory: output_directory.into(),
            instance_id: instance_id.into(),
            capacity_factor,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.output_directory
            .join(format!("{}_passenger_counts.csv", self.instance_id))
    }
}

impl Sink<PassengerPipe> for PassengerCsvWriter {
    fn consume(&self, pipe: &PassengerPipe) -> Result<(), PipelineError> {
        let path = self.path();
        create_parent(&path)?;
        let csv_error = |source: csv::Error| PipelineError::Csv {
            path: path.clone(),
            source,
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .map_err(csv_error)?;
        for (key, load) in pipe.counts.iter() {
            writer
                .serialize(Row {
                    line: key.line.as_str(),
                    route: key.route.as_str(),
                    departure: key.departure.as_str(),
                    segment: key.index,
                    from_stop: load.from.as_str(),
                    to_stop: load.to.as_str(),
                    passengers: load.passengers * self.capacity_factor,
                    seated: load.seated * self.capacity_factor,
                })
                .map_err(csv_error)?;
        }
        writer.flush().map_err(|source| PipelineError::Io {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), rows = pipe.counts.len(), "Wrote passenger counts");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use crate::pipeline::passenger::{EventAnalysisFilter, PassengerCounts};
    use crate::pipeline::Filter;
    use crate::scenario::test_support::{departure_id, line_id, route_id, small_scenario, stop_id, vehicle_id};
    use crate::scenario::{Event, PersonId};
    use crate::selection::{FilterStrategy, NoFilterStrategy};
    use tempfile::TempDir;

    fn pipe() -> PassengerPipe {
        let person = PersonId::parse("anna").unwrap();
        let vehicle = vehicle_id("vB1");
        let events = vec![
            Event::TransitDriverStarts {
                time: 0,
                driver: PersonId::parse("driver").unwrap(),
                vehicle: vehicle.clone(),
                line: line_id("B"),
                route: route_id("B1"),
                departure: departure_id("B1_0830"),
            },
            Event::VehicleArrivesAtFacility {
                time: 10,
                vehicle: vehicle.clone(),
                facility: stop_id("sC"),
            },
            Event::PersonEntersVehicle {
                time: 20,
                person: person.clone(),
                vehicle: vehicle.clone(),
            },
            Event::VehicleArrivesAtFacility {
                time: 310,
                vehicle: vehicle.clone(),
                facility: stop_id("sD"),
            },
            Event::PersonLeavesVehicle {
                time: 320,
                person,
                vehicle,
            },
        ];
        let scenario = small_scenario();
        let selection = NoFilterStrategy.filter(&scenario.schedule).unwrap();
        let mut pipe = PassengerPipe {
            scenario,
            events,
            selection,
            counts: PassengerCounts::new(),
        };
        EventAnalysisFilter::new(0.5, 900).apply(&mut pipe).unwrap();
        pipe
    }

    #[test]
    fn writes_scaled_counts() {
        let dir = TempDir::new().unwrap();
        let writer = PassengerCsvWriter::new(dir.path().join("out"), "it", 1.5);
        writer.consume(&pipe()).unwrap();

        let content = fs::read_to_string(dir.path().join("out/it_passenger_counts.csv")).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "line,route,departure,segment,from_stop,to_stop,passengers,seated",
                "B,B1,B1_0830,0,sC,sD,3.0,0.0",
            ]
        );
    }
}
