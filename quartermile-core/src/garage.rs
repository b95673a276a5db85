//! Car database keyed by vehicle name

use crate::imports::*;
use crate::vehicle::VehicleSpec;
use std::collections::HashSet;

/// Resource file holding the bundled garage
pub const BUILTIN_GARAGE: &str = "cars.yaml";

/// Ordered collection of vehicles, serialized as a plain list
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, ApproxEq)]
#[serde(transparent)]
pub struct Garage {
    pub cars: Vec<VehicleSpec>,
}

impl SerdeAPI for Garage {
    fn init(&mut self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for car in self.cars.iter_mut() {
            car.init()?;
            ensure!(
                seen.insert(car.name.clone()),
                "duplicate vehicle name in garage: {:?}",
                car.name
            );
        }
        Ok(())
    }
}

impl From<Vec<VehicleSpec>> for Garage {
    fn from(cars: Vec<VehicleSpec>) -> Self {
        Self { cars }
    }
}

impl Garage {
    /// Garage compiled into the crate
    #[cfg(feature = "resources")]
    pub fn builtin() -> anyhow::Result<Self> {
        Self::from_resource(BUILTIN_GARAGE)
    }

    /// Looks up a car by name, exact match first, then ignoring case
    pub fn find(&self, name: &str) -> Option<&VehicleSpec> {
        self.cars
            .iter()
            .find(|car| car.name == name)
            .or_else(|| {
                self.cars
                    .iter()
                    .find(|car| car.name.eq_ignore_ascii_case(name))
            })
    }

    /// Like [`find`](Self::find), with an error listing the known names
    pub fn get(&self, name: &str) -> anyhow::Result<&VehicleSpec> {
        self.find(name)
            .with_context(|| format!("no car named {name:?} in garage, available: {:?}", self.names()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.cars.iter().map(|car| car.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}
