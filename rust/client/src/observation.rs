use crate::action::ActionScheme;
use crate::common::defs::*;
use crate::ObsActSpace;
use ndarray::{array, Array1};

pub type Observation = Array1<Continous>;

/// `((altitude + 0.2) / max_altitude) / 1.2`
pub fn normalized_altitude(altitude: f64, max_altitude: f64) -> f64 {
    ((altitude + 0.2) / max_altitude) / 1.2
}

/// Encode a snapshot as `[altitude, east, north(, roll)]`. The horizontal pair
/// is the heading unit vector scaled by how far the nose is below vertical.
pub fn encode(t: &Telemetry, max_altitude: f64, scheme: ActionScheme) -> Observation {
    let heading = t.heading.to_radians();
    let tilt = (90. - t.pitch) / 90.;
    let alt = normalized_altitude(t.altitude, max_altitude);

    if scheme.observes_roll() {
        array![alt, heading.sin() * tilt, heading.cos() * tilt, t.roll / 180.]
    } else {
        array![alt, heading.sin() * tilt, heading.cos() * tilt]
    }
}

pub fn observation_space(scheme: ActionScheme) -> ObsActSpace {
    let dims = if scheme.observes_roll() { 4 } else { 3 };
    let mut low = vec![0., -1., -1., -1.];
    let mut high = vec![1.; 4];
    low.truncate(dims);
    high.truncate(dims);

    ObsActSpace::Box {
        shape: vec![dims as Discrete],
        high,
        low,
    }
}
