// Domain layer: listing models and the exercise source port.

pub mod model;
pub mod ports;
