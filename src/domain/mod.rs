// Domain layer: vitals model and ports. No I/O here.

pub mod model;
pub mod ports;
