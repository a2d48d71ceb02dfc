// Domain layer: document value model, snapshot models and ports.

pub mod model;
pub mod ports;
pub mod value;
