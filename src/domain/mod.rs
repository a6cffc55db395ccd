// Domain layer: wire models and the gateway ports the flows depend on.

pub mod model;
pub mod ports;
