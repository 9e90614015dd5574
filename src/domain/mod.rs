// Domain layer: backend DTOs, account normalization and the ports the client depends on.

pub mod model;
pub mod normalize;
pub mod ports;
