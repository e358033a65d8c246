// Domain layer: participants, groups and the ports the core talks through.

pub mod model;
pub mod ports;

pub mod services;
