//! Ring Career - Boxing Career Simulation Engine
//!
//! Resolves bouts, moves multi-body rankings and lineal titles, simulates
//! the wider world month by month and ages the player toward retirement.
//! One seeded random source drives everything, so a seed replays a career.

pub mod aging;
pub mod career;
pub mod core;
pub mod fight;
pub mod world;
