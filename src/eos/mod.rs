//! A collection of equation of state models.
mod piecewise_polytrope;
pub use piecewise_polytrope::{
    PiecewisePolytrope, PiecewisePolytropeGammaParams, PiecewisePolytropeLogPParams,
    PiecewisePolytropePParams, PolytropeParameterization, LOG_CORE_DENSITIES,
    LOG_PRESSURE_DENSITIES, SLY_CRUST_DENSITIES, SLY_CRUST_GAMMA, SLY_CRUST_K0, SPEED_OF_LIGHT,
};
