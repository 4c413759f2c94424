//! FeOs-Polytrope - Piecewise polytrope equations of state for neutron star parameter estimation.
//!
//! Models are selected by name, either to construct an equation of state from a
//! parameter vector or to draw a starting point for an MCMC walker.
//!
//! ```
//! use feos_polytrope::{choose_eos_model, initialize_walker_eos_params};
//!
//! let model = choose_eos_model("piecewise_polytrope_gamma_params")?;
//! let eos = model.instantiate(&[34.384, 3.005, 2.988, 2.851])?;
//! println!("p/c^2 at 1e15 g/cm^3: {}", eos.polytrope().pressure(1e15));
//!
//! let start = initialize_walker_eos_params("piecewise_polytrope_log_p_params")?;
//! assert_eq!(start.len(), 4);
//! # Ok::<(), feos_polytrope::EosError>(())
//! ```
#![warn(clippy::all)]

pub mod eos;
mod error;
mod registry;
mod walker;
pub use error::{EosError, EosResult};
pub use registry::{
    choose_eos_model, eos_model_names, initialize_walker_eos_params,
    initialize_walker_eos_params_with, EosModel, EosModelName, EosModelType,
};
pub use walker::{
    initialize_walker, initialize_walker_piecewise_polytrope_gamma_params,
    initialize_walker_piecewise_polytrope_log_p_params,
    initialize_walker_piecewise_polytrope_p_params, WalkerConfig, SLY_REFERENCE_PARAMETERS,
};
