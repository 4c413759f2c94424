//! Starting points for MCMC walkers.
use crate::eos::{
    PiecewisePolytropeGammaParams, PiecewisePolytropeLogPParams, PiecewisePolytropePParams,
    PolytropeParameterization,
};
use crate::{EosError, EosResult};
use nalgebra::SVector;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// `[log_p1, gamma1, gamma2, gamma3]` of the piecewise polytrope fit to SLy
/// (Read et al., PRD 79, 124032, 2009).
pub const SLY_REFERENCE_PARAMETERS: [f64; 4] = [34.384, 3.005, 2.988, 2.851];

/// Sampling ranges and physical screening of walker starting points.
///
/// Starting points are drawn uniformly in the adiabatic-index parameterization
/// and rejected until the equation of state can be constructed and is causal up
/// to `max_density`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// log10 of the pressure in dyn/cm^2 at 10^14.7 g/cm^3.
    pub log_p1: [f64; 2],
    pub gamma1: [f64; 2],
    pub gamma2: [f64; 2],
    pub gamma3: [f64; 2],
    /// Density in g/cm^3 up to which the speed of sound may not exceed the speed of light.
    pub max_density: f64,
    pub max_attempts: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            log_p1: [34.3, 34.8],
            gamma1: [2.0, 4.0],
            gamma2: [2.0, 4.0],
            gamma3: [2.0, 4.0],
            max_density: 10f64.powf(15.2),
            max_attempts: 10000,
        }
    }
}

impl WalkerConfig {
    fn ranges(&self) -> [(&'static str, [f64; 2]); 4] {
        [
            ("log_p1", self.log_p1),
            ("gamma1", self.gamma1),
            ("gamma2", self.gamma2),
            ("gamma3", self.gamma3),
        ]
    }

    pub fn validate(&self) -> EosResult<()> {
        for (name, [lower, upper]) in self.ranges() {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(EosError::InvalidWalkerConfig(format!(
                    "empty range for {name}: [{lower}, {upper}]"
                )));
            }
            if !(upper - lower).is_finite() {
                return Err(EosError::InvalidWalkerConfig(format!(
                    "width of the range for {name} overflows: [{lower}, {upper}]"
                )));
            }
        }
        if !(self.max_density.is_finite() && self.max_density > 0.0) {
            return Err(EosError::InvalidWalkerConfig(format!(
                "max_density has to be positive, got {}",
                self.max_density
            )));
        }
        Ok(())
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SVector<f64, 4> {
        SVector::from(
            self.ranges()
                .map(|(_, [lower, upper])| rng.gen_range(lower..upper)),
        )
    }
}

/// Draw a causal starting point for a walker of the parameterization `M`.
pub fn initialize_walker<M: PolytropeParameterization, R: Rng + ?Sized>(
    rng: &mut R,
    config: &WalkerConfig,
) -> EosResult<SVector<f64, 4>> {
    config.validate()?;
    for attempt in 0..config.max_attempts {
        let parameters = M::convert_gamma_params(&config.sample(rng));
        match M::from_parameters(parameters) {
            Ok(eos) if eos.polytrope().is_causal(config.max_density) => return Ok(parameters),
            Ok(_) => trace!(attempt, "rejected acausal walker start"),
            Err(err) => trace!(attempt, %err, "rejected walker start"),
        }
    }
    Err(EosError::WalkerInitialization {
        model: M::MODEL,
        attempts: config.max_attempts,
    })
}

fn initialize_or_reference<M: PolytropeParameterization, R: Rng + ?Sized>(
    rng: &mut R,
    config: &WalkerConfig,
) -> Vec<f64> {
    let parameters = initialize_walker::<M, _>(rng, config).unwrap_or_else(|err| {
        warn!(%err, "falling back to the SLy reference parameters");
        M::convert_gamma_params(&SVector::from(SLY_REFERENCE_PARAMETERS))
    });
    parameters.as_slice().to_vec()
}

fn initialize_default<M: PolytropeParameterization>() -> Vec<f64> {
    initialize_or_reference::<M, _>(&mut rand::thread_rng(), &WalkerConfig::default())
}

/// Walker starting point `[log_p1, gamma1, gamma2, gamma3]`.
pub fn initialize_walker_piecewise_polytrope_gamma_params() -> Vec<f64> {
    initialize_default::<PiecewisePolytropeGammaParams>()
}

/// Walker starting point `[p0, p1, p2, p3]` in dyn/cm^2.
pub fn initialize_walker_piecewise_polytrope_p_params() -> Vec<f64> {
    initialize_default::<PiecewisePolytropePParams>()
}

/// Walker starting point `[log_p0, log_p1, log_p2, log_p3]`.
pub fn initialize_walker_piecewise_polytrope_log_p_params() -> Vec<f64> {
    initialize_default::<PiecewisePolytropeLogPParams>()
}
