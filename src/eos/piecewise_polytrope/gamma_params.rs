use super::{PiecewisePolytrope, PolytropeParameterization};
use crate::{EosModelName, EosResult};
use nalgebra::SVector;

/// Four-parameter piecewise polytrope described by the pressure at the first core
/// dividing density and the three core adiabatic indices.
///
/// Parameters: `[log_p1, gamma1, gamma2, gamma3]` with `log_p1` in log10(dyn/cm^2).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PiecewisePolytropeGammaParams {
    parameters: SVector<f64, 4>,
    eos: PiecewisePolytrope<7>,
}

impl PiecewisePolytropeGammaParams {
    pub fn new(log_p1: f64, gamma1: f64, gamma2: f64, gamma3: f64) -> EosResult<Self> {
        Self::from_parameters(SVector::from([log_p1, gamma1, gamma2, gamma3]))
    }
}

impl PolytropeParameterization for PiecewisePolytropeGammaParams {
    const MODEL: EosModelName = EosModelName::GammaParams;
    const PARAMETER_NAMES: [&'static str; 4] = ["log_p1", "gamma1", "gamma2", "gamma3"];

    fn from_parameters(parameters: SVector<f64, 4>) -> EosResult<Self> {
        let eos = PiecewisePolytrope::with_sly_crust(
            parameters[0],
            [parameters[1], parameters[2], parameters[3]],
        )?;
        Ok(Self { parameters, eos })
    }

    fn parameters(&self) -> SVector<f64, 4> {
        self.parameters
    }

    fn polytrope(&self) -> &PiecewisePolytrope<7> {
        &self.eos
    }

    fn convert_gamma_params(gamma_params: &SVector<f64, 4>) -> SVector<f64, 4> {
        *gamma_params
    }
}
