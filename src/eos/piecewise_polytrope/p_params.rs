use super::{
    PiecewisePolytrope, PiecewisePolytropeGammaParams, PolytropeParameterization,
    LOG_CORE_DENSITIES,
};
use crate::{EosError, EosModelName, EosResult};
use nalgebra::SVector;

/// log10 of the densities (g/cm^3) at which the pressures are specified.
///
/// The second and third entry coincide with the core dividing densities.
pub const LOG_PRESSURE_DENSITIES: [f64; 4] =
    [14.3, LOG_CORE_DENSITIES[0], LOG_CORE_DENSITIES[1], 15.3];

/// `[log_p1, gamma1, gamma2, gamma3]` from log10 pressures at [LOG_PRESSURE_DENSITIES].
fn gamma_params_from_log_pressures(log_p: &SVector<f64, 4>) -> EosResult<SVector<f64, 4>> {
    if log_p.iter().any(|p| !p.is_finite()) {
        return Err(EosError::InvalidParameters(format!(
            "pressures have to be finite and positive: {:?}",
            log_p.as_slice()
        )));
    }
    if log_p.as_slice().windows(2).any(|w| w[0] >= w[1]) {
        return Err(EosError::InvalidParameters(format!(
            "pressures have to increase with density: {:?}",
            log_p.as_slice()
        )));
    }
    let rho = LOG_PRESSURE_DENSITIES;
    let gamma = |i: usize| (log_p[i] - log_p[i - 1]) / (rho[i] - rho[i - 1]);
    Ok(SVector::from([log_p[1], gamma(1), gamma(2), gamma(3)]))
}

/// Core built from pressures at [LOG_PRESSURE_DENSITIES]; the first of these densities
/// has to lie above the crust-core transition.
fn polytrope_from_log_pressures(log_p: &SVector<f64, 4>) -> EosResult<PiecewisePolytrope<7>> {
    let gamma_params = gamma_params_from_log_pressures(log_p)?;
    let eos = *PiecewisePolytropeGammaParams::from_parameters(gamma_params)?.polytrope();
    let rho0 = eos.crust_core_density();
    if rho0 > 10f64.powf(LOG_PRESSURE_DENSITIES[0]) {
        return Err(EosError::InvalidParameters(format!(
            "crust-core transition at {rho0:e} g/cm^3 is above 10^{} g/cm^3",
            LOG_PRESSURE_DENSITIES[0]
        )));
    }
    Ok(eos)
}

/// log10 pressures at [LOG_PRESSURE_DENSITIES] of the core pieces.
fn log_pressures_from_gamma_params(gamma_params: &SVector<f64, 4>) -> SVector<f64, 4> {
    let rho = LOG_PRESSURE_DENSITIES;
    let [log_p1, gamma1, gamma2, gamma3] = gamma_params.data.0[0];
    let log_pa = log_p1 - gamma1 * (rho[1] - rho[0]);
    let log_p2 = log_p1 + gamma2 * (rho[2] - rho[1]);
    let log_p3 = log_p2 + gamma3 * (rho[3] - rho[2]);
    SVector::from([log_pa, log_p1, log_p2, log_p3])
}

/// Four-parameter piecewise polytrope described by the pressures (dyn/cm^2) at the
/// fixed densities [LOG_PRESSURE_DENSITIES].
///
/// The crust-core transition has to lie below the first of these densities, so
/// that every pressure is a pressure of the resulting equation of state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PiecewisePolytropePParams {
    parameters: SVector<f64, 4>,
    eos: PiecewisePolytrope<7>,
}

impl PolytropeParameterization for PiecewisePolytropePParams {
    const MODEL: EosModelName = EosModelName::PParams;
    const PARAMETER_NAMES: [&'static str; 4] = ["p0", "p1", "p2", "p3"];

    fn from_parameters(parameters: SVector<f64, 4>) -> EosResult<Self> {
        if parameters.iter().any(|&p| p.is_nan() || p <= 0.0) {
            return Err(EosError::InvalidParameters(format!(
                "pressures have to be finite and positive: {:?}",
                parameters.as_slice()
            )));
        }
        let eos = polytrope_from_log_pressures(&parameters.map(f64::log10))?;
        Ok(Self { parameters, eos })
    }

    fn parameters(&self) -> SVector<f64, 4> {
        self.parameters
    }

    fn polytrope(&self) -> &PiecewisePolytrope<7> {
        &self.eos
    }

    fn convert_gamma_params(gamma_params: &SVector<f64, 4>) -> SVector<f64, 4> {
        log_pressures_from_gamma_params(gamma_params).map(|log_p| 10f64.powf(log_p))
    }
}

/// Same as [PiecewisePolytropePParams] with pressures given as log10(dyn/cm^2).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PiecewisePolytropeLogPParams {
    parameters: SVector<f64, 4>,
    eos: PiecewisePolytrope<7>,
}

impl PolytropeParameterization for PiecewisePolytropeLogPParams {
    const MODEL: EosModelName = EosModelName::LogPParams;
    const PARAMETER_NAMES: [&'static str; 4] = ["log_p0", "log_p1", "log_p2", "log_p3"];

    fn from_parameters(parameters: SVector<f64, 4>) -> EosResult<Self> {
        let eos = polytrope_from_log_pressures(&parameters)?;
        Ok(Self { parameters, eos })
    }

    fn parameters(&self) -> SVector<f64, 4> {
        self.parameters
    }

    fn polytrope(&self) -> &PiecewisePolytrope<7> {
        &self.eos
    }

    fn convert_gamma_params(gamma_params: &SVector<f64, 4>) -> SVector<f64, 4> {
        log_pressures_from_gamma_params(gamma_params)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eos::SPEED_OF_LIGHT;
    use approx::assert_relative_eq;

    fn sly_gamma_params() -> SVector<f64, 4> {
        SVector::from([34.384, 3.005, 2.988, 2.851])
    }

    #[test]
    fn test_p_params() -> EosResult<()> {
        let pressures = PiecewisePolytropePParams::convert_gamma_params(&sly_gamma_params());
        let eos = PiecewisePolytropePParams::from_parameters(pressures)?;
        for (log_rho, p) in LOG_PRESSURE_DENSITIES.into_iter().zip(pressures.iter()) {
            let p_eos = eos.polytrope().pressure(10f64.powf(log_rho)) * SPEED_OF_LIGHT.powi(2);
            println!("{log_rho}: {p_eos:e} {p:e}");
            assert_relative_eq!(p_eos, *p, max_relative = 1e-10);
        }
        Ok(())
    }

    #[test]
    fn test_equivalent_parameterizations() -> EosResult<()> {
        let gamma = PiecewisePolytropeGammaParams::from_parameters(sly_gamma_params())?;
        let p = PiecewisePolytropePParams::from_parameters(
            PiecewisePolytropePParams::convert_gamma_params(&sly_gamma_params()),
        )?;
        let log_p = PiecewisePolytropeLogPParams::from_parameters(
            PiecewisePolytropeLogPParams::convert_gamma_params(&sly_gamma_params()),
        )?;
        for rho in [1e6, 1e12, 2e14, 6e14, 1.2e15, 3e15] {
            let p_ref = gamma.polytrope().pressure(rho);
            let e_ref = gamma.polytrope().energy_density(rho);
            assert_relative_eq!(p.polytrope().pressure(rho), p_ref, max_relative = 1e-10);
            assert_relative_eq!(log_p.polytrope().pressure(rho), p_ref, max_relative = 1e-10);
            assert_relative_eq!(
                log_p.polytrope().energy_density(rho),
                e_ref,
                max_relative = 1e-10
            );
        }
        assert_relative_eq!(log_p.index_parameter("log_p1")?, 34.384, max_relative = 1e-14);
        assert_relative_eq!(p.index_parameter("p1")?.log10(), 34.384, max_relative = 1e-14);
        Ok(())
    }

    #[test]
    fn test_invalid_pressures() {
        let p_params = [
            [0.0, 1e34, 1e35, 1e36],
            [1e33, 1e34, 1e34, 1e36],
            [1e33, f64::INFINITY, 1e35, 1e36],
        ];
        for parameters in p_params {
            let result = PiecewisePolytropePParams::from_parameters(SVector::from(parameters));
            assert!(matches!(result, Err(EosError::InvalidParameters(_))));
        }
        let result =
            PiecewisePolytropeLogPParams::from_parameters(SVector::from([33.5, 34.4, 34.2, 35.0]));
        assert!(matches!(result, Err(EosError::InvalidParameters(_))));
    }

    #[test]
    fn test_crust_above_first_pressure() -> EosResult<()> {
        // the core joins the crust at 2.5e14 g/cm^3, above 10^14.3 g/cm^3
        let gamma_params = SVector::from([34.3, 4.0, 3.0, 3.0]);
        let rho0 = PiecewisePolytropeGammaParams::from_parameters(gamma_params)?
            .polytrope()
            .crust_core_density();
        assert!(rho0 > 10f64.powf(LOG_PRESSURE_DENSITIES[0]));
        let p = PiecewisePolytropePParams::from_parameters(
            PiecewisePolytropePParams::convert_gamma_params(&gamma_params),
        );
        assert!(matches!(p, Err(EosError::InvalidParameters(_))));
        let log_p = PiecewisePolytropeLogPParams::from_parameters(
            PiecewisePolytropeLogPParams::convert_gamma_params(&gamma_params),
        );
        assert!(matches!(log_p, Err(EosError::InvalidParameters(_))));
        Ok(())
    }
}
