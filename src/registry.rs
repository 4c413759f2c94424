//! Selection of equation of state models by name.
use crate::eos::{
    PiecewisePolytrope, PiecewisePolytropeGammaParams, PiecewisePolytropeLogPParams,
    PiecewisePolytropePParams, PolytropeParameterization,
};
use crate::walker::{
    initialize_walker, initialize_walker_piecewise_polytrope_gamma_params,
    initialize_walker_piecewise_polytrope_log_p_params,
    initialize_walker_piecewise_polytrope_p_params, WalkerConfig,
};
use crate::{EosError, EosResult};
use nalgebra::SVector;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Names of the supported equation of state models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EosModelName {
    #[serde(rename = "piecewise_polytrope_gamma_params")]
    GammaParams,
    #[serde(rename = "piecewise_polytrope_p_params")]
    PParams,
    #[serde(rename = "piecewise_polytrope_log_p_params")]
    LogPParams,
}

impl EosModelName {
    pub const ALL: [Self; 3] = [Self::GammaParams, Self::PParams, Self::LogPParams];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GammaParams => "piecewise_polytrope_gamma_params",
            Self::PParams => "piecewise_polytrope_p_params",
            Self::LogPParams => "piecewise_polytrope_log_p_params",
        }
    }

    pub fn model_type(self) -> &'static EosModelType {
        match self {
            Self::GammaParams => &GAMMA_PARAMS,
            Self::PParams => &P_PARAMS,
            Self::LogPParams => &LOG_P_PARAMS,
        }
    }

    pub fn initializer(self) -> fn() -> Vec<f64> {
        match self {
            Self::GammaParams => initialize_walker_piecewise_polytrope_gamma_params,
            Self::PParams => initialize_walker_piecewise_polytrope_p_params,
            Self::LogPParams => initialize_walker_piecewise_polytrope_log_p_params,
        }
    }
}

impl fmt::Display for EosModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EosModelName {
    type Err = EosError;

    fn from_str(s: &str) -> EosResult<Self> {
        Self::ALL
            .into_iter()
            .find(|model| model.as_str() == s)
            .ok_or_else(|| EosError::InvalidModelName(s.into()))
    }
}

/// An equation of state built from one of the supported parameterizations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EosModel {
    GammaParams(PiecewisePolytropeGammaParams),
    PParams(PiecewisePolytropePParams),
    LogPParams(PiecewisePolytropeLogPParams),
}

impl EosModel {
    pub fn name(&self) -> EosModelName {
        match self {
            Self::GammaParams(_) => EosModelName::GammaParams,
            Self::PParams(_) => EosModelName::PParams,
            Self::LogPParams(_) => EosModelName::LogPParams,
        }
    }

    pub fn parameters(&self) -> SVector<f64, 4> {
        match self {
            Self::GammaParams(eos) => eos.parameters(),
            Self::PParams(eos) => eos.parameters(),
            Self::LogPParams(eos) => eos.parameters(),
        }
    }

    pub fn polytrope(&self) -> &PiecewisePolytrope<7> {
        match self {
            Self::GammaParams(eos) => eos.polytrope(),
            Self::PParams(eos) => eos.polytrope(),
            Self::LogPParams(eos) => eos.polytrope(),
        }
    }

    pub fn index_parameter(&self, name: &str) -> EosResult<f64> {
        match self {
            Self::GammaParams(eos) => eos.index_parameter(name),
            Self::PParams(eos) => eos.index_parameter(name),
            Self::LogPParams(eos) => eos.index_parameter(name),
        }
    }
}

impl From<PiecewisePolytropeGammaParams> for EosModel {
    fn from(eos: PiecewisePolytropeGammaParams) -> Self {
        Self::GammaParams(eos)
    }
}

impl From<PiecewisePolytropePParams> for EosModel {
    fn from(eos: PiecewisePolytropePParams) -> Self {
        Self::PParams(eos)
    }
}

impl From<PiecewisePolytropeLogPParams> for EosModel {
    fn from(eos: PiecewisePolytropeLogPParams) -> Self {
        Self::LogPParams(eos)
    }
}

/// Reference to a model type that is instantiated with model specific parameters.
#[derive(Debug)]
pub struct EosModelType {
    name: EosModelName,
    parameter_names: [&'static str; 4],
    constructor: fn(SVector<f64, 4>) -> EosResult<EosModel>,
}

impl EosModelType {
    const fn of<M: PolytropeParameterization>() -> Self {
        Self {
            name: M::MODEL,
            parameter_names: M::PARAMETER_NAMES,
            constructor: construct::<M>,
        }
    }

    pub fn name(&self) -> EosModelName {
        self.name
    }

    pub fn parameter_names(&self) -> &[&'static str] {
        &self.parameter_names
    }

    pub fn instantiate(&self, parameters: &[f64]) -> EosResult<EosModel> {
        if parameters.len() != self.parameter_names.len() {
            return Err(EosError::InvalidParameters(format!(
                "{} expects {} parameters {:?}, got {}",
                self.name,
                self.parameter_names.len(),
                self.parameter_names,
                parameters.len()
            )));
        }
        (self.constructor)(SVector::from_column_slice(parameters))
    }
}

fn construct<M: PolytropeParameterization>(parameters: SVector<f64, 4>) -> EosResult<EosModel> {
    M::from_parameters(parameters).map(Into::into)
}

static GAMMA_PARAMS: EosModelType = EosModelType::of::<PiecewisePolytropeGammaParams>();
static P_PARAMS: EosModelType = EosModelType::of::<PiecewisePolytropePParams>();
static LOG_P_PARAMS: EosModelType = EosModelType::of::<PiecewisePolytropeLogPParams>();

/// Names accepted by [choose_eos_model] and [initialize_walker_eos_params].
pub fn eos_model_names() -> impl Iterator<Item = &'static str> {
    EosModelName::ALL.into_iter().map(|model| model.as_str())
}

fn parse_model_name(name: &str) -> EosResult<EosModelName> {
    name.parse()
        .inspect_err(|_| debug!(name, "unknown EOS model name"))
}

/// Get the type reference of the EOS model called `name`.
pub fn choose_eos_model(name: &str) -> EosResult<&'static EosModelType> {
    let model = parse_model_name(name)?;
    debug!(%model, "selected EOS model");
    Ok(model.model_type())
}

/// Draw a starting point in parameter space for an MCMC walker of the EOS model
/// called `name`.
pub fn initialize_walker_eos_params(name: &str) -> EosResult<Vec<f64>> {
    let model = parse_model_name(name)?;
    debug!(%model, "initializing walker");
    Ok(model.initializer()())
}

/// Same as [initialize_walker_eos_params] with an explicit random number generator
/// and walker configuration.
pub fn initialize_walker_eos_params_with<R: Rng + ?Sized>(
    name: &str,
    rng: &mut R,
    config: &WalkerConfig,
) -> EosResult<Vec<f64>> {
    let model = parse_model_name(name)?;
    debug!(%model, "initializing walker");
    let parameters = match model {
        EosModelName::GammaParams => {
            initialize_walker::<PiecewisePolytropeGammaParams, _>(rng, config)?
        }
        EosModelName::PParams => initialize_walker::<PiecewisePolytropePParams, _>(rng, config)?,
        EosModelName::LogPParams => {
            initialize_walker::<PiecewisePolytropeLogPParams, _>(rng, config)?
        }
    };
    Ok(parameters.as_slice().to_vec())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eos::SPEED_OF_LIGHT;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const NAMES: [&str; 3] = [
        "piecewise_polytrope_gamma_params",
        "piecewise_polytrope_p_params",
        "piecewise_polytrope_log_p_params",
    ];

    #[test]
    fn test_choose_eos_model() -> EosResult<()> {
        let expected = [
            EosModelName::GammaParams,
            EosModelName::PParams,
            EosModelName::LogPParams,
        ];
        for (name, model) in NAMES.into_iter().zip(expected) {
            let model_type = choose_eos_model(name)?;
            assert_eq!(model_type.name(), model);
            assert_eq!(model_type.name().to_string(), name);
            assert_eq!(model_type.parameter_names().len(), 4);
        }
        assert_eq!(
            choose_eos_model("piecewise_polytrope_gamma_params")?.parameter_names(),
            ["log_p1", "gamma1", "gamma2", "gamma3"]
        );
        Ok(())
    }

    #[test]
    fn test_invalid_model_name() {
        for name in ["not_a_real_model", "", "Piecewise_Polytrope_Gamma_Params"] {
            assert_eq!(
                choose_eos_model(name).err(),
                Some(EosError::InvalidModelName(name.into()))
            );
            assert_eq!(
                initialize_walker_eos_params(name),
                Err(EosError::InvalidModelName(name.into()))
            );
        }
        let err = choose_eos_model("not_a_real_model").unwrap_err();
        assert!(err.to_string().starts_with("EOS model name not valid"));
    }

    #[test]
    fn test_registry_symmetry() {
        let models: HashSet<_> = NAMES
            .into_iter()
            .filter(|name| choose_eos_model(name).is_ok())
            .collect();
        let initializers: HashSet<_> = NAMES
            .into_iter()
            .filter(|name| initialize_walker_eos_params(name).is_ok())
            .collect();
        assert_eq!(models, initializers);
        assert_eq!(models, eos_model_names().collect::<HashSet<_>>());
    }

    #[test]
    fn test_idempotent_lookup() -> EosResult<()> {
        for name in NAMES {
            assert!(std::ptr::eq(choose_eos_model(name)?, choose_eos_model(name)?));
        }
        Ok(())
    }

    #[test]
    fn test_instantiate() -> EosResult<()> {
        let gamma = choose_eos_model("piecewise_polytrope_gamma_params")?
            .instantiate(&[34.384, 3.005, 2.988, 2.851])?;
        assert_eq!(gamma.name(), EosModelName::GammaParams);
        assert_relative_eq!(gamma.index_parameter("gamma2")?, 2.988);

        let log_p = choose_eos_model("piecewise_polytrope_log_p_params")?
            .instantiate(gamma.parameters().as_slice());
        assert!(matches!(log_p, Err(EosError::InvalidParameters(_))));

        let p_params = [1.5e33, 2.4e34, 1.9e35, 1.4e36];
        let p = choose_eos_model("piecewise_polytrope_p_params")?.instantiate(&p_params)?;
        let p1 = p.polytrope().pressure(10f64.powf(14.7)) * SPEED_OF_LIGHT.powi(2);
        assert_relative_eq!(p1, 2.4e34, max_relative = 1e-10);

        let wrong_length =
            choose_eos_model("piecewise_polytrope_p_params")?.instantiate(&[1e34]);
        assert!(matches!(wrong_length, Err(EosError::InvalidParameters(_))));
        Ok(())
    }

    #[test]
    fn test_initialize_walker_eos_params() -> EosResult<()> {
        for name in NAMES {
            let parameters = initialize_walker_eos_params(name)?;
            println!("{name}: {parameters:?}");
            assert_eq!(parameters.len(), 4);
            assert!(parameters.iter().all(|p| p.is_finite()));
            let eos = choose_eos_model(name)?.instantiate(&parameters)?;
            assert!(eos.polytrope().is_causal(WalkerConfig::default().max_density));
        }
        Ok(())
    }

    #[test]
    fn test_seeded_initialization() -> EosResult<()> {
        let config = WalkerConfig::default();
        for name in NAMES {
            let mut rng = StdRng::seed_from_u64(7);
            let first = initialize_walker_eos_params_with(name, &mut rng, &config)?;
            let mut rng = StdRng::seed_from_u64(7);
            let second = initialize_walker_eos_params_with(name, &mut rng, &config)?;
            assert_eq!(first, second);
        }
        let mut rng = StdRng::seed_from_u64(7);
        let result = initialize_walker_eos_params_with("not_a_real_model", &mut rng, &config);
        assert_eq!(
            result,
            Err(EosError::InvalidModelName("not_a_real_model".into()))
        );
        Ok(())
    }

    #[test]
    fn test_serde_model_name() {
        let name: EosModelName =
            serde_json::from_str("\"piecewise_polytrope_log_p_params\"").unwrap();
        assert_eq!(name, EosModelName::LogPParams);
        assert_eq!(
            serde_json::to_string(&EosModelName::PParams).unwrap(),
            "\"piecewise_polytrope_p_params\""
        );
    }
}
