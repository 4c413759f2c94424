use crate::{EosError, EosModelName, EosResult};
use nalgebra::SVector;
use ndarray::Array1;
use num_dual::{first_derivative, Dual64, DualNum};
use quantity::{MassDensity, Pressure, KILOGRAM, METER, PASCAL};
use std::iter;

mod gamma_params;
mod p_params;
pub use gamma_params::PiecewisePolytropeGammaParams;
pub use p_params::{
    PiecewisePolytropeLogPParams, PiecewisePolytropePParams, LOG_PRESSURE_DENSITIES,
};

/// Speed of light in cm/s.
pub const SPEED_OF_LIGHT: f64 = 2.99792458e10;

// 1 dyn/cm^2 in Pa
const DYN_PER_CM2: f64 = 0.1;

fn gram_per_cubic_centimeter() -> MassDensity {
    1e3 * KILOGRAM / (METER * METER * METER)
}

// SLy crust fit (Read et al., PRD 79, 124032, 2009), p/c^2 and rho in g/cm^3
pub const SLY_CRUST_K0: f64 = 6.80110e-9;
pub const SLY_CRUST_GAMMA: [f64; 4] = [1.58425, 1.28733, 0.62223, 1.35692];
pub const SLY_CRUST_DENSITIES: [f64; 3] = [2.44034e7, 3.78358e11, 2.62780e12];

/// log10 of the core dividing densities in g/cm^3.
pub const LOG_CORE_DENSITIES: [f64; 2] = [14.7, 15.0];

const CAUSALITY_GRID_START: f64 = 10.0;
const CAUSALITY_GRID_POINTS: usize = 200;

/// Cold barotropic equation of state made of `N` polytropic pieces.
///
/// Rest-mass density, energy density and pressure are all expressed in g/cm^3,
/// i.e. the pressure is stored as p/c^2. On piece `i` the pressure is
/// `K_i rho^Gamma_i` and the energy density
/// `(1 + a_i) rho + K_i / (Gamma_i - 1) rho^Gamma_i`, with `a_i` chosen so that the
/// energy density is continuous.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PiecewisePolytrope<const N: usize> {
    rho_lower: [f64; N],
    k: [f64; N],
    gamma: [f64; N],
    a: [f64; N],
}

impl<const N: usize> PiecewisePolytrope<N> {
    /// Piecewise polytrope from the lower dividing densities (starting at zero),
    /// coefficients and adiabatic indices of every piece.
    pub fn new(rho_lower: [f64; N], k: [f64; N], gamma: [f64; N]) -> EosResult<Self> {
        if rho_lower.first() != Some(&0.0) {
            return Err(EosError::InvalidParameters(
                "the first piece has to start at zero density".into(),
            ));
        }
        if rho_lower.iter().any(|rho| rho.is_nan())
            || rho_lower.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(EosError::InvalidParameters(format!(
                "dividing densities are not strictly increasing: {rho_lower:?}"
            )));
        }
        if k.iter().any(|&k| !(k.is_finite() && k > 0.0)) {
            return Err(EosError::InvalidParameters(format!(
                "polytropic coefficients have to be positive: {k:?}"
            )));
        }
        if gamma.iter().any(|&g| !g.is_finite() || g == 1.0) {
            return Err(EosError::InvalidParameters(format!(
                "adiabatic indices have to be finite and different from 1: {gamma:?}"
            )));
        }

        let mut a = [0.0; N];
        for i in 1..N {
            let rho = rho_lower[i];
            let epsilon = (1.0 + a[i - 1]) * rho
                + k[i - 1] / (gamma[i - 1] - 1.0) * rho.powf(gamma[i - 1]);
            a[i] = epsilon / rho - 1.0 - k[i] / (gamma[i] - 1.0) * rho.powf(gamma[i] - 1.0);
        }
        Ok(Self {
            rho_lower,
            k,
            gamma,
            a,
        })
    }

    /// Piecewise polytrope with continuous pressure, fixed by the coefficient of
    /// the first piece.
    pub fn continuous(rho_lower: [f64; N], k0: f64, gamma: [f64; N]) -> EosResult<Self> {
        let mut k = [k0; N];
        for i in 1..N {
            k[i] = k[i - 1] * rho_lower[i].powf(gamma[i - 1] - gamma[i]);
        }
        Self::new(rho_lower, k, gamma)
    }

    pub fn dividing_densities(&self) -> &[f64] {
        &self.rho_lower[1..]
    }

    pub fn gamma(&self) -> &[f64; N] {
        &self.gamma
    }

    pub fn k(&self) -> &[f64; N] {
        &self.k
    }

    fn piece(&self, density: f64) -> usize {
        self.rho_lower
            .iter()
            .rposition(|&rho| density >= rho)
            .unwrap_or(0)
    }

    /// Pressure p/c^2 in g/cm^3.
    pub fn pressure<D: DualNum<f64> + Copy>(&self, density: D) -> D {
        let i = self.piece(density.re());
        density.powf(self.gamma[i]) * self.k[i]
    }

    /// Total energy density in g/cm^3.
    pub fn energy_density<D: DualNum<f64> + Copy>(&self, density: D) -> D {
        let i = self.piece(density.re());
        density * (1.0 + self.a[i])
            + density.powf(self.gamma[i]) * (self.k[i] / (self.gamma[i] - 1.0))
    }

    /// Squared speed of sound in units of c^2.
    pub fn sound_speed_squared(&self, density: f64) -> f64 {
        let (_, dp) = first_derivative(|rho: Dual64| self.pressure(rho), density);
        let (_, de) = first_derivative(|rho: Dual64| self.energy_density(rho), density);
        dp / de
    }

    /// Whether the speed of sound stays below the speed of light up to `max_density`.
    pub fn is_causal(&self, max_density: f64) -> bool {
        let grid = Array1::logspace(
            10.0,
            CAUSALITY_GRID_START,
            max_density.log10(),
            CAUSALITY_GRID_POINTS,
        );
        // the speed of sound is largest just below a dividing density
        let edges = self
            .dividing_densities()
            .iter()
            .filter(|&&rho| rho < max_density)
            .map(|&rho| rho * (1.0 - 1e-12));
        grid.iter()
            .copied()
            .chain(edges)
            .chain(iter::once(max_density))
            .all(|rho| self.sound_speed_squared(rho) <= 1.0)
    }

    /// Pressure and energy density on a density grid.
    pub fn tabulate(&self, densities: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        (
            densities.mapv(|rho| self.pressure(rho)),
            densities.mapv(|rho| self.energy_density(rho)),
        )
    }

    pub fn pressure_si(&self, density: MassDensity) -> Pressure {
        let rho = density.convert_into(gram_per_cubic_centimeter());
        self.pressure(rho) * SPEED_OF_LIGHT.powi(2) * DYN_PER_CM2 * PASCAL
    }

    /// Energy density expressed as a pressure, i.e. epsilon c^2.
    pub fn energy_density_si(&self, density: MassDensity) -> Pressure {
        let rho = density.convert_into(gram_per_cubic_centimeter());
        self.energy_density(rho) * SPEED_OF_LIGHT.powi(2) * DYN_PER_CM2 * PASCAL
    }
}

impl PiecewisePolytrope<7> {
    /// Three core pieces attached to the four-piece SLy crust.
    ///
    /// `log_p1` is log10 of the pressure in dyn/cm^2 at the first core dividing
    /// density. The crust-core transition is placed where the last crust piece
    /// intersects the first core piece.
    pub fn with_sly_crust(log_p1: f64, core_gamma: [f64; 3]) -> EosResult<Self> {
        if !log_p1.is_finite() {
            return Err(EosError::InvalidParameters(format!(
                "log_p1 has to be finite, got {log_p1}"
            )));
        }
        if core_gamma.iter().any(|&g| !(g > 1.0 && g.is_finite())) {
            return Err(EosError::InvalidParameters(format!(
                "core adiabatic indices have to be larger than 1: {core_gamma:?}"
            )));
        }
        let [rho1, rho2] = LOG_CORE_DENSITIES.map(|log_rho| 10f64.powf(log_rho));
        let [gamma1, gamma2, gamma3] = core_gamma;

        let k_crust = SLY_CRUST_DENSITIES
            .iter()
            .zip(SLY_CRUST_GAMMA.windows(2))
            .fold(SLY_CRUST_K0, |k, (rho, g)| k * rho.powf(g[0] - g[1]));
        let k1 = 10f64.powf(log_p1) / SPEED_OF_LIGHT.powi(2) / rho1.powf(gamma1);
        let rho0 = (k_crust / k1).powf((gamma1 - SLY_CRUST_GAMMA[3]).recip());
        if !(SLY_CRUST_DENSITIES[2] < rho0 && rho0 < rho1) {
            return Err(EosError::InvalidParameters(format!(
                "crust-core transition at {rho0:e} g/cm^3 is outside of ({:e}, {rho1:e})",
                SLY_CRUST_DENSITIES[2]
            )));
        }

        let [c0, c1, c2] = SLY_CRUST_DENSITIES;
        let [g0, g1, g2, g3] = SLY_CRUST_GAMMA;
        Self::continuous(
            [0.0, c0, c1, c2, rho0, rho1, rho2],
            SLY_CRUST_K0,
            [g0, g1, g2, g3, gamma1, gamma2, gamma3],
        )
    }

    /// Density in g/cm^3 at which the crust is joined to the first core piece.
    pub fn crust_core_density(&self) -> f64 {
        self.rho_lower[4]
    }
}

/// A four-parameter description of the core of a neutron star on top of the SLy crust.
///
/// Every parameterization can be converted from the adiabatic-index form
/// ([PiecewisePolytropeGammaParams]), which is used to draw walker starting points.
pub trait PolytropeParameterization: Sized + Into<crate::EosModel> {
    const MODEL: EosModelName;
    const PARAMETER_NAMES: [&'static str; 4];

    fn from_parameters(parameters: SVector<f64, 4>) -> EosResult<Self>;

    fn parameters(&self) -> SVector<f64, 4>;

    fn polytrope(&self) -> &PiecewisePolytrope<7>;

    /// Express `[log_p1, gamma1, gamma2, gamma3]` in this parameterization.
    fn convert_gamma_params(gamma_params: &SVector<f64, 4>) -> SVector<f64, 4>;

    fn index_parameter(&self, name: &str) -> EosResult<f64> {
        Self::PARAMETER_NAMES
            .iter()
            .position(|&p| p == name)
            .map(|i| self.parameters()[i])
            .ok_or_else(|| EosError::InvalidParameterName {
                model: Self::MODEL,
                name: name.into(),
            })
    }
}
