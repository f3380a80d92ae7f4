//! Site-wide blocks of scalar parameters.

use crate::codec::{check_fraction, check_positive, check_within, scalar_block, Validate};
use crate::ConfigError;

scalar_block! {
    /// Parameters of the LUMPS surface energy balance scheme.
    pub struct LumpsParams {
        /// Limit of rain for full surface wetting [mm].
        raincover: f64 = 0.25,
        /// Maximum water bucket reservoir [mm].
        rainmaxres: f64 = 0.25,
        /// Drainage rate of the water bucket.
        drainrt: f64 = 0.25,
        /// Vegetation phenology scheme.
        veg_type: i32 = 1,
    }
}

impl Validate for LumpsParams {
    fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("lumps.raincover", self.raincover.value)?;
        check_within("lumps.rainmaxres", self.rainmaxres.value, 0.0, 20.0, "within [0, 20]")?;
        check_fraction("lumps.drainrt", self.drainrt.value)
    }
}

scalar_block! {
    /// Parameters of the SPARTACUS-Surface radiation scheme.
    pub struct SpartacusParams {
        /// Longwave extinction coefficient of air [m-1].
        air_ext_lw: f64 = 0.0,
        /// Shortwave extinction coefficient of air [m-1].
        air_ext_sw: f64 = 0.0,
        /// Longwave single scattering albedo of air.
        air_ssa_lw: f64 = 0.5,
        /// Shortwave single scattering albedo of air.
        air_ssa_sw: f64 = 0.5,
        /// Multiplier of the direct ground albedo.
        ground_albedo_dir_mult_fact: f64 = 1.0,
        /// Longwave streams per hemisphere in the urban canopy.
        n_stream_lw_urban: i32 = 2,
        /// Shortwave streams per hemisphere in the urban canopy.
        n_stream_sw_urban: i32 = 2,
        /// Vegetation regions in the urban canopy.
        n_vegetation_region_urban: i32 = 1,
        /// Direct fraction of downward shortwave radiation.
        sw_dn_direct_frac: f64 = 0.5,
        /// Whether the direct albedo is used for shortwave radiation.
        use_sw_direct_albedo: f64 = 1.0,
        /// Vegetation contact fraction.
        veg_contact_fraction_const: f64 = 0.5,
        /// Fractional standard deviation of vegetation extinction.
        veg_fsd_const: f64 = 0.5,
        /// Longwave single scattering albedo of vegetation.
        veg_ssa_lw: f64 = 0.5,
        /// Shortwave single scattering albedo of vegetation.
        veg_ssa_sw: f64 = 0.5,
    }
}

impl Validate for SpartacusParams {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("spartacus.air_ssa_lw", self.air_ssa_lw.value),
            ("spartacus.air_ssa_sw", self.air_ssa_sw.value),
            ("spartacus.sw_dn_direct_frac", self.sw_dn_direct_frac.value),
            ("spartacus.veg_ssa_lw", self.veg_ssa_lw.value),
            ("spartacus.veg_ssa_sw", self.veg_ssa_sw.value),
        ] {
            check_fraction(field, value)?;
        }
        Ok(())
    }
}

scalar_block! {
    /// Surface conductance model.
    pub struct Conductance {
        /// Maximum conductance [mm s-1].
        g_max: f64 = 40.0,
        /// Shortwave radiation dependence.
        g_k: f64 = 0.6,
        /// Base value of the humidity dependence.
        g_q_base: f64 = 0.03,
        /// Shape of the humidity dependence.
        g_q_shape: f64 = 0.9,
        /// Air temperature dependence.
        g_t: f64 = 30.0,
        /// Soil moisture dependence.
        g_sm: f64 = 0.5,
        /// Maximum incoming shortwave radiation [W m-2].
        kmax: f64 = 1200.0,
        /// Stomatal conductance formulation.
        gsmodel: i32 = 1,
        /// Lower soil moisture threshold.
        s1: f64 = 0.2,
        /// Upper soil moisture threshold [mm].
        s2: f64 = 0.5,
        /// Lower air temperature threshold [degC].
        tl: f64 = 0.0,
        /// Upper air temperature threshold [degC].
        th: f64 = 50.0,
    }
}

impl Validate for Conductance {
    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("conductance.g_max", self.g_max.value)?;
        check_positive("conductance.kmax", self.kmax.value)
    }
}
