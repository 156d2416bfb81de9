//! Defines the ERA5 single-levels variables used for wind resource assessment.

use std::fmt;

/// Represents one retrievable ERA5 single-levels variable.
///
/// The default retrieval set ([`Variable::default_set`]) is the quartet
/// needed to derive hub-height wind speed and air density: the 100 m wind
/// components, 2 m temperature, and surface pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Eastward component of the wind at 100 m above the surface, m/s.
    WindU100,
    /// Northward component of the wind at 100 m above the surface, m/s.
    WindV100,
    /// Air temperature at 2 m above the surface, kelvin.
    Temperature2m,
    /// Pressure at the surface, pascals.
    SurfacePressure,
}

impl Variable {
    /// The long name the archive expects in retrieval requests.
    pub(crate) fn api_name(&self) -> &'static str {
        match self {
            Variable::WindU100 => "100m_u_component_of_wind",
            Variable::WindV100 => "100m_v_component_of_wind",
            Variable::Temperature2m => "2m_temperature",
            Variable::SurfacePressure => "surface_pressure",
        }
    }

    /// The short column name the archive uses in flattened exports.
    pub(crate) fn column(&self) -> &'static str {
        match self {
            Variable::WindU100 => "u100",
            Variable::WindV100 => "v100",
            Variable::Temperature2m => "t2m",
            Variable::SurfacePressure => "sp",
        }
    }

    /// The variables required by the derived-metrics pipeline.
    pub fn default_set() -> Vec<Variable> {
        vec![
            Variable::WindU100,
            Variable::WindV100,
            Variable::Temperature2m,
            Variable::SurfacePressure,
        ]
    }
}

/// Formats a `Variable` using its archive request name.
///
/// # Examples
///
/// ```
/// use era5_density::Variable;
///
/// assert_eq!(Variable::Temperature2m.to_string(), "2m_temperature");
/// ```
impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_covers_derived_metrics_inputs() {
        let set = Variable::default_set();
        assert_eq!(set.len(), 4);
        assert!(set.contains(&Variable::WindU100));
        assert!(set.contains(&Variable::WindV100));
        assert!(set.contains(&Variable::Temperature2m));
        assert!(set.contains(&Variable::SurfacePressure));
    }

    #[test]
    fn columns_match_archive_short_names() {
        assert_eq!(Variable::WindU100.column(), "u100");
        assert_eq!(Variable::WindV100.column(), "v100");
        assert_eq!(Variable::Temperature2m.column(), "t2m");
        assert_eq!(Variable::SurfacePressure.column(), "sp");
    }
}
