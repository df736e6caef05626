use std::collections::HashMap;

use crate::datatypes::Level;

/// Element label plus its units label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEntry {
    pub element: String,
    pub units: String,
}

impl ElementEntry {
    fn new(element: &str, units: &str) -> Self {
        Self {
            element: element.to_owned(),
            units: units.to_owned(),
        }
    }
}

/// Known (centre, model) pairs. Site configuration normally supplies
/// these; the defaults cover common originating centres.
const DEFAULT_MODELS: &[(u8, u8, &str)] = &[
    (54, 10, "gem"),
    (54, 35, "gem_global"),
    (54, 36, "gem_regional"),
    (7, 39, "nmc_ngm"),
    (7, 77, "nmc_avn"),
    (74, 21, "ukmet_global"),
    (98, 40, "ecmwf_ifs"),
];

/// Element and units labels from Table 5 of the 1989 Edition 0 document,
/// keyed by (parameter-table edition, parameter code).
const DEFAULT_ELEMENTS: &[(u8, u8, &str, &str)] = &[
    (0, 1, "pressure", "Pa"),
    (0, 2, "pressure_msl", "Pa"),
    (0, 6, "geopotential", "m2/s2"),
    (0, 7, "geopotential_height", "gpm"),
    (0, 8, "geometric_height", "m"),
    (0, 11, "temperature", "K"),
    (0, 17, "dew_point", "K"),
    (0, 18, "dew_point_depression", "K"),
    (0, 33, "u_wind", "m/s"),
    (0, 34, "v_wind", "m/s"),
    (0, 39, "vertical_velocity", "Pa/s"),
    (0, 40, "geometric_vertical_velocity", "m/s"),
    (0, 44, "vertical_wind_shear", "m/s/km"),
    (0, 52, "relative_humidity", "%"),
    (0, 61, "total_precipitation", "kg/m2"),
    (0, 80, "sea_temperature", "K"),
];

/// Level labels from Tables 6 and 7 for the types whose value octets
/// carry no numeric level.
const DEFAULT_LEVELS: &[(u8, &str)] = &[
    (1, "surface"),
    (2, "cloud_base"),
    (3, "cloud_top"),
    (4, "zero_deg_isotherm"),
    (6, "max_wind"),
    (7, "tropopause"),
    (102, "msl"),
    (200, "entire_atmosphere"),
];

/// Lookup tables injected into the pipeline: model labels by
/// (centre, model), element/units labels by (edition, parameter) with
/// per-source overrides, and level labels by level type.
#[derive(Debug, Clone)]
pub struct IngestTables {
    models: HashMap<(u8, u8), String>,
    elements: HashMap<(u8, u8), ElementEntry>,
    element_overrides: HashMap<(String, u8, u8), ElementEntry>,
    levels: HashMap<u8, String>,
}

impl IngestTables {
    /// Tables populated with the WMO defaults above.
    pub fn wmo_defaults() -> Self {
        let models = DEFAULT_MODELS
            .iter()
            .map(|&(centre, model, label)| ((centre, model), label.to_owned()))
            .collect();
        let elements = DEFAULT_ELEMENTS
            .iter()
            .map(|&(edition, parameter, element, units)| {
                ((edition, parameter), ElementEntry::new(element, units))
            })
            .collect();
        let levels = DEFAULT_LEVELS
            .iter()
            .map(|&(level_type, label)| (level_type, label.to_owned()))
            .collect();
        Self {
            models,
            elements,
            element_overrides: HashMap::new(),
            levels,
        }
    }

    /// Empty tables, for callers that inject a full site configuration.
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
            elements: HashMap::new(),
            element_overrides: HashMap::new(),
            levels: HashMap::new(),
        }
    }

    pub fn with_model(mut self, centre_id: u8, model_id: u8, label: &str) -> Self {
        self.models.insert((centre_id, model_id), label.to_owned());
        self
    }

    pub fn with_element(mut self, edition: u8, parameter: u8, element: &str, units: &str) -> Self {
        self.elements
            .insert((edition, parameter), ElementEntry::new(element, units));
        self
    }

    /// Overrides an element entry for fields from one source (model
    /// label).
    pub fn with_element_override(
        mut self,
        source: &str,
        edition: u8,
        parameter: u8,
        element: &str,
        units: &str,
    ) -> Self {
        self.element_overrides.insert(
            (source.to_owned(), edition, parameter),
            ElementEntry::new(element, units),
        );
        self
    }

    pub fn with_level(mut self, level_type: u8, label: &str) -> Self {
        self.levels.insert(level_type, label.to_owned());
        self
    }

    pub(crate) fn lookup_model(&self, centre_id: u8, model_id: u8) -> Option<&str> {
        self.models.get(&(centre_id, model_id)).map(String::as_str)
    }

    pub(crate) fn lookup_element(
        &self,
        source: &str,
        edition: u8,
        parameter: u8,
    ) -> Option<&ElementEntry> {
        self.element_overrides
            .get(&(source.to_owned(), edition, parameter))
            .or_else(|| self.elements.get(&(edition, parameter)))
    }

    pub(crate) fn lookup_level(&self, level_type: u8) -> Option<&str> {
        self.levels.get(&level_type).map(String::as_str)
    }
}

impl Default for IngestTables {
    fn default() -> Self {
        Self::wmo_defaults()
    }
}

/// Formats the level label for the types whose octets carry the level
/// value; `None` defers to the injected table.
pub(crate) fn format_coded_level(level: &Level) -> Option<String> {
    match level.level_type {
        // Isobaric level in hPa
        100 => Some(format!("{}mb", level.combined())),
        // Layer between two isobaric levels, coded in kPa
        101 => Some(format!(
            "{}-{}mb",
            u16::from(level.top) * 10,
            u16::from(level.bottom) * 10
        )),
        102 => Some("msl".to_owned()),
        // Sigma level times 100
        107 => Some(format!("{}sigma", level.combined() / 100)),
        // Layer between two sigma levels times 100
        108 => Some(format!("{}-{}sigma", level.top, level.bottom)),
        _ => None,
    }
}
