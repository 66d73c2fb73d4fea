//! WebAssembly bindings for the temperament engine.
//!
//! Intervals cross the boundary as text in the notation of
//! [`crate::monzo::parse`]; sizes come back as cents.

use wasm_bindgen::prelude::*;

use crate::monzo::parse_fraction;
use crate::{parse_interval, parse_subgroup, ExtendedMonzo, Mapping};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&format!("{}", e))
}

/// Parse a `;`-separated interval list.
fn parse_list(list: &str, components: usize) -> Result<Vec<ExtendedMonzo>, JsError> {
    list.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_interval(s, components).map_err(js_error))
        .collect()
}

/// WebAssembly-friendly mapping wrapper.
#[wasm_bindgen]
pub struct WasmMapping {
    mapping: Mapping,
}

#[wasm_bindgen]
impl WasmMapping {
    /// Temper out `;`-separated commas over a subgroup like `2.3.5`.
    ///
    /// `constraints` uses the same list syntax and may be empty.
    #[wasm_bindgen(js_name = fromCommas)]
    pub fn from_commas(
        commas: &str,
        subgroup: &str,
        constraints: &str,
        components: usize,
    ) -> Result<WasmMapping, JsError> {
        let commas = parse_list(commas, components)?;
        let constraints = parse_list(constraints, components)?;
        let subgroup = parse_subgroup(subgroup).map_err(js_error)?;
        let mapping = Mapping::from_comma_list(&commas, &subgroup, None, &constraints).map_err(js_error)?;
        Ok(Self { mapping })
    }

    /// Patent val of `steps` equal divisions of `equave`.
    #[wasm_bindgen(js_name = fromPatentVal)]
    pub fn from_patent_val(steps: u32, equave: &str, components: usize) -> Result<WasmMapping, JsError> {
        let equave = parse_fraction(equave).map_err(js_error)?;
        let mapping = Mapping::from_patent_val(steps, &equave, &[], components).map_err(js_error)?;
        Ok(Self { mapping })
    }

    /// Tempered size of an interval in cents.
    #[wasm_bindgen]
    pub fn apply(&self, interval: &str) -> Result<f64, JsError> {
        let interval = parse_interval(interval, self.mapping.number_of_components()).map_err(js_error)?;
        let tempered = self.mapping.apply(&interval).map_err(js_error)?;
        Ok(tempered.total_cents())
    }

    /// Copy of this mapping with a just octave.
    #[wasm_bindgen(js_name = pureOctaves)]
    pub fn pure_octaves(&self) -> Result<WasmMapping, JsError> {
        let mapping = self.mapping.pure_octaves().map_err(js_error)?;
        Ok(Self { mapping })
    }

    /// Tempered size of every prime in cents.
    #[wasm_bindgen(js_name = temperedCents)]
    pub fn tempered_cents(&self) -> Vec<f64> {
        self.mapping.tempered_cents()
    }

    /// The full mapping as JSON.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.mapping).map_err(js_error)
    }
}

/// Size of an interval in cents.
#[wasm_bindgen(js_name = parseCents)]
pub fn parse_cents(interval: &str, components: usize) -> Result<f64, JsError> {
    let interval = parse_interval(interval, components).map_err(js_error)?;
    Ok(interval.total_cents())
}
