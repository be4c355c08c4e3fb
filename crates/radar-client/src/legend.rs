// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reflectivity color scale, strongest echoes first.

/// One band of the reflectivity legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    /// dBZ range label, e.g. `"45-50"`.
    pub dbz: &'static str,
    /// Swatch color as RGB.
    pub rgb: [u8; 3],
    pub label: &'static str,
}

impl LegendEntry {
    const fn new(dbz: &'static str, rgb: [u8; 3], label: &'static str) -> Self {
        Self { dbz, rgb, label }
    }

    /// Color as `#RRGGBB`.
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

/// Legend title.
pub const LEGEND_TITLE: &str = "Reflectivity (dBZ)";

/// Legend bands in display order, top to bottom.
pub const LEGEND: [LegendEntry; 11] = [
    LegendEntry::new("70+", [0x80, 0x40, 0xFF], "Extreme"),
    LegendEntry::new("60-70", [0xFF, 0x00, 0xFF], "Severe"),
    LegendEntry::new("55-60", [0xC0, 0x00, 0x00], "Very Heavy"),
    LegendEntry::new("50-55", [0xFF, 0x80, 0x00], "Heavy"),
    LegendEntry::new("45-50", [0xFF, 0xC0, 0x00], "Mod-Heavy"),
    LegendEntry::new("40-45", [0xFF, 0xFF, 0x00], "Moderate"),
    LegendEntry::new("35-40", [0x00, 0x64, 0x00], "Light-Mod"),
    LegendEntry::new("30-35", [0x00, 0x90, 0x00], "Light"),
    LegendEntry::new("25-30", [0x00, 0xC0, 0x00], "Very Light"),
    LegendEntry::new("20-25", [0x00, 0xEC, 0xEC], "Drizzle"),
    LegendEntry::new("10-20", [0x40, 0xA8, 0xFF], "Trace"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_order_and_colors() {
        let rows: Vec<(&str, String, &str)> = LEGEND
            .iter()
            .map(|e| (e.dbz, e.hex(), e.label))
            .collect();

        assert_eq!(rows[0], ("70+", "#8040FF".to_string(), "Extreme"));
        assert_eq!(rows[5], ("40-45", "#FFFF00".to_string(), "Moderate"));
        assert_eq!(rows[6], ("35-40", "#006400".to_string(), "Light-Mod"));
        assert_eq!(rows[9], ("20-25", "#00ECEC".to_string(), "Drizzle"));
        assert_eq!(rows[10], ("10-20", "#40A8FF".to_string(), "Trace"));
    }
}
