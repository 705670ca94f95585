//! Static legend of the depth colors.

use std::fmt::{Display, Formatter};

use crate::depth::DepthBand;
use crate::Color;

/// Corner of the map a control is anchored to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    /// Top left corner.
    TopLeft,
    /// Top right corner.
    TopRight,
    /// Bottom left corner.
    BottomLeft,
    /// Bottom right corner.
    #[default]
    BottomRight,
}

/// Color swatch with its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendRow {
    /// Color of the swatch.
    pub color: Color,
    /// Depth range of the band, e.g. `10–30 km`.
    pub label: String,
}

/// Legend listing every depth band with its color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    rows: Vec<LegendRow>,
    position: Corner,
}

impl Legend {
    /// One row per band. Bounded bands are labelled `lower–upper km`, the unbounded one
    /// `lower+ km`.
    pub fn from_bands(bands: &[DepthBand]) -> Self {
        let rows = bands
            .iter()
            .map(|band| LegendRow {
                color: band.color(),
                label: match band.upper() {
                    Some(upper) => format!("{}–{} km", band.lower(), upper),
                    None => format!("{}+ km", band.lower()),
                },
            })
            .collect();

        Self {
            rows,
            position: Corner::BottomRight,
        }
    }

    /// Rows in band order.
    pub fn rows(&self) -> &[LegendRow] {
        &self.rows
    }

    /// Corner the legend is shown in.
    pub fn position(&self) -> Corner {
        self.position
    }
}

impl Display for Legend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {}", row.color.to_hex6(), row.label)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::depth::DEPTH_BANDS;

    #[test]
    fn legend_of_depth_bands() {
        let legend = Legend::from_bands(&DEPTH_BANDS);
        assert_eq!(legend.rows().len(), 6);
        assert_eq!(legend.rows()[5].label, "90+ km");
        assert_eq!(legend.position(), Corner::BottomRight);

        assert_snapshot!(legend, @r"
        #00FF00 -10–10 km
        #ADFF2F 10–30 km
        #FFFF00 30–50 km
        #FFA500 50–70 km
        #FF4500 70–90 km
        #FF0000 90+ km
        ");
    }

    #[test]
    fn empty_band_list() {
        assert!(Legend::from_bands(&[]).rows().is_empty());
    }
}
