//! Text shown when a marker is selected.

use std::fmt::{Display, Formatter};

use crate::feed::EarthquakeFeature;

const UNKNOWN: &str = "unknown";

/// One `label: value` line of a popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupRow {
    /// Bold part of the row.
    pub label: &'static str,
    /// Value of the row.
    pub value: String,
}

/// Popup content of a marker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Popup {
    rows: Vec<PopupRow>,
    link: Option<String>,
}

impl Popup {
    /// Popup of an earthquake: magnitude, depth, place and time of the event.
    pub fn for_earthquake(feature: &EarthquakeFeature) -> Self {
        let magnitude = feature
            .magnitude
            .map_or_else(|| UNKNOWN.to_owned(), |mag| mag.to_string());
        let depth = feature
            .depth
            .map_or_else(|| UNKNOWN.to_owned(), |depth| format!("{depth} km"));
        let place = feature.place.clone().unwrap_or_else(|| UNKNOWN.to_owned());
        let time = feature.time.map_or_else(
            || UNKNOWN.to_owned(),
            |time| time.format("%a %b %d %Y %H:%M:%S UTC").to_string(),
        );

        Self {
            rows: vec![
                PopupRow {
                    label: "Magnitude",
                    value: magnitude,
                },
                PopupRow {
                    label: "Depth",
                    value: depth,
                },
                PopupRow {
                    label: "Location",
                    value: place,
                },
                PopupRow {
                    label: "Time",
                    value: time,
                },
            ],
            link: feature.url.clone(),
        }
    }

    /// Rows of the popup in display order.
    pub fn rows(&self) -> &[PopupRow] {
        &self.rows
    }

    /// Optional link to more details.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

impl Display for Popup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, row) in self.rows.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", row.label, row.value)?;
        }

        Ok(())
    }
}
