use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuakeMapError;
use crate::layer::attribution::Attribution;
use crate::tile_schema::TileIndex;

/// Definition of a base map tile service.
///
/// The url template may contain `{s}` (subdomain), `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSource {
    name: String,
    url_template: String,
    subdomains: Vec<String>,
    max_zoom: u32,
    attribution: Attribution,
}

impl TileSource {
    /// Creates a new tile source.
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        subdomains: &[&str],
        max_zoom: u32,
        attribution: Attribution,
    ) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            subdomains: subdomains.iter().map(|s| (*s).to_owned()).collect(),
            max_zoom,
            attribution,
        }
    }

    /// OpenStreetMap standard tiles.
    pub fn street() -> Self {
        Self::new(
            "Street",
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            &["a", "b", "c"],
            18,
            Attribution::new(
                "© OpenStreetMap contributors",
                Some("https://www.openstreetmap.org/copyright"),
            ),
        )
    }

    /// Google satellite imagery with labels.
    pub fn satellite() -> Self {
        Self::new(
            "Satellite",
            "https://{s}.google.com/vt/lyrs=s,h&x={x}&y={y}&z={z}",
            &["mt0", "mt1", "mt2", "mt3"],
            18,
            Attribution::new(
                "© Google Maps contributors",
                Some("https://maps.google.com/"),
            ),
        )
    }

    /// OpenTopoMap topographic tiles.
    pub fn topographic() -> Self {
        Self::new(
            "Topographic",
            "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            &["a", "b", "c"],
            17,
            Attribution::new(
                "Map data: © OpenStreetMap contributors, SRTM | Map style: © OpenTopoMap (CC-BY-SA)",
                Some("https://opentopomap.org"),
            ),
        )
    }

    /// Display name of the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template the tile urls are built from.
    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    /// Deepest zoom level the service provides.
    pub fn max_zoom(&self) -> u32 {
        self.max_zoom
    }

    /// Credits of the tile service.
    pub fn attribution(&self) -> &Attribution {
        &self.attribution
    }

    /// Subdomain used for the tile. Neighboring tiles go to different subdomains.
    pub fn subdomain(&self, index: TileIndex) -> Option<&str> {
        if self.subdomains.is_empty() {
            return None;
        }

        let position = (index.x as i64 + index.y as i64).unsigned_abs() as usize;
        Some(&self.subdomains[position % self.subdomains.len()])
    }

    /// Url of the tile with the given index.
    pub fn url(&self, index: TileIndex) -> Result<String, QuakeMapError> {
        let mut vars = HashMap::from([
            ("z".to_owned(), index.z.to_string()),
            ("x".to_owned(), index.x.to_string()),
            ("y".to_owned(), index.y.to_string()),
        ]);
        if let Some(subdomain) = self.subdomain(index) {
            vars.insert("s".to_owned(), subdomain.to_owned());
        }

        Ok(strfmt::strfmt(&self.url_template, &vars)?)
    }
}

/// The base maps offered by the layer control.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseLayerKind {
    /// OpenStreetMap.
    #[default]
    Street,
    /// Satellite imagery.
    Satellite,
    /// OpenTopoMap.
    Topographic,
}

impl BaseLayerKind {
    /// All base maps in the order they are listed in the layer control.
    pub const ALL: [BaseLayerKind; 3] = [Self::Street, Self::Satellite, Self::Topographic];

    /// Tile source of the base map.
    pub fn source(&self) -> TileSource {
        match self {
            Self::Street => TileSource::street(),
            Self::Satellite => TileSource::satellite(),
            Self::Topographic => TileSource::topographic(),
        }
    }

    /// Position of the base map in [`BaseLayerKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Street => 0,
            Self::Satellite => 1,
            Self::Topographic => 2,
        }
    }
}

impl Display for BaseLayerKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Street => "street",
            Self::Satellite => "satellite",
            Self::Topographic => "topographic",
        };
        f.write_str(name)
    }
}

impl FromStr for BaseLayerKind {
    type Err = QuakeMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "street" => Ok(Self::Street),
            "satellite" => Ok(Self::Satellite),
            "topographic" | "topo" => Ok(Self::Topographic),
            _ => Err(QuakeMapError::Configuration(format!(
                "unknown base layer '{s}', expected one of street, satellite, topographic"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn street_url() {
        let source = TileSource::street();
        assert_eq!(
            source.url(TileIndex::new(3, 5, 4)).unwrap(),
            "https://c.tile.openstreetmap.org/4/3/5.png"
        );
        assert_eq!(
            source.url(TileIndex::new(0, 0, 0)).unwrap(),
            "https://a.tile.openstreetmap.org/0/0/0.png"
        );
    }

    #[test]
    fn satellite_url() {
        let source = TileSource::satellite();
        assert_eq!(
            source.url(TileIndex::new(1, 2, 2)).unwrap(),
            "https://mt3.google.com/vt/lyrs=s,h&x=1&y=2&z=2"
        );
        assert_eq!(source.subdomain(TileIndex::new(2, 2, 2)), Some("mt0"));
    }

    #[test]
    fn topographic_url() {
        let source = TileSource::topographic();
        assert_eq!(
            source.url(TileIndex::new(1, 0, 1)).unwrap(),
            "https://b.tile.opentopomap.org/1/1/0.png"
        );
        assert_eq!(source.max_zoom(), 17);
    }

    #[test]
    fn missing_subdomains() {
        let plain = TileSource::new(
            "plain",
            "https://tiles.example.com/{z}/{x}/{y}.png",
            &[],
            10,
            Attribution::new("example", None),
        );
        assert_eq!(
            plain.url(TileIndex::new(1, 1, 1)).unwrap(),
            "https://tiles.example.com/1/1/1.png"
        );

        let broken = TileSource::new(
            "broken",
            "https://{s}.example.com/{z}/{x}/{y}.png",
            &[],
            10,
            Attribution::new("example", None),
        );
        assert!(matches!(
            broken.url(TileIndex::new(1, 1, 1)),
            Err(QuakeMapError::UrlTemplate(_))
        ));
    }

    #[test]
    fn base_layer_kind_parsing() {
        assert_eq!("street".parse::<BaseLayerKind>().unwrap(), BaseLayerKind::Street);
        assert_eq!(
            "Satellite".parse::<BaseLayerKind>().unwrap(),
            BaseLayerKind::Satellite
        );
        assert_eq!(
            "topo".parse::<BaseLayerKind>().unwrap(),
            BaseLayerKind::Topographic
        );
        assert!("terrain".parse::<BaseLayerKind>().is_err());

        for kind in BaseLayerKind::ALL {
            assert_eq!(kind.to_string().parse::<BaseLayerKind>().unwrap(), kind);
            assert_eq!(BaseLayerKind::ALL[kind.index()], kind);
        }
    }

    #[test]
    fn base_layer_names() {
        let names: Vec<_> = BaseLayerKind::ALL
            .iter()
            .map(|kind| kind.source().name().to_owned())
            .collect();
        assert_eq!(names, ["Street", "Satellite", "Topographic"]);
    }
}
