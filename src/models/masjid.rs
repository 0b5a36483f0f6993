//! Mosque directory records and queries.

use serde::{Deserialize, Serialize};

/// A mosque or prayer room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Masjid {
    /// Record id.
    pub id: String,
    /// Name.
    pub nama: Option<String>,
    /// Description.
    pub deskripsi: Option<String>,
    /// Address or region.
    pub lokasi: Option<String>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Kind: `Masjid` or `Mushalla`.
    pub jenis: Option<String>,
    /// Typology (e.g. `Nasional`, `Raya`, `Agung`, `Jami`).
    pub tipologi: Option<String>,
}

/// A mosque with its distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyMasjid {
    /// The mosque.
    #[serde(flatten)]
    pub masjid: Masjid,
    /// Great-circle distance in kilometres.
    pub distance: f64,
}

/// Optional mosque search filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasjidFilter {
    /// Substring of the name or description.
    pub search: Option<String>,
    /// Substring of the location.
    pub lokasi: Option<String>,
    /// Exact kind.
    pub jenis: Option<String>,
    /// Exact typology.
    pub tipologi: Option<String>,
}

impl MasjidFilter {
    /// Returns true when no filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.lokasi.is_none()
            && self.jenis.is_none()
            && self.tipologi.is_none()
    }
}

/// A radius search around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyQuery {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Radius in kilometres.
    pub radius_km: f64,
}
