//! Mosque directory resolvers, including the radius search.

use super::geo::{BoundingBox, NEARBY_LIMIT};
use crate::models::{Masjid, MasjidFilter, NearbyMasjid, NearbyQuery};
use crate::storage::sqlite::{QueryParts, contains_pattern, key, real, text};
use crate::storage::{SqlValue, Store};
use crate::{Error, Result};
use rusqlite::Row;
use tracing::instrument;

fn masjid_from_row(row: &Row<'_>) -> rusqlite::Result<Masjid> {
    Ok(Masjid {
        id: key(row, "id")?,
        nama: text(row, "nama")?,
        deskripsi: text(row, "deskripsi")?,
        lokasi: text(row, "lokasi")?,
        latitude: real(row, "latitude")?,
        longitude: real(row, "longitude")?,
        jenis: text(row, "jenis")?,
        tipologi: text(row, "tipologi")?,
    })
}

fn nearby_from_row(row: &Row<'_>) -> rusqlite::Result<NearbyMasjid> {
    Ok(NearbyMasjid {
        masjid: masjid_from_row(row)?,
        distance: real(row, "distance")?.unwrap_or_default(),
    })
}

/// Builds the search statement for a filter.
fn search_query(filter: &MasjidFilter) -> (String, Vec<SqlValue>) {
    let mut parts = QueryParts::new();
    if let Some(search) = &filter.search {
        parts.filter(contains_pattern(search), |p| {
            format!("(nama LIKE {p} ESCAPE '\\' OR deskripsi LIKE {p} ESCAPE '\\')")
        });
    }
    if let Some(lokasi) = &filter.lokasi {
        parts.filter(contains_pattern(lokasi), |p| {
            format!("lokasi LIKE {p} ESCAPE '\\'")
        });
    }
    if let Some(jenis) = &filter.jenis {
        parts.filter(jenis.clone(), |p| format!("jenis = {p}"));
    }
    if let Some(tipologi) = &filter.tipologi {
        parts.filter(tipologi.clone(), |p| format!("tipologi = {p}"));
    }

    let sql = format!(
        "SELECT * FROM masjid{} ORDER BY CAST(id AS INTEGER)",
        parts.where_clause()
    );
    (sql, parts.into_params())
}

/// Builds the radius statement: bounding box, then exact distance.
fn nearby_query(query: &NearbyQuery) -> (String, Vec<SqlValue>) {
    let bbox = BoundingBox::around(query.lat, query.lng, query.radius_km);
    let mut parts = QueryParts::new();
    let lat = parts.bind(query.lat);
    let lng = parts.bind(query.lng);
    let (min_lat, max_lat) = (parts.bind(bbox.min_lat), parts.bind(bbox.max_lat));
    let (min_lng, max_lng) = (parts.bind(bbox.min_lng), parts.bind(bbox.max_lng));
    let radius = parts.bind(query.radius_km);
    let limit = parts.bind(i64::from(NEARBY_LIMIT));

    let sql = format!(
        "SELECT * FROM (\
            SELECT *, distance_km({lat}, {lng}, latitude, longitude) AS distance \
            FROM masjid \
            WHERE CAST(latitude AS REAL) BETWEEN {min_lat} AND {max_lat} \
            AND CAST(longitude AS REAL) BETWEEN {min_lng} AND {max_lng}\
         ) \
         WHERE distance <= {radius} \
         ORDER BY distance ASC, CAST(id AS INTEGER) \
         LIMIT {limit}"
    );
    (sql, parts.into_params())
}

/// Mosque lookups.
#[derive(Debug, Clone)]
pub struct MasjidService {
    store: Store,
}

impl MasjidService {
    /// Creates a new mosque service.
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Searches mosques. All set filters must match; no filter lists all.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: &MasjidFilter) -> Result<Vec<Masjid>> {
        let (sql, params) = search_query(filter);
        self.store
            .query_many("masjid_search", sql, params, masjid_from_row)
            .await
    }

    /// Returns one mosque.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when missing.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Masjid> {
        self.store
            .query_one(
                "masjid_get",
                "SELECT * FROM masjid WHERE id = ?1",
                vec![SqlValue::Text(id.to_string())],
                masjid_from_row,
            )
            .await?
            .ok_or_else(|| Error::NotFound(format!("masjid {id} not found")))
    }

    /// Returns up to 20 mosques within the radius, nearest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    #[instrument(skip(self))]
    pub async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyMasjid>> {
        let (sql, params) = nearby_query(query);
        self.store
            .query_many("masjid_nearby", sql, params, nearby_from_row)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_without_filters() {
        let (sql, params) = search_query(&MasjidFilter::default());
        assert_eq!(sql, "SELECT * FROM masjid ORDER BY CAST(id AS INTEGER)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_search_query_with_all_filters() {
        let filter = MasjidFilter {
            search: Some("50%".to_string()),
            lokasi: Some("Jakarta".to_string()),
            jenis: Some("Masjid".to_string()),
            tipologi: Some("Nasional".to_string()),
        };
        let (sql, params) = search_query(&filter);
        assert!(sql.contains("(nama LIKE ?1 ESCAPE '\\' OR deskripsi LIKE ?1 ESCAPE '\\')"));
        assert!(sql.contains("AND lokasi LIKE ?2 ESCAPE '\\'"));
        assert!(sql.contains("AND jenis = ?3 AND tipologi = ?4"));
        assert_eq!(params[0], SqlValue::Text("%50\\%%".to_string()));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_nearby_query_binds_everything() {
        let (sql, params) = nearby_query(&NearbyQuery {
            lat: -6.17,
            lng: 106.83,
            radius_km: 2.0,
        });
        assert!(!sql.contains("-6.17"));
        assert!(!sql.contains("106.83"));
        assert!(sql.contains("distance_km(?1, ?2, latitude, longitude)"));
        assert!(sql.contains("LIMIT ?8"));
        assert_eq!(params.len(), 8);
        assert_eq!(params[7], SqlValue::Integer(20));
    }
}
