//! Meteorological readings (`mesures`)

use sqlx::PgConnection;

use crate::db::row::{map_rows, RowObject};
use crate::db::DbError;
use crate::models::{ReadingLimit, StationCode};

/// Output columns, in select order.
pub const MEASUREMENT_COLUMNS: &[&str] = &[
    "id",
    "estacio_id",
    "instant",
    "temp_c",
    "sensacio_c",
    "punt_rosada_c",
    "humitat_pct",
    "solar_wm2",
    "uvi",
    "taxa_pluja_mm_h",
    "pluja_diaria_mm",
    "pluja_event_mm",
    "pluja_hora_mm",
    "pluja_setmana_mm",
    "pluja_mes_mm",
    "pluja_any_mm",
    "vent_ms",
    "vent_rafega_ms",
    "vent_direccio_graus",
    "pressio_rel_hpa",
    "pressio_abs_hpa",
    "bateria_pct",
    "extres",
];

// NUMERIC columns are cast so they decode without a decimal type.
const LATEST_SQL: &str = r#"
    SELECT
        m.id::int8,
        m.estacio_id::int8,
        m.instant,
        m.temp_c::float8,
        m.sensacio_c::float8,
        m.punt_rosada_c::float8,
        m.humitat_pct::int4,
        m.solar_wm2::float8,
        m.uvi::int4,
        m.taxa_pluja_mm_h::float8,
        m.pluja_diaria_mm::float8,
        m.pluja_event_mm::float8,
        m.pluja_hora_mm::float8,
        m.pluja_setmana_mm::float8,
        m.pluja_mes_mm::float8,
        m.pluja_any_mm::float8,
        m.vent_ms::float8,
        m.vent_rafega_ms::float8,
        m.vent_direccio_graus::int4,
        m.pressio_rel_hpa::float8,
        m.pressio_abs_hpa::float8,
        m.bateria_pct::int4,
        m.extres
    FROM mesures m
    WHERE $1::text IS NULL
       OR m.estacio_id = (SELECT e.id FROM estacions e WHERE e.codi = $1)
    ORDER BY m.instant DESC
    LIMIT $2
"#;

/// Measurement repository
pub struct MeasurementRepo<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> MeasurementRepo<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Newest readings first, optionally for one station.
    ///
    /// An unknown station yields an empty list.
    pub async fn latest(
        &mut self,
        limit: ReadingLimit,
        station: Option<&StationCode>,
    ) -> Result<Vec<RowObject>, DbError> {
        let rows = sqlx::query(LATEST_SQL)
            .bind(station.map(StationCode::as_str))
            .bind(limit.as_i64())
            .fetch_all(&mut *self.conn)
            .await?;

        map_rows(&rows, MEASUREMENT_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_list_matches_column_names() {
        let select = LATEST_SQL
            .split("SELECT")
            .nth(1)
            .and_then(|s| s.split("FROM mesures").next())
            .unwrap();
        let selected: Vec<&str> = select.split(',').map(str::trim).collect();

        assert_eq!(selected.len(), MEASUREMENT_COLUMNS.len());
        for (expr, name) in selected.iter().zip(MEASUREMENT_COLUMNS) {
            let column = expr.trim_start_matches("m.").split("::").next().unwrap();
            assert_eq!(column, *name);
        }
    }

    // Seeded-table tests live in tests/latest_readings.rs (require a database).
}
