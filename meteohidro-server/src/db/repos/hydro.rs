//! Hydrological readings (`lectures_hidro` joined with `estacions_hidro`)

use sqlx::PgConnection;

use crate::db::row::{map_rows, RowObject};
use crate::db::DbError;
use crate::models::{ReadingLimit, StationCode};

/// Output columns, in select order.
pub const HYDRO_COLUMNS: &[&str] = &[
    "id",
    "instant",
    "cabal_m3s",
    "capacitat_pct",
    "nivell_m",
    "extres",
    "codi",
    "nom",
    "tipus",
    "estacio_id",
];

const LATEST_SQL: &str = r#"
    SELECT
        h.id::int8,
        h.instant,
        h.cabal_m3s::float8,
        h.capacitat_pct::float8,
        h.nivell_m::float8,
        h.extres,
        e.codi::text,
        e.nom::text,
        e.tipus::text,
        e.id::int8
    FROM lectures_hidro h
    JOIN estacions_hidro e ON e.id = h.estacio_id
    WHERE $1::text IS NULL OR e.codi = $1
    ORDER BY h.instant DESC
    LIMIT $2
"#;

/// Hydro reading repository
pub struct HydroRepo<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> HydroRepo<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Newest river-flow / reservoir readings first, with their site.
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

        map_rows(&rows, HYDRO_COLUMNS)
    }
}
