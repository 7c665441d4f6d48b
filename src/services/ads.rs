//! Ad service: purchase validation, create/delete, and hydration.
//!
//! DESIGN
//! ======
//! The authoritative ad list lives in memory (`AppState.ads`) and is hydrated
//! from Postgres at startup. Every mutation takes the list's write lock, checks
//! the request against an [`Occupancy`] built from the current list, writes
//! through to Postgres, and only then updates the list and publishes an
//! [`AdEvent`]. Publishing happens under the same lock, and subscribers take a
//! snapshot under the read lock, so a feed never misses or reorders an event
//! relative to the snapshot it started from.
//!
//! ERROR HANDLING
//! ==============
//! The in-process lock makes create-if-free atomic for this server. Across
//! processes the `ad_plots.plot` primary key is the guard: a concurrent buyer
//! of the same plot fails with a unique violation, reported as
//! [`AdError::Overlap`]. Rows that fail to parse during hydration are skipped
//! and logged, never fatal.

use std::str::FromStr;

use grid::ad::Ad;
use grid::cell::{CellId, CellSet};
use grid::consts::MAX_MESSAGE_CHARS;
use grid::occupancy::Occupancy;
use grid::rect::is_rectangular;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::services::session::SessionUser;
use crate::state::AppState;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AdError {
    #[error("invalid purchase: {0}")]
    Invalid(String),
    #[error("selected plots do not form a solid rectangle")]
    NotRectangular,
    #[error("plots already taken: {}", format_cells(.0))]
    Overlap(Vec<CellId>),
    #[error("ad limit of {limit} reached")]
    QuotaExceeded { limit: usize },
    #[error("ad not found: {0}")]
    NotFound(Uuid),
    #[error("only administrators may do that")]
    Forbidden,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AdError {
    /// Stable machine-readable code for API clients.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid(_) => "E_AD_INVALID",
            Self::NotRectangular => "E_AD_NOT_RECTANGULAR",
            Self::Overlap(_) => "E_AD_OVERLAP",
            Self::QuotaExceeded { .. } => "E_AD_QUOTA",
            Self::NotFound(_) => "E_AD_NOT_FOUND",
            Self::Forbidden => "E_FORBIDDEN",
            Self::Database(_) => "E_DATABASE",
        }
    }
}

fn format_cells(cells: &[CellId]) -> String {
    cells.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Change to the ad list, fanned out to every live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdEvent {
    /// Full list, sent once when a feed opens or after it lagged.
    Snapshot { ads: Vec<Ad> },
    Created { ad: Ad },
    Deleted { ad_id: Uuid },
}

/// Purchase request as sent by the browser.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequest {
    pub plots: Vec<String>,
    pub message: String,
    pub image_url: String,
}

/// A purchase that passed every check that does not need the ad list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub plots: CellSet,
    pub message: String,
    pub image_url: String,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check a purchase request on its own.
///
/// # Errors
///
/// Returns [`AdError::Invalid`] for empty, malformed, or duplicate plot ids,
/// a blank or overlong message, or a missing image URL, and
/// [`AdError::NotRectangular`] when the plots do not fill their bounding box.
pub fn validate_purchase(req: &PurchaseRequest) -> Result<Purchase, AdError> {
    if req.plots.is_empty() {
        return Err(AdError::Invalid("select at least one plot".into()));
    }

    let mut plots = CellSet::new();
    for raw in &req.plots {
        let cell = CellId::from_str(raw).map_err(|e| AdError::Invalid(format!("plot {raw:?}: {e}")))?;
        if !plots.insert(cell) {
            return Err(AdError::Invalid(format!("plot {cell} listed twice")));
        }
    }
    if !is_rectangular(&plots) {
        return Err(AdError::NotRectangular);
    }

    let message = req.message.trim();
    if message.is_empty() {
        return Err(AdError::Invalid("message is required".into()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AdError::Invalid(format!("message is longer than {MAX_MESSAGE_CHARS} characters")));
    }

    let image_url = req.image_url.trim();
    if image_url.is_empty() {
        return Err(AdError::Invalid("image URL is required".into()));
    }
    if !(image_url.starts_with("https://") || image_url.starts_with("http://")) {
        return Err(AdError::Invalid("image URL must be http(s)".into()));
    }

    Ok(Purchase { plots, message: message.to_owned(), image_url: image_url.to_owned() })
}

/// Reject plots that any current ad already covers.
fn check_available(ads: &[Ad], plots: &CellSet) -> Result<(), AdError> {
    let taken = Occupancy::build(ads).overlapping(plots);
    if taken.is_empty() { Ok(()) } else { Err(AdError::Overlap(taken)) }
}

/// Reject a purchase that would put a non-admin over the per-user limit.
fn check_quota(ads: &[Ad], user: &SessionUser, limit: usize) -> Result<(), AdError> {
    if user.is_admin {
        return Ok(());
    }
    let owned = ads.iter().filter(|ad| ad.owner_id == Some(user.id)).count();
    if owned >= limit { Err(AdError::QuotaExceeded { limit }) } else { Ok(()) }
}

// =============================================================================
// LIST / FEED
// =============================================================================

/// Current ad list.
pub async fn list_ads(state: &AppState) -> Vec<Ad> {
    state.ads.read().await.clone()
}

/// Snapshot the list and subscribe to changes after it, with no gap between.
pub async fn subscribe(state: &AppState) -> (Vec<Ad>, broadcast::Receiver<AdEvent>) {
    let ads = state.ads.read().await;
    let rx = state.events.subscribe();
    (ads.clone(), rx)
}

fn publish(state: &AppState, event: AdEvent) {
    if state.events.send(event).is_err() {
        tracing::debug!("no live feeds to notify");
    }
}

// =============================================================================
// CREATE / DELETE
// =============================================================================

/// Book `purchase` for `user`.
///
/// # Errors
///
/// Returns [`AdError::Overlap`] when any plot is taken (here or, via the
/// database constraint, by another process), [`AdError::QuotaExceeded`] when
/// the user is at the limit, and [`AdError::Database`] on write failure.
pub async fn create_ad(state: &AppState, user: &SessionUser, purchase: Purchase) -> Result<Ad, AdError> {
    let mut ads = state.ads.write().await;
    check_available(&ads, &purchase.plots)?;
    check_quota(&ads, user, state.config.max_ads_per_user)?;

    let ad = Ad::new(Uuid::new_v4(), purchase.plots, purchase.image_url, purchase.message, Some(user.id));
    insert_ad(&state.pool, &ad).await.map_err(|e| insert_error(e, &ad.plots))?;

    ads.push(ad.clone());
    publish(state, AdEvent::Created { ad: ad.clone() });
    info!(ad_id = %ad.id, user_id = %user.id, plots = ad.plots.len(), "ad created");
    Ok(ad)
}

/// Remove an ad. Administrators only.
///
/// # Errors
///
/// Returns [`AdError::Forbidden`] for non-admins, [`AdError::NotFound`] for
/// an unknown id, and [`AdError::Database`] on write failure.
pub async fn delete_ad(state: &AppState, user: &SessionUser, ad_id: Uuid) -> Result<Ad, AdError> {
    if !user.is_admin {
        return Err(AdError::Forbidden);
    }

    let mut ads = state.ads.write().await;
    let index = ads.iter().position(|ad| ad.id == ad_id).ok_or(AdError::NotFound(ad_id))?;

    let deleted = sqlx::query("DELETE FROM ads WHERE id = $1")
        .bind(ad_id)
        .execute(&state.pool)
        .await?
        .rows_affected();
    if deleted == 0 {
        warn!(%ad_id, "ad missing from database; dropping in-memory copy");
    }

    let ad = ads.remove(index);
    publish(state, AdEvent::Deleted { ad_id });
    info!(%ad_id, user_id = %user.id, "ad deleted");
    Ok(ad)
}

fn insert_error(err: sqlx::Error, plots: &[CellId]) -> AdError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AdError::Overlap(plots.to_vec()),
        _ => AdError::Database(err),
    }
}

async fn insert_ad(pool: &PgPool, ad: &Ad) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO ads (id, owner_id, image_url, message) VALUES ($1, $2, $3, $4)")
        .bind(ad.id)
        .bind(ad.owner_id)
        .bind(&ad.image_url)
        .bind(&ad.message)
        .execute(&mut *tx)
        .await?;

    let plots: Vec<String> = ad.plots.iter().map(ToString::to_string).collect();
    sqlx::query("INSERT INTO ad_plots (plot, ad_id) SELECT plot, $2 FROM UNNEST($1::text[]) AS plot")
        .bind(&plots)
        .bind(ad.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

// =============================================================================
// HYDRATION
// =============================================================================

/// One `ads` row with its plots, before parsing.
#[derive(Debug, Clone)]
pub struct AdRow {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub image_url: String,
    pub message: String,
    pub plots: Vec<String>,
}

/// Turn a stored row into an ad, or say why it cannot be one.
///
/// # Errors
///
/// Returns a reason string for rows with no plots or unparseable plot ids.
pub fn ad_from_row(row: AdRow) -> Result<Ad, String> {
    if row.plots.is_empty() {
        return Err("no plots".into());
    }
    let plots = grid::cell::parse_all(&row.plots).map_err(|e| e.to_string())?;
    Ok(Ad::new(row.id, plots, row.image_url, row.message, row.owner_id))
}

async fn load_rows(pool: &PgPool) -> Result<Vec<AdRow>, sqlx::Error> {
    let rows = sqlx::query(
        r"SELECT a.id, a.owner_id, a.image_url, a.message,
                 COALESCE(array_agg(p.plot) FILTER (WHERE p.plot IS NOT NULL), '{}') AS plots
          FROM ads a
          LEFT JOIN ad_plots p ON p.ad_id = a.id
          GROUP BY a.id
          ORDER BY a.created_at, a.id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| -> Result<AdRow, sqlx::Error> {
            Ok(AdRow {
                id: r.try_get("id")?,
                owner_id: r.try_get("owner_id")?,
                image_url: r.try_get("image_url")?,
                message: r.try_get("message")?,
                plots: r.try_get("plots")?,
            })
        })
        .collect()
}

/// Load every stored ad into the in-memory list. Returns the number loaded.
///
/// # Errors
///
/// Returns [`AdError::Database`] if the query fails.
pub async fn hydrate(state: &AppState) -> Result<usize, AdError> {
    let rows = load_rows(&state.pool).await?;

    let mut loaded = Vec::with_capacity(rows.len());
    for row in rows {
        let ad_id = row.id;
        match ad_from_row(row) {
            Ok(ad) => loaded.push(ad),
            Err(reason) => warn!(%ad_id, %reason, "skipping malformed ad"),
        }
    }

    let occupancy = Occupancy::build(&loaded);
    for ad_id in occupancy.shadowed() {
        warn!(%ad_id, "stored ad overlaps a later ad");
    }

    let count = loaded.len();
    *state.ads.write().await = loaded;
    info!(count, occupied = occupancy.occupied_count(), "ads hydrated");
    Ok(count)
}

#[cfg(test)]
#[path = "ads_test.rs"]
mod tests;
