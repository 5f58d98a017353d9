use super::{from_millis, parse_text, read_error, to_millis, write_error, SqliteStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    Announcement, AnnouncementKind, AnnouncementStyle, Offer, OfferAction, OfferActionKind,
    OfferKind, OfferStyle, TrustScore,
};
use crate::repositories::traits::{
    AnnouncementRepository, OfferRepository, TrustScoreRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rusqlite::{params, Connection, OptionalExtension, Row};

const TRUST_SCORE_COLUMNS: &str = "id, user_id, last_apu_score, max_apu_score, trust_bonus,
     last_apu_calculation_time, max_apu_calculation_time, created_on, modified_on";

const OFFER_COLUMNS: &str = "id, from_name, from_link, title, description, url, valid_from,
     valid_to, key, style, persona_id, created_by, public, view_count, created_on, modified_on";

const ANNOUNCEMENT_COLUMNS: &str =
    "id, key, title, description, valid_from, valid_to, rank, style, created_on, modified_on";

fn trust_score_from_row(row: &Row<'_>) -> rusqlite::Result<TrustScore> {
    Ok(TrustScore {
        id: row.get(0)?,
        user_id: row.get(1)?,
        last_apu_score: parse_text::<Decimal>(2, row.get(2)?)?,
        max_apu_score: parse_text::<Decimal>(3, row.get(3)?)?,
        trust_bonus: parse_text::<Decimal>(4, row.get(4)?)?,
        last_apu_calculation_time: from_millis(5, row.get(5)?)?,
        max_apu_calculation_time: from_millis(6, row.get(6)?)?,
        created_on: from_millis(7, row.get(7)?)?,
        modified_on: from_millis(8, row.get(8)?)?,
    })
}

fn offer_from_row(row: &Row<'_>) -> rusqlite::Result<Offer> {
    Ok(Offer {
        id: row.get(0)?,
        from_name: row.get(1)?,
        from_link: row.get(2)?,
        title: row.get(3)?,
        desc: row.get(4)?,
        url: row.get(5)?,
        valid_from: from_millis(6, row.get(6)?)?,
        valid_to: from_millis(7, row.get(7)?)?,
        key: parse_text::<OfferKind>(8, row.get(8)?)?,
        style: parse_text::<OfferStyle>(9, row.get(9)?)?,
        persona_id: row.get(10)?,
        created_by: row.get(11)?,
        public: row.get::<_, i32>(12)? != 0,
        view_count: row.get(13)?,
        created_on: from_millis(14, row.get(14)?)?,
        modified_on: from_millis(15, row.get(15)?)?,
    })
}

fn offer_action_from_row(row: &Row<'_>) -> rusqlite::Result<OfferAction> {
    Ok(OfferAction {
        id: row.get(0)?,
        profile_id: row.get(1)?,
        offer_id: row.get(2)?,
        what: parse_text::<OfferActionKind>(3, row.get(3)?)?,
        created_on: from_millis(4, row.get(4)?)?,
    })
}

fn announcement_from_row(row: &Row<'_>) -> rusqlite::Result<Announcement> {
    Ok(Announcement {
        id: row.get(0)?,
        key: parse_text::<AnnouncementKind>(1, row.get(1)?)?,
        title: row.get(2)?,
        desc: row.get(3)?,
        valid_from: from_millis(4, row.get(4)?)?,
        valid_to: from_millis(5, row.get(5)?)?,
        rank: row.get(6)?,
        style: parse_text::<AnnouncementStyle>(7, row.get(7)?)?,
        created_on: from_millis(8, row.get(8)?)?,
        modified_on: from_millis(9, row.get(9)?)?,
    })
}

fn load_trust_score(conn: &Connection, id: i64) -> StoreResult<TrustScore> {
    conn.query_row(
        &format!("SELECT {} FROM trust_scores WHERE id = ?1", TRUST_SCORE_COLUMNS),
        params![id],
        trust_score_from_row,
    )
    .optional()
    .map_err(read_error)?
    .ok_or_else(|| StoreError::NotFound(format!("trust score {}", id)))
}

fn load_offer(conn: &Connection, id: i64) -> StoreResult<Offer> {
    conn.query_row(
        &format!("SELECT {} FROM offers WHERE id = ?1", OFFER_COLUMNS),
        params![id],
        offer_from_row,
    )
    .optional()
    .map_err(read_error)?
    .ok_or_else(|| StoreError::NotFound(format!("offer {}", id)))
}

#[async_trait]
impl TrustScoreRepository for SqliteStore {
    async fn create_trust_score(&self, score: &TrustScore) -> StoreResult<TrustScore> {
        score.validate()?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO trust_scores
             (user_id, last_apu_score, max_apu_score, trust_bonus,
              last_apu_calculation_time, max_apu_calculation_time, created_on, modified_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                score.user_id,
                score.last_apu_score.to_string(),
                score.max_apu_score.to_string(),
                score.trust_bonus.to_string(),
                to_millis(score.last_apu_calculation_time),
                to_millis(score.max_apu_calculation_time),
                to_millis(score.created_on),
                to_millis(score.modified_on),
            ],
        )
        .map_err(|e| write_error(e, "trust_scores.user_id"))?;

        load_trust_score(&conn, conn.last_insert_rowid())
    }

    async fn trust_score_for_user(&self, user_id: i64) -> StoreResult<Option<TrustScore>> {
        let conn = self.conn()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM trust_scores WHERE user_id = ?1",
                TRUST_SCORE_COLUMNS
            ),
            params![user_id],
            trust_score_from_row,
        )
        .optional()
        .map_err(read_error)
    }

    async fn update_trust_score(&self, score: &TrustScore) -> StoreResult<TrustScore> {
        score.validate()?;

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE trust_scores SET
                last_apu_score = ?2, max_apu_score = ?3, trust_bonus = ?4,
                last_apu_calculation_time = ?5, max_apu_calculation_time = ?6,
                modified_on = ?7
             WHERE id = ?1",
            params![
                score.id,
                score.last_apu_score.to_string(),
                score.max_apu_score.to_string(),
                score.trust_bonus.to_string(),
                to_millis(score.last_apu_calculation_time),
                to_millis(score.max_apu_calculation_time),
                to_millis(Utc::now()),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("trust score {}", score.id)));
        }

        load_trust_score(&conn, score.id)
    }
}

#[async_trait]
impl OfferRepository for SqliteStore {
    async fn create_offer(&self, offer: &Offer) -> StoreResult<Offer> {
        offer
            .validate()
            .map_err(|e| StoreError::Invalid(e.to_string()))?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO offers
             (from_name, from_link, title, description, url, valid_from, valid_to, key, style,
              persona_id, created_by, public, view_count, created_on, modified_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                offer.from_name,
                offer.from_link,
                offer.title,
                offer.desc,
                offer.url,
                to_millis(offer.valid_from),
                to_millis(offer.valid_to),
                offer.key.as_str(),
                offer.style.to_string(),
                offer.persona_id,
                offer.created_by,
                offer.public as i32,
                offer.view_count,
                to_millis(offer.created_on),
                to_millis(offer.modified_on),
            ],
        )
        .map_err(|e| write_error(e, "offers"))?;

        load_offer(&conn, conn.last_insert_rowid())
    }

    async fn get_offer(&self, id: i64) -> StoreResult<Offer> {
        let conn = self.conn()?;
        load_offer(&conn, id)
    }

    async fn current_offers(&self, now: DateTime<Utc>) -> StoreResult<Vec<Offer>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM offers
             WHERE valid_from <= ?1 AND valid_to > ?1 AND public = 1
             ORDER BY id",
            OFFER_COLUMNS
        ))?;
        let rows = stmt.query_map(params![to_millis(now)], offer_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(read_error)
    }

    async fn increment_view_count(&self, id: i64) -> StoreResult<Offer> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE offers SET view_count = view_count + 1 WHERE id = ?1",
            params![id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("offer {}", id)));
        }
        load_offer(&conn, id)
    }

    async fn record_offer_action(
        &self,
        profile_id: i64,
        offer_id: i64,
        what: OfferActionKind,
    ) -> StoreResult<OfferAction> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO offer_actions (profile_id, offer_id, what, created_on)
             VALUES (?1, ?2, ?3, ?4)",
            params![profile_id, offer_id, what.as_str(), to_millis(Utc::now())],
        )
        .map_err(|e| write_error(e, "offer_actions"))?;

        conn.query_row(
            "SELECT id, profile_id, offer_id, what, created_on FROM offer_actions WHERE id = ?1",
            params![conn.last_insert_rowid()],
            offer_action_from_row,
        )
        .map_err(read_error)
    }

    async fn actions_for_offer(&self, offer_id: i64) -> StoreResult<Vec<OfferAction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, profile_id, offer_id, what, created_on
             FROM offer_actions WHERE offer_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![offer_id], offer_action_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(read_error)
    }
}

#[async_trait]
impl AnnouncementRepository for SqliteStore {
    async fn create_announcement(
        &self,
        announcement: &Announcement,
    ) -> StoreResult<Announcement> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO announcements
             (key, title, description, valid_from, valid_to, rank, style, created_on, modified_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                announcement.key.as_str(),
                announcement.title,
                announcement.desc,
                to_millis(announcement.valid_from),
                to_millis(announcement.valid_to),
                announcement.rank,
                announcement.style.as_str(),
                to_millis(announcement.created_on),
                to_millis(announcement.modified_on),
            ],
        )
        .map_err(|e| write_error(e, "announcements"))?;

        conn.query_row(
            &format!(
                "SELECT {} FROM announcements WHERE id = ?1",
                ANNOUNCEMENT_COLUMNS
            ),
            params![conn.last_insert_rowid()],
            announcement_from_row,
        )
        .map_err(read_error)
    }

    async fn current_announcements(&self, now: DateTime<Utc>) -> StoreResult<Vec<Announcement>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM announcements
             WHERE valid_from <= ?1 AND valid_to > ?1
             ORDER BY rank DESC, id",
            ANNOUNCEMENT_COLUMNS
        ))?;
        let rows = stmt.query_map(params![to_millis(now)], announcement_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(read_error)
    }
}
