use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::matches::{Match, Opinion, RosterSlot, Side, Team, Vote};
use crate::models::player::PlayerId;

#[derive(FromRow)]
struct MatchRow {
    id: Uuid,
    tournament_id: Uuid,
    match_number: i32,
    played_on: Option<NaiveDate>,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(FromRow)]
struct SlotRow {
    match_id: Uuid,
    side: String,
    player_id: PlayerId,
    goals: i32,
}

#[derive(FromRow)]
struct VoteRow {
    match_id: Uuid,
    user_id: Uuid,
    user_name: String,
    player_voted_for: PlayerId,
    voted_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct OpinionRow {
    id: Uuid,
    match_id: Uuid,
    user_id: Uuid,
    user_name: String,
    content: String,
    created_at: DateTime<Utc>,
}

/// A live (not soft-deleted) match with rosters, votes and opinions.
pub async fn find_match(
    pool: &PgPool,
    tournament_id: Uuid,
    match_number: i32,
) -> Result<Option<Match>, sqlx::Error> {
    let row = sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT id, tournament_id, match_number, played_on, deleted_at
        FROM matches
        WHERE tournament_id = $1 AND match_number = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(tournament_id)
    .bind(match_number)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(load_children(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

/// Every live match of a tournament, ordered by match number.
pub async fn list_matches(pool: &PgPool, tournament_id: Uuid) -> Result<Vec<Match>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MatchRow>(
        r#"
        SELECT id, tournament_id, match_number, played_on, deleted_at
        FROM matches
        WHERE tournament_id = $1 AND deleted_at IS NULL
        ORDER BY match_number ASC
        "#,
    )
    .bind(tournament_id)
    .fetch_all(pool)
    .await?;

    load_children(pool, rows).await
}

pub async fn latest_match_number(
    pool: &PgPool,
    tournament_id: Uuid,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<i32>>(
        r#"
        SELECT MAX(match_number)
        FROM matches
        WHERE tournament_id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(tournament_id)
    .fetch_one(pool)
    .await
}

/// Creates the next match of the tournament with the given rosters.
/// `None` when the tournament does not exist.
///
/// The tournament row is locked for the transaction so concurrent creates
/// are numbered one after the other.
pub async fn create_match(
    pool: &PgPool,
    tournament_id: Uuid,
    played_on: Option<NaiveDate>,
    oscuras: &Team,
    claras: &Team,
) -> Result<Option<Match>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let tournament = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM tournaments WHERE id = $1 FOR UPDATE",
    )
    .bind(tournament_id)
    .fetch_optional(&mut *tx)
    .await?;

    if tournament.is_none() {
        return Ok(None);
    }

    let next_number: i32 = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT COALESCE(MAX(match_number), 0) + 1
        FROM matches
        WHERE tournament_id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(tournament_id)
    .fetch_one(&mut *tx)
    .await?;

    let match_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO matches (id, tournament_id, match_number, played_on)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(match_id)
    .bind(tournament_id)
    .bind(next_number)
    .bind(played_on)
    .execute(&mut *tx)
    .await?;

    insert_slots(&mut tx, match_id, oscuras).await?;
    insert_slots(&mut tx, match_id, claras).await?;

    tx.commit().await?;

    tracing::info!("Created match {} in tournament {}", next_number, tournament_id);

    Ok(Some(Match {
        id: match_id,
        tournament_id,
        match_number: next_number,
        date: played_on,
        oscuras: oscuras.clone(),
        claras: claras.clone(),
        player_of_the_match_votes: Vec::new(),
        opinions: Vec::new(),
        deleted_at: None,
    }))
}

/// Overwrites both rosters of a live match. `false` when the match is absent.
///
/// Votes for players no longer on either roster are dropped in the same
/// transaction.
pub async fn save_roster(
    pool: &PgPool,
    tournament_id: Uuid,
    match_number: i32,
    oscuras: &Team,
    claras: &Team,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let match_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM matches
        WHERE tournament_id = $1 AND match_number = $2 AND deleted_at IS NULL
        FOR UPDATE
        "#,
    )
    .bind(tournament_id)
    .bind(match_number)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(match_id) = match_id else {
        return Ok(false);
    };

    sqlx::query("DELETE FROM match_roster_slots WHERE match_id = $1")
        .bind(match_id)
        .execute(&mut *tx)
        .await?;

    insert_slots(&mut tx, match_id, oscuras).await?;
    insert_slots(&mut tx, match_id, claras).await?;

    let rostered: Vec<Uuid> = oscuras
        .players
        .iter()
        .chain(&claras.players)
        .map(|slot| slot.player_id.as_uuid())
        .collect();

    let dropped = sqlx::query(
        r#"
        DELETE FROM match_votes
        WHERE match_id = $1 AND player_voted_for <> ALL($2)
        "#,
    )
    .bind(match_id)
    .bind(&rostered)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    if dropped > 0 {
        tracing::info!("Dropped {} votes for players removed from match {}", dropped, match_number);
    }
    Ok(true)
}

pub async fn soft_delete_match(pool: &PgPool, match_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE matches
        SET deleted_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(match_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_slots(
    tx: &mut Transaction<'_, Postgres>,
    match_id: Uuid,
    team: &Team,
) -> Result<(), sqlx::Error> {
    for (position, slot) in team.players.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO match_roster_slots (match_id, side, position, player_id, goals)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(match_id)
        .bind(team.team.as_str())
        .bind(position as i32)
        .bind(slot.player_id)
        .bind(slot.goals)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn load_children(pool: &PgPool, rows: Vec<MatchRow>) -> Result<Vec<Match>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let slots = sqlx::query_as::<_, SlotRow>(
        r#"
        SELECT match_id, side, player_id, goals
        FROM match_roster_slots
        WHERE match_id = ANY($1)
        ORDER BY match_id, side, position ASC
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let votes = sqlx::query_as::<_, VoteRow>(
        r#"
        SELECT match_id, user_id, user_name, player_voted_for, voted_at
        FROM match_votes
        WHERE match_id = ANY($1)
        ORDER BY voted_at ASC
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let opinions = sqlx::query_as::<_, OpinionRow>(
        r#"
        SELECT id, match_id, user_id, user_name, content, created_at
        FROM match_opinions
        WHERE match_id = ANY($1)
        ORDER BY created_at ASC
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    assemble(rows, slots, votes, opinions)
}

fn assemble(
    rows: Vec<MatchRow>,
    slots: Vec<SlotRow>,
    votes: Vec<VoteRow>,
    opinions: Vec<OpinionRow>,
) -> Result<Vec<Match>, sqlx::Error> {
    let mut matches: Vec<Match> = rows
        .into_iter()
        .map(|row| Match {
            id: row.id,
            tournament_id: row.tournament_id,
            match_number: row.match_number,
            date: row.played_on,
            oscuras: Team::empty(Side::Oscuras),
            claras: Team::empty(Side::Claras),
            player_of_the_match_votes: Vec::new(),
            opinions: Vec::new(),
            deleted_at: row.deleted_at,
        })
        .collect();
    let index: HashMap<Uuid, usize> = matches.iter().enumerate().map(|(i, m)| (m.id, i)).collect();

    for slot in slots {
        let Some(&i) = index.get(&slot.match_id) else { continue };
        let side: Side = slot.side.parse().map_err(sqlx::Error::Protocol)?;
        let team = match side {
            Side::Oscuras => &mut matches[i].oscuras,
            Side::Claras => &mut matches[i].claras,
        };
        team.players.push(RosterSlot::new(slot.player_id, slot.goals));
    }

    for vote in votes {
        let Some(&i) = index.get(&vote.match_id) else { continue };
        let match_number = matches[i].match_number;
        matches[i].player_of_the_match_votes.push(Vote {
            user_id: vote.user_id,
            user_name: vote.user_name,
            player_voted_for: vote.player_voted_for,
            match_number,
            voted_at: vote.voted_at,
        });
    }

    for opinion in opinions {
        let Some(&i) = index.get(&opinion.match_id) else { continue };
        matches[i].opinions.push(Opinion {
            id: opinion.id,
            user_id: opinion.user_id,
            user_name: opinion.user_name,
            content: opinion.content,
            created_at: opinion.created_at,
        });
    }

    Ok(matches)
}
