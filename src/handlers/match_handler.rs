use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::jwt::AdminUser;
use crate::db::{matches, players, tournaments::resolve_tournament_id};
use crate::error::AppError;
use crate::handlers::tournament_for_match;
use crate::matchday::roster::{authorize_deletion, RosterDraft};
use crate::matchday::stats::{match_outcome, team_percentage_sum, MatchOutcome, TeamPercentages};
use crate::matchday::votes::{most_voted, most_voted_in, tally_votes, VoteTally};
use crate::models::common::{ApiResponse, TournamentQuery};
use crate::models::matches::{CreateMatchRequest, DeleteMatchQuery, Match, SaveRosterRequest};
use crate::models::player::PlayerId;
use crate::services::player_stats::load_players_with_stats;

#[derive(Debug, Serialize)]
pub struct MatchSummary {
    pub match_number: i32,
    pub date: Option<NaiveDate>,
    pub oscuras_goals: i32,
    pub claras_goals: i32,
    pub result: MatchOutcome,
    pub most_voted: Vec<PlayerId>,
}

impl From<&Match> for MatchSummary {
    fn from(m: &Match) -> Self {
        Self {
            match_number: m.match_number,
            date: m.date,
            oscuras_goals: m.oscuras.goals(),
            claras_goals: m.claras.goals(),
            result: match_outcome(m),
            most_voted: most_voted(m),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MatchDetail {
    #[serde(rename = "match")]
    pub game: Match,
    pub result: MatchOutcome,
    pub vote_tally: VoteTally,
    pub most_voted: Vec<PlayerId>,
    pub team_percentages: TeamPercentages,
    pub team_percentage_averages: TeamPercentages,
}

/// Rejects rosters naming players that were never registered.
async fn ensure_registered(pool: &PgPool, draft: &RosterDraft) -> Result<(), AppError> {
    let unknown = players::unknown_player_ids(pool, &draft.player_ids()).await?;
    if unknown.is_empty() {
        return Ok(());
    }
    let listed: Vec<String> = unknown.iter().map(PlayerId::to_string).collect();
    Err(AppError::Validation(format!("Unknown players: {}", listed.join(", "))))
}

// GET /matches
pub async fn list_matches(
    pool: web::Data<PgPool>,
    query: web::Query<TournamentQuery>,
) -> Result<HttpResponse, AppError> {
    let Some(tournament_id) = resolve_tournament_id(&pool, query.tournament_id).await? else {
        return Ok(HttpResponse::Ok().json(Vec::<MatchSummary>::new()));
    };

    let summaries: Vec<MatchSummary> = matches::list_matches(&pool, tournament_id)
        .await?
        .iter()
        .map(MatchSummary::from)
        .collect();

    Ok(HttpResponse::Ok().json(summaries))
}

// GET /matches/latest
pub async fn latest_match(
    pool: web::Data<PgPool>,
    query: web::Query<TournamentQuery>,
) -> Result<HttpResponse, AppError> {
    let latest = match resolve_tournament_id(&pool, query.tournament_id).await? {
        Some(tournament_id) => matches::latest_match_number(&pool, tournament_id).await?,
        None => None,
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({ "match_number": latest })))
}

// GET /matches/{match_number}
pub async fn get_match(
    pool: web::Data<PgPool>,
    match_number: web::Path<i32>,
    query: web::Query<TournamentQuery>,
) -> Result<HttpResponse, AppError> {
    let match_number = match_number.into_inner();
    let tournament_id = tournament_for_match(&pool, query.tournament_id, match_number).await?;

    let game = matches::find_match(&pool, tournament_id, match_number)
        .await?
        .ok_or_else(|| AppError::match_not_found(match_number))?;

    let players_with_stats = load_players_with_stats(&pool, Some(tournament_id)).await?;
    let team_percentages = team_percentage_sum(&players_with_stats, &game);
    let vote_tally = tally_votes(&game);

    let detail = MatchDetail {
        result: match_outcome(&game),
        most_voted: most_voted_in(&vote_tally),
        vote_tally,
        team_percentages,
        team_percentage_averages: team_percentages.average(&game),
        game,
    };

    Ok(HttpResponse::Ok().json(detail))
}

// POST /matches
pub async fn create_match(
    admin: AdminUser,
    pool: web::Data<PgPool>,
    query: web::Query<TournamentQuery>,
    body: web::Json<CreateMatchRequest>,
) -> Result<HttpResponse, AppError> {
    let tournament_id = resolve_tournament_id(&pool, query.tournament_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No tournament to add the match to".to_string()))?;

    let body = body.into_inner();
    let draft = RosterDraft::from_teams(body.oscuras, body.claras)?;
    draft.validate()?;
    ensure_registered(&pool, &draft).await?;
    let (oscuras, claras) = draft.into_teams();

    let created = matches::create_match(&pool, tournament_id, body.date, &oscuras, &claras)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tournament {} not found", tournament_id)))?;
    tracing::info!("Match {} created by {}", created.match_number, admin.0.display_name);

    Ok(HttpResponse::Created().json(ApiResponse::success("Match created successfully", created)))
}

// PUT /matches/{match_number}
pub async fn save_roster(
    admin: AdminUser,
    pool: web::Data<PgPool>,
    match_number: web::Path<i32>,
    query: web::Query<TournamentQuery>,
    body: web::Json<SaveRosterRequest>,
) -> Result<HttpResponse, AppError> {
    let match_number = match_number.into_inner();
    let body = body.into_inner();

    let draft = RosterDraft::from_teams(body.oscuras, body.claras)?;
    if let Err(e) = draft.validate() {
        tracing::warn!("Rejected roster for match {}: {}", match_number, e);
        return Err(e.into());
    }
    ensure_registered(&pool, &draft).await?;
    let (oscuras, claras) = draft.into_teams();

    let tournament_id = tournament_for_match(&pool, query.tournament_id, match_number).await?;
    if !matches::save_roster(&pool, tournament_id, match_number, &oscuras, &claras).await? {
        return Err(AppError::match_not_found(match_number));
    }

    tracing::info!("Roster of match {} saved by {}", match_number, admin.0.display_name);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Roster saved successfully")))
}

// DELETE /matches/{match_number}
pub async fn delete_match(
    admin: AdminUser,
    pool: web::Data<PgPool>,
    match_number: web::Path<i32>,
    query: web::Query<DeleteMatchQuery>,
) -> Result<HttpResponse, AppError> {
    let match_number = match_number.into_inner();
    let tournament_id = tournament_for_match(&pool, query.tournament_id, match_number).await?;

    let game = matches::find_match(&pool, tournament_id, match_number)
        .await?
        .ok_or_else(|| AppError::match_not_found(match_number))?;

    authorize_deletion(RosterDraft::from_match(&game).has_recorded_goals(), query.confirm)?;

    if !matches::soft_delete_match(&pool, game.id).await? {
        return Err(AppError::match_not_found(match_number));
    }

    tracing::info!("Match {} deleted by {}", match_number, admin.0.display_name);
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Match deleted successfully")))
}
