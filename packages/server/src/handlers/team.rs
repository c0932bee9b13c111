use actix_web::{HttpResponse, web};
use prassign_server_models::{TeamDto, TeamQuery, TeamResponse, Validate};

use super::required_param;
use crate::{error::ApiError, state::AppState};

pub async fn add(
    state: web::Data<AppState>,
    body: web::Json<TeamDto>,
) -> Result<HttpResponse, ApiError> {
    body.validate().map_err(ApiError::InvalidRequest)?;

    let team = body.into_inner().into_team();
    state.teams.create(&team).await?;

    Ok(HttpResponse::Created().json(TeamResponse {
        team: TeamDto::from(&team),
    }))
}

pub async fn get(
    state: web::Data<AppState>,
    query: web::Query<TeamQuery>,
) -> Result<HttpResponse, ApiError> {
    let team_name = required_param(query.into_inner().team_name, "team_name")?;
    let team = state.teams.get_by_team_name(&team_name).await?;

    Ok(HttpResponse::Ok().json(TeamDto::from(&team)))
}
