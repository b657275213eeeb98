//! One function per API endpoint.
//!
//! Each pairs [`get_json`] or [`post_json`] with its endpoint and response
//! shape, then unwraps the `data` envelope.

use flatfile_api::{
    Agent, AgentInput, CreateEnvironmentRequest, CreateSpaceRequest, CreateTokenRequest, Data,
    Environment, Event, ListWorkbooksQuery, Page, Space, TokenGrant, User, Workbook,
    WorkbookInput,
};
use flatfile_core::EnvironmentId;

use crate::error::HttpError;
use crate::pipeline::{endpoint_with_query, get_json, post_json, AccessToken, AppEnv};

/// `POST auth/access-token`. Always sent without a bearer header, whatever
/// token `env` carries.
pub async fn create_token(
    env: &AppEnv,
    request: &CreateTokenRequest,
) -> Result<AccessToken, HttpError> {
    let env = env.with_access_token(AccessToken::empty());
    let grant: Data<TokenGrant> = post_json(&env, "auth/access-token", request).await?;
    Ok(AccessToken::new(grant.into_inner().access_token))
}

/// `GET users`
pub async fn list_users(env: &AppEnv) -> Result<Vec<User>, HttpError> {
    let users: Data<Vec<User>> = get_json(env, "users").await?;
    Ok(users.into_inner())
}

/// `GET environments`
pub async fn list_environments(env: &AppEnv) -> Result<Vec<Environment>, HttpError> {
    let environments: Data<Vec<Environment>> = get_json(env, "environments").await?;
    Ok(environments.into_inner())
}

/// `POST environments`
pub async fn create_environment(
    env: &AppEnv,
    request: &CreateEnvironmentRequest,
) -> Result<Environment, HttpError> {
    let environment: Data<Environment> = post_json(env, "environments", request).await?;
    Ok(environment.into_inner())
}

/// `GET spaces`, data only. See [`list_spaces_page`] for the pagination.
pub async fn list_spaces(env: &AppEnv) -> Result<Vec<Space>, HttpError> {
    Ok(list_spaces_page(env).await?.data)
}

/// `GET spaces`, with its pagination block.
pub async fn list_spaces_page(env: &AppEnv) -> Result<Page<Space>, HttpError> {
    get_json(env, "spaces").await
}

/// `POST spaces`
pub async fn create_space(env: &AppEnv, request: &CreateSpaceRequest) -> Result<Space, HttpError> {
    let space: Data<Space> = post_json(env, "spaces", request).await?;
    Ok(space.into_inner())
}

/// `GET workbooks?spaceId=…`
pub async fn list_workbooks(
    env: &AppEnv,
    query: &ListWorkbooksQuery,
) -> Result<Vec<Workbook>, HttpError> {
    let endpoint = endpoint_with_query("workbooks", query)?;
    let workbooks: Data<Vec<Workbook>> = get_json(env, &endpoint).await?;
    Ok(workbooks.into_inner())
}

/// `POST workbooks`
pub async fn create_workbook(env: &AppEnv, input: &WorkbookInput) -> Result<Workbook, HttpError> {
    let workbook: Data<Workbook> = post_json(env, "workbooks", input).await?;
    Ok(workbook.into_inner())
}

/// `GET environments/{id}/agents`
pub async fn list_agents(
    env: &AppEnv,
    environment_id: &EnvironmentId,
) -> Result<Vec<Agent>, HttpError> {
    let agents: Data<Vec<Agent>> = get_json(env, &agents_endpoint(environment_id)).await?;
    Ok(agents.into_inner())
}

/// `POST environments/{id}/agents`
pub async fn create_agent(
    env: &AppEnv,
    environment_id: &EnvironmentId,
    input: &AgentInput,
) -> Result<Agent, HttpError> {
    let agent: Data<Agent> = post_json(env, &agents_endpoint(environment_id), input).await?;
    Ok(agent.into_inner())
}

/// `GET environments/{id}/events`
pub async fn list_events(
    env: &AppEnv,
    environment_id: &EnvironmentId,
) -> Result<Vec<Event>, HttpError> {
    let endpoint = format!("environments/{environment_id}/events");
    let events: Data<Vec<Event>> = get_json(env, &endpoint).await?;
    Ok(events.into_inner())
}

fn agents_endpoint(environment_id: &EnvironmentId) -> String {
    format!("environments/{environment_id}/agents")
}
