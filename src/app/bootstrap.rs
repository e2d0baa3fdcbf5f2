use std::sync::Arc;

use axum::Router;

use crate::{
    app::router::create_router,
    domain::traits::{CommentsRepo, InformationRepo, PostsRepo, SuggestionsRepo, UsersRepo},
    infra::{
        config::AppConfig,
        repos::memory::{
            MemoryCommentsRepo, MemoryInformationRepo, MemoryPostsRepo, MemorySuggestionsRepo,
            MemoryUsersRepo,
        },
        ws::broadcaster::ConnectionRegistry,
    },
    services::{
        comment_tree::CommentTreeFetcher, ChatroomService, InformationService, SuggestionService,
        UsersService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub chatroom_service: Arc<ChatroomService>,
    pub users_service: Arc<UsersService>,
    pub information_service: Arc<InformationService>,
    pub suggestion_service: Arc<SuggestionService>,
    pub registry: ConnectionRegistry,
}

pub fn build_state(config: AppConfig) -> AppState {
    let posts_repo: Arc<dyn PostsRepo> = Arc::new(MemoryPostsRepo::new());
    let comments_repo: Arc<dyn CommentsRepo> = Arc::new(MemoryCommentsRepo::new());
    let users_repo: Arc<dyn UsersRepo> = Arc::new(MemoryUsersRepo::new());
    let info_repo: Arc<dyn InformationRepo> = Arc::new(MemoryInformationRepo::new());
    let suggestions_repo: Arc<dyn SuggestionsRepo> = Arc::new(MemorySuggestionsRepo::new());

    let registry = ConnectionRegistry::new(config.ws_write_timeout);
    let fetcher = CommentTreeFetcher::new(comments_repo.clone(), config.comment_fetch_timeout);

    let chatroom_service = Arc::new(ChatroomService::new(
        posts_repo.clone(),
        comments_repo.clone(),
        users_repo.clone(),
        fetcher,
        registry.clone(),
        config.comment_fetch_workers,
    ));

    let users_service = Arc::new(UsersService::new(users_repo.clone(), registry.clone()));
    let information_service = Arc::new(InformationService::new(info_repo, users_repo.clone()));
    let suggestion_service = Arc::new(SuggestionService::new(suggestions_repo, users_repo));

    AppState {
        config,
        chatroom_service,
        users_service,
        information_service,
        suggestion_service,
        registry,
    }
}

/// Builds the state, creates the startup admin when configured, and returns
/// the router alongside the state it serves.
pub async fn build_app(config: AppConfig) -> Result<(Router, AppState), crate::error::AppError> {
    let state = build_state(config);

    if let Some(name) = state.config.bootstrap_admin_name.clone() {
        state.users_service.bootstrap_admin(&name).await?;
    }

    Ok((create_router(state.clone()), state))
}
