use utoipa::OpenApi;

use crate::{domain, dto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::v1::users::health,
        crate::api::v1::users::create_user,
        crate::api::v1::users::me,
        crate::api::v1::ws::ws_handler,
        crate::api::v1::chatroom::create_post,
        crate::api::v1::chatroom::get_posts,
        crate::api::v1::chatroom::recent_post_total,
        crate::api::v1::chatroom::get_post,
        crate::api::v1::chatroom::delete_post,
        crate::api::v1::chatroom::comment_on_post,
        crate::api::v1::chatroom::reply_to_comment,
        crate::api::v1::chatroom::get_comments,
        crate::api::v1::chatroom::like_post,
        crate::api::v1::chatroom::like_comment,
        crate::api::v1::chatroom::delete_comment,
        crate::api::v1::admin::remove_post,
        crate::api::v1::admin::remove_comment,
        crate::api::v1::admin::ban_user,
        crate::api::v1::admin::unban_user,
        crate::api::v1::admin::promote_user,
        crate::api::v1::admin::demote_user,
        crate::api::v1::admin::banned_users,
        crate::api::v1::admin::admin_users,
        crate::api::v1::information::list_information,
        crate::api::v1::information::get_information,
        crate::api::v1::information::create_information,
        crate::api::v1::information::update_information,
        crate::api::v1::information::delete_information,
        crate::api::v1::suggestions::create_suggestion,
        crate::api::v1::suggestions::my_suggestions,
        crate::api::v1::suggestions::get_suggestion,
        crate::api::v1::suggestions::delete_suggestion,
        crate::api::v1::suggestions::list_suggestions,
        crate::api::v1::suggestions::update_suggestion_status,
    ),
    components(schemas(
        domain::models::Post,
        domain::models::Comment,
        domain::models::Author,
        domain::models::PostType,
        domain::models::ReferenceKind,
        domain::models::Role,
        domain::models::Information,
        domain::models::InformationType,
        domain::models::Suggestion,
        domain::models::SuggestionStatus,
        dto::chatroom::CreatePostRequest,
        dto::chatroom::CreateCommentRequest,
        dto::chatroom::PostsPageResponse,
        dto::chatroom::CommentsPageResponse,
        dto::chatroom::RecentTotalResponse,
        dto::chatroom::DeletedResponse,
        dto::chatroom::HealthResponse,
        dto::users::CreateUserRequest,
        dto::users::UserResponse,
        dto::users::UsersPageResponse,
        dto::information::CreateInformationRequest,
        dto::information::UpdateInformationRequest,
        dto::information::InformationPageResponse,
        dto::suggestions::CreateSuggestionRequest,
        dto::suggestions::UpdateSuggestionStatusRequest,
        dto::suggestions::SuggestionsPageResponse,
    )),
    tags(
        (name = "chatroom", description = "Posts, comments, likes and the live event stream"),
        (name = "users", description = "Users and health"),
        (name = "admin", description = "Moderation"),
        (name = "information", description = "Admin announcements"),
        (name = "suggestions", description = "User feedback and its review"),
    )
)]
pub struct ApiDoc;
