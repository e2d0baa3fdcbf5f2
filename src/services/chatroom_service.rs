use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    domain::{
        events::ChatEvent,
        models::{Comment, CommentParent, Post, PostType, User},
        traits::{CommentsRepo, PostsRepo, UsersRepo},
        value_objects::{required_text, Page, Pagination},
    },
    error::AppError,
    infra::ws::broadcaster::ConnectionRegistry,
};

use super::{comment_tree::CommentTreeFetcher, ServiceResult};

/// Worker count for reads that return a single post.
const SINGLE_POST_WORKERS: usize = 1;

/// Sequences repository calls, the comment-tree fetcher and the broadcaster
/// around every chatroom operation.
pub struct ChatroomService {
    posts: Arc<dyn PostsRepo>,
    comments: Arc<dyn CommentsRepo>,
    users: Arc<dyn UsersRepo>,
    fetcher: CommentTreeFetcher,
    registry: ConnectionRegistry,
    list_workers: usize,
}

impl ChatroomService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        comments: Arc<dyn CommentsRepo>,
        users: Arc<dyn UsersRepo>,
        fetcher: CommentTreeFetcher,
        registry: ConnectionRegistry,
        list_workers: usize,
    ) -> Self {
        Self {
            posts,
            comments,
            users,
            fetcher,
            registry,
            list_workers,
        }
    }

    #[instrument(skip(self, content))]
    pub async fn create_post(
        &self,
        author_id: &str,
        content: &str,
        post_type: PostType,
    ) -> ServiceResult<Post> {
        let content = required_text("content", content)?;
        let author = self.users.get(author_id).await?;

        let post = self
            .posts
            .insert(Post::new(&author, content, post_type))
            .await?;
        info!(post_id = %post.id, "post created");

        self.publish(ChatEvent::NewPost(post.clone())).await;
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn get_posts(&self, pagination: Pagination) -> ServiceResult<Page<Post>> {
        let page = self.posts.list(pagination).await?;
        let items = self.fetcher.fetch(page.items, self.list_workers).await;
        Ok(Page::new(items, page.total))
    }

    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: Uuid) -> ServiceResult<Post> {
        let post = self.posts.get(post_id).await?;
        self.with_tree(post).await
    }

    /// Soft-deletes the post and every comment and reply under it.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: Uuid, actor_id: &str) -> ServiceResult<()> {
        let post = self.posts.get(post_id).await?;
        let actor = self.users.get(actor_id).await?;
        ensure_can_moderate(&actor, &post.user_id, "post")?;

        // thread first: a failure here leaves the post visible and the delete retryable
        let thread = self.thread_ids(CommentParent::Post(post_id)).await?;
        let mut removed = self.comments.delete_many(&thread).await?;
        self.posts.delete(post_id).await?;
        removed += self.sweep_orphans(post_id).await;
        info!(post_id = %post_id, comments = removed, "post deleted");

        self.publish(ChatEvent::DeletePost { post_id }).await;
        Ok(())
    }

    #[instrument(skip(self, content))]
    pub async fn comment_on_post(
        &self,
        post_id: Uuid,
        author_id: &str,
        content: &str,
    ) -> ServiceResult<Comment> {
        let content = required_text("content", content)?;
        self.posts.get(post_id).await?;
        self.add_comment(CommentParent::Post(post_id), author_id, content)
            .await
    }

    #[instrument(skip(self, content))]
    pub async fn reply_to_comment(
        &self,
        comment_id: Uuid,
        author_id: &str,
        content: &str,
    ) -> ServiceResult<Comment> {
        let content = required_text("content", content)?;
        self.comments.get(comment_id).await?;
        self.add_comment(CommentParent::Comment(comment_id), author_id, content)
            .await
    }

    /// Top-level comments of a post, one page at a time, each with its full reply tree.
    #[instrument(skip(self))]
    pub async fn get_comments_by_post(
        &self,
        post_id: Uuid,
        pagination: Pagination,
    ) -> ServiceResult<Page<Comment>> {
        self.posts.get(post_id).await?;
        let page = self
            .comments
            .list_by_parent(CommentParent::Post(post_id), pagination)
            .await?;
        let mut items = page.items;
        for comment in items.iter_mut() {
            comment.comments = self.fetcher.replies_for(comment.id).await;
        }
        Ok(Page::new(items, page.total))
    }

    /// Soft-deletes the comment and its reply subtree.
    #[instrument(skip(self))]
    pub async fn delete_comment(&self, comment_id: Uuid, actor_id: &str) -> ServiceResult<()> {
        let comment = self.comments.get(comment_id).await?;
        let actor = self.users.get(actor_id).await?;
        ensure_can_moderate(&actor, &comment.user_id, "comment")?;

        let mut thread = vec![comment_id];
        thread.extend(self.thread_ids(CommentParent::Comment(comment_id)).await?);
        let removed = self.comments.delete_many(&thread).await?;
        info!(comment_id = %comment_id, removed, "comment deleted");

        self.publish(ChatEvent::DeleteComment {
            comment_id,
            reference_id: comment.reference_id,
        })
        .await;
        Ok(())
    }

    /// Likes the post, or removes the like when the user already liked it.
    #[instrument(skip(self))]
    pub async fn like_post(&self, post_id: Uuid, user_id: &str) -> ServiceResult<Post> {
        self.users.get(user_id).await?;
        let toggle = self.posts.toggle_like(post_id, user_id).await?;
        let post = self.with_tree(toggle.record).await?;

        self.publish(ChatEvent::LikePost {
            post: post.clone(),
            post_id,
            user_id: user_id.to_string(),
            liked: toggle.liked,
        })
        .await;
        Ok(post)
    }

    #[instrument(skip(self))]
    pub async fn like_comment(&self, comment_id: Uuid, user_id: &str) -> ServiceResult<Comment> {
        self.users.get(user_id).await?;
        let toggle = self.comments.toggle_like(comment_id, user_id).await?;
        let comment = toggle.record;

        self.publish(ChatEvent::LikeComment {
            comment_id,
            reference: comment.reference,
            reference_id: comment.reference_id,
            user_id: user_id.to_string(),
            liked: toggle.liked,
        })
        .await;
        Ok(comment)
    }

    /// Posts created within `window` plus every comment and reply under them.
    #[instrument(skip(self))]
    pub async fn recent_activity_total(&self, window: Duration) -> ServiceResult<u64> {
        let window = chrono::Duration::from_std(window)
            .map_err(|err| AppError::Validation(format!("invalid activity window: {err}")))?;
        let since = Utc::now() - window;

        let recent: Vec<Post> = self
            .posts
            .list(Pagination::ALL)
            .await?
            .items
            .into_iter()
            .filter(|post| post.created_at >= since)
            .collect();
        let recent = self.fetcher.fetch(recent, self.list_workers).await;

        let total = recent.iter().map(|post| 1 + post.thread_size()).sum::<usize>();
        Ok(total as u64)
    }

    async fn add_comment(
        &self,
        parent: CommentParent,
        author_id: &str,
        content: String,
    ) -> ServiceResult<Comment> {
        let author = self.users.get(author_id).await?;
        let comment = self
            .comments
            .insert(Comment::new(parent, &author, content))
            .await?;
        info!(comment_id = %comment.id, parent = %parent, "comment created");

        self.publish(ChatEvent::new_comment(comment.clone())).await;
        Ok(comment)
    }

    async fn with_tree(&self, post: Post) -> ServiceResult<Post> {
        let post_id = post.id;
        self.fetcher
            .fetch(vec![post], SINGLE_POST_WORKERS)
            .await
            .pop()
            .ok_or_else(|| AppError::Internal(format!("comment fetch lost post {post_id}")))
    }

    /// Ids of every comment transitively under `root`. Listing errors surface,
    /// since this feeds a delete.
    async fn thread_ids(&self, root: CommentParent) -> ServiceResult<Vec<Uuid>> {
        let mut ids = Vec::new();
        let mut pending = vec![root];
        while let Some(parent) = pending.pop() {
            let children = self
                .comments
                .list_by_parent(parent, Pagination::ALL)
                .await?;
            for child in children.items {
                ids.push(child.id);
                pending.push(CommentParent::Comment(child.id));
            }
        }
        Ok(ids)
    }

    /// Removes comments that attached to `post_id` while it was being deleted.
    /// The post is already gone, so failures are only logged.
    async fn sweep_orphans(&self, post_id: Uuid) -> u64 {
        let swept = match self.thread_ids(CommentParent::Post(post_id)).await {
            Ok(ids) if ids.is_empty() => return 0,
            Ok(ids) => self.comments.delete_many(&ids).await,
            Err(err) => Err(err),
        };
        match swept {
            Ok(count) => {
                if count > 0 {
                    warn!(post_id = %post_id, count, "removed comments added during post delete");
                }
                count
            }
            Err(err) => {
                warn!(post_id = %post_id, error = %err, "orphan sweep after post delete failed");
                0
            }
        }
    }

    /// Broadcast is a notification, not part of the mutation: failures are logged only.
    async fn publish(&self, event: ChatEvent) {
        if let Err(err) = self.registry.broadcast(&event).await {
            warn!(event = event.event_name(), error = %err, "broadcast failed");
        }
    }
}

fn ensure_can_moderate(actor: &User, author_id: &str, what: &str) -> ServiceResult<()> {
    if actor.can_moderate(author_id) {
        return Ok(());
    }
    Err(AppError::PermissionDenied(format!(
        "user {} may not delete this {what}",
        actor.id
    )))
}
