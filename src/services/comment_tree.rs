use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures_util::{future::BoxFuture, FutureExt};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinSet,
    time::timeout,
};
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use crate::domain::{
    models::{Comment, CommentParent, Post},
    traits::CommentsRepo,
    value_objects::Pagination,
};

/// One post waiting for its comment tree, tagged with its batch position.
struct CommentJob {
    position: usize,
    post: Post,
}

/// Fills `Post::comments` (and every nested `Comment::comments`) for a batch
/// of posts using a pool of workers scoped to the call.
///
/// Each post is handled start to finish by one worker, so trees are built
/// without locks and every level keeps its oldest-first order. A listing that
/// fails or times out counts as an empty level: a partial tree beats a failed
/// page.
#[derive(Clone)]
pub struct CommentTreeFetcher {
    comments: Arc<dyn CommentsRepo>,
    call_timeout: Duration,
}

impl CommentTreeFetcher {
    pub fn new(comments: Arc<dyn CommentsRepo>, call_timeout: Duration) -> Self {
        Self {
            comments,
            call_timeout,
        }
    }

    /// Returns the same posts, in the same order, with their trees attached.
    ///
    /// `workers` is clamped to `1..=posts.len()`.
    #[instrument(skip(self, posts), fields(posts = posts.len()))]
    pub async fn fetch(&self, posts: Vec<Post>, workers: usize) -> Vec<Post> {
        let total = posts.len();
        if total == 0 {
            return posts;
        }
        let workers = workers.clamp(1, total);

        let mut slots: Vec<Option<Post>> = (0..total).map(|_| None).collect();
        let (tx, rx) = mpsc::channel(total);
        for (position, post) in posts.into_iter().enumerate() {
            if let Err(mpsc::error::SendError(job)) = tx.send(CommentJob { position, post }).await {
                // receiver is still held here; keep the post rather than lose it
                slots[job.position] = Some(job.post);
            }
        }
        drop(tx);

        let queue = Arc::new(Mutex::new(rx));
        let mut pool = JoinSet::new();
        for id in 1..=workers {
            let worker = CommentWorker {
                id,
                jobs: Arc::clone(&queue),
                fetcher: self.clone(),
            };
            pool.spawn(worker.run());
        }

        while let Some(joined) = pool.join_next().await {
            match joined {
                Ok(finished) => {
                    for job in finished {
                        slots[job.position] = Some(job.post);
                    }
                }
                Err(err) => error!(error = %err, "comment worker aborted"),
            }
        }

        debug!(workers, "comment trees fetched");
        slots.into_iter().flatten().collect()
    }

    /// Full reply tree under one comment.
    pub async fn replies_for(&self, comment_id: Uuid) -> Vec<Comment> {
        self.children(CommentParent::Comment(comment_id)).await
    }

    fn children(&self, parent: CommentParent) -> BoxFuture<'_, Vec<Comment>> {
        Box::pin(async move {
            let mut level = self.list_level(parent).await;
            for comment in level.iter_mut() {
                comment.comments = self.children(CommentParent::Comment(comment.id)).await;
            }
            level
        })
    }

    async fn list_level(&self, parent: CommentParent) -> Vec<Comment> {
        let listing = self.comments.list_by_parent(parent, Pagination::ALL);
        match timeout(self.call_timeout, listing).await {
            Ok(Ok(page)) => {
                let mut level = page.items;
                level.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                level
            }
            Ok(Err(err)) => {
                warn!(parent = %parent, error = %err, "comment listing failed; subtree left empty");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    parent = %parent,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "comment listing timed out; subtree left empty"
                );
                Vec::new()
            }
        }
    }
}

struct CommentWorker {
    id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<CommentJob>>>,
    fetcher: CommentTreeFetcher,
}

impl CommentWorker {
    async fn run(self) -> Vec<CommentJob> {
        let mut finished = Vec::new();
        loop {
            let next = self.jobs.lock().await.recv().await;
            let Some(mut job) = next else {
                break;
            };
            let post_id = job.post.id;
            let descent = self.fetcher.children(CommentParent::Post(post_id));
            // a panicking subtree costs this post its tree, never the batch
            job.post.comments = match AssertUnwindSafe(descent).catch_unwind().await {
                Ok(tree) => tree,
                Err(_) => {
                    error!(worker = self.id, post_id = %post_id, "comment fetch panicked; tree left empty");
                    Vec::new()
                }
            };
            finished.push(job);
        }
        debug!(worker = self.id, jobs = finished.len(), "comment worker done");
        finished
    }
}
