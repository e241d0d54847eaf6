use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::bot::{Bot, Reply};
use crate::domain::Comment;

/// Message type for the dispatcher
#[derive(Debug)]
pub enum DispatchMessage {
    /// Consider a comment for a reply
    Comment(Comment),
    /// Finish in-flight work and stop
    Shutdown,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Dispatch queue is full")]
    QueueFull,

    #[error("Dispatcher has shut down")]
    Closed,
}

/// Handle to send comments to the dispatcher
#[derive(Clone)]
pub struct DispatcherHandle {
    tx: mpsc::Sender<DispatchMessage>,
}

impl DispatcherHandle {
    /// Queue a comment, refusing it if the queue is full.
    pub fn try_dispatch(&self, comment: Comment) -> Result<(), DispatchError> {
        self.tx
            .try_send(DispatchMessage::Comment(comment))
            .map_err(|e| match e {
                TrySendError::Full(_) => DispatchError::QueueFull,
                TrySendError::Closed(_) => DispatchError::Closed,
            })
    }

    /// Queue a comment, waiting for room in the queue.
    pub async fn dispatch(&self, comment: Comment) -> Result<(), DispatchError> {
        self.tx
            .send(DispatchMessage::Comment(comment))
            .await
            .map_err(|_| DispatchError::Closed)
    }

    /// Stop the dispatcher once the queued comments are handled.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(DispatchMessage::Shutdown).await;
    }
}

/// Hands trigger comments to a fixed number of workers.
pub struct Dispatcher {
    bot: Arc<Bot>,
    workers: u32,
    rx: mpsc::Receiver<DispatchMessage>,
    replies: mpsc::UnboundedSender<Reply>,
}

impl Dispatcher {
    /// Create a dispatcher with room for `capacity` queued comments, and return
    /// a handle to feed it and the receiving end of its replies.
    pub fn new(
        bot: Arc<Bot>,
        workers: usize,
        capacity: usize,
    ) -> (Self, DispatcherHandle, mpsc::UnboundedReceiver<Reply>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let (replies, reply_rx) = mpsc::unbounded_channel();

        let dispatcher = Self {
            bot,
            workers: clamp_workers(workers),
            rx,
            replies,
        };
        (dispatcher, DispatcherHandle { tx }, reply_rx)
    }

    /// Run the dispatch loop until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!("Dispatcher started with {} workers", self.workers);
        let semaphore = Arc::new(Semaphore::new(self.workers as usize));

        while let Some(msg) = self.rx.recv().await {
            match msg {
                DispatchMessage::Comment(comment) => {
                    if !self.bot.is_trigger(&comment) {
                        continue;
                    }

                    let Ok(permit) = semaphore.clone().acquire_owned().await else {
                        break;
                    };
                    let bot = self.bot.clone();
                    let replies = self.replies.clone();

                    tokio::spawn(async move {
                        let _permit = permit;
                        match bot.handle(&comment) {
                            Some(reply) => {
                                if replies.send(reply).is_err() {
                                    warn!("Reply for {} dropped, receiver is gone", comment.id);
                                }
                            }
                            None => debug!("Comment {} has no command", comment.id),
                        }
                    });
                }
                DispatchMessage::Shutdown => {
                    info!("Dispatcher shutting down");
                    break;
                }
            }
        }

        // Wait for in-flight workers
        let _ = semaphore.acquire_many(self.workers).await;
    }
}

/// At least one worker, and no more than a semaphore can hand out permits for.
fn clamp_workers(workers: usize) -> u32 {
    let max = Semaphore::MAX_PERMITS.min(u32::MAX as usize);
    workers.clamp(1, max) as u32
}

/// Spawn the dispatcher as a tokio task
pub fn spawn_dispatcher(
    bot: Arc<Bot>,
    workers: usize,
    capacity: usize,
) -> (DispatcherHandle, mpsc::UnboundedReceiver<Reply>) {
    let (dispatcher, handle, replies) = Dispatcher::new(bot, workers, capacity);

    tokio::spawn(async move {
        dispatcher.run().await;
    });

    (handle, replies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotSettings;

    fn bot() -> Arc<Bot> {
        Arc::new(Bot::from_settings(&BotSettings::default()))
    }

    #[tokio::test]
    async fn test_replies_to_trigger_comments_once() {
        let (handle, mut replies) = spawn_dispatcher(bot(), 2, 8);

        let comments = [
            Comment::new("a", "!topmusiccharts genre=house", "someone"),
            Comment::new("b", "just chatting", "someone"),
            Comment::new("c", "topmusiccharts! amount=5", "other"),
            Comment::new("a", "!topmusiccharts genre=house", "someone"),
            Comment::new("d", "!topmusiccharts genre=trap", "TopMusicCharts"),
        ];
        for comment in comments {
            handle.dispatch(comment).await.unwrap();
        }
        handle.shutdown().await;

        let mut ids = Vec::new();
        while let Some(reply) = replies.recv().await {
            ids.push(reply.comment_id);
        }
        ids.sort();

        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_worker_count_is_clamped() {
        assert_eq!(clamp_workers(0), 1);
        assert_eq!(clamp_workers(4), 4);
        assert_eq!(
            clamp_workers(usize::MAX) as usize,
            Semaphore::MAX_PERMITS.min(u32::MAX as usize)
        );
    }

    #[tokio::test]
    async fn test_oversized_pool_still_waits_for_workers() {
        let workers = u32::MAX as usize + 1;
        let (dispatcher, handle, mut replies) = Dispatcher::new(bot(), workers, 4);
        let run = tokio::spawn(dispatcher.run());

        handle
            .dispatch(Comment::new("a", "!topmusiccharts genre=house", "someone"))
            .await
            .unwrap();
        handle.shutdown().await;
        run.await.unwrap();

        let reply = replies.recv().await.unwrap();
        assert_eq!(reply.comment_id, "a");
    }

    #[tokio::test]
    async fn test_full_queue_rejects() {
        let (_dispatcher, handle, _replies) = Dispatcher::new(bot(), 1, 1);

        let comment = Comment::new("a", "!topmusiccharts genre=house", "someone");
        assert_eq!(handle.try_dispatch(comment.clone()), Ok(()));
        assert_eq!(handle.try_dispatch(comment), Err(DispatchError::QueueFull));
    }

    #[tokio::test]
    async fn test_dispatch_after_stop_is_closed() {
        let (dispatcher, handle, _replies) = Dispatcher::new(bot(), 1, 1);
        drop(dispatcher);

        let comment = Comment::new("a", "!topmusiccharts genre=house", "someone");
        assert_eq!(handle.try_dispatch(comment), Err(DispatchError::Closed));
    }
}
