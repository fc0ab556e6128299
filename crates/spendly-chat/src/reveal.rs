//! Progressive reveal of assistant replies.
//!
//! A reply is decomposed into user-perceived characters (grapheme clusters,
//! not raw code units) so the animation stays correct for combining marks
//! and non-Latin scripts, then appended to its target entry one cluster per
//! tick.

use spendly_core::chat::ChatEntry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, oneshot};
use tokio::time;
use unicode_segmentation::UnicodeSegmentation;

/// Timer-driven task that types a reply into its target chat entry.
///
/// Each instance owns its target index and only ever mutates that entry. A
/// reveal in progress is never interrupted by newer conversation turns: a
/// new `send` appends a new placeholder instead of cancelling this one.
pub struct RevealEffect {
    entries: Arc<RwLock<Vec<ChatEntry>>>,
    target: usize,
    graphemes: Vec<String>,
    tick: Duration,
}

impl RevealEffect {
    /// Prepares a reveal of `reply` into the entry at `target`.
    pub fn new(
        entries: Arc<RwLock<Vec<ChatEntry>>>,
        target: usize,
        reply: &str,
        tick: Duration,
    ) -> Self {
        let graphemes = reply.graphemes(true).map(str::to_owned).collect();
        Self {
            entries,
            target,
            graphemes,
            tick,
        }
    }

    /// The number of appends this reveal will perform.
    pub fn len(&self) -> usize {
        self.graphemes.len()
    }

    /// Returns true for the degenerate empty-reply case.
    pub fn is_empty(&self) -> bool {
        self.graphemes.is_empty()
    }

    /// Spawns the reveal task.
    ///
    /// The returned receiver resolves exactly once, after the final grapheme
    /// has been appended; immediately for an empty reply.
    pub fn spawn(self) -> oneshot::Receiver<()> {
        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(async move {
            self.run().await;
            let _ = done_tx.send(());
        });
        done_rx
    }

    async fn run(self) {
        let mut ticker = time::interval(self.tick);
        for grapheme in &self.graphemes {
            ticker.tick().await;
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get_mut(self.target) {
                entry.content.push_str(grapheme);
            }
        }
        tracing::debug!(entry = self.target, graphemes = self.graphemes.len(), "reveal finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(15);

    fn single_placeholder() -> Arc<RwLock<Vec<ChatEntry>>> {
        Arc::new(RwLock::new(vec![ChatEntry::placeholder()]))
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveals_one_grapheme_per_tick() {
        let entries = single_placeholder();
        let reply = "héllo";
        let effect = RevealEffect::new(Arc::clone(&entries), 0, reply, TICK);
        assert_eq!(effect.len(), 5);
        let done = effect.spawn();

        // The first tick fires immediately after spawn.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(entries.read().await[0].content, "h");

        for k in 2..=5 {
            time::advance(TICK).await;
            tokio::task::yield_now().await;
            let expected: String = reply.graphemes(true).take(k).collect();
            assert_eq!(entries.read().await[0].content, expected);
        }

        done.await.unwrap();
        assert_eq!(entries.read().await[0].content, reply);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_reply_still_completes() {
        let entries = single_placeholder();
        let effect = RevealEffect::new(Arc::clone(&entries), 0, "", TICK);
        assert!(effect.is_empty());

        effect.spawn().await.unwrap();
        assert_eq!(entries.read().await[0].content, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_combining_marks_stay_whole() {
        // "e" + combining acute is one user-perceived character.
        let reply = "e\u{0301}x";
        let entries = single_placeholder();
        let effect = RevealEffect::new(Arc::clone(&entries), 0, reply, TICK);
        assert_eq!(effect.len(), 2);
        let done = effect.spawn();

        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert_eq!(entries.read().await[0].content, "e\u{0301}");

        done.await.unwrap();
        assert_eq!(entries.read().await[0].content, reply);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_target_entry_is_touched() {
        let entries = Arc::new(RwLock::new(vec![
            ChatEntry::assistant("earlier reply"),
            ChatEntry::placeholder(),
        ]));
        let effect = RevealEffect::new(Arc::clone(&entries), 1, "ok", TICK);

        effect.spawn().await.unwrap();

        let entries = entries.read().await;
        assert_eq!(entries[0].content, "earlier reply");
        assert_eq!(entries[1].content, "ok");
    }
}
