//! Fetch-and-persist service plus the interval job that drives it.

use super::client::DiscordHttp;
use super::convert::build_discord_data;
use super::store::MessageStore;
use super::{DiscordData, FetchRequest, SaveSummary, StoredGroup};
use crate::error::GatewayError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// Scheduler job id, used in logs.
pub const JOB_ID: &str = "discord_message_fetch";

/// Values a [`FetchRequest`] falls back to.
#[derive(Clone, Default)]
pub struct HarvesterDefaults {
    pub token: Option<String>,
    pub channel_id: Option<String>,
    pub target_user_id: Option<String>,
    pub limit: u32,
}

impl std::fmt::Debug for HarvesterDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarvesterDefaults")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("channel_id", &self.channel_id)
            .field("target_user_id", &self.target_user_id)
            .field("limit", &self.limit)
            .finish()
    }
}

/// A fetch that found messages, and what saving it did.
#[derive(Debug, Clone)]
pub struct Harvest {
    pub data: DiscordData,
    pub summary: SaveSummary,
}

// ═════════════════════════════════════════════════════════════════════════════
// Harvester
// ═════════════════════════════════════════════════════════════════════════════

pub struct Harvester {
    discord: DiscordHttp,
    store: Arc<dyn MessageStore>,
    defaults: HarvesterDefaults,
}

fn pick(value: &Option<String>, fallback: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(fallback.as_deref().filter(|s| !s.is_empty()))
        .map(str::to_string)
}

impl Harvester {
    pub fn new(
        discord: DiscordHttp,
        store: Arc<dyn MessageStore>,
        defaults: HarvesterDefaults,
    ) -> Self {
        Self {
            discord,
            store,
            defaults,
        }
    }

    pub fn store(&self) -> &Arc<dyn MessageStore> {
        &self.store
    }

    /// Fetch a channel page and build the export; `None` when nothing matched
    /// or Discord refused the request.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Option<DiscordData>, GatewayError> {
        let token = pick(&request.discord_token, &self.defaults.token);
        let channel_id = pick(&request.channel_id, &self.defaults.channel_id);
        let target = pick(&request.target_user_id, &self.defaults.target_user_id);
        let (Some(token), Some(channel_id), Some(target)) = (token, channel_id, target) else {
            return Err(GatewayError::Validation(
                "Missing required Discord credentials".to_string(),
            ));
        };
        let limit = request.limit.unwrap_or(self.defaults.limit);

        let Some(raw) = self.discord.fetch_messages(&token, &channel_id, limit).await? else {
            return Ok(None);
        };
        let data = build_discord_data(&raw, &channel_id, &target);
        if data.is_none() {
            tracing::warn!(
                %channel_id,
                target_user_id = %target,
                "No messages found from target user"
            );
        }
        Ok(data)
    }

    /// Persist every group that still has unseen messages.
    pub async fn save(&self, data: &DiscordData) -> Result<SaveSummary, GatewayError> {
        let ids: Vec<String> = data
            .message_groups
            .iter()
            .flat_map(|g| g.messages.iter().map(|m| m.message_id.clone()))
            .collect();
        let existing: HashSet<String> = self.store.existing_message_ids(&ids).await?;

        let mut summary = SaveSummary::default();
        for group in &data.message_groups {
            let fresh: Vec<_> = group
                .messages
                .iter()
                .filter(|m| !existing.contains(&m.message_id))
                .cloned()
                .collect();
            if fresh.is_empty() {
                continue;
            }
            let count = fresh.len();
            self.store
                .insert_group(StoredGroup {
                    id: None,
                    timestamp: group.timestamp.clone(),
                    username: group.username.clone(),
                    messages: fresh,
                    discord_channel_id: data.discord_channel_id.clone(),
                    target_user_id: data.target_user_id.clone(),
                    created_at: chrono::Utc::now(),
                })
                .await?;
            summary.inserted_groups += 1;
            summary.new_messages += count;
            tracing::debug!(group_id = group.group_id, messages = count, "Saved message group");
        }

        if summary.inserted_groups > 0 {
            tracing::info!(
                groups = summary.inserted_groups,
                messages = summary.new_messages,
                "Saved new message groups"
            );
        } else {
            tracing::info!("No new message groups to save");
        }
        Ok(summary)
    }

    pub async fn fetch_and_save(
        &self,
        request: &FetchRequest,
    ) -> Result<Option<Harvest>, GatewayError> {
        let Some(data) = self.fetch(request).await? else {
            return Ok(None);
        };
        let summary = self.save(&data).await?;
        Ok(Some(Harvest { data, summary }))
    }

    pub async fn latest(&self, limit: u32) -> Result<Vec<StoredGroup>, GatewayError> {
        Ok(self.store.latest(limit).await?)
    }

    pub async fn count_by_user(&self, user_id: &str) -> Result<u64, GatewayError> {
        Ok(self.store.count_by_user(user_id).await?)
    }

    /// One scheduled run with configured defaults. Failures are logged.
    pub async fn run_job(&self) {
        tracing::info!(job = JOB_ID, "Starting scheduled Discord message fetch");
        match self.fetch_and_save(&FetchRequest::default()).await {
            Ok(Some(_)) => {}
            Ok(None) => tracing::warn!(job = JOB_ID, "No Discord messages fetched"),
            Err(e @ GatewayError::Store(_)) => {
                tracing::error!(job = JOB_ID, error = %e, "Failed to save Discord messages")
            }
            Err(e) => tracing::error!(job = JOB_ID, error = %e, "Scheduled Discord fetch failed"),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Scheduler
// ═════════════════════════════════════════════════════════════════════════════

enum Command {
    RunNow,
    Stop,
}

struct Running {
    cmd_tx: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
}

/// Runs [`Harvester::run_job`] on a fixed period, first one period after start.
pub struct Scheduler {
    harvester: Arc<Harvester>,
    period: Duration,
    running: Arc<AtomicBool>,
    task: Mutex<Option<Running>>,
}

impl Scheduler {
    pub fn new(harvester: Arc<Harvester>, period: Duration) -> Self {
        Self {
            harvester,
            period,
            running: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the interval task. Starting twice is a no-op.
    pub async fn start(&self) {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return;
        }
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let handle = tokio::spawn(run_schedule(
            Arc::clone(&self.harvester),
            self.period,
            cmd_rx,
            Arc::clone(&self.running),
        ));
        self.running.store(true, Ordering::SeqCst);
        *task = Some(Running { cmd_tx, handle });
        tracing::info!(
            job = JOB_ID,
            period_secs = self.period.as_secs(),
            "Discord scheduler started"
        );
    }

    /// Stop the task and wait for an in-flight run to finish.
    pub async fn stop(&self) {
        let Some(Running { cmd_tx, handle }) = self.task.lock().await.take() else {
            return;
        };
        let _ = cmd_tx.send(Command::Stop).await;
        let _ = tokio::time::timeout(Duration::from_secs(30), handle).await;
        self.running.store(false, Ordering::SeqCst);
        tracing::info!(job = JOB_ID, "Discord scheduler stopped");
    }

    /// Run the job now, on the scheduler task when it is running.
    pub async fn run_job_now(&self) {
        if let Some(running) = self.task.lock().await.as_ref() {
            if running.cmd_tx.send(Command::RunNow).await.is_ok() {
                return;
            }
        }
        self.harvester.run_job().await;
    }
}

async fn run_schedule(
    harvester: Arc<Harvester>,
    period: Duration,
    mut cmd_rx: mpsc::Receiver<Command>,
    running: Arc<AtomicBool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    ticker.reset(); // first run one period after start

    loop {
        tokio::select! {
            _ = ticker.tick() => harvester.run_job().await,
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::RunNow) => harvester.run_job().await,
                Some(Command::Stop) | None => break,
            },
        }
    }
    running.store(false, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discord::store::MemoryStore;
    use crate::discord::{DiscordMessage, MessageGroup, Timespan};

    fn harvester(store: Arc<MemoryStore>) -> Harvester {
        Harvester::new(
            DiscordHttp::new(Some("http://127.0.0.1:9")).unwrap(),
            store,
            HarvesterDefaults {
                limit: 100,
                ..Default::default()
            },
        )
    }

    fn message(id: &str) -> DiscordMessage {
        DiscordMessage {
            message_id: id.to_string(),
            content: format!("signal {id}"),
            attachments: vec![],
            reply_to: None,
        }
    }

    fn data(groups: Vec<Vec<&str>>) -> DiscordData {
        DiscordData {
            username: "trader".to_string(),
            total_messages: 0,
            exported_count: 0,
            timespan: Timespan {
                from: String::new(),
                to: String::new(),
            },
            message_groups: groups
                .into_iter()
                .enumerate()
                .map(|(i, ids)| MessageGroup {
                    group_id: i as u32 + 1,
                    timestamp: "01/03/2024 10:00".to_string(),
                    username: "trader".to_string(),
                    messages: ids.into_iter().map(message).collect(),
                })
                .collect(),
            created_at: chrono::Utc::now(),
            discord_channel_id: "chan".to_string(),
            target_user_id: "7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_save_skips_known_messages() {
        let store = Arc::new(MemoryStore::new());
        let h = harvester(store.clone());

        let first = h.save(&data(vec![vec!["1", "2"], vec!["3"]])).await.unwrap();
        assert_eq!(
            first,
            SaveSummary {
                inserted_groups: 2,
                new_messages: 3
            }
        );

        let second = h.save(&data(vec![vec!["2", "4"], vec!["3"]])).await.unwrap();
        assert_eq!(
            second,
            SaveSummary {
                inserted_groups: 1,
                new_messages: 1
            }
        );
        assert_eq!(store.len().await, 3);
        assert_eq!(h.count_by_user("7").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_save_nothing_new_is_ok() {
        let store = Arc::new(MemoryStore::new());
        let h = harvester(store.clone());
        h.save(&data(vec![vec!["1"]])).await.unwrap();
        let again = h.save(&data(vec![vec!["1"]])).await.unwrap();
        assert_eq!(again, SaveSummary::default());
    }

    #[tokio::test]
    async fn test_fetch_without_credentials_is_validation_error() {
        let h = harvester(Arc::new(MemoryStore::new()));
        let err = h.fetch(&FetchRequest::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn test_scheduler_start_stop() {
        let h = Arc::new(harvester(Arc::new(MemoryStore::new())));
        let scheduler = Scheduler::new(h, Duration::from_secs(3600));
        assert!(!scheduler.is_running());
        scheduler.start().await;
        assert!(scheduler.is_running());
        scheduler.start().await;
        scheduler.stop().await;
        assert!(!scheduler.is_running());
    }
}
