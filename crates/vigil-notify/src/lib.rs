//! Fire-and-forget webhook notifications.
//!
//! The lifecycle core reports what happened — connected, disconnected,
//! stuck, status digest — and must never wait on, retry, or fail because of
//! delivery. So the [`Notifier`] seam is a synchronous call that spawns its
//! own task; delivery failures are logged and dropped, and there is no
//! ordering guarantee between notifications.
//!
//! [`WebhookNotifier`] posts Discord-compatible embeds. A missing webhook
//! URL disables delivery entirely — running without notifications is a
//! supported configuration, not an error.

use serde_json::{Value, json};
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Severity and notification
// ---------------------------------------------------------------------------

/// How alarming a notification is. Maps onto the embed accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// The embed accent color for this severity.
    pub fn color(&self) -> u32 {
        match self {
            Self::Info => 0x3498db,
            Self::Warning => 0xff9900,
            Self::Error => 0xff0000,
        }
    }
}

/// One outbound notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
    /// Extra key/value metadata rendered as embed fields.
    pub fields: Vec<(String, String)>,
}

impl Notification {
    /// Creates a notification with no metadata fields.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            severity,
            fields: Vec::new(),
        }
    }

    /// Appends a metadata field.
    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }
}

// ---------------------------------------------------------------------------
// Notifier seam
// ---------------------------------------------------------------------------

/// Delivers notifications somewhere, best-effort.
///
/// Implementations must return immediately: spawn the actual delivery and
/// swallow its errors. The lifecycle actor calls this from its event loop.
pub trait Notifier: Send + Sync + 'static {
    /// Dispatches a notification. Never blocks, never fails.
    fn notify(&self, notification: Notification);
}

/// Discards every notification. For tests and notification-less deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, notification: Notification) {
        debug!(title = %notification.title, "notification dropped (noop notifier)");
    }
}

// ---------------------------------------------------------------------------
// Webhook notifier
// ---------------------------------------------------------------------------

/// Posts notifications as Discord-style webhook embeds.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    /// Creates a notifier. `None` disables delivery.
    pub fn new(url: Option<String>) -> Self {
        if url.is_none() {
            debug!("no webhook URL configured — notifications disabled");
        }
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// A notifier that never delivers, without the trait-object dance.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Whether a webhook URL is configured.
    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, notification: Notification) {
        let Some(url) = self.url.clone() else {
            return;
        };
        let client = self.client.clone();
        let payload = embed_payload(&notification);
        let title = notification.title;

        // Detached task: the caller must not observe delivery at all.
        tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!(%title, "notification delivered");
                }
                Ok(resp) => {
                    warn!(
                        %title,
                        status = %resp.status(),
                        "webhook rejected notification"
                    );
                }
                Err(e) => {
                    warn!(%title, error = %e, "webhook delivery failed");
                }
            }
        });
    }
}

/// Builds the webhook JSON body for a notification.
///
/// Separate from the send path so payload shape is testable without a
/// server.
pub fn embed_payload(notification: &Notification) -> Value {
    let fields: Vec<Value> = notification
        .fields
        .iter()
        .map(|(name, value)| {
            json!({ "name": name, "value": value, "inline": true })
        })
        .collect();

    json!({
        "embeds": [{
            "title": notification.title,
            "description": notification.body,
            "color": notification.severity.color(),
            "fields": fields,
        }]
    })
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_colors() {
        assert_eq!(Severity::Info.color(), 0x3498db);
        assert_eq!(Severity::Warning.color(), 0xff9900);
        assert_eq!(Severity::Error.color(), 0xff0000);
    }

    #[test]
    fn test_notification_field_builder_appends_in_order() {
        let n = Notification::new("t", "b", Severity::Info)
            .field("Uptime", "3h 2m 1s")
            .field("Position", "(1.0, 2.0, 3.0)");
        assert_eq!(n.fields.len(), 2);
        assert_eq!(n.fields[0].0, "Uptime");
        assert_eq!(n.fields[1].1, "(1.0, 2.0, 3.0)");
    }

    #[test]
    fn test_embed_payload_shape() {
        let n = Notification::new("Connected", "session up", Severity::Info)
            .field("Attempt", "3");
        let payload = embed_payload(&n);

        let embed = &payload["embeds"][0];
        assert_eq!(embed["title"], "Connected");
        assert_eq!(embed["description"], "session up");
        assert_eq!(embed["color"], 0x3498db);
        assert_eq!(embed["fields"][0]["name"], "Attempt");
        assert_eq!(embed["fields"][0]["value"], "3");
        assert_eq!(embed["fields"][0]["inline"], true);
    }

    #[test]
    fn test_embed_payload_no_fields_is_empty_array() {
        let payload =
            embed_payload(&Notification::new("t", "b", Severity::Error));
        assert_eq!(payload["embeds"][0]["fields"], json!([]));
    }

    #[tokio::test]
    async fn test_disabled_webhook_notifier_is_inert() {
        let notifier = WebhookNotifier::disabled();
        assert!(!notifier.is_enabled());
        // Must not panic or spawn anything that matters.
        notifier.notify(Notification::new("t", "b", Severity::Info));
    }

    #[test]
    fn test_enabled_flag_reflects_url() {
        let notifier = WebhookNotifier::new(Some(
            "https://discord.com/api/webhooks/1/abc".into(),
        ));
        assert!(notifier.is_enabled());
    }
}
