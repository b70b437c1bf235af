//! Query-level monitor adapter
//!
//! Builds scheduled monitors that count log lines carrying a level marker
//! (e.g. `level=error`) in the configured indices over a trailing window, and
//! fire a webhook destination when the count exceeds a threshold.

use serde::Serialize;
use serde_json::Value;

use crate::client::{AlertingClient, ApiError};
use crate::reconcile::ResourceAdapter;

/// Tunables for generated monitors
///
/// These replace the magic numbers scattered through ad-hoc alerting setups;
/// the defaults match the values this tool has always shipped.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    /// How often the monitor runs, in minutes (default: 5)
    pub schedule_interval_minutes: u32,
    /// Trailing window ending at period end that each run inspects,
    /// in minutes (default: 5)
    pub window_minutes: u32,
    /// Trigger severity level (default: 3)
    pub severity: u8,
    /// Minimum gap between notifications, in minutes (default: 10)
    pub throttle_minutes: u32,
    /// Notification subject (mustache)
    pub subject_template: String,
    /// Notification body (mustache)
    pub message_template: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            schedule_interval_minutes: 5,
            window_minutes: 5,
            severity: 3,
            throttle_minutes: 10,
            subject_template: "Log level threshold exceeded".to_string(),
            message_template: "Monitor {{ctx.monitor.name}} just entered alert status. \
                               Please investigate the issue.\n  \
                               - Trigger: {{ctx.trigger.name}}\n  \
                               - Severity: {{ctx.trigger.severity}}\n  \
                               - Period start: {{ctx.periodStart}}\n  \
                               - Period end: {{ctx.periodEnd}}"
                .to_string(),
        }
    }
}

/// Monitor creation payload (`query_level_monitor`)
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub monitor_type: String,
    pub schedule: Schedule,
    pub inputs: Vec<MonitorInput>,
    pub triggers: Vec<Trigger>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    pub period: Period,
}

#[derive(Debug, Clone, Serialize)]
pub struct Period {
    pub interval: u32,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonitorInput {
    pub search: SearchInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchInput {
    pub indices: Vec<String>,
    pub query: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Trigger {
    pub name: String,
    pub severity: String,
    pub condition: TriggerCondition,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriggerCondition {
    pub script: Script,
}

#[derive(Debug, Clone, Serialize)]
pub struct Script {
    pub source: String,
    pub lang: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Action {
    pub name: String,
    pub destination_id: String,
    pub subject_template: Template,
    pub message_template: Template,
    pub throttle_enabled: bool,
    pub throttle: Throttle,
}

#[derive(Debug, Clone, Serialize)]
pub struct Template {
    pub lang: String,
    pub source: String,
}

impl Template {
    fn mustache(source: &str) -> Self {
        Self {
            lang: "mustache".to_string(),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Throttle {
    pub value: u32,
    pub unit: String,
}

impl MonitorSpec {
    /// Build a monitor that counts `level=<level>` log lines in `indices`
    /// over the trailing window and fires when the count exceeds `threshold`.
    pub fn build(
        name: &str,
        indices: &[String],
        level: &str,
        threshold: u64,
        destination_id: &str,
        settings: &MonitorSettings,
    ) -> Self {
        // {{period_end}} is resolved by the scheduler at run time;
        // bounds are epoch-millis timestamps.
        let query = serde_json::json!({
            "size": 0,
            "aggregations": {},
            "query": {
                "bool": {
                    "filter": [
                        {
                            "range": {
                                "@timestamp": {
                                    "gte": format!("{{{{period_end}}}}||-{}m", settings.window_minutes),
                                    "lte": "{{period_end}}",
                                    "format": "epoch_millis"
                                }
                            }
                        },
                        {
                            "match_phrase": {
                                "log": format!("\"level={}\"", level)
                            }
                        }
                    ]
                }
            }
        });

        Self {
            name: name.to_string(),
            kind: "monitor".to_string(),
            monitor_type: "query_level_monitor".to_string(),
            schedule: Schedule {
                period: Period {
                    interval: settings.schedule_interval_minutes,
                    unit: "MINUTES".to_string(),
                },
            },
            inputs: vec![MonitorInput {
                search: SearchInput {
                    indices: indices.to_vec(),
                    query,
                },
            }],
            triggers: vec![Trigger {
                name: format!("{}_trigger", level),
                severity: settings.severity.to_string(),
                condition: TriggerCondition {
                    script: Script {
                        source: format!("ctx.results[0].hits.total.value > {}", threshold),
                        lang: "painless".to_string(),
                    },
                },
                actions: vec![Action {
                    name: "notify_destination".to_string(),
                    destination_id: destination_id.to_string(),
                    subject_template: Template::mustache(&settings.subject_template),
                    message_template: Template::mustache(&settings.message_template),
                    throttle_enabled: true,
                    throttle: Throttle {
                        value: settings.throttle_minutes,
                        unit: "MINUTES".to_string(),
                    },
                }],
            }],
        }
    }
}

/// Search body matching monitors by exact name
pub fn search_body(name: &str) -> Value {
    serde_json::json!({
        "query": {
            "match": {
                "monitor.name": name
            }
        }
    })
}

/// Reconciliation adapter for query-level monitors.
///
/// Create-or-skip only: an existing monitor is returned as-is, so changed
/// thresholds or indices do not propagate to monitors created by earlier
/// runs.
pub struct MonitorAdapter<'a> {
    client: &'a AlertingClient,
    indices: Vec<String>,
    level: String,
    threshold: u64,
    destination_id: String,
    settings: MonitorSettings,
}

impl<'a> MonitorAdapter<'a> {
    pub fn new(
        client: &'a AlertingClient,
        indices: Vec<String>,
        level: impl Into<String>,
        threshold: u64,
        destination_id: impl Into<String>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            client,
            indices,
            level: level.into(),
            threshold,
            destination_id: destination_id.into(),
            settings,
        }
    }
}

impl ResourceAdapter for MonitorAdapter<'_> {
    fn kind(&self) -> &'static str {
        "monitor"
    }

    async fn lookup(&self, name: &str) -> Result<Option<String>, ApiError> {
        let hits = self.client.search_monitors(&search_body(name)).await?;
        Ok(hits.first().map(|h| h.id.clone()))
    }

    async fn create(&self, name: &str) -> Result<String, ApiError> {
        let spec = MonitorSpec::build(
            name,
            &self.indices,
            &self.level,
            self.threshold,
            &self.destination_id,
            &self.settings,
        );
        self.client.create_monitor(&spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_spec(threshold: u64) -> Value {
        let spec = MonitorSpec::build(
            "error_monitor",
            &["app-logs-*".to_string()],
            "error",
            threshold,
            "D1",
            &MonitorSettings::default(),
        );
        serde_json::to_value(&spec).unwrap()
    }

    #[test]
    fn test_monitor_identity_fields() {
        let v = build_test_spec(5);
        assert_eq!(v["name"], "error_monitor");
        assert_eq!(v["type"], "monitor");
        assert_eq!(v["monitor_type"], "query_level_monitor");
    }

    #[test]
    fn test_schedule_is_five_minutes() {
        let v = build_test_spec(5);
        assert_eq!(v["schedule"]["period"]["interval"], 5);
        assert_eq!(v["schedule"]["period"]["unit"], "MINUTES");
    }

    #[test]
    fn test_query_window_trails_period_end() {
        let v = build_test_spec(5);
        let range = &v["inputs"][0]["search"]["query"]["query"]["bool"]["filter"][0]["range"]["@timestamp"];
        assert_eq!(range["gte"], "{{period_end}}||-5m");
        assert_eq!(range["lte"], "{{period_end}}");
        assert_eq!(range["format"], "epoch_millis");
    }

    #[test]
    fn test_query_matches_level_phrase() {
        let v = build_test_spec(5);
        let phrase = &v["inputs"][0]["search"]["query"]["query"]["bool"]["filter"][1]["match_phrase"];
        assert_eq!(phrase["log"], "\"level=error\"");
        assert_eq!(v["inputs"][0]["search"]["indices"], serde_json::json!(["app-logs-*"]));
    }

    #[test]
    fn test_trigger_condition_encodes_threshold() {
        let v = build_test_spec(5);
        let trigger = &v["triggers"][0];
        assert_eq!(trigger["name"], "error_trigger");
        assert_eq!(trigger["severity"], "3");
        assert_eq!(
            trigger["condition"]["script"]["source"],
            "ctx.results[0].hits.total.value > 5"
        );
        assert_eq!(trigger["condition"]["script"]["lang"], "painless");
    }

    #[test]
    fn test_action_targets_destination_with_throttle() {
        let v = build_test_spec(5);
        let action = &v["triggers"][0]["actions"][0];
        assert_eq!(action["destination_id"], "D1");
        assert_eq!(action["throttle_enabled"], true);
        assert_eq!(action["throttle"]["value"], 10);
        assert_eq!(action["throttle"]["unit"], "MINUTES");
        assert_eq!(action["subject_template"]["lang"], "mustache");
        let message = action["message_template"]["source"].as_str().unwrap();
        assert!(message.contains("{{ctx.monitor.name}}"));
        assert!(message.contains("{{ctx.trigger.name}}"));
        assert!(message.contains("{{ctx.trigger.severity}}"));
        assert!(message.contains("{{ctx.periodStart}}"));
        assert!(message.contains("{{ctx.periodEnd}}"));
    }

    #[test]
    fn test_search_body_matches_on_name() {
        let body = search_body("fatal_monitor");
        assert_eq!(body["query"]["match"]["monitor.name"], "fatal_monitor");
    }

    #[test]
    fn test_custom_settings_propagate() {
        let settings = MonitorSettings {
            schedule_interval_minutes: 1,
            window_minutes: 10,
            severity: 1,
            throttle_minutes: 30,
            ..MonitorSettings::default()
        };
        let spec = MonitorSpec::build(
            "fatal_monitor",
            &["sys-logs-*".to_string()],
            "fatal",
            0,
            "D1",
            &settings,
        );
        let v = serde_json::to_value(&spec).unwrap();
        assert_eq!(v["schedule"]["period"]["interval"], 1);
        let range = &v["inputs"][0]["search"]["query"]["query"]["bool"]["filter"][0]["range"]["@timestamp"];
        assert_eq!(range["gte"], "{{period_end}}||-10m");
        assert_eq!(v["triggers"][0]["severity"], "1");
        assert_eq!(
            v["triggers"][0]["condition"]["script"]["source"],
            "ctx.results[0].hits.total.value > 0"
        );
        assert_eq!(v["triggers"][0]["actions"][0]["throttle"]["value"], 30);
    }
}
