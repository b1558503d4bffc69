//! Construction-time configuration for QoS policies
//!
//! Policies are usually built from declarative configuration rather than
//! direct constructor calls. [`QosConfig`] carries the shared table capacity
//! and the per-policy parameters, validates them, and builds a boxed
//! [`QosPolicy`].
//!
//! ```toml
//! max_requestors = 16
//!
//! [policy]
//! type = "dynamic"
//! monitoring_window = 1000000
//! high_bandwidth_threshold = 1000000
//! low_bandwidth_threshold = 100000
//! ```

use crate::clock::Tick;
use crate::error::{Error, Result};
use crate::policy::{DynamicPolicy, Priority, QosPolicy, RequestorId, StaticPolicy};
use serde::{Deserialize, Serialize};

/// Top-level QoS configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct QosConfig {
    /// Capacity of the per-requestor tables; ids `0..max_requestors` are
    /// tracked, anything above is answered with the default priority
    #[serde(default = "default_max_requestors")]
    pub max_requestors: usize,
    /// Policy to build
    pub policy: PolicyConfig,
}

fn default_max_requestors() -> usize {
    16
}

/// Policy selection and parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PolicyConfig {
    /// Fixed per-requestor priorities
    Static {
        /// Explicit priority assignments; unlisted requestors get priority 0.
        /// Later entries for the same requestor overwrite earlier ones.
        #[serde(default)]
        priorities: Vec<StaticAssignment>,
    },
    /// Bandwidth-driven recalibration
    Dynamic {
        /// Monitoring window length in ticks
        #[serde(default = "default_monitoring_window")]
        monitoring_window: Tick,
        /// Per-window cost above which a requestor is demoted
        #[serde(default = "default_high_bandwidth_threshold")]
        high_bandwidth_threshold: u64,
        /// Per-window cost below which a requestor is promoted
        #[serde(default = "default_low_bandwidth_threshold")]
        low_bandwidth_threshold: u64,
    },
}

fn default_monitoring_window() -> Tick {
    1_000_000
}

fn default_high_bandwidth_threshold() -> u64 {
    1_000_000
}

fn default_low_bandwidth_threshold() -> u64 {
    100_000
}

/// One fixed priority assignment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct StaticAssignment {
    /// Requestor the assignment applies to
    pub requestor: RequestorId,
    /// Priority value; higher is more important
    pub priority: Priority,
}

impl QosConfig {
    /// Validate the configuration
    ///
    /// Rejects everything that would make the resulting policy degenerate:
    /// a zero-capacity table, a zero-length window, inverted bandwidth
    /// thresholds, and assignments outside the table capacity.
    pub fn validate(&self) -> Result<()> {
        if self.max_requestors == 0 {
            return Err(Error::Config("max_requestors must be at least 1".to_string()));
        }

        match &self.policy {
            PolicyConfig::Static { priorities } => {
                for assignment in priorities {
                    if assignment.requestor as usize >= self.max_requestors {
                        return Err(Error::Config(format!(
                            "priority assignment for requestor {} exceeds max_requestors {}",
                            assignment.requestor, self.max_requestors
                        )));
                    }
                }
                Ok(())
            }
            PolicyConfig::Dynamic {
                monitoring_window,
                high_bandwidth_threshold,
                low_bandwidth_threshold,
            } => {
                if *monitoring_window == 0 {
                    return Err(Error::Config(
                        "monitoring_window must be at least 1 tick".to_string(),
                    ));
                }
                if low_bandwidth_threshold > high_bandwidth_threshold {
                    return Err(Error::Config(format!(
                        "low_bandwidth_threshold {low_bandwidth_threshold} exceeds \
                         high_bandwidth_threshold {high_bandwidth_threshold}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Build the configured policy
    ///
    /// Validates first; an invalid configuration never produces a policy.
    pub fn create_policy(&self) -> Result<Box<dyn QosPolicy>> {
        self.validate()?;

        match &self.policy {
            PolicyConfig::Static { priorities } => {
                let mut policy = StaticPolicy::new(self.max_requestors);
                for assignment in priorities {
                    policy.set_priority(assignment.requestor, assignment.priority);
                }
                Ok(Box::new(policy))
            }
            PolicyConfig::Dynamic {
                monitoring_window,
                high_bandwidth_threshold,
                low_bandwidth_threshold,
            } => Ok(Box::new(DynamicPolicy::new(
                *monitoring_window,
                *high_bandwidth_threshold,
                *low_bandwidth_threshold,
                self.max_requestors,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_toml_with_defaults() {
        let toml_str = r#"
            [policy]
            type = "dynamic"
        "#;
        let config: QosConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.max_requestors, 16);
        assert_eq!(
            config.policy,
            PolicyConfig::Dynamic {
                monitoring_window: 1_000_000,
                high_bandwidth_threshold: 1_000_000,
                low_bandwidth_threshold: 100_000,
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_static_toml_with_assignments() {
        let toml_str = r#"
            max_requestors = 8

            [policy]
            type = "static"

            [[policy.priorities]]
            requestor = 0
            priority = 200

            [[policy.priorities]]
            requestor = 3
            priority = 10
        "#;
        let config: QosConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.max_requestors, 8);
        match &config.policy {
            PolicyConfig::Static { priorities } => {
                assert_eq!(priorities.len(), 2);
                assert_eq!(priorities[0], StaticAssignment { requestor: 0, priority: 200 });
            }
            other => panic!("Expected static policy, got {other:?}"),
        }
    }

    #[test]
    fn test_json_roundtrip() {
        let config = QosConfig {
            max_requestors: 4,
            policy: PolicyConfig::Dynamic {
                monitoring_window: 500,
                high_bandwidth_threshold: 2_000,
                low_bandwidth_threshold: 100,
            },
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"type\":\"dynamic\""));

        let parsed: QosConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = QosConfig {
            max_requestors: 0,
            policy: PolicyConfig::Static { priorities: Vec::new() },
        };

        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(config.create_policy().is_err());
    }

    #[test]
    fn test_rejects_zero_window() {
        let config = QosConfig {
            max_requestors: 16,
            policy: PolicyConfig::Dynamic {
                monitoring_window: 0,
                high_bandwidth_threshold: 1_000,
                low_bandwidth_threshold: 100,
            },
        };

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let config = QosConfig {
            max_requestors: 16,
            policy: PolicyConfig::Dynamic {
                monitoring_window: 1_000,
                high_bandwidth_threshold: 100,
                low_bandwidth_threshold: 1_000,
            },
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("low_bandwidth_threshold"));
    }

    #[test]
    fn test_equal_thresholds_are_valid() {
        let config = QosConfig {
            max_requestors: 16,
            policy: PolicyConfig::Dynamic {
                monitoring_window: 1_000,
                high_bandwidth_threshold: 500,
                low_bandwidth_threshold: 500,
            },
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_assignment_beyond_capacity() {
        let config = QosConfig {
            max_requestors: 4,
            policy: PolicyConfig::Static {
                priorities: vec![StaticAssignment { requestor: 4, priority: 1 }],
            },
        };

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_create_static_policy() {
        let config = QosConfig {
            max_requestors: 8,
            policy: PolicyConfig::Static {
                priorities: vec![
                    StaticAssignment { requestor: 1, priority: 200 },
                    StaticAssignment { requestor: 1, priority: 50 },
                ],
            },
        };

        let mut policy = config.create_policy().unwrap();
        assert_eq!(policy.name(), "Static");

        // Later assignment wins
        assert_eq!(policy.schedule(1, 64, 0), 50);
        assert_eq!(policy.schedule(2, 64, 0), 0);
    }

    #[test]
    fn test_create_dynamic_policy() {
        let config = QosConfig {
            max_requestors: 8,
            policy: PolicyConfig::Dynamic {
                monitoring_window: 50,
                high_bandwidth_threshold: 1_000,
                low_bandwidth_threshold: 100,
            },
        };

        let mut policy = config.create_policy().unwrap();
        assert_eq!(policy.name(), "Dynamic");
        assert_eq!(policy.schedule(0, 64, 0), 128);
    }
}
