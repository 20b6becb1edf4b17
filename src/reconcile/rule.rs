//! Construction of the port rule a request asks for.

use serde_json::{json, Value};

use crate::config::RuleConfig;

/// Request-independent part of every new port rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRuleTemplate {
    pub protocol: String,
    pub rule_type: String,
    pub hostname: String,
    pub source_port: u16,
    pub target_port: u16,
}

impl PortRuleTemplate {
    /// Build the template from rule settings.
    ///
    /// The public hostname is `{project_slug}-{environment_slug}.{domain}`.
    pub fn from_config(config: &RuleConfig) -> Self {
        Self {
            protocol: config.protocol.clone(),
            rule_type: config.rule_type.clone(),
            hostname: format!(
                "{}-{}.{}",
                config.project_slug, config.environment_slug, config.domain
            ),
            source_port: config.external_port,
            target_port: config.internal_port,
        }
    }

    /// Rule routing the public hostname to `service_id`.
    pub fn for_service(&self, service_id: impl Into<String>) -> NewPortRule {
        NewPortRule {
            protocol: self.protocol.clone(),
            rule_type: self.rule_type.clone(),
            hostname: self.hostname.clone(),
            source_port: self.source_port,
            target_port: self.target_port,
            service_id: service_id.into(),
        }
    }

    /// `hostname:port` handed back to the caller.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.hostname, self.source_port)
    }
}

/// A port rule in control-plane wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPortRule {
    pub protocol: String,
    pub rule_type: String,
    pub hostname: String,
    pub source_port: u16,
    pub target_port: u16,
    pub service_id: String,
}

impl NewPortRule {
    /// Wire form of the rule.
    pub fn to_value(&self) -> Value {
        json!({
            "protocol": self.protocol,
            "type": self.rule_type,
            "hostname": self.hostname,
            "sourcePort": self.source_port,
            "targetPort": self.target_port,
            "serviceId": self.service_id,
        })
    }

    /// Partial load balancer configuration carrying only this rule.
    pub fn as_incoming(&self) -> Value {
        json!({ "lbConfig": { "portRules": [self.to_value()] } })
    }
}
