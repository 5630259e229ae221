//! Test fixtures and sample payloads for integration tests

use serde_json::{json, Value};

/// A routing rule payload as the admin console would POST it
pub fn rule_json(id: &str, name: &str, priority: i32, target: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "priority": priority,
        "target_provider": target,
    })
}

/// A routing rule payload with conditions attached
pub fn rule_json_with_conditions(
    id: &str,
    name: &str,
    priority: i32,
    target: &str,
    conditions: Value,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "priority": priority,
        "target_provider": target,
        "conditions": conditions,
    })
}

/// A failover config payload as the admin console would POST it
pub fn failover_config_json(id: &str, primary: &str, fallbacks: &[&str]) -> Value {
    json!({
        "id": id,
        "primary_provider": primary,
        "fallback_providers": fallbacks,
    })
}

/// A failover config payload with trigger conditions
pub fn failover_config_json_with_conditions(
    id: &str,
    primary: &str,
    fallbacks: &[&str],
    conditions: Value,
) -> Value {
    json!({
        "id": id,
        "primary_provider": primary,
        "fallback_providers": fallbacks,
        "failover_conditions": conditions,
    })
}

/// A request descriptor payload
pub fn request_json(model: &str, prompt_length: u32) -> Value {
    json!({
        "model": model,
        "prompt_length": prompt_length,
    })
}

/// A request descriptor payload with budget constraints
pub fn request_json_with_budget(
    model: &str,
    prompt_length: u32,
    cost_budget: f64,
    latency_requirement_ms: u64,
) -> Value {
    json!({
        "model": model,
        "prompt_length": prompt_length,
        "cost_budget": cost_budget,
        "latency_requirement_ms": latency_requirement_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_json_shape() {
        let rule = rule_json("r1", "route", 5, "openai");
        assert_eq!(rule["priority"], 5);
        assert_eq!(rule["target_provider"], "openai");
    }

    #[test]
    fn test_failover_config_json_shape() {
        let config = failover_config_json("cfg-1", "openai", &["anthropic", "groq"]);
        assert_eq!(config["fallback_providers"].as_array().unwrap().len(), 2);
    }
}
