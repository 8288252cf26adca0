use super::document::{ConfigSection, ParseNode};
use super::{ConfigError, GateConfig, Step};

/// Build a `GateConfig` from the `gate { ... }` section.
///
/// Nodes are read in document order so steps run in the order written.
/// Absent `step` nodes fall back to the default step; absent `success`
/// keeps the default confirmation lines.
pub(super) fn parse_section(section: &ConfigSection) -> Result<GateConfig, ConfigError> {
    let mut config = GateConfig {
        steps: Vec::new(),
        ..GateConfig::default()
    };

    for node in section.nodes() {
        let line = node.line();
        if node.has_children() {
            return Err(ConfigError::ParseError(format!(
                "line {line}: {} node does not take a children block",
                node.name()
            )));
        }
        match node.name() {
            "step" => parse_step(&node, &mut config.steps)?,
            "env" => {
                let (name, value) = exactly_two(&node, "env", "a variable name and a value")?;
                if name.is_empty() || name.contains('=') {
                    return Err(ConfigError::ValidationError(format!(
                        "line {line}: invalid environment variable name '{name}'"
                    )));
                }
                config.env.push((name.to_string(), value.to_string()));
            }
            "success" => {
                let (first, second) = exactly_two(&node, "success", "two message lines")?;
                config.success = [first.to_string(), second.to_string()];
            }
            other => {
                return Err(ConfigError::ParseError(format!(
                    "line {line}: unknown node '{other}' in gate section \
                     (expected step, env or success)"
                )))
            }
        }
    }

    if config.steps.is_empty() {
        config.steps = GateConfig::default().steps;
    }
    Ok(config)
}

fn parse_step(node: &ParseNode, steps: &mut Vec<Step>) -> Result<(), ConfigError> {
    let line = node.line();
    let values = node.string_values();
    if values.is_empty() || values.len() != node.entry_count() {
        return Err(ConfigError::ParseError(format!(
            "line {line}: step node takes one or more command strings"
        )));
    }
    for value in values {
        let step = Step::parse(value)
            .map_err(|e| ConfigError::ParseError(format!("line {line}: {e}")))?;
        steps.push(step);
    }
    Ok(())
}

fn exactly_two<'a>(
    node: &ParseNode<'a>,
    kind: &str,
    expected: &str,
) -> Result<(&'a str, &'a str), ConfigError> {
    let values = node.string_values();
    match (values.as_slice(), node.entry_count()) {
        ([first, second], 2) => Ok((*first, *second)),
        _ => Err(ConfigError::ParseError(format!(
            "line {}: {kind} node takes exactly {expected}",
            node.line()
        ))),
    }
}
