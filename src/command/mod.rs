use brush_parser::ast;

/// A single program invocation parsed from a step's command string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Error returned when a command string cannot be turned into a single invocation.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ParseError(pub String);

/// Parse a shell command string into exactly one program invocation.
///
/// brush-parser builds the shell AST so quoting and operators are recognized
/// properly. Anything beyond a plain `program arg...` form is rejected:
/// sequences, background `&`, `&&`/`||` chains, pipelines, compound
/// commands, redirections and leading `NAME=value` assignments. Words are unquoted but never
/// expanded (no `$VAR`, globs or `~`).
pub(crate) fn parse(command: &str) -> Result<CommandLine, ParseError> {
    if command.trim().is_empty() {
        return Err(ParseError("empty command".to_string()));
    }

    let mut parser = brush_parser::Parser::builder()
        .reader(std::io::Cursor::new(command.to_string()))
        .build();

    let program = parser
        .parse_program()
        .map_err(|e| ParseError(e.to_string()))?;

    let [complete_command] = program.complete_commands.as_slice() else {
        return Err(multiple_commands(command));
    };
    // CompleteCommand = CompoundList, CompoundList.0 = Vec<CompoundListItem>
    let [item] = complete_command.0.as_slice() else {
        return Err(multiple_commands(command));
    };
    // CompoundListItem(AndOrList, SeparatorOperator)
    if matches!(item.1, ast::SeparatorOperator::Async) {
        return Err(ParseError(format!(
            "'{command}' runs in the background; the gate must wait for every step"
        )));
    }
    let and_or = &item.0;
    if !and_or.additional.is_empty() {
        return Err(multiple_commands(command));
    }

    let [single] = and_or.first.seq.as_slice() else {
        return Err(ParseError(format!(
            "'{command}' is a pipeline; wrap it in a script and run that instead"
        )));
    };

    match single {
        ast::Command::Simple(simple) => visit_simple(command, simple),
        _ => Err(ParseError(format!(
            "'{command}' is a compound command; only simple commands are supported"
        ))),
    }
}

fn multiple_commands(command: &str) -> ParseError {
    ParseError(format!(
        "'{command}' contains multiple commands; use separate step entries instead"
    ))
}

fn visit_simple(command: &str, simple: &ast::SimpleCommand) -> Result<CommandLine, ParseError> {
    if simple.prefix.is_some() {
        return Err(ParseError(format!(
            "'{command}' starts with an assignment or redirection; use an env node instead"
        )));
    }

    let program = simple
        .word_or_name
        .as_ref()
        .map(|word| unquote(&word.flatten()))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ParseError(format!("no program found in '{command}'")))?;

    let mut args = Vec::new();
    if let Some(suffix) = &simple.suffix {
        for item in &suffix.0 {
            match item {
                ast::CommandPrefixOrSuffixItem::Word(word) => args.push(unquote(&word.flatten())),
                _ => {
                    return Err(ParseError(format!(
                        "'{command}' uses redirections or substitutions, which are not supported"
                    )))
                }
            }
        }
    }

    Ok(CommandLine { program, args })
}

/// Remove shell quoting from a raw word.
///
/// brush-parser keeps quotes in the word text. Single quotes are literal,
/// double quotes allow `\"`, `\\`, `` \` `` and `\$` escapes, and an unquoted
/// backslash escapes the next character.
fn unquote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                for inner in chars.by_ref() {
                    if inner == '\'' {
                        break;
                    }
                    out.push(inner);
                }
            }
            '"' => {
                while let Some(inner) = chars.next() {
                    match inner {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some(next @ ('"' | '\\' | '`' | '$')) => out.push(next),
                            Some(next) => {
                                out.push('\\');
                                out.push(next);
                            }
                            None => out.push('\\'),
                        },
                        other => out.push(other),
                    }
                }
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            other => out.push(other),
        }
    }
    out
}
