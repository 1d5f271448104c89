//! Postback command grammar.

use crate::error::DispatchError;

/// A parsed postback command.
///
/// The wire form is a single opaque token. A token without spaces is an
/// implicit `SELECT <postBackId>`; otherwise the first space-delimited
/// token names the command and the remaining tokens are positional
/// arguments. Splitting is on single spaces — not on whitespace runs — so
/// an empty argument (MOVE's "new root" destination parent) survives
/// parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select {
        node: String,
    },
    Move {
        node: String,
        dest_tree: String,
        /// Postback id of the destination parent; empty means "new root".
        dest_parent: String,
        index: usize,
    },
    Copy {
        dest: String,
        sources: Vec<String>,
    },
    Label {
        node: String,
        /// Already URL-decoded.
        text: String,
    },
    Check {
        node: String,
        checked: bool,
    },
    Expand {
        node: String,
    },
    Collapse {
        node: String,
    },
}

impl Command {
    /// Parses the opaque postback token.
    pub fn parse(raw: &str) -> Result<Self, DispatchError> {
        if !raw.contains(' ') {
            if raw.is_empty() {
                return Err(DispatchError::UnknownCommand(String::new()));
            }
            return Ok(Self::Select {
                node: raw.to_string(),
            });
        }

        let mut tokens = raw.split(' ');
        let name = tokens.next().unwrap_or("");
        let args: Vec<&str> = tokens.collect();

        match name {
            "SELECT" => Ok(Self::Select {
                node: arg(&args, 0, "SELECT", "id")?.to_string(),
            }),
            "MOVE" => {
                let node = arg(&args, 0, "MOVE", "id")?.to_string();
                let dest_tree = arg(&args, 1, "MOVE", "destTreeId")?.to_string();
                let dest_parent = arg(&args, 2, "MOVE", "destParentId")?.to_string();
                let index = arg(&args, 3, "MOVE", "index")?;
                let index = index.parse::<usize>().map_err(|_| {
                    DispatchError::invalid_argument("MOVE", "index", format!("{index:?}"))
                })?;
                Ok(Self::Move {
                    node,
                    dest_tree,
                    dest_parent,
                    index,
                })
            }
            "COPY" => {
                let dest = arg(&args, 0, "COPY", "destId")?.to_string();
                let sources: Vec<String> = arg(&args, 1, "COPY", "idList")?
                    .split(',')
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
                if sources.is_empty() {
                    return Err(DispatchError::invalid_argument(
                        "COPY",
                        "idList",
                        "empty id list",
                    ));
                }
                Ok(Self::Copy { dest, sources })
            }
            "LABEL" => {
                let node = arg(&args, 0, "LABEL", "id")?.to_string();
                let encoded = arg(&args, 1, "LABEL", "text")?;
                // '+' is the form encoding of a space; decode handles the
                // percent escapes as UTF-8.
                let text = urlencoding::decode(&encoded.replace('+', " "))
                    .map_err(|err| {
                        DispatchError::invalid_argument("LABEL", "text", err.to_string())
                    })?
                    .into_owned();
                Ok(Self::Label { node, text })
            }
            "CHECK" => {
                let node = arg(&args, 0, "CHECK", "id")?.to_string();
                let literal = arg(&args, 1, "CHECK", "checked")?;
                let checked = parse_bool_literal(literal).ok_or_else(|| {
                    DispatchError::invalid_argument("CHECK", "checked", format!("{literal:?}"))
                })?;
                Ok(Self::Check { node, checked })
            }
            "EXPAND" => Ok(Self::Expand {
                node: arg(&args, 0, "EXPAND", "id")?.to_string(),
            }),
            "COLLAPSE" => Ok(Self::Collapse {
                node: arg(&args, 0, "COLLAPSE", "id")?.to_string(),
            }),
            other => Err(DispatchError::UnknownCommand(other.to_string())),
        }
    }
}

fn arg<'a>(
    args: &[&'a str],
    index: usize,
    command: &'static str,
    name: &'static str,
) -> Result<&'a str, DispatchError> {
    args.get(index)
        .copied()
        .ok_or(DispatchError::MissingArgument {
            command,
            name,
            index,
        })
}

fn parse_bool_literal(literal: &str) -> Option<bool> {
    match literal {
        "1" => Some(true),
        "0" => Some(false),
        _ if literal.eq_ignore_ascii_case("true") => Some(true),
        _ if literal.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}
