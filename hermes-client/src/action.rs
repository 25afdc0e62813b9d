//! Store actions and their validated commands
//!
//! `Action` is the closed set of action names accepted on the command line.
//! `Command` carries the validated arguments of one action and knows which
//! request it maps to.

use crate::error::UsageError;
use crate::request::{Endpoint, Method, StoreRequest};
use strum::{Display, EnumIter, EnumString};

/// Separator between group and key in an item path
pub const ITEM_SEPARATOR: char = '/';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
    GetItem,
    SetItem,
    RemItem,
    FilterItem,
    ListGroups,
    CreateGroup,
    RemGroup,
}

impl Action {
    /// Needs a second argument (group or item path)
    pub fn needs_target(self) -> bool {
        !matches!(self, Action::ListGroups)
    }

    /// Needs the second argument in `<group>/<key>` form
    pub fn needs_item_path(self) -> bool {
        matches!(
            self,
            Action::GetItem | Action::SetItem | Action::RemItem | Action::FilterItem
        )
    }

    pub fn needs_value(self) -> bool {
        matches!(self, Action::SetItem)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GetItem { group: String, key: String },
    SetItem { group: String, key: String, value: String },
    RemItem { group: String, key: String },
    FilterItem { group: String, key: String },
    ListGroups,
    CreateGroup { group: String },
    RemGroup { group: String },
}

/// Split an item path on its first separator.
///
/// `g/a/b` gives group `g` and key `a/b`.
pub fn split_item_path(path: &str) -> Option<(&str, &str)> {
    path.split_once(ITEM_SEPARATOR)
}

impl Command {
    /// Validate positional arguments (action first) into a command.
    ///
    /// Checks run in a fixed order: action present, action known, target
    /// present, separator present, value present.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, UsageError> {
        let name = args.first().ok_or(UsageError::MissingAction)?.as_ref();
        let action: Action = name
            .parse()
            .map_err(|_| UsageError::InvalidAction(name.to_string()))?;

        let target = if action.needs_target() {
            args.get(1)
                .map(|arg| arg.as_ref())
                .ok_or(UsageError::MissingTarget(action))?
        } else {
            ""
        };

        let (group, key) = if action.needs_item_path() {
            split_item_path(target).ok_or(UsageError::MissingSeparator)?
        } else {
            (target, "")
        };

        let value = if action.needs_value() {
            if args.len() < 3 {
                return Err(UsageError::MissingValue(action));
            }
            args[2..]
                .iter()
                .map(|arg| arg.as_ref())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            String::new()
        };

        let (group, key) = (group.to_string(), key.to_string());
        Ok(match action {
            Action::GetItem => Command::GetItem { group, key },
            Action::SetItem => Command::SetItem { group, key, value },
            Action::RemItem => Command::RemItem { group, key },
            Action::FilterItem => Command::FilterItem { group, key },
            Action::ListGroups => Command::ListGroups,
            Action::CreateGroup => Command::CreateGroup { group },
            Action::RemGroup => Command::RemGroup { group },
        })
    }

    pub fn action(&self) -> Action {
        match self {
            Command::GetItem { .. } => Action::GetItem,
            Command::SetItem { .. } => Action::SetItem,
            Command::RemItem { .. } => Action::RemItem,
            Command::FilterItem { .. } => Action::FilterItem,
            Command::ListGroups => Action::ListGroups,
            Command::CreateGroup { .. } => Action::CreateGroup,
            Command::RemGroup { .. } => Action::RemGroup,
        }
    }

    /// Request issued for this command
    pub fn request(&self) -> StoreRequest {
        match self {
            Command::GetItem { group, key } => item_request(Method::Get, Endpoint::Item, group, key),
            Command::SetItem { group, key, value } => {
                item_request(Method::Post, Endpoint::Item, group, key).with_body(value.clone())
            }
            Command::RemItem { group, key } => item_request(Method::Delete, Endpoint::Item, group, key),
            Command::FilterItem { group, key } => item_request(Method::Get, Endpoint::Filter, group, key),
            Command::ListGroups => StoreRequest::new(Method::Get, Endpoint::Group),
            Command::CreateGroup { group } => {
                StoreRequest::new(Method::Post, Endpoint::Group)
                    .with_query("name", group)
                    .with_body(String::new())
            }
            Command::RemGroup { group } => {
                StoreRequest::new(Method::Delete, Endpoint::Group).with_query("name", group)
            }
        }
    }

    /// Positional arguments that reproduce this command on the command line
    pub fn to_args(&self) -> Vec<String> {
        let action = self.action().to_string();
        match self {
            Command::GetItem { group, key }
            | Command::RemItem { group, key }
            | Command::FilterItem { group, key } => vec![action, item_path(group, key)],
            Command::SetItem { group, key, value } => vec![action, item_path(group, key), value.clone()],
            Command::ListGroups => vec![action],
            Command::CreateGroup { group } | Command::RemGroup { group } => vec![action, group.clone()],
        }
    }
}

fn item_path(group: &str, key: &str) -> String {
    format!("{group}{ITEM_SEPARATOR}{key}")
}

fn item_request(method: Method, endpoint: Endpoint, group: &str, key: &str) -> StoreRequest {
    StoreRequest::new(method, endpoint)
        .with_query("name", key)
        .with_query("group", group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn parse(args: &[&str]) -> Result<Command, UsageError> {
        Command::parse(args)
    }

    #[test]
    fn test_action_names_round_trip() {
        let names: Vec<String> = Action::iter().map(|a| a.to_string()).collect();
        assert_eq!(
            names,
            ["get-item", "set-item", "rem-item", "filter-item", "list-groups", "create-group", "rem-group"]
        );
        assert_eq!("filter-item".parse::<Action>().unwrap(), Action::FilterItem);
        assert!("GetItem".parse::<Action>().is_err());
    }

    #[test]
    fn test_missing_and_invalid_action() {
        assert_eq!(parse(&[]), Err(UsageError::MissingAction));
        assert_eq!(parse(&["drop-item", "a/b"]), Err(UsageError::InvalidAction("drop-item".into())));
    }

    #[test]
    fn test_every_targeted_action_requires_second_argument() {
        for action in Action::iter().filter(|a| a.needs_target()) {
            let name = action.to_string();
            assert_eq!(parse(&[name.as_str()]), Err(UsageError::MissingTarget(action)));
        }
        assert_eq!(parse(&["list-groups"]), Ok(Command::ListGroups));
    }

    #[test]
    fn test_item_actions_require_separator() {
        for name in ["get-item", "set-item", "rem-item", "filter-item"] {
            assert_eq!(parse(&[name, "memory", "1"]), Err(UsageError::MissingSeparator));
        }
        // group actions take the raw name, slash or not
        assert_eq!(
            parse(&["create-group", "memory"]),
            Ok(Command::CreateGroup { group: "memory".into() })
        );
    }

    #[test]
    fn test_split_on_first_separator_only() {
        assert_eq!(split_item_path("g/a/b"), Some(("g", "a/b")));
        assert_eq!(
            parse(&["get-item", "g/a/b"]),
            Ok(Command::GetItem { group: "g".into(), key: "a/b".into() })
        );
    }

    #[test]
    fn test_set_item_requires_value() {
        assert_eq!(parse(&["set-item", "memory/atihome.total"]), Err(UsageError::MissingValue(Action::SetItem)));
    }

    #[test]
    fn test_set_item_joins_value_arguments() {
        let single = parse(&["set-item", "g/k", "42"]).unwrap();
        assert_eq!(single, Command::SetItem { group: "g".into(), key: "k".into(), value: "42".into() });

        let many = parse(&["set-item", "g/k", "a", "b c", "d"]).unwrap();
        assert_eq!(many, Command::SetItem { group: "g".into(), key: "k".into(), value: "a b c d".into() });
    }

    #[test]
    fn test_request_mapping() {
        let cases = [
            (vec!["get-item", "g/k"], Method::Get, Endpoint::Item),
            (vec!["set-item", "g/k", "v"], Method::Post, Endpoint::Item),
            (vec!["rem-item", "g/k"], Method::Delete, Endpoint::Item),
            (vec!["filter-item", "g/k"], Method::Get, Endpoint::Filter),
            (vec!["list-groups"], Method::Get, Endpoint::Group),
            (vec!["create-group", "g"], Method::Post, Endpoint::Group),
            (vec!["rem-group", "g"], Method::Delete, Endpoint::Group),
        ];
        for (args, method, endpoint) in cases {
            let request = parse(&args).unwrap().request();
            assert_eq!((request.method, request.endpoint), (method, endpoint), "{args:?}");
        }
    }

    #[test]
    fn test_item_request_carries_name_group_and_body() {
        let request = parse(&["set-item", "memory/atihome.total", "1000"]).unwrap().request();
        assert_eq!(request.query_value("name"), Some("atihome.total"));
        assert_eq!(request.query_value("group"), Some("memory"));
        assert_eq!(request.body.as_deref(), Some("1000"));

        let listing = Command::ListGroups.request();
        assert!(listing.query.is_empty());
        assert_eq!(listing.body, None);
    }

    #[test]
    fn test_to_args_reparses_to_same_command() {
        let commands = [
            Command::SetItem { group: "storage".into(), key: "pihome.root.used".into(), value: "12 34".into() },
            Command::FilterItem { group: "g".into(), key: "a/b".into() },
            Command::CreateGroup { group: "system".into() },
            Command::ListGroups,
        ];
        for command in commands {
            assert_eq!(Command::parse(&command.to_args()), Ok(command.clone()));
        }
    }
}
