//! Group command handlers.

use pcc_api::Client;
use pcc_api::groups::Group;
use tabled::Tabled;

use crate::cli::{GlobalOpts, GroupInput, GroupsArgs, GroupsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Users")]
    users: usize,
    #[tabled(rename = "Collections")]
    collections: String,
}

impl From<&Group> for GroupRow {
    fn from(g: &Group) -> Self {
        Self {
            name: g.name.clone(),
            role: g.role.clone(),
            source: group_source(g).into(),
            users: g.users.len(),
            collections: g
                .permissions
                .iter()
                .flat_map(|p| p.collections.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn group_source(g: &Group) -> &'static str {
    if g.ldap_group {
        "ldap"
    } else if g.saml_group {
        "saml"
    } else if g.oauth_group {
        "oauth"
    } else if g.oidc_group {
        "oidc"
    } else {
        "local"
    }
}

// ── Input ───────────────────────────────────────────────────────────

fn group_from_input(input: GroupInput) -> Result<Group, CliError> {
    if let Some(ref path) = input.from_file {
        let group: Group = util::read_json_file(path)?;
        if group.name.is_empty() {
            return Err(CliError::Validation {
                field: "groupName".into(),
                reason: format!("{} does not name the group", path.display()),
            });
        }
        return Ok(group);
    }

    let name = input.name.unwrap_or_default();
    if name.is_empty() {
        return Err(CliError::Validation {
            field: "name".into(),
            reason: "group name cannot be empty".into(),
        });
    }
    Ok(Group {
        name,
        role: input.role.unwrap_or_default(),
        ..Group::default()
    })
}

fn not_found(name: &str, err: pcc_api::Error) -> CliError {
    if err.is_not_found() {
        CliError::NotFound {
            resource_type: "group".into(),
            identifier: name.into(),
            list_command: "groups list".into(),
        }
    } else {
        err.into()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &Client, args: GroupsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List => {
            let groups = client.list_groups().await?;
            let out = output::render_list(
                global.format(),
                &groups,
                |g| GroupRow::from(g),
                |g| g.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Create(input) => {
            let group = group_from_input(input)?;
            client.create_group(&group).await?;
            output::status(&format!("Group '{}' created", group.name), global.quiet);
            Ok(())
        }

        GroupsCommand::Update(input) => {
            let group = group_from_input(input)?;
            client
                .update_group(&group)
                .await
                .map_err(|e| not_found(&group.name, e))?;
            output::status(&format!("Group '{}' updated", group.name), global.quiet);
            Ok(())
        }

        GroupsCommand::Delete { name } => {
            if !util::confirm(&format!("Delete group '{name}'?"), global.yes)? {
                return Ok(());
            }
            client
                .delete_group(&name)
                .await
                .map_err(|e| not_found(&name, e))?;
            output::status(&format!("Group '{name}' deleted"), global.quiet);
            Ok(())
        }
    }
}
