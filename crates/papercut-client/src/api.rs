//! Typed wrappers for the consumed server operations.
//!
//! One method per remote operation the admin console uses. Each wrapper
//! coerces the generic decoded value to the shape that operation returns;
//! a well-formed response of the wrong shape surfaces as a decode error,
//! never as a silently-empty result.

use papercut_protocol::{DecodeError, RpcArg, RpcValue};

use crate::client::RpcClient;
use crate::config::EndpointConfig;
use crate::error::{CallError, CallResult};

/// User property holding the display name.
pub const PROP_FULL_NAME: &str = "full-name";
/// User property holding the email address.
pub const PROP_EMAIL: &str = "email";
/// Paging window the console uses when listing users and groups.
pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// Fields for the create-user convenience flow.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: Option<String>,
    /// Starting account balance; credited only when positive.
    pub initial_balance: f64,
}

impl RpcClient {
    /// Fetches the server version string. Doubles as a connectivity and
    /// token check.
    pub async fn server_version(&self, config: &EndpointConfig) -> CallResult<String> {
        expect_text(self.call(config, "getServerVersion", &[]).await?)
    }

    /// Lists usernames, paged by `offset` and `limit`.
    pub async fn list_user_accounts(
        &self,
        config: &EndpointConfig,
        offset: u32,
        limit: u32,
    ) -> CallResult<Vec<String>> {
        expect_list(
            self.call(
                config,
                "listUserAccounts",
                &[
                    RpcArg::Number(f64::from(offset)),
                    RpcArg::Number(f64::from(limit)),
                ],
            )
            .await?,
        )
    }

    /// Lists group names, paged by `offset` and `limit`.
    pub async fn list_user_groups(
        &self,
        config: &EndpointConfig,
        offset: u32,
        limit: u32,
    ) -> CallResult<Vec<String>> {
        expect_list(
            self.call(
                config,
                "listUserGroups",
                &[
                    RpcArg::Number(f64::from(offset)),
                    RpcArg::Number(f64::from(limit)),
                ],
            )
            .await?,
        )
    }

    /// Creates a user account with the given username.
    pub async fn add_new_user(&self, config: &EndpointConfig, username: &str) -> CallResult<()> {
        self.call(config, "addNewUser", &[RpcArg::from(username)])
            .await?;
        Ok(())
    }

    /// Sets a named property on a user (see [`PROP_FULL_NAME`], [`PROP_EMAIL`]).
    pub async fn set_user_property(
        &self,
        config: &EndpointConfig,
        username: &str,
        property: &str,
        value: &str,
    ) -> CallResult<()> {
        self.call(
            config,
            "setUserProperty",
            &[
                RpcArg::from(username),
                RpcArg::from(property),
                RpcArg::from(value),
            ],
        )
        .await?;
        Ok(())
    }

    /// Adjusts a user's account balance by `amount`, with an audit comment.
    pub async fn adjust_user_account_balance(
        &self,
        config: &EndpointConfig,
        username: &str,
        amount: f64,
        comment: &str,
    ) -> CallResult<()> {
        self.call(
            config,
            "adjustUserAccountBalance",
            &[
                RpcArg::from(username),
                RpcArg::Number(amount),
                RpcArg::from(comment),
            ],
        )
        .await?;
        Ok(())
    }

    /// Deletes a user account.
    ///
    /// The trailing flag is forwarded to the server verbatim; the callers
    /// observed so far always pass `false` and never document its meaning.
    // TODO: confirm the trailing boolean's semantics against the PaperCut
    // XML-RPC API reference.
    pub async fn delete_existing_user(
        &self,
        config: &EndpointConfig,
        username: &str,
        flag: bool,
    ) -> CallResult<()> {
        self.call(
            config,
            "deleteExistingUser",
            &[RpcArg::from(username), RpcArg::Bool(flag)],
        )
        .await?;
        Ok(())
    }

    /// Creates a group.
    pub async fn add_new_group(&self, config: &EndpointConfig, group: &str) -> CallResult<()> {
        self.call(config, "addNewGroup", &[RpcArg::from(group)])
            .await?;
        Ok(())
    }

    /// Renames a group.
    pub async fn rename_user_group(
        &self,
        config: &EndpointConfig,
        old_name: &str,
        new_name: &str,
    ) -> CallResult<()> {
        self.call(
            config,
            "renameUserGroup",
            &[RpcArg::from(old_name), RpcArg::from(new_name)],
        )
        .await?;
        Ok(())
    }

    /// Deletes a group.
    pub async fn delete_existing_group(
        &self,
        config: &EndpointConfig,
        group: &str,
    ) -> CallResult<()> {
        self.call(config, "deleteExistingGroup", &[RpcArg::from(group)])
            .await?;
        Ok(())
    }

    /// Adds a user to a group.
    pub async fn add_user_to_group(
        &self,
        config: &EndpointConfig,
        username: &str,
        group: &str,
    ) -> CallResult<()> {
        self.call(
            config,
            "addUserToGroup",
            &[RpcArg::from(username), RpcArg::from(group)],
        )
        .await?;
        Ok(())
    }

    /// Removes a user from a group.
    pub async fn remove_user_from_group(
        &self,
        config: &EndpointConfig,
        username: &str,
        group: &str,
    ) -> CallResult<()> {
        self.call(
            config,
            "removeUserFromGroup",
            &[RpcArg::from(username), RpcArg::from(group)],
        )
        .await?;
        Ok(())
    }

    /// Lists the groups a user belongs to.
    pub async fn get_user_groups(
        &self,
        config: &EndpointConfig,
        username: &str,
    ) -> CallResult<Vec<String>> {
        expect_list(
            self.call(config, "getUserGroups", &[RpcArg::from(username)])
                .await?,
        )
    }

    /// Creates a user and applies its initial properties in sequence:
    /// account, full name, email (if present), then a positive starting
    /// balance. Mirrors the console's create-user flow. The steps are
    /// separate calls; a failure partway leaves the earlier steps applied.
    pub async fn create_user(&self, config: &EndpointConfig, user: &NewUser) -> CallResult<()> {
        self.add_new_user(config, &user.username).await?;
        self.set_user_property(config, &user.username, PROP_FULL_NAME, &user.full_name)
            .await?;
        if let Some(email) = &user.email {
            self.set_user_property(config, &user.username, PROP_EMAIL, email)
                .await?;
        }
        if user.initial_balance > 0.0 {
            self.adjust_user_account_balance(
                config,
                &user.username,
                user.initial_balance,
                "Initial balance",
            )
            .await?;
        }
        Ok(())
    }
}

fn expect_text(value: RpcValue) -> CallResult<String> {
    match value {
        RpcValue::Text(text) => Ok(text),
        other => Err(CallError::Decode(DecodeError::UnexpectedValue {
            expected: "string",
            found: other.kind(),
        })),
    }
}

fn expect_list(value: RpcValue) -> CallResult<Vec<String>> {
    match value {
        RpcValue::List(items) => Ok(items),
        other => Err(CallError::Decode(DecodeError::UnexpectedValue {
            expected: "array",
            found: other.kind(),
        })),
    }
}
