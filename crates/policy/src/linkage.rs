//! Parent/sub account linkage decisions.
//!
//! # Rules
//!
//! - An account is a *sub account* when its parent link resolves to an
//!   existing account. A dangling link does not count.
//! - Parent data is *displayed* for a sub account only when all of these
//!   hold: the request is a storefront request (neither backend nor
//!   isolated), the account is a sub account, and
//!   [`LinkageConfig::display_parent_account_data`] is set.
//! - While parent data is displayed, any address the sub account lacks is
//!   replaced by the parent's in the returned value, and the sub account may
//!   not create addresses. Its own data is never touched.
//! - Sub accounts can neither view prices nor buy. This does not depend on
//!   the display flag or the request environment.
//!
//! Every decision is recomputed from the directory on each call.

use serde::Serialize;
use subaccounts_core::{Account, AccountId, Address, AddressKind, RequestEnvironment};

use crate::config::LinkageConfig;
use crate::directory::AccountDirectory;

/// Decides sub account relations and permissions.
#[derive(Debug, Clone)]
pub struct AccountLinkagePolicy<D> {
    directory: D,
    config: LinkageConfig,
}

/// Every decision for one account, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDecisions {
    pub account_id: AccountId,
    pub environment: RequestEnvironment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_account_id: Option<AccountId>,
    pub sub_account_ids: Vec<AccountId>,
    pub is_sub_account: bool,
    pub is_parent_account: bool,
    pub display_parent_account_data: bool,
    pub can_create_address: bool,
    pub can_view_price: bool,
    pub can_buy: bool,
}

/// The addresses an account sees after delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedAddresses {
    pub addresses: Vec<Address>,
    pub invoice_address: Option<Address>,
    pub shipping_address: Option<Address>,
}

impl<D: AccountDirectory> AccountLinkagePolicy<D> {
    /// Create a policy over `directory`.
    pub const fn new(directory: D, config: LinkageConfig) -> Self {
        Self { directory, config }
    }

    /// The account's parent, if its parent link resolves.
    pub fn parent_account(&self, account: &Account) -> Option<Account> {
        account
            .parent_account_id
            .and_then(|id| self.directory.find_account(id))
    }

    /// Accounts linked to `account` as their parent.
    pub fn sub_accounts(&self, account: &Account) -> Vec<Account> {
        self.directory.sub_accounts_of(account.id)
    }

    /// Whether `account` is linked to an existing parent account.
    pub fn is_sub_account(&self, account: &Account) -> bool {
        self.parent_account(account).is_some()
    }

    /// Whether any account is linked to `account` as its parent.
    pub fn is_parent_account(&self, account: &Account) -> bool {
        self.has_sub_accounts(account)
    }

    /// Alias for [`is_parent_account`](Self::is_parent_account).
    pub fn has_sub_accounts(&self, account: &Account) -> bool {
        self.directory.has_sub_accounts(account.id)
    }

    /// Whether `account` sees its parent's data in this request.
    pub fn should_display_parent_account_data(
        &self,
        account: &Account,
        env: RequestEnvironment,
    ) -> bool {
        !(env.is_isolated() || env.is_backend())
            && self.config.display_parent_account_data
            && self.is_sub_account(account)
    }

    /// The address list `account` sees.
    ///
    /// Returns `own` unless it is empty and parent data is displayed, in which
    /// case the parent's addresses are returned instead.
    pub fn resolve_address_list(
        &self,
        account: &Account,
        env: RequestEnvironment,
        own: Vec<Address>,
    ) -> Vec<Address> {
        if !own.is_empty() || !self.should_display_parent_account_data(account, env) {
            return own;
        }
        let Some(parent) = self.parent_account(account) else {
            return own;
        };

        let inherited = self.directory.addresses_of(parent.id);
        tracing::debug!(
            account_id = %account.id,
            parent_id = %parent.id,
            count = inherited.len(),
            "Showing parent account addresses"
        );
        inherited
    }

    /// The invoice address `account` sees.
    pub fn resolve_invoice_address(
        &self,
        account: &Account,
        env: RequestEnvironment,
        own: Option<Address>,
    ) -> Option<Address> {
        self.resolve_designated_address(account, env, own, AddressKind::Invoice)
    }

    /// The shipping address `account` sees.
    pub fn resolve_shipping_address(
        &self,
        account: &Account,
        env: RequestEnvironment,
        own: Option<Address>,
    ) -> Option<Address> {
        self.resolve_designated_address(account, env, own, AddressKind::Shipping)
    }

    fn resolve_designated_address(
        &self,
        account: &Account,
        env: RequestEnvironment,
        own: Option<Address>,
        kind: AddressKind,
    ) -> Option<Address> {
        if own.as_ref().is_some_and(Address::exists)
            || !self.should_display_parent_account_data(account, env)
        {
            return own;
        }
        let Some(parent) = self.parent_account(account) else {
            return own;
        };

        tracing::debug!(
            account_id = %account.id,
            parent_id = %parent.id,
            %kind,
            "Showing parent account address"
        );
        self.directory.designated_address_of(&parent, kind)
    }

    /// Whether `account` may create an address. Anonymous visitors may.
    pub fn can_create_address(&self, account: Option<&Account>, env: RequestEnvironment) -> bool {
        !account.is_some_and(|a| self.should_display_parent_account_data(a, env))
    }

    /// Whether `account` may see product prices. Anonymous visitors may.
    pub fn can_view_price(&self, account: Option<&Account>) -> bool {
        !account.is_some_and(|a| self.is_sub_account(a))
    }

    /// Whether `account` may buy products. Anonymous visitors may.
    pub fn can_buy(&self, account: Option<&Account>) -> bool {
        !account.is_some_and(|a| self.is_sub_account(a))
    }

    /// Resolve all of `account`'s addresses as the directory stores them.
    pub fn resolve_addresses(
        &self,
        account: &Account,
        env: RequestEnvironment,
    ) -> ResolvedAddresses {
        let own_list = self.directory.addresses_of(account.id);
        let own_invoice = self.directory.invoice_address_of(account);
        let own_shipping = self.directory.shipping_address_of(account);

        ResolvedAddresses {
            addresses: self.resolve_address_list(account, env, own_list),
            invoice_address: self.resolve_invoice_address(account, env, own_invoice),
            shipping_address: self.resolve_shipping_address(account, env, own_shipping),
        }
    }

    /// Every decision for `account` in `env`.
    pub fn decisions(&self, account: &Account, env: RequestEnvironment) -> AccountDecisions {
        let parent = self.parent_account(account);
        let sub_account_ids: Vec<AccountId> =
            self.sub_accounts(account).into_iter().map(|a| a.id).collect();

        let decisions = AccountDecisions {
            account_id: account.id,
            environment: env,
            parent_account_id: parent.as_ref().map(|p| p.id),
            is_sub_account: parent.is_some(),
            is_parent_account: !sub_account_ids.is_empty(),
            sub_account_ids,
            display_parent_account_data: self.should_display_parent_account_data(account, env),
            can_create_address: self.can_create_address(Some(account), env),
            can_view_price: self.can_view_price(Some(account)),
            can_buy: self.can_buy(Some(account)),
        };
        tracing::trace!(?decisions, "Evaluated account decisions");
        decisions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use subaccounts_core::AddressId;

    use super::*;
    use crate::directory::InMemoryDirectory;

    const PARENT: AccountId = AccountId::new(1);
    const SUB: AccountId = AccountId::new(2);
    const LONE: AccountId = AccountId::new(3);

    const ENVS: [RequestEnvironment; 3] = [
        RequestEnvironment::Storefront,
        RequestEnvironment::Backend,
        RequestEnvironment::Isolated,
    ];

    fn address(id: i32, owner: AccountId, city: &str) -> Address {
        let mut address = Address::blank(owner);
        address.id = Some(AddressId::new(id));
        address.city = city.to_string();
        address
    }

    /// Parent 1 with two addresses, sub account 2 without any, lone account 3.
    fn directory() -> InMemoryDirectory {
        let mut directory = InMemoryDirectory::new();
        directory.insert_account(
            Account::new(PARENT, "Head office")
                .with_invoice_address(AddressId::new(10))
                .with_shipping_address(AddressId::new(11)),
        );
        directory.insert_account(Account::new(SUB, "Branch"));
        directory.insert_account(Account::new(LONE, "Walk-in"));
        directory.link_parent(SUB, PARENT).unwrap();
        directory.insert_address(address(10, PARENT, "Berlin")).unwrap();
        directory.insert_address(address(11, PARENT, "Hamburg")).unwrap();
        directory
    }

    fn account(directory: &InMemoryDirectory, id: AccountId) -> Account {
        directory.find_account(id).unwrap()
    }

    #[test]
    fn test_relations() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));

        let parent = account(&directory, PARENT);
        let sub = account(&directory, SUB);
        let lone = account(&directory, LONE);

        assert!(policy.is_sub_account(&sub));
        assert!(!policy.is_sub_account(&parent));
        assert!(!policy.is_sub_account(&lone));

        assert!(policy.is_parent_account(&parent));
        assert!(policy.has_sub_accounts(&parent));
        assert!(!policy.is_parent_account(&sub));
        assert!(!policy.is_parent_account(&lone));

        assert_eq!(policy.parent_account(&sub).map(|p| p.id), Some(PARENT));
        assert_eq!(
            policy.sub_accounts(&parent).into_iter().map(|a| a.id).collect::<Vec<_>>(),
            vec![SUB]
        );
    }

    #[test]
    fn test_dangling_parent_is_not_sub_account() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let orphan = Account::new(AccountId::new(9), "Orphan").with_parent(AccountId::new(404));

        assert!(!policy.is_sub_account(&orphan));
        assert!(
            !policy.should_display_parent_account_data(&orphan, RequestEnvironment::Storefront)
        );
        assert!(policy.can_buy(Some(&orphan)));
        assert!(policy.can_view_price(Some(&orphan)));
    }

    #[test]
    fn test_dangling_parent_keeps_own_addresses() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let orphan = Account::new(AccountId::new(9), "Orphan").with_parent(AccountId::new(404));

        for env in ENVS {
            assert!(policy.resolve_address_list(&orphan, env, Vec::new()).is_empty());
            assert_eq!(policy.resolve_invoice_address(&orphan, env, None), None);
        }
    }

    #[test]
    fn test_display_requires_storefront_flag_and_parent() {
        let directory = directory();
        let sub = account(&directory, SUB);
        let lone = account(&directory, LONE);

        let on = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let off = AccountLinkagePolicy::new(&directory, LinkageConfig::new(false));

        assert!(on.should_display_parent_account_data(&sub, RequestEnvironment::Storefront));
        assert!(!on.should_display_parent_account_data(&sub, RequestEnvironment::Backend));
        assert!(!on.should_display_parent_account_data(&sub, RequestEnvironment::Isolated));
        assert!(!on.should_display_parent_account_data(&lone, RequestEnvironment::Storefront));

        for env in ENVS {
            assert!(!off.should_display_parent_account_data(&sub, env));
        }
    }

    #[test]
    fn test_address_list_delegates_when_empty() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let sub = account(&directory, SUB);

        let resolved =
            policy.resolve_address_list(&sub, RequestEnvironment::Storefront, Vec::new());
        let cities: Vec<_> = resolved.iter().map(|a| a.city.as_str()).collect();
        assert_eq!(cities, vec!["Berlin", "Hamburg"]);
    }

    #[test]
    fn test_address_list_keeps_own_data() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let sub = account(&directory, SUB);
        let own = vec![address(20, SUB, "Munich")];

        for env in ENVS {
            assert_eq!(policy.resolve_address_list(&sub, env, own.clone()), own);
        }
    }

    #[test]
    fn test_address_list_backend_keeps_empty_list() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let sub = account(&directory, SUB);

        assert!(
            policy
                .resolve_address_list(&sub, RequestEnvironment::Backend, Vec::new())
                .is_empty()
        );
    }

    #[test]
    fn test_designated_addresses_delegate_when_missing() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let sub = account(&directory, SUB);
        let env = RequestEnvironment::Storefront;

        let invoice = policy.resolve_invoice_address(&sub, env, None).unwrap();
        assert_eq!(invoice.id, Some(AddressId::new(10)));

        let shipping = policy
            .resolve_shipping_address(&sub, env, Some(Address::blank(SUB)))
            .unwrap();
        assert_eq!(shipping.id, Some(AddressId::new(11)));
    }

    #[test]
    fn test_designated_addresses_keep_own_data() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let sub = account(&directory, SUB);
        let own = address(30, SUB, "Cologne");

        let invoice =
            policy.resolve_invoice_address(&sub, RequestEnvironment::Storefront, Some(own.clone()));
        assert_eq!(invoice, Some(own));
    }

    #[test]
    fn test_designated_addresses_flag_off_returns_own_unchanged() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(false));
        let sub = account(&directory, SUB);
        let blank = Address::blank(SUB);

        let invoice = policy.resolve_invoice_address(
            &sub,
            RequestEnvironment::Storefront,
            Some(blank.clone()),
        );
        assert_eq!(invoice, Some(blank));
        assert!(
            policy
                .resolve_shipping_address(&sub, RequestEnvironment::Storefront, None)
                .is_none()
        );
    }

    #[test]
    fn test_can_create_address() {
        let directory = directory();
        let sub = account(&directory, SUB);
        let lone = account(&directory, LONE);
        let on = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let off = AccountLinkagePolicy::new(&directory, LinkageConfig::new(false));

        assert!(!on.can_create_address(Some(&sub), RequestEnvironment::Storefront));
        assert!(on.can_create_address(Some(&sub), RequestEnvironment::Backend));
        assert!(off.can_create_address(Some(&sub), RequestEnvironment::Storefront));
        for env in ENVS {
            assert!(on.can_create_address(Some(&lone), env));
            assert!(on.can_create_address(None, env));
        }
    }

    #[test]
    fn test_price_and_purchase_ignore_flag() {
        let directory = directory();
        let sub = account(&directory, SUB);
        let parent = account(&directory, PARENT);

        for flag in [true, false] {
            let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(flag));
            assert!(!policy.can_view_price(Some(&sub)));
            assert!(!policy.can_buy(Some(&sub)));
            assert!(policy.can_view_price(Some(&parent)));
            assert!(policy.can_buy(Some(&parent)));
            assert!(policy.can_view_price(None));
            assert!(policy.can_buy(None));
        }
    }

    #[test]
    fn test_resolve_addresses_uses_directory() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let sub = account(&directory, SUB);

        let resolved = policy.resolve_addresses(&sub, RequestEnvironment::Storefront);
        assert_eq!(resolved.addresses.len(), 2);
        assert_eq!(resolved.invoice_address.and_then(|a| a.id), Some(AddressId::new(10)));
        assert_eq!(resolved.shipping_address.and_then(|a| a.id), Some(AddressId::new(11)));

        let isolated = policy.resolve_addresses(&sub, RequestEnvironment::Isolated);
        assert!(isolated.addresses.is_empty());
        assert!(isolated.invoice_address.is_none());
    }

    #[test]
    fn test_decisions_summary() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let sub = account(&directory, SUB);

        let decisions = policy.decisions(&sub, RequestEnvironment::Storefront);
        assert_eq!(
            decisions,
            AccountDecisions {
                account_id: SUB,
                environment: RequestEnvironment::Storefront,
                parent_account_id: Some(PARENT),
                sub_account_ids: Vec::new(),
                is_sub_account: true,
                is_parent_account: false,
                display_parent_account_data: true,
                can_create_address: false,
                can_view_price: false,
                can_buy: false,
            }
        );

        let parent = account(&directory, PARENT);
        let json =
            serde_json::to_value(policy.decisions(&parent, RequestEnvironment::Backend)).unwrap();
        assert_eq!(json["environment"], "backend");
        assert_eq!(json["sub_account_ids"], serde_json::json!([2]));
        assert!(json.get("parent_account_id").is_none());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let directory = directory();
        let policy = AccountLinkagePolicy::new(&directory, LinkageConfig::new(true));
        let sub = account(&directory, SUB);

        let first = policy.decisions(&sub, RequestEnvironment::Storefront);
        let second = policy.decisions(&sub, RequestEnvironment::Storefront);
        assert_eq!(first, second);
    }
}
