use crate::DbError;
use crate::persistence::JournalBackend;
use analytics::{AccountReport, StatsEngine};
use core_types::{Account, NewAccount, Trade, TradeDraft};
use uuid::Uuid;

/// The journal's state: accounts, trades and which account is being viewed.
///
/// Every mutation is written to the backend before the in-memory copy changes,
/// so a failed save leaves both at the previous state.
pub struct JournalRepository {
    backend: Box<dyn JournalBackend>,
    accounts: Vec<Account>,
    trades: Vec<Trade>,
    active_account_id: Option<String>,
    engine: StatsEngine,
}

impl JournalRepository {
    /// Loads the journal from `backend`.
    ///
    /// A stored active account that no longer exists is dropped. When nothing is
    /// active but accounts exist, the first one becomes active.
    pub fn open(backend: impl JournalBackend + 'static) -> Result<Self, DbError> {
        let mut backend: Box<dyn JournalBackend> = Box::new(backend);
        let accounts = backend.load_accounts()?;
        let trades = backend.load_trades()?;
        let stored_active = backend.load_active_account_id()?;

        let mut active_account_id =
            stored_active.filter(|id| accounts.iter().any(|account| &account.id == id));
        if active_account_id.is_none() {
            active_account_id = accounts.first().map(|account| account.id.clone());
            backend.save_active_account_id(active_account_id.as_deref())?;
        }

        tracing::debug!(
            accounts = accounts.len(),
            trades = trades.len(),
            active = ?active_account_id,
            "Journal loaded."
        );

        Ok(Self {
            backend,
            accounts,
            trades,
            active_account_id,
            engine: StatsEngine::new(),
        })
    }

    // --- Accounts ---

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn active_account_id(&self) -> Option<&str> {
        self.active_account_id.as_deref()
    }

    pub fn active_account(&self) -> Option<&Account> {
        self.active_account_id.as_deref().and_then(|id| self.account(id))
    }

    pub fn set_active_account(&mut self, id: &str) -> Result<&Account, DbError> {
        if self.account(id).is_none() {
            return Err(DbError::NotFound(format!("account '{id}'")));
        }
        self.backend.save_active_account_id(Some(id))?;
        self.active_account_id = Some(id.to_string());
        tracing::info!(account_id = id, "Active account switched.");
        self.active_account().ok_or_else(|| DbError::NotFound(format!("account '{id}'")))
    }

    /// Creates an account. It becomes the active account if none is active yet.
    pub fn add_account(&mut self, new_account: NewAccount) -> Result<Account, DbError> {
        new_account.validate()?;
        let account = new_account.into_account(Uuid::new_v4().to_string());

        let mut accounts = self.accounts.clone();
        accounts.push(account.clone());
        self.backend.save_accounts(&accounts)?;

        let becomes_active = self.active_account_id.is_none();
        if becomes_active {
            if let Err(err) = self.backend.save_active_account_id(Some(&account.id)) {
                // Undo the account write so a retry does not create a duplicate.
                if let Err(rollback) = self.backend.save_accounts(&self.accounts) {
                    tracing::error!(error = %rollback, "Failed to roll back account list.");
                }
                return Err(err);
            }
        }

        self.accounts = accounts;
        if becomes_active {
            self.active_account_id = Some(account.id.clone());
        }

        tracing::info!(account_id = %account.id, name = %account.name, "Account created.");
        Ok(account)
    }

    // --- Trades ---

    /// Every trade of every account, most recently added first.
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn trades_for(&self, account_id: &str) -> Vec<Trade> {
        self.trades
            .iter()
            .filter(|trade| trade.account_id == account_id)
            .cloned()
            .collect()
    }

    /// The trades of the active account; empty when no account is active.
    pub fn active_trades(&self) -> Vec<Trade> {
        match self.active_account_id.as_deref() {
            Some(id) => self.trades_for(id),
            None => Vec::new(),
        }
    }

    pub fn trade(&self, id: &str) -> Option<&Trade> {
        self.trades.iter().find(|trade| trade.id == id)
    }

    /// Commits `draft` as a new trade of the active account.
    pub fn add_trade(&mut self, draft: TradeDraft) -> Result<Trade, DbError> {
        let account_id = self
            .active_account_id
            .clone()
            .ok_or(DbError::NoActiveAccount)?;
        let trade = analytics::finalize(draft, Uuid::new_v4().to_string(), account_id)?;

        let mut trades = Vec::with_capacity(self.trades.len() + 1);
        trades.push(trade.clone());
        trades.extend(self.trades.iter().cloned());
        self.backend.save_trades(&trades)?;
        self.trades = trades;

        tracing::info!(
            trade_id = %trade.id,
            instrument = %trade.instrument,
            pnl = trade.pnl,
            "Trade logged."
        );
        Ok(trade)
    }

    /// Replaces trade `id` with `draft`. The id and owning account are kept and
    /// the P/L is recomputed.
    pub fn update_trade(&mut self, id: &str, draft: TradeDraft) -> Result<Trade, DbError> {
        let index = self
            .trades
            .iter()
            .position(|trade| trade.id == id)
            .ok_or_else(|| DbError::NotFound(format!("trade '{id}'")))?;
        let account_id = self.trades[index].account_id.clone();
        let trade = analytics::finalize(draft, id.to_string(), account_id)?;

        let mut trades = self.trades.clone();
        trades[index] = trade.clone();
        self.backend.save_trades(&trades)?;
        self.trades = trades;

        tracing::info!(trade_id = %trade.id, pnl = trade.pnl, "Trade updated.");
        Ok(trade)
    }

    pub fn delete_trade(&mut self, id: &str) -> Result<Trade, DbError> {
        let index = self
            .trades
            .iter()
            .position(|trade| trade.id == id)
            .ok_or_else(|| DbError::NotFound(format!("trade '{id}'")))?;

        let mut trades = self.trades.clone();
        let removed = trades.remove(index);
        self.backend.save_trades(&trades)?;
        self.trades = trades;

        tracing::info!(trade_id = %removed.id, "Trade deleted.");
        Ok(removed)
    }

    // --- Derived figures ---

    /// Initial balance plus all P/L of the active account, 0 with no active account.
    pub fn current_balance(&self) -> f64 {
        match self.active_account() {
            Some(account) => self
                .engine
                .current_balance(&self.active_trades(), account.initial_balance),
            None => 0.0,
        }
    }

    pub fn report_for(&self, account_id: &str) -> Result<AccountReport, DbError> {
        let account = self
            .account(account_id)
            .ok_or_else(|| DbError::NotFound(format!("account '{account_id}'")))?;
        Ok(self.engine.report(account, &self.trades_for(account_id)))
    }

    pub fn active_report(&self) -> Result<AccountReport, DbError> {
        let id = self.active_account_id.as_deref().ok_or(DbError::NoActiveAccount)?;
        self.report_for(id)
    }
}

impl std::fmt::Debug for JournalRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalRepository")
            .field("accounts", &self.accounts.len())
            .field("trades", &self.trades.len())
            .field("active_account_id", &self.active_account_id)
            .finish()
    }
}
